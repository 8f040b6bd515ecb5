use clap::Parser;
use minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions};
use rand::{SeedableRng, rngs::StdRng};
use std::time::{Duration, Instant};

use gridray_rs::{
    renderer::{Billboard, RenderOpts, Renderer, Software},
    sim::{
        Buttons, DT, DashDir, InputCmd, Player, ProjectilePool, Weapon, push_actor_billboards,
        spawn_actors, update_actors,
    },
    world::{Level, procgen},
};

const FOV_DEG: f32 = 66.0;

#[derive(Parser)]
#[command(about = "Tile-grid raycasting arena")]
struct Args {
    /// Level file; the built-in demo arena when omitted.
    level: Option<std::path::PathBuf>,

    /// Texture generation seed.
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Force the indoor ceiling even if the level asks for a sky.
    #[arg(long)]
    indoor: bool,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,
}

/// Adaptive output-resolution policy: measure achieved FPS over a fixed
/// window and nudge the render scale one step at a time. The renderer just
/// gets handed a different buffer size next frame.
struct ResolutionScaler {
    scale: f32,
    frames: u32,
    since: Instant,
}

impl ResolutionScaler {
    const TARGET_FPS: f32 = 35.0;
    const SCALE_MIN: f32 = 0.25;
    const SCALE_MAX: f32 = 1.0;
    const SCALE_STEP: f32 = 0.05;
    const MEASURE_WINDOW: Duration = Duration::from_secs(1);

    fn new() -> Self {
        Self {
            scale: Self::SCALE_MAX,
            frames: 0,
            since: Instant::now(),
        }
    }

    fn render_size(&self, win_w: usize, win_h: usize) -> (usize, usize) {
        let w = ((win_w as f32 * self.scale) as usize).max(64);
        let h = ((win_h as f32 * self.scale) as usize).max(48);
        (w, h)
    }

    fn note_frame(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed < Self::MEASURE_WINDOW {
            return;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = Instant::now();

        if fps < Self::TARGET_FPS && self.scale > Self::SCALE_MIN {
            self.scale = (self.scale - Self::SCALE_STEP).max(Self::SCALE_MIN);
            println!("fps {fps:.1}, render scale down to {:.2}", self.scale);
        } else if fps > Self::TARGET_FPS + 5.0 && self.scale < Self::SCALE_MAX {
            self.scale = (self.scale + Self::SCALE_STEP).min(Self::SCALE_MAX);
        }
    }
}

fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();

    if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    if win.is_key_down(Key::Right) {
        cmd.turn += 1.0;
    }
    if win.is_key_down(Key::Left) {
        cmd.turn -= 1.0;
    }
    if win.is_key_down(Key::PageUp) {
        cmd.look += 1.0;
    }
    if win.is_key_down(Key::PageDown) {
        cmd.look -= 1.0;
    }

    if win.is_key_down(Key::Space) {
        cmd.buttons |= Buttons::JUMP;
    }
    if win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift) {
        cmd.buttons |= Buttons::SPRINT;
    }
    if win.is_key_down(Key::LeftCtrl) || win.is_key_down(Key::RightCtrl) {
        cmd.buttons |= Buttons::FIRE;
    }
    if win.is_key_pressed(Key::G, KeyRepeat::No) {
        cmd.buttons |= Buttons::SHOTGUN; // edge-trigger
    }

    if win.is_key_pressed(Key::E, KeyRepeat::No) {
        cmd.dash = Some(if cmd.strafe > 0.0 {
            DashDir::Right
        } else if cmd.strafe < 0.0 {
            DashDir::Left
        } else if cmd.forward < 0.0 {
            DashDir::Back
        } else {
            DashDir::Forward
        });
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match &args.level {
        Some(path) => Level::from_file(path)?,
        None => Level::demo(),
    };
    let bank = procgen::standard_bank(args.seed);
    let opts = RenderOpts {
        sky: level.sky && !args.indoor,
        ..Default::default()
    };

    let mut player = Player::new(level.player_pos, level.player_yaw);
    let mut actors = spawn_actors(&level.spawns);
    let mut projectiles = ProjectilePool::new();
    let mut weapon = Weapon::default();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut renderer = Software::default();
    let mut window = Window::new(
        "gridray arena",
        args.width,
        args.height,
        WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    let mut scaler = ResolutionScaler::new();
    let mut billboards: Vec<Billboard> = Vec::new();

    let mut last = Instant::now();
    let mut accumulator = 0.0_f32;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        accumulator += (t0 - last).as_secs_f32().min(0.1);
        last = t0;

        /* fixed-rate simulation ------------------------------------------- */
        let cmd = read_input(&window);
        while accumulator >= DT {
            player.update(&cmd, DT, &level.grid, &actors);
            weapon.update(&cmd, DT, &mut player, &mut projectiles, &mut rng);
            projectiles.update(DT, &level.grid, &mut actors);
            update_actors(&mut actors, DT);
            accumulator -= DT;
        }

        /* materialize this frame's billboards ----------------------------- */
        billboards.clear();
        push_actor_billboards(&actors, &mut billboards);
        projectiles.push_billboards(&mut billboards);

        /* render at the scaled resolution --------------------------------- */
        let (win_w, win_h) = window.get_size();
        let (rw, rh) = scaler.render_size(win_w, win_h);
        let camera = player.camera(FOV_DEG.to_radians());

        renderer.begin_frame(rw, rh);
        renderer.draw_view(&camera, &level.grid, &billboards, &bank, &opts);
        renderer.draw_hud(&camera, &player, &weapon, &level.grid, &billboards);
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            window.update_with_buffer(fb, w, h).unwrap()
        });

        scaler.note_frame();

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!(
                "avg render: {avg_ms:.2} ms  ({:.1} FPS) at {rw}x{rh}",
                1000.0 / avg_ms
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
