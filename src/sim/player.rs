//! Player movement and view state.
//!
//! Axis-separated wall sliding, a small jump arc that feeds the camera's
//! vertical offset, a cardinal dash with a cooldown, and weapon recoil
//! that decays back to zero. All of it runs at the fixed tick rate.

use glam::{Vec2, vec2};

use crate::{
    sim::{ACTOR_RADIUS, Actor, Buttons, DashDir, InputCmd},
    world::{Camera, TileGrid},
};

const WALK_SPEED: f32 = 3.5;
const SPRINT_MULT: f32 = 1.8;
const TURN_SPEED: f32 = 2.6; // rad/s at full deflection
const PITCH_SPEED: f32 = 1.6;
pub const MAX_PITCH: f32 = 0.4;
const PLAYER_RADIUS: f32 = 0.2;

const JUMP_VELOCITY: f32 = 6.0;
const GRAVITY: f32 = 20.0;

const DASH_SPEED: f32 = 12.0;
const DASH_DURATION: f32 = 0.15;
pub const DASH_COOLDOWN: f32 = 1.0;

const RECOIL_DECAY: f32 = 15.0;

#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical eye offset above the ground, grid units.
    pub z: f32,
    vz: f32,
    pub hp: i32,
    dash_timer: f32,
    pub dash_cooldown: f32,
    dash_dir: Vec2,
    /// Additive yaw offset from weapon kick, decayed here.
    pub recoil: f32,
}

impl Player {
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        Self {
            pos,
            yaw,
            pitch: 0.0,
            z: 0.0,
            vz: 0.0,
            hp: 100,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_dir: Vec2::ZERO,
            recoil: 0.0,
        }
    }

    /// Camera pose for this tick; recoil rides on top of the facing yaw.
    pub fn camera(&self, fov: f32) -> Camera {
        let mut cam = Camera::new(self.pos, self.yaw + self.recoil, fov);
        cam.pitch = self.pitch;
        cam.z = self.z;
        cam
    }

    pub fn update(&mut self, cmd: &InputCmd, dt: f32, grid: &TileGrid, actors: &[Actor]) {
        self.yaw += cmd.turn * TURN_SPEED * dt;
        self.pitch = (self.pitch + cmd.look * PITCH_SPEED * dt).clamp(-MAX_PITCH, MAX_PITCH);

        // jump and gravity
        if cmd.buttons.contains(Buttons::JUMP) && self.z == 0.0 {
            self.vz = JUMP_VELOCITY;
        }
        self.vz -= GRAVITY * dt;
        self.z += self.vz * dt;
        if self.z < 0.0 {
            self.z = 0.0;
            self.vz = 0.0;
        }

        // recoil decays linearly toward zero
        let decay = RECOIL_DECAY * dt;
        if self.recoil.abs() <= decay {
            self.recoil = 0.0;
        } else {
            self.recoil -= self.recoil.signum() * decay;
        }

        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
        }

        let (sin, cos) = self.yaw.sin_cos();
        let fwd = vec2(cos, sin);

        let mut mv = fwd * cmd.forward + vec2(-sin, cos) * cmd.strafe;
        if mv.length_squared() > 0.0 {
            mv = mv.normalize(); // diagonals are not faster
        }
        let mut speed = WALK_SPEED;
        if cmd.buttons.contains(Buttons::SPRINT) {
            speed *= SPRINT_MULT;
        }
        let mut vel = mv * speed;

        if let Some(dir) = cmd.dash {
            if self.dash_cooldown <= 0.0 && self.dash_timer <= 0.0 {
                self.dash_timer = DASH_DURATION;
                self.dash_cooldown = DASH_COOLDOWN;
                self.dash_dir = match dir {
                    DashDir::Forward => fwd,
                    DashDir::Back => -fwd,
                    DashDir::Left => vec2(sin, -cos),
                    DashDir::Right => vec2(-sin, cos),
                };
            }
        }
        if self.dash_timer > 0.0 {
            self.dash_timer -= dt;
            vel += self.dash_dir * DASH_SPEED;
        }

        // axis-separated moves so a blocked axis still slides along walls
        let nx = vec2(self.pos.x + vel.x * dt, self.pos.y);
        if !collides_wall(grid, nx) && !collides_actor(actors, nx) {
            self.pos.x = nx.x;
        }
        let ny = vec2(self.pos.x, self.pos.y + vel.y * dt);
        if !collides_wall(grid, ny) && !collides_actor(actors, ny) {
            self.pos.y = ny.y;
        }
    }
}

/// Bounding-box corner test against the grid.
fn collides_wall(grid: &TileGrid, pos: Vec2) -> bool {
    let r = PLAYER_RADIUS;
    grid.is_wall((pos.x - r).floor() as i32, (pos.y - r).floor() as i32)
        || grid.is_wall((pos.x + r).floor() as i32, (pos.y - r).floor() as i32)
        || grid.is_wall((pos.x - r).floor() as i32, (pos.y + r).floor() as i32)
        || grid.is_wall((pos.x + r).floor() as i32, (pos.y + r).floor() as i32)
}

fn collides_actor(actors: &[Actor], pos: Vec2) -> bool {
    let r = PLAYER_RADIUS + ACTOR_RADIUS;
    actors
        .iter()
        .any(|a| a.alive() && (a.pos - pos).length_squared() < r * r)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DT;

    fn open_grid() -> TileGrid {
        let mut cells = vec![0u16; 100];
        for i in 0..10 {
            cells[i] = 1;
            cells[90 + i] = 1;
            cells[i * 10] = 1;
            cells[i * 10 + 9] = 1;
        }
        TileGrid::new(10, 10, cells).unwrap()
    }

    #[test]
    fn pitch_is_clamped() {
        let grid = open_grid();
        let mut p = Player::new(vec2(5.0, 5.0), 0.0);
        let cmd = InputCmd {
            look: 1.0,
            ..Default::default()
        };
        for _ in 0..600 {
            p.update(&cmd, DT, &grid, &[]);
        }
        assert_eq!(p.pitch, MAX_PITCH);
    }

    #[test]
    fn jump_arcs_back_to_the_ground() {
        let grid = open_grid();
        let mut p = Player::new(vec2(5.0, 5.0), 0.0);
        let jump = InputCmd {
            buttons: Buttons::JUMP,
            ..Default::default()
        };
        p.update(&jump, DT, &grid, &[]);
        assert!(p.z > 0.0);

        let mut peak = 0.0_f32;
        for _ in 0..120 {
            p.update(&InputCmd::default(), DT, &grid, &[]);
            peak = peak.max(p.z);
        }
        assert!(peak > 0.5);
        assert_eq!(p.z, 0.0); // landed
    }

    #[test]
    fn walls_block_movement() {
        let grid = open_grid();
        let mut p = Player::new(vec2(1.5, 5.0), std::f32::consts::PI); // facing -x
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };
        for _ in 0..120 {
            p.update(&cmd, DT, &grid, &[]);
        }
        // stopped at the border wall, radius kept out of the solid cell
        assert!(p.pos.x > 1.0);
    }

    #[test]
    fn dash_outruns_walking_and_sets_cooldown() {
        let grid = TileGrid::new(40, 3, vec![0u16; 120]).unwrap();
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };

        let mut walker = Player::new(vec2(2.0, 1.5), 0.0);
        let mut dasher = Player::new(vec2(2.0, 1.5), 0.0);
        let dash_cmd = InputCmd {
            forward: 1.0,
            dash: Some(DashDir::Forward),
            ..Default::default()
        };

        dasher.update(&dash_cmd, DT, &grid, &[]);
        walker.update(&cmd, DT, &grid, &[]);
        for _ in 0..10 {
            dasher.update(&cmd, DT, &grid, &[]);
            walker.update(&cmd, DT, &grid, &[]);
        }
        assert!(dasher.pos.x > walker.pos.x);
        assert!(dasher.dash_cooldown > 0.0);
    }

    #[test]
    fn actor_bodies_block_the_player() {
        let grid = TileGrid::new(40, 3, vec![0u16; 120]).unwrap();
        let blocker = Actor::spawn(crate::sim::ActorKind::Tank, vec2(4.0, 1.5));
        let mut p = Player::new(vec2(2.0, 1.5), 0.0);
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };
        for _ in 0..300 {
            p.update(&cmd, DT, &grid, &[blocker]);
        }
        assert!(p.pos.x < 4.0 - ACTOR_RADIUS);
    }
}
