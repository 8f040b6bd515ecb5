use crate::{
    renderer::{RenderOpts, Renderer, Rgba, software::sprites::VisSprite},
    renderer::{software::raycast::RayHit, software::sprites::Billboard},
    sim::{Player, Weapon},
    world::{Camera, TextureBank, TileGrid, blend},
};

/// CPU backend. All scratch state lives here and is reused across frames;
/// `begin_frame` resizes it whenever the caller hands over a new resolution.
#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    pub depth: Vec<f32>,
    pub(crate) hits: Vec<Option<RayHit>>,
    /// Top screen row of each wall span, for the side-face seam pass.
    pub(crate) col_top: Vec<i32>,
    pub(crate) vis: Vec<VisSprite>,

    pub width: usize,
    pub height: usize,
    pub width_f: f32,
    pub height_f: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.width_f = w as f32;
            self.height_f = h as f32;
            self.half_w = self.width_f * 0.5;
            self.half_h = self.height_f * 0.5;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, 0.0);
            self.hits.resize(w, None);
            self.col_top.resize(w, 0);
        }

        // dark-grey clear
        self.scratch.fill(0xFF_202020);

        self.depth.fill(f32::INFINITY);
        self.hits.fill(None);
        self.col_top.fill(h as i32);
        self.vis.clear();
    }

    fn draw_view(
        &mut self,
        camera: &Camera,
        grid: &TileGrid,
        billboards: &[Billboard],
        bank: &TextureBank,
        opts: &RenderOpts,
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let basis = camera.basis();

        self.cast_columns(camera, &basis, grid, opts);
        self.draw_planes(camera, &basis, bank, opts);
        self.draw_walls(camera, bank);
        self.fill_side_faces();
        self.project_sprites(camera, &basis, billboards);
        self.draw_sprites(billboards, opts);
    }

    fn draw_hud(
        &mut self,
        camera: &Camera,
        player: &Player,
        weapon: &Weapon,
        grid: &TileGrid,
        billboards: &[Billboard],
    ) {
        self.draw_crosshair(camera);
        self.draw_status_bars(player, weapon);
        self.draw_minimap(player, grid, billboards);
    }

    fn depth(&self) -> &[f32] {
        &self.depth
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── raster primitives ───────────────────────*/

impl Software {
    /// Opaque fill, clipped to the frame.
    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Rgba) {
        for yy in y.max(0)..(y + h).min(self.height as i32) {
            let row = yy as usize * self.width;
            for xx in x.max(0)..(x + w).min(self.width as i32) {
                self.scratch[row + xx as usize] = col;
            }
        }
    }

    /// Alpha-blend fill, clipped to the frame.
    pub(crate) fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Rgba, alpha: f32) {
        for yy in y.max(0)..(y + h).min(self.height as i32) {
            let row = yy as usize * self.width;
            for xx in x.max(0)..(x + w).min(self.width as i32) {
                let p = &mut self.scratch[row + xx as usize];
                *p = blend(*p, col, alpha);
            }
        }
    }

    /// Integer Bresenham line, clipped per pixel.
    pub(crate) fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.width as i32).contains(&x0) && (0..self.height as i32).contains(&y0) {
                self.scratch[y0 as usize * self.width + x0 as usize] = col;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_tracks_resolution_changes() {
        let mut sw = Software::default();
        sw.begin_frame(32, 24);
        assert_eq!(sw.scratch.len(), 32 * 24);
        assert_eq!(sw.depth.len(), 32);

        // the adaptive scaler may hand over any size on the next frame
        sw.begin_frame(16, 12);
        assert_eq!(sw.scratch.len(), 16 * 12);
        assert_eq!(sw.depth.len(), 16);
        assert_eq!(sw.hits.len(), 16);
    }

    #[test]
    fn end_frame_loans_buffer_once() {
        let mut sw = Software::default();
        sw.begin_frame(8, 4);
        let mut calls = 0;
        sw.end_frame(|fb, w, h| {
            calls += 1;
            assert_eq!((w, h), (8, 4));
            assert_eq!(fb.len(), 32);
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut sw = Software::default();
        sw.begin_frame(4, 4);
        sw.fill_rect(-2, -2, 10, 10, 0xFF_112233);
        assert!(sw.scratch.iter().all(|&p| p == 0xFF_112233));
    }

    #[test]
    fn full_pipeline_fills_depth_and_hits() {
        use crate::world::{Camera, Level, procgen};
        use glam::vec2;

        let level = Level::demo();
        let bank = procgen::standard_bank(1);
        let opts = RenderOpts::default();
        let camera = Camera::new(vec2(3.5, 3.5), 0.8, 66.0_f32.to_radians());
        let bbs: [Billboard; 0] = [];

        let mut sw = Software::default();
        sw.begin_frame(80, 50);
        sw.draw_view(&camera, &level.grid, &bbs, &bank, &opts);

        // a closed arena: every column hits within the cutoff
        assert!(sw.hits.iter().all(|h| h.is_some()));
        assert!(sw.depth().iter().all(|&d| d > 0.0 && d <= opts.max_ray_dist));
        // and the frame is no longer the clear color anywhere near the middle
        let mid = 25 * 80;
        assert!(sw.scratch[mid..mid + 80].iter().any(|&p| p != 0xFF_202020));
    }
}
