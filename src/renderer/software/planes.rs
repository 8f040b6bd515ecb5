//! Floor, ceiling and sky casting.
//!
//! Rows below the horizon back-project to a point on the floor plane and
//! sample the floor texture by masked lookup; rows above either mirror the
//! floor math against the ceiling plane or sample the scrolling sky band
//! keyed by absolute view angle. Every write goes through the packed
//! tables; this loop touches most of the frame's pixels.

use glam::Vec2;

use crate::{
    renderer::{RenderOpts, software::Software},
    world::{CamBasis, Camera, TextureBank, blend},
};

impl Software {
    pub(crate) fn draw_planes(
        &mut self,
        camera: &Camera,
        basis: &CamBasis,
        bank: &TextureBank,
        opts: &RenderOpts,
    ) {
        let h = self.height as i32;
        let horizon = camera.horizon(self.height);
        let clamped = horizon.clamp(0, h);

        // leftmost ray plus the per-column direction step
        let ray0 = basis.dir - basis.plane;
        let step_dir = basis.plane * (2.0 / self.width_f);

        self.cast_floor(camera, ray0, step_dir, bank, horizon, clamped);
        if opts.sky {
            self.cast_sky(camera, bank, clamped);
        } else {
            self.cast_ceiling(camera, ray0, step_dir, bank, horizon, clamped);
        }
        self.apply_plane_fog(clamped, opts);
    }

    fn cast_floor(
        &mut self,
        camera: &Camera,
        ray0: Vec2,
        step_dir: Vec2,
        bank: &TextureBank,
        horizon: i32,
        clamped: i32,
    ) {
        let tex = &bank.floor;
        let size = tex.w as f32;
        let mask = tex.mask();
        let eye = 0.5 + camera.z;

        for y in clamped..self.height as i32 {
            let p = y - horizon;
            if p <= 0 {
                continue;
            }
            let row_dist = self.height_f * eye / p as f32;

            let mut world = camera.pos + ray0 * row_dist;
            let step = step_dir * row_dist;
            let row = y as usize * self.width;
            for x in 0..self.width {
                let tx = ((world.x * size) as i32 & mask) as usize;
                let ty = ((world.y * size) as i32 & mask) as usize;
                self.scratch[row + x] = tex.texel(tx, ty);
                world += step;
            }
        }
    }

    /// Mirrored floor technique: same per-row scale, measured upward from
    /// the horizon against the ceiling plane.
    fn cast_ceiling(
        &mut self,
        camera: &Camera,
        ray0: Vec2,
        step_dir: Vec2,
        bank: &TextureBank,
        horizon: i32,
        clamped: i32,
    ) {
        let tex = &bank.ceiling;
        let size = tex.w as f32;
        let mask = tex.mask();
        let eye = 0.5 - camera.z;

        for y in 0..clamped {
            let p = horizon - y;
            if p <= 0 {
                continue;
            }
            let row_dist = self.height_f * eye / p as f32;
            if row_dist < 0.0 {
                continue; // eye above the ceiling plane while jumping
            }

            let mut world = camera.pos + ray0 * row_dist;
            let step = step_dir * row_dist;
            let row = y as usize * self.width;
            for x in 0..self.width {
                let tx = ((world.x * size) as i32 & mask) as usize;
                let ty = ((world.y * size) as i32 & mask) as usize;
                self.scratch[row + x] = tex.texel(tx, ty);
                world += step;
            }
        }
    }

    /// The sky band scrolls with absolute view angle so turning the camera
    /// pans it instead of smearing it; rows sample deeper into the band the
    /// farther they sit above the horizon.
    fn cast_sky(&mut self, camera: &Camera, bank: &TextureBank, clamped: i32) {
        if clamped <= 0 {
            return;
        }
        let sky = &bank.sky;
        let sky_w = sky.w as i32;
        let angle_base = camera.yaw - camera.fov() * 0.5;
        let angle_step = camera.fov() / self.width_f;
        let u_per_rad = sky.w as f32 / std::f32::consts::TAU;

        for y in 0..clamped {
            let sv = (((clamped - y) as f32 / clamped as f32) * (sky.h - 1) as f32) as usize;
            let sv = sv.min(sky.h - 1);
            let row = y as usize * self.width;

            let mut angle = angle_base;
            for x in 0..self.width {
                let su = ((angle * u_per_rad) as i32).rem_euclid(sky_w) as usize;
                self.scratch[row + x] = sky.texel(su, sv);
                angle += angle_step;
            }
        }
    }

    /// Screen-space fog: opaque at the horizon, fading out toward the
    /// screen edges. Walls draw over this afterwards, so only floor and
    /// ceiling pixels keep the gradient; the sky never fogs.
    fn apply_plane_fog(&mut self, clamped: i32, opts: &RenderOpts) {
        if opts.fog_max_alpha <= 0.0 {
            return;
        }
        let h = self.height as i32;

        if clamped < h {
            let span = (h - clamped) as f32;
            for y in clamped..h {
                let a = opts.fog_max_alpha * (1.0 - (y - clamped) as f32 / span);
                self.blend_row(y as usize, opts.fog_color, a);
            }
        }

        if !opts.sky && clamped > 0 {
            for y in 0..clamped {
                let a = opts.fog_max_alpha * (y as f32 / clamped as f32);
                self.blend_row(y as usize, opts.fog_color, a);
            }
        }
    }

    #[inline]
    fn blend_row(&mut self, y: usize, col: u32, alpha: f32) {
        let row = &mut self.scratch[y * self.width..][..self.width];
        for p in row {
            *p = blend(*p, col, alpha);
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
