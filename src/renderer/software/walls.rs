//! Wall column rasterization.
//!
//! Each hit record becomes one vertical strip whose bottom edge is pinned
//! to the standard floor line; taller blocks grow upward and tile the
//! texture once per block unit. A second pass fills thin side faces where
//! neighbouring columns of the same surface differ in height, hiding the
//! seams on multi-block steps.

use crate::{
    renderer::{
        Rgba,
        software::{
            Software,
            raycast::{Axis, RayHit},
        },
    },
    world::{Camera, TextureBank, scale_rgb},
};

/// Brightness of everything above the lowest block band of a tall wall.
const UPPER_BLOCK_SHADE: f32 = 0.88;
/// Brightness of the 2-px ledge separators at block boundaries.
const LEDGE_SHADE: f32 = 0.65;
const LEDGE_PX: i32 = 2;

// Side-face heuristic: tunable, not load-bearing. Neighbouring columns
// whose depths differ by more than the epsilon belong to different walls
// and get no face; smaller top-row gaps than the minimum are left to the
// texture itself.
const SIDE_FACE_DEPTH_EPS: f32 = 1.5;
const SIDE_FACE_MIN_GAP: i32 = 2;
const SIDE_FACE_COLOR: Rgba = 0xFF_2A2A2A;

/// Flat fallback pair (lit, shaded) when the bank has no bitmap for a
/// tile id; unknown ids take the id-1 pair. The minimap reuses the lit
/// tone for its tile dots.
pub(crate) fn wall_colors(tile: u8) -> (Rgba, Rgba) {
    match tile {
        2 => (0xFF_8888BB, 0xFF_666699),
        3 => (0xFF_88BB88, 0xFF_669966),
        _ => (0xFF_BB8844, 0xFF_994455),
    }
}

/// Screen rows `(top, bottom)` of a wall span: `screen_h / perp_dist`
/// pixels per block, bottom edge at the floor line shifted by the camera's
/// vertical offset, growing upward with block count.
pub(crate) fn wall_span(
    screen_h: f32,
    horizon: i32,
    perp_dist: f32,
    blocks: u8,
    cam_z: f32,
) -> (i32, i32) {
    let base = screen_h / perp_dist;
    let line_h = base * blocks.max(1) as f32;
    let z_off = cam_z * base;
    let draw_end = (horizon as f32 + base * 0.5 + z_off).floor() as i32;
    let draw_start = (draw_end as f32 - line_h).floor() as i32;
    (draw_start, draw_end)
}

impl Software {
    pub(crate) fn draw_walls(&mut self, camera: &Camera, bank: &TextureBank) {
        let h = self.height as i32;
        let horizon = camera.horizon(self.height);

        for col in 0..self.width {
            let Some(hit) = self.hits[col] else {
                self.col_top[col] = h;
                continue;
            };

            let blocks = hit.height.max(1);
            let (draw_start, draw_end) =
                wall_span(self.height_f, horizon, hit.perp_dist, blocks, camera.z);
            let draw_h = draw_end - draw_start;
            self.col_top[col] = draw_start;
            if draw_h <= 0 {
                continue;
            }

            self.draw_wall_column(col, &hit, blocks, draw_start, draw_end, bank);

            if blocks > 1 {
                self.shade_upper_blocks(col, draw_start, draw_h, blocks);
            }
        }
    }

    fn draw_wall_column(
        &mut self,
        col: usize,
        hit: &RayHit,
        blocks: u8,
        draw_start: i32,
        draw_end: i32,
        bank: &TextureBank,
    ) {
        let y0 = draw_start.max(0);
        let y1 = draw_end.min(self.height as i32);

        if let Some(wt) = bank.wall(hit.tile) {
            let tex = match hit.axis {
                Axis::Y => &wt.dark,
                Axis::X => &wt.lit,
            };
            let tex_x = ((hit.wall_u * tex.w as f32) as i32 & tex.mask()) as usize;
            let v_mask = tex.h as i32 - 1;
            // one texture repeat per block unit across the span
            let v_step = (blocks as usize * tex.h) as f32 / (draw_end - draw_start) as f32;
            let mut v = (y0 - draw_start) as f32 * v_step;
            for y in y0..y1 {
                let ty = (v as i32 & v_mask) as usize;
                self.scratch[y as usize * self.width + col] = tex.texel(tex_x, ty);
                v += v_step;
            }
        } else {
            let (lit, dark) = wall_colors(hit.tile);
            let c = match hit.axis {
                Axis::Y => dark,
                Axis::X => lit,
            };
            for y in y0..y1 {
                self.scratch[y as usize * self.width + col] = c;
            }
        }
    }

    /// Darken all but the lowest block band and stamp ledge separators so
    /// stacked blocks read as distinct units.
    fn shade_upper_blocks(&mut self, col: usize, draw_start: i32, draw_h: i32, blocks: u8) {
        let h = self.height as i32;
        let seg_h = draw_h as f32 / blocks as f32;

        let upper_end = (draw_start as f32 + seg_h * (blocks - 1) as f32) as i32;
        for y in draw_start.max(0)..upper_end.min(h) {
            let p = &mut self.scratch[y as usize * self.width + col];
            *p = scale_rgb(*p, UPPER_BLOCK_SHADE);
        }

        for t in 1..blocks as i32 {
            let ledge_y = (draw_start as f32 + t as f32 * seg_h).floor() as i32;
            for y in ledge_y.max(0)..(ledge_y + LEDGE_PX).min(h) {
                let p = &mut self.scratch[y as usize * self.width + col];
                *p = scale_rgb(*p, LEDGE_SHADE);
            }
        }
    }

    /// Compare each column's span top against its neighbour: same surface
    /// (small depth delta) with a substantially different height means a
    /// visible block step, so fill the gap with a uniform side-face tone.
    pub(crate) fn fill_side_faces(&mut self) {
        for col in 1..self.width {
            if self.hits[col].is_none() || self.hits[col - 1].is_none() {
                continue;
            }
            let dd = (self.depth[col] - self.depth[col - 1]).abs();
            if dd > SIDE_FACE_DEPTH_EPS {
                continue; // different walls
            }

            let diff = self.col_top[col] - self.col_top[col - 1];
            if diff > SIDE_FACE_MIN_GAP {
                // current column shorter: face on its left edge
                self.fill_rect(col as i32, self.col_top[col - 1], 1, diff, SIDE_FACE_COLOR);
            } else if diff < -SIDE_FACE_MIN_GAP {
                // previous column shorter: face on its right edge
                self.fill_rect(col as i32 - 1, self.col_top[col], 1, -diff, SIDE_FACE_COLOR);
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderOpts, Renderer};
    use crate::world::{Camera, Texture, TextureBank, TileGrid};
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    fn bare_bank() -> TextureBank {
        let flat = |c| Texture::square(4, vec![c; 16]).unwrap();
        TextureBank::new(flat(0xFF_111111), flat(0xFF_222222), flat(0xFF_333333))
    }

    #[test]
    fn span_height_scales_with_block_count() {
        // base = 100 px at distance 2 on a 200 px screen
        let (s1, e1) = wall_span(200.0, 100, 2.0, 1, 0.0);
        let (s2, e2) = wall_span(200.0, 100, 2.0, 2, 0.0);
        let (s3, e3) = wall_span(200.0, 100, 2.0, 3, 0.0);
        assert_eq!(e1 - s1, 100);
        assert_eq!(e2 - s2, 200);
        assert_eq!(e3 - s3, 300);
        // bottom edge stays pinned; the span grows upward only
        assert_eq!(e1, e2);
        assert_eq!(e2, e3);
    }

    #[test]
    fn camera_z_shifts_span_down() {
        let (_, e0) = wall_span(200.0, 100, 2.0, 1, 0.0);
        let (_, e1) = wall_span(200.0, 100, 2.0, 1, 0.5);
        assert_eq!(e1 - e0, 50); // z projected through the same scale
    }

    #[test]
    fn double_height_cell_doubles_drawn_span() {
        // 21 and 11 side by side at equal distance from the camera
        let mut cells = vec![0u16; 64];
        cells[3] = 21; // (3,0)
        cells[4] = 11; // (4,0)
        let grid = TileGrid::new(8, 8, cells).unwrap();

        let opts = RenderOpts::default();
        let mut sw = Software::default();
        sw.begin_frame(64, 60);

        let camera = Camera::new(vec2(3.5, 3.5), -FRAC_PI_2, FRAC_PI_2);
        let basis = camera.basis();
        sw.cast_columns(&camera, &basis, &grid, &opts);
        let tall = sw.hits[32].unwrap();
        assert_eq!(tall.height, 2);
        assert_eq!(tall.tile, 1);
        assert!((tall.perp_dist - 2.5).abs() < 1e-4);

        // base span is 60 / 2.5 = 24 px, so both spans land on exact rows
        let (s2, e2) = wall_span(60.0, 30, tall.perp_dist, tall.height, 0.0);
        let (s1, e1) = wall_span(60.0, 30, tall.perp_dist, 1, 0.0);
        assert_eq!(e2 - s2, 2 * (e1 - s1));
    }

    #[test]
    fn flat_fallback_draws_side_shaded_colors() {
        let mut cells = vec![0u16; 64];
        cells[4 * 8 + 6] = 2; // east wall from the camera
        let grid = TileGrid::new(8, 8, cells).unwrap();

        let opts = RenderOpts::default();
        let bank = bare_bank(); // no wall bitmaps, no default
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        let camera = Camera::new(vec2(4.5, 4.5), 0.0, FRAC_PI_2);
        let basis = camera.basis();
        sw.cast_columns(&camera, &basis, &grid, &opts);
        sw.draw_walls(&camera, &bank);

        let center = sw.hits[16].unwrap();
        assert_eq!(center.axis, Axis::X);
        let row = 16 * 32;
        assert_eq!(sw.scratch[row + 16], wall_colors(2).0); // lit X-side
        assert!(sw.col_top[16] < 32);
    }

    #[test]
    fn side_face_fills_gap_between_heights() {
        let mut sw = Software::default();
        sw.begin_frame(4, 40);

        let hit = RayHit {
            perp_dist: 2.0,
            axis: Axis::X,
            tile: 1,
            wall_u: 0.5,
            cell: (0, 0),
            height: 1,
        };
        sw.hits.fill(Some(hit));
        sw.depth.fill(2.0);
        // column 1 belongs to a taller block: its top is far above column 2
        sw.col_top = vec![10, 10, 30, 30];

        sw.fill_side_faces();

        // gap above column 2 (rows 10..30) filled with the face tone
        assert_eq!(sw.scratch[15 * 4 + 2], SIDE_FACE_COLOR);
        assert_ne!(sw.scratch[15 * 4 + 3], SIDE_FACE_COLOR);
    }

    #[test]
    fn distinct_walls_get_no_side_face() {
        let mut sw = Software::default();
        sw.begin_frame(2, 40);
        let hit = RayHit {
            perp_dist: 2.0,
            axis: Axis::X,
            tile: 1,
            wall_u: 0.5,
            cell: (0, 0),
            height: 1,
        };
        sw.hits.fill(Some(hit));
        sw.depth = vec![2.0, 8.0]; // far apart: different surfaces
        sw.col_top = vec![10, 30];

        sw.fill_side_faces();
        assert!(sw.scratch.iter().all(|&p| p != SIDE_FACE_COLOR));
    }
}
