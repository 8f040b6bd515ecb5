//! Grid DDA ray marching.
//!
//! One ray per screen column. The march steps cell boundary to cell
//! boundary along whichever axis has the smaller accumulated side
//! distance; the axis crossed last determines the perpendicular distance
//! (removing the fisheye curve) and which world coordinate becomes the
//! texture U.

use glam::Vec2;

use crate::{
    renderer::{RenderOpts, software::Software},
    world::{CamBasis, Camera, TileGrid},
};

/// Which grid-line family the ray crossed to land in the hit cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of one column's cast. Recomputed every frame.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub perp_dist: f32,
    pub axis: Axis,
    pub tile: u8,
    /// Fractional wall-surface coordinate, in [0, 1).
    pub wall_u: f32,
    pub cell: (i32, i32),
    /// Block height of the hit cell in grid units (≥ 1).
    pub height: u8,
}

/// Rays with a direction component smaller than this are treated as
/// axis-parallel; the reciprocal uses a large finite sentinel so the side
/// distance never turns into inf-minus-inf arithmetic.
const DIR_EPS: f32 = 1e-9;
const DELTA_MAX: f32 = 1e30;

#[inline]
fn delta_dist(d: f32) -> f32 {
    if d.abs() < DIR_EPS {
        DELTA_MAX
    } else {
        (1.0 / d).abs()
    }
}

/// March one ray from `origin` until it enters a solid cell or exceeds
/// `max_dist`. The origin cell itself is never tested; the march always
/// steps at least once.
pub fn cast_ray(origin: Vec2, dir: Vec2, grid: &TileGrid, max_dist: f32) -> Option<RayHit> {
    let mut map_x = origin.x.floor() as i32;
    let mut map_y = origin.y.floor() as i32;

    let delta_x = delta_dist(dir.x);
    let delta_y = delta_dist(dir.y);

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
    };

    loop {
        let axis = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Axis::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            Axis::Y
        };

        // entry distance of the cell just stepped into
        let perp_dist = match axis {
            Axis::X => side_x - delta_x,
            Axis::Y => side_y - delta_y,
        };

        let tile = grid.tile(map_x, map_y);
        if tile > 0 {
            let wall_u = match axis {
                Axis::X => origin.y + perp_dist * dir.y,
                Axis::Y => origin.x + perp_dist * dir.x,
            };
            return Some(RayHit {
                perp_dist,
                axis,
                tile,
                wall_u: wall_u - wall_u.floor(),
                cell: (map_x, map_y),
                height: grid.height(map_x, map_y),
            });
        }

        if perp_dist > max_dist {
            return None;
        }
    }
}

impl Software {
    /// Cast one ray per screen column, filling the hit records and the
    /// depth buffer. Missed columns clamp their depth to the cast cutoff.
    pub(crate) fn cast_columns(
        &mut self,
        camera: &Camera,
        basis: &CamBasis,
        grid: &TileGrid,
        opts: &RenderOpts,
    ) {
        for col in 0..self.width {
            let camera_x = 2.0 * col as f32 / self.width_f - 1.0;
            let hit = cast_ray(camera.pos, basis.ray_dir(camera_x), grid, opts.max_ray_dist);
            self.depth[col] = hit.map_or(opts.max_ray_dist, |h| h.perp_dist);
            self.hits[col] = hit;
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
