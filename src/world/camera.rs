use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// * `pos` is in grid units; `z` is the vertical eye offset above the
///   standard eye line (jumping raises it), not an absolute altitude.
/// * `pitch` tilts the horizon; the simulation clamps it to a small range.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec2,
    pub yaw: f32,   // radians (0 = +x, counter-clockwise)
    pub pitch: f32, // radians, small range
    pub z: f32,     // vertical eye offset in grid units
    fov: f32,       // horizontal FoV (radians)
}

/// Per-frame camera basis: forward direction plus the half-width "plane"
/// vector that spans the field of view. Recomputed every frame, never stored.
#[derive(Clone, Copy, Debug)]
pub struct CamBasis {
    pub dir: Vec2,
    pub plane: Vec2,
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self {
            pos,
            yaw,
            pitch: 0.0,
            z: 0.0,
            fov,
        }
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        vec2(c, s)
    }

    /// Forward + plane vectors for this frame.
    ///
    /// The plane is perpendicular to `dir` with length `tan(fov/2)`, so the
    /// leftmost/rightmost rays are `dir ∓ plane`.
    #[inline]
    pub fn basis(&self) -> CamBasis {
        let dir = self.forward();
        let plane_len = (self.fov * 0.5).tan();
        CamBasis {
            dir,
            plane: vec2(-dir.y, dir.x) * plane_len,
        }
    }

    /// Screen row of the horizon for a viewport `h` pixels tall.
    /// Unclamped; plane casting clamps it to the viewport.
    #[inline]
    pub fn horizon(&self, h: usize) -> i32 {
        (h as f32 * 0.5 + self.pitch * h as f32).floor() as i32
    }
}

impl CamBasis {
    /// Ray direction for camera-space x in [-1, 1].
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.dir + self.plane * camera_x
    }

    /// Transform a camera-relative world offset into camera space:
    ///  .x = lateral offset, .y = depth along the forward axis.
    ///
    /// Inverse of the 2×2 matrix [plane dir]; degenerate only if fov is 0.
    #[inline]
    pub fn to_cam(&self, rel: Vec2) -> Vec2 {
        let inv_det = 1.0 / (self.plane.x * self.dir.y - self.dir.x * self.plane.y);
        vec2(
            inv_det * (self.dir.y * rel.x - self.dir.x * rel.y),
            inv_det * (-self.plane.y * rel.x + self.plane.x * rel.y),
        )
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
