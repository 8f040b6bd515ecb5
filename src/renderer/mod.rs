//! Rendering abstraction layer.
//!
//! The simulation never touches a pixel. It hands a camera pose, the tile
//! grid, and a billboard list to a type implementing [`Renderer`]; the
//! backend owns its scratch buffers and loans the finished frame out via
//! `end_frame`. The per-column depth buffer stays readable between
//! `draw_view` and `end_frame` so overlays can run their own occlusion
//! tests against it.

use crate::sim::{Player, Weapon};
use crate::world::{Camera, TextureBank, TileGrid};

pub mod software;

pub use software::{ActorShape, Axis, Billboard, RayHit, Software, cast_ray, fog_alpha};

/// Pixel format of the frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Knobs of the render pipeline. The fixed field of view lives on the
/// camera; everything else that was tunable in the original lives here.
#[derive(Clone, Copy, Debug)]
pub struct RenderOpts {
    /// Rays give up past this distance (grid units); the depth buffer is
    /// clamped to it on a miss.
    pub max_ray_dist: f32,
    /// Distance where fog starts.
    pub fog_start: f32,
    /// Distance where fog reaches `fog_max_alpha`.
    pub fog_end: f32,
    /// Fog never exceeds this opacity, keeping distant geometry readable.
    pub fog_max_alpha: f32,
    pub fog_color: Rgba,
    /// Scrolling sky band above the horizon instead of a ceiling texture.
    pub sky: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            max_ray_dist: 64.0,
            fog_start: 4.0,
            fog_end: 20.0,
            fog_max_alpha: 0.75,
            fog_color: 0xFF_000000,
            sky: true,
        }
    }
}

/// A renderer that owns internal scratch for the whole frame.
///
/// `begin_frame` must tolerate a different resolution on every call;
/// the adaptive scaler resizes the target between frames at will.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Run the full pipeline: cast, planes, walls, sprites, fog.
    fn draw_view(
        &mut self,
        camera: &Camera,
        grid: &TileGrid,
        billboards: &[Billboard],
        bank: &TextureBank,
        opts: &RenderOpts,
    );

    /// Overlay crosshair, status bars and the minimap onto the finished
    /// view. Billboards double as the minimap's actor/projectile dots.
    fn draw_hud(
        &mut self,
        camera: &Camera,
        player: &Player,
        weapon: &Weapon,
        grid: &TileGrid,
        billboards: &[Billboard],
    );

    /// Per-column perpendicular wall distances of the last `draw_view`,
    /// for overlay occlusion tests.
    fn depth(&self) -> &[f32];

    /// Finish the frame and **loan** the buffer to `submit` exactly once.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}
