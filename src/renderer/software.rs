//! CPU column renderer: one DDA ray per screen column, scanline plane
//! casting, painter's-order billboards over a per-column depth buffer.

mod fog;
mod hud;
mod planes;
mod raycast;
mod renderer;
mod sprites;
mod walls;

pub use fog::fog_alpha;
pub use raycast::{Axis, RayHit, cast_ray};
pub use renderer::Software;
pub use sprites::{ActorShape, Billboard};
