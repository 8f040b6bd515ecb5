mod camera;
mod grid;
pub mod procgen;
mod texture;

pub use camera::{CamBasis, Camera};
pub use grid::{Level, LevelError, TileGrid};
pub use texture::{
    SHADE_FACTOR, TEX_SIZE, Texture, TextureBank, TextureError, WallTex, blend, scale_rgb,
};
