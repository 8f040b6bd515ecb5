mod actors;
mod player;
mod projectiles;
mod weapon;

pub use actors::{ACTOR_RADIUS, Actor, ActorKind, push_actor_billboards, spawn_actors, update_actors};
pub use player::{DASH_COOLDOWN, MAX_PITCH, Player};
pub use projectiles::{POOL_SIZE, PROJECTILE_SPEED, ProjectilePool};
pub use weapon::Weapon;

use bitflags::bitflags;

/// Fixed simulation rate; the render loop accumulates real time into ticks.
pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const JUMP    = 0x01;
        const SPRINT  = 0x02;
        const FIRE    = 0x04;
        const SHOTGUN = 0x08;
    }
}

/// Dash direction relative to the current facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashDir {
    Forward,
    Back,
    Left,
    Right,
}

/// One tick's worth of player intent, derived from raw input by the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // -1 … +1
    pub strafe: f32,  // -1 … +1 (left / right)
    pub turn: f32,    // -1 … +1 (positive = counter-clockwise)
    pub look: f32,    // -1 … +1 (positive = look up)
    pub buttons: Buttons,
    pub dash: Option<DashDir>,
}
