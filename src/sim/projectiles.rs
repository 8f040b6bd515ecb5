//! Fixed-capacity projectile arena.
//!
//! Slots are reused in place and addressed by index; nothing outside this
//! module ever sees an inactive slot. When the pool is saturated a new
//! shot is simply dropped, bounding per-tick work.

use glam::{Vec2, vec2};
use smallvec::SmallVec;

use crate::{
    renderer::Billboard,
    sim::{ACTOR_RADIUS, Actor},
    world::TileGrid,
};

pub const POOL_SIZE: usize = 100;
pub const PROJECTILE_SPEED: f32 = 20.0;
const LIFETIME: f32 = 2.0;
const RADIUS: f32 = 0.1;
const BILLBOARD_SCALE: f32 = 0.2;

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    lifetime: f32,
    damage: i32,
    color: u32,
    active: bool,
}

pub struct ProjectilePool {
    slots: Vec<Slot>,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); POOL_SIZE],
        }
    }

    /// Claim a free slot. Returns false when the pool is saturated.
    pub fn spawn(&mut self, pos: Vec2, angle: f32, speed: f32, damage: i32, color: u32) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| !s.active) else {
            return false;
        };
        let (sin, cos) = angle.sin_cos();
        *slot = Slot {
            pos,
            dir: vec2(cos, sin),
            speed,
            lifetime: LIFETIME,
            damage,
            color,
            active: true,
        };
        true
    }

    pub fn update(&mut self, dt: f32, grid: &TileGrid, actors: &mut [Actor]) {
        for slot in &mut self.slots {
            if !slot.active {
                continue;
            }

            slot.lifetime -= dt;
            if slot.lifetime <= 0.0 {
                slot.active = false;
                continue;
            }

            let next = slot.pos + slot.dir * slot.speed * dt;
            if grid.is_wall(next.x.floor() as i32, next.y.floor() as i32) {
                slot.active = false;
                continue;
            }
            slot.pos = next;

            // overlap candidates first, then damage the nearest one
            let rr = (ACTOR_RADIUS + RADIUS) * (ACTOR_RADIUS + RADIUS);
            let overlaps: SmallVec<[usize; 4]> = actors
                .iter()
                .enumerate()
                .filter(|(_, a)| a.alive() && (a.pos - slot.pos).length_squared() < rr)
                .map(|(i, _)| i)
                .collect();

            let nearest = overlaps.iter().copied().min_by(|&a, &b| {
                let da = (actors[a].pos - slot.pos).length_squared();
                let db = (actors[b].pos - slot.pos).length_squared();
                da.partial_cmp(&db).unwrap()
            });
            if let Some(i) = nearest {
                actors[i].hurt(slot.damage);
                slot.active = false;
            }
        }
    }

    /// Active slots as shapeless billboards.
    pub fn push_billboards(&self, out: &mut Vec<Billboard>) {
        for slot in &self.slots {
            if slot.active {
                out.push(Billboard {
                    pos: slot.pos,
                    color: slot.color,
                    scale: BILLBOARD_SCALE,
                    shape: None,
                });
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
