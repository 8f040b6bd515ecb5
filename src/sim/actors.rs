//! Actor roster and per-tick actor state.
//!
//! The renderer never sees an `Actor`; the simulation materializes the
//! active subset into billboards each frame, folding hit-flash and the
//! death animation into the billboard's color and scale.

use glam::Vec2;

use crate::renderer::{ActorShape, Billboard};

pub const ACTOR_RADIUS: f32 = 0.3;
const DEATH_DURATION: f32 = 0.4;
const HIT_FLASH_TIME: f32 = 0.1;

/// Closed set of actor kinds. The sprite compositor matches on this
/// exhaustively, so a new kind is a compile-time checklist, not a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Grunt,
    Charger,
    Turret,
    Tank,
    Health,
}

/// Static per-kind stats.
#[derive(Clone, Copy, Debug)]
pub struct ActorInfo {
    pub hp: i32,
    pub speed: f32,
    pub color: u32,
    pub scale: f32,
}

impl ActorKind {
    pub const fn info(self) -> ActorInfo {
        match self {
            ActorKind::Grunt => ActorInfo {
                hp: 100,
                speed: 2.0,
                color: 0xFF_EE4444,
                scale: 1.0,
            },
            ActorKind::Charger => ActorInfo {
                hp: 60,
                speed: 5.0,
                color: 0xFF_EE8822,
                scale: 0.9,
            },
            ActorKind::Turret => ActorInfo {
                hp: 150,
                speed: 0.0,
                color: 0xFF_8888EE,
                scale: 1.1,
            },
            ActorKind::Tank => ActorInfo {
                hp: 300,
                speed: 1.0,
                color: 0xFF_AA44AA,
                scale: 1.4,
            },
            ActorKind::Health => ActorInfo {
                hp: 0,
                speed: 0.0,
                color: 0xFF_44EE44,
                scale: 0.6,
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "grunt" => ActorKind::Grunt,
            "charger" => ActorKind::Charger,
            "turret" => ActorKind::Turret,
            "tank" => ActorKind::Tank,
            "health" => ActorKind::Health,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub kind: ActorKind,
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub active: bool,
    pub hit_flash: f32,
    pub dying: bool,
    pub death_timer: f32,
}

impl Actor {
    pub fn spawn(kind: ActorKind, pos: Vec2) -> Self {
        let info = kind.info();
        Self {
            kind,
            pos,
            hp: info.hp,
            max_hp: info.hp,
            active: true,
            hit_flash: 0.0,
            dying: false,
            death_timer: 0.0,
        }
    }

    /// Still a collision target / projectile target.
    #[inline]
    pub fn alive(&self) -> bool {
        self.active && !self.dying && self.hp > 0
    }

    pub fn hurt(&mut self, damage: i32) {
        self.hp -= damage;
        self.hit_flash = HIT_FLASH_TIME;
    }
}

pub fn spawn_actors(spawns: &[(ActorKind, Vec2)]) -> Vec<Actor> {
    spawns.iter().map(|&(k, p)| Actor::spawn(k, p)).collect()
}

pub fn update_actors(actors: &mut [Actor], dt: f32) {
    for a in actors.iter_mut() {
        if !a.active {
            continue;
        }

        if a.hit_flash > 0.0 {
            a.hit_flash -= dt;
        }

        if a.dying {
            a.death_timer += dt;
            if a.death_timer >= DEATH_DURATION {
                a.active = false;
            }
            continue;
        }

        if a.hp <= 0 {
            a.dying = true;
            a.death_timer = 0.0;
        }
    }
}

/// Materialize the active actors as billboards. The death animation
/// shrinks the sprite and fades it to dark red; a fresh hit flashes white.
pub fn push_actor_billboards(actors: &[Actor], out: &mut Vec<Billboard>) {
    for a in actors {
        if !a.active {
            continue;
        }
        let info = a.kind.info();
        let mut scale = info.scale;
        let mut color = if a.hit_flash > 0.0 {
            0xFF_FFFFFF
        } else {
            info.color
        };

        if a.dying {
            let t = a.death_timer / DEATH_DURATION;
            scale *= 1.0 - t * 0.7;
            color = 0xFF_000000 | ((200.0 * (1.0 - t)) as u32) << 16;
        }

        out.push(Billboard {
            pos: a.pos,
            color,
            scale,
            shape: Some(ActorShape {
                kind: a.kind,
                hp: a.hp,
                max_hp: a.max_hp,
            }),
        });
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
