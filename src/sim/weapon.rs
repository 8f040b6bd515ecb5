//! Weapon cadence and spread.
//!
//! Held fire runs the machine gun: fixed rate, spread that grows per shot
//! and recovers while idle, a small random yaw kick per round. A shotgun
//! tap fires a pellet fan on a longer cooldown. Both only ever spawn pool
//! projectiles; damage happens on projectile impact.

use rand::{Rng, rngs::StdRng};

use crate::sim::{Buttons, InputCmd, PROJECTILE_SPEED, Player, ProjectilePool};

const MG_FIRE_RATE: f32 = 10.0; // shots per second
const MG_DAMAGE: i32 = 10;
const MG_SPREAD: f32 = 0.04;
const MG_SPREAD_GROWTH: f32 = 0.008;
const MG_SPREAD_MAX: f32 = 0.12;
const MG_RECOIL: f32 = 0.01;
const MG_COLOR: u32 = 0xFF_FFFF00;

const SHOTGUN_PELLETS: u32 = 5;
const SHOTGUN_DAMAGE: i32 = 30;
const SHOTGUN_SPREAD: f32 = 0.08;
const SHOTGUN_COOLDOWN: f32 = 0.4;
const SHOTGUN_RECOIL: f32 = 0.04;
const SHOTGUN_COLOR: u32 = 0xFF_FFAA00;

const MUZZLE_FLASH_MG: f32 = 0.05;
const MUZZLE_FLASH_SHOTGUN: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
pub struct Weapon {
    pub cooldown: f32,
    pub spread: f32,
    /// Seconds of muzzle flash left, read by the HUD.
    pub muzzle_flash: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            cooldown: 0.0,
            spread: MG_SPREAD,
            muzzle_flash: 0.0,
        }
    }
}

impl Weapon {
    pub fn update(
        &mut self,
        cmd: &InputCmd,
        dt: f32,
        player: &mut Player,
        pool: &mut ProjectilePool,
        rng: &mut StdRng,
    ) {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
        if self.muzzle_flash > 0.0 {
            self.muzzle_flash -= dt;
        }

        let firing = cmd.buttons.contains(Buttons::FIRE);
        if !firing {
            // spread recovers faster than it grows
            self.spread = (self.spread - MG_SPREAD_GROWTH * 5.0 * dt).max(MG_SPREAD);
        }

        if firing && self.cooldown <= 0.0 {
            self.cooldown = 1.0 / MG_FIRE_RATE;
            self.muzzle_flash = MUZZLE_FLASH_MG;

            let jitter = (rng.r#gen::<f32>() - 0.5) * self.spread * 2.0;
            pool.spawn(
                player.pos,
                player.yaw + jitter,
                PROJECTILE_SPEED,
                MG_DAMAGE,
                MG_COLOR,
            );

            self.spread = (self.spread + MG_SPREAD_GROWTH).min(MG_SPREAD_MAX);
            player.recoil += (rng.r#gen::<f32>() - 0.5) * MG_RECOIL;
        }

        if cmd.buttons.contains(Buttons::SHOTGUN) && self.cooldown <= 0.0 {
            self.cooldown = SHOTGUN_COOLDOWN;
            self.muzzle_flash = MUZZLE_FLASH_SHOTGUN;

            for _ in 0..SHOTGUN_PELLETS {
                let jitter = (rng.r#gen::<f32>() - 0.5) * SHOTGUN_SPREAD * 2.0;
                pool.spawn(
                    player.pos,
                    player.yaw + jitter,
                    PROJECTILE_SPEED * 0.8,
                    SHOTGUN_DAMAGE,
                    SHOTGUN_COLOR,
                );
            }

            player.recoil += if rng.r#gen::<bool>() {
                SHOTGUN_RECOIL
            } else {
                -SHOTGUN_RECOIL
            };
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use rand::SeedableRng;

    fn setup() -> (Player, ProjectilePool, StdRng) {
        (
            Player::new(vec2(5.0, 5.0), 0.0),
            ProjectilePool::new(),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn machine_gun_respects_fire_rate() {
        let (mut player, mut pool, mut rng) = setup();
        let mut weapon = Weapon::default();
        let fire = InputCmd {
            buttons: Buttons::FIRE,
            ..Default::default()
        };

        // 0.05 s of held fire: only the first tick's shot fits the cadence
        for _ in 0..3 {
            weapon.update(&fire, 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        }
        assert_eq!(pool.active_count(), 1);

        // a full second of held fire lands ten rounds
        let (mut player, mut pool, mut rng) = setup();
        let mut weapon = Weapon::default();
        for _ in 0..60 {
            weapon.update(&fire, 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        }
        assert_eq!(pool.active_count(), 10);
    }

    #[test]
    fn sustained_fire_grows_spread_to_the_cap() {
        let (mut player, mut pool, mut rng) = setup();
        let mut weapon = Weapon::default();
        let fire = InputCmd {
            buttons: Buttons::FIRE,
            ..Default::default()
        };

        for _ in 0..600 {
            weapon.update(&fire, 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        }
        assert!((weapon.spread - MG_SPREAD_MAX).abs() < 1e-6);

        // idle ticks recover back down to the baseline
        for _ in 0..600 {
            weapon.update(&InputCmd::default(), 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        }
        assert!((weapon.spread - MG_SPREAD).abs() < 1e-6);
    }

    #[test]
    fn shotgun_fires_a_pellet_fan_on_cooldown() {
        let (mut player, mut pool, mut rng) = setup();
        let mut weapon = Weapon::default();
        let tap = InputCmd {
            buttons: Buttons::SHOTGUN,
            ..Default::default()
        };

        weapon.update(&tap, 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        assert_eq!(pool.active_count(), SHOTGUN_PELLETS as usize);
        assert!(player.recoil.abs() > 0.0);

        // within the cooldown a second tap does nothing
        weapon.update(&tap, 1.0 / 60.0, &mut player, &mut pool, &mut rng);
        assert_eq!(pool.active_count(), SHOTGUN_PELLETS as usize);
    }
}
