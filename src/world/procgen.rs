//! Procedural texture generation.
//!
//! Stands in for an image loader: every bitmap the renderer needs is drawn
//! here from an explicit seed, so two runs with the same seed produce
//! identical pixels.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::texture::{TEX_SIZE, Texture, TextureBank, WallTex, blend, scale_rgb};

pub const SKY_W: usize = 512;
pub const SKY_H: usize = 200;

const fn rgb(r: u32, g: u32, b: u32) -> u32 {
    0xFF00_0000 | r << 16 | g << 8 | b
}

/// The standard bank: brick/stone/metal walls (ids 1-3), concrete floor,
/// panel ceiling, night-sky band, checkerboard default for unknown ids.
pub fn standard_bank(seed: u64) -> TextureBank {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bank = TextureBank::new(floor(&mut rng), ceiling(&mut rng), sky(&mut rng));
    bank.insert_wall(1, WallTex::new(brick(&mut rng)));
    bank.insert_wall(2, WallTex::new(stone(&mut rng)));
    bank.insert_wall(3, WallTex::new(metal(&mut rng)));
    bank.set_default_wall(WallTex::new(checker()));
    bank
}

/*──────────────────────── drawing scratch ────────────────────────*/

struct Sheet {
    w: usize,
    h: usize,
    px: Vec<u32>,
}

impl Sheet {
    fn filled(w: usize, h: usize, c: u32) -> Self {
        Self {
            w,
            h,
            px: vec![c; w * h],
        }
    }

    /// Opaque fill, clipped to the sheet.
    fn fill(&mut self, x: i32, y: i32, rw: i32, rh: i32, c: u32) {
        for yy in y.max(0)..(y + rh).min(self.h as i32) {
            for xx in x.max(0)..(x + rw).min(self.w as i32) {
                self.px[yy as usize * self.w + xx as usize] = c;
            }
        }
    }

    /// Alpha-blend `c` over the rectangle.
    fn tint(&mut self, x: i32, y: i32, rw: i32, rh: i32, c: u32, a: f32) {
        for yy in y.max(0)..(y + rh).min(self.h as i32) {
            for xx in x.max(0)..(x + rw).min(self.w as i32) {
                let p = &mut self.px[yy as usize * self.w + xx as usize];
                *p = blend(*p, c, a);
            }
        }
    }

    /// Uniform per-pixel brightness jitter.
    fn noise(&mut self, rng: &mut StdRng, intensity: f32) {
        for p in &mut self.px {
            let n = (rng.r#gen::<f32>() - 0.5) * 255.0 * intensity;
            let f = (1.0 + n / 255.0).max(0.0);
            *p = scale_rgb(*p, f);
        }
    }

    fn into_square(self) -> Texture {
        Texture::square(self.w, self.px).expect("procgen sheets are power-of-two")
    }
}

/*──────────────────────── wall textures ────────────────────────*/

fn brick(rng: &mut StdRng) -> Texture {
    let s = TEX_SIZE as i32;
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x66, 0x55, 0x44)); // mortar

    let (brick_w, brick_h, mortar) = (16, 8, 1);
    for row in 0..s / brick_h {
        let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
        for col in -1..s / brick_w + 1 {
            let bx = col * brick_w + offset + mortar;
            let by = row * brick_h + mortar;
            let bw = brick_w - mortar * 2;
            let bh = brick_h - mortar * 2;

            // slight color variation per brick
            let r = 160 + rng.gen_range(0..40);
            let g = 70 + rng.gen_range(0..30);
            let b = 50 + rng.gen_range(0..20);
            sh.fill(bx, by, bw, bh, rgb(r, g, b));

            sh.tint(bx, by, bw, 1, rgb(255, 255, 255), 0.08);
            sh.tint(bx, by + bh - 1, bw, 1, rgb(0, 0, 0), 0.15);
        }
    }

    sh.noise(rng, 0.03);
    sh.into_square()
}

fn stone(rng: &mut StdRng) -> Texture {
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x77, 0x88, 0x99));

    // irregular block courses
    const BLOCKS: [(i32, i32, i32, i32); 7] = [
        (0, 0, 30, 20),
        (30, 0, 34, 22),
        (0, 20, 18, 22),
        (18, 20, 28, 20),
        (46, 20, 18, 22),
        (0, 42, 32, 22),
        (32, 42, 32, 22),
    ];
    for (bx, by, bw, bh) in BLOCKS {
        let g = 100 + rng.gen_range(0..50);
        sh.fill(bx + 1, by + 1, bw - 2, bh - 2, rgb(g - 10, g, g + 15));

        sh.tint(bx + 1, by + 1, bw - 2, 1, rgb(255, 255, 255), 0.1);
        sh.tint(bx + 1, by + 1, 1, bh - 2, rgb(255, 255, 255), 0.1);
        sh.tint(bx + 1, by + bh - 2, bw - 2, 1, rgb(0, 0, 0), 0.15);
        sh.tint(bx + bw - 2, by + 1, 1, bh - 2, rgb(0, 0, 0), 0.15);
    }

    sh.noise(rng, 0.04);
    sh.into_square()
}

fn metal(rng: &mut StdRng) -> Texture {
    let s = TEX_SIZE as i32;
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x66, 0x77, 0x66));

    for y in (0..s).step_by(16) {
        sh.tint(0, y, s, 1, rgb(0, 0, 0), 0.2);
        sh.tint(0, y + 1, s, 1, rgb(255, 255, 255), 0.1);
    }
    for x in (0..s).step_by(32) {
        sh.tint(x, 0, 1, s, rgb(0, 0, 0), 0.15);
        sh.tint(x + 1, 0, 1, s, rgb(255, 255, 255), 0.08);
    }

    // rivets on the panel corners
    for ry in [4, 20, 36, 52] {
        for rx in [4, 28, 36, 60] {
            sh.tint(rx, ry, 2, 2, rgb(255, 255, 255), 0.2);
            sh.tint(rx + 1, ry + 1, 1, 1, rgb(0, 0, 0), 0.3);
        }
    }

    sh.noise(rng, 0.02);
    sh.into_square()
}

fn checker() -> Texture {
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x30, 0x30, 0x30));
    for y in 0..TEX_SIZE as i32 {
        for x in 0..TEX_SIZE as i32 {
            if (x / 8 ^ y / 8) & 1 == 0 {
                sh.fill(x, y, 1, 1, rgb(0x90, 0x40, 0x90));
            }
        }
    }
    sh.into_square()
}

/*──────────────────────── flats and sky ────────────────────────*/

fn floor(rng: &mut StdRng) -> Texture {
    let s = TEX_SIZE as i32;
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x66, 0x66, 0x66));

    // concrete slabs with grooves every 32 px
    for v in [0, 32] {
        sh.tint(0, v, s, 1, rgb(0, 0, 0), 0.25);
        sh.tint(v, 0, 1, s, rgb(0, 0, 0), 0.25);
        sh.tint(1, v + 1, s - 1, 1, rgb(255, 255, 255), 0.08);
        sh.tint(v + 1, 1, 1, s - 1, rgb(255, 255, 255), 0.08);
    }

    sh.noise(rng, 0.06);
    sh.into_square()
}

fn ceiling(rng: &mut StdRng) -> Texture {
    let s = TEX_SIZE as i32;
    let mut sh = Sheet::filled(TEX_SIZE, TEX_SIZE, rgb(0x88, 0x88, 0x88));

    for v in (0..s).step_by(16) {
        sh.tint(0, v, s, 1, rgb(0, 0, 0), 0.2);
        sh.tint(v, 0, 1, s, rgb(0, 0, 0), 0.2);
        sh.tint(0, v + 1, s, 1, rgb(255, 255, 255), 0.1);
        sh.tint(v + 1, 0, 1, s, rgb(255, 255, 255), 0.1);
    }

    sh.noise(rng, 0.04);
    sh.into_square()
}

fn sky(rng: &mut StdRng) -> Texture {
    let mut sh = Sheet::filled(SKY_W, SKY_H, 0);

    // dark blue zenith fading toward the horizon
    for y in 0..SKY_H as i32 {
        let t = y as f32 / SKY_H as f32;
        let r = (20.0 + t * 60.0) as u32;
        let g = (20.0 + t * 50.0) as u32;
        let b = (60.0 + t * 100.0) as u32;
        sh.fill(0, y, SKY_W as i32, 1, rgb(r, g, b));
    }

    // stars in the upper band
    for _ in 0..120 {
        let sx = rng.gen_range(0..SKY_W as i32);
        let sy = rng.gen_range(0..(SKY_H as f32 * 0.6) as i32);
        let v = 150 + rng.gen_range(0..105);
        let size = if rng.r#gen::<f32>() < 0.15 { 2 } else { 1 };
        sh.fill(sx, sy, size, size, rgb(v, v, v));
    }

    Texture::band(SKY_W, SKY_H, sh.px).expect("sky sheet dimensions are fixed")
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_is_deterministic_per_seed() {
        let a = standard_bank(7);
        let b = standard_bank(7);
        let c = standard_bank(8);
        assert_eq!(a.wall(1).unwrap().lit.px, b.wall(1).unwrap().lit.px);
        assert_eq!(a.sky.px, b.sky.px);
        assert_ne!(a.wall(1).unwrap().lit.px, c.wall(1).unwrap().lit.px);
    }

    #[test]
    fn bank_covers_all_tile_ids() {
        let bank = standard_bank(1);
        for id in 1..=3 {
            let wt = bank.wall(id).unwrap();
            assert_eq!(wt.lit.w, TEX_SIZE);
            assert_eq!(wt.dark.w, TEX_SIZE);
        }
        // unknown ids resolve to the checker default
        assert!(bank.wall(7).is_some());
        assert_eq!(bank.sky.w, SKY_W);
        assert_eq!(bank.sky.h, SKY_H);
    }

    #[test]
    fn shaded_variant_is_darker() {
        let bank = standard_bank(1);
        let wt = bank.wall(1).unwrap();
        let lum = |c: u32| (c >> 16 & 0xFF) + (c >> 8 & 0xFF) + (c & 0xFF);
        let lit: u32 = wt.lit.px.iter().map(|&c| lum(c)).sum();
        let dark: u32 = wt.dark.px.iter().map(|&c| lum(c)).sum();
        assert!(dark < lit);
    }
}
