//! Billboard projection and compositing.
//!
//! Billboards are transformed into camera space with the inverse camera
//! basis, sorted far-to-near, and drawn column by column against the depth
//! buffer so walls keep their edge over anything behind them. Actor
//! billboards get a per-kind silhouette, edge shading and a health bar;
//! shapeless billboards (projectiles) are plain filled strips.

use glam::Vec2;

use crate::{
    renderer::{
        RenderOpts, Rgba,
        software::{Software, fog::fog_alpha},
    },
    sim::ActorKind,
    world::{CamBasis, Camera, blend, scale_rgb},
};

/// Richer per-actor data carried by a billboard, used only while drawing
/// the silhouette and health bar. Projection never looks at it.
#[derive(Clone, Copy, Debug)]
pub struct ActorShape {
    pub kind: ActorKind,
    pub hp: i32,
    pub max_hp: i32,
}

/// World-positioned sprite that always faces the camera. Rebuilt from the
/// simulation every frame.
#[derive(Clone, Copy, Debug)]
pub struct Billboard {
    pub pos: Vec2,
    pub color: Rgba,
    pub scale: f32,
    pub shape: Option<ActorShape>,
}

/// Screen-space projection of one billboard; lives for one frame.
#[derive(Clone, Copy)]
pub(crate) struct VisSprite {
    pub screen_x: i32,
    /// Camera-space depth, the sort and occlusion key.
    pub cam_y: f32,
    pub size: f32,
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
    /// Index into the frame's billboard slice.
    pub bb: usize,
}

/// Billboards closer than this to the camera plane are dropped.
const NEAR_EPS: f32 = 0.1;
/// First/last fraction of the sprite width drawn in the darker edge tone.
const EDGE_FRAC: f32 = 0.15;
const OUTLINE_PX: i32 = 2;

impl Software {
    /// Project every billboard into screen space and sort the survivors
    /// far-to-near for the painter's pass.
    pub(crate) fn project_sprites(
        &mut self,
        camera: &Camera,
        basis: &CamBasis,
        billboards: &[Billboard],
    ) {
        self.vis.clear();
        let horizon = camera.horizon(self.height) as f32;

        for (i, bb) in billboards.iter().enumerate() {
            let cam = basis.to_cam(bb.pos - camera.pos);
            if cam.y <= NEAR_EPS {
                continue; // behind or on top of the camera
            }

            let screen_x = (self.half_w * (1.0 + cam.x / cam.y)).floor() as i32;
            let size = (self.height_f / cam.y).floor().abs() * bb.scale;
            let z_off = camera.z * (self.height_f / cam.y);

            let x0 = (screen_x as f32 - size * 0.5).floor() as i32;
            let x1 = (screen_x as f32 + size * 0.5).floor() as i32;
            if x1 < 0 || x0 >= self.width as i32 {
                continue; // completely off-screen
            }

            self.vis.push(VisSprite {
                screen_x,
                cam_y: cam.y,
                size,
                x0,
                x1,
                y0: (horizon - size * 0.5 + z_off).floor() as i32,
                y1: (horizon + size * 0.5 + z_off).floor() as i32,
                bb: i,
            });
        }

        // farthest first so nearer sprites overwrite within a column
        self.vis.sort_by(|a, b| b.cam_y.partial_cmp(&a.cam_y).unwrap());
    }

    pub(crate) fn draw_sprites(&mut self, billboards: &[Billboard], opts: &RenderOpts) {
        let w = self.width as i32;
        let h = self.height as i32;

        for idx in 0..self.vis.len() {
            let spr = self.vis[idx];
            let bb = billboards[spr.bb];

            let start_x = spr.x0.max(0);
            let end_x = spr.x1.min(w - 1);
            if start_x >= end_x {
                continue;
            }

            // a wall nearer than the sprite across its whole width hides it
            let visible = (start_x..end_x).any(|c| spr.cam_y < self.depth[c as usize]);
            if !visible {
                continue;
            }

            match bb.shape {
                Some(shape) => self.draw_actor_sprite(&spr, &bb, shape, start_x, end_x),
                None => self.draw_plain_sprite(&spr, &bb, start_x, end_x),
            }

            // distance fog, blended only over columns the sprite won
            let a = fog_alpha(spr.cam_y, opts);
            if a > 0.01 {
                let top = spr.y0.max(0);
                let bot = spr.y1.min(h);
                for col in start_x..end_x {
                    if spr.cam_y >= self.depth[col as usize] {
                        continue;
                    }
                    for y in top..bot {
                        let p = &mut self.scratch[y as usize * self.width + col as usize];
                        *p = blend(*p, opts.fog_color, a);
                    }
                }
            }
        }
    }

    fn draw_plain_sprite(&mut self, spr: &VisSprite, bb: &Billboard, start_x: i32, end_x: i32) {
        let top = spr.y0.max(0);
        let bot = spr.y1.min(self.height as i32);
        for col in start_x..end_x {
            if spr.cam_y >= self.depth[col as usize] {
                continue;
            }
            for y in top..bot {
                self.scratch[y as usize * self.width + col as usize] = bb.color;
            }
        }
    }

    fn draw_actor_sprite(
        &mut self,
        spr: &VisSprite,
        bb: &Billboard,
        shape: ActorShape,
        start_x: i32,
        end_x: i32,
    ) {
        let h = self.height as i32;
        let dark = scale_rgb(bb.color, 0.6);
        let outline = scale_rgb(bb.color, 0.4);

        for col in start_x..end_x {
            if spr.cam_y >= self.depth[col as usize] {
                continue;
            }

            let local_x = (col - spr.x0) as f32 / spr.size;
            let Some((top_frac, bot_frac)) = silhouette(shape.kind, local_x) else {
                continue;
            };

            let col_top = ((spr.y0 as f32 + spr.size * top_frac).floor() as i32).max(0);
            let col_bot = ((spr.y0 as f32 + spr.size * bot_frac).floor() as i32).min(h);
            if col_top >= col_bot {
                continue;
            }

            let body = if local_x < EDGE_FRAC || local_x > 1.0 - EDGE_FRAC {
                dark
            } else {
                bb.color
            };
            for y in col_top..col_bot {
                self.scratch[y as usize * self.width + col as usize] = body;
            }

            let edge = OUTLINE_PX.min(col_bot - col_top);
            for y in col_top..col_top + edge {
                self.scratch[y as usize * self.width + col as usize] = outline;
            }
            for y in col_bot - edge..col_bot {
                self.scratch[y as usize * self.width + col as usize] = outline;
            }
        }

        // left/right outline, only where the sprite was not clipped away
        let y_top = spr.y0.max(0);
        let y_bot = spr.y1.min(h);
        if start_x == spr.x0 && spr.cam_y < self.depth[start_x as usize] {
            for y in y_top..y_bot {
                self.scratch[y as usize * self.width + start_x as usize] = outline;
            }
        }
        if end_x == spr.x1 && end_x > 0 && spr.cam_y < self.depth[(end_x - 1) as usize] {
            for y in y_top..y_bot {
                self.scratch[y as usize * self.width + (end_x - 1) as usize] = outline;
            }
        }

        if shape.max_hp > 0 && shape.hp > 0 && shape.hp < shape.max_hp {
            self.draw_health_bar(spr, shape, start_x, end_x);
        }
    }

    /// Two-layer bar floating above a damaged, living actor. Occlusion is
    /// tested at the bar's center column only.
    fn draw_health_bar(&mut self, spr: &VisSprite, shape: ActorShape, start_x: i32, end_x: i32) {
        let w = self.width as i32;
        let center = spr.screen_x.clamp(0, w - 1);
        if spr.cam_y >= self.depth[center as usize] {
            return;
        }

        let bar_w = (end_x - start_x).max(10);
        let bar_h = ((spr.size / 20.0) as i32).max(2);
        let bar_x = spr.screen_x - bar_w / 2;
        let bar_y = (spr.y0 - bar_h - 4).max(0);

        self.blend_rect(bar_x, bar_y, bar_w, bar_h, 0xFF_000000, 0.5);

        let frac = shape.hp as f32 / shape.max_hp as f32;
        let fg = if frac > 0.3 { 0xFF_44EE44 } else { 0xFF_EE4444 };
        self.fill_rect(bar_x, bar_y, (bar_w as f32 * frac) as i32, bar_h, fg);
    }
}

/// Vertical coverage of an actor silhouette at `local_x` in [0, 1] across
/// the sprite, as (top, bottom) fractions of its height. `None` leaves the
/// column empty. A fixed shading recipe per kind, not physics.
fn silhouette(kind: ActorKind, local_x: f32) -> Option<(f32, f32)> {
    match kind {
        ActorKind::Grunt => {
            // narrow head band over a full-height body
            let head = (local_x - 0.5).abs() < 0.15;
            Some((if head { 0.0 } else { 0.25 }, 1.0))
        }
        ActorKind::Charger => {
            // wedge: narrow crest widening to the base
            let d = (local_x - 0.5).abs();
            let top = if d < 0.15 {
                0.0
            } else if d < 0.5 {
                0.3
            } else {
                0.5
            };
            Some((top, 1.0))
        }
        ActorKind::Turret => {
            // blocky housing with a barrel bump in the middle
            let barrel = local_x > 0.35 && local_x < 0.65;
            Some((if barrel { 0.0 } else { 0.15 }, 0.95))
        }
        ActorKind::Tank => Some((0.1, 1.0)),
        ActorKind::Health => {
            // cross shape; columns outside both arms stay empty
            let vertical = local_x > 0.35 && local_x < 0.65;
            let horizontal = local_x > 0.2 && local_x < 0.8;
            if vertical {
                Some((0.1, 0.9))
            } else if horizontal {
                Some((0.35, 0.65))
            } else {
                None
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::new(vec2(0.0, 0.0), 0.0, FRAC_PI_2)
    }

    fn plain(pos: Vec2, color: Rgba) -> Billboard {
        Billboard {
            pos,
            color,
            scale: 1.0,
            shape: None,
        }
    }

    fn no_fog() -> RenderOpts {
        RenderOpts {
            fog_max_alpha: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn billboard_at_camera_position_is_rejected() {
        let cam = camera();
        let basis = cam.basis();
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        let bbs = [
            plain(cam.pos, 0xFF_FF00FF),    // zero offset
            plain(vec2(-3.0, 0.0), 0xFF_FF00FF), // behind
            plain(vec2(0.05, 0.0), 0xFF_FF00FF), // inside the near epsilon
        ];
        sw.project_sprites(&cam, &basis, &bbs);
        assert!(sw.vis.is_empty());
    }

    #[test]
    fn occluded_sprite_writes_no_pixel() {
        let cam = camera();
        let basis = cam.basis();
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        let bbs = [plain(vec2(5.0, 0.0), 0xFF_FF00FF)];
        sw.project_sprites(&cam, &basis, &bbs);
        assert_eq!(sw.vis.len(), 1);

        // wall at distance 2 in every column: strictly nearer than the sprite
        sw.depth.fill(2.0);
        let before = sw.scratch.clone();
        sw.draw_sprites(&bbs, &no_fog());
        assert_eq!(sw.scratch, before);
    }

    #[test]
    fn visible_sprite_writes_pixels_in_its_columns() {
        let cam = camera();
        let basis = cam.basis();
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        let bbs = [plain(vec2(4.0, 0.0), 0xFF_FF00FF)];
        sw.project_sprites(&cam, &basis, &bbs);
        sw.depth.fill(10.0); // walls all farther than the sprite
        sw.draw_sprites(&bbs, &no_fog());

        assert_eq!(sw.scratch[16 * 32 + 16], 0xFF_FF00FF);
    }

    #[test]
    fn nearer_sprite_wins_the_overlap() {
        let cam = camera();
        let basis = cam.basis();
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        let far_red = plain(vec2(6.0, 0.0), 0xFF_FF0000);
        let near_blue = plain(vec2(3.0, 0.0), 0xFF_0000FF);
        let bbs = [near_blue, far_red]; // input order must not matter
        sw.project_sprites(&cam, &basis, &bbs);

        // projection sorted far-to-near
        assert!(sw.vis[0].cam_y > sw.vis[1].cam_y);

        sw.depth.fill(100.0);
        sw.draw_sprites(&bbs, &no_fog());
        assert_eq!(sw.scratch[16 * 32 + 16], 0xFF_0000FF);
    }

    #[test]
    fn sprite_fog_scales_with_depth() {
        let cam = camera();
        let basis = cam.basis();
        let mut sw = Software::default();
        sw.begin_frame(32, 32);

        // far past fog start: drawn pixels must be dimmed toward black
        let bbs = [plain(vec2(10.0, 0.0), 0xFF_FFFFFF)];
        sw.project_sprites(&cam, &basis, &bbs);
        sw.depth.fill(100.0);
        sw.draw_sprites(&bbs, &RenderOpts::default());

        let px = sw.scratch[16 * 32 + 16];
        assert_ne!(px, 0xFF_FFFFFF);
        assert_ne!(px, 0xFF_202020); // but something was drawn
    }

    #[test]
    fn health_bar_draws_only_when_center_is_visible() {
        let cam = camera();
        let basis = cam.basis();
        let shape = ActorShape {
            kind: ActorKind::Tank,
            hp: 50,
            max_hp: 100,
        };
        let bbs = [Billboard {
            pos: vec2(4.0, 0.0),
            color: 0xFF_AA44AA,
            scale: 1.0,
            shape: Some(shape),
        }];

        let mut sw = Software::default();
        sw.begin_frame(32, 32);
        sw.project_sprites(&cam, &basis, &bbs);
        sw.depth.fill(10.0);
        sw.draw_sprites(&bbs, &no_fog());
        // green layer of the bar sits above the sprite's top row
        assert_eq!(sw.scratch[6 * 32 + 12], 0xFF_44EE44);

        // wall in front of the center column suppresses the bar
        sw.begin_frame(32, 32);
        sw.project_sprites(&cam, &basis, &bbs);
        sw.depth.fill(10.0);
        sw.depth[16] = 1.0;
        sw.draw_sprites(&bbs, &no_fog());
        assert_ne!(sw.scratch[6 * 32 + 12], 0xFF_44EE44);
    }

    #[test]
    fn health_cross_leaves_corner_columns_empty() {
        assert_eq!(silhouette(ActorKind::Health, 0.1), None);
        assert_eq!(silhouette(ActorKind::Health, 0.5), Some((0.1, 0.9)));
        assert_eq!(silhouette(ActorKind::Health, 0.25), Some((0.35, 0.65)));
    }

    #[test]
    fn grunt_head_band_is_taller_than_shoulders() {
        let (head_top, _) = silhouette(ActorKind::Grunt, 0.5).unwrap();
        let (shoulder_top, _) = silhouette(ActorKind::Grunt, 0.2).unwrap();
        assert!(head_top < shoulder_top);
    }
}
