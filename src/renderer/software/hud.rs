//! Screen-space overlays: crosshair, muzzle flash, status bars, minimap.
//!
//! Drawn straight into the finished frame after the 3-D view; sized
//! relative to the current render resolution so the adaptive scaler keeps
//! them readable.

use crate::{
    renderer::software::{Software, sprites::Billboard, walls::wall_colors},
    sim::{DASH_COOLDOWN, Player, Weapon},
    world::{Camera, TileGrid},
};

const MINIMAP_VIEW_RADIUS: i32 = 12; // tiles visible around the player

impl Software {
    pub(crate) fn draw_crosshair(&mut self, camera: &Camera) {
        let w = self.width as i32;
        let h = self.height as i32;
        let cx = w / 2;
        let cy = camera.horizon(self.height).clamp(0, h - 1);

        let size = (h / 80).max(4);
        let gap = (size * 3 / 5).max(2);
        let col = 0xFF_FFFFFF;

        self.draw_line(cx, cy - size - gap, cx, cy - gap, col);
        self.draw_line(cx, cy + gap, cx, cy + size + gap, col);
        self.draw_line(cx - size - gap, cy, cx - gap, cy, col);
        self.draw_line(cx + gap, cy, cx + size + gap, cy, col);
    }

    pub(crate) fn draw_status_bars(&mut self, player: &Player, weapon: &Weapon) {
        let w = self.width as i32;
        let h = self.height as i32;
        let cx = w / 2;

        if weapon.muzzle_flash > 0.0 {
            let flash = h / 8;
            let a = (weapon.muzzle_flash / 0.05).min(1.0) * 0.6;
            self.blend_rect(cx - flash / 2, h - flash, flash, flash, 0xFF_FFC832, a);
        }

        if player.dash_cooldown > 0.0 {
            let bar_w = w * 15 / 100;
            let bar_h = (h / 120).max(4);
            let bar_x = cx - bar_w / 2;
            let bar_y = h * 85 / 100;
            let fill = 1.0 - player.dash_cooldown / DASH_COOLDOWN;

            self.blend_rect(bar_x, bar_y, bar_w, bar_h, 0xFF_FFFFFF, 0.2);
            self.blend_rect(
                bar_x,
                bar_y,
                (bar_w as f32 * fill) as i32,
                bar_h,
                0xFF_64C8FF,
                0.7,
            );
        }

        // player health, bottom-left
        let bar_w = w / 5;
        let bar_h = (h / 80).max(6);
        let bar_x = w * 2 / 100;
        let bar_y = h - bar_h - h * 2 / 100;
        let fill = (player.hp as f32 / 100.0).max(0.0);

        self.blend_rect(bar_x, bar_y, bar_w, bar_h, 0xFF_FFFFFF, 0.15);
        let (fg, a) = if fill > 0.3 {
            (0xFF_32DC32, 0.8)
        } else {
            (0xFF_DC3232, 0.9)
        };
        self.blend_rect(bar_x, bar_y, (bar_w as f32 * fill) as i32, bar_h, fg, a);
    }

    /// Top-right tile map centred on the player, with billboard dots and a
    /// facing line.
    pub(crate) fn draw_minimap(
        &mut self,
        player: &Player,
        grid: &TileGrid,
        billboards: &[Billboard],
    ) {
        let w = self.width as i32;
        let h = self.height as i32;
        let cell = (h / 120).max(3);
        let r = MINIMAP_VIEW_RADIUS;
        let size = cell * r * 2;
        let map_x = w - size - w / 100;
        let map_y = h / 100;

        self.blend_rect(map_x, map_y, size, size, 0xFF_000000, 0.5);

        let center_x = player.pos.x.floor() as i32;
        let center_y = player.pos.y.floor() as i32;

        for dy in -r..r {
            for dx in -r..r {
                let tile = grid.tile(center_x + dx, center_y + dy);
                if tile > 0 && grid.is_wall(center_x + dx, center_y + dy) {
                    self.fill_rect(
                        map_x + (dx + r) * cell,
                        map_y + (dy + r) * cell,
                        cell,
                        cell,
                        wall_colors(tile).0,
                    );
                }
            }
        }

        // actor and projectile dots
        for bb in billboards {
            let ex = map_x + ((bb.pos.x - center_x as f32 + r as f32) * cell as f32) as i32;
            let ey = map_y + ((bb.pos.y - center_y as f32 + r as f32) * cell as f32) as i32;
            if ex < map_x || ex > map_x + size || ey < map_y || ey > map_y + size {
                continue;
            }
            if bb.shape.is_some() {
                self.fill_rect(ex - 1, ey - 1, 3, 3, bb.color);
            } else {
                self.fill_rect(ex, ey, 2, 2, bb.color);
            }
        }

        // player marker with a facing line
        let pcx = map_x + r * cell;
        let pcy = map_y + r * cell;
        self.fill_rect(pcx - 2, pcy - 2, 4, 4, 0xFF_00FF00);
        let dir_len = (cell * 2) as f32;
        self.draw_line(
            pcx,
            pcy,
            pcx + (player.yaw.cos() * dir_len) as i32,
            pcy + (player.yaw.sin() * dir_len) as i32,
            0xFF_00FF00,
        );
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

    #[test]
    fn crosshair_marks_the_horizon_center() {
        let mut sw = Software::default();
        sw.begin_frame(80, 80);
        let camera = Camera::new(vec2(0.0, 0.0), 0.0, FRAC_PI_2);
        sw.draw_crosshair(&camera);

        // a white pixel on the vertical arm above the center
        let cx = 40;
        let cy = 40;
        let gap = 2;
        assert_eq!(sw.scratch[(cy - gap - 1) as usize * 80 + cx as usize], 0xFF_FFFFFF);
        // the gap itself stays clear
        assert_eq!(sw.scratch[cy as usize * 80 + cx as usize], 0xFF_202020);
    }

    #[test]
    fn minimap_paints_walls_near_the_player() {
        let mut cells = vec![0u16; 64];
        for i in 0..8 {
            cells[i] = 1; // north wall row
        }
        let grid = TileGrid::new(8, 8, cells).unwrap();
        let player = Player::new(vec2(4.0, 4.0), 0.0);

        let mut sw = Software::default();
        sw.begin_frame(240, 240);
        sw.draw_minimap(&player, &grid, &[]);

        // some minimap pixel carries the wall tile tone
        let wall_tone = wall_colors(1).0;
        assert!(sw.scratch.iter().any(|&p| p == wall_tone));
        // player marker present
        assert!(sw.scratch.iter().any(|&p| p == 0xFF_00FF00));
    }

    #[test]
    fn low_health_switches_the_bar_to_red() {
        let mut sw = Software::default();
        sw.begin_frame(100, 100);
        let mut player = Player::new(vec2(0.0, 0.0), 0.0);
        player.hp = 10;
        let weapon = Weapon::default();
        sw.draw_status_bars(&player, &weapon);

        // red-ish blended pixels in the bottom-left bar region
        let bar_y = 100 - 6 - 2;
        let px = sw.scratch[bar_y * 100 + 3];
        let red = px >> 16 & 0xFF;
        let green = px >> 8 & 0xFF;
        assert!(red > green);
    }
}
