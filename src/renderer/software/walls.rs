use std::f32::consts::{FRAC_PI_2, PI};

use crate::{
    engine::raycast::{RayHit, Side},
    renderer::software::Software,
    world::{Camera, Grid, TextureBank, normalize_angle},
};

/// Corrected distances are clamped to this before the perspective divide.
const MIN_DISTANCE: f32 = 1e-3;

/// Vertical extent of one wall hit on screen plus its texture walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    /// First screen row (≥ 0 once clipped).
    pub top: i32,
    /// Rows to draw.
    pub rows: i32,
    /// Texel row at `top`.
    pub tex_y0: f32,
    /// Texel rows per screen row.
    pub tex_step: f32,
}

impl WallSlice {
    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top + self.rows
    }
}

/// `cos(view − ray)`: turns radial distance into distance from the view plane.
#[inline]
pub fn fisheye_factor(view_angle: f32, ray_angle: f32) -> f32 {
    normalize_angle(view_angle - ray_angle).cos()
}

/// Project a wall at fisheye-corrected distance `corrected`.
///
/// Walls taller than the screen are clipped symmetrically: the texture walk
/// starts part-way down so only the middle of the texture is sampled.
pub fn project_wall(corrected: f32, tile: f32, screen_h: usize, tex_size: usize) -> WallSlice {
    let screen_h_f = screen_h as f32;
    let mut line_h = tile * screen_h_f / corrected.max(MIN_DISTANCE);
    let tex_step = tex_size as f32 / line_h;
    let mut tex_off = 0.0;
    if line_h > screen_h_f {
        tex_off = (line_h - screen_h_f) * 0.5;
        line_h = screen_h_f;
    }
    let top = (screen_h / 2) as i32 - ((line_h as i32) >> 1);
    WallSlice {
        top,
        rows: line_h.ceil() as i32,
        tex_y0: tex_off * tex_step,
        tex_step,
    }
}

/// Texel column for a hit: position along the crossed edge, mirrored on
/// faces seen from the south or west so textures never read backwards.
pub fn texture_column(hit: &RayHit, ray_angle: f32, tile: f32, tex_size: usize) -> usize {
    let (along, flip) = match hit.side {
        Side::Horizontal => (hit.point.x, ray_angle > PI),
        Side::Vertical => (hit.point.y, FRAC_PI_2 < ray_angle && ray_angle < 3.0 * FRAC_PI_2),
    };
    let frac = (along - (along / tile).floor() * tile) / tile;
    let tx = ((frac * tex_size as f32) as usize).min(tex_size - 1);
    if flip { tex_size - 1 - tx } else { tx }
}

impl Software {
    /// Cast every ray and composite its column: floor/ceiling outside the
    /// nearest opaque wall, then all hits far → near.
    pub(crate) fn wall_pass(&mut self, grid: &Grid, camera: &Camera, bank: &TextureBank) {
        let view = camera.angle();
        let half_fov = self.config.fov() * 0.5;
        let step = self.config.ray_step();
        let tile = grid.tile_size();
        let tex_size = bank.side();

        for r in 0..self.config.ray_count {
            let ray_angle = normalize_angle(view + half_fov - r as f32 * step);
            let cast = self.caster.cast(grid, camera.pos(), ray_angle);
            let fisheye = fisheye_factor(view, ray_angle);

            // rows below this belong to the floor, mirrored rows to the ceiling
            let wall_bottom = match cast.nearest_opaque() {
                Some(hit) => {
                    let corrected = hit.distance * fisheye;
                    self.depth[r] = corrected;
                    project_wall(corrected, tile, self.height, tex_size).bottom()
                }
                None => {
                    self.depth[r] = f32::INFINITY;
                    (self.height / 2) as i32
                }
            };

            self.draw_planes(r, ray_angle, fisheye, wall_bottom, grid, camera, bank);

            for hit in &cast.hits {
                self.draw_wall_slice(r, hit, ray_angle, fisheye, tile, bank);
            }
        }
    }

    /// Draw one hit into ray `r`'s columns, skipping sentinel texels.
    fn draw_wall_slice(
        &mut self,
        r: usize,
        hit: &RayHit,
        ray_angle: f32,
        fisheye: f32,
        tile: f32,
        bank: &TextureBank,
    ) {
        let tex = bank.texture_or_missing(hit.texture);
        let tex_size = tex.w;
        let slice = project_wall(hit.distance * fisheye, tile, self.height, tex_size);
        let u = texture_column(hit, ray_angle, tile, tex_size);

        let y0 = slice.top.max(0);
        let y1 = slice.bottom().min(self.height as i32);
        let mut tex_y = slice.tex_y0 + (y0 - slice.top) as f32 * slice.tex_step;

        for y in y0..y1 {
            let v = (tex_y as usize).min(tex.h - 1);
            let texel = tex.texel(u, v);
            if !texel.is_sentinel() {
                self.put_ray_pixel(r, y as usize, texel.shaded(hit.shade).to_rgba());
            }
            tex_y += slice.tex_step;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        engine::raycast::RayCaster,
        renderer::{Renderer, software::CLEAR},
        world::{Rgb, Texture},
    };
    use glam::vec2;

    fn small_config() -> RenderConfig {
        RenderConfig {
            screen_width: 240,
            screen_height: 160,
            ..Default::default()
        }
    }

    /// Red (0) and all-sentinel (1) textures.
    fn red_and_magenta() -> TextureBank {
        let mut bank = TextureBank::new(32).unwrap();
        bank.insert("RED", Texture::solid("RED", 32, Rgb(255, 0, 0))).unwrap();
        bank.insert("HOLE", Texture::solid("HOLE", 32, Rgb::SENTINEL)).unwrap();
        bank
    }

    /// 8×8 room bordered with `border`, no floor or ceiling.
    fn room(border: u16) -> Grid {
        let n = 8;
        let mut wall = vec![0; n * n];
        for y in 0..n {
            for x in 0..n {
                if x == 0 || y == 0 || x == n - 1 || y == n - 1 {
                    wall[y * n + x] = border;
                }
            }
        }
        Grid::new(n, n, 64.0, wall, vec![0; n * n], vec![0; n * n]).unwrap()
    }

    #[test]
    fn fisheye_is_identity_on_the_view_axis() {
        assert_eq!(fisheye_factor(1.3, 1.3), 1.0);

        // viewer faces a flat wall head-on: centre ray distance is unchanged
        let grid = room(1);
        let view = std::f32::consts::FRAC_PI_2;
        let hit = *RayCaster::default()
            .cast(&grid, vec2(256.0, 300.0), view)
            .nearest_opaque()
            .unwrap();
        let corrected = hit.distance * fisheye_factor(view, view);
        assert!((corrected - (300.0 - 64.0)).abs() < 1e-3);

        // an off-axis ray to the same wall corrects back to the same plane distance
        let off = view + 0.2;
        let slanted = *RayCaster::default()
            .cast(&grid, vec2(256.0, 300.0), off)
            .nearest_opaque()
            .unwrap();
        assert!(slanted.distance > corrected);
        assert!((slanted.distance * fisheye_factor(view, off) - 236.0).abs() < 1e-2);
    }

    #[test]
    fn close_walls_clip_symmetrically() {
        let s = project_wall(32.0, 64.0, 160, 32);
        // unclipped height 320 px, screen 160: sample the middle half
        assert_eq!(s.top, 0);
        assert_eq!(s.rows, 160);
        assert!((s.tex_step - 0.1).abs() < 1e-6);
        assert!((s.tex_y0 - 8.0).abs() < 1e-4);

        let far = project_wall(128.0, 64.0, 160, 32);
        assert_eq!(far.rows, 80);
        assert_eq!(far.top, 40);
        assert_eq!(far.tex_y0, 0.0);
        assert_eq!(far.bottom(), 120);
    }

    #[test]
    fn zero_distance_does_not_poison_the_slice() {
        let s = project_wall(0.0, 64.0, 160, 32);
        assert!(s.tex_y0.is_finite());
        assert!(s.tex_step.is_finite());
        assert_eq!(s.rows, 160);
    }

    #[test]
    fn texture_columns_flip_on_south_and_west_faces() {
        let hit = RayHit {
            tile: 0,
            value: 1,
            texture: 0,
            distance: 10.0,
            point: vec2(64.0 + 16.0, 63.9),
            transparent: false,
            shade: 1.0,
            side: Side::Horizontal,
        };
        // looking up: fraction 0.25 → column 8
        assert_eq!(texture_column(&hit, 1.0, 64.0, 32), 8);
        // looking down: mirrored
        assert_eq!(texture_column(&hit, 4.0, 64.0, 32), 23);

        let vert = RayHit {
            point: vec2(128.0, 64.0 * 3.0 + 48.0),
            side: Side::Vertical,
            ..hit
        };
        assert_eq!(texture_column(&vert, 0.1, 64.0, 32), 24);
        assert_eq!(texture_column(&vert, PI, 64.0, 32), 7);
    }

    #[test]
    fn sentinel_texture_leaves_column_untouched() {
        let grid = room(2); // texture 1 = all magenta
        let bank = red_and_magenta();
        let camera = Camera::new(vec2(256.0, 256.0), 1.0);

        let mut sw = Software::new(small_config());
        sw.begin_frame(240, 160);
        const SKY: u32 = 0x00_3366CC;
        sw.scratch.fill(SKY);
        sw.draw_world(&grid, &camera, &bank);

        assert!(sw.scratch.iter().all(|&p| p == SKY));
        // the wall still counts as opaque for occlusion
        assert!(sw.depth.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn red_walls_are_drawn_and_vertical_faces_shaded() {
        let grid = room(1);
        let bank = red_and_magenta();
        let mut sw = Software::new(small_config());
        sw.begin_frame(240, 160);

        // facing up: centre ray hits a horizontal face at full brightness
        let camera = Camera::new(vec2(256.0, 256.0), std::f32::consts::FRAC_PI_2);
        sw.draw_world(&grid, &camera, &bank);
        let centre = sw.scratch[80 * 240 + 120];
        assert_eq!(centre, Rgb(255, 0, 0).to_rgba());

        // facing right: centre ray hits a vertical face at half brightness
        let camera = Camera::new(vec2(256.0, 256.0), 0.0);
        sw.begin_frame(240, 160);
        sw.draw_world(&grid, &camera, &bank);
        assert_eq!(sw.scratch[80 * 240 + 120], Rgb(127, 0, 0).to_rgba());
        // no floor/ceiling cells: outside the wall stays clear
        assert_eq!(sw.scratch[0], CLEAR);
        assert_eq!(sw.scratch[159 * 240], CLEAR);
    }

    #[test]
    fn depth_buffer_holds_corrected_opaque_distance() {
        let grid = room(1);
        let bank = red_and_magenta();
        let mut sw = Software::new(small_config());
        sw.begin_frame(240, 160);
        let camera = Camera::new(vec2(256.0, 300.0), std::f32::consts::FRAC_PI_2);
        sw.draw_world(&grid, &camera, &bank);
        // centre ray (60 of 120) looks straight at the top wall 236 units away
        assert!((sw.depth[60] - 236.0).abs() < 1e-2, "{}", sw.depth[60]);
    }
}
