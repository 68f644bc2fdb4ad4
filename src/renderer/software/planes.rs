//! Floor and ceiling texels by inverse perspective mapping.
//!
//! For screen row `y` below the horizon, `dy = y + ½ − H/2` rows separate it
//! from the horizon; the floor point it shows lies `K · tile / dy` units
//! ahead of the viewer along the ray (divided by the fisheye factor so the
//! floor meets the corrected walls). The ceiling is the same point mirrored
//! about the horizon.

use glam::{Vec2, vec2};

use crate::{
    renderer::software::Software,
    world::{Camera, Grid, GridKind, OPEN, TextureBank},
};

/// World-space point seen `dy` rows below the horizon along `ray_angle`.
#[inline]
pub fn floor_point(origin: Vec2, ray_angle: f32, fisheye: f32, dy: f32, k: f32, tile: f32) -> Vec2 {
    let (sin, cos) = ray_angle.sin_cos();
    let reach = k * tile / dy / fisheye;
    origin + vec2(cos, -sin) * reach
}

impl Software {
    /// Paint floor rows from `wall_bottom` (never above the horizon) down,
    /// and their mirrored ceiling rows, for ray `r`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw_planes(
        &mut self,
        r: usize,
        ray_angle: f32,
        fisheye: f32,
        wall_bottom: i32,
        grid: &Grid,
        camera: &Camera,
        bank: &TextureBank,
    ) {
        let h = self.height as i32;
        let start = wall_bottom.max(h / 2);
        let tile = grid.tile_size();
        let texels_per_unit = bank.side() as f32 / tile;
        let k = self.config.floor_k();

        for y in start..h {
            let dy = y as f32 + 0.5 - self.half_h;
            let p = floor_point(camera.pos(), ray_angle, fisheye, dy, k, tile);
            // outside the map: nothing to sample
            let Some(cell) = grid.tile_index(p) else {
                continue;
            };
            let t = p * texels_per_unit;
            let (u, v) = (t.x.floor() as i32, t.y.floor() as i32);

            let floor = grid.cell(GridKind::Floor, cell);
            if floor != OPEN {
                let texel = bank.texture_or_missing(floor - 1).texel_wrapped(u, v);
                if !texel.is_sentinel() {
                    self.put_ray_pixel(r, y as usize, texel.to_rgba());
                }
            }

            let ceiling = grid.cell(GridKind::Ceiling, cell);
            if ceiling != OPEN {
                let texel = bank.texture_or_missing(ceiling - 1).texel_wrapped(u, v);
                if !texel.is_sentinel() {
                    self.put_ray_pixel(r, (h - 1 - y) as usize, texel.to_rgba());
                }
            }
        }
    }
}
