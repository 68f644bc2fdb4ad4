use crate::{
    renderer::software::Software,
    world::{Camera, Sprite, TextureBank, TextureId},
};

/// A sprite after projection, ready for the column loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    /// Left edge, screen pixels (may be negative).
    pub x: f32,
    /// Top edge, screen pixels (may be negative).
    pub y: f32,
    /// Width and height on screen; billboards are square.
    pub size: f32,
    /// Forward distance from the view plane; compared against the depth buffer.
    pub depth: f32,
    pub texture: TextureId,
}

impl VisSprite {
    /// Screen columns covered, clipped to `0..width`.
    fn columns(&self, width: usize) -> std::ops::Range<usize> {
        let x0 = self.x.floor().max(0.0) as usize;
        let x1 = ((self.x + self.size).ceil().max(0.0) as usize).min(width);
        x0..x1.max(x0)
    }

    fn rows(&self, height: usize) -> std::ops::Range<usize> {
        let y0 = self.y.floor().max(0.0) as usize;
        let y1 = ((self.y + self.size).ceil().max(0.0) as usize).min(height);
        y0..y1.max(y0)
    }
}

impl Software {
    /// Screen x where the wall pass samples `bearing` (radians, + right of
    /// the view axis), so sprites and walls agree on which ray owns a column.
    #[inline]
    pub fn column_of_bearing(&self, bearing: f32) -> f32 {
        let half_fov = self.config.fov() * 0.5;
        (half_fov + bearing) / self.config.ray_step() * self.column_width as f32
    }

    /// Project one billboard; `None` when it is behind the viewer or
    /// entirely off screen.
    pub fn project_sprite(
        &self,
        sprite: &Sprite,
        camera: &Camera,
        eye_height: f32,
    ) -> Option<VisSprite> {
        let rel = camera.to_cam(sprite.pos);
        let forward = rel.y;
        if forward <= 0.0 {
            return None;
        }

        let h = self.height as f32;
        let size = (self.config.sprite_size * h / forward).min(self.config.sprite_max_scale());
        let centre_x = self.column_of_bearing(rel.x.atan2(forward));
        let bottom = self.half_h + (eye_height - sprite.z) * h / forward;

        let vis = VisSprite {
            x: centre_x - size * 0.5,
            y: bottom - size,
            size,
            depth: forward,
            texture: sprite.texture,
        };
        if vis.x + size <= 0.0 || vis.x >= self.width as f32 {
            return None;
        }
        Some(vis)
    }

    /// Project, sort far → near and draw every sprite against the depth
    /// buffer filled by the wall pass.
    pub(crate) fn sprite_pass(
        &mut self,
        sprites: &[Sprite],
        camera: &Camera,
        bank: &TextureBank,
        eye_height: f32,
    ) {
        let mut vis: Vec<VisSprite> = sprites
            .iter()
            .filter_map(|s| self.project_sprite(s, camera, eye_height))
            .collect();
        vis.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        tracing::trace!(total = sprites.len(), visible = vis.len(), "sprite pass");

        for v in &vis {
            self.draw_vis_sprite(v, bank);
        }
    }

    fn draw_vis_sprite(&mut self, vis: &VisSprite, bank: &TextureBank) {
        let tex = bank.texture_or_missing(vis.texture);
        let rows = vis.rows(self.height);
        let u_scale = tex.w as f32 / vis.size;
        let v_scale = tex.h as f32 / vis.size;

        for x in vis.columns(self.width) {
            // wall in front of the sprite for this column
            if vis.depth >= self.depth[self.ray_of_column(x)] {
                continue;
            }
            let u = (((x as f32 + 0.5 - vis.x) * u_scale) as usize).min(tex.w - 1);
            for y in rows.clone() {
                let v = (((y as f32 + 0.5 - vis.y) * v_scale) as usize).min(tex.h - 1);
                let texel = tex.texel(u, v);
                if !texel.is_sentinel() {
                    self.scratch[y * self.width + x] = texel.to_rgba();
                }
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
