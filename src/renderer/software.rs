//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * One ray per `column_width` screen columns; every hit of a ray is drawn
//!   far-to-near so door gaps (magenta texels) show what lies behind.
//! * Keeps one depth value per ray (nearest opaque wall, fisheye corrected)
//!   for sprite occlusion.
//! ---------------------------------------------------------------------------

mod minimap;
mod planes;
mod sky;
mod sprites;
mod walls;

pub use minimap::MapArea;
pub use walls::{WallSlice, fisheye_factor, project_wall, texture_column};

use crate::{
    config::RenderConfig,
    engine::raycast::RayCaster,
    renderer::{Renderer, Rgba},
    world::{Camera, Grid, Sprite, Texture, TextureBank},
};

/// Clear colour (dark grey) visible where nothing is drawn.
pub const CLEAR: Rgba = 0x00_20_20_20;

/// Column-by-column software renderer.
pub struct Software {
    pub scratch: Vec<Rgba>,
    /// Per-ray distance to the nearest opaque wall; `INFINITY` = none.
    pub depth: Vec<f32>,
    config: RenderConfig,
    caster: RayCaster,

    pub width: usize,
    pub height: usize,
    pub half_w: f32,
    pub half_h: f32,
    pub column_width: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.half_w = w as f32 * 0.5;
            self.half_h = h as f32 * 0.5;
            self.column_width = (w / self.config.ray_count).max(1);
            self.scratch.resize(w * h, 0);
            tracing::debug!(w, h, column_width = self.column_width, "frame buffer resized");
        }

        self.scratch.fill(CLEAR);
        self.depth.fill(f32::INFINITY);
    }

    fn draw_sky(&mut self, sky: &Texture, camera: &Camera) {
        self.sky_pass(sky, camera);
    }

    fn draw_world(&mut self, grid: &Grid, camera: &Camera, bank: &TextureBank) {
        self.wall_pass(grid, camera, bank);
    }

    fn draw_sprites(
        &mut self,
        sprites: &[Sprite],
        camera: &Camera,
        bank: &TextureBank,
        eye_height: f32,
    ) {
        self.sprite_pass(sprites, camera, bank, eye_height);
    }

    fn draw_minimap(&mut self, grid: &Grid, camera: &Camera) {
        let area = MapArea::fit(grid, self.width / 4, self.height / 4);
        self.draw_map(grid, camera, area);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        let caster = RayCaster::new(config.max_depth, config.vertical_shade);
        Self {
            scratch: Vec::new(),
            depth: vec![f32::INFINITY; config.ray_count],
            config,
            caster,
            width: 0,
            height: 0,
            half_w: 0.0,
            half_h: 0.0,
            column_width: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Screen columns covered by ray `r`, clipped to the buffer.
    #[inline]
    pub(crate) fn ray_columns(&self, r: usize) -> std::ops::Range<usize> {
        let x0 = r * self.column_width;
        x0.min(self.width)..(x0 + self.column_width).min(self.width)
    }

    /// Ray index that owns screen column `x`.
    #[inline]
    pub(crate) fn ray_of_column(&self, x: usize) -> usize {
        (x / self.column_width).min(self.config.ray_count - 1)
    }

    /// Paint one pixel in every column owned by ray `r`.
    #[inline(always)]
    pub(crate) fn put_ray_pixel(&mut self, r: usize, y: usize, colour: Rgba) {
        let cols = self.ray_columns(r);
        let row = y * self.width;
        self.scratch[row + cols.start..row + cols.end].fill(colour);
    }

    /// Integer Bresenham line, clipped to the buffer.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.width as i32).contains(&x0) && (0..self.height as i32).contains(&y0) {
                self.scratch[y0 as usize * self.width + x0 as usize] = col;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Solid axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Rgba) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = ((x + w).max(0) as usize).min(self.width);
        let y1 = ((y + h).max(0) as usize).min(self.height);
        if x0 >= x1 {
            return;
        }
        for yy in y0..y1 {
            let row = yy * self.width;
            self.scratch[row + x0..row + x1].fill(col);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
