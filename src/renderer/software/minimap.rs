//! Top-down overview: one square per wall cell, the viewer as a dot and a
//! short heading line.

use crate::{
    renderer::{Rgba, software::Software},
    world::{Camera, Grid, GridKind, TileFlags},
};

const OCCUPIED: Rgba = 0x00_FF_FF_FF;
const EMPTY: Rgba = 0x00_00_00_00;
const VIEWER: Rgba = 0x00_00_FF_FF;

/// Viewer dot side, pixels.
const DOT: i32 = 4;
/// Heading line length, world units.
const HEADING_LEN: f32 = 20.0;

/// Where and how large the map is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapArea {
    pub x: i32,
    pub y: i32,
    /// Pixels per grid cell (≥ 1).
    pub cell: i32,
}

impl MapArea {
    /// Largest whole-pixel cell size that fits `w`×`h`, anchored at (0, 0).
    pub fn fit(grid: &Grid, w: usize, h: usize) -> Self {
        let cell = (w / grid.width()).min(h / grid.height()).max(1) as i32;
        Self { x: 0, y: 0, cell }
    }

    /// Same scale, centred inside a `w`×`h` frame.
    pub fn centred(self, grid: &Grid, w: usize, h: usize) -> Self {
        Self {
            x: (w as i32 - grid.width() as i32 * self.cell) / 2,
            y: (h as i32 - grid.height() as i32 * self.cell) / 2,
            ..self
        }
    }

    /// World → screen for a map point.
    #[inline]
    fn project(&self, grid: &Grid, wx: f32, wy: f32) -> (i32, i32) {
        let k = self.cell as f32 / grid.tile_size();
        (self.x + (wx * k) as i32, self.y + (wy * k) as i32)
    }
}

impl Software {
    /// Draw the wall layer and the viewer into `area`.
    pub fn draw_map(&mut self, grid: &Grid, camera: &Camera, area: MapArea) {
        // leave a one pixel gap between cells when there is room for it
        let gap = if area.cell > 2 { 1 } else { 0 };
        for cy in 0..grid.height() {
            for cx in 0..grid.width() {
                let value = grid.cell(GridKind::Wall, cy * grid.width() + cx);
                let colour = if grid.classify(value).contains(TileFlags::OCCUPIED) {
                    OCCUPIED
                } else {
                    EMPTY
                };
                self.fill_rect(
                    area.x + cx as i32 * area.cell + gap,
                    area.y + cy as i32 * area.cell + gap,
                    area.cell - 2 * gap,
                    area.cell - 2 * gap,
                    colour,
                );
            }
        }

        let pos = camera.pos();
        let (px, py) = area.project(grid, pos.x, pos.y);
        self.fill_rect(px - DOT / 2, py - DOT / 2, DOT, DOT, VIEWER);

        let tip = pos + camera.forward() * HEADING_LEN;
        let (tx, ty) = area.project(grid, tip.x, tip.y);
        self.draw_line(px, py, tx, ty, VIEWER);
    }
}
