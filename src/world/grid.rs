use std::ops::RangeInclusive;

use bitflags::bitflags;
use glam::Vec2;
use thiserror::Error;

/// Raw cell value. `0` = open, `N > 0` = texture `N - 1`.
pub type TileValue = u16;

/// Row-major index into one of the layers.
pub type TileIndex = usize;

/// Value written by interaction code to clear a cell.
pub const OPEN: TileValue = 0;

/// Door values used by the reference levels.
pub const DEFAULT_DOORS: RangeInclusive<TileValue> = 8..=17;

/// Which of the three parallel layers to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    Wall,
    Floor,
    Ceiling,
}

bitflags! {
    /// Classification of a wall value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        /// Anything but [`OPEN`]; blocks movement.
        const OCCUPIED    = 0x01;
        /// Stops rays.
        const SOLID       = 0x02;
        /// Door-range value: rays record it and keep going.
        const TRANSPARENT = 0x04;
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}×{height})")]
    ZeroSized { width: usize, height: usize },

    #[error("tile size must be positive and finite (got {0})")]
    BadTileSize(f32),

    #[error("{kind:?} layer has {len} cells, expected {expected}")]
    ShapeMismatch {
        kind: GridKind,
        len: usize,
        expected: usize,
    },

    #[error("tile index {index} outside {width}×{height} grid")]
    OutOfBounds {
        index: TileIndex,
        width: usize,
        height: usize,
    },
}

/// Wall, floor and ceiling layers of one level.
///
/// * The shape is fixed at construction; only cell *values* change.
/// * Layers are private: everything goes through [`Grid::tile_at`],
///   [`Grid::cell`] and [`Grid::set_cell`].
/// * Lookups outside the grid read as [`OPEN`].
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tile_size: f32,
    wall: Vec<TileValue>,
    floor: Vec<TileValue>,
    ceiling: Vec<TileValue>,
    doors: RangeInclusive<TileValue>,
}

impl Grid {
    /// Build a grid from three flat row-major layers of `width * height` cells.
    pub fn new(
        width: usize,
        height: usize,
        tile_size: f32,
        wall: Vec<TileValue>,
        floor: Vec<TileValue>,
        ceiling: Vec<TileValue>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSized { width, height });
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::BadTileSize(tile_size));
        }
        let expected = width * height;
        for (kind, layer) in [
            (GridKind::Wall, &wall),
            (GridKind::Floor, &floor),
            (GridKind::Ceiling, &ceiling),
        ] {
            if layer.len() != expected {
                return Err(GridError::ShapeMismatch {
                    kind,
                    len: layer.len(),
                    expected,
                });
            }
        }

        Ok(Self {
            width,
            height,
            tile_size,
            wall,
            floor,
            ceiling,
            doors: DEFAULT_DOORS,
        })
    }

    /// Replace the transparent (door) value range.
    pub fn with_doors(mut self, doors: RangeInclusive<TileValue>) -> Self {
        self.doors = doors;
        self
    }

    /*──────────────────────── dimensions ───────────────────────*/

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per cell edge.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /*──────────────────────── addressing ───────────────────────*/

    /// Integer tile coordinates of a world point (may lie outside the grid).
    #[inline]
    pub fn tile_coords(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.tile_size).floor() as i64,
            (p.y / self.tile_size).floor() as i64,
        )
    }

    /// Row-major index of the cell containing `p`, `None` outside the grid.
    pub fn tile_index(&self, p: Vec2) -> Option<TileIndex> {
        let (tx, ty) = self.tile_coords(p);
        if tx < 0 || ty < 0 || tx >= self.width as i64 || ty >= self.height as i64 {
            return None;
        }
        Some(ty as usize * self.width + tx as usize)
    }

    fn layer(&self, kind: GridKind) -> &[TileValue] {
        match kind {
            GridKind::Wall => &self.wall,
            GridKind::Floor => &self.floor,
            GridKind::Ceiling => &self.ceiling,
        }
    }

    /// Value of `kind` at world point `p`; [`OPEN`] outside the grid.
    #[inline]
    pub fn tile_at(&self, kind: GridKind, p: Vec2) -> TileValue {
        self.tile_index(p)
            .map(|idx| self.layer(kind)[idx])
            .unwrap_or(OPEN)
    }

    /// Value of `kind` at `index`; [`OPEN`] outside the grid.
    #[inline]
    pub fn cell(&self, kind: GridKind, index: TileIndex) -> TileValue {
        self.layer(kind).get(index).copied().unwrap_or(OPEN)
    }

    /// Mutation entry point for interaction / animation logic.
    ///
    /// Must only be called between frames.
    pub fn set_cell(
        &mut self,
        kind: GridKind,
        index: TileIndex,
        value: TileValue,
    ) -> Result<(), GridError> {
        let (width, height) = (self.width, self.height);
        let layer = match kind {
            GridKind::Wall => &mut self.wall,
            GridKind::Floor => &mut self.floor,
            GridKind::Ceiling => &mut self.ceiling,
        };
        let slot = layer.get_mut(index).ok_or(GridError::OutOfBounds {
            index,
            width,
            height,
        })?;
        *slot = value;
        Ok(())
    }

    /*──────────────────────── classification ───────────────────*/

    #[inline]
    pub fn is_transparent(&self, value: TileValue) -> bool {
        self.doors.contains(&value)
    }

    #[inline]
    pub fn is_solid(&self, value: TileValue) -> bool {
        value > OPEN && !self.is_transparent(value)
    }

    pub fn classify(&self, value: TileValue) -> TileFlags {
        let mut flags = TileFlags::empty();
        if value == OPEN {
            return flags;
        }
        flags |= TileFlags::OCCUPIED;
        if self.is_transparent(value) {
            flags |= TileFlags::TRANSPARENT;
        } else {
            flags |= TileFlags::SOLID;
        }
        flags
    }

    /// Opaque wall at world point `p`.
    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        self.is_solid(self.tile_at(GridKind::Wall, p))
    }

    /// Any wall value at `p`, closed doors included. Used for collision.
    #[inline]
    pub fn is_occupied_at(&self, p: Vec2) -> bool {
        self.tile_at(GridKind::Wall, p) != OPEN
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
