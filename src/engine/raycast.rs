//! Ray ↔ grid intersection.
//!
//! Two independent sweeps walk the grid lines a ray crosses:
//!
//! * the *horizontal* sweep visits lines `y = k · tile` (shade 1.0),
//! * the *vertical* sweep visits lines `x = k · tile` (shade `vertical_shade`).
//!
//! Each sweep stops at its first solid cell or after `max_depth` steps.
//! Door cells are recorded and stepped through, so one ray may return a
//! short chain of hits. The merged list is sorted far → near for the
//! painter's pass.

use glam::{Vec2, vec2};
use smallvec::SmallVec;

use crate::world::{Grid, GridKind, TextureId, TileIndex, TileValue};

/// |sin| or |cos| below this counts as axis-aligned: that sweep is skipped
/// before any tangent is formed.
pub const AXIS_EPSILON: f32 = 1e-6;

/// Distance by which seeds on the "far" side of a grid line are pulled back
/// so the point lands inside the owning cell.
const EDGE_EPSILON: f32 = 1e-4;

/// Which family of grid lines produced the hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Crossing of `y = k · tile` (north/south faces).
    Horizontal,
    /// Crossing of `x = k · tile` (east/west faces).
    Vertical,
}

/// One wall or door crossing along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub tile: TileIndex,
    pub value: TileValue,
    pub texture: TextureId,
    /// Euclidean distance from the ray origin to `point` (not fisheye corrected).
    pub distance: f32,
    /// Hit point. Solid hits lie inside `tile`. Door hits are pushed half a
    /// step along the ray: they stay in the door's row (horizontal side) or
    /// column (vertical side), but an oblique ray may carry them into the
    /// neighbouring cell along that row or column.
    pub point: Vec2,
    pub transparent: bool,
    pub shade: f32,
    pub side: Side,
}

/// Hits are few: one solid per sweep plus the odd door.
pub type HitList = SmallVec<[RayHit; 4]>;

/// Everything one ray found.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayCast {
    /// Sorted by descending distance (draw order).
    pub hits: HitList,
}

impl RayCast {
    /// Closest hit of any kind.
    #[inline]
    pub fn nearest(&self) -> Option<&RayHit> {
        self.hits.last()
    }

    /// Closest hit that stops the view; defines wall depth for the column.
    pub fn nearest_opaque(&self) -> Option<&RayHit> {
        self.hits.iter().rev().find(|h| !h.transparent)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Parameters that stay fixed for a whole frame.
#[derive(Clone, Copy, Debug)]
pub struct RayCaster {
    pub max_depth: u32,
    pub vertical_shade: f32,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            max_depth: 8,
            vertical_shade: 0.5,
        }
    }
}

/// Seed and per-step offset for one sweep.
struct Sweep {
    start: Vec2,
    step: Vec2,
    side: Side,
    shade: f32,
}

impl RayCaster {
    pub fn new(max_depth: u32, vertical_shade: f32) -> Self {
        Self {
            max_depth,
            vertical_shade,
        }
    }

    /// Cast one ray from `origin` along `angle` (radians, normalised).
    ///
    /// Pure: identical inputs give identical hit lists.
    pub fn cast(&self, grid: &Grid, origin: Vec2, angle: f32) -> RayCast {
        let (sin, cos) = angle.sin_cos();
        let mut hits = HitList::new();

        if let Some(sweep) = horizontal_sweep(grid.tile_size(), origin, sin, cos) {
            self.walk(grid, origin, sweep, &mut hits);
        }
        if let Some(sweep) = self.vertical_sweep(grid.tile_size(), origin, sin, cos) {
            self.walk(grid, origin, sweep, &mut hits);
        }

        hits.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        RayCast { hits }
    }

    fn vertical_sweep(&self, tile: f32, origin: Vec2, sin: f32, cos: f32) -> Option<Sweep> {
        if cos.abs() < AXIS_EPSILON {
            // straight up or down: never crosses x = k · tile
            return None;
        }
        let tan = sin / cos;
        let (x, dx) = if cos > 0.0 {
            // looking right
            ((origin.x / tile).floor() * tile + tile, tile)
        } else {
            // looking left
            (just_below((origin.x / tile).floor() * tile), -tile)
        };
        let y = (origin.x - x) * tan + origin.y;
        Some(Sweep {
            start: vec2(x, y),
            step: vec2(dx, -dx * tan),
            side: Side::Vertical,
            shade: self.vertical_shade,
        })
    }

    /// Step one sweep through the grid, pushing every non-open cell it meets.
    fn walk(&self, grid: &Grid, origin: Vec2, sweep: Sweep, hits: &mut HitList) {
        let mut p = sweep.start;
        for _ in 0..self.max_depth {
            let Some(tile) = grid.tile_index(p) else {
                p += sweep.step;
                continue;
            };
            let value = grid.cell(GridKind::Wall, tile);
            if value > 0 {
                let transparent = grid.is_transparent(value);
                // doors render halfway to the next crossing, centred in the cell
                let point = if transparent { p + sweep.step * 0.5 } else { p };
                hits.push(RayHit {
                    tile,
                    value,
                    texture: value - 1,
                    distance: origin.distance(point),
                    point,
                    transparent,
                    shade: sweep.shade,
                    side: sweep.side,
                });
                if !transparent {
                    return;
                }
            }
            p += sweep.step;
        }
    }
}

fn horizontal_sweep(tile: f32, origin: Vec2, sin: f32, cos: f32) -> Option<Sweep> {
    if sin.abs() < AXIS_EPSILON {
        // straight left or right: never crosses y = k · tile
        return None;
    }
    let a_tan = cos / sin;
    let (y, dy) = if sin > 0.0 {
        // looking up the map (towards smaller y)
        (just_below((origin.y / tile).floor() * tile), -tile)
    } else {
        // looking down
        ((origin.y / tile).floor() * tile + tile, tile)
    };
    let x = (origin.y - y) * a_tan + origin.x;
    Some(Sweep {
        start: vec2(x, y),
        step: vec2(-dy * a_tan, dy),
        side: Side::Horizontal,
        shade: 1.0,
    })
}

/// A coordinate strictly below grid line `line`, far enough to survive f32
/// rounding at large coordinates.
#[inline]
fn just_below(line: f32) -> f32 {
    line - EDGE_EPSILON.max(line.abs() * f32::EPSILON * 4.0)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
