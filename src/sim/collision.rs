//! Grid collision for a point actor and door interaction.
//!
//! Each axis of a move is tested on its own, so walking diagonally into a
//! wall keeps the parallel component and the actor slides along it.

use glam::{Vec2, vec2};

use crate::world::{Grid, GridError, GridKind, OPEN, TileIndex};

/// How far ahead of the actor a wall blocks, per axis.
pub const PROBE_RADIUS: f32 = 10.0;

/// Reach of the "use" action.
pub const USE_RANGE: f32 = 25.0;

/// What the caller gets back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Move `pos` by `delta`, refusing any axis whose leading probe lands in an
/// occupied cell (closed doors included).
pub fn try_move(grid: &Grid, pos: Vec2, delta: Vec2, radius: f32) -> MoveResult {
    let mut out = MoveResult {
        pos,
        blocked_x: false,
        blocked_y: false,
    };

    if delta.x != 0.0 {
        let x = pos.x + delta.x;
        if grid.is_occupied_at(vec2(x + radius.copysign(delta.x), pos.y)) {
            out.blocked_x = true;
        } else {
            out.pos.x = x;
        }
    }

    if delta.y != 0.0 {
        let y = pos.y + delta.y;
        if grid.is_occupied_at(vec2(out.pos.x, y + radius.copysign(delta.y))) {
            out.blocked_y = true;
        } else {
            out.pos.y = y;
        }
    }

    out
}

/// Open the door (if any) `range` units ahead along each axis of `facing`.
///
/// Returns the cells that were cleared.
pub fn use_doors(
    grid: &mut Grid,
    pos: Vec2,
    facing: Vec2,
    range: f32,
) -> Result<Vec<TileIndex>, GridError> {
    let probes = [
        vec2(pos.x + facing.x * range, pos.y),
        vec2(pos.x, pos.y + facing.y * range),
    ];
    let mut opened = Vec::new();
    for p in probes {
        let Some(idx) = grid.tile_index(p) else {
            continue;
        };
        let value = grid.cell(GridKind::Wall, idx);
        if value != OPEN && grid.is_transparent(value) && !opened.contains(&idx) {
            grid.set_cell(GridKind::Wall, idx, OPEN)?;
            tracing::debug!(idx, value, "door opened");
            opened.push(idx);
        }
    }
    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5×5 room, door (9) in the middle of the right wall.
    #[rustfmt::skip]
    fn room() -> Grid {
        let wall = vec![
            1, 1, 1, 1, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 9,
            1, 0, 0, 0, 1,
            1, 1, 1, 1, 1,
        ];
        Grid::new(5, 5, 64.0, wall, vec![0; 25], vec![0; 25]).unwrap()
    }

    #[test]
    fn free_move_is_unchanged() {
        let r = try_move(&room(), vec2(160.0, 160.0), vec2(5.0, -3.0), PROBE_RADIUS);
        assert_eq!(r.pos, vec2(165.0, 157.0));
        assert!(!r.blocked_x && !r.blocked_y);
    }

    #[test]
    fn wall_blocks_and_slides() {
        // 4 units from the top wall's face at y = 64, moving up-right
        let r = try_move(&room(), vec2(160.0, 68.0), vec2(5.0, -5.0), PROBE_RADIUS);
        assert!(r.blocked_y);
        assert!(!r.blocked_x);
        assert_eq!(r.pos, vec2(165.0, 68.0));
    }

    #[test]
    fn closed_door_blocks_until_used() {
        let mut grid = room();
        let pos = vec2(250.0, 160.0);
        let r = try_move(&grid, pos, vec2(5.0, 0.0), PROBE_RADIUS);
        assert!(r.blocked_x);

        // facing +x: the door at (4, 2) is 14 units away
        let opened = use_doors(&mut grid, pos, vec2(1.0, 0.0), USE_RANGE).unwrap();
        assert_eq!(opened, vec![2 * 5 + 4]);
        assert_eq!(grid.cell(GridKind::Wall, 14), OPEN);

        let r = try_move(&grid, pos, vec2(5.0, 0.0), PROBE_RADIUS);
        assert!(!r.blocked_x);
    }

    #[test]
    fn solid_walls_and_far_doors_stay() {
        let mut grid = room();
        // solid wall ahead
        assert!(use_doors(&mut grid, vec2(160.0, 80.0), vec2(0.0, -1.0), USE_RANGE)
            .unwrap()
            .is_empty());
        // door out of reach
        assert!(use_doors(&mut grid, vec2(160.0, 160.0), vec2(1.0, 0.0), USE_RANGE)
            .unwrap()
            .is_empty());
        assert_eq!(grid.cell(GridKind::Wall, 14), 9);
    }
}
