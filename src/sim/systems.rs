use std::f32::consts::PI;

use glam::{Vec2, vec2};
use hecs::{Entity, World};

use super::{
    Angle, Billboard, InputCmd, Player, Position,
    collision::{PROBE_RADIUS, USE_RANGE, try_move, use_doors},
};
use crate::world::{Camera, Grid, GridError, Sprite, normalize_angle};

/// Radians turned per tic at full input.
pub const TURN_STEP: f32 = PI / 64.0;
/// World units walked per tic at full input.
pub const MOVE_STEP: f32 = 5.0;

/// Turn, walk with collision, then handle the "use" action.
pub fn player_input(
    world: &mut World,
    grid: &mut Grid,
    player: Entity,
    cmd: InputCmd,
) -> Result<(), GridError> {
    let Ok(mut q) = world.query_one::<(&mut Position, &mut Angle)>(player) else {
        return Ok(());
    };
    let Some((pos, ang)) = q.get() else {
        return Ok(());
    };

    /* 1. turn */
    if cmd.turn != 0.0 {
        ang.0 = normalize_angle(ang.0 + cmd.turn * TURN_STEP);
    }

    let (s, c) = ang.0.sin_cos();
    let fwd = vec2(c, -s);
    let right = vec2(s, c);

    /* 2. walk, one axis at a time */
    let delta = (fwd * cmd.forward + right * cmd.strafe) * MOVE_STEP;
    if delta != Vec2::ZERO {
        pos.0 = try_move(grid, pos.0, delta, PROBE_RADIUS).pos;
    }

    /* 3. doors */
    if cmd.interact {
        use_doors(grid, pos.0, fwd, USE_RANGE)?;
    }
    Ok(())
}

/// Billboards in spawn order, as the renderer consumes them.
pub fn collect_sprites(world: &World) -> Vec<Sprite> {
    let mut out: Vec<(Entity, Sprite)> = world
        .query::<(&Position, &Billboard)>()
        .iter()
        .map(|(e, (pos, bb))| (e, Sprite::new(pos.0, bb.z, bb.texture)))
        .collect();
    out.sort_by_key(|(e, _)| e.id());
    out.into_iter().map(|(_, s)| s).collect()
}

/// View-point of `player`, `None` if it lacks a position or facing.
pub fn camera_for(world: &World, player: Entity) -> Option<Camera> {
    let mut q = world.query_one::<(&Position, &Angle)>(player).ok()?;
    let (pos, ang) = q.get()?;
    Some(Camera::new(pos.0, ang.0))
}

/// First entity tagged [`Player`].
pub fn find_player(world: &World) -> Option<Entity> {
    world.query::<&Player>().iter().next().map(|(e, _)| e)
}
