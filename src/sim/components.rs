use glam::Vec2;

use crate::world::TextureId;

/// World-space position, grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Facing, radians in `[0, 2π)`; `π/2` looks towards smaller Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f32);

/// Drawn as a billboard sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    /// Height of the sprite's base above the floor.
    pub z: f32,
    pub texture: TextureId,
}

/// Marker for the entity the camera follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// One tic of player intent, built by the host from its input device.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub turn: f32,    // –1 … +1  (+ = left)
    pub strafe: f32,  // –1 … +1  (+ = right)
    pub interact: bool,
}
