use glam::Vec2;

use super::texture::TextureId;

/// Point billboard read by the sprite pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    /// Height of the sprite's base above the floor, world units.
    pub z: f32,
    pub texture: TextureId,
}

impl Sprite {
    pub fn new(pos: Vec2, z: f32, texture: TextureId) -> Self {
        Self { pos, z, texture }
    }
}
