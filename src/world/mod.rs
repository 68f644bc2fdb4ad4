mod camera;
mod grid;
mod helpers;
mod sprite;
mod texture;

pub use camera::Camera;

pub use grid::{
    DEFAULT_DOORS, Grid, GridError, GridKind, OPEN, TileFlags, TileIndex, TileValue,
};

pub use helpers::normalize_angle;

pub use sprite::Sprite;

pub use texture::{Rgb, Texture, TextureBank, TextureError, TextureId};
