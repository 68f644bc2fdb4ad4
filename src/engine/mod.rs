#[allow(clippy::module_inception)]
mod engine;
pub mod raycast;

pub use engine::{Engine, EngineError, FrameError};
pub use raycast::{RayCast, RayCaster, RayHit, Side};
