//! Yet Another Raycaster: grid DDA walls, inverse-perspective floors and
//! billboard sprites, composed column by column on the CPU.

pub mod assets;
pub mod config;
pub mod demo;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
