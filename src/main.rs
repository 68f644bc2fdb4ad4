//! Top-down 2-D viewer of the demo level.
//!
//! ```bash
//! cargo run --release --bin yaray_rs
//! ```
//!
//! Walk with W/S or ↑/↓, turn with A/D or ←/→, open doors with E.

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing_subscriber::EnvFilter;

use yaray_rs::{
    config::RenderConfig,
    demo,
    renderer::{MapArea, Renderer, Software},
    sim::{InputCmd, SIM_FPS, TicRunner},
};

const WIDTH: usize = 960;
const HEIGHT: usize = 640;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut grid = demo::level()?;
    let mut sim = TicRunner::new();
    demo::populate(&mut sim);

    // 10 % margin around the map
    let area = MapArea::fit(&grid, WIDTH * 9 / 10, HEIGHT * 9 / 10).centred(&grid, WIDTH, HEIGHT);
    tracing::info!(w = grid.width(), h = grid.height(), cell = area.cell, "map view");

    let mut renderer = Software::new(RenderConfig::default());
    let mut window = Window::new("Raycaster map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(SIM_FPS as usize);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut cmd = InputCmd::default();
        if window.is_key_down(Key::W) || window.is_key_down(Key::Up) {
            cmd.forward += 1.0;
        }
        if window.is_key_down(Key::S) || window.is_key_down(Key::Down) {
            cmd.forward -= 1.0;
        }
        if window.is_key_down(Key::A) || window.is_key_down(Key::Left) {
            cmd.turn += 1.0;
        }
        if window.is_key_down(Key::D) || window.is_key_down(Key::Right) {
            cmd.turn -= 1.0;
        }
        cmd.interact = window.is_key_pressed(Key::E, KeyRepeat::No);

        sim.set_input(cmd);
        sim.pump(&mut grid)?;

        renderer.begin_frame(WIDTH, HEIGHT);
        if let Some(camera) = sim.camera() {
            renderer.draw_map(&grid, &camera, area);
        }
        let mut presented = Ok(());
        renderer.end_frame(|fb, w, h| presented = window.update_with_buffer(fb, w, h));
        presented?;
    }
    Ok(())
}
