use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use yaray_rs::{
    assets,
    config::RenderConfig,
    demo,
    engine::Engine,
    sim::{InputCmd, SIM_FPS, TicRunner},
    world::TextureBank,
};

const SKY_W: usize = 512;
const SKY_H: usize = 128;

/// First-person software view of the demo level.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML render configuration; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// PPM atlas: a vertical strip of square textures, tile value N = block N-1.
    #[arg(long)]
    atlas: Option<PathBuf>,

    /// PPM panorama covering the full circle.
    #[arg(long)]
    skybox: Option<PathBuf>,

    /// Show the top-down overlay in the corner.
    #[arg(long)]
    minimap: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    config.minimap |= args.minimap;
    demo::fit_config(&mut config);

    let bank = match &args.atlas {
        Some(path) => {
            let atlas = assets::load(path)
                .with_context(|| format!("loading atlas {}", path.display()))?;
            TextureBank::from_atlas(&atlas, config.texture_size)?
        }
        None => demo::textures(config.texture_size)?,
    };
    let sky = match &args.skybox {
        Some(path) => {
            assets::load(path).with_context(|| format!("loading skybox {}", path.display()))?
        }
        None => demo::sky(SKY_W, SKY_H),
    };

    let (w, h) = (config.screen_width, config.screen_height);
    let mut engine = Engine::software(config, bank)?;
    engine.set_grid(demo::level()?);
    engine.set_sky(Some(sky));

    let mut sim = TicRunner::new();
    demo::populate(&mut sim);
    tracing::info!(textures = engine.bank().len(), w, h, "demo level ready");

    let mut win = Window::new("Raycaster Software Render", w, h, WindowOptions::default())?;
    win.set_target_fps(SIM_FPS as usize);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        sim.set_input(read_input(&win));
        let grid = engine.grid_mut().context("level not loaded")?;
        sim.pump(grid)?;
        if let Some(camera) = sim.camera() {
            engine.set_camera(camera);
        }

        let sprites = sim.sprites();
        let mut presented = Ok(());
        engine.render_frame(&sprites, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = win.update_with_buffer(fb, w, h);
        })?;
        presented?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            tracing::info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// W/S or ↑/↓ walk, A/D or ←/→ turn, Shift turns those into strafes, E uses.
fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();

    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }

    let left = win.is_key_down(Key::Left) || win.is_key_down(Key::A);
    let right = win.is_key_down(Key::Right) || win.is_key_down(Key::D);
    let shift = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
    let axis = right as i32 as f32 - left as i32 as f32;
    if shift {
        cmd.strafe = axis;
    } else {
        cmd.turn = -axis;
    }

    cmd.interact = win.is_key_pressed(Key::E, KeyRepeat::No);
    cmd
}
