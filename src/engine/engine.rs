use thiserror::Error;

use crate::{
    config::{ConfigError, RenderConfig},
    renderer::{Frame, Renderer, RendererExt, Rgba, Software},
    world::{Camera, Grid, GridKind, OPEN, Sprite, Texture, TextureBank},
};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("texture bank holds {bank}×{bank} textures, config expects {config}×{config}")]
    TextureSize { bank: usize, config: usize },
}

/// A frame cannot be produced without its two mandatory inputs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("no grid attached to the engine")]
    MissingGrid,

    #[error("no viewpoint attached to the engine")]
    MissingViewpoint,
}

/// Frame orchestrator: owns the renderer, the level grid, the view-point and
/// the texture store, and runs the passes in order once per tick.
///
/// Grid edits (doors) go through [`Engine::grid_mut`] between frames only.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    config: RenderConfig,
    grid: Option<Grid>,
    camera: Option<Camera>,
    bank: TextureBank,
    sky: Option<Texture>,
}

impl Engine<Software> {
    /// Engine with the CPU back-end built from the same config.
    pub fn software(config: RenderConfig, bank: TextureBank) -> Result<Self, EngineError> {
        Self::new(Software::new(config.clone()), config, bank)
    }
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, config: RenderConfig, bank: TextureBank) -> Result<Self, EngineError> {
        config.validate()?;
        if bank.side() != config.texture_size {
            return Err(EngineError::TextureSize {
                bank: bank.side(),
                config: config.texture_size,
            });
        }
        tracing::debug!(
            w = config.screen_width,
            h = config.screen_height,
            rays = config.ray_count,
            textures = bank.len(),
            "engine ready"
        );
        Ok(Self {
            renderer,
            config,
            grid: None,
            camera: None,
            bank,
            sky: None,
        })
    }

    /*──────────────────────── scene inputs ───────────────────────*/

    /// Attach a level; its door range is taken from the config.
    pub fn set_grid(&mut self, grid: Grid) {
        let grid = grid.with_doors(self.config.doors());
        self.warn_missing_textures(&grid);
        tracing::debug!(w = grid.width(), h = grid.height(), tile = grid.tile_size(), "grid attached");
        self.grid = Some(grid);
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        self.grid.as_mut()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn set_sky(&mut self, sky: Option<Texture>) {
        self.sky = sky;
    }

    pub fn bank(&self) -> &TextureBank {
        &self.bank
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /*──────────────────────── per tick ───────────────────────*/

    /// Sky, walls + floors/ceilings, sprites, optional map; then loan the
    /// finished buffer to `submit`.
    pub fn render_frame<F>(&mut self, sprites: &[Sprite], submit: F) -> Result<(), FrameError>
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let grid = self.grid.as_ref().ok_or(FrameError::MissingGrid)?;
        let camera = self.camera.as_ref().ok_or(FrameError::MissingViewpoint)?;

        let frame = Frame {
            grid,
            camera,
            bank: &self.bank,
            sky: self.sky.as_ref(),
            sprites,
            minimap: self.config.minimap,
        };
        tracing::trace!(pos = %camera.pos(), angle = camera.angle(), sprites = sprites.len(), "frame");
        self.renderer.draw_frame(
            self.config.screen_width,
            self.config.screen_height,
            &frame,
            submit,
        );
        Ok(())
    }

    /// Cell values pointing past the texture store draw as a checkerboard.
    fn warn_missing_textures(&self, grid: &Grid) {
        for kind in [GridKind::Wall, GridKind::Floor, GridKind::Ceiling] {
            let max = (0..grid.len()).map(|i| grid.cell(kind, i)).max().unwrap_or(OPEN);
            if max as usize > self.bank.len() {
                tracing::warn!(
                    ?kind,
                    value = max,
                    textures = self.bank.len(),
                    "cell value has no texture, falling back to checkerboard"
                );
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Rgb;
    use glam::vec2;

    /// Records the order of passes.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        buf: Vec<Rgba>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, w: usize, h: usize) {
            self.calls.clear();
            self.calls.push("begin");
            self.buf = vec![0; w * h];
        }
        fn draw_sky(&mut self, _: &Texture, _: &Camera) {
            self.calls.push("sky");
        }
        fn draw_world(&mut self, _: &Grid, _: &Camera, _: &TextureBank) {
            self.calls.push("world");
        }
        fn draw_sprites(&mut self, _: &[Sprite], _: &Camera, _: &TextureBank, _: f32) {
            self.calls.push("sprites");
        }
        fn draw_minimap(&mut self, _: &Grid, _: &Camera) {
            self.calls.push("minimap");
        }
        fn end_frame<F>(&mut self, submit: F)
        where
            F: FnOnce(&[Rgba], usize, usize),
        {
            self.calls.push("end");
            submit(&self.buf, 0, 0);
        }
    }

    fn bank() -> TextureBank {
        let mut bank = TextureBank::new(32).unwrap();
        bank.insert("RED", Texture::solid("RED", 32, Rgb(255, 0, 0))).unwrap();
        bank
    }

    #[rustfmt::skip]
    fn grid() -> Grid {
        let wall = vec![
            1, 1, 1,
            1, 0, 1,
            1, 1, 1,
        ];
        Grid::new(3, 3, 64.0, wall, vec![1; 9], vec![1; 9]).unwrap()
    }

    fn small() -> RenderConfig {
        RenderConfig {
            screen_width: 240,
            screen_height: 160,
            ..Default::default()
        }
    }

    #[test]
    fn missing_inputs_are_reported() {
        let mut engine = Engine::new(Recorder::default(), small(), bank()).unwrap();
        assert_eq!(engine.render_frame(&[], |_, _, _| {}), Err(FrameError::MissingGrid));
        engine.set_grid(grid());
        assert_eq!(
            engine.render_frame(&[], |_, _, _| {}),
            Err(FrameError::MissingViewpoint)
        );
        // nothing was drawn for the failed frames
        assert!(engine.renderer.calls.is_empty());
    }

    #[test]
    fn passes_run_in_order() {
        let mut engine = Engine::new(Recorder::default(), small(), bank()).unwrap();
        engine.set_grid(grid());
        engine.set_camera(Camera::new(vec2(96.0, 96.0), 0.0));

        engine.render_frame(&[], |_, _, _| {}).unwrap();
        assert_eq!(engine.renderer.calls, ["begin", "world", "sprites", "end"]);

        engine.set_sky(Some(Texture::solid("SKY", 4, Rgb(0, 0, 200))));
        engine.config.minimap = true;
        engine.render_frame(&[], |_, _, _| {}).unwrap();
        assert_eq!(
            engine.renderer.calls,
            ["begin", "sky", "world", "sprites", "minimap", "end"]
        );
    }

    #[test]
    fn construction_checks_calibration() {
        let bad = RenderConfig {
            screen_width: 250,
            ..small()
        };
        assert!(matches!(
            Engine::new(Recorder::default(), bad, bank()),
            Err(EngineError::Config(ConfigError::UnevenColumns { .. }))
        ));

        let wide = TextureBank::new(64).unwrap();
        assert!(matches!(
            Engine::new(Recorder::default(), small(), wide),
            Err(EngineError::TextureSize { bank: 64, config: 32 })
        ));
    }

    #[test]
    fn grid_takes_door_range_from_config() {
        let cfg = RenderConfig {
            door_first: 20,
            door_last: 22,
            ..small()
        };
        let mut engine = Engine::new(Recorder::default(), cfg, bank()).unwrap();
        engine.set_grid(grid());
        let g = engine.grid().unwrap();
        assert!(g.is_transparent(21));
        assert!(!g.is_transparent(9));
    }

    #[test]
    fn software_frame_reaches_the_sink() {
        let mut engine = Engine::software(small(), bank()).unwrap();
        engine.set_grid(grid());
        engine.set_camera(Camera::new(vec2(96.0, 96.0), 0.7));

        let mut seen = None;
        engine
            .render_frame(&[], |fb, w, h| seen = Some((fb.len(), w, h, fb[80 * 240 + 120])))
            .unwrap();
        let (len, w, h, centre) = seen.unwrap();
        assert_eq!((len, w, h), (240 * 160, 240, 160));
        // 1-cell room: the centre pixel is a red wall, full or half shade
        assert!(centre == 0x00_FF0000 || centre == 0x00_7F0000, "{centre:06x}");

        // door edits between frames go through grid_mut
        engine
            .grid_mut()
            .unwrap()
            .set_cell(GridKind::Wall, 5, OPEN)
            .unwrap();
        assert_eq!(engine.grid().unwrap().cell(GridKind::Wall, 5), OPEN);
    }
}
