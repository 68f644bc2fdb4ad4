//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It describes one frame as a [`Frame`] (grid, view-point, textures, sky,
//! sprites) and hands it to a type that implements [`Renderer`].
//!
//! * Passes run in a fixed order: sky, walls + floors/ceilings (which fill
//!   the per-column depth buffer), sprites, optional map overlay.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Camera, Grid, Sprite, Texture, TextureBank};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Borrowed inputs for one frame.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub grid: &'a Grid,
    pub camera: &'a Camera,
    pub bank: &'a TextureBank,
    pub sky: Option<&'a Texture>,
    pub sprites: &'a [Sprite],
    pub minimap: bool,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Panoramic background for the upper half of the screen.
    fn draw_sky(&mut self, sky: &Texture, camera: &Camera);

    /// Walls, floors and ceilings for every ray; refreshes the depth buffer.
    fn draw_world(&mut self, grid: &Grid, camera: &Camera, bank: &TextureBank);

    /// Billboards, occluded by the depth buffer of the last `draw_world`.
    fn draw_sprites(
        &mut self,
        sprites: &[Sprite],
        camera: &Camera,
        bank: &TextureBank,
        eye_height: f32,
    );

    /// Top-down overlay of the wall grid and the view-point.
    fn draw_minimap(&mut self, grid: &Grid, camera: &Camera);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, frame: &Frame<'_>, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        if let Some(sky) = frame.sky {
            self.draw_sky(sky, frame.camera);
        }
        self.draw_world(frame.grid, frame.camera, frame.bank);
        self.draw_sprites(
            frame.sprites,
            frame.camera,
            frame.bank,
            frame.grid.tile_size() * 0.5,
        );
        if frame.minimap {
            self.draw_minimap(frame.grid, frame.camera);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::{MapArea, Software};
