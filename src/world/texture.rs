// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use thiserror::Error;

/// Runtime handle for a texture in this bank.
///
/// Wall value `N` refers to id `N - 1` for the lifetime of the bank.
pub type TextureId = u16;

/// One 8-bit RGB texel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Magenta: "do not draw".
    pub const SENTINEL: Rgb = Rgb(255, 0, 255);

    #[inline(always)]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// Pack into the frame-buffer format (0x00RRGGBB).
    #[inline(always)]
    pub fn to_rgba(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }

    /// Multiply every channel by `factor` (expected in 0..=1).
    #[inline(always)]
    pub fn shaded(self, factor: f32) -> Rgb {
        if factor >= 1.0 {
            return self;
        }
        Rgb(
            (self.0 as f32 * factor) as u8,
            (self.1 as f32 * factor) as u8,
            (self.2 as f32 * factor) as u8,
        )
    }
}

/// Immutable RGB image, 3 bytes per texel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Wrap decoded bytes, checking `pixels.len() == w * h * 3`.
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if pixels.len() != w * h * 3 {
            return Err(TextureError::BadLength {
                name,
                len: pixels.len(),
                expected: w * h * 3,
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Single-colour square texture.
    pub fn solid<S: Into<String>>(name: S, side: usize, colour: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(side * side * 3);
        for _ in 0..side * side {
            pixels.extend_from_slice(&[colour.0, colour.1, colour.2]);
        }
        Self {
            name: name.into(),
            w: side,
            h: side,
            pixels,
        }
    }

    /// Texel at (`u`, `v`). Callers keep coordinates in range.
    #[inline(always)]
    pub fn texel(&self, u: usize, v: usize) -> Rgb {
        let i = (v * self.w + u) * 3;
        Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Texel with both coordinates wrapped into the image.
    #[inline(always)]
    pub fn texel_wrapped(&self, u: i32, v: i32) -> Rgb {
        self.texel(
            u.rem_euclid(self.w as i32) as usize,
            v.rem_euclid(self.h as i32) as usize,
        )
    }
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u8 = 0xA0;
        const DARK: u8 = 0x40;
        let mut pixels = Vec::with_capacity(8 * 8 * 3);
        for y in 0..8 {
            for x in 0..8 {
                let c = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
                pixels.extend_from_slice(&[c, c, c]);
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture `{name}` is {w}×{h}, bank holds {side}×{side} textures")]
    WrongSize {
        name: String,
        w: usize,
        h: usize,
        side: usize,
    },

    #[error("texture side {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("texture `{name}` has {len} bytes, expected {expected}")]
    BadLength {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("atlas `{name}` ({w}×{h}) is not a column of {side}×{side} tiles")]
    BadAtlas {
        name: String,
        w: usize,
        h: usize,
        side: usize,
    },
}

/// Flat, ordered store of fixed-size square textures.
///
/// * Does **not** know about PPM or any file format — that’s the loader’s job.
/// * Ids are insertion order and never change.
/// * Lookups of unknown ids can fall back to a checkerboard that is *not*
///   part of the id space.
///
/// **Thread-safety:** built once at start-up, read-only afterwards.
pub struct TextureBank {
    side: usize,
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    missing: Texture,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank that accepts `side`×`side` textures.
    pub fn new(side: usize) -> Result<Self, TextureError> {
        if side == 0 || !side.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo(side));
        }
        Ok(Self {
            side,
            by_name: HashMap::new(),
            data: Vec::new(),
            missing: checker(side),
        })
    }

    /// Slice a vertical strip (`side` wide, `n * side` tall) into `n`
    /// consecutive entries named `<atlas>#<i>`.
    pub fn from_atlas(atlas: &Texture, side: usize) -> Result<Self, TextureError> {
        let mut bank = Self::new(side)?;
        if atlas.w != side || atlas.h == 0 || atlas.h % side != 0 {
            return Err(TextureError::BadAtlas {
                name: atlas.name.clone(),
                w: atlas.w,
                h: atlas.h,
                side,
            });
        }
        let block = side * side * 3;
        for (i, chunk) in atlas.pixels.chunks_exact(block).enumerate() {
            let name = format!("{}#{i}", atlas.name);
            let tex = Texture::new(name.clone(), side, side, chunk.to_vec())?;
            bank.insert(name, tex)?;
        }
        tracing::debug!(
            atlas = %atlas.name,
            textures = bank.len(),
            side,
            "texture bank sliced from atlas"
        );
        Ok(bank)
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Edge length shared by every texture in the bank.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe query: unknown ids resolve to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.missing)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Append a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails on a duplicate name or a texture of the wrong size.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w != self.side || tex.h != self.side {
            return Err(TextureError::WrongSize {
                name,
                w: tex.w,
                h: tex.h,
                side: self.side,
            });
        }
        let expected = self.side * self.side * 3;
        if tex.pixels.len() != expected {
            return Err(TextureError::BadLength {
                name,
                len: tex.pixels.len(),
                expected,
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/// Checkerboard of `side`×`side` texels built from the 8×8 default.
fn checker(side: usize) -> Texture {
    let base = Texture::default();
    let mut pixels = Vec::with_capacity(side * side * 3);
    for y in 0..side {
        for x in 0..side {
            let c = base.texel(x * base.w / side, y * base.h / side);
            pixels.extend_from_slice(&[c.0, c.1, c.2]);
        }
    }
    Texture {
        name: "MISSING".into(),
        w: side,
        h: side,
        pixels,
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
