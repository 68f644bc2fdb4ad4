//! Netpbm colour images (`P6` binary, `P3` ASCII), 8 bits per channel.
//!
//! Header: magic, width, height, max value, each separated by whitespace,
//! with `#` comments running to the end of the line. `P6` is followed by
//! exactly one whitespace byte and `w * h * 3` raw bytes.

use std::{fs, io, path::Path};

use thiserror::Error;

use crate::world::{Texture, TextureError};

#[derive(Error, Debug)]
pub enum PpmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported PPM format `{0}`")]
    Magic(String),

    #[error("only 8-bit colour depth (max value 255) is supported, got {0}")]
    MaxValue(u32),

    #[error("malformed header: {0}")]
    Header(&'static str),

    #[error("pixel data has {got} samples, expected {expected}")]
    Size { got: usize, expected: usize },

    #[error("sample `{0}` is not a value in 0..=255")]
    Sample(String),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Whitespace/comment aware token reader over the raw bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_space(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_space();
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'#')
        {
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.bytes[start..self.pos])
    }

    fn number(&mut self, what: &'static str) -> Result<u32, PpmError> {
        let tok = self.token().ok_or(PpmError::Header(what))?;
        std::str::from_utf8(tok)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(PpmError::Header(what))
    }
}

/// Decode an in-memory PPM image.
pub fn decode(name: &str, bytes: &[u8]) -> Result<Texture, PpmError> {
    let mut cur = Cursor::new(bytes);
    let magic = cur.token().ok_or(PpmError::Header("missing magic"))?;
    let binary = match magic {
        b"P6" => true,
        b"P3" => false,
        other => return Err(PpmError::Magic(String::from_utf8_lossy(other).into_owned())),
    };

    let w = cur.number("width")? as usize;
    let h = cur.number("height")? as usize;
    let max = cur.number("max value")?;
    if max != 255 {
        return Err(PpmError::MaxValue(max));
    }
    if w == 0 || h == 0 {
        return Err(PpmError::Header("zero-sized image"));
    }
    let expected = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(3))
        .ok_or(PpmError::Header("image too large"))?;

    let pixels = if binary {
        // single whitespace byte between header and raster
        match bytes.get(cur.pos) {
            Some(b) if b.is_ascii_whitespace() => cur.pos += 1,
            _ => return Err(PpmError::Header("no separator before raster")),
        }
        let raster = &bytes[cur.pos..];
        if raster.len() != expected {
            return Err(PpmError::Size {
                got: raster.len(),
                expected,
            });
        }
        raster.to_vec()
    } else {
        // every ASCII sample takes at least two bytes
        let mut pixels = Vec::with_capacity(expected.min(bytes.len() / 2));
        while let Some(tok) = cur.token() {
            let sample = std::str::from_utf8(tok)
                .ok()
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(|| PpmError::Sample(String::from_utf8_lossy(tok).into_owned()))?;
            pixels.push(sample);
        }
        if pixels.len() != expected {
            return Err(PpmError::Size {
                got: pixels.len(),
                expected,
            });
        }
        pixels
    };

    tracing::debug!(name, w, h, binary, "ppm decoded");
    Ok(Texture::new(name, w, h, pixels)?)
}

/// Read and decode a PPM file; the texture is named after the file stem.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Texture, PpmError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ppm".into());
    decode(&name, &bytes)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
