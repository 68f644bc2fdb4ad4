//! Render calibration.
//!
//! Screen size, field of view, ray count, step budget and the floor
//! projection constant are coupled: the floor constant must equal half the
//! screen height or floors drift away from wall bottoms. They live together
//! here and are validated together.

use std::{fs, io, ops::RangeInclusive, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::world::TileValue;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("screen must be at least 2×2 (got {w}×{h})")]
    BadScreen { w: usize, h: usize },

    #[error("ray_count must be positive")]
    NoRays,

    #[error("screen_width {w} is not a multiple of ray_count {rays}")]
    UnevenColumns { w: usize, rays: usize },

    #[error("fov_deg must lie in (0, 180) (got {0})")]
    BadFov(f32),

    #[error("max_depth must be at least 1")]
    NoDepth,

    #[error("texture_size {0} is not a power of two")]
    TextureSize(usize),

    #[error("floor_coefficient {got} inconsistent with screen_height (expected ≈{expected})")]
    FloorCoefficient { got: f32, expected: f32 },

    #[error("door range {first}..={last} is empty or includes the open value 0")]
    DoorRange { first: TileValue, last: TileValue },

    #[error("vertical_shade must lie in (0, 1] (got {0})")]
    Shade(f32),

    #[error("sprite_size and sprite_max_scale must be positive")]
    SpriteScale,
}

/// Relative tolerance allowed on an explicit `floor_coefficient`.
const FLOOR_K_TOLERANCE: f32 = 0.02;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    pub fov_deg: f32,
    pub ray_count: usize,
    /// DDA step budget per sweep.
    pub max_depth: u32,
    pub texture_size: usize,
    /// Inverse-perspective constant; `None` derives `screen_height / 2`.
    pub floor_coefficient: Option<f32>,
    pub door_first: TileValue,
    pub door_last: TileValue,
    pub vertical_shade: f32,
    pub sprite_size: f32,
    /// Upper bound on a projected sprite, pixels; `None` = `screen_height`.
    pub sprite_max_scale: Option<f32>,
    pub minimap: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 960,
            screen_height: 640,
            fov_deg: 60.0,
            ray_count: 120,
            max_depth: 8,
            texture_size: 32,
            floor_coefficient: None,
            door_first: 8,
            door_last: 17,
            vertical_shade: 0.5,
            sprite_size: 32.0,
            sprite_max_scale: None,
            minimap: false,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: RenderConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_toml_str(&src)?;
        tracing::debug!(path = %path.as_ref().display(), ?cfg, "render config loaded");
        Ok(cfg)
    }

    /// Check every calibration value against the others.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.screen_width, self.screen_height);
        if w < 2 || h < 2 {
            return Err(ConfigError::BadScreen { w, h });
        }
        if self.ray_count == 0 {
            return Err(ConfigError::NoRays);
        }
        if w % self.ray_count != 0 {
            return Err(ConfigError::UnevenColumns {
                w,
                rays: self.ray_count,
            });
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::BadFov(self.fov_deg));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::NoDepth);
        }
        if self.texture_size == 0 || !self.texture_size.is_power_of_two() {
            return Err(ConfigError::TextureSize(self.texture_size));
        }
        if let Some(k) = self.floor_coefficient {
            let expected = h as f32 * 0.5;
            if !k.is_finite() || (k - expected).abs() > expected * FLOOR_K_TOLERANCE {
                return Err(ConfigError::FloorCoefficient { got: k, expected });
            }
        }
        if self.door_first == 0 || self.door_first > self.door_last {
            return Err(ConfigError::DoorRange {
                first: self.door_first,
                last: self.door_last,
            });
        }
        if !(self.vertical_shade > 0.0 && self.vertical_shade <= 1.0) {
            return Err(ConfigError::Shade(self.vertical_shade));
        }
        if !(self.sprite_size > 0.0) || self.sprite_max_scale.is_some_and(|s| !(s > 0.0)) {
            return Err(ConfigError::SpriteScale);
        }
        Ok(())
    }

    /*──────────────────────── derived values ───────────────────────*/

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_deg.to_radians()
    }

    /// Angle between neighbouring rays, radians.
    #[inline]
    pub fn ray_step(&self) -> f32 {
        self.fov() / self.ray_count as f32
    }

    /// Screen pixels covered by one ray.
    #[inline]
    pub fn column_width(&self) -> usize {
        self.screen_width / self.ray_count
    }

    #[inline]
    pub fn floor_k(&self) -> f32 {
        self.floor_coefficient
            .unwrap_or(self.screen_height as f32 * 0.5)
    }

    #[inline]
    pub fn sprite_max_scale(&self) -> f32 {
        self.sprite_max_scale.unwrap_or(self.screen_height as f32)
    }

    #[inline]
    pub fn doors(&self) -> RangeInclusive<TileValue> {
        self.door_first..=self.door_last
    }
}
