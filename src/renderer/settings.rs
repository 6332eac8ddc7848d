//! Sequencer Settings
//!
//! Construction-time configuration of a [`PassSequencer`](crate::renderer::graph::PassSequencer).
//! Everything here is fixed for the lifetime of the instance; per-frame
//! switches live in [`FrameArgs`](crate::renderer::graph::FrameArgs) instead.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use prism::renderer::{SequencerSettings, ShadowSettings};
//!
//! let settings = SequencerSettings {
//!     width: 1920,
//!     height: 1080,
//!     shadow: ShadowSettings {
//!         tile_size: 1024,
//!         ..Default::default()
//!     },
//! };
//! settings.validate()?;
//! ```
//!
//! Both structs are `serde`-serializable so they can be loaded from the
//! application's configuration files.

use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, Result};
use crate::renderer::graph::shadow_utils::{self, CASCADE_COUNT};

// ---------------------------------------------------------------------------
// ShadowSettings
// ---------------------------------------------------------------------------

/// Cascaded shadow map configuration for the directional sun light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Edge length of one square cascade tile in texels.
    ///
    /// The atlas is `tile_size * 4` wide and `tile_size` high.
    pub tile_size: u32,

    /// Far end of each cascade as a fraction of the camera's near–far range.
    ///
    /// Must lie in `(0, 1]`, strictly increase, and end at `1.0`.
    pub split_fractions: [f32; CASCADE_COUNT],

    /// Distance the light volume is pushed towards the light when no scene
    /// bounds are known, so that casters outside the view still cast.
    pub caster_extension: f32,

    /// Snap cascade bounds to the texel grid to suppress shimmering.
    pub stabilize: bool,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            tile_size: 2048,
            split_fractions: [0.025, 0.05, 0.5, 1.0],
            caster_extension: 100.0,
            stabilize: true,
        }
    }
}

impl ShadowSettings {
    /// Width and height of the shadow atlas.
    #[inline]
    #[must_use]
    pub fn atlas_size(&self) -> (u32, u32) {
        shadow_utils::atlas_size(self.tile_size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(RenderError::InvalidConfiguration(
                "shadow tile size must be non-zero".into(),
            ));
        }
        let max_width = wgpu::Limits::default().max_texture_dimension_2d;
        let atlas_width = self.tile_size.checked_mul(CASCADE_COUNT as u32);
        if atlas_width.is_none_or(|width| width > max_width) {
            return Err(RenderError::InvalidConfiguration(format!(
                "shadow tile size {} exceeds the {max_width} texel atlas width",
                self.tile_size
            )));
        }
        if !self.caster_extension.is_finite() || self.caster_extension < 0.0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "caster extension must be a non-negative distance, got {}",
                self.caster_extension
            )));
        }
        shadow_utils::validate_split_fractions(&self.split_fractions)
    }
}

// ---------------------------------------------------------------------------
// SequencerSettings
// ---------------------------------------------------------------------------

/// Output resolution and shadow configuration of a sequencer instance.
///
/// The resolution is fixed: frame buffers are allocated once at this size
/// and never reallocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerSettings {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub shadow: ShadowSettings,
}

impl SequencerSettings {
    /// Settings for a `width` × `height` output with default shadows.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shadow: ShadowSettings::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "output resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        self.shadow.validate()
    }
}
