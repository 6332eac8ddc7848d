//! Frame Arguments
//!
//! [`FrameArgs`] is the fixed-shape value a caller supplies for every frame.
//! It is immutable for the duration of one
//! [`PassSequencer::generate`](super::PassSequencer::generate) call and has
//! no implicit defaults: every field, including the feature switches, must
//! be filled in by the caller.

use glam::{Mat4, Vec3};

use crate::errors::{RenderError, Result};
use crate::renderer::core::{TextureView, ViewRole, Viewport};
use crate::scene::camera::Camera;

/// Screen-space reflection switch and ray thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionSettings {
    pub enabled: bool,
    /// Depth thickness assumed for every pixel when marching.
    pub thickness: f32,
}

/// Depth-of-field lens parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOfFieldSettings {
    /// View-space depth of the focus plane.
    pub focus_plane: f32,
    /// Depth extent of the in-focus region.
    pub size: f32,
    pub near_transition_size: f32,
    pub far_transition_size: f32,
    /// Maximum near blur radius as a fraction of the viewport width.
    pub near_blur_fraction: f32,
    /// Maximum far blur radius as a fraction of the viewport width.
    pub far_blur_fraction: f32,
}

/// Motion blur switch and tap count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionBlurSettings {
    pub enabled: bool,
    pub sample_count: u32,
}

/// Everything a single frame needs from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameArgs {
    pub camera: Camera,
    pub viewport: Viewport,
    /// Render-target view receiving the tone-mapped image.
    pub target: TextureView,

    pub light_direction: Vec3,
    pub light_color: Vec3,
    /// Precomputed atmospheric scattering lookup, sampled by the composite.
    pub atmospheric_lut: TextureView,

    /// View-projection matrix of the previous frame.
    pub prev_view_projection: Mat4,

    pub volumetric_lights: bool,
    pub reflections: ReflectionSettings,
    pub depth_of_field: DepthOfFieldSettings,
    pub motion_blur: MotionBlurSettings,
}

impl FrameArgs {
    /// Rejects arguments that cannot produce a frame for a `size` output.
    pub fn validate(&self, size: (u32, u32)) -> Result<()> {
        if self.target.role != ViewRole::RenderTarget {
            return Err(RenderError::InvalidConfiguration(
                "frame target must be a render-target view".into(),
            ));
        }
        if self.atmospheric_lut.role != ViewRole::ShaderResource {
            return Err(RenderError::InvalidConfiguration(
                "atmospheric lookup must be a shader-resource view".into(),
            ));
        }
        let vp = &self.viewport;
        let fits = |origin: u32, extent: u32, limit: u32| {
            extent > 0 && origin.checked_add(extent).is_some_and(|end| end <= limit)
        };
        if !fits(vp.x, vp.width, size.0) || !fits(vp.y, vp.height, size.1) {
            return Err(RenderError::InvalidConfiguration(format!(
                "viewport {vp:?} does not fit the {}x{} frame buffers",
                size.0, size.1
            )));
        }
        if self.motion_blur.enabled && self.motion_blur.sample_count == 0 {
            return Err(RenderError::InvalidConfiguration(
                "motion blur enabled with zero samples".into(),
            ));
        }
        let thickness = self.reflections.thickness;
        if self.reflections.enabled && (!thickness.is_finite() || thickness <= 0.0) {
            return Err(RenderError::InvalidConfiguration(format!(
                "reflection thickness must be positive, got {thickness}"
            )));
        }
        Ok(())
    }
}
