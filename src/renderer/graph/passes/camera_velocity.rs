//! Camera Velocity Pass
//!
//! Reconstructs per-pixel screen-space motion caused by camera movement
//! alone. The pixel's view-space position (from depth) is reprojected with
//! `prev_view_projection * inverse(view)` and the difference to the current
//! position is written to the velocity buffer.

use glam::Mat4;

use crate::errors::Result;
use crate::renderer::core::{CommandContext, ParameterBlock, TextureView, Viewport};
use crate::renderer::pipeline::{ShaderHandle, ShaderLibrary, require_shader};
use crate::scene::camera::Camera;

pub const SHADER_NAME: &str = "camera_velocity";

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VelocityConstants {
    /// View space of the current frame → clip space of the previous frame.
    pub reprojection: Mat4,
}

impl VelocityConstants {
    #[must_use]
    pub fn new(camera: &Camera, prev_view_projection: Mat4) -> Self {
        Self {
            reprojection: prev_view_projection * camera.view_matrix().inverse(),
        }
    }
}

pub struct CameraVelocityPass {
    shader: ShaderHandle,
}

impl CameraVelocityPass {
    pub fn new(library: &dyn ShaderLibrary) -> Result<Self> {
        Ok(Self {
            shader: require_shader(library, SHADER_NAME)?,
        })
    }

    #[must_use]
    pub fn shader(&self) -> ShaderHandle {
        self.shader
    }

    /// Draws the velocity triangle into `target`, sampling `depth`.
    pub fn record(
        &self,
        ctx: &mut CommandContext<'_>,
        camera: &Camera,
        prev_view_projection: Mat4,
        depth: TextureView,
        target: TextureView,
        viewport: &Viewport,
        target_size: (u32, u32),
    ) -> Result<()> {
        ctx.set_render_targets(&[target], None)?;
        ctx.set_viewport(viewport, target_size);

        let mut params = ParameterBlock::new("Camera Velocity", 1);
        params
            .set_srv(0, Some(depth))
            .set_constants(&VelocityConstants::new(camera, prev_view_projection));

        ctx.draw_fullscreen(self.shader, &params)
    }
}
