//! Render Device Interface
//!
//! The orchestrator never talks to a graphics API directly. Everything it
//! needs from the device layer is expressed by [`RenderDevice`]: texture
//! allocation, clears, binding and the two kinds of draws it issues (queued
//! scene geometry and full-screen triangles).
//!
//! Implementations are free to record, translate or execute these calls.
//! Execution barriers between stages are the implementation's concern; the
//! orchestrator only guarantees submission order.

use glam::{Mat4, Vec4};

use crate::errors::DeviceError;
use crate::renderer::core::resources::{TextureDesc, ViewRole};
use crate::renderer::core::view::Viewport;
use crate::renderer::graph::queue::RenderQueue;
use crate::renderer::pipeline::{PassIndex, ShaderHandle};
use crate::scene::camera::Camera;

/// Opaque device-side texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawTextureId(pub u64);

/// A resolved view, as handed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawView {
    pub texture: RawTextureId,
    pub role: ViewRole,
    pub format: wgpu::TextureFormat,
    pub aspect: wgpu::TextureAspect,
}

/// Per-view constants bound after every binding reset.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParameters {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub inverse_view: Mat4,
    /// xyz = world-space camera position, w = 1.
    pub camera_position: Vec4,
}

impl ViewParameters {
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            view_projection: camera.view_projection_matrix(),
            inverse_view: camera.view_matrix().inverse(),
            camera_position: camera.position().extend(1.0),
        }
    }
}

/// The device layer the orchestrator records into.
///
/// All methods are called from a single submission thread in frame order.
pub trait RenderDevice {
    /// Allocates a texture. Failure is fatal to the caller.
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<RawTextureId, DeviceError>;

    /// Releases a texture created by [`create_texture`](Self::create_texture).
    fn release_texture(&mut self, texture: RawTextureId);

    fn clear_depth_stencil(&mut self, target: RawView, depth: f32);

    fn clear_render_target(&mut self, target: RawView, color: wgpu::Color);

    /// Unbinds every resource and target currently bound.
    fn unbind_resources(&mut self);

    fn bind_view_parameters(&mut self, params: &ViewParameters);

    /// Sets the viewport; `target_size` is the size of the bound targets.
    fn set_viewport(&mut self, viewport: &Viewport, target_size: (u32, u32));

    fn set_render_targets(&mut self, colors: &[RawView], depth: Option<RawView>);

    /// Draws every item of `queue` with the shaders of pass `pass`.
    fn draw_queue(&mut self, pass: PassIndex, queue: &RenderQueue);

    /// Draws a single full-screen triangle (3 vertices, 1 instance).
    ///
    /// `resources` are the shader-resource slots in binding order; `None`
    /// binds nothing to that slot.
    fn draw_fullscreen(
        &mut self,
        shader: ShaderHandle,
        resources: &[Option<RawView>],
        constants: &[u8],
    );

    fn push_debug_group(&mut self, _label: &str) {}

    fn pop_debug_group(&mut self) {}
}
