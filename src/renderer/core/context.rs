//! Command Recording Context
//!
//! [`CommandContext`] is threaded through every stage of a frame. It bundles
//! the device, the resource arena and the **binding state** as an explicit
//! value, so that what one stage leaves bound is visible in the type rather
//! than hidden in a global.
//!
//! # Binding Discipline
//!
//! - [`reset_bindings`](CommandContext::reset_bindings) is the only
//!   inter-stage synchronization at the binding layer: it unbinds everything
//!   on the device and clears the tracked [`BindingState`].
//! - Draws require render targets to be bound; a stage that relies on the
//!   previous stage's bindings (alpha-masked geometry) simply does not rebind.

use smallvec::SmallVec;

use crate::errors::{RenderError, Result};
use crate::renderer::core::binding::ParameterBlock;
use crate::renderer::core::device::{RawView, RenderDevice, ViewParameters};
use crate::renderer::core::resources::{ResourceArena, TextureView, ViewRole};
use crate::renderer::core::view::Viewport;
use crate::renderer::graph::queue::RenderQueue;
use crate::renderer::pipeline::{PassIndex, ShaderHandle};
use crate::scene::camera::Camera;

/// What is currently bound on the device, as seen by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingState {
    pub viewport: Option<(Viewport, (u32, u32))>,
    pub color_targets: SmallVec<[TextureView; 4]>,
    pub depth_target: Option<TextureView>,
    pub view_parameters: bool,
}

impl BindingState {
    #[must_use]
    #[inline]
    pub fn has_targets(&self) -> bool {
        !self.color_targets.is_empty() || self.depth_target.is_some()
    }
}

/// Per-frame recording context.
pub struct CommandContext<'a> {
    device: &'a mut dyn RenderDevice,
    resources: &'a mut ResourceArena,
    bindings: BindingState,
}

impl<'a> CommandContext<'a> {
    pub fn new(device: &'a mut dyn RenderDevice, resources: &'a mut ResourceArena) -> Self {
        Self {
            device,
            resources,
            bindings: BindingState::default(),
        }
    }

    #[inline]
    pub fn device(&mut self) -> &mut dyn RenderDevice {
        &mut *self.device
    }

    #[must_use]
    #[inline]
    pub fn resources(&self) -> &ResourceArena {
        &*self.resources
    }

    /// Splits the context into device and arena for allocation calls.
    #[inline]
    pub fn split(&mut self) -> (&mut dyn RenderDevice, &mut ResourceArena) {
        (&mut *self.device, &mut *self.resources)
    }

    #[must_use]
    #[inline]
    pub fn bindings(&self) -> &BindingState {
        &self.bindings
    }

    // ── Binding ────────────────────────────────────────────────────────────

    /// Unbinds everything on the device.
    pub fn reset_bindings(&mut self) {
        self.device.unbind_resources();
        self.bindings = BindingState::default();
    }

    pub fn bind_view_parameters(&mut self, camera: &Camera) {
        self.device.bind_view_parameters(&ViewParameters::from_camera(camera));
        self.bindings.view_parameters = true;
    }

    pub fn set_viewport(&mut self, viewport: &Viewport, target_size: (u32, u32)) {
        self.device.set_viewport(viewport, target_size);
        self.bindings.viewport = Some((*viewport, target_size));
    }

    pub fn set_render_targets(
        &mut self,
        colors: &[TextureView],
        depth: Option<TextureView>,
    ) -> Result<()> {
        let mut raw_colors: SmallVec<[RawView; 4]> = SmallVec::with_capacity(colors.len());
        for view in colors {
            raw_colors.push(self.resolve_as(*view, ViewRole::RenderTarget)?);
        }
        let raw_depth = depth
            .map(|view| self.resolve_as(view, ViewRole::DepthStencil))
            .transpose()?;

        self.device.set_render_targets(&raw_colors, raw_depth);
        self.bindings.color_targets = colors.iter().copied().collect();
        self.bindings.depth_target = depth;
        Ok(())
    }

    // ── Clears ─────────────────────────────────────────────────────────────

    pub fn clear_depth(&mut self, target: TextureView, depth: f32) -> Result<()> {
        let raw = self.resolve_as(target, ViewRole::DepthStencil)?;
        self.device.clear_depth_stencil(raw, depth);
        Ok(())
    }

    pub fn clear_color(&mut self, target: TextureView, color: wgpu::Color) -> Result<()> {
        let raw = self.resolve_as(target, ViewRole::RenderTarget)?;
        self.device.clear_render_target(raw, color);
        Ok(())
    }

    // ── Draws ──────────────────────────────────────────────────────────────

    /// Draws a render queue into the currently bound targets.
    pub fn draw_queue(&mut self, pass: PassIndex, queue: &RenderQueue) -> Result<()> {
        self.require_targets("draw_queue")?;
        self.device.draw_queue(pass, queue);
        Ok(())
    }

    /// Draws a full-screen triangle with the given parameter block.
    pub fn draw_fullscreen(&mut self, shader: ShaderHandle, params: &ParameterBlock) -> Result<()> {
        self.require_targets(params.label())?;

        let mut raw: SmallVec<[Option<RawView>; 8]> = SmallVec::with_capacity(params.srvs().len());
        for slot in params.srvs().iter().copied() {
            raw.push(
                slot.map(|view| self.resolve_as(view, ViewRole::ShaderResource))
                    .transpose()?,
            );
        }

        self.device.draw_fullscreen(shader, &raw, params.constants());
        Ok(())
    }

    // ── Debug groups ───────────────────────────────────────────────────────

    pub fn push_debug_group(&mut self, label: &str) {
        self.device.push_debug_group(label);
    }

    pub fn pop_debug_group(&mut self) {
        self.device.pop_debug_group();
    }

    // ── Internals ──────────────────────────────────────────────────────────

    fn resolve_as(&self, view: TextureView, expected: ViewRole) -> Result<RawView> {
        if view.role != expected {
            let label = self
                .resources
                .desc(view.texture)
                .map_or("<released>", |d| d.label);
            return Err(RenderError::InvalidView {
                label,
                role: view.role.name(),
            });
        }
        self.resources.resolve(view)
    }

    fn require_targets(&self, what: &str) -> Result<()> {
        if self.bindings.has_targets() {
            Ok(())
        } else {
            Err(RenderError::InvalidConfiguration(format!(
                "{what}: no render targets bound"
            )))
        }
    }
}
