//! Lighting Composite Pass
//!
//! Combines HDR lighting, optional reflections and atmospheric scattering
//! into the composite buffer with one full-screen triangle.
//!
//! # Slot Layout
//!
//! | Slot | Input |
//! |------|-------|
//! | 0 | HDR lighting |
//! | 1 | Reflections (unbound when disabled) |
//! | 2 | Normal |
//! | 3 | Depth |
//! | 4 | Color |
//! | 5 | Atmospheric lookup |

use crate::errors::Result;
use crate::renderer::core::{CommandContext, ParameterBlock, TextureView, Viewport};
use crate::renderer::pipeline::{ShaderHandle, ShaderLibrary, require_shader};

pub const SHADER_NAME: &str = "reflections_composite";

pub const SLOT_COUNT: usize = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeConstants {
    pub has_reflections: u32,
    pub _pad: [u32; 3],
}

/// Inputs of one composite draw.
#[derive(Debug, Clone, Copy)]
pub struct CompositeInputs {
    pub lighting: TextureView,
    pub reflections: Option<TextureView>,
    pub normal: TextureView,
    pub depth: TextureView,
    pub color: TextureView,
    pub atmospheric_lut: TextureView,
}

impl CompositeInputs {
    fn parameter_block(&self) -> ParameterBlock {
        let mut params = ParameterBlock::new("Reflections Composite", SLOT_COUNT);
        params
            .set_srv(0, Some(self.lighting))
            .set_srv(1, self.reflections)
            .set_srv(2, Some(self.normal))
            .set_srv(3, Some(self.depth))
            .set_srv(4, Some(self.color))
            .set_srv(5, Some(self.atmospheric_lut))
            .set_constants(&CompositeConstants {
                has_reflections: u32::from(self.reflections.is_some()),
                _pad: [0; 3],
            });
        params
    }
}

pub struct CompositePass {
    shader: ShaderHandle,
}

impl CompositePass {
    pub fn new(library: &dyn ShaderLibrary) -> Result<Self> {
        Ok(Self {
            shader: require_shader(library, SHADER_NAME)?,
        })
    }

    #[must_use]
    pub fn shader(&self) -> ShaderHandle {
        self.shader
    }

    pub fn record(
        &self,
        ctx: &mut CommandContext<'_>,
        inputs: &CompositeInputs,
        target: TextureView,
        viewport: &Viewport,
        target_size: (u32, u32),
    ) -> Result<()> {
        ctx.set_render_targets(&[target], None)?;
        ctx.set_viewport(viewport, target_size);
        ctx.draw_fullscreen(self.shader, &inputs.parameter_block())
    }
}
