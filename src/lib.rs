#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod renderer;
pub mod scene;

pub use errors::{DeviceError, RenderError, Result};
pub use renderer::core::{
    CommandContext, RenderDevice, RenderView, ResourceArena, TextureView, Viewport,
};
pub use renderer::graph::{
    CascadedShadowMapCoordinator, FrameArgs, FrameResourcePool, GeneratorArgs, GeneratorId,
    GeneratorRegistry, PassSequencer, SubGenerator, VisibilityData,
};
pub use renderer::pipeline::{ShaderLibrary, StaticShaderLibrary};
pub use renderer::settings::{SequencerSettings, ShadowSettings};
pub use scene::{Aabb, Camera};
