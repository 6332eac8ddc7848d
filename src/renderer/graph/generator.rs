//! Sub-Generators
//!
//! Stages that are not implemented by the orchestrator itself (SSAO,
//! volumetric light, tiled lighting, reflections, depth of field, motion
//! blur, tone mapping, shadow-map rendering) are *sub-generators*: pluggable
//! units called through one narrow operation,
//! [`SubGenerator::generate`].
//!
//! # Dispatch
//!
//! Generators form a closed set named by [`GeneratorId`]. Arguments are the
//! matching [`GeneratorArgs`] variant and dispatch goes through an id-keyed
//! table ([`GeneratorRegistry`]) rather than through inheritance.
//!
//! # Contract
//!
//! - `generate` is synchronous and may record further device work.
//! - Arguments are borrowed for the call only and must not be retained.
//! - Inputs that are disabled for the frame arrive as `None`, never omitted.
//! - A generator either writes into a caller-supplied target (and returns
//!   `None`) or returns a view of an output it owns, valid until its next
//!   equivalent call.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::errors::{RenderError, Result};
use crate::renderer::core::{CommandContext, TextureView, Viewport};
use crate::renderer::graph::cascaded_shadow::ShadowParams;
use crate::renderer::graph::frame::{DepthOfFieldSettings, FrameArgs};
use crate::renderer::graph::queue::VisibilityData;
use crate::scene::camera::Camera;

// ─── Identifiers ──────────────────────────────────────────────────────────────

/// The closed set of generators a view can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorId {
    MainView,
    ShadowMap,
    AmbientOcclusion,
    VolumetricLight,
    TiledLighting,
    Reflections,
    DepthOfField,
    MotionBlur,
    ToneMapper,
}

impl GeneratorId {
    /// Stable string identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MainView => "main_view",
            Self::ShadowMap => "shadow_map",
            Self::AmbientOcclusion => "ssao",
            Self::VolumetricLight => "volumetric_lights",
            Self::TiledLighting => "light_generator",
            Self::Reflections => "screen_space_reflections",
            Self::DepthOfField => "depth_of_field",
            Self::MotionBlur => "motion_blur",
            Self::ToneMapper => "tone_mapper",
        }
    }
}

// ─── Arguments ────────────────────────────────────────────────────────────────

/// Renders one shadow cascade into its atlas tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMapArgs {
    pub cascade_index: usize,
    /// Depth-stencil view of the whole atlas.
    pub dsv: TextureView,
    pub atlas_size: (u32, u32),
    /// Tile of this cascade within the atlas.
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientOcclusionArgs {
    pub normal: TextureView,
    pub depth: TextureView,
    pub viewport: Viewport,
    pub target: TextureView,
    pub target_size: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumetricLightArgs {
    pub camera: Camera,
    pub viewport: Viewport,
    pub depth: TextureView,
    pub shadows: ShadowParams,
    pub light_direction: Vec3,
    pub light_color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiledLightingArgs {
    pub camera: Camera,
    pub viewport: Viewport,
    /// Unordered-access view of the HDR lighting buffer.
    pub target: TextureView,
    pub target_size: (u32, u32),
    pub color: TextureView,
    pub normal: TextureView,
    pub depth: TextureView,
    pub ambient_occlusion: TextureView,
    pub scattering: Option<TextureView>,
    pub shadows: ShadowParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionArgs {
    pub camera: Camera,
    pub viewport: Viewport,
    pub color: TextureView,
    pub normal: TextureView,
    pub depth: TextureView,
    pub thickness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOfFieldArgs {
    pub camera: Camera,
    pub viewport: Viewport,
    pub color: TextureView,
    pub depth: TextureView,
    pub target: TextureView,
    pub target_size: (u32, u32),
    pub settings: DepthOfFieldSettings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionBlurArgs {
    pub velocity: TextureView,
    pub color: TextureView,
    pub depth: TextureView,
    pub viewport: Viewport,
    pub sample_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMapArgs {
    pub source: TextureView,
    pub target: TextureView,
    pub viewport: Viewport,
}

/// Arguments for every generator, one variant per [`GeneratorId`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorArgs {
    MainView(Box<FrameArgs>),
    ShadowMap(ShadowMapArgs),
    AmbientOcclusion(AmbientOcclusionArgs),
    VolumetricLight(VolumetricLightArgs),
    TiledLighting(TiledLightingArgs),
    Reflections(ReflectionArgs),
    DepthOfField(DepthOfFieldArgs),
    MotionBlur(MotionBlurArgs),
    ToneMapper(ToneMapArgs),
}

impl GeneratorArgs {
    #[must_use]
    pub fn id(&self) -> GeneratorId {
        match self {
            Self::MainView(_) => GeneratorId::MainView,
            Self::ShadowMap(_) => GeneratorId::ShadowMap,
            Self::AmbientOcclusion(_) => GeneratorId::AmbientOcclusion,
            Self::VolumetricLight(_) => GeneratorId::VolumetricLight,
            Self::TiledLighting(_) => GeneratorId::TiledLighting,
            Self::Reflections(_) => GeneratorId::Reflections,
            Self::DepthOfField(_) => GeneratorId::DepthOfField,
            Self::MotionBlur(_) => GeneratorId::MotionBlur,
            Self::ToneMapper(_) => GeneratorId::ToneMapper,
        }
    }
}

// ─── Trait ────────────────────────────────────────────────────────────────────

/// A pluggable frame stage.
pub trait SubGenerator {
    /// Runs the generator for one view.
    ///
    /// Returns a view of a generator-owned output, or `None` when the
    /// generator wrote into a caller-supplied target (or produced nothing).
    fn generate(
        &mut self,
        ctx: &mut CommandContext<'_>,
        args: &GeneratorArgs,
        visibility: Option<&VisibilityData>,
    ) -> Result<Option<TextureView>>;
}

// ─── Registry ─────────────────────────────────────────────────────────────────

/// Id-keyed generator table.
///
/// `MainView` is served by the [`PassSequencer`](super::PassSequencer) itself
/// and cannot be registered here.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: FxHashMap<GeneratorId, Box<dyn SubGenerator>>,
}

impl GeneratorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `generator` under `id`, replacing any previous one.
    pub fn register(&mut self, id: GeneratorId, generator: Box<dyn SubGenerator>) -> Result<()> {
        if id == GeneratorId::MainView {
            return Err(RenderError::InvalidConfiguration(
                "the main view generator is the pass sequencer and cannot be registered".into(),
            ));
        }
        if self.generators.insert(id, generator).is_some() {
            log::debug!("Generator '{}' replaced", id.name());
        }
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, id: GeneratorId, generator: Box<dyn SubGenerator>) -> Result<Self> {
        self.register(id, generator)?;
        Ok(self)
    }

    #[must_use]
    #[inline]
    pub fn contains(&self, id: GeneratorId) -> bool {
        self.generators.contains_key(&id)
    }

    /// Fails with the first id in `ids` that has no generator.
    pub fn require(&self, ids: &[GeneratorId]) -> Result<()> {
        match ids.iter().find(|id| !self.contains(**id)) {
            Some(id) => Err(RenderError::GeneratorNotRegistered(*id)),
            None => Ok(()),
        }
    }

    /// Dispatches `args` to the generator registered for `args.id()`.
    pub fn generate(
        &mut self,
        ctx: &mut CommandContext<'_>,
        args: &GeneratorArgs,
        visibility: Option<&VisibilityData>,
    ) -> Result<Option<TextureView>> {
        let id = args.id();
        let generator = self
            .generators
            .get_mut(&id)
            .ok_or(RenderError::GeneratorNotRegistered(id))?;
        log::trace!("dispatch '{}'", id.name());
        generator.generate(ctx, args, visibility)
    }
}

