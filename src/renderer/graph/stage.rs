//! Frame Stage Definitions
//!
//! `FrameStage` names the fixed stage order of one generated frame. Each
//! stage runs inside a profiler scope and a device debug group of the same
//! name.

/// Frame stage enumeration, in execution order.
///
/// # Stage Overview
///
/// | Stage | Reads | Writes | Gated by |
/// |-------|-------|--------|----------|
/// | `Clear` | | depth, color, normal | |
/// | `BuildQueues` | visibility | render queues | |
/// | `GBuffer` | opaque queue | color, normal, depth | |
/// | `GBufferAlphaMasked` | alpha-masked queue | color, normal, depth | |
/// | `CameraVelocity` | depth | velocity | |
/// | `AmbientOcclusion` | normal, depth | ambient occlusion | |
/// | `VolumetricLights` | depth, shadow atlas | scattering | `volumetric_lights` |
/// | `TiledLighting` | G-buffer, AO, scattering | HDR lighting (UAV) | |
/// | `Reflections` | lighting, normal, depth | reflections | `reflections.enabled` |
/// | `Composite` | lighting, reflections, G-buffer, LUT | composite | |
/// | `Sky` | sky queue | composite (depth-tested) | |
/// | `DepthOfField` | composite, depth | depth of field | |
/// | `MotionBlur` | velocity, DoF, depth | blurred image | `motion_blur.enabled` |
/// | `ToneMap` | DoF or blurred image | frame target | |
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[repr(u8)]
pub enum FrameStage {
    Clear = 0,
    BuildQueues = 1,
    GBuffer = 2,
    GBufferAlphaMasked = 3,
    CameraVelocity = 4,
    AmbientOcclusion = 5,
    VolumetricLights = 6,
    TiledLighting = 7,
    Reflections = 8,
    Composite = 9,
    Sky = 10,
    DepthOfField = 11,
    MotionBlur = 12,
    ToneMap = 13,
}

impl FrameStage {
    /// All stages, in execution order.
    pub const ALL: [FrameStage; 14] = [
        Self::Clear,
        Self::BuildQueues,
        Self::GBuffer,
        Self::GBufferAlphaMasked,
        Self::CameraVelocity,
        Self::AmbientOcclusion,
        Self::VolumetricLights,
        Self::TiledLighting,
        Self::Reflections,
        Self::Composite,
        Self::Sky,
        Self::DepthOfField,
        Self::MotionBlur,
        Self::ToneMap,
    ];

    /// Scope and debug-group name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::BuildQueues => "build_queues",
            Self::GBuffer => "gbuffer",
            Self::GBufferAlphaMasked => "gbuffer_alpha_masked",
            Self::CameraVelocity => "camera_velocity",
            Self::AmbientOcclusion => "ssao",
            Self::VolumetricLights => "volumetric_lights",
            Self::TiledLighting => "tiled_deferred",
            Self::Reflections => "screen_space_reflections",
            Self::Composite => "composite",
            Self::Sky => "skydome",
            Self::DepthOfField => "depth_of_field",
            Self::MotionBlur => "motion_blur",
            Self::ToneMap => "tonemap",
        }
    }

    /// Returns `true` for stages that reset bindings before binding fresh
    /// targets.
    #[inline]
    #[must_use]
    pub const fn resets_bindings(self) -> bool {
        matches!(
            self,
            Self::CameraVelocity | Self::TiledLighting | Self::Composite | Self::Sky
        )
    }
}
