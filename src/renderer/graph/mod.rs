//! Frame orchestration
//!
//! Provides:
//! - PassSequencer: the main-view generator running the fixed stage order
//! - FrameResourcePool: per-resolution intermediate buffers
//! - CascadedShadowMapCoordinator: cascade fitting and the shadow atlas
//! - GeneratorRegistry / SubGenerator: id-keyed dispatch to pluggable stages
//! - QueueBuilder: per-frame render queues from visibility
//! - Profiler: flat per-stage scopes

pub mod cascaded_shadow;
pub mod frame;
pub mod frame_resources;
pub mod generator;
pub mod passes;
pub mod profiler;
pub mod queue;
pub mod sequencer;
pub mod shadow_utils;
pub mod stage;

pub use cascaded_shadow::{Cascade, CascadedShadowMapCoordinator, ShadowParams};
pub use frame::{DepthOfFieldSettings, FrameArgs, MotionBlurSettings, ReflectionSettings};
pub use frame_resources::{ColorBuffer, DepthBuffer, FrameBuffer, FrameResourcePool, StorageBuffer};
pub use generator::{
    AmbientOcclusionArgs, DepthOfFieldArgs, GeneratorArgs, GeneratorId, GeneratorRegistry,
    MotionBlurArgs, ReflectionArgs, ShadowMapArgs, SubGenerator, TiledLightingArgs, ToneMapArgs,
    VolumetricLightArgs,
};
pub use profiler::{Profiler, ScopeRecord};
pub use queue::{
    PassCategory, PassMask, QueueBuilder, RenderItem, RenderQueue, RenderQueues,
    SortedQueueBuilder, VisibilityData, VisibleItem,
};
pub use sequencer::{PassSequencer, REQUIRED_GENERATORS};
pub use stage::FrameStage;
