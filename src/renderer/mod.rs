//! Deferred frame orchestration
//!
//! - core: device interface, resource arena, command context, views
//! - pipeline: pass and shader lookup
//! - graph: sequencer, frame buffers, shadow cascades, generators
//! - settings: construction-time configuration

pub mod core;
pub mod graph;
pub mod pipeline;
pub mod settings;

pub use graph::{FrameArgs, PassSequencer};
pub use settings::{SequencerSettings, ShadowSettings};
