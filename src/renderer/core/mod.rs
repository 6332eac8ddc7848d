//! Device-facing core
//!
//! Provides:
//! - `RenderDevice`: the external device interface the orchestrator records into
//! - `ResourceArena`: id-indexed ownership of device allocations and typed views
//! - `CommandContext`: per-frame recording context with explicit binding state
//! - `ParameterBlock`: transient per-draw bindings for full-screen passes
//! - `RenderView` / `Viewport`: rendering jobs and pixel rectangles

pub mod binding;
pub mod context;
pub mod device;
pub mod resources;
pub mod view;

pub use binding::ParameterBlock;
pub use context::{BindingState, CommandContext};
pub use device::{RawTextureId, RawView, RenderDevice, ViewParameters};
pub use resources::{ResourceArena, TextureDesc, TextureId, TextureView, ViewRole};
pub use view::{RenderView, Viewport};
