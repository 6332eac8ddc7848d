//! Shader lookup
//!
//! - `PassIndex` / `ShaderHandle`: typed handles into the external shader system
//! - `ShaderLibrary`: name → handle resolution, performed once at construction

pub mod pipeline_id;
pub mod shader_library;

pub use pipeline_id::{PassIndex, ShaderHandle};
pub use shader_library::{ShaderLibrary, StaticShaderLibrary, require_pass, require_shader};
