//! Shader Library
//!
//! The shader/permutation system is external. The orchestrator only needs to
//! turn names into handles, once, at construction:
//!
//! | Lookup | Names used by the sequencer |
//! |--------|-----------------------------|
//! | [`ShaderLibrary::pass_index`] | `gbuffer`, `gbuffer_alpha_masked`, `skydome`, `debug` |
//! | [`ShaderLibrary::shader`]     | `camera_velocity`, `reflections_composite` |
//!
//! [`StaticShaderLibrary`] is a plain name table for hosts whose shaders are
//! known up front.

use rustc_hash::FxHashMap;

use super::pipeline_id::{PassIndex, ShaderHandle};
use crate::errors::{RenderError, Result};

/// Name → handle resolution for passes and full-screen shaders.
pub trait ShaderLibrary {
    fn pass_index(&self, name: &str) -> Option<PassIndex>;

    fn shader(&self, name: &str) -> Option<ShaderHandle>;
}

/// Resolves a pass, reporting a missing one as [`RenderError::PassNotFound`].
pub fn require_pass(library: &dyn ShaderLibrary, name: &str) -> Result<PassIndex> {
    library
        .pass_index(name)
        .ok_or_else(|| RenderError::PassNotFound(format!("pass '{name}'")))
}

/// Resolves a full-screen shader, reporting a missing one as
/// [`RenderError::PassNotFound`].
pub fn require_shader(library: &dyn ShaderLibrary, name: &str) -> Result<ShaderHandle> {
    library
        .shader(name)
        .ok_or_else(|| RenderError::PassNotFound(format!("shader '{name}'")))
}

/// A fixed name table.
#[derive(Debug, Default, Clone)]
pub struct StaticShaderLibrary {
    passes: FxHashMap<String, PassIndex>,
    shaders: FxHashMap<String, ShaderHandle>,
}

impl StaticShaderLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pass and returns its index. Re-registering a name keeps
    /// the original index.
    pub fn add_pass(&mut self, name: impl Into<String>) -> PassIndex {
        let next = PassIndex(self.passes.len() as u32);
        *self.passes.entry(name.into()).or_insert(next)
    }

    /// Registers a full-screen shader and returns its handle.
    pub fn add_shader(&mut self, name: impl Into<String>) -> ShaderHandle {
        let next = ShaderHandle(self.shaders.len() as u32);
        *self.shaders.entry(name.into()).or_insert(next)
    }

    /// Library containing every pass and shader the sequencer resolves.
    #[must_use]
    pub fn with_deferred_defaults() -> Self {
        let mut lib = Self::new();
        for pass in ["gbuffer", "gbuffer_alpha_masked", "skydome", "debug"] {
            lib.add_pass(pass);
        }
        for shader in ["camera_velocity", "reflections_composite"] {
            lib.add_shader(shader);
        }
        lib
    }
}

impl ShaderLibrary for StaticShaderLibrary {
    fn pass_index(&self, name: &str) -> Option<PassIndex> {
        self.passes.get(name).copied()
    }

    fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }
}
