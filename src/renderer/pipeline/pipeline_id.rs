//! Strongly-typed shader handles.
//!
//! Thin `Copy` wrappers around a `u32` index owned by a
//! [`ShaderLibrary`](super::ShaderLibrary). Distinct newtypes keep pass
//! indices (queued geometry) and full-screen shader handles apart.

/// Index of a named render pass (material pass) in the shader library.
///
/// Queued geometry is drawn with the permutation of each item's material
/// that belongs to this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassIndex(pub u32);

impl PassIndex {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a full-screen shader permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

impl ShaderHandle {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
