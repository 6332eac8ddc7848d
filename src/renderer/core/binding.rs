//! Transient Parameter Blocks
//!
//! A [`ParameterBlock`] is the per-draw binding group for full-screen passes:
//! a fixed number of shader-resource slots plus a constant buffer. Blocks are
//! built inside a frame and dropped at the end of it.

use smallvec::SmallVec;

use crate::renderer::core::resources::TextureView;

/// Shader-resource slots and packed constants for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBlock {
    label: &'static str,
    srvs: SmallVec<[Option<TextureView>; 8]>,
    constants: SmallVec<[u8; 256]>,
}

impl ParameterBlock {
    /// Creates a block with `srv_slots` empty slots.
    #[must_use]
    pub fn new(label: &'static str, srv_slots: usize) -> Self {
        Self {
            label,
            srvs: SmallVec::from_elem(None, srv_slots),
            constants: SmallVec::new(),
        }
    }

    /// Binds `view` (or nothing) to `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range for the block's layout.
    pub fn set_srv(&mut self, slot: usize, view: Option<TextureView>) -> &mut Self {
        assert!(
            slot < self.srvs.len(),
            "ParameterBlock '{}' has {} slots, got slot {slot}",
            self.label,
            self.srvs.len()
        );
        self.srvs[slot] = view;
        self
    }

    /// Replaces the constant buffer contents with `value`.
    pub fn set_constants<T: bytemuck::Pod>(&mut self, value: &T) -> &mut Self {
        self.constants.clear();
        self.constants.extend_from_slice(bytemuck::bytes_of(value));
        self
    }

    #[must_use]
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    #[inline]
    pub fn srvs(&self) -> &[Option<TextureView>] {
        &self.srvs
    }

    #[must_use]
    #[inline]
    pub fn constants(&self) -> &[u8] {
        &self.constants
    }
}
