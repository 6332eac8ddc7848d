//! GPU Resource Arena
//!
//! Every device allocation owned by the orchestrator (or handed to it by the
//! caller) lives in a [`ResourceArena`] slot and is addressed by a stable
//! [`TextureId`]. Views never hold raw device handles: a [`TextureView`] is a
//! `(TextureId, ViewRole)` pair that is resolved through the arena at the
//! moment a command is recorded.
//!
//! ```text
//! ┌──────────────────────────── ResourceArena ────────────────────────────┐
//! │  TextureId ──► TextureEntry { desc, raw: RawTextureId }               │
//! │                                                                       │
//! │  TextureView { id, RenderTarget }    ─┐                               │
//! │  TextureView { id, ShaderResource }  ─┼─► resolve() ─► RawView         │
//! │  TextureView { id, UnorderedAccess } ─┘      (fails once released)     │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Releasing an allocation removes its slot; every view over it then fails
//! to resolve with [`RenderError::StaleResource`] instead of dangling.

use slotmap::SlotMap;

use crate::errors::{RenderError, Result};
use crate::renderer::core::device::{RawTextureId, RawView, RenderDevice};

slotmap::new_key_type! {
    /// Stable identifier of one device allocation.
    pub struct TextureId;
}

// ─── View Roles ───────────────────────────────────────────────────────────────

/// The ways an allocation can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewRole {
    /// Color attachment.
    RenderTarget,
    /// Sampled texture.
    ShaderResource,
    /// Depth/stencil attachment.
    DepthStencil,
    /// Read-write storage texture.
    UnorderedAccess,
}

impl ViewRole {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RenderTarget => "render_target",
            Self::ShaderResource => "shader_resource",
            Self::DepthStencil => "depth_stencil",
            Self::UnorderedAccess => "unordered_access",
        }
    }
}

/// A typed view over an arena allocation.
///
/// Cheap to copy; shares the lifetime of the allocation it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureView {
    pub texture: TextureId,
    pub role: ViewRole,
}

// ─── Descriptors ──────────────────────────────────────────────────────────────

/// Descriptor for a single-mip 2D allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

impl TextureDesc {
    /// Returns `true` if views of `role` may be created for this allocation.
    #[must_use]
    pub fn supports(&self, role: ViewRole) -> bool {
        let is_depth = self.format.is_depth_stencil_format();
        match role {
            ViewRole::RenderTarget => {
                !is_depth && self.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
            }
            ViewRole::DepthStencil => {
                is_depth && self.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
            }
            ViewRole::ShaderResource => self.usage.contains(wgpu::TextureUsages::TEXTURE_BINDING),
            ViewRole::UnorderedAccess => self.usage.contains(wgpu::TextureUsages::STORAGE_BINDING),
        }
    }

    /// Aspect used when viewing this allocation with `role`.
    ///
    /// Sampling a depth-stencil allocation reads the depth plane only.
    #[must_use]
    pub fn view_aspect(&self, role: ViewRole) -> wgpu::TextureAspect {
        if role == ViewRole::ShaderResource && self.format.is_depth_stencil_format() {
            wgpu::TextureAspect::DepthOnly
        } else {
            wgpu::TextureAspect::All
        }
    }
}

struct TextureEntry {
    desc: TextureDesc,
    raw: RawTextureId,
}

// ─── Arena ────────────────────────────────────────────────────────────────────

/// Owner of device allocations, indexed by [`TextureId`].
#[derive(Default)]
pub struct ResourceArena {
    textures: SlotMap<TextureId, TextureEntry>,
}

impl ResourceArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a texture on `device` and registers it in the arena.
    pub fn create_texture(
        &mut self,
        device: &mut dyn RenderDevice,
        desc: TextureDesc,
    ) -> Result<TextureId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "texture '{}' has zero extent ({}x{})",
                desc.label, desc.width, desc.height
            )));
        }

        let raw = device
            .create_texture(&desc)
            .map_err(|source| RenderError::ResourceCreationFailure {
                label: desc.label,
                source,
            })?;

        log::trace!(
            "Created texture '{}' {}x{} {:?}",
            desc.label,
            desc.width,
            desc.height,
            desc.format
        );

        Ok(self.textures.insert(TextureEntry { desc, raw }))
    }

    /// Releases an allocation. Returns `false` if it was already released.
    pub fn release_texture(&mut self, device: &mut dyn RenderDevice, id: TextureId) -> bool {
        match self.textures.remove(id) {
            Some(entry) => {
                log::trace!("Released texture '{}'", entry.desc.label);
                device.release_texture(entry.raw);
                true
            }
            None => false,
        }
    }

    /// Creates a view of `role` over `id`.
    pub fn view(&self, id: TextureId, role: ViewRole) -> Result<TextureView> {
        let entry = self.entry(id)?;
        if !entry.desc.supports(role) {
            return Err(RenderError::InvalidView {
                label: entry.desc.label,
                role: role.name(),
            });
        }
        Ok(TextureView { texture: id, role })
    }

    /// Resolves a view to the raw device handle it refers to.
    pub fn resolve(&self, view: TextureView) -> Result<RawView> {
        let entry = self.entry(view.texture)?;
        Ok(RawView {
            texture: entry.raw,
            role: view.role,
            format: entry.desc.format,
            aspect: entry.desc.view_aspect(view.role),
        })
    }

    #[must_use]
    pub fn desc(&self, id: TextureId) -> Option<&TextureDesc> {
        self.textures.get(id).map(|e| &e.desc)
    }

    #[must_use]
    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.textures.contains_key(id)
    }

    /// Number of live allocations.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn entry(&self, id: TextureId) -> Result<&TextureEntry> {
        self.textures
            .get(id)
            .ok_or_else(|| RenderError::StaleResource(format!("{id:?}")))
    }
}
