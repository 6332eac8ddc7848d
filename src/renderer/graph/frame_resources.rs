//! Frame Resource Pool
//!
//! Owns the fixed-format intermediate buffers that carry data between frame
//! stages (the G-buffer plus lighting / composite / depth-of-field targets).
//!
//! # Lifetime
//!
//! The set is created once for a fixed resolution and released once at
//! shutdown. It is never reallocated: every member always has the pool's
//! width and height.
//!
//! # Buffer Table
//!
//! | Buffer | Format | Views |
//! |--------|--------|-------|
//! | Depth | `Depth24PlusStencil8` | DSV + SRV (depth aspect) |
//! | Velocity | `Rg8Unorm` | RTV + SRV |
//! | Color | `Rgba8Unorm` | RTV + SRV |
//! | Normal | `Rgba16Unorm` | RTV + SRV |
//! | Ambient occlusion | `R8Unorm` | RTV + SRV |
//! | Lighting | `Rgba16Float` | RTV + SRV + UAV |
//! | Composite | `Rgba16Float` | RTV + SRV |
//! | Depth of field | `Rgba16Float` | RTV + SRV |

use crate::errors::Result;
use crate::renderer::core::{
    RenderDevice, ResourceArena, TextureDesc, TextureId, TextureView, ViewRole,
};

/// Entries of the pool's buffer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameBuffer {
    Depth,
    Velocity,
    Color,
    Normal,
    AmbientOcclusion,
    Lighting,
    Composite,
    DepthOfField,
}

impl FrameBuffer {
    /// All buffers, in creation order.
    pub const ALL: [FrameBuffer; 8] = [
        FrameBuffer::Depth,
        FrameBuffer::Velocity,
        FrameBuffer::Color,
        FrameBuffer::Normal,
        FrameBuffer::AmbientOcclusion,
        FrameBuffer::Lighting,
        FrameBuffer::Composite,
        FrameBuffer::DepthOfField,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Depth => "Scene Depth",
            Self::Velocity => "Velocity Buffer",
            Self::Color => "Color Buffer",
            Self::Normal => "Normal Buffer",
            Self::AmbientOcclusion => "SSAO Buffer",
            Self::Lighting => "Lighting Buffer",
            Self::Composite => "Composite Buffer",
            Self::DepthOfField => "Depth of Field Buffer",
        }
    }

    #[must_use]
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Depth => wgpu::TextureFormat::Depth24PlusStencil8,
            Self::Velocity => wgpu::TextureFormat::Rg8Unorm,
            Self::Color => wgpu::TextureFormat::Rgba8Unorm,
            Self::Normal => wgpu::TextureFormat::Rgba16Unorm,
            Self::AmbientOcclusion => wgpu::TextureFormat::R8Unorm,
            Self::Lighting | Self::Composite | Self::DepthOfField => {
                wgpu::TextureFormat::Rgba16Float
            }
        }
    }

    #[must_use]
    pub fn usage(self) -> wgpu::TextureUsages {
        let base = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        match self {
            Self::Lighting => base | wgpu::TextureUsages::STORAGE_BINDING,
            _ => base,
        }
    }

    #[must_use]
    pub fn desc(self, width: u32, height: u32) -> TextureDesc {
        TextureDesc {
            label: self.label(),
            width,
            height,
            format: self.format(),
            usage: self.usage(),
        }
    }
}

/// Depth buffer shared by geometry, sky and every screen-space stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthBuffer {
    pub id: TextureId,
    pub dsv: TextureView,
    pub srv: TextureView,
}

/// A color buffer written as a render target and sampled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBuffer {
    pub id: TextureId,
    pub rtv: TextureView,
    pub srv: TextureView,
}

/// The HDR lighting buffer, additionally writable through a UAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageBuffer {
    pub id: TextureId,
    pub rtv: TextureView,
    pub srv: TextureView,
    pub uav: TextureView,
}

/// The fixed set of per-resolution frame buffers.
pub struct FrameResourcePool {
    size: (u32, u32),
    /// Creation order; released in reverse.
    allocations: Vec<TextureId>,

    pub depth: DepthBuffer,
    pub velocity: ColorBuffer,
    pub color: ColorBuffer,
    pub normal: ColorBuffer,
    pub ambient_occlusion: ColorBuffer,
    pub lighting: StorageBuffer,
    pub composite: ColorBuffer,
    pub depth_of_field: ColorBuffer,
}

impl FrameResourcePool {
    /// Allocates every buffer of the table at `width` × `height`.
    ///
    /// On failure, the buffers allocated so far are released before the
    /// error is returned.
    pub fn new(
        device: &mut dyn RenderDevice,
        resources: &mut ResourceArena,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let mut allocations = Vec::with_capacity(FrameBuffer::ALL.len());

        for buffer in FrameBuffer::ALL {
            match resources.create_texture(device, buffer.desc(width, height)) {
                Ok(id) => allocations.push(id),
                Err(err) => {
                    for id in allocations.into_iter().rev() {
                        resources.release_texture(device, id);
                    }
                    return Err(err);
                }
            }
        }

        let pool = Self::from_allocations(resources, (width, height), allocations)?;
        log::debug!(
            "FrameResourcePool created: {width}x{height}, {} buffers",
            pool.allocations.len()
        );
        Ok(pool)
    }

    fn from_allocations(
        resources: &ResourceArena,
        size: (u32, u32),
        allocations: Vec<TextureId>,
    ) -> Result<Self> {
        let id = |buffer: FrameBuffer| allocations[buffer as usize];

        let color = |buffer: FrameBuffer| -> Result<ColorBuffer> {
            let id = id(buffer);
            Ok(ColorBuffer {
                id,
                rtv: resources.view(id, ViewRole::RenderTarget)?,
                srv: resources.view(id, ViewRole::ShaderResource)?,
            })
        };

        let depth_id = id(FrameBuffer::Depth);
        let lighting_id = id(FrameBuffer::Lighting);

        Ok(Self {
            size,
            depth: DepthBuffer {
                id: depth_id,
                dsv: resources.view(depth_id, ViewRole::DepthStencil)?,
                srv: resources.view(depth_id, ViewRole::ShaderResource)?,
            },
            velocity: color(FrameBuffer::Velocity)?,
            color: color(FrameBuffer::Color)?,
            normal: color(FrameBuffer::Normal)?,
            ambient_occlusion: color(FrameBuffer::AmbientOcclusion)?,
            lighting: StorageBuffer {
                id: lighting_id,
                rtv: resources.view(lighting_id, ViewRole::RenderTarget)?,
                srv: resources.view(lighting_id, ViewRole::ShaderResource)?,
                uav: resources.view(lighting_id, ViewRole::UnorderedAccess)?,
            },
            composite: color(FrameBuffer::Composite)?,
            depth_of_field: color(FrameBuffer::DepthOfField)?,
            allocations,
        })
    }

    /// Width and height shared by every buffer.
    #[must_use]
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Allocation backing `buffer`.
    #[must_use]
    #[inline]
    pub fn texture(&self, buffer: FrameBuffer) -> Option<TextureId> {
        self.allocations.get(buffer as usize).copied()
    }

    /// Live allocations owned by the pool.
    #[must_use]
    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    #[must_use]
    #[inline]
    pub fn is_released(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Releases every buffer exactly once, in reverse creation order.
    ///
    /// Calling it again is a no-op.
    pub fn shutdown(&mut self, device: &mut dyn RenderDevice, resources: &mut ResourceArena) {
        if self.allocations.is_empty() {
            return;
        }
        let count = self.allocations.len();
        for id in self.allocations.drain(..).rev() {
            resources.release_texture(device, id);
        }
        log::debug!("FrameResourcePool released {count} buffers");
    }
}

impl Drop for FrameResourcePool {
    fn drop(&mut self) {
        if !self.allocations.is_empty() {
            log::warn!(
                "FrameResourcePool dropped without shutdown; {} buffers leaked",
                self.allocations.len()
            );
        }
    }
}
