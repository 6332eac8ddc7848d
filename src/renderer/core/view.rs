//! Render View Abstraction
//!
//! Defines [`RenderView`], a camera + generator + arguments triple describing
//! one rendering job for a frame.
//!
//! # "Everything is a View" Architecture
//!
//! - **Main view**: 1 view, produced by the caller, dispatched to the
//!   [`PassSequencer`](crate::renderer::graph::PassSequencer).
//! - **Shadow cascades**: 4 secondary views, produced by
//!   [`PassSequencer::secondary_views`](crate::renderer::graph::PassSequencer::secondary_views)
//!   and dispatched to the `ShadowMap` generator.
//!
//! # Frame Schedule
//!
//! ```text
//! secondary_views(camera)
//!     ├── CSM update + atlas clear
//!     └── 4 × RenderView { ShadowMap, cascade camera, atlas sub-viewport }
//!
//! render_view(shadow views...)   → atlas populated
//! render_view(main view)         → 14 stages → tone-mapped target
//! ```

use crate::renderer::graph::generator::{GeneratorArgs, GeneratorId};
use crate::scene::camera::Camera;

/// Pixel rectangle within a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a whole `width` × `height` target.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[must_use]
    pub fn overlaps(&self, other: &Viewport) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    #[must_use]
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// One rendering job: who renders it, from where, with what.
#[derive(Debug, Clone)]
pub struct RenderView {
    /// Debug name (e.g. `"CSM_Cascade_2"`).
    pub name: String,
    pub camera: Camera,
    pub generator: GeneratorId,
    pub args: GeneratorArgs,
}

impl RenderView {
    #[must_use]
    pub fn new(name: impl Into<String>, camera: Camera, args: GeneratorArgs) -> Self {
        Self {
            name: name.into(),
            camera,
            generator: args.id(),
            args,
        }
    }

    /// Returns `true` if this is a shadow view.
    #[inline]
    #[must_use]
    pub fn is_shadow(&self) -> bool {
        self.generator == GeneratorId::ShadowMap
    }
}
