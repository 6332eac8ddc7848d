//! Render Queues
//!
//! Scene visibility and queue building are external. The orchestrator asks a
//! [`QueueBuilder`] for one [`RenderQueue`] per fixed [`PassCategory`] at the
//! start of every frame and treats the result as an opaque, ordered list of
//! items to hand back to the device.
//!
//! [`SortedQueueBuilder`] is a minimal builder: it filters visible items by
//! their pass membership mask and orders them by sort key.

use bitflags::bitflags;

/// The fixed pass categories a frame builds queues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassCategory {
    /// Opaque G-buffer geometry.
    Opaque,
    /// Alpha-tested G-buffer geometry.
    AlphaMasked,
    /// Sky dome, drawn after compositing.
    Sky,
    /// Debug overlays.
    Debug,
}

impl PassCategory {
    /// All categories, in queue order.
    pub const ALL: [PassCategory; 4] = [
        PassCategory::Opaque,
        PassCategory::AlphaMasked,
        PassCategory::Sky,
        PassCategory::Debug,
    ];

    /// Pass name as registered in the shader library.
    #[must_use]
    pub fn pass_name(self) -> &'static str {
        match self {
            Self::Opaque => "gbuffer",
            Self::AlphaMasked => "gbuffer_alpha_masked",
            Self::Sky => "skydome",
            Self::Debug => "debug",
        }
    }

    #[must_use]
    pub fn mask(self) -> PassMask {
        match self {
            Self::Opaque => PassMask::OPAQUE,
            Self::AlphaMasked => PassMask::ALPHA_MASKED,
            Self::Sky => PassMask::SKY,
            Self::Debug => PassMask::DEBUG,
        }
    }

    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Which pass categories a visible item takes part in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PassMask: u8 {
        const OPAQUE       = 1 << 0;
        const ALPHA_MASKED = 1 << 1;
        const SKY          = 1 << 2;
        const DEBUG        = 1 << 3;
    }
}

/// One visible renderable, as produced by the visibility system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleItem {
    /// Host-defined renderable id.
    pub id: u64,
    pub passes: PassMask,
    /// Host-defined ordering key (material / depth packing).
    pub sort_key: u64,
}

/// Output of scene visibility for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityData {
    pub items: Vec<VisibleItem>,
}

/// A queued draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderItem {
    pub id: u64,
    pub sort_key: u64,
}

/// Ordered items for one pass category. Lives for a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderQueue {
    pub category: PassCategory,
    pub items: Vec<RenderItem>,
}

impl RenderQueue {
    #[must_use]
    pub fn new(category: PassCategory) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The four per-frame queues, indexed by [`PassCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderQueues {
    queues: [RenderQueue; 4],
}

impl RenderQueues {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            queues: PassCategory::ALL.map(RenderQueue::new),
        }
    }

    #[must_use]
    #[inline]
    pub fn get(&self, category: PassCategory) -> &RenderQueue {
        &self.queues[category.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, category: PassCategory) -> &mut RenderQueue {
        &mut self.queues[category.index()]
    }
}

/// External queue building from scene visibility.
pub trait QueueBuilder {
    /// Builds one queue per category from `visibility`.
    fn build_render_queues(&mut self, visibility: &VisibilityData) -> RenderQueues;
}

/// Filters by pass mask and orders by sort key (stable).
#[derive(Debug, Default, Clone, Copy)]
pub struct SortedQueueBuilder;

impl QueueBuilder for SortedQueueBuilder {
    fn build_render_queues(&mut self, visibility: &VisibilityData) -> RenderQueues {
        let mut queues = RenderQueues::empty();

        for item in &visibility.items {
            for category in PassCategory::ALL {
                if item.passes.contains(category.mask()) {
                    queues.get_mut(category).items.push(RenderItem {
                        id: item.id,
                        sort_key: item.sort_key,
                    });
                }
            }
        }

        for category in PassCategory::ALL {
            queues
                .get_mut(category)
                .items
                .sort_by_key(|item| item.sort_key);
        }

        queues
    }
}
