//! Stage Profiler
//!
//! Flat, named CPU scopes around each frame stage. Scopes never nest: a
//! scope must be closed before the next one opens. Records of the last
//! completed frame stay available until the next [`Profiler::begin_frame`].

use std::time::{Duration, Instant};

/// Handle of an open scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(u32);

/// A closed scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRecord {
    pub name: &'static str,
    pub duration: Duration,
}

#[derive(Debug, Default)]
pub struct Profiler {
    open: Option<(ScopeId, &'static str, Instant)>,
    next_id: u32,
    records: Vec<ScopeRecord>,
}

impl Profiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the previous frame's records.
    pub fn begin_frame(&mut self) {
        debug_assert!(self.open.is_none(), "frame started with an open scope");
        self.open = None;
        self.records.clear();
    }

    /// Opens a scope.
    ///
    /// # Panics
    ///
    /// Panics if another scope is still open.
    pub fn begin_scope(&mut self, name: &'static str) -> ScopeId {
        if let Some((_, open_name, _)) = self.open {
            panic!("profiler scope '{name}' opened inside '{open_name}'; scopes are flat");
        }
        let id = ScopeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.open = Some((id, name, Instant::now()));
        log::trace!("begin scope '{name}'");
        id
    }

    /// Closes the scope `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not the open scope.
    pub fn end_scope(&mut self, id: ScopeId) {
        match self.open.take() {
            Some((open_id, name, start)) if open_id == id => {
                let duration = start.elapsed();
                log::trace!("end scope '{name}' ({duration:?})");
                self.records.push(ScopeRecord { name, duration });
            }
            other => panic!("profiler end_scope({id:?}) does not match open scope {other:?}"),
        }
    }

    /// Records of the current (or last completed) frame, in order.
    #[must_use]
    pub fn frame_records(&self) -> &[ScopeRecord] {
        &self.records
    }

    /// Scope names of the current (or last completed) frame, in order.
    #[must_use]
    pub fn scope_names(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.name).collect()
    }
}
