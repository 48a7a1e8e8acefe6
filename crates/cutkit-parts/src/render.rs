//! Render layer boundary
//!
//! The store never builds visuals itself; it drives an injected
//! [`RenderSink`] and keeps its own `PartId -> MeshHandle` table. The render
//! layer holds opaque handles, never references into part internals, and
//! reads part snapshots passed to it at call time. Scene-unit scaling
//! (1 in = 2.54 scene units) is the sink implementation's business, via the
//! helpers in `cutkit_core::units`.

use crate::part::Part;
use cutkit_core::data::PartId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Opaque handle to a mesh owned by the render layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mesh({})", self.0)
    }
}

/// Interface the store drives to keep visuals in sync
///
/// Implementations build whatever scene representation they like; the store
/// only promises to call `create_mesh` once per live part, `update_mesh_geometry`
/// after any geometry or placement change, and `dispose_mesh` exactly once
/// when the part leaves the active collection.
pub trait RenderSink {
    /// Build a mesh for a newly created part
    fn create_mesh(&mut self, part: &Part) -> MeshHandle;

    /// Resync an existing mesh after the part's dimensions or placement changed
    fn update_mesh_geometry(&mut self, part: &Part, handle: MeshHandle);

    /// Drop a mesh whose part was cut or removed
    fn dispose_mesh(&mut self, handle: MeshHandle);
}

/// Headless sink: allocates handles and builds nothing
///
/// The default for batch tooling and the report binary.
#[derive(Debug, Default)]
pub struct NoOpRenderSink {
    next: u64,
}

impl NoOpRenderSink {
    /// Create a headless sink
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for NoOpRenderSink {
    fn create_mesh(&mut self, _part: &Part) -> MeshHandle {
        self.next += 1;
        MeshHandle(self.next)
    }

    fn update_mesh_geometry(&mut self, _part: &Part, _handle: MeshHandle) {}

    fn dispose_mesh(&mut self, _handle: MeshHandle) {}
}

// Shared-handle wiring: the embedding application keeps its own Rc to the
// sink it hands the store, so it can inspect or drive the scene directly.
impl<T: RenderSink> RenderSink for Rc<RefCell<T>> {
    fn create_mesh(&mut self, part: &Part) -> MeshHandle {
        self.borrow_mut().create_mesh(part)
    }

    fn update_mesh_geometry(&mut self, part: &Part, handle: MeshHandle) {
        self.borrow_mut().update_mesh_geometry(part, handle)
    }

    fn dispose_mesh(&mut self, handle: MeshHandle) {
        self.borrow_mut().dispose_mesh(handle)
    }
}

/// Sink that records every call it receives, for tests
#[derive(Debug, Default)]
pub struct RecordingRenderSink {
    next: u64,
    /// Handles issued, in creation order, with the part they were built for.
    pub created: Vec<(MeshHandle, PartId)>,
    /// Geometry resyncs, in call order.
    pub updated: Vec<(MeshHandle, PartId)>,
    /// Handles disposed, in call order.
    pub disposed: Vec<MeshHandle>,
}

impl RecordingRenderSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes created and not yet disposed
    pub fn live_count(&self) -> usize {
        self.created.len() - self.disposed.len()
    }
}

impl RenderSink for RecordingRenderSink {
    fn create_mesh(&mut self, part: &Part) -> MeshHandle {
        self.next += 1;
        let handle = MeshHandle(self.next);
        self.created.push((handle, part.id()));
        handle
    }

    fn update_mesh_geometry(&mut self, part: &Part, handle: MeshHandle) {
        self.updated.push((handle, part.id()));
    }

    fn dispose_mesh(&mut self, handle: MeshHandle) {
        self.disposed.push(handle);
    }
}
