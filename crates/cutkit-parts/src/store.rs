//! The part store
//!
//! Single source of truth for every part in a project. All creation,
//! mutation, and removal goes through [`PartStore`]; collaborators (material
//! catalog, project sink, render sink) are injected at construction and
//! there is no process-wide instance.
//!
//! Persistence discipline: every mutating call ends with a full-store save
//! before it returns, and rolls the in-memory state back if that save fails.
//! The cut operation is transactional: either both children exist and the
//! parent is tombstoned, or nothing changed.

use crate::cut::{plan_cut, CutSpec};
use crate::events::{EventDispatcher, EventFilter, PartEvent, SubscriptionId};
use crate::part::{now_millis, CutRecord, Part, PartSeed, RoutedEdge};
use crate::render::{MeshHandle, NoOpRenderSink, RenderSink};
use cutkit_core::constants::BOARD_THICKNESS_FLOOR_IN;
use cutkit_core::data::materials::MaterialCatalog;
use cutkit_core::data::{Dimensions, PartId, PartType, SeparationMode, Vec3};
use cutkit_core::error::{PartError, PersistenceError, Result};
use cutkit_core::units::format_inches;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Durable backend the store writes its full contents to
///
/// The store saves every record, tombstones included, after each mutation;
/// `load` returns whatever the last save wrote, or an empty set for a fresh
/// project. Failures must surface as [`PersistenceError`], never be
/// swallowed.
pub trait ProjectSink {
    /// Persist the full set of part records
    fn save(&mut self, parts: &[&Part]) -> std::result::Result<(), PersistenceError>;

    /// Load the previously saved records
    fn load(&mut self) -> std::result::Result<Vec<Part>, PersistenceError>;
}

/// Sink that discards saves and loads nothing
///
/// For scratch sessions and tests that do not care about persistence.
#[derive(Debug, Default)]
pub struct NullProjectSink;

impl ProjectSink for NullProjectSink {
    fn save(&mut self, _parts: &[&Part]) -> std::result::Result<(), PersistenceError> {
        Ok(())
    }

    fn load(&mut self) -> std::result::Result<Vec<Part>, PersistenceError> {
        Ok(Vec::new())
    }
}

// Shared-handle wiring: an embedding application (or test) can keep its own
// Rc to a sink it also hands to the store.
impl<T: ProjectSink> ProjectSink for Rc<RefCell<T>> {
    fn save(&mut self, parts: &[&Part]) -> std::result::Result<(), PersistenceError> {
        self.borrow_mut().save(parts)
    }

    fn load(&mut self) -> std::result::Result<Vec<Part>, PersistenceError> {
        self.borrow_mut().load()
    }
}

/// Ids of the two pieces a committed cut produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutOutcome {
    /// The low-side piece.
    pub piece1: PartId,
    /// The high-side piece.
    pub piece2: PartId,
}

/// Owner of the live part collection
pub struct PartStore {
    parts: HashMap<PartId, Part>,
    meshes: HashMap<PartId, MeshHandle>,
    catalog: MaterialCatalog,
    project: Box<dyn ProjectSink>,
    render: Box<dyn RenderSink>,
    events: EventDispatcher,
    separation: SeparationMode,
}

impl PartStore {
    /// Create a store with injected collaborators
    pub fn new(
        catalog: MaterialCatalog,
        project: Box<dyn ProjectSink>,
        render: Box<dyn RenderSink>,
    ) -> Self {
        Self {
            parts: HashMap::new(),
            meshes: HashMap::new(),
            catalog,
            project,
            render,
            events: EventDispatcher::new(),
            separation: SeparationMode::default(),
        }
    }

    /// Create a store with no persistence and no rendering
    pub fn headless(catalog: MaterialCatalog) -> Self {
        Self::new(
            catalog,
            Box::new(NullProjectSink),
            Box::new(NoOpRenderSink::new()),
        )
    }

    /// Set the separation variant used when placing cut pieces
    pub fn with_separation(mut self, separation: SeparationMode) -> Self {
        self.separation = separation;
        self
    }

    /// The separation variant cuts are placed with
    pub fn separation_mode(&self) -> SeparationMode {
        self.separation
    }

    /// Change the separation variant for subsequent cuts
    pub fn set_separation_mode(&mut self, separation: SeparationMode) {
        self.separation = separation;
    }

    /// The material catalog parts are resolved against
    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Subscribe to change notifications
    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&PartEvent) + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    /// Drop a change-notification subscription
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Look up any record, tombstones included
    pub fn part(&self, id: PartId) -> Result<&Part> {
        self.parts
            .get(&id)
            .ok_or_else(|| PartError::NotFound { id: id.to_string() }.into())
    }

    /// Every record in the store, active and tombstoned
    pub fn all_parts(&self) -> Vec<&Part> {
        self.parts.values().collect()
    }

    /// Parts that have not been split; order-insensitive
    pub fn active_parts(&self) -> Vec<&Part> {
        self.parts.values().filter(|p| !p.is_split()).collect()
    }

    /// Split parts retained for lineage queries
    pub fn tombstones(&self) -> Vec<&Part> {
        self.parts.values().filter(|p| p.is_split()).collect()
    }

    /// Active parts of one type
    pub fn parts_by_type(&self, part_type: PartType) -> Vec<&Part> {
        self.parts
            .values()
            .filter(|p| !p.is_split() && p.part_type() == part_type)
            .collect()
    }

    /// Active boards
    pub fn boards(&self) -> Vec<&Part> {
        self.parts_by_type(PartType::Board)
    }

    /// Total record count, tombstones included
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The mesh registered for a part, if the render layer built one
    pub fn mesh_handle(&self, id: PartId) -> Option<MeshHandle> {
        self.meshes.get(&id).copied()
    }

    /// Create a part from fresh stock
    ///
    /// Resolves the seed's material against the catalog, validates
    /// dimensions, persists, builds a mesh, and emits `Created`.
    pub fn create_part(&mut self, seed: PartSeed) -> Result<PartId> {
        let material = self.catalog.resolve(&seed.material)?.to_ref();
        let part = Part::new(seed, material)?;
        let id = part.id();
        let part_type = part.part_type();
        self.parts.insert(id, part);

        match self.persist() {
            Ok(count) => {
                if let Some(part) = self.parts.get(&id) {
                    let handle = self.render.create_mesh(part);
                    self.meshes.insert(id, handle);
                }
                info!(part = %id, part_type = %part_type, "part created");
                self.events.publish(&PartEvent::Created { id });
                self.events.publish(&PartEvent::ProjectSaved { part_count: count });
                Ok(id)
            }
            Err(e) => {
                self.parts.remove(&id);
                warn!(part = %id, error = %e, "part creation rolled back, save failed");
                Err(e.into())
            }
        }
    }

    /// Move a part in world space
    pub fn set_part_position(&mut self, id: PartId, position: Vec3) -> Result<()> {
        let count = self.mutate_active(id, |part| {
            part.set_position(position);
            Ok(())
        })?;
        self.resync_mesh(id);
        self.events.publish(&PartEvent::Modified { id });
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    /// Rotate a part in world space
    pub fn set_part_rotation(&mut self, id: PartId, rotation: Vec3) -> Result<()> {
        let count = self.mutate_active(id, |part| {
            part.set_rotation(rotation);
            Ok(())
        })?;
        self.resync_mesh(id);
        self.events.publish(&PartEvent::Modified { id });
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    /// Replace a part's dimensions
    ///
    /// Rejected, not clamped, when a dimension is non-positive or a board
    /// would fall below the thickness floor.
    pub fn set_part_dimensions(&mut self, id: PartId, dimensions: Dimensions) -> Result<()> {
        let count = self.mutate_active(id, |part| part.set_dimensions(dimensions))?;
        self.resync_mesh(id);
        self.events.publish(&PartEvent::Modified { id });
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    /// Plane a board down to a target thickness
    ///
    /// The target must be positive, at or above the 1/8" floor, and thinner
    /// than the board's current thickness. Appends a `plane` entry to the
    /// modification log.
    pub fn plane_part(&mut self, id: PartId, new_thickness: f64) -> Result<()> {
        let part = self.lookup_board(id)?;
        let current = part.dimensions().thickness;
        if !(new_thickness > 0.0) {
            return Err(PartError::InvalidDimension {
                dimension: "thickness".to_string(),
                value: new_thickness,
            }
            .into());
        }
        if new_thickness < BOARD_THICKNESS_FLOOR_IN {
            return Err(PartError::BelowThicknessFloor {
                value: new_thickness,
                floor: BOARD_THICKNESS_FLOOR_IN,
            }
            .into());
        }
        if new_thickness >= current {
            return Err(PartError::PlaneTargetNotThinner {
                target: new_thickness,
                current,
            }
            .into());
        }

        let detail = format!(
            "{}\" -> {}\"",
            format_inches(current),
            format_inches(new_thickness)
        );
        let count = self.mutate_active(id, move |part| {
            let mut dims = part.dimensions();
            dims.thickness = new_thickness;
            part.set_dimensions(dims)?;
            part.push_modification("plane", detail);
            Ok(())
        })?;
        self.resync_mesh(id);
        info!(part = %id, thickness = new_thickness, "board planed");
        self.events.publish(&PartEvent::Planed { id, new_thickness });
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    /// Route a profile onto a board edge
    ///
    /// Routing an edge that already carries a profile replaces it. Depth
    /// must be positive and less than the board thickness.
    pub fn route_edge(&mut self, id: PartId, routed: RoutedEdge) -> Result<()> {
        let part = self.lookup_board(id)?;
        let thickness = part.dimensions().thickness;
        if !(routed.depth > 0.0) {
            return Err(PartError::InvalidDimension {
                dimension: "depth".to_string(),
                value: routed.depth,
            }
            .into());
        }
        if routed.depth >= thickness {
            return Err(PartError::RouteDepthExceedsThickness {
                depth: routed.depth,
                thickness,
            }
            .into());
        }

        let edge = routed.edge;
        let detail = format!(
            "{} at {}\" on the {} edge",
            routed.profile,
            format_inches(routed.depth),
            routed.edge
        );
        let count = self.mutate_active(id, move |part| {
            part.apply_routed_edge(routed);
            part.push_modification("route_edge", detail);
            Ok(())
        })?;
        self.resync_mesh(id);
        info!(part = %id, edge = %edge, "edge routed");
        self.events.publish(&PartEvent::EdgeRouted { id, edge });
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    /// Split a board into two pieces
    ///
    /// Plans the geometry, creates both children, tombstones the parent with
    /// a cut-history entry, and persists, all as one transaction. If the
    /// save fails, the store is exactly as before and the error surfaces.
    pub fn cut_part(&mut self, id: PartId, spec: &CutSpec) -> Result<CutOutcome> {
        let parent = self.part(id)?;
        let plan = plan_cut(parent, spec, self.separation)?;

        let parent_snapshot = parent.clone();
        let rotation = parent.rotation();
        let material = parent.material().clone();
        let grain = parent.grain();
        let grade = parent.grade();
        let part_type = parent.part_type();

        let seed1 = PartSeed {
            part_type,
            dimensions: plan.piece1.dimensions,
            position: plan.piece1.position,
            rotation,
            material: material.id.clone(),
            grain,
            grade,
        };
        let seed2 = PartSeed {
            part_type,
            dimensions: plan.piece2.dimensions,
            position: plan.piece2.position,
            rotation,
            material: material.id.clone(),
            grain,
            grade,
        };
        let mut piece1 = Part::new(seed1, material.clone())?;
        piece1.set_parent(Some(id));
        let mut piece2 = Part::new(seed2, material)?;
        piece2.set_parent(Some(id));
        let ids = [piece1.id(), piece2.id()];

        let record = CutRecord {
            timestamp: now_millis(),
            cut_type: spec.axis,
            cut_position: spec.position,
            kerf_width: spec.kerf_width,
            resulting_part_ids: ids,
        };
        let parent = self
            .parts
            .get_mut(&id)
            .ok_or_else(|| PartError::NotFound { id: id.to_string() })?;
        parent.record_cut(record);
        self.parts.insert(ids[0], piece1);
        self.parts.insert(ids[1], piece2);

        match self.persist() {
            Ok(count) => {
                if let Some(handle) = self.meshes.remove(&id) {
                    self.render.dispose_mesh(handle);
                }
                for pid in ids {
                    if let Some(part) = self.parts.get(&pid) {
                        let handle = self.render.create_mesh(part);
                        self.meshes.insert(pid, handle);
                    }
                }
                info!(
                    parent = %id,
                    piece1 = %ids[0],
                    piece2 = %ids[1],
                    axis = %spec.axis,
                    kerf = spec.kerf_width,
                    "cut committed"
                );
                self.events.publish(&PartEvent::Cut {
                    parent: id,
                    piece1: ids[0],
                    piece2: ids[1],
                });
                self.events.publish(&PartEvent::ProjectSaved { part_count: count });
                Ok(CutOutcome {
                    piece1: ids[0],
                    piece2: ids[1],
                })
            }
            Err(e) => {
                self.parts.remove(&ids[0]);
                self.parts.remove(&ids[1]);
                self.parts.insert(id, parent_snapshot);
                warn!(parent = %id, error = %e, "cut rolled back, save failed");
                Err(e.into())
            }
        }
    }

    /// Delete a record entirely, active or tombstone
    ///
    /// Lineage is severed in both directions: the parent's `child_ids` entry
    /// is cleared, and each surviving child's `parent_id` becomes `None`.
    /// Returns the removed record.
    pub fn remove_part(&mut self, id: PartId) -> Result<Part> {
        let Some(removed) = self.parts.remove(&id) else {
            return Err(PartError::NotFound { id: id.to_string() }.into());
        };
        let parent_snapshot = removed
            .parent_id()
            .and_then(|pid| self.parts.get(&pid).cloned());
        let child_snapshots: Vec<Part> = removed
            .child_ids()
            .iter()
            .filter_map(|cid| self.parts.get(cid).cloned())
            .collect();

        if let Some(pid) = removed.parent_id() {
            if let Some(parent) = self.parts.get_mut(&pid) {
                parent.remove_child(id);
            }
        }
        for cid in removed.child_ids() {
            if let Some(child) = self.parts.get_mut(cid) {
                child.set_parent(None);
            }
        }

        match self.persist() {
            Ok(count) => {
                if let Some(handle) = self.meshes.remove(&id) {
                    self.render.dispose_mesh(handle);
                }
                info!(part = %id, "part removed");
                self.events.publish(&PartEvent::Removed { id });
                self.events.publish(&PartEvent::ProjectSaved { part_count: count });
                Ok(removed)
            }
            Err(e) => {
                for snapshot in child_snapshots {
                    self.parts.insert(snapshot.id(), snapshot);
                }
                if let Some(snapshot) = parent_snapshot {
                    self.parts.insert(snapshot.id(), snapshot);
                }
                self.parts.insert(id, removed);
                warn!(part = %id, error = %e, "removal rolled back, save failed");
                Err(e.into())
            }
        }
    }

    /// Replace the store contents with the sink's saved records
    ///
    /// Rebuilds the active/tombstone partition from each record's
    /// `child_ids` and builds meshes for the active parts. Returns the
    /// number of records loaded. The store is untouched if the load fails.
    pub fn load_project(&mut self) -> Result<usize> {
        let records = self.project.load()?;

        for (_, handle) in self.meshes.drain() {
            self.render.dispose_mesh(handle);
        }
        self.parts.clear();
        let count = records.len();
        for part in records {
            self.parts.insert(part.id(), part);
        }

        let active: Vec<PartId> = self
            .parts
            .values()
            .filter(|p| !p.is_split())
            .map(|p| p.id())
            .collect();
        for pid in active {
            if let Some(part) = self.parts.get(&pid) {
                let handle = self.render.create_mesh(part);
                self.meshes.insert(pid, handle);
            }
        }

        info!(parts = count, "project loaded");
        self.events.publish(&PartEvent::ProjectLoaded { part_count: count });
        Ok(count)
    }

    /// Write the current contents through the project sink
    ///
    /// Called automatically by every mutating operation; exposed for an
    /// explicit save-now (e.g. before exit).
    pub fn save_project(&mut self) -> Result<()> {
        let count = self.persist()?;
        self.events.publish(&PartEvent::ProjectSaved { part_count: count });
        Ok(())
    }

    fn persist(&mut self) -> std::result::Result<usize, PersistenceError> {
        let parts: Vec<&Part> = self.parts.values().collect();
        self.project.save(&parts)?;
        debug!(parts = parts.len(), "project saved");
        Ok(parts.len())
    }

    /// Read access plus the board/active preconditions shared by bench ops
    fn lookup_board(&self, id: PartId) -> Result<&Part> {
        let part = self.part(id)?;
        if !part.is_board() {
            return Err(PartError::NotABoard {
                id: id.to_string(),
                part_type: part.part_type().to_string(),
            }
            .into());
        }
        if part.is_split() {
            return Err(PartError::NotActive { id: id.to_string() }.into());
        }
        Ok(part)
    }

    /// Mutate an active part with snapshot rollback if the save fails
    fn mutate_active<F>(&mut self, id: PartId, mutate: F) -> Result<usize>
    where
        F: FnOnce(&mut Part) -> std::result::Result<(), PartError>,
    {
        let part = self
            .parts
            .get_mut(&id)
            .ok_or_else(|| PartError::NotFound { id: id.to_string() })?;
        if part.is_split() {
            return Err(PartError::NotActive { id: id.to_string() }.into());
        }
        let snapshot = part.clone();
        mutate(part)?;

        match self.persist() {
            Ok(count) => Ok(count),
            Err(e) => {
                if let Some(part) = self.parts.get_mut(&id) {
                    part.restore(snapshot);
                }
                Err(e.into())
            }
        }
    }

    fn resync_mesh(&mut self, id: PartId) {
        if let Some(&handle) = self.meshes.get(&id) {
            if let Some(part) = self.parts.get(&id) {
                self.render.update_mesh_geometry(part, handle);
            }
        }
    }
}

impl fmt::Debug for PartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartStore")
            .field("parts", &self.parts.len())
            .field("active", &self.active_parts().len())
            .field("separation", &self.separation)
            .finish()
    }
}
