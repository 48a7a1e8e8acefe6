//! # Cutkit
//!
//! A workshop cut list manager that tracks boards through cross cuts, rip
//! cuts, and planing while preserving part lineage and kerf accounting.
//!
//! ## Architecture
//!
//! Cutkit is organized as a workspace with three library crates:
//!
//! 1. **cutkit-core** - Errors, units, constants, shop configuration, material catalog
//! 2. **cutkit-parts** - Part entity, part store, cut planner, lineage, events, render boundary
//! 3. **cutkit-project** - Project file format and file-backed persistence
//!
//! The root crate re-exports the public surface, owns logging setup, and
//! ships the `cutkit` binary: a read-side cut list report over a saved
//! project file.
//!
//! ## Features
//!
//! - **Cut decomposition**: one board becomes two consistent pieces, kerf
//!   loss accounted for, parent retained as a lineage tombstone
//! - **Persistent by default**: every mutating operation writes the full
//!   project record before returning, with rollback on failure
//! - **Lineage queries**: ancestor chains, descendant trees, dimension
//!   reconstruction, and per-tree kerf totals
//! - **Imperial units**: canonical inches with fractional parsing and
//!   display to the nearest 1/32
//! - **Injected boundaries**: persistence and rendering arrive as traits,
//!   so headless, file-backed, and scene-backed stores share one core

pub mod types;

pub use cutkit_core::{
    board_feet, format_inches, from_scene_units, parse_inches, standard_catalog, to_scene_units,
    BoardEdge, CutAxis, CutError, CutSettings, Dimensions, DisplaySettings, Error, Grade, Grain,
    Material, MaterialCatalog, MaterialCategory, MaterialId, MaterialRef, MeasurementSystem,
    PartError, PartId, PartType, PersistenceError, ProjectSettings, Result, SeparationMode,
    ShopConfig, StockSettings, Vec3,
};

pub use cutkit_parts::{
    plan_cut, CutOutcome, CutPlan, CutRecord, CutSpec, EventCategory, EventDispatcher,
    EventFilter, MeshHandle, Modification, NoOpRenderSink, NullProjectSink, Part, PartEvent,
    PartSeed, PartStore, PiecePlan, ProjectSink, RecordingRenderSink, RenderSink, RoutedEdge,
    SubscriptionId,
};

pub use cutkit_project::{FileProjectStore, MemoryProjectStore, ProjectFile, FILE_FORMAT_VERSION};

use std::collections::BTreeMap;
use std::fmt;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Structured console output on stderr (the report owns stdout), honoring
/// `RUST_LOG` with an `info` default.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

/// Cut list report over a loaded store
///
/// Read-side only: groups active parts by material with fractional
/// dimensions and board feet, then prints one lineage tree per cut root
/// with its kerf loss. Renders through `Display`.
pub struct ProjectReport<'a> {
    store: &'a PartStore,
}

impl<'a> ProjectReport<'a> {
    pub fn new(store: &'a PartStore) -> Self {
        Self { store }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: PartId, depth: usize) -> fmt::Result {
        let Ok(part) = self.store.part(id) else {
            return Ok(());
        };
        write!(f, "{:width$}{}", "", part.dimensions(), width = 2 + depth * 2)?;
        if depth == 0 {
            write!(f, " {}", part.material().name)?;
        }
        if part.is_split() {
            write!(f, " [cut]")?;
        }
        writeln!(f)?;
        for child in part.child_ids() {
            self.write_node(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProjectReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut active = self.store.active_parts();
        active.sort_by_key(|p| (p.created(), p.id()));
        let cut_count = self.store.tombstones().len();

        writeln!(f, "Cut list: {} active, {} cut", active.len(), cut_count)?;

        let mut groups: BTreeMap<&str, Vec<&Part>> = BTreeMap::new();
        for part in active {
            groups
                .entry(part.material().name.as_str())
                .or_default()
                .push(part);
        }

        let mut total = 0.0;
        for (material, parts) in &groups {
            let subtotal: f64 = parts.iter().map(|p| p.board_feet()).sum();
            total += subtotal;
            writeln!(f, "\n{material}: {subtotal:.2} bf")?;
            for part in parts {
                let dims = part.dimensions().to_string();
                writeln!(f, "  {dims:<35}{:>6.2} bf", part.board_feet())?;
            }
        }
        writeln!(f, "\nTotal: {total:.2} bf")?;

        let mut roots: Vec<&Part> = self
            .store
            .all_parts()
            .into_iter()
            .filter(|p| p.parent_id().is_none() && p.is_split())
            .collect();
        roots.sort_by_key(|p| (p.created(), p.id()));

        if !roots.is_empty() {
            writeln!(f, "\nLineage")?;
            for root in roots {
                self.write_node(f, root.id(), 0)?;
                let kerf = self.store.subtree_kerf_volume(root.id()).unwrap_or(0.0);
                writeln!(f, "  kerf loss: {kerf:.2} cu in")?;
            }
        }

        Ok(())
    }
}
