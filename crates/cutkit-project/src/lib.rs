//! # Cutkit Project
//!
//! Project persistence: the on-disk record format and the sinks a
//! `PartStore` writes through.
//!
//! ## Core Components
//!
//! - **ProjectFile**: the format-versioned serde record carrying every part,
//!   tombstones included, so lineage survives a reload
//! - **FileProjectStore**: file-backed sink with atomic writes (temp file
//!   next to the target, then rename) and a stable project id
//! - **MemoryProjectStore**: in-memory sink with a failure toggle for
//!   exercising rollback paths
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cutkit_core::data::materials::standard_catalog;
//! use cutkit_parts::{NoOpRenderSink, PartStore};
//! use cutkit_project::FileProjectStore;
//!
//! let sink = FileProjectStore::new("projects/bench.json");
//! let mut store = PartStore::new(
//!     standard_catalog(),
//!     Box::new(sink),
//!     Box::new(NoOpRenderSink::new()),
//! );
//! store.load_project()?;
//! ```

pub mod project;

pub use project::{
    FileProjectStore, MemoryProjectStore, ProjectFile, FILE_FORMAT_VERSION,
};
