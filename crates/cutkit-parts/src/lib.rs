//! # Cutkit Parts
//!
//! The part model: one entity for every physical piece of stock in a
//! project, a store that owns them all, and the cut planner that turns one
//! board into two.
//!
//! ## Core Components
//!
//! - **Part**: dimensioned stock with material, placement, grain/grade, an
//!   append-only modification log, and cut lineage links
//! - **PartStore**: the single owner of all parts; every create, mutate,
//!   cut, and remove goes through it and persists before returning
//! - **Cut planning**: pure geometry that turns a cut request into two
//!   consistent piece plans, kerf accounted for
//! - **Lineage**: ancestor/descendant walks and dimension reconstruction
//!   over the tombstone tree
//! - **Events**: synchronous change notifications with per-subscriber
//!   category filters
//! - **Render boundary**: the `RenderSink` trait and opaque mesh handles;
//!   the scene layer never holds references into part internals
//!
//! ## Architecture
//!
//! ```text
//! PartStore (owns every Part)
//!   ├── CutSpec -> plan_cut -> CutPlan (pure, no store access)
//!   ├── ProjectSink (injected persistence, full save per mutation)
//!   ├── RenderSink (injected scene layer, id-keyed mesh table)
//!   └── EventDispatcher (synchronous, store-owned)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cutkit_core::data::materials::{standard_catalog, MaterialId};
//! use cutkit_core::data::Dimensions;
//! use cutkit_parts::{CutSpec, PartSeed, PartStore};
//!
//! let mut store = PartStore::headless(standard_catalog());
//! let board = store.create_part(PartSeed::board(
//!     Dimensions::new(96.0, 6.0, 0.75),
//!     MaterialId::from("wood_walnut"),
//! ))?;
//!
//! // Rip a quarter off; the board becomes a tombstone, two pieces appear
//! let outcome = store.cut_part(board, &CutSpec::rip(0.25))?;
//! ```

pub mod cut;
pub mod events;
pub mod lineage;
pub mod part;
pub mod render;
pub mod store;

pub use cut::{plan_cut, CutPlan, CutSpec, PiecePlan};
pub use events::{EventCategory, EventDispatcher, EventFilter, PartEvent, SubscriptionId};
pub use part::{CutRecord, Modification, Part, PartSeed, RoutedEdge};
pub use render::{MeshHandle, NoOpRenderSink, RecordingRenderSink, RenderSink};
pub use store::{CutOutcome, NullProjectSink, PartStore, ProjectSink};
