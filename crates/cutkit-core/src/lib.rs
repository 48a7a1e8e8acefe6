//! # Cutkit Core
//!
//! Core types and utilities for Cutkit.
//! Provides the error taxonomy, unit handling, shop configuration, and the
//! material catalog that the part model builds on.

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod units;

pub use config::{CutSettings, DisplaySettings, ProjectSettings, ShopConfig, StockSettings};

pub use data::{
    materials::{standard_catalog, Material, MaterialCatalog, MaterialCategory, MaterialId, MaterialRef},
    BoardEdge, CutAxis, Dimensions, Grade, Grain, PartId, PartType, SeparationMode, Vec3,
};

pub use error::{CutError, Error, PartError, PersistenceError, Result};

pub use units::{
    board_feet, format_inches, from_scene_units, get_unit_label, parse_inches, to_scene_units,
    MeasurementSystem,
};
