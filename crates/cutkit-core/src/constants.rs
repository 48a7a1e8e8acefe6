//! Shop-wide constants shared across the workspace.

/// Default saw kerf in inches (1/8" blade).
pub const DEFAULT_KERF_IN: f64 = 0.125;

/// Minimum board thickness in inches; planing or resizing below this is rejected.
pub const BOARD_THICKNESS_FLOOR_IN: f64 = 0.125;

/// Scene units per inch at the render boundary.
///
/// The part layer computes exclusively in inches; only render adapters apply
/// this scale (see [`crate::units::to_scene_units`]).
pub const SCENE_UNITS_PER_INCH: f64 = 2.54;

/// Cubic inches per board foot.
pub const CUBIC_INCHES_PER_BOARD_FOOT: f64 = 144.0;

/// Absolute tolerance for dimension comparisons in inches.
pub const DIMENSION_EPSILON: f64 = 1e-9;
