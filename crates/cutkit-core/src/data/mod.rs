//! Data models for part identity, stock vocabulary, and geometry
//!
//! This module provides:
//! - Part identifiers (UUID-backed, immutable, never reused)
//! - Part type, grain, grade, and board edge vocabulary
//! - Dimension and world-placement structures (canonical unit: inches)
//! - The material catalog (see [`materials`])
//!
//! Axis convention throughout the workspace: `width` spans world X,
//! `thickness` spans world Y, `length` spans world Z.

pub mod materials;

use crate::error::PartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Part identifier
///
/// Globally unique, assigned at creation, never reused. Serialized as the
/// plain UUID string in project records. Ordered so id can break ties when
/// sorting parts by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(Uuid);

impl PartId {
    /// Allocate a fresh unique id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PartId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Part type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartType {
    /// Dimensioned lumber; carries grain, grade, routed edges, and cut history
    Board,
    /// Screws, nails, dowels
    Fastener,
    /// Hinges, pulls, slides
    Hardware,
}

impl Default for PartType {
    fn default() -> Self {
        Self::Board
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board => write!(f, "board"),
            Self::Fastener => write!(f, "fastener"),
            Self::Hardware => write!(f, "hardware"),
        }
    }
}

/// Grain orientation of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    /// Grain runs along the length axis
    Vertical,
    /// Grain runs along the width axis
    Horizontal,
}

impl Default for Grain {
    fn default() -> Self {
        Self::Vertical
    }
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Hardwood lumber grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Firsts and Seconds, the highest appearance grade
    Fas,
    /// Select grade
    Select,
    /// Number 1 Common
    Common1,
    /// Number 2 Common
    Common2,
}

impl Default for Grade {
    fn default() -> Self {
        Self::Select
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fas => write!(f, "FAS"),
            Self::Select => write!(f, "Select"),
            Self::Common1 => write!(f, "#1 Common"),
            Self::Common2 => write!(f, "#2 Common"),
        }
    }
}

/// Edge of a board face, for routing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl fmt::Display for BoardEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Stock dimensions in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in inches (world Z)
    pub length: f64,
    /// Width in inches (world X)
    pub width: f64,
    /// Thickness in inches (world Y)
    pub thickness: f64,
}

impl Dimensions {
    /// Create dimensions from inch values
    pub fn new(length: f64, width: f64, thickness: f64) -> Self {
        debug_assert!(
            length.is_finite() && width.is_finite() && thickness.is_finite(),
            "Dimensions must be finite: length={length}, width={width}, thickness={thickness}"
        );
        Self {
            length,
            width,
            thickness,
        }
    }

    /// Reject any dimension that is not strictly positive
    pub fn validate(&self) -> Result<(), PartError> {
        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("thickness", self.thickness),
        ] {
            if !(value > 0.0) {
                return Err(PartError::InvalidDimension {
                    dimension: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Board-foot volume of this stock
    pub fn board_feet(&self) -> f64 {
        crate::units::board_feet(self.length, self.width, self.thickness)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {}",
            crate::units::format_inches(self.length),
            crate::units::format_inches(self.width),
            crate::units::format_inches(self.thickness)
        )
    }
}

/// Axis of a saw cut
///
/// A cross cut splits the `width` dimension (world X); a rip cut splits the
/// `length` dimension (world Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutAxis {
    /// Across the width of the board
    Cross,
    /// Along the length of the board
    Rip,
}

impl CutAxis {
    /// Name of the dimension this axis splits
    pub fn dimension_name(&self) -> &'static str {
        match self {
            Self::Cross => "width",
            Self::Rip => "length",
        }
    }
}

impl fmt::Display for CutAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cross => write!(f, "cross"),
            Self::Rip => write!(f, "rip"),
        }
    }
}

impl FromStr for CutAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cross" | "crosscut" => Ok(Self::Cross),
            "rip" => Ok(Self::Rip),
            _ => Err(format!("Unknown cut axis: {}", s)),
        }
    }
}

/// How the two pieces of a cut are parted in world space
///
/// Material loss is always the kerf; this only controls placement. The two
/// historical behaviors are unified here as named variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SeparationMode {
    /// Pieces stay abutting with exactly the kerf of separation, centered on
    /// the cut plane. The default.
    KerfCentered,
    /// Pieces are spread by an explicit gap centered on the cut plane, as a
    /// bench layout aid.
    FixedGap {
        /// Gap between the pieces in inches
        gap: f64,
    },
}

impl Default for SeparationMode {
    fn default() -> Self {
        Self::KerfCentered
    }
}

impl fmt::Display for SeparationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KerfCentered => write!(f, "kerf-centered"),
            Self::FixedGap { gap } => write!(f, "fixed gap {}\"", gap),
        }
    }
}

/// A world-space vector in inches, used for both position and rotation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Create a vector from components
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Vec3 components must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Self::default()
    }
}
