//! Error handling for Cutkit
//!
//! Provides error types for all layers of the part model:
//! - Part errors (validation, lookup, material resolution)
//! - Cut errors (geometry that would produce an impossible piece)
//! - Persistence errors (the durable project record could not be written/read)
//!
//! All error types use `thiserror` for ergonomic error handling. Persistence
//! failures are always surfaced through these types to the caller; no layer
//! logs-and-swallows a failed save.

use thiserror::Error;

/// Part error type
///
/// Represents errors raised while creating, mutating, or resolving parts,
/// including dimension validation and material catalog lookups.
#[derive(Error, Debug, Clone)]
pub enum PartError {
    /// A dimension was zero or negative
    #[error("Invalid {dimension} dimension {value}: must be greater than zero")]
    InvalidDimension {
        /// The dimension name ("length", "width", or "thickness").
        dimension: String,
        /// The rejected value in inches.
        value: f64,
    },

    /// A board thickness fell below the planing floor
    #[error("Thickness {value}\" is below the {floor}\" board minimum")]
    BelowThicknessFloor {
        /// The rejected thickness in inches.
        value: f64,
        /// The minimum board thickness in inches.
        floor: f64,
    },

    /// A planing target did not reduce the thickness
    #[error("Planing target {target}\" must be thinner than the current {current}\"")]
    PlaneTargetNotThinner {
        /// The requested thickness in inches.
        target: f64,
        /// The board's current thickness in inches.
        current: f64,
    },

    /// A routing depth reached through the board
    #[error("Routing depth {depth}\" must be less than the {thickness}\" board thickness")]
    RouteDepthExceedsThickness {
        /// The requested depth in inches.
        depth: f64,
        /// The board's thickness in inches.
        thickness: f64,
    },

    /// No part with the given id exists in the store
    #[error("Part not found: {id}")]
    NotFound {
        /// The unresolved part id.
        id: String,
    },

    /// The part exists but has been split and is no longer active
    #[error("Part {id} has been split and is no longer active")]
    NotActive {
        /// The tombstoned part id.
        id: String,
    },

    /// A material id did not resolve against the catalog
    #[error("Material not found in catalog: {id}")]
    MaterialNotFound {
        /// The unresolved material id.
        id: String,
    },

    /// A board-only operation was applied to a non-board part
    #[error("Part {id} is a {part_type}, not a board")]
    NotABoard {
        /// The part id.
        id: String,
        /// The part's actual type.
        part_type: String,
    },
}

/// Cut error type
///
/// Represents a requested cut whose geometry cannot yield two valid pieces.
/// The parent part is always left untouched when one of these is returned.
#[derive(Error, Debug, Clone)]
pub enum CutError {
    /// Cut position must be a fraction strictly inside the stock
    #[error("Cut position {position} must lie strictly between 0 and 1")]
    PositionOutOfRange {
        /// The rejected position fraction.
        position: f64,
    },

    /// Kerf is as wide as (or wider than) the stock being split
    #[error("Kerf {kerf}\" meets or exceeds the {extent}\" {dimension}")]
    KerfExceedsStock {
        /// The kerf width in inches.
        kerf: f64,
        /// The dimension being split ("width" or "length").
        dimension: String,
        /// The parent's extent along that dimension in inches.
        extent: f64,
    },

    /// The cut would leave one piece with a non-positive dimension
    #[error("Cut leaves piece {piece} with {dimension} {computed}\": must be greater than zero")]
    PieceTooSmall {
        /// Which piece failed validation (1 or 2).
        piece: u8,
        /// The dimension being split.
        dimension: String,
        /// The computed size in inches.
        computed: f64,
    },

    /// The kerf width itself was not a positive number
    #[error("Kerf width {kerf} must be greater than zero")]
    InvalidKerf {
        /// The rejected kerf width.
        kerf: f64,
    },

    /// The part was already consumed by an earlier cut
    #[error("Part {id} has already been cut")]
    AlreadySplit {
        /// The tombstoned part id.
        id: String,
    },
}

/// Persistence error type
///
/// Represents failures writing or reading the durable project record.
/// These propagate to the caller of the mutating store operation; the store
/// rolls its in-memory state back before returning one.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error during project file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The project file carries a format version this build cannot read
    #[error("Unsupported project format {found} (supported: {supported})")]
    FormatVersion {
        /// The version string found in the file.
        found: String,
        /// The version string this build supports.
        supported: String,
    },

    /// The persistence backend refused the write
    #[error("Persistence backend unavailable: {reason}")]
    Unavailable {
        /// The reason the backend gave.
        reason: String,
    },
}

/// Main error type for Cutkit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Part error
    #[error(transparent)]
    Part(#[from] PartError),

    /// Cut error
    #[error(transparent)]
    Cut(#[from] CutError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a part-not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Part(PartError::NotFound { .. }))
    }

    /// Check if this is a dimension validation error
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            Error::Part(PartError::InvalidDimension { .. })
                | Error::Part(PartError::BelowThicknessFloor { .. })
                | Error::Part(PartError::PlaneTargetNotThinner { .. })
                | Error::Part(PartError::RouteDepthExceedsThickness { .. })
        )
    }

    /// Check if this is a cut geometry error
    pub fn is_invalid_cut(&self) -> bool {
        matches!(self, Error::Cut(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

// Conversions between error types are automatic via `from` implementations

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_error_display() {
        let err = PartError::InvalidDimension {
            dimension: "width".to_string(),
            value: -2.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid width dimension -2: must be greater than zero"
        );

        let err = PartError::BelowThicknessFloor {
            value: 0.1,
            floor: 0.125,
        };
        assert_eq!(err.to_string(), "Thickness 0.1\" is below the 0.125\" board minimum");

        let err = PartError::PlaneTargetNotThinner {
            target: 1.0,
            current: 0.75,
        };
        assert_eq!(
            err.to_string(),
            "Planing target 1\" must be thinner than the current 0.75\""
        );

        let err = PartError::NotFound {
            id: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Part not found: missing");
    }

    #[test]
    fn test_cut_error_display() {
        let err = CutError::PositionOutOfRange { position: 1.0 };
        assert_eq!(
            err.to_string(),
            "Cut position 1 must lie strictly between 0 and 1"
        );

        let err = CutError::KerfExceedsStock {
            kerf: 7.0,
            dimension: "width".to_string(),
            extent: 6.0,
        };
        assert_eq!(err.to_string(), "Kerf 7\" meets or exceeds the 6\" width");
    }

    #[test]
    fn test_error_classification() {
        let err: Error = PartError::NotFound {
            id: "x".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(!err.is_invalid_cut());

        let err: Error = CutError::PositionOutOfRange { position: 0.0 }.into();
        assert!(err.is_invalid_cut());

        let err: Error = PartError::RouteDepthExceedsThickness {
            depth: 1.0,
            thickness: 0.75,
        }
        .into();
        assert!(err.is_invalid_dimension());

        let err: Error = PersistenceError::Unavailable {
            reason: "disk full".to_string(),
        }
        .into();
        assert!(err.is_persistence());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = PersistenceError::from(io).into();
        assert!(err.is_persistence());
    }
}
