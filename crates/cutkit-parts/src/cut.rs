//! Cut planning
//!
//! Pure geometry: given a parent part and a cut description, derive the two
//! child pieces (dimensions, world positions, kerf loss) without touching any
//! state. [`crate::store::PartStore::cut_part`] validates a plan here first,
//! then commits it as one transaction.
//!
//! A cross cut splits the `width` dimension, a rip cut splits `length`. With
//! `cut_in = position * extent`, the pieces measure `cut_in - kerf/2` and
//! `extent - cut_in - kerf/2`, so piece1 + piece2 + kerf always reconstructs
//! the parent extent.

use crate::part::Part;
use cutkit_core::config::CutSettings;
use cutkit_core::constants::DEFAULT_KERF_IN;
use cutkit_core::data::{CutAxis, Dimensions, SeparationMode, Vec3};
use cutkit_core::error::{CutError, Error, PartError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A requested cut
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutSpec {
    /// Which dimension the cut splits
    pub axis: CutAxis,
    /// Fraction along that dimension, strictly between 0 and 1, measured
    /// from the low edge
    pub position: f64,
    /// Blade width consumed by the cut, inches
    #[serde(default = "default_kerf")]
    pub kerf_width: f64,
}

fn default_kerf() -> f64 {
    DEFAULT_KERF_IN
}

impl CutSpec {
    /// Create a cut spec with an explicit kerf
    pub fn new(axis: CutAxis, position: f64, kerf_width: f64) -> Self {
        Self {
            axis,
            position,
            kerf_width,
        }
    }

    /// Cross cut at a fraction of the width, shop-default kerf
    pub fn cross(position: f64) -> Self {
        Self::new(CutAxis::Cross, position, DEFAULT_KERF_IN)
    }

    /// Rip cut at a fraction of the length, shop-default kerf
    pub fn rip(position: f64) -> Self {
        Self::new(CutAxis::Rip, position, DEFAULT_KERF_IN)
    }

    /// Override the kerf width
    pub fn with_kerf(mut self, kerf_width: f64) -> Self {
        self.kerf_width = kerf_width;
        self
    }

    /// Cut spec taking its kerf from shop configuration
    pub fn from_settings(settings: &CutSettings, axis: CutAxis, position: f64) -> Self {
        Self::new(axis, position, settings.default_kerf)
    }
}

/// Geometry of one piece a planned cut will produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecePlan {
    /// The piece's stock dimensions, inches
    pub dimensions: Dimensions,
    /// The piece's world position, inches
    pub position: Vec3,
}

/// A fully validated cut, ready for the store to commit
///
/// `piece1` is the low-edge side of the cut plane, `piece2` the high side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPlan {
    /// Which dimension was split
    pub axis: CutAxis,
    /// The requested position fraction
    pub position: f64,
    /// Kerf consumed by the blade, inches
    pub kerf_width: f64,
    /// Distance from the low edge to the theoretical cut plane, inches
    pub cut_in: f64,
    /// The low-side piece
    pub piece1: PiecePlan,
    /// The high-side piece
    pub piece2: PiecePlan,
}

/// Plan a cut against a parent part
///
/// Validates the request and computes both child geometries. The parent is
/// only read; committing the plan is the store's job. Fails when the parent
/// is not a board, has already been split, or when the position/kerf cannot
/// yield two positive pieces.
pub fn plan_cut(parent: &Part, spec: &CutSpec, separation: SeparationMode) -> Result<CutPlan, Error> {
    if !parent.is_board() {
        return Err(PartError::NotABoard {
            id: parent.id().to_string(),
            part_type: parent.part_type().to_string(),
        }
        .into());
    }
    if parent.is_split() {
        return Err(CutError::AlreadySplit {
            id: parent.id().to_string(),
        }
        .into());
    }
    if !(spec.kerf_width > 0.0) {
        return Err(CutError::InvalidKerf {
            kerf: spec.kerf_width,
        }
        .into());
    }
    if !(spec.position > 0.0 && spec.position < 1.0) {
        return Err(CutError::PositionOutOfRange {
            position: spec.position,
        }
        .into());
    }

    let dims = parent.dimensions();
    let extent = match spec.axis {
        CutAxis::Cross => dims.width,
        CutAxis::Rip => dims.length,
    };
    if spec.kerf_width >= extent {
        return Err(CutError::KerfExceedsStock {
            kerf: spec.kerf_width,
            dimension: spec.axis.dimension_name().to_string(),
            extent,
        }
        .into());
    }

    let cut_in = spec.position * extent;
    let half_kerf = spec.kerf_width / 2.0;
    let extent1 = cut_in - half_kerf;
    let extent2 = extent - cut_in - half_kerf;
    for (piece, computed) in [(1u8, extent1), (2u8, extent2)] {
        if !(computed > 0.0) {
            return Err(CutError::PieceTooSmall {
                piece,
                dimension: spec.axis.dimension_name().to_string(),
                computed,
            }
            .into());
        }
    }

    // Placement: both pieces part around the theoretical cut plane. The
    // kerf-centered default is the fixed-gap formula with gap = kerf, which
    // keeps the parent's outer faces exactly where they were.
    let gap = match separation {
        SeparationMode::KerfCentered => spec.kerf_width,
        SeparationMode::FixedGap { gap } => gap,
    };
    let pos = parent.position();
    let center = match spec.axis {
        CutAxis::Cross => pos.x,
        CutAxis::Rip => pos.z,
    };
    let plane = center - extent / 2.0 + cut_in;
    let center1 = plane - gap / 2.0 - extent1 / 2.0;
    let center2 = plane + gap / 2.0 + extent2 / 2.0;

    let (dims1, dims2, pos1, pos2) = match spec.axis {
        CutAxis::Cross => (
            Dimensions::new(dims.length, extent1, dims.thickness),
            Dimensions::new(dims.length, extent2, dims.thickness),
            Vec3::new(center1, pos.y, pos.z),
            Vec3::new(center2, pos.y, pos.z),
        ),
        CutAxis::Rip => (
            Dimensions::new(extent1, dims.width, dims.thickness),
            Dimensions::new(extent2, dims.width, dims.thickness),
            Vec3::new(pos.x, pos.y, center1),
            Vec3::new(pos.x, pos.y, center2),
        ),
    };

    debug!(
        part = %parent.id(),
        axis = %spec.axis,
        position = spec.position,
        kerf = spec.kerf_width,
        piece1 = extent1,
        piece2 = extent2,
        "planned cut"
    );

    Ok(CutPlan {
        axis: spec.axis,
        position: spec.position,
        kerf_width: spec.kerf_width,
        cut_in,
        piece1: PiecePlan {
            dimensions: dims1,
            position: pos1,
        },
        piece2: PiecePlan {
            dimensions: dims2,
            position: pos2,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{CutRecord, PartSeed};
    use cutkit_core::data::materials::{MaterialId, MaterialRef};
    use cutkit_core::data::PartType;

    fn oak_ref() -> MaterialRef {
        MaterialRef {
            id: MaterialId::from("wood_oak_red"),
            name: "Red Oak".to_string(),
            texture: None,
            color: Some([0.65, 0.5, 0.4]),
        }
    }

    fn shelf_board() -> Part {
        let seed = PartSeed::board(
            Dimensions::new(96.0, 6.0, 0.75),
            MaterialId::from("wood_oak_red"),
        );
        Part::new(seed, oak_ref()).unwrap()
    }

    #[test]
    fn test_cross_cut_even_split() {
        let board = shelf_board();
        let plan = plan_cut(&board, &CutSpec::cross(0.5), SeparationMode::KerfCentered).unwrap();

        assert_eq!(plan.cut_in, 3.0);
        assert_eq!(plan.piece1.dimensions, Dimensions::new(96.0, 2.9375, 0.75));
        assert_eq!(plan.piece2.dimensions, Dimensions::new(96.0, 2.9375, 0.75));

        // Widths shift along X; the other coordinates stay the parent's
        assert_eq!(plan.piece1.position, Vec3::new(-1.53125, 0.0, 0.0));
        assert_eq!(plan.piece2.position, Vec3::new(1.53125, 0.0, 0.0));
    }

    #[test]
    fn test_rip_cut_quarter() {
        let board = shelf_board();
        let plan = plan_cut(&board, &CutSpec::rip(0.25), SeparationMode::KerfCentered).unwrap();

        assert_eq!(plan.piece1.dimensions, Dimensions::new(23.9375, 6.0, 0.75));
        assert_eq!(plan.piece2.dimensions, Dimensions::new(71.9375, 6.0, 0.75));

        // piece1 + piece2 + kerf reconstructs the parent length
        let total = plan.piece1.dimensions.length + plan.piece2.dimensions.length + plan.kerf_width;
        assert_eq!(total, 96.0);

        // Lengths shift along Z
        assert_eq!(plan.piece1.position, Vec3::new(0.0, 0.0, -36.03125));
        assert_eq!(plan.piece2.position, Vec3::new(0.0, 0.0, 12.03125));
    }

    #[test]
    fn test_kerf_centered_keeps_outer_faces() {
        let seed = PartSeed::board(
            Dimensions::new(96.0, 6.0, 0.75),
            MaterialId::from("wood_oak_red"),
        )
        .at(Vec3::new(5.0, 0.375, -2.0));
        let board = Part::new(seed, oak_ref()).unwrap();

        let spec = CutSpec::cross(0.3125).with_kerf(0.09375);
        let plan = plan_cut(&board, &spec, SeparationMode::KerfCentered).unwrap();

        let low_face = plan.piece1.position.x - plan.piece1.dimensions.width / 2.0;
        let high_face = plan.piece2.position.x + plan.piece2.dimensions.width / 2.0;
        assert_eq!(low_face, 2.0);
        assert_eq!(high_face, 8.0);

        // Gap between the pieces' inner faces is exactly the kerf
        let inner_gap = (plan.piece2.position.x - plan.piece2.dimensions.width / 2.0)
            - (plan.piece1.position.x + plan.piece1.dimensions.width / 2.0);
        assert_eq!(inner_gap, 0.09375);

        assert_eq!(plan.piece1.position.y, 0.375);
        assert_eq!(plan.piece1.position.z, -2.0);
    }

    #[test]
    fn test_fixed_gap_spreads_pieces() {
        let seed = PartSeed::board(
            Dimensions::new(96.0, 6.0, 0.75),
            MaterialId::from("wood_oak_red"),
        )
        .at(Vec3::new(0.0, 0.0, 10.0));
        let board = Part::new(seed, oak_ref()).unwrap();

        let plan = plan_cut(
            &board,
            &CutSpec::rip(0.5),
            SeparationMode::FixedGap { gap: 2.0 },
        )
        .unwrap();

        // Material loss is still the kerf; only placement differs
        assert_eq!(plan.piece1.dimensions.length, 47.9375);
        assert_eq!(plan.piece2.dimensions.length, 47.9375);

        assert_eq!(plan.piece1.position, Vec3::new(0.0, 0.0, -14.96875));
        assert_eq!(plan.piece2.position, Vec3::new(0.0, 0.0, 34.96875));

        let inner_gap = (plan.piece2.position.z - plan.piece2.dimensions.length / 2.0)
            - (plan.piece1.position.z + plan.piece1.dimensions.length / 2.0);
        assert_eq!(inner_gap, 2.0);
    }

    #[test]
    fn test_kerf_centered_is_fixed_gap_of_kerf() {
        let board = shelf_board();
        let spec = CutSpec::rip(0.25);
        let centered = plan_cut(&board, &spec, SeparationMode::KerfCentered).unwrap();
        let gapped = plan_cut(&board, &spec, SeparationMode::FixedGap { gap: 0.125 }).unwrap();
        assert_eq!(centered, gapped);
    }

    #[test]
    fn test_cut_at_bounds_rejected() {
        let board = shelf_board();
        for position in [0.0, 1.0, -0.5, 1.5] {
            let err = plan_cut(
                &board,
                &CutSpec::cross(position),
                SeparationMode::KerfCentered,
            )
            .unwrap_err();
            assert!(
                matches!(err, Error::Cut(CutError::PositionOutOfRange { .. })),
                "position {position} should be rejected"
            );
        }
    }

    #[test]
    fn test_kerf_wider_than_stock_rejected() {
        let board = shelf_board();
        let spec = CutSpec::cross(0.5).with_kerf(7.0);
        let err = plan_cut(&board, &spec, SeparationMode::KerfCentered).unwrap_err();
        assert!(matches!(
            err,
            Error::Cut(CutError::KerfExceedsStock { kerf, extent, .. }) if kerf == 7.0 && extent == 6.0
        ));
        assert!(err.is_invalid_cut());
    }

    #[test]
    fn test_non_positive_kerf_rejected() {
        let board = shelf_board();
        for kerf in [0.0, -0.125] {
            let spec = CutSpec::cross(0.5).with_kerf(kerf);
            let err = plan_cut(&board, &spec, SeparationMode::KerfCentered).unwrap_err();
            assert!(matches!(err, Error::Cut(CutError::InvalidKerf { .. })));
        }
    }

    #[test]
    fn test_piece_too_small_rejected() {
        let board = shelf_board();

        // cut_in = 0.03" leaves piece1 negative after the half kerf
        let err = plan_cut(
            &board,
            &CutSpec::cross(0.005),
            SeparationMode::KerfCentered,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Cut(CutError::PieceTooSmall { piece: 1, .. })
        ));

        let err = plan_cut(
            &board,
            &CutSpec::cross(0.995),
            SeparationMode::KerfCentered,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Cut(CutError::PieceTooSmall { piece: 2, .. })
        ));
    }

    #[test]
    fn test_cut_non_board_rejected() {
        let seed = PartSeed::new(
            PartType::Fastener,
            Dimensions::new(1.5, 0.25, 0.25),
            MaterialId::from("wood_oak_red"),
        );
        let fastener = Part::new(seed, oak_ref()).unwrap();
        let err = plan_cut(&fastener, &CutSpec::cross(0.5), SeparationMode::KerfCentered)
            .unwrap_err();
        assert!(matches!(err, Error::Part(PartError::NotABoard { .. })));
    }

    #[test]
    fn test_cut_tombstone_rejected() {
        let mut board = shelf_board();
        board.record_cut(CutRecord {
            timestamp: 0,
            cut_type: CutAxis::Cross,
            cut_position: 0.5,
            kerf_width: 0.125,
            resulting_part_ids: [cutkit_core::data::PartId::new(), cutkit_core::data::PartId::new()],
        });
        let err = plan_cut(&board, &CutSpec::cross(0.5), SeparationMode::KerfCentered)
            .unwrap_err();
        assert!(matches!(err, Error::Cut(CutError::AlreadySplit { .. })));
        assert!(err.is_invalid_cut());
    }

    #[test]
    fn test_cut_spec_serde_default_kerf() {
        let spec: CutSpec = serde_json::from_str(r#"{"axis":"rip","position":0.25}"#).unwrap();
        assert_eq!(spec.kerf_width, DEFAULT_KERF_IN);
        assert_eq!(spec.axis, CutAxis::Rip);
    }

    #[test]
    fn test_cut_spec_from_settings() {
        let settings = CutSettings {
            default_kerf: 0.09375,
            ..CutSettings::default()
        };
        let spec = CutSpec::from_settings(&settings, CutAxis::Cross, 0.5);
        assert_eq!(spec.kerf_width, 0.09375);
        assert_eq!(spec.axis, CutAxis::Cross);
        assert_eq!(spec.position, 0.5);
    }
}
