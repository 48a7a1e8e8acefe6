//! Property tests for cut planning and lineage conservation
//!
//! Randomized checks of the planner's guarantees: stock is never created or
//! destroyed, kerf-centered placement keeps the parent's outer faces, every
//! rejection is an invalid-cut error rather than a panic, and dimension
//! reconstruction over a cut tree recovers the original stock size.

use cutkit_core::data::materials::{standard_catalog, MaterialId};
use cutkit_core::data::{CutAxis, Dimensions, PartId, SeparationMode, Vec3};
use cutkit_parts::{plan_cut, CutSpec, PartSeed, PartStore};
use proptest::prelude::*;
use std::collections::HashSet;

const TOL: f64 = 1e-9;

/// Stock sizes roomy enough that positions in [0.1, 0.9) with kerfs up to
/// 1/4" always yield two positive pieces.
fn arb_dims() -> impl Strategy<Value = Dimensions> {
    (6.0..120.0f64, 2.0..24.0f64, 0.25..2.0f64)
        .prop_map(|(length, width, thickness)| Dimensions::new(length, width, thickness))
}

fn arb_axis() -> impl Strategy<Value = CutAxis> {
    prop_oneof![Just(CutAxis::Cross), Just(CutAxis::Rip)]
}

fn arb_position() -> impl Strategy<Value = Vec3> {
    (-48.0..48.0f64, 0.0..4.0f64, -48.0..48.0f64).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn board_store(dims: Dimensions, position: Vec3) -> (PartStore, PartId) {
    let mut store = PartStore::headless(standard_catalog());
    let id = store
        .create_part(PartSeed::board(dims, MaterialId::from("wood_pine")).at(position))
        .unwrap();
    (store, id)
}

proptest! {
    /// The split dimension is conserved: piece1 + piece2 + kerf = parent.
    /// The other two dimensions pass through untouched.
    #[test]
    fn conservation_along_the_cut_axis(
        dims in arb_dims(),
        axis in arb_axis(),
        position in 0.1..0.9f64,
        kerf in 0.0625..0.25f64,
    ) {
        let (store, id) = board_store(dims, Vec3::zero());
        let parent = store.part(id).unwrap();
        let spec = CutSpec::new(axis, position, kerf);
        let plan = plan_cut(parent, &spec, SeparationMode::KerfCentered).unwrap();

        let (d1, d2) = (plan.piece1.dimensions, plan.piece2.dimensions);
        match axis {
            CutAxis::Cross => {
                prop_assert!((d1.width + d2.width + kerf - dims.width).abs() < TOL);
                prop_assert_eq!(d1.length, dims.length);
                prop_assert_eq!(d2.length, dims.length);
            }
            CutAxis::Rip => {
                prop_assert!((d1.length + d2.length + kerf - dims.length).abs() < TOL);
                prop_assert_eq!(d1.width, dims.width);
                prop_assert_eq!(d2.width, dims.width);
            }
        }
        prop_assert_eq!(d1.thickness, dims.thickness);
        prop_assert_eq!(d2.thickness, dims.thickness);
    }

    /// Kerf-centered placement keeps the parent's outer faces exactly where
    /// they were, and leaves exactly the kerf between the pieces.
    #[test]
    fn kerf_centered_keeps_outer_faces(
        dims in arb_dims(),
        axis in arb_axis(),
        parent_pos in arb_position(),
        position in 0.1..0.9f64,
        kerf in 0.0625..0.25f64,
    ) {
        let (store, id) = board_store(dims, parent_pos);
        let parent = store.part(id).unwrap();
        let spec = CutSpec::new(axis, position, kerf);
        let plan = plan_cut(parent, &spec, SeparationMode::KerfCentered).unwrap();

        let (center, extent, c1, e1, c2, e2) = match axis {
            CutAxis::Cross => (
                parent_pos.x, dims.width,
                plan.piece1.position.x, plan.piece1.dimensions.width,
                plan.piece2.position.x, plan.piece2.dimensions.width,
            ),
            CutAxis::Rip => (
                parent_pos.z, dims.length,
                plan.piece1.position.z, plan.piece1.dimensions.length,
                plan.piece2.position.z, plan.piece2.dimensions.length,
            ),
        };
        let low_face = center - extent / 2.0;
        let high_face = center + extent / 2.0;
        prop_assert!((c1 - e1 / 2.0 - low_face).abs() < TOL);
        prop_assert!((c2 + e2 / 2.0 - high_face).abs() < TOL);
        // Inner faces are one kerf apart
        prop_assert!(((c2 - e2 / 2.0) - (c1 + e1 / 2.0) - kerf).abs() < TOL);
    }

    /// An explicit gap spreads the pieces symmetrically about the cut plane
    /// without changing their sizes.
    #[test]
    fn fixed_gap_spreads_without_resizing(
        dims in arb_dims(),
        axis in arb_axis(),
        position in 0.1..0.9f64,
        kerf in 0.0625..0.25f64,
        gap in 0.5..4.0f64,
    ) {
        let (store, id) = board_store(dims, Vec3::zero());
        let parent = store.part(id).unwrap();
        let spec = CutSpec::new(axis, position, kerf);
        let centered = plan_cut(parent, &spec, SeparationMode::KerfCentered).unwrap();
        let spread = plan_cut(parent, &spec, SeparationMode::FixedGap { gap }).unwrap();

        prop_assert_eq!(spread.piece1.dimensions, centered.piece1.dimensions);
        prop_assert_eq!(spread.piece2.dimensions, centered.piece2.dimensions);

        let (c1, e1, c2, e2) = match axis {
            CutAxis::Cross => (
                spread.piece1.position.x, spread.piece1.dimensions.width,
                spread.piece2.position.x, spread.piece2.dimensions.width,
            ),
            CutAxis::Rip => (
                spread.piece1.position.z, spread.piece1.dimensions.length,
                spread.piece2.position.z, spread.piece2.dimensions.length,
            ),
        };
        prop_assert!(((c2 - e2 / 2.0) - (c1 + e1 / 2.0) - gap).abs() < TOL);
    }

    /// The default separation is literally a fixed gap of one kerf.
    #[test]
    fn kerf_centered_matches_fixed_gap_of_kerf(
        dims in arb_dims(),
        axis in arb_axis(),
        parent_pos in arb_position(),
        position in 0.1..0.9f64,
        kerf in 0.0625..0.25f64,
    ) {
        let (store, id) = board_store(dims, parent_pos);
        let parent = store.part(id).unwrap();
        let spec = CutSpec::new(axis, position, kerf);
        let centered = plan_cut(parent, &spec, SeparationMode::KerfCentered).unwrap();
        let explicit = plan_cut(parent, &spec, SeparationMode::FixedGap { gap: kerf }).unwrap();
        prop_assert_eq!(centered, explicit);
    }

    /// Arbitrary positions and kerfs either plan two valid pieces or fail
    /// with an invalid-cut error; nothing panics.
    #[test]
    fn rejections_are_invalid_cut_errors(
        dims in arb_dims(),
        axis in arb_axis(),
        position in -0.5..1.5f64,
        kerf in -0.5..30.0f64,
    ) {
        let (store, id) = board_store(dims, Vec3::zero());
        let parent = store.part(id).unwrap();
        match plan_cut(parent, &CutSpec::new(axis, position, kerf), SeparationMode::default()) {
            Ok(plan) => {
                prop_assert!(plan.piece1.dimensions.validate().is_ok());
                prop_assert!(plan.piece2.dimensions.validate().is_ok());
            }
            Err(e) => prop_assert!(e.is_invalid_cut()),
        }
    }

    /// Recursively cutting and then reconstructing recovers the original
    /// stock dimensions, kerfs included.
    #[test]
    fn nested_cuts_conserve_root_dimensions(
        cuts in prop::collection::vec((any::<bool>(), 0.3..0.7f64), 1..=4),
    ) {
        let mut store = PartStore::headless(standard_catalog());
        let root = store
            .create_part(PartSeed::board(
                Dimensions::new(96.0, 6.0, 0.75),
                MaterialId::from("wood_maple"),
            ))
            .unwrap();

        let mut target = root;
        for (cross, position) in cuts {
            let axis = if cross { CutAxis::Cross } else { CutAxis::Rip };
            let outcome = store
                .cut_part(target, &CutSpec::new(axis, position, 0.0625))
                .unwrap();
            target = outcome.piece2;
        }

        let length = store.reconstructed_dimension(root, CutAxis::Rip).unwrap();
        let width = store.reconstructed_dimension(root, CutAxis::Cross).unwrap();
        prop_assert!((length - 96.0).abs() < TOL);
        prop_assert!((width - 6.0).abs() < TOL);
    }
}

#[test]
fn test_rapid_creation_never_duplicates_ids() {
    let mut store = PartStore::headless(standard_catalog());
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let id = store
            .create_part(PartSeed::board(
                Dimensions::new(96.0, 6.0, 0.75),
                MaterialId::from("wood_pine"),
            ))
            .unwrap();
        assert!(seen.insert(id), "duplicate part id issued");
    }
    assert_eq!(store.part_count(), 200);
}
