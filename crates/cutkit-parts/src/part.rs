//! The part entity
//!
//! A [`Part`] is one physical piece of stock: immutable identity, mutable
//! attributes, and an append-only history of the operations that shaped it.
//! All world-space values are inches. Parts are created and mutated only
//! through [`crate::store::PartStore`]; the mutators here are crate-private
//! so no collaborator can bypass the store's persistence discipline.

use chrono::Utc;
use cutkit_core::config::StockSettings;
use cutkit_core::constants::BOARD_THICKNESS_FLOOR_IN;
use cutkit_core::data::materials::{MaterialId, MaterialRef};
use cutkit_core::data::{BoardEdge, CutAxis, Dimensions, Grade, Grain, PartId, PartType, Vec3};
use cutkit_core::error::{PartError, PersistenceError};
use serde::{Deserialize, Serialize};

/// Current wall-clock time as epoch milliseconds
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One entry in a board's cut history
///
/// Appended to the *parent* when it is split; never edited or removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutRecord {
    /// When the cut happened, epoch milliseconds
    pub timestamp: i64,
    /// Cross or rip
    pub cut_type: CutAxis,
    /// Position fraction along the split dimension, in (0,1)
    pub cut_position: f64,
    /// Kerf consumed by the cut, inches
    pub kerf_width: f64,
    /// The two pieces the cut produced, in [piece1, piece2] order
    pub resulting_part_ids: [PartId; 2],
}

/// A non-subdividing operation recorded against a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    /// When the operation happened, epoch milliseconds
    pub timestamp: i64,
    /// Operation name ("plane", "route_edge")
    pub operation: String,
    /// Human-readable detail
    pub detail: String,
}

/// A routed profile on one edge of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedEdge {
    /// Which edge carries the profile
    pub edge: BoardEdge,
    /// Router bit profile name (e.g. "roundover-1/4")
    pub profile: String,
    /// Cut depth in inches
    pub depth: f64,
}

/// Creation data for a part
///
/// Omitted fields take shop defaults: boards get vertical grain and select
/// grade; position and rotation default to the origin.
#[derive(Debug, Clone)]
pub struct PartSeed {
    /// Part type, default board
    pub part_type: PartType,
    /// Stock dimensions in inches
    pub dimensions: Dimensions,
    /// World position, inches
    pub position: Vec3,
    /// World rotation
    pub rotation: Vec3,
    /// Catalog id to resolve the material descriptor from
    pub material: MaterialId,
    /// Grain override (boards only)
    pub grain: Option<Grain>,
    /// Grade override (boards only)
    pub grade: Option<Grade>,
}

impl PartSeed {
    /// Seed for a fresh board of the given stock
    pub fn board(dimensions: Dimensions, material: MaterialId) -> Self {
        Self {
            part_type: PartType::Board,
            dimensions,
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            material,
            grain: None,
            grade: None,
        }
    }

    /// Seed for a non-board part
    pub fn new(part_type: PartType, dimensions: Dimensions, material: MaterialId) -> Self {
        Self {
            part_type,
            ..Self::board(dimensions, material)
        }
    }

    /// Place the part at a world position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Override the grain orientation
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = Some(grain);
        self
    }

    /// Override the lumber grade
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    /// Fill unset grain and grade from shop configuration
    ///
    /// Explicit `with_grain`/`with_grade` choices win over the configured
    /// defaults.
    pub fn with_stock_defaults(mut self, settings: &StockSettings) -> Self {
        self.grain.get_or_insert(settings.default_grain);
        self.grade.get_or_insert(settings.default_grade);
        self
    }
}

/// One physical piece of stock
///
/// Identity (`id`, `created`) is immutable; attributes mutate only through
/// the store. A part whose `child_ids` is non-empty has been split: it is a
/// tombstone, retained for lineage queries but excluded from the active
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    id: PartId,
    part_type: PartType,
    dimensions: Dimensions,
    position: Vec3,
    rotation: Vec3,
    material: MaterialRef,
    #[serde(default)]
    modifications: Vec<Modification>,
    parent_id: Option<PartId>,
    #[serde(default)]
    child_ids: Vec<PartId>,
    created: i64,
    modified: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grain: Option<Grain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grade: Option<Grade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    routed_edges: Option<Vec<RoutedEdge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cut_history: Option<Vec<CutRecord>>,
}

impl Part {
    /// Create a part from a seed and a resolved material descriptor
    ///
    /// Fails if any dimension is non-positive, or if a board's thickness is
    /// below the planing floor.
    pub(crate) fn new(seed: PartSeed, material: MaterialRef) -> Result<Self, PartError> {
        seed.dimensions.validate()?;
        let is_board = seed.part_type == PartType::Board;
        if is_board && seed.dimensions.thickness < BOARD_THICKNESS_FLOOR_IN {
            return Err(PartError::BelowThicknessFloor {
                value: seed.dimensions.thickness,
                floor: BOARD_THICKNESS_FLOOR_IN,
            });
        }

        let now = now_millis();
        Ok(Self {
            id: PartId::new(),
            part_type: seed.part_type,
            dimensions: seed.dimensions,
            position: seed.position,
            rotation: seed.rotation,
            material,
            modifications: Vec::new(),
            parent_id: None,
            child_ids: Vec::new(),
            created: now,
            modified: now,
            grain: is_board.then(|| seed.grain.unwrap_or_default()),
            grade: is_board.then(|| seed.grade.unwrap_or_default()),
            routed_edges: is_board.then(Vec::new),
            cut_history: is_board.then(Vec::new),
        })
    }

    /// Immutable unique id
    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn part_type(&self) -> PartType {
        self.part_type
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn material(&self) -> &MaterialRef {
        &self.material
    }

    pub fn modifications(&self) -> &[Modification] {
        &self.modifications
    }

    pub fn parent_id(&self) -> Option<PartId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[PartId] {
        &self.child_ids
    }

    /// Creation time, epoch milliseconds
    pub fn created(&self) -> i64 {
        self.created
    }

    /// Last mutation time, epoch milliseconds
    pub fn modified(&self) -> i64 {
        self.modified
    }

    pub fn grain(&self) -> Option<Grain> {
        self.grain
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn routed_edges(&self) -> &[RoutedEdge] {
        self.routed_edges.as_deref().unwrap_or(&[])
    }

    /// Cuts this part has been split by (at most one today, kept as a log)
    pub fn cut_history(&self) -> &[CutRecord] {
        self.cut_history.as_deref().unwrap_or(&[])
    }

    pub fn is_board(&self) -> bool {
        self.part_type == PartType::Board
    }

    /// A split part is a tombstone: retained for lineage, not active
    pub fn is_split(&self) -> bool {
        !self.child_ids.is_empty()
    }

    /// Board-foot volume of this part's stock
    pub fn board_feet(&self) -> f64 {
        self.dimensions.board_feet()
    }

    /// Serialize to a JSON record (render handles are never part of it)
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reconstruct a part from a JSON record
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    fn touch(&mut self) {
        self.modified = now_millis();
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.touch();
    }

    pub(crate) fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.touch();
    }

    /// Replace the dimensions, enforcing positivity and the board floor
    pub(crate) fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<(), PartError> {
        dimensions.validate()?;
        if self.is_board() && dimensions.thickness < BOARD_THICKNESS_FLOOR_IN {
            return Err(PartError::BelowThicknessFloor {
                value: dimensions.thickness,
                floor: BOARD_THICKNESS_FLOOR_IN,
            });
        }
        self.dimensions = dimensions;
        self.touch();
        Ok(())
    }

    /// Append a cut record and adopt the resulting children
    ///
    /// The cut history is append-only; nothing here ever edits or removes an
    /// existing entry.
    pub(crate) fn record_cut(&mut self, record: CutRecord) {
        self.child_ids.extend(record.resulting_part_ids);
        self.cut_history.get_or_insert_with(Vec::new).push(record);
        self.touch();
    }

    pub(crate) fn set_parent(&mut self, parent_id: Option<PartId>) {
        self.parent_id = parent_id;
        self.touch();
    }

    pub(crate) fn remove_child(&mut self, child_id: PartId) {
        self.child_ids.retain(|c| *c != child_id);
        self.touch();
    }

    pub(crate) fn push_modification(&mut self, operation: &str, detail: String) {
        self.modifications.push(Modification {
            timestamp: now_millis(),
            operation: operation.to_string(),
            detail,
        });
        self.touch();
    }

    /// Apply a routed edge, replacing any earlier profile on the same edge
    pub(crate) fn apply_routed_edge(&mut self, routed: RoutedEdge) {
        let edges = self.routed_edges.get_or_insert_with(Vec::new);
        edges.retain(|r| r.edge != routed.edge);
        edges.push(routed);
        self.touch();
    }

    /// Restore an exact earlier state, for transactional rollback
    pub(crate) fn restore(&mut self, snapshot: Part) {
        *self = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oak_ref() -> MaterialRef {
        MaterialRef {
            id: MaterialId::from("wood_oak_red"),
            name: "Red Oak".to_string(),
            texture: None,
            color: Some([0.65, 0.5, 0.4]),
        }
    }

    fn test_board() -> Part {
        let seed = PartSeed::board(Dimensions::new(96.0, 6.0, 0.75), MaterialId::from("wood_oak_red"));
        Part::new(seed, oak_ref()).unwrap()
    }

    #[test]
    fn test_board_defaults() {
        let part = test_board();
        assert!(part.is_board());
        assert!(!part.is_split());
        assert_eq!(part.grain(), Some(Grain::Vertical));
        assert_eq!(part.grade(), Some(Grade::Select));
        assert!(part.cut_history().is_empty());
        assert!(part.routed_edges().is_empty());
        assert_eq!(part.parent_id(), None);
        assert_eq!(part.created(), part.modified());
    }

    #[test]
    fn test_seed_with_stock_defaults() {
        let settings = StockSettings {
            default_grade: Grade::Fas,
            default_grain: Grain::Horizontal,
            ..StockSettings::default()
        };

        let seed = PartSeed::board(Dimensions::new(96.0, 6.0, 0.75), MaterialId::from("wood_oak_red"))
            .with_stock_defaults(&settings);
        let part = Part::new(seed, oak_ref()).unwrap();
        assert_eq!(part.grain(), Some(Grain::Horizontal));
        assert_eq!(part.grade(), Some(Grade::Fas));

        // An explicit builder choice is not overwritten
        let seed = PartSeed::board(Dimensions::new(96.0, 6.0, 0.75), MaterialId::from("wood_oak_red"))
            .with_grade(Grade::Common1)
            .with_stock_defaults(&settings);
        let part = Part::new(seed, oak_ref()).unwrap();
        assert_eq!(part.grade(), Some(Grade::Common1));
        assert_eq!(part.grain(), Some(Grain::Horizontal));
    }

    #[test]
    fn test_non_board_has_no_board_fields() {
        let seed = PartSeed::new(
            PartType::Fastener,
            Dimensions::new(1.5, 0.25, 0.25),
            MaterialId::from("wood_oak_red"),
        );
        let part = Part::new(seed, oak_ref()).unwrap();
        assert_eq!(part.grain(), None);
        assert_eq!(part.grade(), None);
        assert!(part.cut_history().is_empty());

        let json = part.to_json().unwrap();
        assert!(!json.contains("\"grain\""));
        assert!(!json.contains("\"cut_history\""));
    }

    #[test]
    fn test_rejects_non_positive_dimension() {
        let seed = PartSeed::board(Dimensions::new(96.0, 0.0, 0.75), MaterialId::from("wood_oak_red"));
        let err = Part::new(seed, oak_ref()).unwrap_err();
        assert!(matches!(err, PartError::InvalidDimension { .. }));
    }

    #[test]
    fn test_rejects_board_below_thickness_floor() {
        let seed = PartSeed::board(Dimensions::new(96.0, 6.0, 0.1), MaterialId::from("wood_oak_red"));
        let err = Part::new(seed, oak_ref()).unwrap_err();
        assert!(matches!(err, PartError::BelowThicknessFloor { .. }));

        // The floor applies to boards, not hardware
        let seed = PartSeed::new(
            PartType::Hardware,
            Dimensions::new(2.0, 1.0, 0.05),
            MaterialId::from("wood_oak_red"),
        );
        assert!(Part::new(seed, oak_ref()).is_ok());
    }

    #[test]
    fn test_set_dimensions_validates() {
        let mut part = test_board();
        assert!(part.set_dimensions(Dimensions::new(48.0, 6.0, 0.75)).is_ok());
        assert_eq!(part.dimensions().length, 48.0);

        let err = part.set_dimensions(Dimensions::new(48.0, -1.0, 0.75)).unwrap_err();
        assert!(matches!(err, PartError::InvalidDimension { .. }));
        // Rejected, not clamped
        assert_eq!(part.dimensions(), Dimensions::new(48.0, 6.0, 0.75));

        let err = part.set_dimensions(Dimensions::new(48.0, 6.0, 0.05)).unwrap_err();
        assert!(matches!(err, PartError::BelowThicknessFloor { .. }));
    }

    #[test]
    fn test_mutation_touches_modified() {
        let mut part = test_board();
        let before = part.modified();
        std::thread::sleep(std::time::Duration::from_millis(5));
        part.set_position(Vec3::new(10.0, 0.0, 0.0));
        assert!(part.modified() > before);
        assert_eq!(part.position(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_record_cut_marks_split() {
        let mut part = test_board();
        let children = [PartId::new(), PartId::new()];
        part.record_cut(CutRecord {
            timestamp: now_millis(),
            cut_type: CutAxis::Cross,
            cut_position: 0.5,
            kerf_width: 0.125,
            resulting_part_ids: children,
        });
        assert!(part.is_split());
        assert_eq!(part.child_ids(), &children);
        assert_eq!(part.cut_history().len(), 1);
        // Tombstones keep their original dimensions for lineage math
        assert_eq!(part.dimensions().width, 6.0);
    }

    #[test]
    fn test_routed_edge_replaces_same_edge() {
        let mut part = test_board();
        part.apply_routed_edge(RoutedEdge {
            edge: BoardEdge::Left,
            profile: "roundover-1/4".to_string(),
            depth: 0.25,
        });
        part.apply_routed_edge(RoutedEdge {
            edge: BoardEdge::Left,
            profile: "chamfer-1/2".to_string(),
            depth: 0.5,
        });
        assert_eq!(part.routed_edges().len(), 1);
        assert_eq!(part.routed_edges()[0].profile, "chamfer-1/2");
    }

    #[test]
    fn test_json_round_trip_board() {
        let mut part = test_board();
        part.set_position(Vec3::new(1.0, 2.0, 3.0));
        part.push_modification("plane", "planed to 5/8\"".to_string());
        part.record_cut(CutRecord {
            timestamp: 1_700_000_000_000,
            cut_type: CutAxis::Rip,
            cut_position: 0.25,
            kerf_width: 0.125,
            resulting_part_ids: [PartId::new(), PartId::new()],
        });

        let restored = Part::from_json(&part.to_json().unwrap()).unwrap();
        assert_eq!(restored, part);
    }

    #[test]
    fn test_json_round_trip_fastener() {
        let seed = PartSeed::new(
            PartType::Fastener,
            Dimensions::new(1.5, 0.25, 0.25),
            MaterialId::from("wood_oak_red"),
        );
        let part = Part::new(seed, oak_ref()).unwrap();
        let restored = Part::from_json(&part.to_json().unwrap()).unwrap();
        assert_eq!(restored, part);
    }
}
