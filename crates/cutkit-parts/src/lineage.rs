//! Lineage queries over the part store
//!
//! Cut derivation is recorded on the parts themselves (`parent_id`,
//! `child_ids`, `cut_history`); these methods walk those links. Deleted
//! parts are tolerated everywhere: an ancestor chain ends where a link no
//! longer resolves, descendant traversal skips unresolved ids, and
//! dimension reconstruction falls back to the tombstone's own recorded
//! value when a child is gone.

use crate::part::Part;
use crate::store::PartStore;
use cutkit_core::data::{CutAxis, PartId};
use cutkit_core::error::Result;
use std::collections::HashSet;

impl PartStore {
    /// Chain of ancestors, immediate parent first and root last
    ///
    /// Empty for a part that was created from fresh stock.
    pub fn ancestors(&self, id: PartId) -> Result<Vec<&Part>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut next = self.part(id)?.parent_id();
        while let Some(pid) = next {
            // A repeated id means a corrupted chain; stop rather than loop
            if !visited.insert(pid) {
                break;
            }
            let Ok(parent) = self.part(pid) else {
                break;
            };
            chain.push(parent);
            next = parent.parent_id();
        }
        Ok(chain)
    }

    /// Every part derived from this one, depth-first, parents before children
    pub fn descendants(&self, id: PartId) -> Result<Vec<&Part>> {
        self.part(id)?;
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id);
        self.collect_descendants(id, &mut visited, &mut out);
        Ok(out)
    }

    fn collect_descendants<'a>(
        &'a self,
        id: PartId,
        visited: &mut HashSet<PartId>,
        out: &mut Vec<&'a Part>,
    ) {
        let Ok(part) = self.part(id) else {
            return;
        };
        for &child in part.child_ids() {
            if !visited.insert(child) {
                continue;
            }
            if let Ok(child_part) = self.part(child) {
                out.push(child_part);
                self.collect_descendants(child, visited, out);
            }
        }
    }

    /// Reconstruct a part's extent along one cut axis from its subtree
    ///
    /// For a part split on `axis`, the original extent is the kerf plus both
    /// children's reconstructed extents; a split on the other axis leaves
    /// the queried dimension unchanged, so any surviving child carries it.
    /// Leaves, and tombstones whose children were deleted, contribute their
    /// own recorded dimension. On an unmodified tree this reproduces the
    /// root's original stock size exactly.
    pub fn reconstructed_dimension(&self, id: PartId, axis: CutAxis) -> Result<f64> {
        let part = self.part(id)?;
        Ok(self.reconstruct(part, axis))
    }

    fn reconstruct(&self, part: &Part, axis: CutAxis) -> f64 {
        let own = match axis {
            CutAxis::Cross => part.dimensions().width,
            CutAxis::Rip => part.dimensions().length,
        };
        let Some(record) = part.cut_history().last() else {
            return own;
        };
        let resolved: Vec<&Part> = record
            .resulting_part_ids
            .iter()
            .filter_map(|cid| self.part(*cid).ok())
            .collect();

        if record.cut_type == axis {
            // Both pieces and the kerf are needed to rebuild the split
            // dimension; with a child gone the tombstone's record stands.
            if resolved.len() != record.resulting_part_ids.len() {
                return own;
            }
            record.kerf_width
                + resolved
                    .iter()
                    .map(|child| self.reconstruct(child, axis))
                    .sum::<f64>()
        } else {
            match resolved.first() {
                Some(child) => self.reconstruct(child, axis),
                None => own,
            }
        }
    }

    /// Total stock lost to saw kerf across a part's subtree, cubic inches
    ///
    /// Each split consumed a slab one kerf wide across the full section of
    /// the board it divided; the tombstone's preserved dimensions give that
    /// section. Divide by 144 for board feet.
    pub fn subtree_kerf_volume(&self, id: PartId) -> Result<f64> {
        let part = self.part(id)?;
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut total = 0.0;
        self.accumulate_kerf(part, &mut visited, &mut total);
        Ok(total)
    }

    fn accumulate_kerf(&self, part: &Part, visited: &mut HashSet<PartId>, total: &mut f64) {
        let dims = part.dimensions();
        for record in part.cut_history() {
            let section = match record.cut_type {
                CutAxis::Cross => dims.length * dims.thickness,
                CutAxis::Rip => dims.width * dims.thickness,
            };
            *total += record.kerf_width * section;
        }
        for &child in part.child_ids() {
            if visited.insert(child) {
                if let Ok(child_part) = self.part(child) {
                    self.accumulate_kerf(child_part, visited, total);
                }
            }
        }
    }
}
