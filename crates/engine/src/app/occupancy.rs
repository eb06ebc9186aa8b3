use super::placement::PlacementRecord;

/// Next 1-based stack index for another copy of `item_id`.
///
/// Indices are never renumbered on removal, so the result is `max + 1` rather than
/// `count + 1`; this keeps indices unique even after gaps appear.
pub fn next_stack_index(item_id: &str, placements: &[PlacementRecord]) -> u32 {
    placements
        .iter()
        .filter(|record| record.item_id == item_id)
        .map(|record| record.stack_index)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
