//! Identifier allocation
//!
//! Ids are derived from the collection itself: one past the highest `Id`
//! present. Removing the highest record lets its Id be handed out again.

use crate::record::Record;

/// Next free identifier: max `Id` + 1, or 1 for an empty collection
///
/// Records without a valid `Id` count as 0.
pub fn next_id(records: &[Record]) -> u64 {
    records
        .iter()
        .filter_map(Record::id)
        .max()
        .unwrap_or(0)
        + 1
}
