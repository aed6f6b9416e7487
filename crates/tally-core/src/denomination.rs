//! # Denomination Table
//!
//! The fixed, ordered set of note/coin face values the drawer can hold.
//!
//! ## Invariants
//! - Ordered strictly descending by face value (the allocation algorithm
//!   walks largest-to-smallest and relies on this)
//! - Face values are positive whole currency units
//! - Identifiers are unique
//!
//! The table is immutable configuration: it is created once at startup and
//! shared (via `Arc`) by every ledger and plan in the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;

/// One note/coin face value in the currency's fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Denomination {
    /// Stable identifier used as the key in persisted count maps.
    pub id: String,

    /// Face value in whole currency units. Always positive.
    pub face_value: i64,
}

impl Denomination {
    /// Creates a denomination with an id derived from its face value.
    pub fn of(face_value: i64) -> Self {
        Denomination {
            id: face_value.to_string(),
            face_value,
        }
    }

    /// Face value as an [`Amount`].
    pub fn face(&self) -> Amount {
        Amount::from_units(self.face_value)
    }
}

/// Static ordered list of denominations, largest to smallest. Pure data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DenominationTable {
    entries: Vec<Denomination>,
}

impl DenominationTable {
    /// Creates a table, validating the ordering invariants.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyDenominationTable`] for an empty list
    /// - [`CoreError::NonPositiveFaceValue`] for a zero/negative face value
    /// - [`CoreError::NotDescending`] if not strictly descending
    /// - [`CoreError::DuplicateDenominationId`] for a repeated id
    pub fn new(entries: Vec<Denomination>) -> CoreResult<Self> {
        if entries.is_empty() {
            return Err(CoreError::EmptyDenominationTable);
        }

        let mut previous: Option<i64> = None;
        for entry in &entries {
            if entry.face_value <= 0 {
                return Err(CoreError::NonPositiveFaceValue {
                    id: entry.id.clone(),
                    face_value: entry.face_value,
                });
            }
            if let Some(prev) = previous {
                if entry.face_value >= prev {
                    return Err(CoreError::NotDescending {
                        id: entry.id.clone(),
                        face_value: entry.face_value,
                        previous: prev,
                    });
                }
            }
            previous = Some(entry.face_value);
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(CoreError::DuplicateDenominationId {
                    id: entry.id.clone(),
                });
            }
        }

        Ok(DenominationTable { entries })
    }

    /// The business's fixed denomination set, largest to smallest.
    pub fn standard() -> Arc<Self> {
        let faces = [
            500_000, 200_000, 100_000, 50_000, 20_000, 10_000, 5_000, 2_000, 1_000,
        ];
        let entries = faces.into_iter().map(Denomination::of).collect();
        // The hardcoded set satisfies every invariant.
        Arc::new(DenominationTable::new(entries).expect("standard table is valid"))
    }

    /// Number of denominations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Denomination at `index` (0 = largest face value).
    pub fn get(&self, index: usize) -> Option<&Denomination> {
        self.entries.get(index)
    }

    /// Face value at `index`, or 0 when out of range.
    pub fn face_value(&self, index: usize) -> i64 {
        self.entries.get(index).map_or(0, |d| d.face_value)
    }

    /// Index of the denomination with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|d| d.id == id)
    }

    /// Iterates denominations in descending face-value order.
    pub fn iter(&self) -> impl Iterator<Item = &Denomination> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_descending() {
        let table = DenominationTable::standard();
        assert_eq!(table.len(), 9);
        assert_eq!(table.face_value(0), 500_000);
        assert_eq!(table.face_value(8), 1_000);
        for i in 1..table.len() {
            assert!(table.face_value(i) < table.face_value(i - 1));
        }
    }

    #[test]
    fn test_index_of() {
        let table = DenominationTable::standard();
        assert_eq!(table.index_of("500000"), Some(0));
        assert_eq!(table.index_of("1000"), Some(8));
        assert_eq!(table.index_of("333"), None);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            DenominationTable::new(vec![]),
            Err(CoreError::EmptyDenominationTable)
        ));
    }

    #[test]
    fn test_rejects_non_positive_face() {
        let entries = vec![Denomination::of(1_000), Denomination::of(0)];
        assert!(matches!(
            DenominationTable::new(entries),
            Err(CoreError::NonPositiveFaceValue { .. })
        ));
    }

    #[test]
    fn test_rejects_ascending_order() {
        let entries = vec![Denomination::of(1_000), Denomination::of(5_000)];
        assert!(matches!(
            DenominationTable::new(entries),
            Err(CoreError::NotDescending { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let entries = vec![
            Denomination {
                id: "note".to_string(),
                face_value: 5_000,
            },
            Denomination {
                id: "note".to_string(),
                face_value: 1_000,
            },
        ];
        assert!(matches!(
            DenominationTable::new(entries),
            Err(CoreError::DuplicateDenominationId { .. })
        ));
    }
}
