//! # Cash Ledger
//!
//! Holds the counted quantity of each denomination physically present in
//! the drawer, and derives the total drawer value.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ledger Lifecycle                                  │
//! │                                                                         │
//! │  Record reset / date or branch change ──► new zeroed ledger             │
//! │  Existing record opened ────────────────► counts loaded from snapshot   │
//! │  Operator types a count ────────────────► set_count (clamped commit)    │
//! │  "Clear" action ────────────────────────► clear() (plan cleared too,    │
//! │                                            by the owning session)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Clamping, Not Validation
//! Counts are committed with `max(0, n)`. Out-of-range entry is silently
//! clamped rather than rejected so fast numeric entry is never interrupted.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::denomination::DenominationTable;
use crate::money::Amount;

/// Per-denomination physical counts for one drawer.
///
/// Counts are stored parallel to the denomination table (index 0 = largest
/// face value). Mutated only by direct operator entry of physical counts.
#[derive(Debug, Clone)]
pub struct CashLedger {
    table: Arc<DenominationTable>,
    counts: Vec<i64>,
}

impl CashLedger {
    /// Creates a zeroed ledger over the given denomination table.
    pub fn new(table: Arc<DenominationTable>) -> Self {
        let counts = vec![0; table.len()];
        CashLedger { table, counts }
    }

    /// The denomination table this ledger counts against.
    pub fn table(&self) -> &DenominationTable {
        &self.table
    }

    /// Shared handle to the denomination table.
    pub fn table_arc(&self) -> Arc<DenominationTable> {
        Arc::clone(&self.table)
    }

    /// Commits a count for the denomination at `index`.
    ///
    /// Negative input is clamped to 0; an out-of-range index is ignored.
    /// No error is raised for either case.
    pub fn set_count(&mut self, index: usize, count: i64) {
        if let Some(slot) = self.counts.get_mut(index) {
            *slot = count.max(0);
        }
    }

    /// Commits a count addressed by denomination id. Unknown ids are ignored.
    pub fn set_count_by_id(&mut self, id: &str, count: i64) {
        if let Some(index) = self.table.index_of(id) {
            self.set_count(index, count);
        }
    }

    /// Count at `index`, or 0 when out of range.
    pub fn count(&self, index: usize) -> i64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Total drawer value: Σ count × face value. Pure, O(len).
    pub fn total(&self) -> Amount {
        self.table
            .iter()
            .zip(&self.counts)
            .map(|(d, &n)| d.face() * n)
            .sum()
    }

    /// Sets all counts to 0.
    ///
    /// The owning session clears the withdrawal plan and its edited flags
    /// in the same step: zero counts make every override meaningless.
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    /// True when every count is zero.
    pub fn is_all_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Counts as a flat keyed map, for persistence and signatures.
    pub fn counts_by_id(&self) -> BTreeMap<String, i64> {
        self.table
            .iter()
            .zip(&self.counts)
            .map(|(d, &n)| (d.id.clone(), n))
            .collect()
    }

    /// Loads counts from a persisted snapshot map.
    ///
    /// Denominations absent from the map read as 0; unknown map keys are
    /// ignored. Loaded values are clamped like typed ones.
    pub fn load_counts(&mut self, counts: &BTreeMap<String, i64>) {
        self.clear();
        for (id, &count) in counts {
            self.set_count_by_id(id, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> CashLedger {
        CashLedger::new(DenominationTable::standard())
    }

    #[test]
    fn test_total_sums_counts_times_face() {
        let mut ledger = ledger();
        ledger.set_count(0, 10); // 500k × 10
        ledger.set_count(2, 5); // 100k × 5
        assert_eq!(ledger.total(), Amount::from_units(5_500_000));
    }

    #[test]
    fn test_negative_count_clamped_to_zero() {
        let mut ledger = ledger();
        ledger.set_count(0, -7);
        assert_eq!(ledger.count(0), 0);
        assert_eq!(ledger.total(), Amount::zero());
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut ledger = ledger();
        ledger.set_count(99, 4);
        assert_eq!(ledger.total(), Amount::zero());
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut ledger = ledger();
        ledger.set_count(1, 3);
        assert!(!ledger.is_all_zero());
        ledger.clear();
        assert!(ledger.is_all_zero());
        assert_eq!(ledger.total(), Amount::zero());
    }

    #[test]
    fn test_counts_round_trip_through_map() {
        let mut ledger = ledger();
        ledger.set_count_by_id("500000", 10);
        ledger.set_count_by_id("100000", 5);

        let map = ledger.counts_by_id();
        assert_eq!(map.get("500000"), Some(&10));
        assert_eq!(map.get("1000"), Some(&0));

        let mut reloaded = CashLedger::new(DenominationTable::standard());
        reloaded.load_counts(&map);
        assert_eq!(reloaded.total(), ledger.total());
    }

    #[test]
    fn test_load_ignores_unknown_ids_and_clamps() {
        let mut ledger = ledger();
        let mut map = BTreeMap::new();
        map.insert("333".to_string(), 9); // not a denomination
        map.insert("1000".to_string(), -2); // clamped
        ledger.load_counts(&map);
        assert!(ledger.is_all_zero());
    }
}
