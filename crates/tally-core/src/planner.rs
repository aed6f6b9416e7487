//! # Float-Withdrawal Allocation Planner
//!
//! Decides, for each denomination, how many units to withdraw from the
//! drawer so that the value **kept** lands as close as possible to the
//! float target, while never withdrawing more units than are present and
//! while honoring denominations the operator has pinned to a chosen count.
//!
//! ## Allocation Passes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Allocation Algorithm                                │
//! │                                                                         │
//! │  remain = total − clamp(target, 0, total)                               │
//! │                                                                         │
//! │  PASS 1: descending face value (500k → 1k)                              │
//! │  ────────────────────────────────────────                               │
//! │  pinned row:   take = min(pinned, have, remain / face)                  │
//! │  greedy row:   take = min(have, remain / face)                          │
//! │  remain -= take × face    (remain never goes negative here)             │
//! │                                                                         │
//! │  PASS 2: ascending face value (1k → 500k), only when nothing is pinned  │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  While remain > 0: add min(room, ceil(remain / face)) extra units,      │
//! │  where room = have − take. May overshoot the exact surplus when the     │
//! │  drawer cannot express it. The overshoot is observed production         │
//! │  behavior and must be preserved, not "fixed".                           │
//! │                                                                         │
//! │  Example: drawer = one 100k note, target = 50k. Pass 1 takes nothing    │
//! │  (floor(50k/100k) = 0); pass 2 withdraws the note, keeping 0. The       │
//! │  system withdraws the whole drawer rather than leaving the surplus.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Override Re-solve Ordering
//! Editing the withdrawal count of denomination `idx` re-solves the plan
//! left-to-right: rows before `idx` keep their pinned status, row `idx`
//! becomes pinned to the operator value, and rows after `idx` are always
//! re-suggested fresh even if they carried an older pin. A later edit takes
//! priority for everything at or before it. This ordering is intentional
//! and preserved via the explicit pin-array walker below rather than
//! in-place mutation of a shared plan.
//!
//! ## Failure Semantics
//! Never raises. All inputs are clamped; a denomination with zero units
//! present always yields a zero take regardless of the requested override.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::denomination::DenominationTable;
use crate::ledger::CashLedger;
use crate::money::Amount;

/// Per-denomination quantities to remove from the drawer.
///
/// `takes` is parallel to the denomination table; invariant:
/// `takes[d] <= ledger[d]` for every `d`. `edited[d]` is true once the
/// operator has explicitly typed a value for that row in the current
/// editing session, as opposed to an auto-suggested value.
#[derive(Debug, Clone)]
pub struct WithdrawalPlan {
    table: Arc<DenominationTable>,
    takes: Vec<i64>,
    edited: Vec<bool>,
}

impl WithdrawalPlan {
    /// Creates an all-zero plan with no edits.
    pub fn empty(table: Arc<DenominationTable>) -> Self {
        let n = table.len();
        WithdrawalPlan {
            table,
            takes: vec![0; n],
            edited: vec![false; n],
        }
    }

    /// Units to withdraw for the denomination at `index`.
    pub fn take(&self, index: usize) -> i64 {
        self.takes.get(index).copied().unwrap_or(0)
    }

    /// True once the operator pinned this row's withdrawal count.
    pub fn is_edited(&self, index: usize) -> bool {
        self.edited.get(index).copied().unwrap_or(false)
    }

    /// True if any row is pinned.
    pub fn has_edits(&self) -> bool {
        self.edited.iter().any(|&e| e)
    }

    /// Total value withdrawn: Σ take × face.
    pub fn total_withdrawn(&self) -> Amount {
        self.table
            .iter()
            .zip(&self.takes)
            .map(|(d, &n)| d.face() * n)
            .sum()
    }

    /// Units left in the drawer for `index` after the withdrawal.
    pub fn remaining(&self, index: usize, ledger: &CashLedger) -> i64 {
        ledger.count(index) - self.take(index)
    }

    /// Total value left in the drawer after the withdrawal.
    pub fn total_remaining(&self, ledger: &CashLedger) -> Amount {
        ledger.total() - self.total_withdrawn()
    }

    /// Withdrawal counts as a flat keyed map, for persistence and signatures.
    pub fn takes_by_id(&self) -> BTreeMap<String, i64> {
        self.table
            .iter()
            .zip(&self.takes)
            .map(|(d, &n)| (d.id.clone(), n))
            .collect()
    }

    /// Zeroes all takes and drops all edited flags.
    ///
    /// Runs when the ledger is cleared: zero counts make overrides
    /// meaningless.
    pub fn clear(&mut self) {
        self.takes.iter_mut().for_each(|t| *t = 0);
        self.edited.iter_mut().for_each(|e| *e = false);
    }

    /// Rebuilds a plan from a persisted takes map.
    ///
    /// Each take is clamped into `[0, have]` against the given ledger so
    /// the plan invariant holds even if the snapshot disagrees with the
    /// counts. Nothing is marked edited: persisted values are not operator
    /// pins in a new editing session.
    pub fn from_takes(ledger: &CashLedger, takes: &BTreeMap<String, i64>) -> WithdrawalPlan {
        let table = ledger.table_arc();
        let mut plan = WithdrawalPlan::empty(table);
        for (d, denom) in ledger.table().iter().enumerate() {
            let requested = takes.get(&denom.id).copied().unwrap_or(0);
            plan.takes[d] = requested.clamp(0, ledger.count(d));
        }
        plan
    }

    /// Current pin set: `Some(take)` for every edited row.
    fn pins(&self) -> Vec<Option<i64>> {
        self.takes
            .iter()
            .zip(&self.edited)
            .map(|(&t, &e)| if e { Some(t) } else { None })
            .collect()
    }
}

// =============================================================================
// Allocation
// =============================================================================

/// Full auto recompute with no pins.
///
/// Produces the suggested plan for the current ledger and float target.
/// Calling it twice without ledger changes yields an identical plan.
pub fn suggest(ledger: &CashLedger, float_target: Amount) -> WithdrawalPlan {
    let pins = vec![None; ledger.table().len()];
    resolve(ledger, float_target, &pins)
}

/// Re-solve triggered by the operator editing one row's withdrawal count.
///
/// Rows before `index` keep their pinned status from `prior`; `index` is
/// pinned to `requested` (clamped to what is present and to the running
/// remainder); rows after `index` are re-suggested fresh and lose any
/// older pin. See the module header for why this ordering is intentional.
pub fn recompute_with_override(
    ledger: &CashLedger,
    float_target: Amount,
    prior: &WithdrawalPlan,
    index: usize,
    requested: i64,
) -> WithdrawalPlan {
    let n = ledger.table().len();
    let mut pins: Vec<Option<i64>> = vec![None; n];
    for d in 0..index.min(n) {
        if prior.is_edited(d) {
            pins[d] = Some(prior.take(d));
        }
    }
    if index < n {
        pins[index] = Some(requested.max(0));
    }
    resolve(ledger, float_target, &pins)
}

/// Re-solve after a ledger mutation, honoring every currently pinned row.
///
/// A count change at one denomination re-derives the suggestions for the
/// unpinned rows while each pinned row keeps its operator-chosen count
/// (still clamped to what the drawer now holds).
pub fn resuggest_keeping_pins(
    ledger: &CashLedger,
    float_target: Amount,
    prior: &WithdrawalPlan,
) -> WithdrawalPlan {
    resolve(ledger, float_target, &prior.pins())
}

/// The shared pin-array walker implementing both passes.
fn resolve(ledger: &CashLedger, float_target: Amount, pins: &[Option<i64>]) -> WithdrawalPlan {
    let table = ledger.table_arc();
    let n = table.len();
    debug_assert_eq!(pins.len(), n);

    let total = ledger.total();
    let target = float_target.clamp(Amount::zero(), total);
    let mut remain = (total - target).units();

    let mut takes = vec![0i64; n];
    let mut edited = vec![false; n];

    // Pass 1: descending face value. `take <= remain / face` keeps the
    // remainder non-negative throughout.
    for d in 0..n {
        let face = table.face_value(d);
        let have = ledger.count(d);
        let budget = remain / face;
        let take = match pins.get(d).copied().flatten() {
            Some(requested) => {
                edited[d] = true;
                requested.max(0).min(have).min(budget)
            }
            None => have.min(budget),
        };
        takes[d] = take;
        remain -= take * face;
    }

    // Pass 2: ascending fallback, only for the fully automatic solve. The
    // drawer's composition may be unable to express the exact remainder;
    // ceil() deliberately allows withdrawing slightly more than the exact
    // surplus. With a pin present the operator owns the plan and no units
    // are added behind their back.
    let any_pin = pins.iter().any(Option::is_some);
    if !any_pin && remain > 0 {
        for d in (0..n).rev() {
            let face = table.face_value(d);
            let room = ledger.count(d) - takes[d];
            if room <= 0 {
                continue;
            }
            let needed = (remain + face - 1) / face;
            let add = room.min(needed);
            takes[d] += add;
            remain -= add * face;
            if remain <= 0 {
                break;
            }
        }
    }

    WithdrawalPlan {
        table,
        takes,
        edited,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denomination::DenominationTable;

    const TARGET: Amount = Amount::from_units(3_000_000);

    fn ledger_with(counts: &[(usize, i64)]) -> CashLedger {
        let mut ledger = CashLedger::new(DenominationTable::standard());
        for &(index, count) in counts {
            ledger.set_count(index, count);
        }
        ledger
    }

    fn assert_invariants(plan: &WithdrawalPlan, ledger: &CashLedger) {
        for d in 0..ledger.table().len() {
            assert!(plan.take(d) >= 0, "take[{d}] negative");
            assert!(
                plan.take(d) <= ledger.count(d),
                "take[{d}] exceeds drawer count"
            );
        }
        assert!(plan.total_withdrawn() <= ledger.total());
    }

    #[test]
    fn test_exact_target_reachable() {
        // Drawer: 10 × 500k + 5 × 100k = 5,500,000; target 3,000,000.
        let ledger = ledger_with(&[(0, 10), (2, 5)]);
        let plan = suggest(&ledger, TARGET);

        assert_eq!(plan.take(0), 5); // withdraw 2,500,000
        assert_eq!(plan.take(2), 0);
        assert_eq!(plan.total_withdrawn(), Amount::from_units(2_500_000));
        assert_eq!(plan.total_remaining(&ledger), TARGET);
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_unreachable_target_withdraws_whole_drawer() {
        // Drawer: one 100k note; target 50k. The descending pass takes
        // nothing (floor(50k/100k) = 0); the ascending fallback withdraws
        // the note, keeping 0. Documented overshoot.
        let mut ledger = CashLedger::new(DenominationTable::standard());
        ledger.set_count_by_id("100000", 1);
        let plan = suggest(&ledger, Amount::from_units(50_000));

        assert_eq!(plan.take(2), 1);
        assert_eq!(plan.total_withdrawn(), Amount::from_units(100_000));
        assert_eq!(plan.total_remaining(&ledger), Amount::zero());
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_fallback_compensates_with_smaller_notes() {
        // Drawer: 1 × 500k + 4 × 200k = 1,300,000; target 1,000,000,
        // so surplus = 300,000. Descending: 500k budget 0, 200k takes 1
        // (200k), remain 100k, nothing smaller present. Ascending adds one
        // more 200k note: withdrawn 400k, kept 900k (one unit below target).
        let ledger = ledger_with(&[(0, 1), (1, 4)]);
        let plan = suggest(&ledger, Amount::from_units(1_000_000));

        assert_eq!(plan.take(0), 0);
        assert_eq!(plan.take(1), 2);
        assert_eq!(plan.total_remaining(&ledger), Amount::from_units(900_000));
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_target_above_total_takes_nothing() {
        let ledger = ledger_with(&[(2, 5)]); // 500,000 total
        let plan = suggest(&ledger, TARGET);
        assert_eq!(plan.total_withdrawn(), Amount::zero());
        assert_eq!(plan.total_remaining(&ledger), ledger.total());
    }

    #[test]
    fn test_negative_target_clamped_to_zero() {
        let ledger = ledger_with(&[(2, 3)]);
        let plan = suggest(&ledger, Amount::from_units(-1));
        // Target clamps to 0: everything is withdrawn.
        assert_eq!(plan.total_withdrawn(), ledger.total());
    }

    #[test]
    fn test_suggest_is_idempotent() {
        let ledger = ledger_with(&[(0, 7), (3, 13), (8, 41)]);
        let a = suggest(&ledger, TARGET);
        let b = suggest(&ledger, TARGET);
        for d in 0..ledger.table().len() {
            assert_eq!(a.take(d), b.take(d));
            assert!(!a.is_edited(d));
        }
    }

    #[test]
    fn test_override_pins_row_and_rederives_smaller_rows() {
        // Drawer: 10 × 500k + 5 × 100k; auto plan takes 5 × 500k. The
        // operator pins the 500k row to 3; the re-solve must re-derive
        // smaller rows against the larger remainder while 500k stays at 3.
        let ledger = ledger_with(&[(0, 10), (2, 5)]);
        let auto = suggest(&ledger, TARGET);
        assert_eq!(auto.take(0), 5);

        let plan = recompute_with_override(&ledger, TARGET, &auto, 0, 3);
        assert_eq!(plan.take(0), 3);
        assert!(plan.is_edited(0));
        // remain after pin: 2,500,000 − 1,500,000 = 1,000,000 → 5 × 100k
        assert_eq!(plan.take(2), 5);
        assert!(!plan.is_edited(2));
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_override_clamped_to_available_and_budget() {
        let ledger = ledger_with(&[(0, 4), (2, 5)]); // 2,500,000 total
        let prior = WithdrawalPlan::empty(ledger.table_arc());

        // Request 99 of a row holding 4: clamped to have.
        let plan = recompute_with_override(&ledger, Amount::from_units(500_000), &prior, 0, 99);
        assert_eq!(plan.take(0), 4);

        // Request more than the surplus allows: clamped to remain / face.
        let plan = recompute_with_override(&ledger, Amount::from_units(2_000_000), &prior, 0, 99);
        assert_eq!(plan.take(0), 1); // surplus 500,000 → one 500k note
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_override_negative_request_clamped_to_zero() {
        let ledger = ledger_with(&[(0, 4)]);
        let prior = WithdrawalPlan::empty(ledger.table_arc());
        let plan = recompute_with_override(&ledger, Amount::zero(), &prior, 0, -3);
        assert_eq!(plan.take(0), 0);
        assert!(plan.is_edited(0));
    }

    #[test]
    fn test_override_on_empty_row_yields_zero() {
        let ledger = ledger_with(&[(2, 5)]);
        let prior = WithdrawalPlan::empty(ledger.table_arc());
        let plan = recompute_with_override(&ledger, Amount::zero(), &prior, 0, 10);
        assert_eq!(plan.take(0), 0);
    }

    #[test]
    fn test_rows_after_edited_one_lose_their_pins() {
        let ledger = ledger_with(&[(0, 10), (1, 10), (2, 10)]);
        let auto = suggest(&ledger, TARGET);

        // Pin the 100k row first, then edit the 500k row above it: the
        // later edit re-suggests everything after index 0.
        let pinned_small = recompute_with_override(&ledger, TARGET, &auto, 2, 1);
        assert!(pinned_small.is_edited(2));

        let plan = recompute_with_override(&ledger, TARGET, &pinned_small, 0, 2);
        assert!(plan.is_edited(0));
        assert!(!plan.is_edited(2), "stale pin below the edit must drop");
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_pins_survive_ledger_change_at_smaller_row() {
        // Pin 500k to 3, then change the 1k count: the pinned take must
        // not move.
        let mut ledger = ledger_with(&[(0, 10), (2, 5)]);
        let auto = suggest(&ledger, TARGET);
        let pinned = recompute_with_override(&ledger, TARGET, &auto, 0, 3);

        ledger.set_count(8, 250);
        let plan = resuggest_keeping_pins(&ledger, TARGET, &pinned);
        assert_eq!(plan.take(0), 3);
        assert!(plan.is_edited(0));
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_pinned_take_reclamped_when_drawer_shrinks() {
        let mut ledger = ledger_with(&[(0, 10)]);
        let auto = suggest(&ledger, Amount::zero());
        let pinned = recompute_with_override(&ledger, Amount::zero(), &auto, 0, 8);
        assert_eq!(pinned.take(0), 8);

        ledger.set_count(0, 2);
        let plan = resuggest_keeping_pins(&ledger, Amount::zero(), &pinned);
        assert_eq!(plan.take(0), 2, "pin clamps to what is now present");
    }

    #[test]
    fn test_no_fallback_when_pinned() {
        // Drawer: one 100k note, target 50k. Auto mode withdraws the note
        // (documented overshoot); with the row pinned to 0 the fallback
        // must not override the operator.
        let mut ledger = CashLedger::new(DenominationTable::standard());
        ledger.set_count_by_id("100000", 1);
        let prior = WithdrawalPlan::empty(ledger.table_arc());
        let plan = recompute_with_override(&ledger, Amount::from_units(50_000), &prior, 2, 0);
        assert_eq!(plan.take(2), 0);
        assert_eq!(plan.total_withdrawn(), Amount::zero());
    }

    #[test]
    fn test_kept_value_tracks_target_across_mixed_drawers() {
        let cases: &[&[(usize, i64)]] = &[
            &[(0, 3), (1, 2), (2, 7), (5, 40), (8, 120)],
            &[(4, 9), (6, 33)],
            &[(0, 1)],
            &[(8, 2_999)],
        ];
        for counts in cases {
            let ledger = ledger_with(counts);
            let plan = suggest(&ledger, TARGET);
            assert_invariants(&plan, &ledger);

            let total = ledger.total();
            let kept = plan.total_remaining(&ledger);
            if total <= TARGET {
                assert_eq!(kept, total, "nothing withdrawn below target");
            } else {
                // Kept lands within the smallest available unit of the
                // target, except when the fallback had to overshoot.
                assert!(kept <= total);
                assert!(kept >= Amount::zero());
            }
        }
    }

    #[test]
    fn test_from_takes_clamps_against_ledger() {
        let ledger = ledger_with(&[(0, 3), (2, 5)]);
        let mut takes = BTreeMap::new();
        takes.insert("500000".to_string(), 10); // more than present
        takes.insert("100000".to_string(), -1); // negative snapshot value
        takes.insert("333".to_string(), 7); // unknown id ignored

        let plan = WithdrawalPlan::from_takes(&ledger, &takes);
        assert_eq!(plan.take(0), 3);
        assert_eq!(plan.take(2), 0);
        assert!(!plan.has_edits());
        assert_invariants(&plan, &ledger);
    }

    #[test]
    fn test_clear_drops_takes_and_edits() {
        let ledger = ledger_with(&[(0, 10)]);
        let auto = suggest(&ledger, Amount::zero());
        let mut plan = recompute_with_override(&ledger, Amount::zero(), &auto, 0, 4);
        assert!(plan.has_edits());

        plan.clear();
        assert!(!plan.has_edits());
        assert_eq!(plan.total_withdrawn(), Amount::zero());
    }
}
