//! # Closing Record Types
//!
//! The persisted/editable shapes of one cashier-closing record. These are
//! the fields the signature mechanism covers and the persistence layer
//! stores; the payment and adjustment figures themselves are produced by
//! forms outside this crate and treated here as opaque numeric leaves.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Amount;

/// Header identity fields of a closing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecordHeader {
    /// Record ID (UUID). Distinguishes two records that would collide on
    /// the logical key when a concurrent session saved first.
    pub id: String,

    /// Branch the drawer belongs to. Empty until the operator picks one;
    /// saving is blocked while empty.
    pub branch_id: String,

    /// Business date being closed.
    pub business_date: NaiveDate,

    /// Cashier being reconciled, when known.
    pub cashier_id: Option<String>,

    /// Free-form operator note.
    pub notes: Option<String>,
}

impl RecordHeader {
    /// Creates a header for a fresh draft.
    pub fn new(id: impl Into<String>, branch_id: impl Into<String>, business_date: NaiveDate) -> Self {
        RecordHeader {
            id: id.into(),
            branch_id: branch_id.into(),
            business_date,
            cashier_id: None,
            notes: None,
        }
    }
}

/// Numeric payment/adjustment figures owned by the external revenue forms.
///
/// The core consumes only the derived [`NetCashInputs::net_cash`] figure
/// and includes the individual leaves in the record signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NetCashInputs {
    /// Gross revenue for the period.
    pub gross_revenue: Amount,

    /// Revenue settled by card (non-cash channel).
    pub card_settled: Amount,

    /// Revenue settled by bank transfer (non-cash channel).
    pub transfer_settled: Amount,

    /// Payout-equivalent adjustments paid out of the drawer.
    pub payout_adjustments: Amount,

    /// Receivables collected in cash during the period.
    pub receivables_cash: Amount,

    /// Deposits taken in cash during the period.
    pub deposits_cash: Amount,
}

impl NetCashInputs {
    /// Non-cash-adjusted net cash movement: revenue minus the non-cash
    /// channels minus payouts, plus cash-settled receivables and deposits.
    pub fn net_cash(&self) -> Amount {
        self.gross_revenue - self.card_settled - self.transfer_settled - self.payout_adjustments
            + self.receivables_cash
            + self.deposits_cash
    }
}

/// The full closing record: everything an operator can edit, in the shape
/// the persistence layer stores.
///
/// Two of these exist conceptually at any time: the **draft** (current
/// in-memory state) and the **server** snapshot (last persisted or loaded
/// state). A record is dirty iff their signatures differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClosingRecord {
    pub header: RecordHeader,

    pub inputs: NetCashInputs,

    /// The resolved float target at the moment the snapshot was taken.
    pub float_target_at_save: Amount,

    /// Physical counts per denomination id (flat keyed structure).
    pub cash_counts: BTreeMap<String, i64>,

    /// Withdrawal plan per denomination id.
    pub withdrawal_plan: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_cash_identity() {
        let inputs = NetCashInputs {
            gross_revenue: Amount::from_units(10_000_000),
            card_settled: Amount::from_units(6_000_000),
            transfer_settled: Amount::from_units(1_500_000),
            payout_adjustments: Amount::from_units(700_000),
            receivables_cash: Amount::from_units(150_000),
            deposits_cash: Amount::from_units(50_000),
        };
        assert_eq!(inputs.net_cash(), Amount::from_units(2_000_000));
    }

    #[test]
    fn test_net_cash_can_go_negative() {
        let inputs = NetCashInputs {
            payout_adjustments: Amount::from_units(300_000),
            ..Default::default()
        };
        assert_eq!(inputs.net_cash(), Amount::from_units(-300_000));
    }
}
