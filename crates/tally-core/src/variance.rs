//! # Variance Calculator
//!
//! Combines the externally computed net cash figure, the resolved float
//! target, and the counted drawer total into the expected-vs-counted
//! variance shown at closing.
//!
//! Sign convention: positive variance = the drawer holds more cash than
//! expected (overage); negative = shortage. All values are whole currency
//! units; no rounding is performed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Amount;

/// Derived expected-cash/variance summary for one closing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VarianceReport {
    /// Non-cash-adjusted net cash movement, supplied by the payment and
    /// adjustment forms outside the core.
    pub net_cash: Amount,

    /// The float target resolved for this session.
    pub float_target: Amount,

    /// Physically counted drawer total.
    pub counted_cash: Amount,

    /// `net_cash + float_target`: the theoretical drawer total before
    /// physical counting.
    pub expected_drawer_cash: Amount,

    /// `counted_cash − expected_drawer_cash`.
    pub variance: Amount,
}

impl VarianceReport {
    /// Computes the report. Pure; holds for all integer inputs including
    /// zero and negative net cash.
    pub fn compute(net_cash: Amount, float_target: Amount, counted_cash: Amount) -> Self {
        let expected_drawer_cash = net_cash + float_target;
        VarianceReport {
            net_cash,
            float_target,
            counted_cash,
            expected_drawer_cash,
            variance: counted_cash - expected_drawer_cash,
        }
    }

    /// Drawer holds more than expected.
    pub fn is_overage(&self) -> bool {
        self.variance.is_positive()
    }

    /// Drawer holds less than expected.
    pub fn is_shortage(&self) -> bool {
        self.variance.is_negative()
    }

    /// Counted exactly matches expected.
    pub fn is_balanced(&self) -> bool {
        self.variance.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overage() {
        // netCash 2,000,000 + float 3,000,000 = expected 5,000,000;
        // counted 5,100,000 → variance +100,000.
        let report = VarianceReport::compute(
            Amount::from_units(2_000_000),
            Amount::from_units(3_000_000),
            Amount::from_units(5_100_000),
        );
        assert_eq!(report.expected_drawer_cash, Amount::from_units(5_000_000));
        assert_eq!(report.variance, Amount::from_units(100_000));
        assert!(report.is_overage());
        assert!(!report.is_shortage());
    }

    #[test]
    fn test_shortage() {
        let report = VarianceReport::compute(
            Amount::from_units(1_000_000),
            Amount::from_units(500_000),
            Amount::from_units(1_400_000),
        );
        assert_eq!(report.variance, Amount::from_units(-100_000));
        assert!(report.is_shortage());
    }

    #[test]
    fn test_negative_net_cash() {
        // A refund-heavy day can push net cash negative; the identity
        // still holds exactly.
        let report = VarianceReport::compute(
            Amount::from_units(-250_000),
            Amount::from_units(3_000_000),
            Amount::from_units(2_750_000),
        );
        assert_eq!(report.expected_drawer_cash, Amount::from_units(2_750_000));
        assert!(report.is_balanced());
    }

    #[test]
    fn test_all_zero() {
        let report = VarianceReport::compute(Amount::zero(), Amount::zero(), Amount::zero());
        assert!(report.is_balanced());
    }
}
