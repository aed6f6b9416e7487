//! # Money Module
//!
//! Provides the `Amount` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Whole Currency Units                                     │
//! │    The business operates in a currency with no fractional units, so    │
//! │    every amount is an exact i64. A drawer variance of 0 means exactly  │
//! │    zero, never "close to zero".                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Amount;
//!
//! let counted = Amount::from_units(5_100_000);
//! let expected = Amount::from_units(5_000_000);
//! let variance = counted - expected;
//! assert_eq!(variance.units(), 100_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Amount Type
// =============================================================================

/// Represents a monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for shortages and payouts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, serialized as a plain number
///
/// EVERY monetary value in the suite flows through this type: drawer
/// totals, withdrawal values, float targets, net cash, and variance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Amount(i64);

impl Amount {
    /// Creates an Amount from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Amount(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Clamps the amount into `[lo, hi]`.
    ///
    /// Used by the planner to bound the float target to what the drawer
    /// actually holds.
    #[inline]
    pub fn clamp(self, lo: Amount, hi: Amount) -> Self {
        Amount(self.0.clamp(lo.0, hi.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows the amount with thousands grouping.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{}{}", if self.0 < 0 { "-" } else { "" }, grouped)
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a unit count (face value × note count).
impl Mul<i64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Amount(self.0 * count)
    }
}

impl Neg for Amount {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let amount = Amount::from_units(500_000);
        assert_eq!(amount.units(), 500_000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Amount::from_units(0)), "0");
        assert_eq!(format!("{}", Amount::from_units(999)), "999");
        assert_eq!(format!("{}", Amount::from_units(1_000)), "1,000");
        assert_eq!(format!("{}", Amount::from_units(5_500_000)), "5,500,000");
        assert_eq!(format!("{}", Amount::from_units(-100_000)), "-100,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::from_units(1_000);
        let b = Amount::from_units(400);

        assert_eq!((a + b).units(), 1_400);
        assert_eq!((a - b).units(), 600);
        assert_eq!((b - a).units(), -600);
        assert_eq!((a * 3).units(), 3_000);
        assert_eq!((-a).units(), -1_000);
    }

    #[test]
    fn test_sum() {
        let total: Amount = [100, 200, 300]
            .iter()
            .map(|&u| Amount::from_units(u))
            .sum();
        assert_eq!(total.units(), 600);
    }

    #[test]
    fn test_clamp() {
        let target = Amount::from_units(3_000_000);
        let total = Amount::from_units(2_000_000);
        assert_eq!(target.clamp(Amount::zero(), total), total);
        assert_eq!(Amount::from_units(-5).clamp(Amount::zero(), total), Amount::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Amount::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let overage = Amount::from_units(100_000);
        assert!(overage.is_positive());

        let shortage = Amount::from_units(-100_000);
        assert!(shortage.is_negative());
        assert_eq!(shortage.abs().units(), 100_000);
    }
}
