//! Fixed-context decimal arithmetic.
//!
//! Every price and indicator value in the crate is a [`Num`]: a decimal
//! wrapper whose arithmetic always rounds under one [`NumContext`], so a
//! long chain of indicator computations cannot silently drift in precision
//! the way native binary floats do. `to_f64`/`Display` are representational
//! only — no arithmetic goes through `f64`.

use crate::domain::error::SigtraderError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Rounding context applied uniformly to every construction and operation.
///
/// Kept as an explicit value (not mutable global state) so tests can
/// exercise alternate precisions deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumContext {
    /// Maximum number of fractional digits retained.
    pub scale: u32,
    pub strategy: RoundingStrategy,
}

impl NumContext {
    /// Scale 16, rounding half away from zero ("half-up").
    pub const DEFAULT: NumContext = NumContext {
        scale: 16,
        strategy: RoundingStrategy::MidpointAwayFromZero,
    };

    pub const fn new(scale: u32, strategy: RoundingStrategy) -> Self {
        NumContext { scale, strategy }
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        if value.scale() > self.scale {
            value.round_dp_with_strategy(self.scale, self.strategy)
        } else {
            value
        }
    }
}

impl Default for NumContext {
    fn default() -> Self {
        NumContext::DEFAULT
    }
}

/// Immutable decimal value rounded under [`NumContext::DEFAULT`].
///
/// Two `Num`s are equal iff they compare equal numerically, independent of
/// textual representation (`0.30 == 0.3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Num(Decimal);

impl Num {
    pub const ZERO: Num = Num(Decimal::ZERO);
    pub const ONE: Num = Num(Decimal::ONE);
    pub const TWO: Num = Num(Decimal::TWO);
    pub const THREE: Num = Num(Decimal::from_parts(3, 0, 0, false, 0));
    pub const TEN: Num = Num(Decimal::TEN);
    pub const HUNDRED: Num = Num(Decimal::ONE_HUNDRED);
    pub const THOUSAND: Num = Num(Decimal::ONE_THOUSAND);

    pub fn new(value: Decimal) -> Num {
        Num(NumContext::DEFAULT.round(value))
    }

    /// Lossy conversion from a binary float. Returns `None` for NaN and
    /// infinities.
    pub fn from_f64(value: f64) -> Option<Num> {
        Decimal::from_f64(value).map(Num::new)
    }

    /// `self / divisor`, rounded to the context.
    pub fn divided_by(self, divisor: Num) -> Result<Num, SigtraderError> {
        self.0
            .checked_div(divisor.0)
            .map(Num::new)
            .ok_or(SigtraderError::DivisionByZero)
    }

    /// Remainder of `self / divisor`.
    pub fn remainder(self, divisor: Num) -> Result<Num, SigtraderError> {
        self.0
            .checked_rem(divisor.0)
            .map(Num::new)
            .ok_or(SigtraderError::DivisionByZero)
    }

    /// `self` raised to a non-negative integer power.
    pub fn pow(self, exponent: u32) -> Num {
        (0..exponent).fold(Num::ONE, |acc, _| acc * self)
    }

    pub fn abs(self) -> Num {
        Num(self.0.abs())
    }

    pub fn min(self, other: Num) -> Num {
        if self <= other { self } else { other }
    }

    pub fn max(self, other: Num) -> Num {
        if self >= other { self } else { other }
    }

    /// Re-round under an alternate context.
    pub fn rounded(self, context: &NumContext) -> Num {
        Num(context.round(self.0))
    }

    pub fn is_zero(self) -> bool {
        self.cmp(&Num::ZERO) == Ordering::Equal
    }

    pub fn is_positive(self) -> bool {
        self.cmp(&Num::ZERO) == Ordering::Greater
    }

    pub fn is_positive_or_zero(self) -> bool {
        self.cmp(&Num::ZERO) != Ordering::Less
    }

    pub fn is_negative(self) -> bool {
        self.cmp(&Num::ZERO) == Ordering::Less
    }

    pub fn is_negative_or_zero(self) -> bool {
        self.cmp(&Num::ZERO) != Ordering::Greater
    }

    pub fn is_equal(self, other: Num) -> bool {
        self.cmp(&other) == Ordering::Equal
    }

    pub fn is_greater_than(self, other: Num) -> bool {
        self.cmp(&other) == Ordering::Greater
    }

    pub fn is_less_than(self, other: Num) -> bool {
        self.cmp(&other) == Ordering::Less
    }

    /// Representational only; never compute with the result.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl From<i32> for Num {
    fn from(value: i32) -> Num {
        Num(Decimal::from(value))
    }
}

impl From<i64> for Num {
    fn from(value: i64) -> Num {
        Num(Decimal::from(value))
    }
}

impl From<u64> for Num {
    fn from(value: u64) -> Num {
        Num(Decimal::from(value))
    }
}

impl From<usize> for Num {
    fn from(value: usize) -> Num {
        Num(Decimal::from(value as u64))
    }
}

impl FromStr for Num {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Num, Self::Err> {
        Decimal::from_str(s).map(Num::new)
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        Num::new(self.0 + rhs.0)
    }
}

impl Sub for Num {
    type Output = Num;

    fn sub(self, rhs: Num) -> Num {
        Num::new(self.0 - rhs.0)
    }
}

impl Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        Num::new(self.0 * rhs.0)
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        Num(-self.0)
    }
}

impl Sum for Num {
    fn sum<I: Iterator<Item = Num>>(iter: I) -> Num {
        iter.fold(Num::ZERO, Add::add)
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn num(s: &str) -> Num {
        s.parse().unwrap()
    }

    #[test]
    fn tenth_plus_two_tenths_is_exactly_three_tenths() {
        // The motivating case: fails in binary floating point.
        assert_eq!(num("0.1") + num("0.2"), num("0.3"));
        assert!((num("0.1") + num("0.2")).is_equal(num("0.3")));
    }

    #[test]
    fn equality_ignores_trailing_zeros() {
        assert_eq!(num("0.30"), num("0.3"));
        assert_eq!(num("5"), num("5.000"));
        assert!(num("0.30").is_equal(num("0.3")));
    }

    #[test]
    fn construction_paths_agree() {
        assert_eq!(Num::from(3_i32), num("3"));
        assert_eq!(Num::from(3_usize), Num::THREE);
        assert_eq!(Num::from_f64(0.25).unwrap(), num("0.25"));
        assert_eq!(Num::new(dec!(1.5)), num("1.5"));
    }

    #[test]
    fn arithmetic_chain_matches_reference() {
        // ((1 / 3) * 3 + 1) - 1 == 1 would fail without a fixed context;
        // with scale 16 the residual is exactly representable.
        let third = Num::ONE.divided_by(Num::THREE).unwrap();
        assert_eq!(third, num("0.3333333333333333"));
        let back = third * Num::THREE;
        assert_eq!(back, num("0.9999999999999999"));
    }

    #[test]
    fn division_rounds_half_up_at_context_scale() {
        // 2/3 = 0.666... rounds up at the 16th fractional digit.
        let v = Num::TWO.divided_by(Num::THREE).unwrap();
        assert_eq!(v, num("0.6666666666666667"));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = Num::ONE.divided_by(Num::ZERO).unwrap_err();
        assert!(matches!(err, SigtraderError::DivisionByZero));
    }

    #[test]
    fn remainder_and_pow() {
        assert_eq!(num("7").remainder(num("3")).unwrap(), num("1"));
        assert!(num("7").remainder(Num::ZERO).is_err());
        assert_eq!(num("1.1").pow(2), num("1.21"));
        assert_eq!(num("2").pow(0), Num::ONE);
        assert_eq!(num("2").pow(10), num("1024"));
    }

    #[test]
    fn comparison_predicates_follow_cmp() {
        assert!(Num::ZERO.is_zero());
        assert!(num("0.00").is_zero());
        assert!(num("1").is_positive());
        assert!(num("1").is_positive_or_zero());
        assert!(Num::ZERO.is_positive_or_zero());
        assert!(num("-1").is_negative());
        assert!(Num::ZERO.is_negative_or_zero());
        assert!(num("2").is_greater_than(num("1.5")));
        assert!(num("1.5").is_less_than(num("2")));
        assert!(!num("2").is_less_than(num("2")));
    }

    #[test]
    fn negation_min_max_abs() {
        assert_eq!(-num("2.5"), num("-2.5"));
        assert_eq!(num("-2.5").abs(), num("2.5"));
        assert_eq!(num("1").min(num("2")), num("1"));
        assert_eq!(num("1").max(num("2")), num("2"));
    }

    #[test]
    fn sum_over_iterator() {
        let total: Num = ["0.1", "0.2", "0.3"].iter().map(|s| num(s)).sum();
        assert_eq!(total, num("0.6"));
    }

    #[test]
    fn alternate_context_rounding() {
        let cents = NumContext::new(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(num("2.675").rounded(&cents), num("2.68"));
        assert_eq!(num("2.674").rounded(&cents), num("2.67"));
        let truncating = NumContext::new(2, RoundingStrategy::ToZero);
        assert_eq!(num("2.679").rounded(&truncating), num("2.67"));
    }

    #[test]
    fn display_is_representational() {
        assert_eq!(num("1.50").to_string(), "1.50");
        assert!((num("0.5").to_f64() - 0.5).abs() < f64::EPSILON);
    }
}
