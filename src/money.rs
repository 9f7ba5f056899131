use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// Money is always rounded to cents
const MONEY_PRECISION: u32 = 2;
// Equal shares are kept with extra digits and only rounded to cents once
// they have been summed up
const SHARE_PRECISION: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    // A trillion: sums of any realistic number of these stay far away from
    // the limits of `Decimal`
    pub fn limit() -> Money {
        Money(Decimal::new(1_000_000_000_000, 0))
    }

    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_PRECISION))
    }

    // Rounds half away from zero to the nearest cent
    pub fn from_units(units: f64) -> Option<Self> {
        let money = Money::settle(Decimal::from_f64(units)?);
        if money.abs() > Money::limit() {
            return None;
        }
        Some(money)
    }

    pub fn settle(total: Decimal) -> Money {
        Money(total.round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }
}

// What is left of one share of `amount` split `shares` ways once `paid` has
// been contributed towards it. Overpayment is absorbed
pub fn share_remainder(amount: Money, shares: i64, paid: Money) -> Decimal {
    let share = (amount.0 / Decimal::from(shares))
        .round_dp_with_strategy(SHARE_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    (share - paid.0).max(Decimal::ZERO)
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(units) => serializer.serialize_f64(units),
            None => Err(serde::ser::Error::custom(format!("unrepresentable amount: {}", self.0))),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        Money::from_units(units)
            .ok_or_else(|| de::Error::custom(format!("invalid money amount: {}", units)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_units_into_cents() {
        let money: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(money, Money::from_cents(1250));
        let money: Money = serde_json::from_str("90").unwrap();
        assert_eq!(money, Money::from_cents(9000));
        // 0.1 + 0.2 style inputs still land on the nearest cent
        assert_eq!(Money::from_units(0.30000000000000004), Some(Money::from_cents(30)));
        assert_eq!(Money::from_units(0.005), Some(Money::from_cents(1)));
    }

    #[test]
    fn serializes_as_units() {
        let json = serde_json::to_string(&Money::from_cents(6667)).unwrap();
        assert_eq!(json, "66.67");
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert_eq!(Money::from_units(f64::NAN), None);
        assert_eq!(Money::from_units(f64::INFINITY), None);
    }

    #[test]
    fn rejects_amounts_above_the_maximum() {
        assert_eq!(Money::from_units(1e12), Some(Money::limit()));
        assert_eq!(Money::from_units(1e12 + 1.0), None);
        assert_eq!(Money::from_units(-5e16), None);
        assert!(serde_json::from_str::<Money>("5e16").is_err());
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_cents(4500).to_string(), "45.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::from_units(90.0).unwrap().to_string(), "90.00");
    }

    #[test]
    fn thirds_add_up_to_the_nearest_cent() {
        let third = share_remainder(Money::from_cents(10_000), 3, Money::ZERO);
        assert_eq!(Money::settle(third), Money::from_cents(3333));
        assert_eq!(Money::settle(third + third), Money::from_cents(6667));
        assert_eq!(Money::settle(third + third + third), Money::from_cents(10_000));
    }

    #[test]
    fn settles_half_cents_up() {
        let half = share_remainder(Money::from_cents(1), 2, Money::ZERO);
        assert_eq!(Money::settle(half), Money::from_cents(1));
        let quarter = share_remainder(Money::from_cents(5), 4, Money::ZERO);
        assert_eq!(Money::settle(quarter), Money::from_cents(1));
    }

    #[test]
    fn remainder_is_clamped_at_zero() {
        let remainder = share_remainder(Money::from_cents(9000), 2, Money::from_cents(5000));
        assert!(remainder.is_zero());
        let remainder = share_remainder(Money::from_cents(9000), 2, Money::from_cents(2000));
        assert_eq!(Money::settle(remainder), Money::from_cents(2500));
    }

    #[test]
    fn maximum_amounts_do_not_overflow() {
        let max = Money::limit();
        let paid = max + max + max;
        assert!(share_remainder(max, 2, paid).is_zero());
        let remainder = share_remainder(max, 1_000_003, Money::ZERO);
        assert_eq!(Money::settle(remainder), Money::from_cents(99_999_700));
    }
}
