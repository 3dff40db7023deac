//! Checkout arithmetic: shipping, coupons and order totals.
//!
//! All amounts are in rupees as [`Decimal`]. Nothing here touches storage, so
//! the cart and the storefront compute identical summaries.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 5000;

/// Flat shipping charge below the free-shipping threshold.
pub const SHIPPING_FEE: i64 = 250;

/// Shipping for a given subtotal.
#[must_use]
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > Decimal::from(FREE_SHIPPING_THRESHOLD) {
        Decimal::ZERO
    } else {
        Decimal::from(SHIPPING_FEE)
    }
}

/// Sum of `unit_price * quantity` over the lines, or `None` if it does not
/// fit in a [`Decimal`].
#[must_use]
pub fn subtotal<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |acc, (price, qty)| {
        acc.checked_add(price.checked_mul(Decimal::from(qty))?)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CouponError {
    #[error("Please enter a coupon code")]
    Empty,
    #[error("Invalid or expired coupon code")]
    Invalid,
}

/// A recognised coupon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Coupon {
    /// 10% off the subtotal.
    Welcome10,
}

impl Coupon {
    /// Parse a user-entered code. Matching ignores case but not whitespace.
    ///
    /// # Errors
    ///
    /// [`CouponError::Empty`] for a blank code, [`CouponError::Invalid`] for
    /// anything unrecognised.
    pub fn parse(code: &str) -> Result<Self, CouponError> {
        if code.trim().is_empty() {
            return Err(CouponError::Empty);
        }
        if code.eq_ignore_ascii_case("WELCOME10") {
            Ok(Self::Welcome10)
        } else {
            Err(CouponError::Invalid)
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Welcome10 => "WELCOME10",
        }
    }

    /// Discount for `subtotal`, rounded to whole rupees (half away from zero).
    #[must_use]
    pub fn discount(self, subtotal: Decimal) -> Decimal {
        match self {
            Self::Welcome10 => (subtotal / Decimal::TEN)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// The money breakdown shown on the checkout page and sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

impl CheckoutSummary {
    /// Compute the breakdown. Shipping is decided on the pre-discount subtotal.
    ///
    /// Shipping is only charged at or below the free-shipping threshold and
    /// the discount never exceeds the subtotal, so the total cannot overflow.
    #[must_use]
    pub fn compute(subtotal: Decimal, coupon: Option<Coupon>) -> Self {
        let shipping = shipping_for(subtotal);
        let discount = coupon.map_or(Decimal::ZERO, |c| c.discount(subtotal));
        Self {
            subtotal,
            shipping,
            discount,
            total: subtotal + shipping - discount,
            coupon,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_shipping_threshold_is_exclusive() {
        assert_eq!(shipping_for(d(5000)), d(250));
        assert_eq!(shipping_for(d(5001)), d(0));
        assert_eq!(shipping_for(d(0)), d(250));
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal([(d(1400), 2), (d(250), 1)]), Some(d(3050)));
        assert_eq!(subtotal(Vec::<(Decimal, i32)>::new()), Some(d(0)));
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let huge = Decimal::from(10_i128.pow(20));
        assert_eq!(subtotal([(huge, i32::MAX)]), None);
        assert_eq!(subtotal([(Decimal::MAX, 1), (d(1), 1)]), None);
    }

    #[test]
    fn test_summary_at_decimal_max() {
        assert_eq!(CheckoutSummary::compute(Decimal::MAX, None).total, Decimal::MAX);
        let s = CheckoutSummary::compute(Decimal::MAX, Some(Coupon::Welcome10));
        assert_eq!(s.total, Decimal::MAX - s.discount);
    }

    #[test]
    fn test_coupon_parse() {
        assert_eq!(Coupon::parse("welcome10"), Ok(Coupon::Welcome10));
        assert_eq!(Coupon::parse("WELCOME10"), Ok(Coupon::Welcome10));
        assert_eq!(Coupon::parse(" WELCOME10 "), Err(CouponError::Invalid));
        assert_eq!(Coupon::parse("  "), Err(CouponError::Empty));
        assert_eq!(Coupon::parse("SAVE50"), Err(CouponError::Invalid));
        assert_eq!(CouponError::Invalid.to_string(), "Invalid or expired coupon code");
    }

    #[test]
    fn test_discount_rounds_half_away_from_zero() {
        assert_eq!(Coupon::Welcome10.discount(d(2800)), d(280));
        assert_eq!(Coupon::Welcome10.discount(d(1005)), d(101));
        assert_eq!(Coupon::Welcome10.discount(d(1004)), d(100));
    }

    #[test]
    fn test_summary_without_coupon() {
        let s = CheckoutSummary::compute(d(2800), None);
        assert_eq!(s.shipping, d(250));
        assert_eq!(s.discount, d(0));
        assert_eq!(s.total, d(3050));
    }

    #[test]
    fn test_summary_with_coupon_over_threshold() {
        let s = CheckoutSummary::compute(d(6000), Some(Coupon::Welcome10));
        assert_eq!(s.shipping, d(0));
        assert_eq!(s.discount, d(600));
        assert_eq!(s.total, d(5400));
    }

    #[test]
    fn test_summary_serializes_coupon_code() {
        let json = serde_json::to_value(CheckoutSummary::compute(d(100), Some(Coupon::Welcome10))).unwrap();
        assert_eq!(json["coupon"], "WELCOME10");
        assert_eq!(json["total"], serde_json::json!(340.0));
    }
}
