//! Discounts
//!
//! Per-line discount selection. The wholesale and card discounts never stack: a line that
//! qualifies for the wholesale discount ignores the card entirely.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    cards::{CardNumber, DiscountCard},
    products::Product,
};

/// Minimum quantity of a wholesale product for the bulk discount to apply.
pub const WHOLESALE_THRESHOLD: u32 = 5;

/// Bulk discount rate in percentage points (10.00%).
pub const WHOLESALE_RATE: Decimal = Decimal::from_parts(1000, 0, 0, false, 2);

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Which discount rule a line was priced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Full price.
    None,

    /// Bulk discount for wholesale products.
    Wholesale,

    /// Loyalty card discount.
    Card,
}

/// The discount applied to a single line, with the rate it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedDiscount {
    /// No discount.
    None,

    /// Bulk discount.
    Wholesale {
        /// Rate in percentage points
        rate: Decimal,
    },

    /// Loyalty card discount.
    Card {
        /// Card the discount came from
        number: CardNumber,
        /// Rate in percentage points
        rate: Decimal,
    },
}

impl AppliedDiscount {
    /// Pick the discount for `quantity` units of `product`.
    ///
    /// Wholesale wins over the card whenever the product is wholesale-eligible and at least
    /// [`WHOLESALE_THRESHOLD`] units are bought.
    pub fn select(product: &Product<'_>, quantity: u32, card: Option<&DiscountCard>) -> Self {
        if product.wholesale && quantity >= WHOLESALE_THRESHOLD {
            return AppliedDiscount::Wholesale {
                rate: WHOLESALE_RATE,
            };
        }

        match card {
            Some(card) => AppliedDiscount::Card {
                number: card.number(),
                rate: card.rate(),
            },
            None => AppliedDiscount::None,
        }
    }

    /// The rule this discount was chosen under.
    pub fn kind(&self) -> DiscountKind {
        match self {
            AppliedDiscount::None => DiscountKind::None,
            AppliedDiscount::Wholesale { .. } => DiscountKind::Wholesale,
            AppliedDiscount::Card { .. } => DiscountKind::Card,
        }
    }

    /// Rate in percentage points, zero when no discount applies.
    pub fn rate(&self) -> Decimal {
        match self {
            AppliedDiscount::None => Decimal::ZERO,
            AppliedDiscount::Wholesale { rate } | AppliedDiscount::Card { rate, .. } => *rate,
        }
    }

    /// Rate as a fraction of the amount it applies to.
    pub fn percentage(&self) -> Percentage {
        Percentage::from(self.rate() / Decimal::ONE_HUNDRED)
    }

    /// Discount amount on `minor` units, rounded half-up to a whole minor unit.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the amount cannot be represented.
    pub fn amount_on(&self, minor: i64) -> Result<i64, DiscountError> {
        match self {
            AppliedDiscount::None => Ok(0),
            AppliedDiscount::Wholesale { .. } | AppliedDiscount::Card { .. } => {
                percent_of_minor(&self.percentage(), minor)
            }
        }
    }
}

impl fmt::Display for AppliedDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedDiscount::None => Ok(()),
            AppliedDiscount::Wholesale { rate } => write!(f, "{rate}% wholesale"),
            AppliedDiscount::Card { rate, .. } => write!(f, "{rate}% card discount"),
        }
    }
}

/// Round a rate or amount half-up to two decimal places and store it at scale 2.
///
/// `3` becomes `3.00` and `4.125` becomes `4.13`.
pub fn to_scale_2(value: Decimal) -> Decimal {
    let mut scaled = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    scaled.rescale(2);

    scaled
}

/// Take `percent` of an amount in minor units, rounded to a whole minor unit.
///
/// Midpoints round away from zero, which is half-up for the non-negative amounts on a
/// receipt.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result does not fit in `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let fraction = *percent * Decimal::ONE;

    let exact = fraction
        .checked_mul(Decimal::from(minor))
        .ok_or(DiscountError::PercentConversion)?;

    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
