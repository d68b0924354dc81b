//! Pricing
//!
//! Turns resolved line items into priced lines and receipt totals. Every amount is a whole
//! number of minor units once it leaves this module, so the totals always reconcile:
//! `with_discount == without_discount - discount`.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    basket::LineItem,
    cards::DiscountCard,
    catalog::{Catalog, CatalogError},
    discounts::{AppliedDiscount, DiscountError},
    products::ProductId,
};

/// Errors that can occur while pricing a basket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A line references a product missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A line amount does not fit in minor units.
    #[error("Amount overflowed while pricing product {0}")]
    AmountOverflow(ProductId),

    /// A receipt total does not fit in minor units.
    #[error("Receipt total overflowed")]
    TotalOverflow,

    /// Discount calculation failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// A priced receipt line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineResult<'a> {
    /// Product identifier
    pub product_id: ProductId,

    /// Product description at pricing time
    pub description: String,

    /// Units bought
    pub quantity: u32,

    /// Price of one unit
    pub unit_price: Money<'a, Currency>,

    /// `unit_price * quantity`
    pub subtotal: Money<'a, Currency>,

    /// Discount taken off the subtotal
    pub discount: Money<'a, Currency>,

    /// `subtotal - discount`
    pub total: Money<'a, Currency>,

    /// Rule and rate the discount was calculated with
    pub applied: AppliedDiscount,
}

/// Receipt totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiptTotals<'a> {
    gross: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    net: Money<'a, Currency>,
}

impl<'a> ReceiptTotals<'a> {
    /// Build totals from minor units; the discounted total is derived.
    fn from_minor(gross: i64, discount: i64, currency: &'a Currency) -> Option<Self> {
        let net = gross.checked_sub(discount)?;

        Some(Self {
            gross: Money::from_minor(gross, currency),
            discount: Money::from_minor(discount, currency),
            net: Money::from_minor(net, currency),
        })
    }

    /// Sum of line subtotals before discounts.
    pub fn without_discount(&self) -> Money<'a, Currency> {
        self.gross
    }

    /// Sum of line discounts.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount to pay.
    pub fn with_discount(&self) -> Money<'a, Currency> {
        self.net
    }
}

/// Priced lines and their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedBasket<'a> {
    lines: Vec<LineResult<'a>>,
    totals: ReceiptTotals<'a>,
}

impl<'a> PricedBasket<'a> {
    /// Priced lines, in the order they were given to [`price`].
    pub fn lines(&self) -> &[LineResult<'a>] {
        &self.lines
    }

    /// Receipt totals.
    pub fn totals(&self) -> &ReceiptTotals<'a> {
        &self.totals
    }

    /// Currency of every amount.
    pub fn currency(&self) -> &'a Currency {
        self.totals.gross.currency()
    }
}

/// Price line items against the catalog, applying at most one discount per line.
///
/// Product identifiers are looked up again even if the lines came from a resolved basket.
/// Nothing is returned unless every line prices successfully.
///
/// # Errors
///
/// - [`PricingError::Catalog`]: a line references an unknown product.
/// - [`PricingError::AmountOverflow`]: a line amount does not fit in minor units.
/// - [`PricingError::TotalOverflow`]: a receipt total does not fit in minor units.
/// - [`PricingError::Discount`]: a discount amount cannot be represented.
pub fn price<'a>(
    catalog: &Catalog<'a>,
    lines: &[LineItem],
    card: Option<&DiscountCard>,
) -> Result<PricedBasket<'a>, PricingError> {
    let currency = catalog.currency();

    let mut results = Vec::with_capacity(lines.len());
    let mut without_discount = 0i64;
    let mut discount_total = 0i64;

    for line in lines {
        let product = catalog.lookup(line.product_id)?;
        let overflow = || PricingError::AmountOverflow(product.id);

        let unit_minor = product.price.to_minor_units();
        let subtotal = unit_minor
            .checked_mul(i64::from(line.quantity))
            .ok_or_else(overflow)?;

        let applied = AppliedDiscount::select(product, line.quantity, card);
        let discount = applied.amount_on(subtotal)?;
        let total = subtotal.checked_sub(discount).ok_or_else(overflow)?;

        trace!(
            product = %product.id,
            quantity = line.quantity,
            subtotal,
            discount,
            kind = ?applied.kind(),
            "priced line"
        );

        without_discount = without_discount
            .checked_add(subtotal)
            .ok_or(PricingError::TotalOverflow)?;
        discount_total = discount_total
            .checked_add(discount)
            .ok_or(PricingError::TotalOverflow)?;

        results.push(LineResult {
            product_id: product.id,
            description: product.description.clone(),
            quantity: line.quantity,
            unit_price: product.price,
            subtotal: Money::from_minor(subtotal, currency),
            discount: Money::from_minor(discount, currency),
            total: Money::from_minor(total, currency),
            applied,
        });
    }

    let totals = ReceiptTotals::from_minor(without_discount, discount_total, currency)
        .ok_or(PricingError::TotalOverflow)?;

    debug!(
        lines = results.len(),
        without_discount, discount_total, "priced basket"
    );

    Ok(PricedBasket {
        lines: results,
        totals,
    })
}
