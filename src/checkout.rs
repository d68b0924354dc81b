//! Checkout
//!
//! Resolves a requested basket, picks the discount card and prices everything exactly once.
//! The resulting [`Receipt`] feeds both the CSV file and the console table.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::civil::DateTime;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    basket::{BasketError, RequestedBasket, ResolvedBasket},
    cards::{CardNumber, DiscountCardRegistry},
    catalog::Catalog,
    config::CheckoutConfig,
    loaders::{LoaderError, currency_from_code, load_catalog, load_registry},
    pricing::{PricingError, price},
    receipt::{Receipt, ReceiptError},
};

/// Any error a checkout run can end with.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Loading catalog or card data failed
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// The basket could not be built or resolved
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Pricing failed
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing the receipt failed
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Price a requested basket and build its receipt.
///
/// `card` is looked up in the registry; unregistered numbers get the default rate. Without
/// a card only the wholesale discount can apply.
///
/// # Errors
///
/// - [`CheckoutError::Basket`]: a requested product is missing from the catalog.
/// - [`CheckoutError::Pricing`]: an amount overflowed.
pub fn checkout<'a>(
    catalog: &Catalog<'a>,
    registry: &DiscountCardRegistry,
    requested: &RequestedBasket,
    card: Option<CardNumber>,
    issued_at: DateTime,
) -> Result<Receipt<'a>, CheckoutError> {
    let started_at = Instant::now();

    let resolved = ResolvedBasket::resolve(requested, catalog)?;
    let card = card.map(|number| registry.lookup(number));

    debug!(
        products = resolved.len(),
        units = resolved.unit_count(),
        card = ?card.map(|card| card.number().get()),
        "resolved basket"
    );

    let priced = price(catalog, &resolved.line_items(), card.as_ref())?;
    let elapsed = started_at.elapsed();

    info!(
        lines = priced.lines().len(),
        total = %priced.totals().with_discount(),
        elapsed = %elapsed.human(Truncate::Nano),
        "checkout complete"
    );

    Ok(Receipt::new(issued_at, card, priced))
}

/// Run a configured checkout end to end.
///
/// Loads the catalog and cards, prices the basket once, writes the receipt CSV to
/// `config.out` and renders the receipt table to `console`.
///
/// # Errors
///
/// Returns the first loading, pricing or output error.
pub fn run(
    config: &CheckoutConfig,
    issued_at: DateTime,
    console: impl io::Write,
) -> Result<Receipt<'static>, CheckoutError> {
    let currency = currency_from_code(&config.currency)?;
    let catalog = load_catalog(&config.products, currency)?;
    let registry = load_registry(&config.discount_cards)?;
    let (requested, card) = config.basket()?;

    let receipt = checkout(&catalog, &registry, &requested, card, issued_at)?;

    let mut file = BufWriter::new(File::create(&config.out).map_err(ReceiptError::from)?);

    receipt.write_csv(&mut file)?;
    file.flush().map_err(ReceiptError::from)?;

    info!(path = %config.out.display(), "wrote receipt");

    receipt.write_to(console)?;

    Ok(receipt)
}
