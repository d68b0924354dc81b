//! Loaders
//!
//! Builds the [`Catalog`] and [`DiscountCardRegistry`] from files on disk. Semicolon-delimited
//! CSV and YAML are supported; the format is picked from the file extension.

use std::{ffi::OsStr, io, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;
use tracing::info;

use crate::{
    cards::{DiscountCard, DiscountCardRegistry, RegistryError},
    catalog::{Catalog, CatalogError},
    discounts::to_scale_2,
    products::Product,
};

pub mod delimited;
pub mod yaml;

/// Errors raised while loading catalog or card data.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// IO error reading a data file
    #[error("Failed to read data file: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] ::csv::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Invalid discount rate format
    #[error("Invalid discount rate: {0}")]
    InvalidRate(String),

    /// A product has no description
    #[error("Product {0} has an empty description")]
    EmptyDescription(u32),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency without two minor digits
    #[error("Currency {0} does not use two decimal places")]
    UnsupportedCurrency(String),

    /// File extension is not a supported format
    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(String),

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Registry construction error
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Data file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Semicolon-delimited with a header row
    Csv,

    /// YAML document with a top-level list
    Yaml,
}

impl Format {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for anything but `csv`, `yml` and `yaml`.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("yml" | "yaml") => Ok(Format::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a catalog priced in `currency`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a record is invalid, or two
/// products share an identifier.
pub fn load_catalog<'a>(path: &Path, currency: &'a Currency) -> Result<Catalog<'a>, LoaderError> {
    let products = match Format::from_path(path)? {
        Format::Csv => delimited::read_products(path, currency)?,
        Format::Yaml => yaml::read_products(path, currency)?,
    };

    let catalog = Catalog::with_products(products, currency)?;

    info!(
        path = %path.display(),
        products = catalog.len(),
        currency = currency.iso_alpha_code,
        "loaded catalog"
    );

    Ok(catalog)
}

/// Load the discount card registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a rate is invalid, or two cards
/// share a number.
pub fn load_registry(path: &Path) -> Result<DiscountCardRegistry, LoaderError> {
    let cards = match Format::from_path(path)? {
        Format::Csv => delimited::read_cards(path)?,
        Format::Yaml => yaml::read_cards(path)?,
    };

    let registry = DiscountCardRegistry::with_cards(cards)?;

    info!(path = %path.display(), cards = registry.len(), "loaded discount cards");

    Ok(registry)
}

/// Resolve an ISO 4217 currency code.
///
/// # Errors
///
/// - [`LoaderError::UnknownCurrency`]: the code is not an ISO currency.
/// - [`LoaderError::UnsupportedCurrency`]: the currency does not have two minor digits.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, LoaderError> {
    let code = code.trim().to_ascii_uppercase();
    let currency = iso::find(&code).ok_or_else(|| LoaderError::UnknownCurrency(code.clone()))?;

    if currency.exponent != 2 {
        return Err(LoaderError::UnsupportedCurrency(code));
    }

    Ok(currency)
}

/// Build a product from raw field values.
pub(crate) fn product_from_fields<'a>(
    id: u32,
    description: &str,
    price: &str,
    quantity_in_stock: u32,
    wholesale: bool,
    currency: &'a Currency,
) -> Result<Product<'a>, LoaderError> {
    let description = description.trim();

    if description.is_empty() {
        return Err(LoaderError::EmptyDescription(id));
    }

    Ok(Product::new(
        id,
        description,
        parse_price(price, currency)?,
        quantity_in_stock,
        wholesale,
    ))
}

/// Build a discount card from raw field values.
pub(crate) fn card_from_fields(number: u32, amount: &str) -> Result<DiscountCard, LoaderError> {
    Ok(DiscountCard::new(number, parse_rate(amount)?))
}

/// Parse a price such as `1.07`, rounding half-up to whole minor units.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidPrice`] if the amount is not a number, is negative or does
/// not fit in minor units.
pub fn parse_price<'a>(
    raw: &str,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, LoaderError> {
    let invalid = || LoaderError::InvalidPrice(raw.to_string());

    let amount = parse_scaled(raw).ok_or_else(invalid)?;

    if amount < Decimal::ZERO {
        return Err(invalid());
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.to_i64())
        .ok_or_else(invalid)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a rate in percentage points such as `3` or `2.5`, at scale 2.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidRate`] if the rate is not a number.
pub fn parse_rate(raw: &str) -> Result<Decimal, LoaderError> {
    let raw = raw.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw);

    parse_scaled(raw).ok_or_else(|| LoaderError::InvalidRate(raw.to_string()))
}

/// Lenient wholesale flag: only `true`, in any case, counts.
pub(crate) fn parse_wholesale(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn parse_scaled(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok().map(to_scale_2)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rusty_money::iso::{GBP, JPY};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn format_follows_extension() -> TestResult {
        assert_eq!(Format::from_path(Path::new("products.csv"))?, Format::Csv);
        assert_eq!(Format::from_path(Path::new("cards.YML"))?, Format::Yaml);
        assert_eq!(Format::from_path(Path::new("cards.yaml"))?, Format::Yaml);

        Ok(())
    }

    #[test]
    fn format_rejects_other_extensions() {
        let result = Format::from_path(&PathBuf::from("products.json"));

        assert!(matches!(
            result,
            Err(LoaderError::UnsupportedFormat(path)) if path == "products.json"
        ));
        assert!(Format::from_path(Path::new("products")).is_err());
    }

    #[test]
    fn parse_price_rounds_half_up() -> TestResult {
        assert_eq!(parse_price("1.07", GBP)?.to_minor_units(), 107);
        assert_eq!(parse_price(" 2.345 ", GBP)?.to_minor_units(), 235);
        assert_eq!(parse_price("10", GBP)?.to_minor_units(), 1000);
        assert_eq!(parse_price("0", GBP)?.to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_negative_and_garbage() {
        for raw in ["-0.01", "abc", ""] {
            assert!(matches!(
                parse_price(raw, GBP),
                Err(LoaderError::InvalidPrice(_))
            ));
        }
    }

    #[test]
    fn parse_rate_accepts_percent_suffix() -> TestResult {
        assert_eq!(parse_rate("3")?, Decimal::new(300, 2));
        assert_eq!(parse_rate("2.5%")?, Decimal::new(250, 2));
        assert_eq!(parse_rate("4.125")?, Decimal::new(413, 2));
        assert_eq!(parse_rate("3")?.to_string(), "3.00");

        Ok(())
    }

    #[test]
    fn parse_rate_rejects_garbage() {
        assert!(matches!(parse_rate("three"), Err(LoaderError::InvalidRate(_))));
    }

    #[test]
    fn wholesale_flag_is_lenient() {
        assert!(parse_wholesale("true"));
        assert!(parse_wholesale(" TRUE "));
        assert!(!parse_wholesale("yes"));
        assert!(!parse_wholesale("false"));
        assert!(!parse_wholesale(""));
    }

    #[test]
    fn empty_description_is_rejected() {
        let result = product_from_fields(7, "  ", "1.00", 1, false, GBP);

        assert!(matches!(result, Err(LoaderError::EmptyDescription(7))));
    }

    #[test]
    fn currency_from_code_resolves_iso_codes() -> TestResult {
        assert_eq!(currency_from_code("gbp")?, GBP);
        assert!(matches!(
            currency_from_code("XYZ"),
            Err(LoaderError::UnknownCurrency(code)) if code == "XYZ"
        ));
        assert!(matches!(
            currency_from_code(JPY.iso_alpha_code),
            Err(LoaderError::UnsupportedCurrency(_))
        ));

        Ok(())
    }
}
