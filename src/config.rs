//! Checkout configuration

use std::{path::PathBuf, str::FromStr};

use clap::{Args, Parser};
use thiserror::Error;

use crate::{
    basket::{BasketError, RequestedBasket},
    cards::CardNumber,
};

/// Basket used when no entries are given on the command line.
pub const DEMO_BASKET: [(u32, u32); 2] = [(1, 4), (2, 5)];

/// Card used with [`DEMO_BASKET`].
pub const DEMO_CARD: CardNumber = CardNumber::new(1111);

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Checkout configuration
#[derive(Debug, Parser)]
#[command(name = "checkout", about = "Price a basket and write its receipt", long_about = None)]
pub struct CheckoutConfig {
    /// Basket entries as `ID-QUANTITY`, e.g. `3-1 2-5`
    #[arg(value_name = "ID-QUANTITY")]
    pub items: Vec<BasketEntry>,

    /// Discount card number
    #[arg(short = 'c', long, env = "CHECKOUT_DISCOUNT_CARD")]
    pub discount_card: Option<u32>,

    /// Product catalog (`.csv`, `.yml` or `.yaml`)
    #[arg(long, env = "CHECKOUT_PRODUCTS", default_value = "./fixtures/products.csv")]
    pub products: PathBuf,

    /// Discount card registry (`.csv`, `.yml` or `.yaml`)
    #[arg(
        long,
        env = "CHECKOUT_DISCOUNT_CARDS",
        default_value = "./fixtures/discount_cards.csv"
    )]
    pub discount_cards: PathBuf,

    /// Receipt CSV output path
    #[arg(short, long, env = "CHECKOUT_RESULT", default_value = "receipt.csv")]
    pub out: PathBuf,

    /// ISO 4217 code of the catalog currency
    #[arg(long, env = "CHECKOUT_CURRENCY", default_value = "GBP")]
    pub currency: String,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CheckoutConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The basket and card to check out.
    ///
    /// Falls back to [`DEMO_BASKET`] with [`DEMO_CARD`] when no entries were given. An
    /// explicit `--discount-card` always wins.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidQuantity`] for zero quantities.
    pub fn basket(&self) -> Result<(RequestedBasket, Option<CardNumber>), BasketError> {
        let card = self.discount_card.map(CardNumber::new);

        if self.items.is_empty() {
            let basket = RequestedBasket::with_quantities(DEMO_BASKET)?;

            return Ok((basket, card.or(Some(DEMO_CARD))));
        }

        let basket = RequestedBasket::with_quantities(
            self.items.iter().map(|entry| (entry.product_id, entry.quantity)),
        )?;

        Ok((basket, card))
    }
}

/// Basket entry parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketEntryError {
    /// Entry is not `ID-QUANTITY`
    #[error("Expected ID-QUANTITY, got: {0}")]
    InvalidFormat(String),

    /// Identifier or quantity is not a whole number
    #[error("Invalid number in basket entry: {0}")]
    InvalidNumber(String),
}

/// One `ID-QUANTITY` command-line entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasketEntry {
    /// Requested product
    pub product_id: u32,

    /// Requested units
    pub quantity: u32,
}

impl FromStr for BasketEntry {
    type Err = BasketEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| BasketEntryError::InvalidFormat(s.to_string()))?;

        let number = |raw: &str| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_err| BasketEntryError::InvalidNumber(s.to_string()))
        };

        Ok(Self {
            product_id: number(id)?,
            quantity: number(quantity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn parse(args: &[&str]) -> Result<CheckoutConfig, clap::Error> {
        CheckoutConfig::try_parse_from(std::iter::once("checkout").chain(args.iter().copied()))
    }

    #[test]
    fn basket_entry_parses_id_and_quantity() -> TestResult {
        assert_eq!(
            "3-12".parse::<BasketEntry>()?,
            BasketEntry {
                product_id: 3,
                quantity: 12
            }
        );

        Ok(())
    }

    #[test]
    fn basket_entry_rejects_malformed_input() {
        assert_eq!(
            "3".parse::<BasketEntry>(),
            Err(BasketEntryError::InvalidFormat("3".to_string()))
        );
        assert_eq!(
            "3--1".parse::<BasketEntry>(),
            Err(BasketEntryError::InvalidNumber("3--1".to_string()))
        );
        assert_eq!(
            "a-1".parse::<BasketEntry>(),
            Err(BasketEntryError::InvalidNumber("a-1".to_string()))
        );
    }

    #[test]
    fn items_and_card_are_read_from_args() -> TestResult {
        let config = parse(&["3-1", "2-5", "3-2", "--discount-card", "4444"])?;

        let (basket, card) = config.basket()?;

        assert_eq!(card, Some(CardNumber::new(4444)));
        assert_eq!(basket.len(), 2);
        assert_eq!(basket.quantity(ProductId::new(3)), Some(3));

        Ok(())
    }

    #[test]
    fn explicit_items_without_card_have_no_card() -> TestResult {
        let config = parse(&["1-1"])?;

        let (_, card) = config.basket()?;

        assert_eq!(card, None);

        Ok(())
    }

    #[test]
    fn empty_args_fall_back_to_demo_basket() -> TestResult {
        let config = parse(&[])?;

        let (basket, card) = config.basket()?;

        assert_eq!(card, Some(DEMO_CARD));
        assert_eq!(basket.quantity(ProductId::new(1)), Some(4));
        assert_eq!(basket.quantity(ProductId::new(2)), Some(5));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() -> TestResult {
        let config = parse(&["1-0"])?;

        assert!(matches!(
            config.basket(),
            Err(BasketError::InvalidQuantity { quantity: 0, .. })
        ));

        Ok(())
    }

    #[test]
    fn malformed_entry_is_reported_by_clap() {
        assert!(parse(&["one-two"]).is_err());
    }

    #[test]
    fn defaults_point_at_fixtures() -> TestResult {
        let config = parse(&["1-1"])?;

        assert_eq!(config.products, PathBuf::from("./fixtures/products.csv"));
        assert_eq!(config.out, PathBuf::from("receipt.csv"));
        assert_eq!(config.logging.log_format, LogFormat::Compact);

        Ok(())
    }
}
