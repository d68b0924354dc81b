//! YAML data files.

use std::{fs, path::Path};

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{cards::DiscountCard, products::Product};

use super::{LoaderError, card_from_fields, product_from_fields};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: u32,

    /// Product description
    pub description: String,

    /// Unit price (e.g., "1.07")
    pub price: String,

    /// Units in stock
    #[serde(default)]
    pub quantity_in_stock: u32,

    /// Whether the product qualifies for the bulk discount
    #[serde(default)]
    pub wholesale_product: bool,
}

/// Wrapper for discount cards in YAML
#[derive(Debug, Deserialize)]
pub struct CardsFixture {
    /// Registered cards
    pub discount_cards: Vec<CardFixture>,
}

/// Discount Card Fixture
#[derive(Debug, Deserialize)]
pub struct CardFixture {
    /// Card number
    pub number: u32,

    /// Discount rate in percentage points (e.g., "3.00")
    pub amount: String,
}

/// Read every product from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an entry is invalid.
pub fn read_products<'a>(
    path: &Path,
    currency: &'a Currency,
) -> Result<Vec<Product<'a>>, LoaderError> {
    parse_products(&fs::read_to_string(path)?, currency)
}

/// Read every discount card from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a rate is invalid.
pub fn read_cards(path: &Path) -> Result<Vec<DiscountCard>, LoaderError> {
    parse_cards(&fs::read_to_string(path)?)
}

/// Parse products from a YAML document.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or an entry is invalid.
pub fn parse_products<'a>(
    contents: &str,
    currency: &'a Currency,
) -> Result<Vec<Product<'a>>, LoaderError> {
    let fixture: ProductsFixture = serde_norway::from_str(contents)?;

    fixture
        .products
        .into_iter()
        .map(|product| {
            product_from_fields(
                product.id,
                &product.description,
                &product.price,
                product.quantity_in_stock,
                product.wholesale_product,
                currency,
            )
        })
        .collect()
}

/// Parse discount cards from a YAML document.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or a rate is invalid.
pub fn parse_cards(contents: &str) -> Result<Vec<DiscountCard>, LoaderError> {
    let fixture: CardsFixture = serde_norway::from_str(contents)?;

    fixture
        .discount_cards
        .into_iter()
        .map(|card| card_from_fields(card.number, &card.amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::cards::CardNumber;

    use super::*;

    #[test]
    fn parse_products_reads_fixture() -> TestResult {
        let contents = r#"
products:
  - id: 1
    description: Milk
    price: "1.07"
    quantity_in_stock: 10
    wholesale_product: true
  - id: 2
    description: Chocolate Ritter sport 100g
    price: "1.10"
"#;

        let products = parse_products(contents, GBP)?;

        assert_eq!(products.len(), 2);
        assert_eq!(
            products.first().map(|p| (p.price.to_minor_units(), p.wholesale)),
            Some((107, true))
        );
        assert_eq!(
            products.get(1).map(|p| (p.quantity_in_stock, p.wholesale)),
            Some((0, false))
        );

        Ok(())
    }

    #[test]
    fn parse_products_rejects_missing_fields() {
        let contents = "products:\n  - id: 1\n    price: \"1.00\"\n";

        let result = parse_products(contents, GBP);

        assert!(matches!(result, Err(LoaderError::Yaml(_))));
    }

    #[test]
    fn parse_cards_reads_fixture() -> TestResult {
        let contents = r#"
discount_cards:
  - number: 1111
    amount: "3"
  - number: 4444
    amount: "4.5"
"#;

        let cards = parse_cards(contents)?;

        assert_eq!(cards.len(), 2);
        assert_eq!(
            cards.get(1).map(DiscountCard::number),
            Some(CardNumber::new(4444))
        );
        assert_eq!(
            cards.get(1).map(|card| card.rate().to_string()),
            Some("4.50".to_string())
        );

        Ok(())
    }
}
