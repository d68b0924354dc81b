//! Semicolon-delimited data files.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, Trim};
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{cards::DiscountCard, products::Product};

use super::{LoaderError, card_from_fields, parse_wholesale, product_from_fields};

/// One row of `products.csv`.
#[derive(Debug, Deserialize)]
pub struct ProductRow {
    /// Product identifier
    pub id: u32,

    /// Product description
    pub description: String,

    /// Unit price, e.g. `1.07`
    pub price: String,

    /// Units in stock
    pub quantity_in_stock: u32,

    /// `true` for wholesale products, anything else otherwise
    #[serde(default)]
    pub wholesale_product: String,
}

/// One row of `discount_cards.csv`.
#[derive(Debug, Deserialize)]
pub struct CardRow {
    /// Card number
    pub number: u32,

    /// Discount rate in percentage points
    pub amount: String,
}

/// Read every product from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row is invalid.
pub fn read_products<'a>(
    path: &Path,
    currency: &'a Currency,
) -> Result<Vec<Product<'a>>, LoaderError> {
    parse_products(File::open(path)?, currency)
}

/// Read every discount card from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row is invalid.
pub fn read_cards(path: &Path) -> Result<Vec<DiscountCard>, LoaderError> {
    parse_cards(File::open(path)?)
}

/// Parse products from CSV text.
///
/// # Errors
///
/// Returns an error if a row cannot be deserialised or holds an invalid value.
pub fn parse_products<'a>(
    input: impl io::Read,
    currency: &'a Currency,
) -> Result<Vec<Product<'a>>, LoaderError> {
    reader(input)
        .deserialize::<ProductRow>()
        .map(|row| -> Result<Product<'a>, LoaderError> {
            let row = row?;

            product_from_fields(
                row.id,
                &row.description,
                &row.price,
                row.quantity_in_stock,
                parse_wholesale(&row.wholesale_product),
                currency,
            )
        })
        .collect()
}

/// Parse discount cards from CSV text.
///
/// # Errors
///
/// Returns an error if a row cannot be deserialised or holds an invalid rate.
pub fn parse_cards(input: impl io::Read) -> Result<Vec<DiscountCard>, LoaderError> {
    reader(input)
        .deserialize::<CardRow>()
        .map(|row| -> Result<DiscountCard, LoaderError> {
            let row = row?;

            card_from_fields(row.number, &row.amount)
        })
        .collect()
}

fn reader<R: io::Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b';')
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(input)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    const PRODUCTS: &str = "\
id;description;price;quantity_in_stock;wholesale_product
1;Milk;1.07;10;true
2;Cream 400g;2.71;20;TRUE
3; Yogurt 400g ;2.10;7;false
4;Packed potatoes 1kg;1.475;30;no
";

    const CARDS: &str = "\
number;amount
1111;3
2222;3.5
";

    #[test]
    fn parse_products_reads_every_row() -> TestResult {
        let products = parse_products(PRODUCTS.as_bytes(), GBP)?;

        assert_eq!(products.len(), 4);

        let ids: Vec<ProductId> = products.iter().map(|product| product.id).collect();

        assert_eq!(
            ids,
            vec![
                ProductId::new(1),
                ProductId::new(2),
                ProductId::new(3),
                ProductId::new(4)
            ]
        );

        Ok(())
    }

    #[test]
    fn parse_products_trims_and_normalises_fields() -> TestResult {
        let products = parse_products(PRODUCTS.as_bytes(), GBP)?;

        let wholesale: Vec<bool> = products.iter().map(|product| product.wholesale).collect();

        assert_eq!(wholesale, vec![true, true, false, false]);
        assert_eq!(
            products.get(2).map(|p| p.description.as_str()),
            Some("Yogurt 400g")
        );
        assert_eq!(products.get(3).map(|p| p.price.to_minor_units()), Some(148));

        Ok(())
    }

    #[test]
    fn parse_products_rejects_negative_price() {
        let input = "id;description;price;quantity_in_stock;wholesale_product\n\
                     1;Milk;-1.00;1;true\n";

        let result = parse_products(input.as_bytes(), GBP);

        assert!(matches!(result, Err(LoaderError::InvalidPrice(_))));
    }

    #[test]
    fn parse_products_rejects_malformed_row() {
        let input = "id;description;price;quantity_in_stock;wholesale_product\n\
                     x;Milk;1.00;1;true\n";

        let result = parse_products(input.as_bytes(), GBP);

        assert!(matches!(result, Err(LoaderError::Csv(_))));
    }

    #[test]
    fn parse_cards_reads_rates_at_scale_two() -> TestResult {
        let cards = parse_cards(CARDS.as_bytes())?;

        let rates: Vec<String> = cards.iter().map(|card| card.rate().to_string()).collect();

        assert_eq!(rates, vec!["3.00", "3.50"]);
        assert_eq!(
            cards.first().map(DiscountCard::rate),
            Some(Decimal::new(3, 0))
        );

        Ok(())
    }
}
