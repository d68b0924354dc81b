//! Receipt

use std::{fmt::Write, io};

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cards::DiscountCard,
    pricing::{LineResult, PricedBasket, ReceiptTotals},
};

pub mod delimited;

/// Date format printed on receipts.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Time format printed on receipts.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// CSV serialisation error.
    #[error("Failed to write receipt CSV: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Final receipt for a priced basket.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    issued_at: DateTime,
    card: Option<DiscountCard>,
    priced: PricedBasket<'a>,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    #[must_use]
    pub fn new(issued_at: DateTime, card: Option<DiscountCard>, priced: PricedBasket<'a>) -> Self {
        Self {
            issued_at,
            card,
            priced,
        }
    }

    /// When the receipt was issued.
    pub fn issued_at(&self) -> DateTime {
        self.issued_at
    }

    /// The card applied to the basket, if one was presented.
    pub fn card(&self) -> Option<&DiscountCard> {
        self.card.as_ref()
    }

    /// Priced lines.
    pub fn lines(&self) -> &[LineResult<'a>] {
        self.priced.lines()
    }

    /// Receipt totals.
    pub fn totals(&self) -> &ReceiptTotals<'a> {
        self.priced.totals()
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'a Currency {
        self.priced.currency()
    }

    /// Issue date, e.g. `16.10.2026`.
    pub fn date(&self) -> String {
        self.issued_at.strftime(DATE_FORMAT).to_string()
    }

    /// Issue time, e.g. `14:30:05`.
    pub fn time(&self) -> String {
        self.issued_at.strftime(TIME_FORMAT).to_string()
    }

    /// Prints the receipt as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["QTY", "Description", "Price", "Discount", "Total", "Offer"]);

        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

        for (idx, line) in self.lines().iter().enumerate() {
            let row = idx + 1; // header is row 0
            let discounted = line.discount.to_minor_units() != 0;

            builder.push_record([
                line.quantity.to_string(),
                line.description.clone(),
                format!("{}", line.unit_price),
                if discounted {
                    format!("-{}", line.discount)
                } else {
                    String::new()
                },
                format!("{}", line.total),
                line.applied.to_string(),
            ]);

            if discounted {
                color_ops.push((row, 3, Color::FG_GREEN));
            }

            color_ops.push((row, 5, color_dark_grey()));
        }

        write_receipt_table(&mut out, builder, color_ops)?;
        write_receipt_summary(&mut out, self)?;

        Ok(())
    }
}

/// Amount with exactly two decimal digits and no currency symbol.
pub fn format_amount(money: Money<'_, Currency>) -> String {
    Decimal::new(money.to_minor_units(), 2).to_string()
}

/// Rate in percentage points with a trailing `%`.
pub fn format_rate(rate: Decimal) -> String {
    let mut rate = rate;
    rate.rescale(2);

    format!("{rate}%")
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(0..1), Alignment::right());
    table.modify(Columns::new(2..5), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}")?;

    Ok(())
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let totals = receipt.totals();

    let mut rows: SmallVec<[(String, String); 6]> = smallvec![
        (" Date:".to_string(), format!("{}  ", receipt.date())),
        (" Time:".to_string(), format!("{}  ", receipt.time())),
    ];

    if let Some(card) = receipt.card() {
        rows.push((
            " Discount card:".to_string(),
            format!("{} ({})  ", card.number(), format_rate(card.rate())),
        ));
    }

    rows.push((
        " Total price:".to_string(),
        format!("{}  ", totals.without_discount()),
    ));
    rows.push((
        " Total discount:".to_string(),
        format!("{}  ", totals.discount()),
    ));
    rows.push((
        " \x1b[1mTotal with discount:\x1b[0m".to_string(),
        format!("\x1b[1m{}\x1b[0m  ", totals.with_discount()),
    ));

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out)?;

    Ok(())
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )?;

    Ok(())
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        basket::LineItem,
        catalog::Catalog,
        pricing::price,
        products::{Product, ProductId},
    };

    use super::*;

    pub(super) fn test_receipt<'a>(
        catalog: &Catalog<'a>,
        card: Option<DiscountCard>,
    ) -> TestResult<Receipt<'a>> {
        let lines = [
            LineItem::new(ProductId::new(1), 4),
            LineItem::new(ProductId::new(2), 5),
        ];
        let priced = price(catalog, &lines, card.as_ref())?;

        Ok(Receipt::new(
            date(2026, 10, 16).at(14, 30, 5, 0),
            card,
            priced,
        ))
    }

    pub(super) fn test_catalog<'a>() -> TestResult<Catalog<'a>> {
        Ok(Catalog::with_products(
            [
                Product::new(1, "Milk", Money::from_minor(107, GBP), 10, true),
                Product::new(2, "Cream 400g", Money::from_minor(271, GBP), 20, true),
            ],
            GBP,
        )?)
    }

    #[test]
    fn date_and_time_use_receipt_formats() -> TestResult {
        let catalog = test_catalog()?;
        let receipt = test_receipt(&catalog, None)?;

        assert_eq!(receipt.date(), "16.10.2026");
        assert_eq!(receipt.time(), "14:30:05");

        Ok(())
    }

    #[test]
    fn format_amount_always_has_two_digits() {
        assert_eq!(format_amount(Money::from_minor(4500, GBP)), "45.00");
        assert_eq!(format_amount(Money::from_minor(7, GBP)), "0.07");
        assert_eq!(format_amount(Money::from_minor(0, GBP)), "0.00");
    }

    #[test]
    fn format_rate_pads_to_two_digits() {
        assert_eq!(format_rate(Decimal::new(3, 0)), "3.00%");
        assert_eq!(format_rate(Decimal::new(250, 2)), "2.50%");
    }

    #[test]
    fn write_to_renders_lines_and_totals() -> TestResult {
        let catalog = test_catalog()?;
        let card = DiscountCard::new(1111, Decimal::new(300, 2));
        let receipt = test_receipt(&catalog, Some(card))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Milk"));
        assert!(rendered.contains("Cream 400g"));
        assert!(rendered.contains("3.00% card discount"));
        assert!(rendered.contains("10.00% wholesale"));
        assert!(rendered.contains("1111 (3.00%)"));
        assert!(rendered.contains("16.10.2026"));

        Ok(())
    }

    #[test]
    fn write_to_omits_card_line_without_card() -> TestResult {
        let catalog = test_catalog()?;
        let receipt = test_receipt(&catalog, None)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(!rendered.contains("Discount card:"));
        assert!(rendered.contains("Total with discount:"));

        Ok(())
    }
}
