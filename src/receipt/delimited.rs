//! Semicolon-delimited receipt output.
//!
//! The document is a sequence of small CSV tables separated by blank lines: date and time,
//! the priced lines, the discount card (only when one was presented) and the totals.

use std::io;

use csv::{Terminator, WriterBuilder};

use super::{Receipt, ReceiptError, format_amount, format_rate};

const DATE_HEADER: [&str; 2] = ["Date", "Time"];
const LINES_HEADER: [&str; 5] = ["QTY", "DESCRIPTION", "PRICE", "DISCOUNT", "TOTAL"];
const CARD_HEADER: [&str; 2] = ["DISCOUNT CARD", "DISCOUNT PERCENTAGE"];
const TOTALS_HEADER: [&str; 3] = ["TOTAL PRICE", "TOTAL DISCOUNT", "TOTAL WITH DISCOUNT"];

impl Receipt<'_> {
    /// Write the receipt as semicolon-delimited text.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_csv(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        write_section(&mut out, &DATE_HEADER, [vec![self.date(), self.time()]])?;
        writeln!(out)?;

        write_section(
            &mut out,
            &LINES_HEADER,
            self.lines().iter().map(|line| {
                vec![
                    line.quantity.to_string(),
                    line.description.clone(),
                    format_amount(line.unit_price),
                    format_amount(line.discount),
                    format_amount(line.total),
                ]
            }),
        )?;
        writeln!(out)?;

        if let Some(card) = self.card() {
            write_section(
                &mut out,
                &CARD_HEADER,
                [vec![card.number().to_string(), format_rate(card.rate())]],
            )?;
            writeln!(out)?;
        }

        let totals = self.totals();

        write_section(
            &mut out,
            &TOTALS_HEADER,
            [vec![
                format_amount(totals.without_discount()),
                format_amount(totals.discount()),
                format_amount(totals.with_discount()),
            ]],
        )?;

        Ok(())
    }
}

fn write_section<W: io::Write>(
    out: &mut W,
    header: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<(), ReceiptError> {
    let mut csv = WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    csv.write_record(header)?;

    for row in rows {
        csv.write_record(&row)?;
    }

    csv.flush()?;

    Ok(())
}
