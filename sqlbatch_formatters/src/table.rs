use crate::error::Result;
use crate::formatter::FormatterOptions;
use crate::writers::Output;
use num_format::Locale;
use sqlbatch_driver::ResultSet;
use std::io::Write;
use tabled::builder::Builder;
use tabled::settings::object::{Cell, Rows};
use tabled::settings::{Alignment, Style};

/// A formatter for ASCII tables
#[derive(Debug, Default)]
pub struct Formatter;

impl crate::Formatter for Formatter {
    fn identifier(&self) -> &'static str {
        "table"
    }

    fn format(
        &self,
        options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
    ) -> Result<()> {
        let locale = Locale::from_name(&options.locale).unwrap_or(Locale::en);
        let mut builder = Builder::default();
        builder.push_record(results.columns());

        let mut numeric_cells = Vec::new();
        for (row_index, row) in results.rows().iter().enumerate() {
            let mut record = Vec::with_capacity(row.len());
            for (column, value) in row.iter().enumerate() {
                if value.is_numeric() {
                    // first table row is the header
                    numeric_cells.push(Cell::new(row_index + 1, column));
                }
                record.push(value.to_formatted_string(&locale));
            }
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::ascii());
        table.modify(Rows::first(), Alignment::center());
        for cell in numeric_cells {
            table.modify(cell, Alignment::right());
        }

        writeln!(output, "{table}")?;
        Ok(())
    }
}
