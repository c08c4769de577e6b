use crate::error::Result;
use crate::formatter::FormatterOptions;
use crate::writers::Output;
use csv::QuoteStyle;
use sqlbatch_driver::{ResultSet, Value};

/// A formatter for comma separated values
#[derive(Debug, Default)]
pub struct Formatter;

impl crate::Formatter for Formatter {
    fn identifier(&self) -> &'static str {
        "csv"
    }

    fn format(
        &self,
        _options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
    ) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .quote_style(QuoteStyle::Necessary)
            .from_writer(output);

        writer.write_record(results.columns())?;
        for row in results.rows() {
            let record = row.iter().map(|value| match value {
                Value::Null => String::new(),
                _ => value.to_string(),
            });
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
