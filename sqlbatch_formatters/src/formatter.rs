use crate::error::{Error, Result};
use crate::footer::write_footer;
use crate::writers::Output;
use sqlbatch_driver::ResultSet;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Marker written in place of a row set that has no rows
pub const NO_ROWS: &str = "(0 rows)";

/// Supported output encodings
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Excel,
}

impl OutputFormat {
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Excel => "excel",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(format: &str) -> Result<Self> {
        match format {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "excel" => Ok(OutputFormat::Excel),
            _ => Err(Error::UnknownFormat {
                format: format.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Options for formatters
#[derive(Debug)]
pub struct FormatterOptions {
    pub color: bool,
    pub elapsed: Duration,
    pub footer: bool,
    pub locale: String,
    /// Directory that receives spreadsheet files
    pub results_directory: PathBuf,
    pub timer: bool,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        FormatterOptions {
            color: true,
            elapsed: Duration::default(),
            footer: true,
            locale: "en".to_string(),
            results_directory: PathBuf::from("."),
            timer: true,
        }
    }
}

pub trait Formatter: Debug + Send + Sync {
    fn identifier(&self) -> &'static str;

    /// Write a non-empty row set to the output.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written
    fn format(
        &self,
        options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
    ) -> Result<()>;
}

/// Manages available formatters
#[derive(Debug)]
pub struct FormatterManager {
    formats: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatterManager {
    /// Create a new instance of the `FormatterManager`
    #[must_use]
    pub fn new() -> Self {
        FormatterManager {
            formats: BTreeMap::new(),
        }
    }

    /// Add a new format to the list of available formatters
    fn add(&mut self, format: Box<dyn Formatter>) {
        let identifier = format.identifier();
        let _ = &self.formats.insert(identifier, format);
    }

    /// Get a formatter by name
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&dyn Formatter> {
        self.formats.get(identifier).map(AsRef::as_ref)
    }

    /// Render a row set in the requested format, followed by the row count
    /// summary on the diagnostics output. A row set without rows is reported
    /// with the [`NO_ROWS`] marker only. When the requested formatter is not
    /// part of this build, the plain listing is used instead.
    ///
    /// # Errors
    /// Returns an error if either output cannot be written
    pub fn render(
        &self,
        format: OutputFormat,
        options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
        diagnostics: &mut Output,
    ) -> Result<()> {
        if results.is_empty() {
            writeln!(output, "{NO_ROWS}")?;
            output.flush()?;
            return Ok(());
        }

        if let Some(formatter) = self.get(format.identifier()) {
            formatter.format(options, results, output)?;
        } else {
            let error = Error::UnavailableFormat {
                format: format.to_string(),
            };
            warn!("{error}; using plain output");
            writeln!(diagnostics, "Warning: {error}; using plain output")?;
            crate::plain::format(results, output)?;
        }
        output.flush()?;

        write_footer(options, results.len() as u64, diagnostics)
    }
}

/// Default implementation for the `FormatterManager`
impl Default for FormatterManager {
    fn default() -> Self {
        let mut formatter_manager = FormatterManager::new();

        formatter_manager.add(Box::new(crate::delimited::Formatter));
        #[cfg(feature = "excel")]
        formatter_manager.add(Box::new(crate::excel::Formatter));
        formatter_manager.add(Box::new(crate::json::Formatter));
        #[cfg(feature = "table")]
        formatter_manager.add(Box::new(crate::table::Formatter));

        formatter_manager
    }
}
