use crate::error::Result;
use crate::formatter::FormatterOptions;
use crate::writers::Output;
use jiff::Zoned;
use rust_xlsxwriter::{Format, Workbook};
use sqlbatch_driver::{ResultSet, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A formatter that writes the row set to a new spreadsheet file and reports
/// the file name on the output.
#[derive(Debug, Default)]
pub struct Formatter;

impl crate::Formatter for Formatter {
    fn identifier(&self) -> &'static str {
        "excel"
    }

    fn format(
        &self,
        options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
    ) -> Result<()> {
        let path = file_path(&options.results_directory, &Zoned::now());
        write_workbook(results, &path)?;
        debug!("wrote {} rows to {}", results.len(), path.display());
        writeln!(output, "Saved to: {}", path.display())?;
        Ok(())
    }
}

/// `results_YYYYMMDD_HHMMSS.xlsx` in the directory; a numeric suffix is added
/// when a file with that name already exists.
fn file_path(directory: &Path, now: &Zoned) -> PathBuf {
    let stem = format!("results_{}", now.strftime("%Y%m%d_%H%M%S"));
    let mut path = directory.join(format!("{stem}.xlsx"));
    let mut suffix = 2;
    while path.exists() {
        path = directory.join(format!("{stem}_{suffix}.xlsx"));
        suffix += 1;
    }
    path
}

#[expect(clippy::cast_precision_loss)]
fn write_workbook(results: &ResultSet, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (column, name) in results.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, u16::try_from(column)?, name, &header_format)?;
    }

    for (index, row) in results.rows().iter().enumerate() {
        let row_number = u32::try_from(index + 1)?;
        for (column, value) in row.iter().enumerate() {
            let column = u16::try_from(column)?;
            match value {
                Value::Null => {}
                Value::Bool(value) => {
                    worksheet.write_boolean(row_number, column, *value)?;
                }
                Value::I64(value) => {
                    worksheet.write_number(row_number, column, *value as f64)?;
                }
                Value::F64(value) => {
                    worksheet.write_number(row_number, column, *value)?;
                }
                _ => {
                    worksheet.write_string(row_number, column, value.to_string())?;
                }
            }
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
