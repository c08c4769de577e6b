use crate::FormatterOptions;
use crate::error::Result;
use crate::writers::Output;
use colored::Colorize;
use num_format::{Locale, ToFormattedString};
use sqlbatch_driver::CommandOutcome;
use std::io::Write;

/// Display the footer of the result set.
/// This includes the number of rows returned and the elapsed time.
/// If the timing option is enabled, the elapsed time will be displayed.
/// The number of rows will be formatted based on the locale.
///
/// Example: "N,NNN,NNN rows (M.MMMs)"
///
/// # Errors
/// Returns an error if the output cannot be written
pub fn write_footer(options: &FormatterOptions, rows: u64, output: &mut Output) -> Result<()> {
    if !options.footer {
        return Ok(());
    }

    let label = if rows == 1 { "row" } else { "rows" };
    let rows = rows.to_formatted_string(&locale(options));
    write_line(options, &format!("{rows} {label}"), output)
}

/// Report the outcome of a command statement.
///
/// Example: "42 rows affected" or "Command executed" when the backend
/// does not report a count.
///
/// # Errors
/// Returns an error if the output cannot be written
pub fn write_outcome(
    options: &FormatterOptions,
    outcome: &CommandOutcome,
    output: &mut Output,
) -> Result<()> {
    let message = match outcome.rows_affected {
        Some(1) => "1 row affected".to_string(),
        Some(rows) => {
            let rows = rows.to_formatted_string(&locale(options));
            format!("{rows} rows affected")
        }
        None => "Command executed".to_string(),
    };
    write_line(options, &message, output)
}

fn locale(options: &FormatterOptions) -> Locale {
    Locale::from_name(&options.locale).unwrap_or(Locale::en)
}

fn write_line(options: &FormatterOptions, message: &str, output: &mut Output) -> Result<()> {
    if options.timer {
        let elapsed = format!("({:?})", options.elapsed);
        if options.color {
            writeln!(output, "{message} {}", elapsed.dimmed())?;
        } else {
            writeln!(output, "{message} {elapsed}")?;
        }
    } else {
        writeln!(output, "{message}")?;
    }

    output.flush()?;
    Ok(())
}
