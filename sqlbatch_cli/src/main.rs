#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use sqlbatch_core::args::ClientArgs;
use sqlbatch_core::client;
use sqlbatch_core::configuration::ConfigurationBuilder;
use sqlbatch_formatters::writers::{Output, StderrWriter, StdoutWriter};
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "sqlbatch",
    version,
    about = "Run SQL scripts against DuckDB or SQL Server",
    after_help = "Examples:\n  \
        sqlbatch --duckdb census.duckdb -Q \"SELECT * FROM people LIMIT 5\"\n  \
        sqlbatch --duckdb census.duckdb -i query.sql -o csv\n  \
        sqlbatch -S server -U sa -p secret -d census -i query.sql -o json\n  \
        sqlbatch -S server -T -Q \"SELECT @@VERSION\""
)]
pub(crate) struct Args {
    #[clap(flatten)]
    pub client_args: ClientArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let mut output = Output::new(Box::new(StdoutWriter));
    let mut diagnostics = Output::new(Box::new(StderrWriter));

    match execute(&args, &mut output, &mut diagnostics).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:?}");
            let _ = writeln!(diagnostics, "Error: {error}");
            ExitCode::FAILURE
        }
    }
}

pub(crate) async fn execute(
    args: &Args,
    output: &mut Output,
    diagnostics: &mut Output,
) -> Result<()> {
    let program_name = "sqlbatch";
    let version = env!("CARGO_PKG_VERSION");
    let configuration = ConfigurationBuilder::new(program_name, version)
        .with_config()?
        .build()?;

    info!("{program_name}/{version} initialized");
    let result = client::execute(&configuration, &args.client_args, output, diagnostics).await;
    info!("{program_name}/{version} completed");

    Ok(result?)
}
