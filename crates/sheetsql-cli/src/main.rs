//! SheetSQL CLI - query spreadsheets by column label from the terminal

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    ColumnsCommand, CountCommand, QueryCommand, SpreadsheetsCommand, WorksheetsCommand,
};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "SHEETSQL_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "SHEETSQL_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List spreadsheets visible to the access token
    Spreadsheets(SpreadsheetsCommand),
    /// List worksheets of a spreadsheet
    Worksheets(WorksheetsCommand),
    /// Show the column label to identifier mapping of a worksheet
    Columns(ColumnsCommand),
    /// Run a table query written against column labels
    Query(QueryCommand),
    /// Count the data rows of a worksheet
    Count(CountCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // If RUST_LOG is set, use it as-is; otherwise scope the level to our crates
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new(format!(
            "sheetsql={level},\
             sheetsql_http={level},\
             sheetsql_cli={level},\
             hyper=warn,\
             reqwest=warn,\
             rustls=warn",
            level = cli.log_level
        )),
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .with_target(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Spreadsheets(cmd) => cmd.execute(),
        Commands::Worksheets(cmd) => cmd.execute(),
        Commands::Columns(cmd) => cmd.execute(),
        Commands::Query(cmd) => cmd.execute(),
        Commands::Count(cmd) => cmd.execute(),
    }
}
