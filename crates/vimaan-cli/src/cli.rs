//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use vimaan_cli::commands::RoleOverrides;

#[derive(Parser)]
#[command(
    name = "vimaan",
    version,
    about = "Inspect place-name spreadsheets and find incomplete or duplicate records",
    long_about = "Inspect place-name spreadsheets before airport enrichment.\n\n\
                  Maps spreadsheet columns to the city, state, country and airport-code\n\
                  roles, then reports rows with missing fields and duplicate records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show columns, row count and the suggested role mapping.
    Inspect(FileArgs),

    /// Show suggested columns for each role with confidence scores.
    Suggest(FileArgs),

    /// Show one page of the spreadsheet.
    Preview(PreviewArgs),

    /// List rows where a mapped field is empty.
    Missing(DerivedArgs),

    /// List rows that share the same mapped place-name values.
    Duplicates(DerivedArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// Spreadsheet to read: CSV, or the first sheet of an .xlsx/.xls workbook.
    /// The first row is the header.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Page to show, starting at 1.
    #[arg(long = "page", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: u64,

    /// Rows per page (defaults to the configured page size).
    #[arg(long = "rows-per-page", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub rows_per_page: Option<u64>,
}

#[derive(Args)]
pub struct DerivedArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Column holding the city name.
    #[arg(long = "city", value_name = "COLUMN")]
    pub city: Option<String>,

    /// Column holding the state name.
    #[arg(long = "state", value_name = "COLUMN")]
    pub state: Option<String>,

    /// Column holding the country name.
    #[arg(long = "country", value_name = "COLUMN")]
    pub country: Option<String>,

    /// Column for the nearest airport IATA code.
    #[arg(long = "iata", value_name = "COLUMN")]
    pub iata: Option<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

impl DerivedArgs {
    pub fn overrides(&self) -> RoleOverrides {
        RoleOverrides {
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            airport_code: self.iata.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
