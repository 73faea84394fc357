//! `vimaan` command-line entry point.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use vimaan_cli::commands::{DerivedKind, run_derived, run_inspect, run_preview, run_suggest};
use vimaan_cli::logging::{LogConfig, LogFormat, init_logging};
use vimaan_cli::render::{print_derived, print_inspect, print_preview, suggestion_table};
use vimaan_core::Settings;

mod cli;

use crate::cli::{Cli, Command, DerivedArgs, LogFormatArg, LogLevelArg, OutputFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path).context("load settings")?,
        None => Settings::default(),
    };
    match &cli.command {
        Command::Inspect(args) => {
            let report = run_inspect(&args.file, &settings)?;
            print_inspect(&report);
        }
        Command::Suggest(args) => {
            let result = run_suggest(&args.file, &settings)?;
            println!("{}", suggestion_table(&result));
            if !result.unmapped_columns.is_empty() {
                println!("Unmapped columns: {}", result.unmapped_columns.join(", "));
            }
        }
        Command::Preview(args) => {
            let page = usize::try_from(args.page).context("page number")?;
            let rows_per_page = args
                .rows_per_page
                .map(usize::try_from)
                .transpose()
                .context("rows per page")?;
            let report = run_preview(&args.input.file, &settings, page, rows_per_page)?;
            print_preview(&report);
        }
        Command::Missing(args) => derived(args, &settings, DerivedKind::Missing)?,
        Command::Duplicates(args) => derived(args, &settings, DerivedKind::Duplicates)?,
    }
    Ok(())
}

fn derived(args: &DerivedArgs, settings: &Settings, kind: DerivedKind) -> Result<()> {
    let report = run_derived(&args.input.file, settings, &args.overrides(), kind)?;
    match args.format {
        OutputFormatArg::Table => print_derived(&report),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
