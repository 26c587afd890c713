//! Antimicrobial resistance reporting CLI.

use std::io::{self, IsTerminal};

use amr_cli::logging::{LogConfig, LogFormat, init_logging};
use amr_core::antibiotic_legend;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use tracing::warn;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_tables, run_breakdown, run_distribution, run_duplicates, run_organism, run_report,
    run_tally,
};
use crate::summary::{
    print_breakdown, print_distribution, print_duplicates, print_findings, print_legend,
    print_organism, print_report, print_tally,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let reference = cli.reference.as_deref();
    let outcome = match &cli.command {
        Command::Report(args) => run_report(args, reference).map(|result| print_report(&result)),
        Command::Duplicates(args) => {
            run_duplicates(args, reference).map(|analysis| print_duplicates(&analysis))
        }
        Command::Organism(args) => {
            run_organism(args, reference).map(|result| print_organism(&result))
        }
        Command::Breakdown(args) => {
            run_breakdown(args, reference).map(|result| print_breakdown(&result))
        }
        Command::Tally(args) => run_tally(args, reference).map(|result| print_tally(&result)),
        Command::Distribution(args) => {
            run_distribution(args, reference).map(|result| print_distribution(&result))
        }
        Command::Legend => {
            load_tables(reference).map(|tables| print_legend(&antibiotic_legend(&tables)))
        }
        Command::CheckReference => load_tables(reference).map(|tables| {
            let findings = tables.check();
            for finding in &findings {
                warn!(kind = ?finding.kind, subject = %finding.subject, "{}", finding.message);
            }
            print_findings(&findings);
        }),
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
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
