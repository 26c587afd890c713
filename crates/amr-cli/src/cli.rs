//! CLI argument definitions for the resistance reporter.

use std::path::PathBuf;

use amr_model::DEFAULT_WINDOW_DAYS;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "amr",
    version,
    about = "Antimicrobial resistance reporting - deduplicate isolates and build resistance matrices",
    long_about = "Deduplicate repeat isolates in a laboratory susceptibility export and\n\
                  aggregate resistance percentages per organism and antibiotic.\n\n\
                  Identifying columns are dropped on load and never reach the analysis."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow process identifiers in trace-level log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Reference tables file (default: $AMR_STANDARDS_DIR/reference.toml or the built-in tables).
    #[arg(long = "reference", value_name = "PATH", global = true)]
    pub reference: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deduplicate, aggregate and print the resistance matrix.
    Report(ReportArgs),

    /// Print every record of a flagged duplicate group.
    Duplicates(InputArgs),

    /// Susceptibility summary and class profile for one organism.
    Organism(OrganismArgs),

    /// Share of isolates per sex or age band.
    Breakdown(BreakdownArgs),

    /// Organism frequency and per-antibiotic result counts.
    Tally(TallyArgs),

    /// Distribution of result values per antibiotic for selected organisms.
    Distribution(DistributionArgs),

    /// List every antibiotic with its class.
    Legend,

    /// Inspect the reference tables for overlaps and gaps.
    CheckReference,
}

/// Input file, duplicate window and case selection shared by every analysis.
#[derive(Args)]
pub struct InputArgs {
    /// Laboratory export (CSV with a header row).
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Records with identical results at most this many days apart are one episode.
    #[arg(long = "window-days", value_name = "DAYS", default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Keep only organisms on the relevant-organism list.
    #[arg(long = "relevant-only")]
    pub relevant_only: bool,

    /// Keep only records with this sex value.
    #[arg(long = "sex", value_name = "VALUE")]
    pub sex: Option<String>,

    /// Keep only records in this age group.
    #[arg(long = "age-group", value_enum)]
    pub age_group: Option<AgeGroupArg>,

    /// Keep only records from this service.
    #[arg(long = "service", value_name = "NAME")]
    pub service: Option<String>,

    /// Keep only records of this specimen product.
    #[arg(long = "product", value_name = "NAME")]
    pub product: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep only records of this organism.
    #[arg(long = "organism", value_name = "NAME")]
    pub organism: Option<String>,

    /// Write kept.csv, duplicates.csv, matrix.csv and cells.json here.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct OrganismArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Organism name as written in the export.
    #[arg(value_name = "NAME")]
    pub organism: String,
}

#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long = "by", value_enum)]
    pub by: BreakdownArg,

    /// Restrict the breakdown to one organism.
    #[arg(long = "organism", value_name = "NAME")]
    pub organism: Option<String>,
}

#[derive(Args)]
pub struct TallyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Result to count per antibiotic.
    #[arg(long = "result", value_enum, default_value = "resistant")]
    pub result: ResultArg,

    /// Organism group to count.
    #[arg(long = "group", value_enum, default_value = "all")]
    pub group: GroupArg,

    /// Show only the N most frequent organisms.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Args)]
pub struct DistributionArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Organism to include; repeat for several (default: every organism).
    #[arg(long = "organism", value_name = "NAME")]
    pub organisms: Vec<String>,

    /// Antibiotic column to count; repeat for several.
    #[arg(long = "antibiotic", value_name = "NAME", required = true)]
    pub antibiotics: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BreakdownArg {
    Sex,
    Age,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResultArg {
    Resistant,
    Sensitive,
    IncreasedExposure,
    Intermediate,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GroupArg {
    All,
    GramPositive,
    GramNegative,
    Eskape,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AgeGroupArg {
    Paediatric,
    Adolescent,
    Adult,
    Elderly,
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
