//! CLI argument definitions for the `conform` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "conform",
    version,
    about = "Label event logs against declarative process rules",
    long_about = "Check the traces of an event log against declarative rules\n\
                  (cardinality, order, response, precedence, exclusiveness, time elapse),\n\
                  label every event with the first violation position and build\n\
                  prefix datasets for outcome prediction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Check, label and encode an event log.
    Label(LabelArgs),

    /// List the supported rule kinds.
    Rules,
}

#[derive(Parser)]
pub struct LabelArgs {
    /// Event log CSV with one row per event.
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Rule configuration (TOML).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Write the prefix-encoded log to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the labeled log (original columns plus rule columns) to this CSV file.
    #[arg(long = "labeled-output", value_name = "FILE")]
    pub labeled_output: Option<PathBuf>,

    /// Write per-rule outcomes as JSON to this file.
    #[arg(long = "summary-json", value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Evaluate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Only evaluate the rules and print their summaries; the log is not labeled.
    #[arg(long = "summary-only", conflicts_with_all = ["output", "labeled_output"])]
    pub summary_only: bool,

    #[command(flatten)]
    pub columns: ColumnArgs,

    #[command(flatten)]
    pub encoding: EncodingArgs,
}

/// Column name overrides for the `[schema]` section.
#[derive(Args)]
pub struct ColumnArgs {
    /// Case identifier column.
    #[arg(long = "case-column", value_name = "NAME")]
    pub case_column: Option<String>,

    /// Activity column.
    #[arg(long = "activity-column", value_name = "NAME")]
    pub activity_column: Option<String>,

    /// Timestamp column.
    #[arg(long = "timestamp-column", value_name = "NAME")]
    pub timestamp_column: Option<String>,
}

/// Overrides for the `[encoding]` section.
#[derive(Args)]
pub struct EncodingArgs {
    /// Skip prefix encoding and only label.
    #[arg(long = "no-encode")]
    pub no_encode: bool,

    /// Number of events removed before the outcome position.
    #[arg(long = "prefix-reduction", value_name = "N")]
    pub prefix_reduction: Option<usize>,

    /// Drop cases whose prefix is shorter than this.
    #[arg(long = "min-trace-length", value_name = "N")]
    pub min_trace_length: Option<usize>,

    /// Drop cases whose prefix is longer than this.
    #[arg(long = "max-trace-length", value_name = "N")]
    pub max_trace_length: Option<usize>,

    /// Compare the maximum length without adding the prefix reduction.
    #[arg(long = "strict-max-length")]
    pub strict_max_length: bool,

    /// Keep the composite outcome position next to the label.
    #[arg(long = "keep-y-pos")]
    pub keep_y_pos: bool,

    /// Keep rule flag/position columns and the event index and cutoff helpers.
    #[arg(long = "keep-helper-columns")]
    pub keep_helper_columns: bool,
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
