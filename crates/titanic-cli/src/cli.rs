//! CLI argument definitions for the passenger service.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use titanic_cli::config::StoreArgs;

#[derive(Parser)]
#[command(
    name = "titanic",
    version,
    about = "Titanic passenger dataset service",
    long_about = "Serve the Titanic passenger manifest over HTTP, or query it directly.\n\n\
                  Reads from a CSV file or a SQLite database; both backends answer\n\
                  the same queries with the same results."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for log collectors).
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
    /// Run the HTTP service.
    Serve(ServeArgs),

    /// Print every passenger.
    List(OutputArgs),

    /// Print one passenger by ID.
    Get {
        #[arg(value_name = "ID", allow_negative_numbers = true)]
        id: i64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print selected attributes of one passenger.
    Attributes {
        #[arg(value_name = "ID", allow_negative_numbers = true)]
        id: i64,

        /// Attribute names, e.g. `Name Age Fare`.
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the fare percentile histogram.
    Histogram(OutputArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
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
