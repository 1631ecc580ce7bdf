mod clause_args;

use clap::{Parser, Subcommand, ValueEnum};
pub use clause_args::{ClauseArgs, clauses_from_triples};
use std::path::PathBuf;

/// Decode, encode and edit ad-hoc filter queries such as {client="web",server=~"db.*"}
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Path to a TOML profile
    #[arg(short, long, env = "ADHOC_QUERY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a query into its clauses
    Decode {
        /// Query text, e.g. '{client="web"}'
        query: String,
    },
    /// Build a query from clauses
    Encode {
        /// A clause as three values: KEY OP VALUE (repeatable)
        #[arg(
            long = "clause",
            num_args = 3,
            value_names = ["KEY", "OP", "VALUE"],
            allow_hyphen_values = true
        )]
        clauses: Vec<String>,

        /// JSON array of clauses ('-' reads stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Append a clause to a query
    Add {
        query: String,
        #[command(flatten)]
        clause: ClauseArgs,
    },
    /// Remove the clause at INDEX (0-based) from a query
    Remove { query: String, index: usize },
    /// Replace the clause at INDEX (0-based) in a query
    Change {
        query: String,
        index: usize,
        #[command(flatten)]
        clause: ClauseArgs,
    },
    /// Print the label sets that satisfy a query
    Match {
        query: String,

        /// JSON-lines file with one label object per line ('-' or absent reads stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// List the metric series the service-graph filter reads tag keys from
    Series {
        /// Include the series used by the APM table
        #[arg(long)]
        apm_table: bool,
    },
    /// Generate a TOML profile from observed label sets
    GenerateConfig {
        /// JSON-lines file with one label object per line ('-' or absent reads stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Profile name written into the generated config
        #[arg(long, default_value = "generated")]
        profile_name: String,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
