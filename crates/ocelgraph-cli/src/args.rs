//! Command-line argument definitions for the ocelgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, layout overrides and logging verbosity.

use clap::{Parser, ValueEnum};

use ocelgraph::config::{LayoutEngine, RankDirection};

/// Output formats the CLI can write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Render descriptors as pretty-printed JSON
    #[default]
    Json,
    /// Static SVG picture
    Svg,
}

/// Command-line arguments for the ocelgraph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the object graph summary (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout engine (basic, sugiyama); overrides the configuration file
    #[arg(long)]
    pub engine: Option<LayoutEngine>,

    /// Rank direction (LR, RL, TB, BT); overrides the configuration file
    #[arg(long)]
    pub rank_direction: Option<RankDirection>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
