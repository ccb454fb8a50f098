//! CLI argument parsing for breakout

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for assessments
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "breakout")]
#[command(version)]
#[command(about = "Flag benchmark regressions with E-Divisive with Medians change-point detection", long_about = None)]
pub struct Cli {
    /// History files, one sample per line (`-` reads stdin)
    #[arg(required = true, value_name = "HISTORY")]
    pub histories: Vec<PathBuf>,

    /// Minimum runs on each side of a change point (overrides config)
    #[arg(short = 'd', long = "delta", value_name = "RUNS")]
    pub delta: Option<usize>,

    /// Regression configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
