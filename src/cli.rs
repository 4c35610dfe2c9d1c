//! CLI arguments for statline.

use clap::{Parser, ValueEnum};

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "statline",
    about = "Single-shot status line generator for minimal bar hosts",
    long_about = "Single-shot status line generator for minimal bar hosts.\n\n\
                  Samples network throughput, wireless link quality, CPU, battery, \
                  temperature and the clock, and prints one pipe-separated line on \
                  stdout. Intended to be re-invoked by the bar host on a timer, \
                  typically once per second.",
    version = "0.1.0"
)]
pub struct Args {
    /// Network interface to report throughput for, or the literal "version"
    pub interface: String,

    /// Log level (diagnostics go to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}
