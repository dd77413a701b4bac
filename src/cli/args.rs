//! CLI argument definitions for `gradetally`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradetally::config::ConfigOverrides;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to
/// lowercase strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `scheme`, `reports_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute the grade breakdown for a scores file.
    ///
    /// Prints per-category scores, averages, weighted contributions, and the
    /// final grade. With `--target`, also solves for the average needed on
    /// remaining work to reach each target.
    Grade {
        /// Path to a TOML scores file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Grading scheme TOML file (defaults to config `scheme`, else the
        /// standard scheme)
        #[arg(long, value_name = "FILE")]
        scheme: Option<PathBuf>,

        /// Target final grades to solve for (e.g. --target 70 80 90)
        #[arg(short = 't', long = "target", value_name = "PERCENT", num_args = 1..)]
        targets: Vec<f64>,
    },
    /// Generate a grade report from a scores file.
    ///
    /// Creates a formatted report with the category breakdown, a color-coded
    /// final grade, and optional needed-grade targets.
    Report {
        /// Path to a TOML scores file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Output file path (optional; defaults to input name with format
        /// extension under config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Grading scheme TOML file (defaults to config `scheme`, else the
        /// standard scheme)
        #[arg(long, value_name = "FILE")]
        scheme: Option<PathBuf>,

        /// Target final grades to solve for (e.g. --target 70 80 90)
        #[arg(short = 't', long = "target", value_name = "PERCENT", num_args = 1..)]
        targets: Vec<f64>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradetally",
    about = "gradetally command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config grading scheme path
    #[arg(long = "config-scheme", value_name = "FILE")]
    pub config_scheme: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be
    /// applied to the loaded configuration. The short-form `--reports-dir`
    /// takes precedence over `--config-reports-dir` when both are provided.
    #[must_use]
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            scheme: self
                .config_scheme
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .or_else(|| {
                    self.config_reports_dir
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string())
                }),
        }
    }
}
