//! Vitrina CLI library
//!
//! Argument parsing, configuration layering, the run loop and terminal
//! output behind the `vitrina` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    BrowserArg, Cli, ColorArg, Commands, ConfigArgs, ConfigFlags, ListArgs, LogFormat,
    ReportFormat, RunArgs,
};
pub use config::{resolve_suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_listing, render_report, ProgressReporter};
pub use runner::{build_selection, check_report, list, show_config, SuiteRunner};
