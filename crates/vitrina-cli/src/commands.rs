//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitrina::{BrowserKind, ConfigOverrides};

/// Vitrina: page-object end-to-end suites for the portfolio web app
#[derive(Parser, Debug)]
#[command(name = "vitrina")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the end-to-end suites against a live deployment
    Run(RunArgs),

    /// List suites and their cases without starting a browser
    List(ListArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Settings shared by every command that resolves a configuration
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigFlags {
    /// YAML configuration file (lowest precedence, below the environment)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, conflicts_with = "headed")]
    pub headless: bool,

    /// Run the browser with a window
    #[arg(long)]
    pub headed: bool,

    /// Browser to drive (chrome, firefox)
    #[arg(long, value_name = "BROWSER")]
    pub browser: Option<BrowserArg>,

    /// Application root URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Where failure screenshots are written
    #[arg(long, value_name = "DIR")]
    pub screenshot_dir: Option<PathBuf>,

    /// Remote WebDriver endpoint
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,
}

impl ConfigFlags {
    /// Flags given on the command line, as the top configuration layer
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let headless = if self.headless {
            Some(true)
        } else if self.headed {
            Some(false)
        } else {
            None
        };
        ConfigOverrides {
            headless,
            browser: self.browser.map(Into::into),
            base_url: self.base_url.clone(),
            screenshot_dir: self.screenshot_dir.clone(),
            webdriver_url: self.webdriver_url.clone(),
        }
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite to run (repeatable; default: all)
    #[arg(short, long = "suite", value_name = "SUITE")]
    pub suites: Vec<String>,

    /// Only cases carrying this marker (smoke, critical, feature, edge_case)
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Only cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failing case
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: ConfigFlags,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only cases carrying this marker
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Only this suite (repeatable)
    #[arg(short, long = "suite", value_name = "SUITE")]
    pub suites: Vec<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: ConfigFlags,
}

/// Run report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Coloured lines and a summary
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Browser argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserArg {
    /// Chrome or Chromium
    Chrome,
    /// Firefox via geckodriver
    Firefox,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Self::Chrome,
            BrowserArg::Firefox => Self::Firefox,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_run_with_repeated_suites() {
            let cli = Cli::try_parse_from([
                "vitrina", "run", "--suite", "smoke", "-s", "blog", "--marker", "critical",
                "--fail-fast",
            ])
            .unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.suites, vec!["smoke", "blog"]);
            assert_eq!(args.marker.as_deref(), Some("critical"));
            assert!(args.fail_fast);
            assert_eq!(args.format, ReportFormat::Text);
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli =
                Cli::try_parse_from(["vitrina", "list", "-vv", "--color", "never"]).unwrap();
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.color, ColorArg::Never);
            assert_eq!(cli.log_format, LogFormat::Text);
        }

        #[test]
        fn test_headless_and_headed_conflict() {
            let parsed = Cli::try_parse_from(["vitrina", "run", "--headless", "--headed"]);
            assert!(parsed.is_err());
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["vitrina"]).is_err());
        }

        #[test]
        fn test_unknown_browser_rejected() {
            assert!(Cli::try_parse_from(["vitrina", "run", "--browser", "safari"]).is_err());
        }
    }

    mod override_tests {
        use super::*;

        #[test]
        fn test_no_flags_no_overrides() {
            assert_eq!(ConfigFlags::default().overrides(), ConfigOverrides::default());
        }

        #[test]
        fn test_headed_maps_to_false() {
            let flags = ConfigFlags {
                headed: true,
                ..ConfigFlags::default()
            };
            assert_eq!(flags.overrides().headless, Some(false));
        }

        #[test]
        fn test_values_carried_through() {
            let cli = Cli::try_parse_from([
                "vitrina",
                "config",
                "--browser",
                "firefox",
                "--base-url",
                "http://staging.test",
                "--screenshot-dir",
                "shots",
                "--headless",
            ])
            .unwrap();
            let Commands::Config(args) = cli.command else {
                panic!("expected config");
            };
            let overrides = args.settings.overrides();
            assert_eq!(overrides.browser, Some(BrowserKind::Firefox));
            assert_eq!(overrides.base_url.as_deref(), Some("http://staging.test"));
            assert_eq!(overrides.screenshot_dir, Some(PathBuf::from("shots")));
            assert_eq!(overrides.headless, Some(true));
            assert!(overrides.webdriver_url.is_none());
        }
    }
}
