//! CLI configuration and suite configuration layering

use crate::commands::ConfigFlags;
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use vitrina::SuiteConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and the summary only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// From the `-v` count and `-q` flag
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "vitrina=info,vitrina_cli=info",
            Self::Debug => "vitrina=debug,vitrina_cli=debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI presentation settings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Resolve the suite configuration: YAML file (or defaults), then the
/// environment from `lookup`, then command-line flags
pub fn resolve_suite_config<F>(flags: &ConfigFlags, lookup: F) -> CliResult<SuiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match flags.config {
        Some(ref path) => SuiteConfig::from_yaml_file(path).map_err(|e| {
            CliError::config(format!("cannot load {}: {e}", path.display()))
        })?,
        None => SuiteConfig::default(),
    };
    let config = base.with_env(lookup)?.with_overrides(&flags.overrides());
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use vitrina::BrowserKind;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(3, false), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(0, true), Verbosity::Quiet);
        }

        #[test]
        fn test_predicates() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
        }

        #[test]
        fn test_log_filter_widens_with_verbosity() {
            assert_eq!(Verbosity::Quiet.log_filter(), "error");
            assert!(Verbosity::Debug.log_filter().contains("debug"));
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }

        #[test]
        fn test_builder() {
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Quiet)
                .with_color(ColorChoice::Never);
            assert!(config.verbosity.is_quiet());
            assert_eq!(config.color, ColorChoice::Never);
        }
    }

    mod layering_tests {
        use super::*;

        #[test]
        fn test_defaults_without_layers() {
            let config = resolve_suite_config(&ConfigFlags::default(), env_of(&[])).unwrap();
            assert_eq!(config, SuiteConfig::default());
        }

        #[test]
        fn test_env_over_file_and_flags_over_env() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: http://from-file.test\nbrowser: firefox").unwrap();

            let flags = ConfigFlags {
                config: Some(file.path().to_path_buf()),
                headed: true,
                ..ConfigFlags::default()
            };
            let lookup = env_of(&[("BASE_URL", "http://from-env.test/"), ("HEADLESS", "true")]);
            let config = resolve_suite_config(&flags, lookup).unwrap();

            assert_eq!(config.base_url, "http://from-env.test");
            assert_eq!(config.browser, BrowserKind::Firefox);
            assert!(!config.headless);
        }

        #[test]
        fn test_missing_file_is_config_error() {
            let flags = ConfigFlags {
                config: Some("/nonexistent/vitrina.yaml".into()),
                ..ConfigFlags::default()
            };
            let err = resolve_suite_config(&flags, env_of(&[])).unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_bad_env_value_surfaces() {
            let err =
                resolve_suite_config(&ConfigFlags::default(), env_of(&[("BROWSER", "lynx")]))
                    .unwrap_err();
            assert!(err.to_string().contains("lynx"));
        }
    }
}
