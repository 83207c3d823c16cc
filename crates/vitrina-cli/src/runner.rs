//! Command execution: selection, the live run, listing and config display

use crate::commands::{ConfigArgs, ListArgs, ReportFormat, RunArgs};
use crate::config::{resolve_suite_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::{render_listing, render_report, ProgressReporter};
use std::sync::Arc;
use tracing::{debug, info};
use vitrina::{
    DriverFactory, Marker, RunReport, Selection, SessionFixture, SuiteConfig, TestHarness,
    TestSuite,
};

/// Build the case selection, rejecting unknown suites and markers
pub fn build_selection(
    suites: &[String],
    marker: Option<&str>,
    filter: Option<&str>,
) -> CliResult<Selection> {
    let known = vitrina::suites::names();
    let mut selection = Selection::all();
    for name in suites {
        if !known.iter().any(|k| k == name) {
            return Err(CliError::invalid_argument(format!(
                "unknown suite '{name}' (available: {})",
                known.join(", ")
            )));
        }
        selection = selection.with_suite(name.clone());
    }
    if let Some(marker) = marker {
        selection = selection.with_marker(marker.parse::<Marker>()?);
    }
    if let Some(filter) = filter {
        selection = selection.with_filter(filter);
    }
    Ok(selection)
}

/// Runs suites against a live deployment and reports as it goes
#[derive(Debug)]
pub struct SuiteRunner {
    cli: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub fn new(cli: CliConfig) -> Self {
        let reporter = ProgressReporter::new(cli.color.should_color(), cli.verbosity.is_quiet());
        Self { cli, reporter }
    }

    /// Run the selected suites with sessions from `factory`
    pub async fn run(
        &mut self,
        args: &RunArgs,
        config: SuiteConfig,
        factory: &dyn DriverFactory,
    ) -> CliResult<RunReport> {
        let selection = build_selection(&args.suites, args.marker.as_deref(), args.filter.as_deref())?;
        let mut harness = TestHarness::new().with_selection(selection);
        if args.fail_fast {
            harness = harness.with_fail_fast();
        }

        let registry = vitrina::suites::registry();
        let total: usize = registry.iter().map(|s| harness.selected(s).len()).sum();
        if total == 0 {
            return Err(CliError::invalid_argument("selection matches no tests"));
        }

        let text = args.format == ReportFormat::Text;
        if text {
            self.reporter.header("Vitrina end-to-end run");
            for line in config.summary_lines() {
                self.reporter.info(&line);
            }
            self.reporter.start_progress(total as u64, "starting");
        }
        info!(tests = total, base_url = %config.base_url, "run starting");

        let fixture = SessionFixture::new(factory, Arc::new(config));
        let reporter = &self.reporter;
        let report = harness
            .run_all(&registry, &fixture, &mut |result: &vitrina::TestResult| {
                debug!(test = %result.qualified_name(), outcome = %result.outcome, "case finished");
                if text {
                    reporter.result(result);
                }
            })
            .await;
        reporter.finish();

        if let Some(ref path) = args.output {
            std::fs::write(path, report.to_json()?)?;
            info!(path = %path.display(), "report written");
        }

        match args.format {
            ReportFormat::Json => println!("{}", render_report(&report, ReportFormat::Json)?),
            ReportFormat::Text => {
                if self.cli.verbosity.is_verbose() {
                    print!("{}", render_report(&report, ReportFormat::Text)?);
                }
                self.reporter.summary(&report);
            }
        }
        Ok(report)
    }
}

/// Non-zero exit for failed or errored cases
pub fn check_report(report: &RunReport) -> CliResult<()> {
    if report.all_passed() {
        return Ok(());
    }
    Err(CliError::test_execution(format!(
        "{} failed, {} errored",
        report.failed_count(),
        report.errored_count()
    )))
}

/// `list`: registered suites and cases, filtered like a run would be
pub fn list(args: &ListArgs) -> CliResult<String> {
    let selection = build_selection(&args.suites, args.marker.as_deref(), None)?;
    let harness = TestHarness::new().with_selection(selection);
    let registry: Vec<TestSuite> = vitrina::suites::registry();
    let listing: Vec<_> = registry.iter().map(|s| (s, harness.selected(s))).collect();
    Ok(render_listing(&listing))
}

/// `config`: the resolved configuration as text or JSON
pub fn show_config<F>(args: &ConfigArgs, lookup: F) -> CliResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let config = resolve_suite_config(&args.settings, lookup)?;
    if args.json {
        return serde_json::to_string_pretty(&config)
            .map_err(|e| CliError::config(format!("cannot serialize config: {e}")));
    }
    let mut out = config.summary_lines().join("\n");
    out.push('\n');
    out.push_str(&format!("WebDriver: {}\n", config.effective_webdriver_url()));
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands, ConfigFlags};
    use clap::Parser;
    use vitrina::{MockDriverFactory, Outcome};

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["vitrina", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_empty_selection_is_everything() {
            let selection = build_selection(&[], None, None).unwrap();
            assert_eq!(selection, Selection::all());
        }

        #[test]
        fn test_unknown_suite_rejected() {
            let err = build_selection(&["nope".to_string()], None, None).unwrap_err();
            assert!(matches!(err, CliError::InvalidArgument { .. }));
            assert!(err.to_string().contains("smoke"));
        }

        #[test]
        fn test_marker_parsed() {
            let selection = build_selection(&[], Some("Edge-Case"), None).unwrap();
            assert_eq!(selection.marker, Some(Marker::EdgeCase));
            assert!(build_selection(&[], Some("slow"), None).is_err());
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_unavailable_browser_errors_smoke_cases() {
            let dir = tempfile::tempdir().unwrap();
            let report_path = dir.path().join("report.json");
            let args = run_args(&[
                "--suite",
                "smoke",
                "--format",
                "json",
                "--output",
                report_path.to_str().unwrap(),
            ]);
            let config = SuiteConfig::default().with_screenshot_dir(dir.path());
            let factory = MockDriverFactory::unavailable("chromium not installed");

            let mut runner = SuiteRunner::new(CliConfig::new());
            let report = runner.run(&args, config, &factory).await.unwrap();

            assert!(report.total() > 0);
            assert!(report.suites[0]
                .results
                .iter()
                .all(|r| r.outcome == Outcome::Errored));
            assert!(check_report(&report).is_err());
            let written: RunReport =
                serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
            assert_eq!(written.total(), report.total());
        }

        #[tokio::test]
        async fn test_filter_matching_nothing_is_rejected() {
            let args = run_args(&["--filter", "no_case_has_this_name"]);
            let factory = MockDriverFactory::unavailable("chromium not installed");
            let mut runner = SuiteRunner::new(CliConfig::new());
            let err = runner
                .run(&args, SuiteConfig::default(), &factory)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("matches no tests"));
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_list_marker_filters_cases() {
            let text = list(&ListArgs {
                marker: Some("smoke".to_string()),
                suites: Vec::new(),
            })
            .unwrap();
            assert!(text.contains("smoke ("));
            assert!(text.lines().skip(1).all(|l| !l.starts_with("  ") || l.contains("[smoke]")));
        }

        #[test]
        fn test_config_text_and_json() {
            let args = ConfigArgs {
                json: false,
                settings: ConfigFlags {
                    base_url: Some("http://flag.test".to_string()),
                    ..ConfigFlags::default()
                },
            };
            let text = show_config(&args, |_| None).unwrap();
            assert!(text.contains("Base URL: http://flag.test"));
            assert!(text.contains("WebDriver: http://localhost:9515"));

            let json = show_config(&ConfigArgs { json: true, ..args }, |_| None).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["base_url"], "http://flag.test");
        }
    }
}
