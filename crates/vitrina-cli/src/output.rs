//! Output formatting and progress reporting

use crate::commands::ReportFormat;
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use vitrina::{Outcome, RunReport, TestResult, TestSuite};

/// Progress reporter for a suite run
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` cases
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// One line per finished case, printed above the bar
    pub fn result(&self, result: &TestResult) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
            pb.set_message(result.qualified_name());
        }
        if self.quiet && !result.outcome.is_failure() {
            return;
        }

        let mut line = format!(
            "{} {} ({:.2}s)",
            self.badge(result.outcome),
            result.qualified_name(),
            result.duration.as_secs_f64()
        );
        if let Some(ref reason) = result.error {
            line.push_str(&format!("\n      {reason}"));
        }
        if let Some(ref shot) = result.screenshot {
            line.push_str(&format!("\n      screenshot: {}", shot.display()));
        }
        self.write_line(&line);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        self.write_line("");
        self.write_line(&styled);
    }

    /// Totals line, always printed
    pub fn summary(&self, report: &RunReport) {
        let failed = report.failed_count();
        let errored = report.errored_count();
        let secs = report.duration.as_secs_f64();
        let bad = failed + errored > 0;

        self.write_line("");
        let counts = format!(
            "{} tests in {secs:.2}s ({} passed, {failed} failed, {errored} errored, {} skipped)",
            report.total(),
            report.passed_count(),
            report.skipped_count(),
        );
        if self.use_color {
            let status = if bad {
                Style::new().red().bold().apply_to("FAILED")
            } else {
                Style::new().green().bold().apply_to("PASSED")
            };
            self.write_line(&format!("{status} {counts}"));
        } else {
            let status = if bad { "FAILED" } else { "PASSED" };
            self.write_line(&format!("{status} {counts}"));
        }
    }

    fn badge(&self, outcome: Outcome) -> String {
        let label = outcome.to_string();
        if !self.use_color {
            return label;
        }
        let styled = match outcome {
            Outcome::Passed => style(label).green().bold(),
            Outcome::Failed | Outcome::Errored => style(label).red().bold(),
            Outcome::Skipped => style(label).yellow(),
        };
        styled.to_string()
    }

    fn write_line(&self, line: &str) {
        let write = || {
            let _ = self.term.write_line(line);
        };
        match self.progress_bar {
            Some(ref pb) => pb.suspend(write),
            None => write(),
        }
    }
}

/// Final report body for `format`
pub fn render_report(report: &RunReport, format: ReportFormat) -> vitrina::VitrinaResult<String> {
    match format {
        ReportFormat::Json => report.to_json(),
        ReportFormat::Text => {
            let mut out = String::new();
            for suite in &report.suites {
                out.push_str(&format!(
                    "{:<16} {:>3} passed {:>3} failed {:>3} errored {:>3} skipped\n",
                    suite.suite_name,
                    suite.passed_count(),
                    suite.failed_count(),
                    suite.errored_count(),
                    suite.skipped_count(),
                ));
            }
            Ok(out)
        }
    }
}

/// `list` output: one header per suite, one line per case
#[must_use]
pub fn render_listing(suites: &[(&TestSuite, Vec<&vitrina::TestCase>)]) -> String {
    let mut out = String::new();
    for (suite, cases) in suites {
        if cases.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({} tests)\n", suite.name, cases.len()));
        for case in cases {
            match case.skip {
                Some(reason) => out.push_str(&format!(
                    "  {}::{} [{}] (skipped: {reason})\n",
                    suite.name, case.name, case.marker
                )),
                None => out.push_str(&format!(
                    "  {}::{} [{}]\n",
                    suite.name, case.name, case.marker
                )),
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vitrina::{Marker, SuiteResults};

    fn result(name: &str, outcome: Outcome) -> TestResult {
        TestResult {
            name: name.to_string(),
            suite: "smoke".to_string(),
            marker: Marker::Smoke,
            outcome,
            error: outcome.is_failure().then(|| "boom".to_string()),
            duration: Duration::from_millis(120),
            screenshot: None,
            console_log: None,
        }
    }

    fn report() -> RunReport {
        RunReport {
            suites: vec![SuiteResults {
                suite_name: "smoke".to_string(),
                results: vec![
                    result("home_page_loads", Outcome::Passed),
                    result("navigation_works", Outcome::Failed),
                    result("admin_only", Outcome::Skipped),
                ],
                duration: Duration::from_secs(2),
            }],
            duration: Duration::from_secs(2),
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_plain_badges() {
            let reporter = ProgressReporter::new(false, false);
            assert_eq!(reporter.badge(Outcome::Passed), "PASS");
            assert_eq!(reporter.badge(Outcome::Errored), "ERROR");
        }

        #[test]
        fn test_progress_cycle() {
            let mut reporter = ProgressReporter::new(false, false);
            reporter.start_progress(3, "running");
            for r in &report().suites[0].results {
                reporter.result(r);
            }
            reporter.summary(&report());
            reporter.finish();
        }

        #[test]
        fn test_quiet_starts_no_bar() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(3, "running");
            assert!(reporter.progress_bar.is_none());
            reporter.result(&result("x", Outcome::Failed));
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_text_report_has_suite_row() {
            let text = render_report(&report(), ReportFormat::Text).unwrap();
            assert!(text.starts_with("smoke"));
            assert!(text.contains("1 failed"));
        }

        #[test]
        fn test_json_report_parses() {
            let json = render_report(&report(), ReportFormat::Json).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["suites"][0]["suite_name"], "smoke");
        }

        #[test]
        fn test_listing_marks_skips() {
            let suite = vitrina::suites::admin::suite();
            let cases: Vec<_> = suite.tests.iter().collect();
            let text = render_listing(&[(&suite, cases)]);
            assert!(text.starts_with("admin ("));
            assert!(text.contains("(skipped:"));
        }
    }
}
