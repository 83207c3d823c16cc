//! Test harness for running suites of browser cases.
//!
//! A [`TestCase`] is a named body plus a [`Marker`] and an optional skip reason.
//! [`TestHarness`] runs the selected cases of each [`TestSuite`] one after the
//! other, each inside its own [`SessionFixture`], and collects [`TestResult`]s.

use crate::fixture::{CaseBody, SessionFixture};
use crate::result::{ErrorCategory, VitrinaError, VitrinaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

/// Build a [`TestCase`] from an `async fn(&BrowserSession) -> VitrinaResult<()>`
///
/// ```ignore
/// async fn home_loads(session: &BrowserSession) -> VitrinaResult<()> { ... }
/// let case = case!(home_loads).smoke();
/// ```
#[macro_export]
macro_rules! case {
    ($body:ident) => {
        $crate::harness::TestCase::new(stringify!($body), |session| Box::pin($body(session)))
    };
}

// =============================================================================
// MARKERS
// =============================================================================

/// Category tag used to select cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Critical-path check run on every change
    Smoke,
    /// Must-pass functionality
    Critical,
    /// Ordinary feature coverage
    #[default]
    Feature,
    /// Boundary and unusual inputs
    EdgeCase,
}

impl Marker {
    /// Every marker
    pub const ALL: [Self; 4] = [Self::Smoke, Self::Critical, Self::Feature, Self::EdgeCase];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Critical => "critical",
            Self::Feature => "feature",
            Self::EdgeCase => "edge_case",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marker {
    type Err = VitrinaError;

    fn from_str(s: &str) -> VitrinaResult<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| VitrinaError::config(format!("unknown marker '{s}'")))
    }
}

// =============================================================================
// CASES AND SUITES
// =============================================================================

/// A single test case
#[derive(Clone)]
pub struct TestCase {
    /// Test name
    pub name: &'static str,
    /// Selection marker
    pub marker: Marker,
    /// Reason the case is registered but never run
    pub skip: Option<&'static str>,
    /// The test body
    pub body: CaseBody,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("marker", &self.marker)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// Create a new test case with the default marker
    #[must_use]
    pub fn new(name: &'static str, body: CaseBody) -> Self {
        Self {
            name,
            marker: Marker::default(),
            skip: None,
            body,
        }
    }

    /// Set the marker
    #[must_use]
    pub const fn marked(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    #[must_use]
    pub const fn smoke(self) -> Self {
        self.marked(Marker::Smoke)
    }

    #[must_use]
    pub const fn critical(self) -> Self {
        self.marked(Marker::Critical)
    }

    #[must_use]
    pub const fn edge_case(self) -> Self {
        self.marked(Marker::EdgeCase)
    }

    /// Register the case as skipped
    #[must_use]
    pub const fn skipped(mut self, reason: &'static str) -> Self {
        self.skip = Some(reason);
        self
    }
}

/// A test suite containing multiple tests
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Builder form of [`add_test`](Self::add_test)
    #[must_use]
    pub fn with_test(mut self, test: TestCase) -> Self {
        self.add_test(test);
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Look a case up by name
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.tests.iter().find(|t| t.name == name)
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Which suites and cases a run includes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Suite names; empty means all
    pub suites: Vec<String>,
    /// Only cases with this marker
    pub marker: Option<Marker>,
    /// Only cases whose name contains this substring
    pub filter: Option<String>,
}

impl Selection {
    /// Select everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suites.push(suite.into());
        self
    }

    #[must_use]
    pub const fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn includes_suite(&self, name: &str) -> bool {
        self.suites.is_empty() || self.suites.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn includes_case(&self, case: &TestCase) -> bool {
        self.marker.map_or(true, |m| m == case.marker)
            && self
                .filter
                .as_deref()
                .map_or(true, |f| case.name.contains(f))
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// How a case ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Body returned `Ok`
    Passed,
    /// Lookup timeout or assertion failure
    Failed,
    /// Session setup or another non-test error
    Errored,
    /// Registered as skipped
    Skipped,
}

impl Outcome {
    /// Outcome for an error returned by a case
    #[must_use]
    pub const fn from_error(error: &VitrinaError) -> Self {
        match error.category() {
            ErrorCategory::Lookup | ErrorCategory::Assertion => Self::Failed,
            ErrorCategory::Setup | ErrorCategory::Other => Self::Errored,
        }
    }

    /// Failed or errored
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
            Self::Skipped => "SKIP",
        };
        f.write_str(label)
    }
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name
    pub name: String,
    /// Suite the test belongs to
    pub suite: String,
    /// Marker the test carries
    pub marker: Marker,
    /// How it ended
    pub outcome: Outcome,
    /// Error message, or the skip reason
    pub error: Option<String>,
    /// Test duration
    #[serde(with = "crate::config::duration_millis")]
    pub duration: Duration,
    /// Failure screenshot
    pub screenshot: Option<PathBuf>,
    /// Failure console log
    pub console_log: Option<PathBuf>,
}

impl TestResult {
    fn new(suite: &str, case: &TestCase, outcome: Outcome) -> Self {
        Self {
            name: case.name.to_string(),
            suite: suite.to_string(),
            marker: case.marker,
            outcome,
            error: None,
            duration: Duration::ZERO,
            screenshot: None,
            console_log: None,
        }
    }

    /// Whether test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    /// `suite::name`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

/// Results from running a test suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    #[serde(with = "crate::config::duration_millis")]
    pub duration: Duration,
}

impl SuiteResults {
    fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// No test failed or errored
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.iter().any(|r| r.outcome.is_failure())
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(Outcome::Passed)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(Outcome::Failed)
    }

    #[must_use]
    pub fn errored_count(&self) -> usize {
        self.count(Outcome::Errored)
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed and errored tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| r.outcome.is_failure()).collect()
    }

    /// Result for the named test
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-suite results, in run order
    pub suites: Vec<SuiteResults>,
    /// Wall time of the run
    #[serde(with = "crate::config::duration_millis")]
    pub duration: Duration,
}

impl RunReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(SuiteResults::all_passed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.suites.iter().map(SuiteResults::total).sum()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.suites.iter().map(SuiteResults::passed_count).sum()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.suites.iter().map(SuiteResults::failed_count).sum()
    }

    #[must_use]
    pub fn errored_count(&self) -> usize {
        self.suites.iter().map(SuiteResults::errored_count).sum()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.suites.iter().map(SuiteResults::skipped_count).sum()
    }

    /// Every failed or errored test across suites
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.suites.iter().flat_map(SuiteResults::failures).collect()
    }

    /// Results of the named suite
    #[must_use]
    pub fn suite(&self, name: &str) -> Option<&SuiteResults> {
        self.suites.iter().find(|s| s.suite_name == name)
    }

    /// Pretty JSON
    pub fn to_json(&self) -> VitrinaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Test harness for running suites
#[derive(Debug, Default)]
pub struct TestHarness {
    /// Whether to stop on first failure
    pub fail_fast: bool,
    /// Which suites and cases run
    pub selection: Selection,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Cases of `suite` this harness would run (skipped ones included)
    #[must_use]
    pub fn selected<'a>(&self, suite: &'a TestSuite) -> Vec<&'a TestCase> {
        if !self.selection.includes_suite(&suite.name) {
            return Vec::new();
        }
        suite
            .tests
            .iter()
            .filter(|t| self.selection.includes_case(t))
            .collect()
    }

    /// Run a test suite
    pub async fn run(&self, suite: &TestSuite, fixture: &SessionFixture<'_>) -> SuiteResults {
        self.run_with(suite, fixture, &mut |_| {}).await
    }

    /// Run a test suite, reporting each result as it lands
    pub async fn run_with(
        &self,
        suite: &TestSuite,
        fixture: &SessionFixture<'_>,
        on_result: &mut dyn FnMut(&TestResult),
    ) -> SuiteResults {
        let start = Instant::now();
        let mut results = Vec::new();

        for case in self.selected(suite) {
            let result = Self::run_case(&suite.name, case, fixture).await;
            on_result(&result);
            let stop = self.fail_fast && result.outcome.is_failure();
            results.push(result);
            if stop {
                info!(suite = %suite.name, "fail-fast: stopping after first failure");
                break;
            }
        }

        SuiteResults {
            suite_name: suite.name.clone(),
            results,
            duration: start.elapsed(),
        }
    }

    /// Run every selected suite in order
    pub async fn run_all(
        &self,
        suites: &[TestSuite],
        fixture: &SessionFixture<'_>,
        on_result: &mut dyn FnMut(&TestResult),
    ) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::default();

        for suite in suites.iter().filter(|s| self.selection.includes_suite(&s.name)) {
            let results = self.run_with(suite, fixture, on_result).await;
            let stop = self.fail_fast && !results.all_passed();
            report.suites.push(results);
            if stop {
                break;
            }
        }

        report.duration = start.elapsed();
        report
    }

    async fn run_case(suite: &str, case: &TestCase, fixture: &SessionFixture<'_>) -> TestResult {
        if let Some(reason) = case.skip {
            info!(suite, test = case.name, reason, "test skipped");
            let mut result = TestResult::new(suite, case, Outcome::Skipped);
            result.error = Some(reason.to_string());
            return result;
        }

        let name = format!("{suite}::{}", case.name);
        let outcome = fixture.run(&name, case.body).await;
        let mut result = TestResult::new(
            suite,
            case,
            outcome
                .result
                .as_ref()
                .map_or_else(Outcome::from_error, |_| Outcome::Passed),
        );
        result.error = outcome.result.err().map(|e| e.to_string());
        result.duration = outcome.duration;
        if let Some(artifacts) = outcome.artifacts {
            result.screenshot = artifacts.screenshot;
            result.console_log = artifacts.console_log;
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fixture::BrowserSession;
    use crate::locator::Locator;
    use crate::mock::{MockDriverFactory, MockElement, MockPage, MockSite};
    use crate::page::BasePage;
    use std::sync::Arc;

    async fn hero_visible(session: &BrowserSession) -> VitrinaResult<()> {
        let page = BasePage::new(session);
        page.navigate_to("/").await?;
        page.assert_visible(&Locator::test_id("hero-section")).await
    }

    async fn missing_widget(session: &BrowserSession) -> VitrinaResult<()> {
        let page = BasePage::new(session);
        page.navigate_to("/").await?;
        page.assert_visible(&Locator::test_id("no-such-widget")).await
    }

    async fn driver_breaks(_session: &BrowserSession) -> VitrinaResult<()> {
        Err(VitrinaError::driver("connection reset"))
    }

    fn suite() -> TestSuite {
        TestSuite::new("demo")
            .with_test(case!(hero_visible).smoke())
            .with_test(case!(missing_widget))
            .with_test(case!(driver_breaks).edge_case())
            .with_test(case!(hero_visible).skipped("not today"))
    }

    fn factory() -> MockDriverFactory {
        MockDriverFactory::new(MockSite::new().route(
            "/",
            MockPage::new("Home").element(MockElement::with_test_id("section", "hero-section")),
        ))
    }

    fn config(dir: &std::path::Path) -> Arc<SuiteConfig> {
        Arc::new(
            SuiteConfig::default()
                .with_base_url("http://app")
                .with_explicit_wait(Duration::from_millis(200))
                .with_poll_interval(Duration::from_millis(10))
                .with_screenshot_dir(dir),
        )
    }

    mod marker_tests {
        use super::*;

        #[test]
        fn test_parse_marker() {
            assert_eq!("smoke".parse::<Marker>().unwrap(), Marker::Smoke);
            assert_eq!("Edge-Case".parse::<Marker>().unwrap(), Marker::EdgeCase);
            assert!("slow".parse::<Marker>().is_err());
            assert_eq!(Marker::default(), Marker::Feature);
        }

        #[test]
        fn test_outcome_from_error() {
            assert_eq!(
                Outcome::from_error(&VitrinaError::assertion("x")),
                Outcome::Failed
            );
            assert_eq!(
                Outcome::from_error(&VitrinaError::setup("no chrome")),
                Outcome::Errored
            );
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_marker_and_filter() {
            let suite = suite();
            let harness = TestHarness::new().with_selection(Selection::all().with_marker(Marker::Smoke));
            let names: Vec<_> = harness.selected(&suite).iter().map(|c| c.name).collect();
            assert_eq!(names, vec!["hero_visible"]);

            let harness = TestHarness::new().with_selection(Selection::all().with_filter("widget"));
            assert_eq!(harness.selected(&suite).len(), 1);

            let harness = TestHarness::new().with_selection(Selection::all().with_suite("other"));
            assert!(harness.selected(&suite).is_empty());
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_outcomes_per_case() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let results = TestHarness::new().run(&suite(), &fixture).await;
            assert_eq!(results.total(), 4);
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.errored_count(), 1);
            assert_eq!(results.skipped_count(), 1);
            assert!(!results.all_passed());

            let failed = results.result("missing_widget").unwrap();
            assert!(failed.error.as_deref().unwrap().contains("no-such-widget"));
            assert!(failed.screenshot.as_ref().unwrap().exists());

            let skipped = &results.results[3];
            assert_eq!(skipped.error.as_deref(), Some("not today"));
            // skipped cases never open a session
            assert_eq!(factory.sessions().len(), 3);
        }

        #[tokio::test]
        async fn test_fail_fast_stops() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let results = TestHarness::new().with_fail_fast().run(&suite(), &fixture).await;
            assert_eq!(results.total(), 2);
            assert_eq!(results.failures().len(), 1);
        }

        #[tokio::test]
        async fn test_report_json() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let mut seen = Vec::new();
            let report = TestHarness::new()
                .run_all(&[suite()], &fixture, &mut |r| seen.push(r.qualified_name()))
                .await;
            assert_eq!(seen.len(), 4);
            assert_eq!(seen[0], "demo::hero_visible");

            let json = report.to_json().unwrap();
            let back: RunReport = serde_json::from_str(&json).unwrap();
            assert_eq!(back.total(), 4);
            assert_eq!(back.suite("demo").unwrap().skipped_count(), 1);
            assert!(json.contains("\"outcome\": \"errored\""));
        }
    }
}
