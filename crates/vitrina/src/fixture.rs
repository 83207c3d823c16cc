//! Per-test browser session fixture.
//!
//! ```text
//! ┌───────────────┐ create ┌────────────────┐  run   ┌───────────┐
//! │ DriverFactory │───────►│ BrowserSession │───────►│ test body │
//! └───────────────┘        └───────┬────────┘        └─────┬─────┘
//!                                  │                       │ Err
//!                                  │◄──────────────────────┘
//!                                  │ {name}_{timestamp}_FAILED.png
//!                                  │ {name}_{timestamp}_FAILED.console.log
//!                                  ▼
//!                                close (always)
//! ```
//!
//! Every test gets a fresh session that it owns exclusively. Setup failures abort
//! the test with [`VitrinaError::SessionSetup`]; they are never turned into skips.

use crate::config::SuiteConfig;
use crate::driver::{BrowserDriver, DriverFactory};
use crate::result::{ErrorCategory, VitrinaError, VitrinaResult};
use crate::wait::{WaitOptions, Waiter};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Future returned by a test body
pub type CaseFuture<'s> = Pin<Box<dyn Future<Output = VitrinaResult<()>> + 's>>;

/// A test body: borrows the session for the duration of the test
pub type CaseBody = for<'s> fn(&'s BrowserSession) -> CaseFuture<'s>;

/// Timestamp format shared by failure artifacts
const FAILURE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

// =============================================================================
// SESSION
// =============================================================================

/// One browser session plus the run configuration
pub struct BrowserSession {
    driver: Box<dyn BrowserDriver>,
    config: Arc<SuiteConfig>,
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("backend", &self.driver.backend())
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl BrowserSession {
    /// Wrap an already-started driver
    #[must_use]
    pub fn new(driver: Box<dyn BrowserDriver>, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    /// Start a session through `factory`
    ///
    /// Any failure is reported as a setup error.
    pub async fn open(factory: &dyn DriverFactory, config: Arc<SuiteConfig>) -> VitrinaResult<Self> {
        let driver = factory.create(&config).await.map_err(|e| {
            if e.category() == ErrorCategory::Setup {
                e
            } else {
                VitrinaError::setup(e)
            }
        })?;
        info!(backend = driver.backend(), viewport = %config.viewport, "session started");
        Ok(Self::new(driver, config))
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Shared handle to the run configuration
    #[must_use]
    pub fn shared_config(&self) -> Arc<SuiteConfig> {
        Arc::clone(&self.config)
    }

    /// Waiter using the configured explicit wait
    #[must_use]
    pub fn waiter(&self) -> Waiter<'_> {
        Waiter::new(self.driver(), WaitOptions::from_config(&self.config))
    }

    /// Save a full-page screenshot and the console log for a failed test
    pub async fn capture_failure(&self, test_name: &str) -> VitrinaResult<FailureArtifacts> {
        let dir = &self.config.screenshot_dir;
        std::fs::create_dir_all(dir)?;
        let stem = failure_file_stem(test_name, Local::now());

        let screenshot = match self.driver.screenshot().await {
            Ok(png) => {
                let path = dir.join(format!("{stem}.png"));
                std::fs::write(&path, png)?;
                warn!(test = test_name, path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(e) => {
                warn!(test = test_name, error = %e, "failure screenshot unavailable");
                None
            }
        };

        let console_log = match self.driver.console_logs().await {
            Ok(entries) if entries.is_empty() => None,
            Ok(entries) => {
                let mut text = String::new();
                for entry in &entries {
                    let _ = writeln!(text, "{entry}");
                }
                let path = dir.join(format!("{stem}.console.log"));
                std::fs::write(&path, text)?;
                Some(path)
            }
            Err(e) => {
                warn!(test = test_name, error = %e, "console log unavailable");
                None
            }
        };

        Ok(FailureArtifacts {
            screenshot,
            console_log,
        })
    }

    /// End the session
    pub async fn close(self) -> VitrinaResult<()> {
        self.driver.close().await?;
        info!("session closed");
        Ok(())
    }
}

/// Files written for a failed test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureArtifacts {
    /// `{test_name}_{timestamp}_FAILED.png`, unless the browser could not take one
    pub screenshot: Option<PathBuf>,
    /// Console entries, if any were captured
    pub console_log: Option<PathBuf>,
}

/// `{test_name}_{%Y%m%d_%H%M%S}_FAILED`, with the test name made file-safe
#[must_use]
pub fn failure_file_stem(test_name: &str, at: DateTime<Local>) -> String {
    let safe: String = test_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}_{}_FAILED", at.format(FAILURE_TIMESTAMP))
}

// =============================================================================
// FIXTURE
// =============================================================================

/// Result of one fixture-wrapped test
#[derive(Debug)]
pub struct FixtureOutcome {
    /// What the body (or setup) returned
    pub result: VitrinaResult<()>,
    /// Failure artifacts, when the body failed and capture succeeded
    pub artifacts: Option<FailureArtifacts>,
    /// Wall time including setup and teardown
    pub duration: std::time::Duration,
}

/// Scoped acquisition of a session around a test body
#[derive(Clone)]
pub struct SessionFixture<'f> {
    factory: &'f dyn DriverFactory,
    config: Arc<SuiteConfig>,
}

impl std::fmt::Debug for SessionFixture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFixture")
            .field("config", &self.config)
            .finish()
    }
}

impl<'f> SessionFixture<'f> {
    /// Fixture creating sessions through `factory`
    #[must_use]
    pub fn new(factory: &'f dyn DriverFactory, config: Arc<SuiteConfig>) -> Self {
        Self { factory, config }
    }

    /// Where failure artifacts go
    #[must_use]
    pub fn artifact_dir(&self) -> &Path {
        &self.config.screenshot_dir
    }

    /// Open a session, run `body`, capture artifacts on failure, close
    pub async fn run(&self, name: &str, body: CaseBody) -> FixtureOutcome {
        let start = Instant::now();
        info!(test = name, "test started");

        let session = match BrowserSession::open(self.factory, Arc::clone(&self.config)).await {
            Ok(session) => session,
            Err(e) => {
                warn!(test = name, error = %e, "session setup failed");
                return FixtureOutcome {
                    result: Err(e),
                    artifacts: None,
                    duration: start.elapsed(),
                };
            }
        };

        let result = body(&session).await;
        let artifacts = match &result {
            Ok(()) => None,
            Err(e) => {
                warn!(test = name, error = %e, "test failed");
                match session.capture_failure(name).await {
                    Ok(artifacts) => Some(artifacts),
                    Err(capture) => {
                        warn!(test = name, error = %capture, "failure capture failed");
                        None
                    }
                }
            }
        };

        if let Err(e) = session.close().await {
            warn!(test = name, error = %e, "session close failed");
        }

        info!(test = name, passed = result.is_ok(), "test finished");
        FixtureOutcome {
            result,
            artifacts,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::console::ConsoleEntry;
    use crate::mock::{MockDriverFactory, MockElement, MockPage, MockSite};
    use chrono::TimeZone;

    fn site() -> MockSite {
        MockSite::new().route(
            "/",
            MockPage::new("Home")
                .element(MockElement::with_test_id("main", "hero-section"))
                .console(ConsoleEntry::severe("boom")),
        )
    }

    fn config(dir: &Path) -> Arc<SuiteConfig> {
        Arc::new(
            SuiteConfig::default()
                .with_base_url("http://app")
                .with_screenshot_dir(dir),
        )
    }

    fn passing(session: &BrowserSession) -> CaseFuture<'_> {
        Box::pin(async move {
            session.driver().navigate("http://app/").await?;
            Ok(())
        })
    }

    fn failing(session: &BrowserSession) -> CaseFuture<'_> {
        Box::pin(async move {
            session.driver().navigate("http://app/").await?;
            Err(VitrinaError::assertion("hero title mismatch"))
        })
    }

    mod stem_tests {
        use super::*;

        #[test]
        fn test_failure_stem_format() {
            let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
            assert_eq!(
                failure_file_stem("home_page_loads", at),
                "home_page_loads_20240309_140507_FAILED"
            );
        }

        #[test]
        fn test_failure_stem_sanitizes() {
            let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            assert_eq!(
                failure_file_stem("smoke::home page/loads", at),
                "smoke__home_page_loads_20240101_000000_FAILED"
            );
        }
    }

    mod fixture_tests {
        use super::*;

        #[tokio::test]
        async fn test_passing_body_closes_without_artifacts() {
            let dir = tempfile::tempdir().unwrap();
            let factory = MockDriverFactory::new(site());
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let outcome = fixture.run("passes", passing).await;
            assert!(outcome.result.is_ok());
            assert!(outcome.artifacts.is_none());

            let sessions = factory.sessions();
            assert_eq!(sessions.len(), 1);
            assert!(sessions[0].is_closed());
            assert!(!sessions[0].was_called("screenshot"));
        }

        #[tokio::test]
        async fn test_failing_body_captures_then_closes() {
            let dir = tempfile::tempdir().unwrap();
            let factory = MockDriverFactory::new(site());
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let outcome = fixture.run("hero_title", failing).await;
            assert!(matches!(outcome.result, Err(VitrinaError::AssertionFailed { .. })));

            let artifacts = outcome.artifacts.unwrap();
            let screenshot = artifacts.screenshot.unwrap();
            let name = screenshot.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("hero_title_"));
            assert!(name.ends_with("_FAILED.png"));
            assert!(screenshot.exists());

            let log = std::fs::read_to_string(artifacts.console_log.unwrap()).unwrap();
            assert!(log.contains("boom"));

            let session = &factory.sessions()[0];
            assert!(session.is_closed());
            let calls = session.call_history();
            let shot = calls.iter().position(|c| c == "screenshot").unwrap();
            let close = calls.iter().position(|c| c == "close").unwrap();
            assert!(shot < close);
        }

        #[tokio::test]
        async fn test_console_log_kept_when_screenshot_fails() {
            let dir = tempfile::tempdir().unwrap();
            let factory = MockDriverFactory::new(site().failing("screenshot"));
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let outcome = fixture.run("hero_title", failing).await;
            assert!(matches!(outcome.result, Err(VitrinaError::AssertionFailed { .. })));

            let artifacts = outcome.artifacts.unwrap();
            assert!(artifacts.screenshot.is_none());
            let log_path = artifacts.console_log.unwrap();
            let name = log_path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.ends_with("_FAILED.console.log"));
            assert!(std::fs::read_to_string(log_path).unwrap().contains("boom"));
            assert!(factory.sessions()[0].is_closed());
        }

        #[tokio::test]
        async fn test_setup_failure_is_setup_error() {
            let dir = tempfile::tempdir().unwrap();
            let factory = MockDriverFactory::unavailable("chromedriver not found");
            let fixture = SessionFixture::new(&factory, config(dir.path()));

            let outcome = fixture.run("never_runs", passing).await;
            let err = outcome.result.unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Setup);
            assert!(outcome.artifacts.is_none());
        }

        #[tokio::test]
        async fn test_session_waiter_uses_config() {
            let factory = MockDriverFactory::new(site());
            let config = Arc::new(SuiteConfig::default());
            let session = BrowserSession::open(&factory, config).await.unwrap();
            assert_eq!(session.waiter().options().timeout_ms, 15_000);
            session.close().await.unwrap();
        }
    }
}
