//! Wait strategies
//!
//! Every page-object interaction goes through one of these predicate waits. A
//! wait probes the live browser, sleeps one poll interval, and probes again until
//! the predicate holds or the budget is spent. There are no fixed sleeps.
//!
//! Element-shaped waits time out with [`VitrinaError::ElementNotFound`]; every
//! other wait times out with [`VitrinaError::Timeout`]. If every probe in the
//! window failed with a driver error, that error is returned instead, so a broken
//! session is not reported as a missing element.

use crate::config::{SuiteConfig, DEFAULT_EXPLICIT_WAIT_SECS, DEFAULT_POLL_INTERVAL_MS};
use crate::driver::{BrowserDriver, ElementRef, ElementSnapshot};
use crate::locator::Locator;
use crate::result::{VitrinaError, VitrinaResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Budget and cadence of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_EXPLICIT_WAIT_SECS * 1_000,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit wait and poll interval from the suite config
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            timeout_ms: millis(config.explicit_wait),
            poll_interval_ms: millis(config.poll_interval).max(1),
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds (at least 1)
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = if poll_interval_ms == 0 { 1 } else { poll_interval_ms };
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// =============================================================================
// FOUND ELEMENT
// =============================================================================

/// An element a wait settled on
#[derive(Debug, Clone, PartialEq)]
pub struct FoundElement {
    /// Address for follow-up commands
    pub target: ElementRef,
    /// State when the wait was satisfied
    pub snapshot: ElementSnapshot,
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Polls a driver until a condition holds
#[derive(Clone, Copy)]
pub struct Waiter<'d> {
    driver: &'d dyn BrowserDriver,
    options: WaitOptions,
}

impl std::fmt::Debug for Waiter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waiter")
            .field("backend", &self.driver.backend())
            .field("options", &self.options)
            .finish()
    }
}

impl<'d> Waiter<'d> {
    /// Waiter over `driver`
    #[must_use]
    pub const fn new(driver: &'d dyn BrowserDriver, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Same driver, different timeout
    #[must_use]
    pub const fn with_timeout(self, timeout_ms: u64) -> Self {
        Self {
            driver: self.driver,
            options: self.options.with_timeout(timeout_ms),
        }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    /// Wait for a custom condition; `probe` returns `Some` once satisfied
    pub async fn until<T, F, Fut>(&self, waited_for: &str, probe: F) -> VitrinaResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = VitrinaResult<Option<T>>>,
    {
        let ms = self.options.timeout_ms;
        self.poll(waited_for, probe, || VitrinaError::Timeout {
            waited_for: waited_for.to_string(),
            ms,
        })
        .await
    }

    async fn poll<T, F, Fut, E>(&self, waited_for: &str, mut probe: F, on_timeout: E) -> VitrinaResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = VitrinaResult<Option<T>>>,
        E: FnOnce() -> VitrinaError,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let mut last_error = None;
        loop {
            match probe().await {
                Ok(Some(value)) => {
                    debug!(waited_for, elapsed_ms = start.elapsed().as_millis() as u64, "wait satisfied");
                    return Ok(value);
                }
                Ok(None) => last_error = None,
                Err(e) => last_error = Some(e),
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                debug!(waited_for, timeout_ms = self.options.timeout_ms, "wait timed out");
                return Err(last_error.unwrap_or_else(on_timeout));
            }
            tokio::time::sleep(self.options.poll_interval().min(timeout - elapsed)).await;
        }
    }

    /// Poll the first match of `locator` until `accept` holds
    async fn element_where<P>(&self, locator: &Locator, what: &str, accept: P) -> VitrinaResult<FoundElement>
    where
        P: Fn(&ElementSnapshot) -> bool,
    {
        let css = &locator.to_css();
        let accept = &accept;
        let driver = self.driver;
        let ms = self.options.timeout_ms;
        self.poll(
            &format!("{locator} {what}"),
            move || async move {
                let mut matches = driver.query(css).await?;
                if matches.is_empty() {
                    return Ok(None);
                }
                let first = matches.swap_remove(0);
                Ok(accept(&first).then(|| FoundElement {
                    target: ElementRef::first(css.clone()),
                    snapshot: first,
                }))
            },
            || VitrinaError::ElementNotFound {
                locator: locator.to_string(),
                timeout_ms: ms,
            },
        )
        .await
    }

    /// Element is in the DOM
    pub async fn present(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.element_where(locator, "present", |_| true).await
    }

    /// At least one match is in the DOM; returns all matches
    pub async fn all_present(&self, locator: &Locator) -> VitrinaResult<Vec<ElementSnapshot>> {
        let css = &locator.to_css();
        let driver = self.driver;
        let ms = self.options.timeout_ms;
        self.poll(
            &format!("{locator} all present"),
            move || async move {
                let matches = driver.query(css).await?;
                Ok((!matches.is_empty()).then_some(matches))
            },
            || VitrinaError::ElementNotFound {
                locator: locator.to_string(),
                timeout_ms: ms,
            },
        )
        .await
    }

    /// Element is rendered
    pub async fn visible(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.element_where(locator, "visible", |s| s.visible).await
    }

    /// Element is visible and enabled
    pub async fn clickable(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.element_where(locator, "clickable", ElementSnapshot::is_clickable)
            .await
    }

    /// Element is absent or hidden
    pub async fn invisible(&self, locator: &Locator) -> VitrinaResult<()> {
        let css = &locator.to_css();
        let driver = self.driver;
        self.until(&format!("{locator} to disappear"), move || async move {
            let matches = driver.query(css).await?;
            Ok(matches.first().map_or(true, |s| !s.visible).then_some(()))
        })
        .await
    }

    /// Element text contains `text`
    pub async fn text_contains(&self, locator: &Locator, text: &str) -> VitrinaResult<FoundElement> {
        self.element_where(locator, &format!("text contains '{text}'"), |s| {
            s.text.contains(text)
        })
        .await
    }

    /// Current URL contains `fragment`
    pub async fn url_contains(&self, fragment: &str) -> VitrinaResult<String> {
        let driver = self.driver;
        self.until(&format!("url containing '{fragment}'"), move || async move {
            let url = driver.current_url().await?;
            Ok(url.contains(fragment).then_some(url))
        })
        .await
    }

    /// Current URL differs from `previous`
    pub async fn url_changes(&self, previous: &str) -> VitrinaResult<String> {
        let driver = self.driver;
        self.until(&format!("url to change from '{previous}'"), move || async move {
            let url = driver.current_url().await?;
            Ok((url != previous).then_some(url))
        })
        .await
    }

    /// Element is visible with opacity 1 (entrance animation finished)
    pub async fn opacity_settled(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.element_where(locator, "opacity settled", |s| s.visible && s.is_opaque())
            .await
    }

    /// `document.readyState` is `complete`
    pub async fn ready_state_complete(&self) -> VitrinaResult<()> {
        let driver = self.driver;
        self.until("document ready state complete", move || async move {
            let state = driver.ready_state().await?;
            Ok((state == "complete").then_some(()))
        })
        .await
    }

    /// Client-side hydration finished
    pub async fn hydrated(&self) -> VitrinaResult<()> {
        self.ready_state_complete().await
    }

    /// Client-side route reached and its content rendered
    pub async fn route_and_content(&self, fragment: &str, content: &Locator) -> VitrinaResult<FoundElement> {
        self.url_contains(fragment).await?;
        self.present(content).await
    }

    /// Hydration finished, then element clickable
    pub async fn clickable_after_hydration(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.hydrated().await?;
        self.clickable(locator).await
    }

    /// Loading indicator gone, then result indicator present
    pub async fn api_response(&self, loading: &Locator, result: &Locator) -> VitrinaResult<FoundElement> {
        self.invisible(loading).await?;
        self.present(result).await
    }

    /// Code-split component mounted
    pub async fn component_loaded(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.present(locator).await
    }

    /// Validation message shown
    pub async fn validation_error(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.visible(locator).await
    }

    /// Optional spinner gone, then response visible
    pub async fn form_response(
        &self,
        spinner: Option<&Locator>,
        response: &Locator,
    ) -> VitrinaResult<FoundElement> {
        if let Some(spinner) = spinner {
            self.invisible(spinner).await?;
        }
        self.visible(response).await
    }

    /// Scroll-triggered reveal: present, scrolled to, then visible
    pub async fn scroll_reveal(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        let found = self.present(locator).await?;
        self.driver.scroll_into_view(&found.target).await?;
        self.visible(locator).await
    }

    /// Image finished loading with a non-zero natural height
    pub async fn image_loaded(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.element_where(locator, "image loaded", |s| s.image_loaded)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use crate::mock::{MockDriver, MockElement, MockPage, MockSite};
    use std::sync::Arc;

    const FAST: WaitOptions = WaitOptions {
        timeout_ms: 300,
        poll_interval_ms: 10,
    };

    fn site() -> MockSite {
        MockSite::new()
            .route(
                "/",
                MockPage::new("Home").elements([
                    MockElement::with_test_id("h1", "hero-title").text("Hello"),
                    MockElement::with_test_id("div", "late").appear_after(Duration::from_millis(60)),
                    MockElement::with_test_id("div", "reveal")
                        .reveal_after(Duration::from_millis(60)),
                    MockElement::with_test_id("div", "fade").fade_in(Duration::from_millis(60)),
                    MockElement::with_test_id("button", "off").disabled(),
                    MockElement::with_test_id("div", "spinner").hidden(),
                    MockElement::with_test_id("img", "broken").broken_image(),
                    MockElement::with_test_id("img", "photo"),
                    MockElement::with_test_id("a", "go").href("/next"),
                ]),
            )
            .route(
                "/next",
                MockPage::new("Next").element(MockElement::with_test_id("main", "next-page")),
            )
            .route(
                "/slow",
                MockPage::new("Slow").ready_after(Duration::from_millis(60)),
            )
    }

    async fn driver() -> MockDriver {
        let driver = MockDriver::new(Arc::new(site()), Viewport::DESKTOP);
        driver.navigate("http://app/").await.unwrap();
        driver
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_from_config() {
            let config = SuiteConfig::default();
            let options = WaitOptions::from_config(&config);
            assert_eq!(options.timeout_ms, 15_000);
            assert_eq!(options.poll_interval_ms, 100);
        }

        #[test]
        fn test_builders() {
            let options = WaitOptions::new().with_timeout(2_000).with_poll_interval(5);
            assert_eq!(options.timeout(), Duration::from_secs(2));
            assert_eq!(options.poll_interval(), Duration::from_millis(5));
        }

        #[test]
        fn test_zero_poll_interval_clamped() {
            let options = WaitOptions::new().with_poll_interval(0);
            assert_eq!(options.poll_interval(), Duration::from_millis(1));
            let config = SuiteConfig::default().with_poll_interval(Duration::ZERO);
            assert_eq!(WaitOptions::from_config(&config).poll_interval_ms, 1);
        }
    }

    mod element_wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_present_immediately() {
            let d = driver().await;
            let found = Waiter::new(&d, FAST)
                .present(&Locator::test_id("hero-title"))
                .await
                .unwrap();
            assert_eq!(found.snapshot.text, "Hello");
            assert_eq!(found.target.index, 0);
        }

        #[tokio::test]
        async fn test_present_after_delay() {
            let d = driver().await;
            assert!(Waiter::new(&d, FAST)
                .present(&Locator::test_id("late"))
                .await
                .is_ok());
        }

        #[tokio::test]
        async fn test_missing_element_times_out_as_not_found() {
            let d = driver().await;
            let err = Waiter::new(&d, FAST)
                .present(&Locator::test_id("nope"))
                .await
                .unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("testid=nope"));
        }

        #[tokio::test]
        async fn test_visible_after_reveal() {
            let d = driver().await;
            let found = Waiter::new(&d, FAST)
                .visible(&Locator::test_id("reveal"))
                .await
                .unwrap();
            assert!(found.snapshot.visible);
        }

        #[tokio::test]
        async fn test_disabled_never_clickable() {
            let d = driver().await;
            let err = Waiter::new(&d, FAST)
                .clickable(&Locator::test_id("off"))
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn test_opacity_settles() {
            let d = driver().await;
            let found = Waiter::new(&d, FAST)
                .opacity_settled(&Locator::test_id("fade"))
                .await
                .unwrap();
            assert!(found.snapshot.is_opaque());
        }

        #[tokio::test]
        async fn test_invisible_for_hidden_and_absent() {
            let d = driver().await;
            let waiter = Waiter::new(&d, FAST);
            assert!(waiter.invisible(&Locator::test_id("spinner")).await.is_ok());
            assert!(waiter.invisible(&Locator::test_id("nope")).await.is_ok());
            let err = waiter
                .invisible(&Locator::test_id("hero-title"))
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::Timeout { .. }));
        }

        #[tokio::test]
        async fn test_image_loaded() {
            let d = driver().await;
            let waiter = Waiter::new(&d, FAST);
            assert!(waiter.image_loaded(&Locator::test_id("photo")).await.is_ok());
            assert!(waiter.image_loaded(&Locator::test_id("broken")).await.is_err());
        }

        #[tokio::test]
        async fn test_text_contains() {
            let d = driver().await;
            let waiter = Waiter::new(&d, FAST);
            assert!(waiter
                .text_contains(&Locator::test_id("hero-title"), "Hel")
                .await
                .is_ok());
            assert!(waiter
                .text_contains(&Locator::test_id("hero-title"), "Bye")
                .await
                .is_err());
        }

        #[tokio::test]
        async fn test_scroll_reveal_scrolls() {
            let d = driver().await;
            Waiter::new(&d, FAST)
                .scroll_reveal(&Locator::test_id("hero-title"))
                .await
                .unwrap();
            assert!(d.was_called("scroll_into_view"));
        }

        #[tokio::test]
        async fn test_api_response_waits_for_spinner_then_result() {
            let d = driver().await;
            let found = Waiter::new(&d, FAST)
                .api_response(&Locator::test_id("spinner"), &Locator::test_id("late"))
                .await
                .unwrap();
            assert_eq!(found.snapshot.test_id(), Some("late"));
        }
    }

    mod page_wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_url_contains_after_click() {
            let d = driver().await;
            d.click(&ElementRef::first("[data-testid='go']")).await.unwrap();
            let url = Waiter::new(&d, FAST).url_contains("/next").await.unwrap();
            assert_eq!(url, "http://app/next");
        }

        #[tokio::test]
        async fn test_url_changes() {
            let d = driver().await;
            let waiter = Waiter::new(&d, FAST);
            let err = waiter.url_changes("http://app/").await.unwrap_err();
            assert!(matches!(err, VitrinaError::Timeout { ms: 300, .. }));
            d.navigate("http://app/next").await.unwrap();
            assert_eq!(waiter.url_changes("http://app/").await.unwrap(), "http://app/next");
        }

        #[tokio::test]
        async fn test_ready_state_waits_for_complete() {
            let d = driver().await;
            d.navigate("http://app/slow").await.unwrap();
            assert!(Waiter::new(&d, FAST).ready_state_complete().await.is_ok());
        }

        #[tokio::test]
        async fn test_route_and_content() {
            let d = driver().await;
            d.navigate("http://app/next").await.unwrap();
            assert!(Waiter::new(&d, FAST)
                .route_and_content("/next", &Locator::test_id("next-page"))
                .await
                .is_ok());
        }

        #[tokio::test]
        async fn test_until_custom_condition() {
            let d = &driver().await;
            let title = Waiter::new(d, FAST)
                .until("title", move || async move {
                    let t = d.title().await?;
                    Ok((!t.is_empty()).then_some(t))
                })
                .await
                .unwrap();
            assert_eq!(title, "Home");
        }

        #[tokio::test]
        async fn test_persistent_driver_error_is_returned() {
            let site = site().failing("query");
            let d = MockDriver::new(Arc::new(site), Viewport::DESKTOP);
            let err = Waiter::new(&d, FAST)
                .present(&Locator::test_id("hero-title"))
                .await
                .unwrap_err();
            assert!(matches!(err, VitrinaError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_zero_timeout_probes_once() {
            let d = driver().await;
            let waiter = Waiter::new(&d, FAST.with_timeout(0));
            assert!(waiter.present(&Locator::test_id("hero-title")).await.is_ok());
        }
    }
}
