//! Page Object base
//!
//! [`BasePage`] is the shared toolbox every screen builds on. Each operation is a
//! wait-then-act pair: lookups go through [`Waiter`], interactions wait for the
//! element to be clickable or visible first, and assertions turn lookup timeouts
//! into [`VitrinaError::AssertionFailed`] with the locator and observed value.
//!
//! Concrete screens implement [`PageObject`] to name their path and container.
//!
//! ```ignore
//! let page = BasePage::new(&session);
//! page.navigate_to("/contact").await?;
//! page.fill_text(&Locator::test_id("contact-input-name"), "Test User").await?;
//! page.assert_visible(&Locator::test_id("contact-submit-button")).await?;
//! ```

use crate::config::Viewport;
use crate::console::{ConsoleEntry, ConsoleFilter};
use crate::driver::{BrowserDriver, ElementRef, ElementSnapshot, Key, PointerAction};
use crate::fixture::BrowserSession;
use crate::locator::{BoundingBox, Locator};
use crate::presence::Presence;
use crate::result::{ErrorCategory, VitrinaError, VitrinaResult};
use crate::wait::{FoundElement, WaitOptions, Waiter};
use async_trait::async_trait;
use chrono::Local;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Budget for optional lookups (elements that may legitimately be missing)
pub const OPTIONAL_LOOKUP_TIMEOUT_MS: u64 = 2_000;

/// Outer HTML longer than this is truncated in debug output
pub const DEBUG_HTML_LIMIT: usize = 500;

/// Default screenshot name format
const SCREENSHOT_NAME: &str = "screenshot_%Y%m%d_%H%M%S.png";

// =============================================================================
// PAGE OBJECT TRAIT
// =============================================================================

/// A screen of the application
#[async_trait(?Send)]
pub trait PageObject {
    /// Path relative to the base URL
    fn url_pattern(&self) -> &str;

    /// Element whose visibility means the page rendered
    fn container(&self) -> Locator;

    /// Shared page operations
    fn base(&self) -> &BasePage<'_>;

    /// Name used in logs
    fn page_name(&self) -> &str;

    /// Navigate to the page and wait for the document to load
    async fn load(&self) -> VitrinaResult<()> {
        self.base().navigate_to(self.url_pattern()).await
    }

    /// Assert the container is visible
    async fn verify_loaded(&self) -> VitrinaResult<()> {
        self.base().assert_visible(&self.container()).await
    }

    /// Container visible within the optional-lookup budget
    async fn is_loaded(&self) -> VitrinaResult<bool> {
        self.base().is_displayed(&self.container()).await
    }
}

// =============================================================================
// BASE PAGE
// =============================================================================

/// Wait-guarded operations over one session
#[derive(Debug, Clone, Copy)]
pub struct BasePage<'s> {
    session: &'s BrowserSession,
    options: WaitOptions,
}

impl<'s> BasePage<'s> {
    /// Page over `session` using the configured explicit wait
    #[must_use]
    pub fn new(session: &'s BrowserSession) -> Self {
        Self {
            session,
            options: WaitOptions::from_config(session.config()),
        }
    }

    /// Same page with a different default timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self
            .options
            .with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The session
    #[must_use]
    pub const fn session(&self) -> &'s BrowserSession {
        self.session
    }

    /// The driver
    #[must_use]
    pub fn driver(&self) -> &'s dyn BrowserDriver {
        self.session.driver()
    }

    /// Default wait options
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    /// Waiter with the page timeout
    #[must_use]
    pub fn waiter(&self) -> Waiter<'s> {
        Waiter::new(self.driver(), self.options)
    }

    fn optional_waiter(&self) -> Waiter<'s> {
        self.waiter()
            .with_timeout(OPTIONAL_LOOKUP_TIMEOUT_MS.min(self.options.timeout_ms))
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Load `path` relative to the base URL and wait for `readyState == complete`
    pub async fn navigate_to(&self, path: &str) -> VitrinaResult<()> {
        let url = self.session.config().url_for(path);
        info!(%url, "navigating");
        self.driver().navigate(&url).await?;
        self.wait_for_page_load().await
    }

    /// Load the home page
    pub async fn navigate_home(&self) -> VitrinaResult<()> {
        self.navigate_to("/").await
    }

    /// Wait for the document to finish loading
    pub async fn wait_for_page_load(&self) -> VitrinaResult<()> {
        self.waiter().ready_state_complete().await
    }

    /// Current URL
    pub async fn current_url(&self) -> VitrinaResult<String> {
        self.driver().current_url().await
    }

    /// Wait until the URL contains `expected` (client-side routing)
    pub async fn wait_for_url_change(&self, expected: &str) -> VitrinaResult<String> {
        self.waiter().url_contains(expected).await
    }

    /// Wait for a client-side route change and the new document to settle
    pub async fn wait_for_route_change(&self, expected: &str) -> VitrinaResult<String> {
        let url = self.wait_for_url_change(expected).await?;
        self.wait_for_page_load().await?;
        Ok(url)
    }

    /// Reload and wait for the document to load
    pub async fn refresh_page(&self) -> VitrinaResult<()> {
        self.driver().reload().await?;
        self.wait_for_page_load().await
    }

    /// History back
    pub async fn go_back(&self) -> VitrinaResult<()> {
        self.driver().go_back().await?;
        self.wait_for_page_load().await
    }

    /// Document title
    pub async fn page_title(&self) -> VitrinaResult<String> {
        self.driver().title().await
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// First match, once present
    pub async fn find_element(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.waiter().present(locator).await
    }

    /// All matches, once at least one is present
    pub async fn find_elements(&self, locator: &Locator) -> VitrinaResult<Vec<ElementSnapshot>> {
        self.waiter().all_present(locator).await
    }

    /// First match, once visible and enabled
    pub async fn find_clickable(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.waiter().clickable(locator).await
    }

    /// First match, once visible
    pub async fn find_visible(&self, locator: &Locator) -> VitrinaResult<FoundElement> {
        self.waiter().visible(locator).await
    }

    /// The `index`-th match (0-based, document order), once that many render.
    ///
    /// Fails with [`VitrinaError::ElementNotFound`] when fewer than `index + 1`
    /// elements match before the timeout.
    pub async fn nth_element(&self, locator: &Locator, index: usize) -> VitrinaResult<FoundElement> {
        self.nth_element_where(locator, index, "present", |_| true).await
    }

    /// Poll the `index`-th match until `accept` holds for it
    async fn nth_element_where<P>(
        &self,
        locator: &Locator,
        index: usize,
        what: &str,
        accept: P,
    ) -> VitrinaResult<FoundElement>
    where
        P: Fn(&ElementSnapshot) -> bool,
    {
        let css = &locator.to_css();
        let driver = self.driver();
        let accept = &accept;
        let waited = self
            .waiter()
            .until(&format!("{locator}[{index}] {what}"), move || async move {
                let matches = driver.query(css).await?;
                Ok(matches
                    .into_iter()
                    .nth(index)
                    .filter(|snapshot| accept(snapshot))
                    .map(|snapshot| FoundElement {
                        target: ElementRef::new(css.clone(), index),
                        snapshot,
                    }))
            })
            .await;
        waited.map_err(|e| match e {
            VitrinaError::Timeout { .. } => VitrinaError::ElementNotFound {
                locator: format!("{locator}[{index}]"),
                timeout_ms: self.options.timeout_ms,
            },
            other => other,
        })
    }

    /// Click the `index`-th match once it is visible and enabled
    pub async fn click_nth(&self, locator: &Locator, index: usize) -> VitrinaResult<()> {
        let found = self
            .nth_element_where(locator, index, "clickable", ElementSnapshot::is_clickable)
            .await?;
        self.driver().click(&found.target).await
    }

    /// Hover the `index`-th match once it is visible
    pub async fn hover_nth(&self, locator: &Locator, index: usize) -> VitrinaResult<()> {
        let found = self
            .nth_element_where(locator, index, "visible", |snapshot| snapshot.visible)
            .await?;
        self.driver()
            .pointer(&found.target, PointerAction::Hover)
            .await
    }

    /// Matches of an optional list; empty when nothing renders within the
    /// optional-lookup budget
    pub async fn optional_elements(&self, locator: &Locator) -> VitrinaResult<Vec<ElementSnapshot>> {
        Presence::from_lookup(self.optional_waiter().all_present(locator).await)
            .into_result()
            .map(Option::unwrap_or_default)
    }

    /// Number of matches of an optional list
    pub async fn count(&self, locator: &Locator) -> VitrinaResult<usize> {
        Ok(self.optional_elements(locator).await?.len())
    }

    /// Typed optional lookup: the first match once visible, confirmed absent, or
    /// unknown because the lookup itself failed
    pub async fn probe(&self, locator: &Locator) -> Presence<FoundElement> {
        Presence::from_lookup(self.optional_waiter().visible(locator).await)
    }

    /// Whether the first match becomes visible within the optional-lookup budget
    pub async fn is_displayed(&self, locator: &Locator) -> VitrinaResult<bool> {
        Ok(self.probe(locator).await.into_result()?.is_some())
    }

    /// Whether anything matches within the optional-lookup budget
    pub async fn is_present(&self, locator: &Locator) -> VitrinaResult<bool> {
        let found = Presence::from_lookup(self.optional_waiter().present(locator).await);
        Ok(found.into_result()?.is_some())
    }

    /// Whether the first match is enabled
    pub async fn is_enabled(&self, locator: &Locator) -> VitrinaResult<bool> {
        Ok(self.find_element(locator).await?.snapshot.enabled)
    }

    /// Whether the first match is checked or selected
    pub async fn is_selected(&self, locator: &Locator) -> VitrinaResult<bool> {
        Ok(self.find_element(locator).await?.snapshot.selected)
    }

    /// Rendered text of the first match
    pub async fn text_of(&self, locator: &Locator) -> VitrinaResult<String> {
        Ok(self.find_element(locator).await?.snapshot.text)
    }

    /// Text of an optional element; `None` when it never renders
    pub async fn optional_text(&self, locator: &Locator) -> VitrinaResult<Option<String>> {
        let found = Presence::from_lookup(self.optional_waiter().present(locator).await);
        Ok(found.into_result()?.map(|f| f.snapshot.text))
    }

    /// Attribute of the first match
    pub async fn attribute_of(&self, locator: &Locator, name: &str) -> VitrinaResult<Option<String>> {
        Ok(self.find_element(locator).await?.snapshot.attribute(name))
    }

    /// Current value of a form control
    pub async fn value_of(&self, locator: &Locator) -> VitrinaResult<String> {
        Ok(self
            .attribute_of(locator, "value")
            .await?
            .unwrap_or_default())
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Wait until clickable, then click
    pub async fn click(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_clickable(locator).await?;
        debug!(%locator, "click");
        self.driver().click(&found.target).await
    }

    /// Submit the form an element belongs to (Enter on the element)
    pub async fn submit_form(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_visible(locator).await?;
        self.driver().press_key(Some(&found.target), Key::Enter).await
    }

    /// Wait until clickable, clear, then type
    pub async fn fill_text(&self, locator: &Locator, text: &str) -> VitrinaResult<()> {
        let found = self.find_clickable(locator).await?;
        self.driver().clear(&found.target).await?;
        self.driver().type_text(&found.target, text).await
    }

    /// Move the pointer over an element
    pub async fn hover(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_visible(locator).await?;
        self.driver()
            .pointer(&found.target, PointerAction::Hover)
            .await
    }

    /// Double click an element
    pub async fn double_click(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_clickable(locator).await?;
        self.driver()
            .pointer(&found.target, PointerAction::DoubleClick)
            .await
    }

    /// Context click an element
    pub async fn right_click(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_visible(locator).await?;
        self.driver()
            .pointer(&found.target, PointerAction::ContextClick)
            .await
    }

    /// Scroll an element into view
    pub async fn scroll_to_element(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_element(locator).await?;
        self.driver().scroll_into_view(&found.target).await
    }

    /// Scroll to the top of the document
    pub async fn scroll_to_top(&self) -> VitrinaResult<()> {
        self.driver().execute_script("window.scrollTo(0, 0)").await?;
        Ok(())
    }

    /// Scroll to the bottom of the document
    pub async fn scroll_to_bottom(&self) -> VitrinaResult<()> {
        self.driver()
            .execute_script("window.scrollTo(0, document.body.scrollHeight)")
            .await?;
        Ok(())
    }

    /// Scroll by a pixel offset
    pub async fn scroll_by(&self, x: i64, y: i64) -> VitrinaResult<()> {
        self.driver()
            .execute_script(&format!("window.scrollBy({x}, {y})"))
            .await?;
        Ok(())
    }

    /// Press a key on the focused element
    pub async fn press_key(&self, key: Key) -> VitrinaResult<()> {
        self.driver().press_key(None, key).await
    }

    /// Press Enter on an element once clickable
    pub async fn press_enter_on(&self, locator: &Locator) -> VitrinaResult<()> {
        let found = self.find_clickable(locator).await?;
        self.driver().press_key(Some(&found.target), Key::Enter).await
    }

    /// Press Escape
    pub async fn press_escape(&self) -> VitrinaResult<()> {
        self.press_key(Key::Escape).await
    }

    /// Press Tab
    pub async fn press_tab(&self) -> VitrinaResult<()> {
        self.press_key(Key::Tab).await
    }

    /// Press Shift+Tab
    pub async fn press_shift_tab(&self) -> VitrinaResult<()> {
        self.press_key(Key::ShiftTab).await
    }

    /// `data-testid` of the focused element
    pub async fn active_test_id(&self) -> VitrinaResult<Option<String>> {
        Ok(self
            .driver()
            .active_element()
            .await?
            .and_then(|e| e.test_id().map(str::to_string)))
    }

    // -------------------------------------------------------------------------
    // Assertions
    // -------------------------------------------------------------------------

    /// Fail unless something matches
    pub async fn assert_present(&self, locator: &Locator) -> VitrinaResult<()> {
        self.find_element(locator)
            .await
            .map(|_| ())
            .map_err(|e| as_assertion(e, || format!("Element not found: {locator}")))
    }

    /// Fail unless the first match becomes visible
    pub async fn assert_visible(&self, locator: &Locator) -> VitrinaResult<()> {
        self.find_visible(locator)
            .await
            .map(|_| ())
            .map_err(|e| as_assertion(e, || format!("Element not visible: {locator}")))
    }

    /// Fail unless the first match stays hidden or disappears
    pub async fn assert_not_visible(&self, locator: &Locator) -> VitrinaResult<()> {
        self.waiter()
            .invisible(locator)
            .await
            .map_err(|e| as_assertion(e, || format!("Element still visible: {locator}")))
    }

    /// Fail unless the first match's text contains `expected`
    pub async fn assert_text_contains(&self, locator: &Locator, expected: &str) -> VitrinaResult<()> {
        match self.waiter().text_contains(locator, expected).await {
            Ok(_) => Ok(()),
            Err(e) if e.category() == ErrorCategory::Lookup => {
                let observed = self.observed_text(locator).await;
                Err(VitrinaError::assertion(format!(
                    "Expected '{expected}' in text of {locator}, found '{observed}'"
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Fail unless the first match's text equals `expected`
    pub async fn assert_text_equals(&self, locator: &Locator, expected: &str) -> VitrinaResult<()> {
        let css = &locator.to_css();
        let driver = self.driver();
        let waited = self
            .waiter()
            .until(&format!("{locator} text == '{expected}'"), move || async move {
                let matches = driver.query(css).await?;
                Ok(matches
                    .first()
                    .filter(|s| s.text.trim() == expected)
                    .map(|_| ()))
            })
            .await;
        match waited {
            Ok(()) => Ok(()),
            Err(e) if e.category() == ErrorCategory::Lookup => {
                let observed = self.observed_text(locator).await;
                Err(VitrinaError::assertion(format!(
                    "Expected text of {locator} to be '{expected}', found '{observed}'"
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Fail unless the URL comes to contain `fragment`
    pub async fn assert_url_contains(&self, fragment: &str) -> VitrinaResult<()> {
        match self.waiter().url_contains(fragment).await {
            Ok(_) => Ok(()),
            Err(e) if e.category() == ErrorCategory::Lookup => {
                let url = self.current_url().await?;
                Err(VitrinaError::assertion(format!(
                    "Expected '{fragment}' in URL '{url}'"
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Fail unless the title contains `expected`
    pub async fn assert_title_contains(&self, expected: &str) -> VitrinaResult<()> {
        let driver = self.driver();
        let waited = self
            .waiter()
            .until(&format!("title containing '{expected}'"), move || async move {
                let title = driver.title().await?;
                Ok(title.contains(expected).then_some(()))
            })
            .await;
        match waited {
            Ok(()) => Ok(()),
            Err(e) if e.category() == ErrorCategory::Lookup => {
                let title = self.page_title().await?;
                Err(VitrinaError::assertion(format!(
                    "Expected '{expected}' in title '{title}'"
                )))
            }
            Err(e) => Err(e),
        }
    }

    async fn observed_text(&self, locator: &Locator) -> String {
        match self.driver().query(&locator.to_css()).await {
            Ok(matches) => matches
                .first()
                .map_or_else(|| "<missing>".to_string(), |s| s.text.clone()),
            Err(e) => format!("<{e}>"),
        }
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    /// Save a full-page screenshot under the screenshot directory.
    ///
    /// Without a name the file is `screenshot_%Y%m%d_%H%M%S.png`.
    pub async fn take_screenshot(&self, filename: Option<&str>) -> VitrinaResult<PathBuf> {
        let dir = &self.session.config().screenshot_dir;
        std::fs::create_dir_all(dir)?;
        let name = filename.map_or_else(
            || Local::now().format(SCREENSHOT_NAME).to_string(),
            str::to_string,
        );
        let path = dir.join(name);
        let png = self
            .driver()
            .screenshot()
            .await
            .map_err(|e| VitrinaError::Screenshot {
                message: e.to_string(),
            })?;
        std::fs::write(&path, png)?;
        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Document scroll height in pixels
    pub async fn page_height(&self) -> VitrinaResult<u64> {
        self.numeric_script("document.body.scrollHeight").await
    }

    /// Document scroll width in pixels
    pub async fn page_width(&self) -> VitrinaResult<u64> {
        self.numeric_script("document.body.scrollWidth").await
    }

    async fn numeric_script(&self, expr: &str) -> VitrinaResult<u64> {
        let value = self.driver().execute_script(expr).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|f| f.max(0.0) as u64))
            .ok_or_else(|| VitrinaError::driver(format!("{expr} returned {value}")))
    }

    async fn rect_of(&self, locator: &Locator) -> VitrinaResult<BoundingBox> {
        Ok(self
            .find_element(locator)
            .await?
            .snapshot
            .rect
            .unwrap_or_default())
    }

    /// Top-left corner of the first match
    pub async fn element_location(&self, locator: &Locator) -> VitrinaResult<(f64, f64)> {
        let rect = self.rect_of(locator).await?;
        Ok((rect.x, rect.y))
    }

    /// Width and height of the first match
    pub async fn element_size(&self, locator: &Locator) -> VitrinaResult<(f64, f64)> {
        let rect = self.rect_of(locator).await?;
        Ok((rect.width, rect.height))
    }

    /// Evaluate a script expression
    pub async fn execute_script(&self, script: &str) -> VitrinaResult<serde_json::Value> {
        self.driver().execute_script(script).await
    }

    /// Console entries captured since the last read
    pub async fn console_logs(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        self.driver().console_logs().await
    }

    /// Severe console entries, benign 404s removed
    pub async fn console_errors(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        let logs = self.console_logs().await?;
        let errors: Vec<ConsoleEntry> = ConsoleFilter::default()
            .apply(&logs)
            .into_iter()
            .cloned()
            .collect();
        for entry in &errors {
            debug!(%entry, "console error");
        }
        Ok(errors)
    }

    /// Fail if any severe console entry (other than a benign 404) was logged
    pub async fn assert_no_console_errors(&self) -> VitrinaResult<()> {
        let errors = self.console_errors().await?;
        if errors.is_empty() {
            return Ok(());
        }
        let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(VitrinaError::assertion(format!(
            "Console errors found: {}",
            listed.join("; ")
        )))
    }

    /// Resize the viewport
    pub async fn set_viewport(&self, viewport: Viewport) -> VitrinaResult<()> {
        debug!(%viewport, "set viewport");
        self.driver().set_viewport(viewport).await
    }

    /// 375x667
    pub async fn set_mobile_viewport(&self) -> VitrinaResult<()> {
        self.set_viewport(Viewport::MOBILE).await
    }

    /// 768x1024
    pub async fn set_tablet_viewport(&self) -> VitrinaResult<()> {
        self.set_viewport(Viewport::TABLET).await
    }

    /// 1024x768
    pub async fn set_desktop_viewport(&self) -> VitrinaResult<()> {
        self.set_viewport(Viewport::DESKTOP).await
    }

    /// 1280x720
    pub async fn set_wide_viewport(&self) -> VitrinaResult<()> {
        self.set_viewport(Viewport::WIDE).await
    }

    /// Multi-line description of the first match
    pub async fn debug_element(&self, locator: &Locator) -> VitrinaResult<String> {
        let snapshot = self.find_element(locator).await?.snapshot;
        let rect = snapshot.rect.unwrap_or_default();
        let mut out = String::new();
        let _ = writeln!(out, "Element Debug: {locator}");
        let _ = writeln!(out, "Text: {}", snapshot.text);
        let _ = writeln!(out, "Tag: {}", snapshot.tag);
        let _ = writeln!(out, "Classes: {}", snapshot.attribute("class").unwrap_or_default());
        let _ = writeln!(out, "ID: {}", snapshot.attribute("id").unwrap_or_default());
        let _ = writeln!(out, "Visible: {}", snapshot.visible);
        let _ = writeln!(out, "Enabled: {}", snapshot.enabled);
        let _ = writeln!(out, "Location: ({}, {})", rect.x, rect.y);
        let _ = write!(out, "Size: {}x{}", rect.width, rect.height);
        debug!("{out}");
        Ok(out)
    }

    /// Outer HTML of the first match, truncated for logs
    pub async fn element_tree(&self, locator: &Locator) -> VitrinaResult<String> {
        let found = self.find_element(locator).await?;
        let html = self.driver().outer_html(&found.target).await?;
        Ok(truncate_html(&html))
    }
}

/// Turn a lookup timeout into an assertion failure
fn as_assertion(error: VitrinaError, message: impl FnOnce() -> String) -> VitrinaError {
    if error.category() == ErrorCategory::Lookup {
        VitrinaError::assertion(message())
    } else {
        error
    }
}

fn truncate_html(html: &str) -> String {
    match html.char_indices().nth(DEBUG_HTML_LIMIT) {
        Some((cut, _)) => format!("{}...", &html[..cut]),
        None => html.to_string(),
    }
}
