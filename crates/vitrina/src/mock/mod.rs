//! In-memory browser for tests.
//!
//! [`MockDriver`] implements [`BrowserDriver`] over a [`MockSite`]. It keeps the
//! behavior page objects depend on (routing, visibility, focus, form values,
//! console output) and records every command so tests can assert on the exact
//! interaction sequence.
//!
//! ```ignore
//! let site = MockSite::new().route(
//!     "/",
//!     MockPage::new("Home").element(MockElement::with_test_id("main", "hero-section")),
//! );
//! let factory = MockDriverFactory::new(site);
//! ```

mod css;
mod dom;
mod site;

pub use site::{ClickAction, MockElement, MockPage, MockSite};

use crate::config::{SuiteConfig, Viewport};
use crate::console::ConsoleEntry;
use crate::driver::{nth, BrowserDriver, DriverFactory, ElementRef, ElementSnapshot, Key, PointerAction};
use crate::result::{VitrinaError, VitrinaResult};
use async_trait::async_trait;
use css::Selector;
use dom::{Document, Visibility};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A 1x1 transparent PNG
const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

const ABOUT_BLANK: &str = "about:blank";

#[derive(Debug)]
struct MockState {
    url: String,
    document: Document,
    history: Vec<String>,
    viewport: Viewport,
    focus: Option<usize>,
    console: Vec<ConsoleEntry>,
    calls: Vec<String>,
    closed: bool,
}

/// Scriptable in-memory browser session
#[derive(Debug, Clone)]
pub struct MockDriver {
    site: Arc<MockSite>,
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Session on `about:blank`
    #[must_use]
    pub fn new(site: Arc<MockSite>, viewport: Viewport) -> Self {
        Self {
            site,
            state: Arc::new(Mutex::new(MockState {
                url: ABOUT_BLANK.to_string(),
                document: Document::blank(),
                history: Vec::new(),
                viewport,
                focus: None,
                console: Vec::new(),
                calls: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Every command received, as `name` or `name:detail`
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Check if a command was received
    #[must_use]
    pub fn was_called(&self, command: &str) -> bool {
        self.call_history().iter().any(|c| c.starts_with(command))
    }

    /// True after `close`
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|s| s.closed).unwrap_or(true)
    }

    /// Current viewport
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.state.lock().map(|s| s.viewport).ok()
    }

    /// Lock the session and record `command`
    fn begin(&self, command: &str, detail: Option<&str>) -> VitrinaResult<MutexGuard<'_, MockState>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| VitrinaError::driver("mock session lock poisoned"))?;
        state.calls.push(match detail {
            Some(detail) => format!("{command}:{detail}"),
            None => command.to_string(),
        });
        if state.closed {
            return Err(VitrinaError::driver(format!("{command}: session is closed")));
        }
        if self.site.failing.contains(command) {
            return Err(VitrinaError::driver(format!("{command}: injected failure")));
        }
        Ok(state)
    }

    fn load(&self, state: &mut MockState, url: &str) {
        let previous = std::mem::replace(&mut state.url, url.to_string());
        let same_document = previous != ABOUT_BLANK
            && url.contains('#')
            && route_part(&previous) == route_part(url);
        if !same_document {
            let page = path_of(url).map_or_else(MockPage::default, |path| self.site.resolve(path).clone());
            state.document = Document::load(&page);
            state.console.extend(page.console.iter().cloned());
            state.focus = None;
            debug!(%url, title = %page.title, "mock page loaded");
        }
        state.history.push(previous);
    }

    fn resolve(state: &MockState, target: &ElementRef) -> VitrinaResult<usize> {
        let selector = Selector::parse(&target.css)?;
        nth(state.document.query(&selector), target)
    }

    fn require_visible(state: &MockState, n: usize, target: &ElementRef) -> VitrinaResult<()> {
        if state.document.visible(n, state.viewport.width) {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }

    fn activate(&self, state: &mut MockState, n: usize) -> VitrinaResult<()> {
        let node = &state.document.nodes[n];
        if !node.enabled {
            return Ok(());
        }
        if node.focusable {
            state.focus = Some(n);
        }
        let input_type = node.attributes.get("type").cloned();
        let input_type = input_type.as_deref();
        let tag = node.tag.clone();
        if tag == "input" && matches!(input_type, Some("checkbox" | "radio")) {
            state.document.nodes[n].selected = !state.document.nodes[n].selected;
        }
        let actions = state.document.nodes[n].on_click.clone();
        let navigates = actions.iter().any(|a| matches!(a, ClickAction::Navigate(_)));
        self.run_actions(state, &actions)?;

        let submits = tag == "button" && !matches!(input_type, Some("button" | "reset"))
            || tag == "input" && input_type == Some("submit");
        if submits && !navigates {
            if let Some(form) = state.document.form_of(n) {
                self.submit(state, form)?;
            }
        }
        Ok(())
    }

    fn submit(&self, state: &mut MockState, form: usize) -> VitrinaResult<()> {
        let actions = state.document.nodes[form].on_submit.clone();
        self.run_actions(state, &actions)
    }

    fn run_actions(&self, state: &mut MockState, actions: &[ClickAction]) -> VitrinaResult<()> {
        for action in actions {
            match action {
                ClickAction::Navigate(target) => {
                    let url = absolute(&state.url, target);
                    self.load(state, &url);
                }
                ClickAction::Show(css) => {
                    state.document.set_visibility(&Selector::parse(css)?, Visibility::Show);
                }
                ClickAction::Hide(css) => {
                    state.document.set_visibility(&Selector::parse(css)?, Visibility::Hide);
                }
                ClickAction::Toggle(css) => {
                    state.document.set_visibility(&Selector::parse(css)?, Visibility::Toggle);
                }
                ClickAction::Log(entry) => state.console.push(entry.clone()),
            }
        }
        Ok(())
    }

    fn move_focus(state: &mut MockState, backwards: bool) {
        let width = state.viewport.width;
        let order: Vec<usize> = (0..state.document.nodes.len())
            .filter(|&n| {
                let node = &state.document.nodes[n];
                node.focusable && node.enabled && state.document.visible(n, width)
            })
            .collect();
        if order.is_empty() {
            state.focus = None;
            return;
        }
        let position = state.focus.and_then(|f| order.iter().position(|&n| n == f));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        state.focus = Some(order[next]);
    }

    fn editable(state: &MockState, n: usize, target: &ElementRef) -> VitrinaResult<()> {
        Self::require_visible(state, n, target)?;
        let node = &state.document.nodes[n];
        if node.enabled && matches!(node.tag.as_str(), "input" | "textarea") {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }
}

/// Path plus query and fragment of an absolute URL; None for `about:` pages
fn path_of(url: &str) -> Option<&str> {
    if url.starts_with("about:") {
        return None;
    }
    match url.split_once("://") {
        Some((_, rest)) => Some(rest.find('/').map_or("/", |i| &rest[i..])),
        None => Some(url),
    }
}

/// URL without its fragment
fn route_part(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}

/// Resolve `target` against the origin of `current`
fn absolute(current: &str, target: &str) -> String {
    if target.contains("://") {
        return target.to_string();
    }
    let origin = current
        .split_once("://")
        .map(|(scheme, rest)| {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        })
        .unwrap_or_default();
    if target.starts_with('#') {
        return format!("{}{target}", route_part(current));
    }
    format!("{origin}{target}")
}

#[async_trait]
impl BrowserDriver for MockDriver {
    fn backend(&self) -> &'static str {
        "mock"
    }

    async fn navigate(&self, url: &str) -> VitrinaResult<()> {
        let mut state = self.begin("navigate", Some(url))?;
        self.load(&mut state, url);
        Ok(())
    }

    async fn current_url(&self) -> VitrinaResult<String> {
        Ok(self.begin("current_url", None)?.url.clone())
    }

    async fn title(&self) -> VitrinaResult<String> {
        Ok(self.begin("title", None)?.document.title.clone())
    }

    async fn ready_state(&self) -> VitrinaResult<String> {
        Ok(self.begin("ready_state", None)?.document.ready_state().to_string())
    }

    async fn reload(&self) -> VitrinaResult<()> {
        let mut state = self.begin("reload", None)?;
        let url = state.url.clone();
        let page = path_of(&url).map_or_else(MockPage::default, |path| self.site.resolve(path).clone());
        state.document = Document::load(&page);
        state.console.extend(page.console.iter().cloned());
        state.focus = None;
        Ok(())
    }

    async fn go_back(&self) -> VitrinaResult<()> {
        let mut state = self.begin("go_back", None)?;
        if let Some(previous) = state.history.pop() {
            self.load(&mut state, &previous);
            state.history.pop();
        }
        Ok(())
    }

    async fn query(&self, css: &str) -> VitrinaResult<Vec<ElementSnapshot>> {
        let state = self.begin("query", Some(css))?;
        let selector = Selector::parse(css)?;
        let width = state.viewport.width;
        Ok(state
            .document
            .query(&selector)
            .into_iter()
            .map(|n| state.document.snapshot(n, width))
            .collect())
    }

    async fn click(&self, target: &ElementRef) -> VitrinaResult<()> {
        let mut state = self.begin("click", Some(&target.to_string()))?;
        let n = Self::resolve(&state, target)?;
        Self::require_visible(&state, n, target)?;
        self.activate(&mut state, n)
    }

    async fn clear(&self, target: &ElementRef) -> VitrinaResult<()> {
        let mut state = self.begin("clear", Some(&target.to_string()))?;
        let n = Self::resolve(&state, target)?;
        Self::editable(&state, n, target)?;
        state.document.nodes[n].value = Some(String::new());
        Ok(())
    }

    async fn type_text(&self, target: &ElementRef, text: &str) -> VitrinaResult<()> {
        let mut state = self.begin("type_text", Some(&format!("{target}={text}")))?;
        let n = Self::resolve(&state, target)?;
        Self::editable(&state, n, target)?;
        state.document.nodes[n]
            .value
            .get_or_insert_with(String::new)
            .push_str(text);
        state.focus = Some(n);
        Ok(())
    }

    async fn pointer(&self, target: &ElementRef, action: PointerAction) -> VitrinaResult<()> {
        let state = self.begin("pointer", Some(&format!("{action:?}:{target}")))?;
        let n = Self::resolve(&state, target)?;
        Self::require_visible(&state, n, target)
    }

    async fn scroll_into_view(&self, target: &ElementRef) -> VitrinaResult<()> {
        let state = self.begin("scroll_into_view", Some(&target.to_string()))?;
        Self::resolve(&state, target).map(|_| ())
    }

    async fn press_key(&self, target: Option<&ElementRef>, key: Key) -> VitrinaResult<()> {
        let detail = match target {
            Some(t) => format!("{key:?}:{t}"),
            None => format!("{key:?}"),
        };
        let mut state = self.begin("press_key", Some(&detail))?;
        if let Some(target) = target {
            let n = Self::resolve(&state, target)?;
            Self::require_visible(&state, n, target)?;
            state.focus = Some(n);
        }
        match key {
            Key::Tab => Self::move_focus(&mut state, false),
            Key::ShiftTab => Self::move_focus(&mut state, true),
            Key::Enter | Key::Space => {
                if let Some(n) = state.focus {
                    let tag = state.document.nodes[n].tag.clone();
                    if matches!(tag.as_str(), "a" | "button") {
                        self.activate(&mut state, n)?;
                    } else if key == Key::Enter && tag == "input" {
                        if let Some(form) = state.document.form_of(n) {
                            self.submit(&mut state, form)?;
                        }
                    }
                }
            }
            Key::Escape | Key::ArrowDown | Key::ArrowUp => {}
        }
        Ok(())
    }

    async fn active_element(&self) -> VitrinaResult<Option<ElementSnapshot>> {
        let state = self.begin("active_element", None)?;
        let width = state.viewport.width;
        Ok(state
            .focus
            .filter(|&n| state.document.present(n))
            .map(|n| state.document.snapshot(n, width)))
    }

    async fn outer_html(&self, target: &ElementRef) -> VitrinaResult<String> {
        let state = self.begin("outer_html", Some(&target.to_string()))?;
        let n = Self::resolve(&state, target)?;
        Ok(state.document.outer_html(n))
    }

    async fn execute_script(&self, script: &str) -> VitrinaResult<serde_json::Value> {
        let state = self.begin("execute_script", Some(script))?;
        if let Some((_, value)) = self
            .site
            .scripts
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
        {
            return Ok(value.clone());
        }
        let width = state.viewport.width;
        let value = if script.contains("readyState") {
            serde_json::json!(state.document.ready_state())
        } else if script.contains("scrollHeight") {
            serde_json::json!(state.document.scroll_height(width).max(u64::from(state.viewport.height)))
        } else if script.contains("scrollWidth") || script.contains("innerWidth") {
            serde_json::json!(width)
        } else {
            serde_json::Value::Null
        };
        Ok(value)
    }

    async fn set_viewport(&self, viewport: Viewport) -> VitrinaResult<()> {
        let mut state = self.begin("set_viewport", Some(&viewport.to_string()))?;
        state.viewport = viewport;
        Ok(())
    }

    async fn screenshot(&self) -> VitrinaResult<Vec<u8>> {
        let _state = self.begin("screenshot", None)?;
        Ok(BLANK_PNG.to_vec())
    }

    async fn console_logs(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        let mut state = self.begin("console_logs", None)?;
        Ok(std::mem::take(&mut state.console))
    }

    async fn close(&self) -> VitrinaResult<()> {
        let mut state = self.begin("close", None)?;
        state.closed = true;
        Ok(())
    }
}

/// Hands out [`MockDriver`]s over one shared site and remembers them
#[derive(Debug, Clone)]
pub struct MockDriverFactory {
    site: Arc<MockSite>,
    setup_error: Option<String>,
    sessions: Arc<Mutex<Vec<MockDriver>>>,
}

impl MockDriverFactory {
    /// Factory serving `site`
    #[must_use]
    pub fn new(site: MockSite) -> Self {
        Self {
            site: Arc::new(site),
            setup_error: None,
            sessions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Factory whose sessions never start
    #[must_use]
    pub fn unavailable(message: &str) -> Self {
        Self {
            setup_error: Some(message.to_string()),
            ..Self::new(MockSite::new())
        }
    }

    /// Sessions created so far, oldest first
    #[must_use]
    pub fn sessions(&self) -> Vec<MockDriver> {
        self.sessions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn create(&self, config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
        if let Some(ref message) = self.setup_error {
            return Err(VitrinaError::setup(message));
        }
        let driver = MockDriver::new(Arc::clone(&self.site), config.viewport);
        self.sessions
            .lock()
            .map_err(|_| VitrinaError::setup("mock factory lock poisoned"))?
            .push(driver.clone());
        Ok(Box::new(driver))
    }
}
