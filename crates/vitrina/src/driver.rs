//! BrowserDriver - the seam between page objects and a browser backend.
//!
//! Every backend answers the same small command set. Element commands address
//! nodes by [`ElementRef`] (a CSS selector plus the 0-based match index) so the
//! trait stays object-safe and free of backend handle types.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  BrowserDriver (async trait, &self)                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ChromiumDriver      WebDriverDriver       MockDriver        │
//! │  CDP/chromiumoxide   W3C/fantoccini        in-memory site    │
//! │  feature=browser     feature=webdriver     always            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::config::{BrowserKind, SuiteConfig, Viewport};
use crate::console::ConsoleEntry;
use crate::locator::{BoundingBox, TEST_ID_ATTRIBUTE};
use crate::result::{VitrinaError, VitrinaResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Address of one element: selector plus match index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    /// CSS selector
    pub css: String,
    /// 0-based index into the ordered matches
    pub index: usize,
}

impl ElementRef {
    /// Create a reference
    #[must_use]
    pub fn new(css: impl Into<String>, index: usize) -> Self {
        Self {
            css: css.into(),
            index,
        }
    }

    /// First match of a selector
    #[must_use]
    pub fn first(css: impl Into<String>) -> Self {
        Self::new(css, 0)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.css, self.index)
    }
}

/// State of one element at the moment it was queried
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    /// Rendered text, trimmed
    pub text: String,
    /// Form control value (inputs, textareas, selects)
    pub value: Option<String>,
    /// Rendered and not hidden
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checked or selected
    pub selected: bool,
    /// Computed opacity
    pub opacity: f64,
    /// Images: load finished with a non-zero natural height. Other tags: true.
    pub image_loaded: bool,
    /// All attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Layout rectangle
    pub rect: Option<BoundingBox>,
}

impl ElementSnapshot {
    /// Visible and enabled
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.visible && self.enabled
    }

    /// Attribute value, `value` falls back to the control value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "value" {
            if let Some(ref v) = self.value {
                return Some(v.clone());
            }
        }
        self.attributes.get(name).cloned()
    }

    /// The `data-testid` attribute
    #[must_use]
    pub fn test_id(&self) -> Option<&str> {
        self.attributes.get(TEST_ID_ATTRIBUTE).map(String::as_str)
    }

    /// Opacity has reached 1
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        (self.opacity - 1.0).abs() < 1e-3
    }
}

/// Keyboard keys the suite sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Shift+Tab
    ShiftTab,
    /// Arrow down
    ArrowDown,
    /// Arrow up
    ArrowUp,
    /// Space bar
    Space,
}

impl Key {
    /// DOM `key` value
    #[must_use]
    pub const fn dom_key(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Tab | Self::ShiftTab => "Tab",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowUp => "ArrowUp",
            Self::Space => " ",
        }
    }

    /// DOM `code` value
    #[must_use]
    pub const fn dom_code(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Tab | Self::ShiftTab => "Tab",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowUp => "ArrowUp",
            Self::Space => "Space",
        }
    }

    /// Windows virtual key code
    #[must_use]
    pub const fn virtual_key_code(self) -> i64 {
        match self {
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Tab | Self::ShiftTab => 9,
            Self::ArrowDown => 40,
            Self::ArrowUp => 38,
            Self::Space => 32,
        }
    }

    /// Whether Shift is held
    #[must_use]
    pub const fn shifted(self) -> bool {
        matches!(self, Self::ShiftTab)
    }

    /// W3C WebDriver key sequence
    #[must_use]
    pub const fn webdriver_sequence(self) -> &'static str {
        match self {
            Self::Enter => "\u{E007}",
            Self::Escape => "\u{E00C}",
            Self::Tab => "\u{E004}",
            Self::ShiftTab => "\u{E008}\u{E004}\u{E000}",
            Self::ArrowDown => "\u{E015}",
            Self::ArrowUp => "\u{E013}",
            Self::Space => "\u{E00D}",
        }
    }
}

/// Mouse gestures other than a plain click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Move over the element
    Hover,
    /// Double click
    DoubleClick,
    /// Right click
    ContextClick,
}

impl PointerAction {
    /// DOM events dispatched for this gesture, in order
    #[must_use]
    pub const fn dom_events(self) -> &'static [&'static str] {
        match self {
            Self::Hover => &["pointerover", "mouseover", "mouseenter", "mousemove"],
            Self::DoubleClick => &["mousedown", "mouseup", "click", "mousedown", "mouseup", "click", "dblclick"],
            Self::ContextClick => &["mousedown", "mouseup", "contextmenu"],
        }
    }
}

/// Abstract browser automation.
///
/// All methods take `&self`; backends guard their session internally so a page
/// object can borrow the driver while a waiter polls it.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    /// Load a URL
    async fn navigate(&self, url: &str) -> VitrinaResult<()>;

    /// Current URL
    async fn current_url(&self) -> VitrinaResult<String>;

    /// Document title
    async fn title(&self) -> VitrinaResult<String>;

    /// `document.readyState`
    async fn ready_state(&self) -> VitrinaResult<String>;

    /// Reload the page
    async fn reload(&self) -> VitrinaResult<()>;

    /// History back
    async fn go_back(&self) -> VitrinaResult<()>;

    /// Every element matching `css`, in document order
    async fn query(&self, css: &str) -> VitrinaResult<Vec<ElementSnapshot>>;

    /// Click an element
    async fn click(&self, target: &ElementRef) -> VitrinaResult<()>;

    /// Clear a form control
    async fn clear(&self, target: &ElementRef) -> VitrinaResult<()>;

    /// Type text into an element
    async fn type_text(&self, target: &ElementRef, text: &str) -> VitrinaResult<()>;

    /// Hover, double click or right click
    async fn pointer(&self, target: &ElementRef, action: PointerAction) -> VitrinaResult<()>;

    /// Scroll an element into view
    async fn scroll_into_view(&self, target: &ElementRef) -> VitrinaResult<()>;

    /// Press a key on an element, or on the focused element when `target` is None
    async fn press_key(&self, target: Option<&ElementRef>, key: Key) -> VitrinaResult<()>;

    /// The focused element, if any
    async fn active_element(&self) -> VitrinaResult<Option<ElementSnapshot>>;

    /// Outer HTML of an element
    async fn outer_html(&self, target: &ElementRef) -> VitrinaResult<String>;

    /// Evaluate a script expression and return its JSON value
    async fn execute_script(&self, script: &str) -> VitrinaResult<serde_json::Value>;

    /// Resize the viewport
    async fn set_viewport(&self, viewport: Viewport) -> VitrinaResult<()>;

    /// Full-page PNG
    async fn screenshot(&self) -> VitrinaResult<Vec<u8>>;

    /// Console entries captured since the last call
    async fn console_logs(&self) -> VitrinaResult<Vec<ConsoleEntry>>;

    /// End the session
    async fn close(&self) -> VitrinaResult<()>;
}

/// Produces one fresh driver per test
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Start a session configured from `config`
    async fn create(&self, config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>>;
}

/// Starts real browsers using whichever backends were compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveDriverFactory;

impl LiveDriverFactory {
    /// Create the factory
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DriverFactory for LiveDriverFactory {
    async fn create(&self, config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
        info!(
            browser = %config.browser,
            headless = config.headless,
            viewport = %config.viewport,
            "starting browser session"
        );
        match config.browser {
            BrowserKind::Chrome => launch_chrome(config).await,
            BrowserKind::Firefox => launch_firefox(config).await,
        }
    }
}

#[cfg(feature = "webdriver")]
async fn launch_chrome(config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
    #[cfg(feature = "browser")]
    if config.webdriver_url.is_none() {
        let driver = crate::browser::ChromiumDriver::launch(config).await?;
        return Ok(Box::new(driver));
    }
    let driver = crate::webdriver::WebDriverDriver::connect(config).await?;
    Ok(Box::new(driver))
}

#[cfg(all(feature = "browser", not(feature = "webdriver")))]
async fn launch_chrome(config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
    let driver = crate::browser::ChromiumDriver::launch(config).await?;
    Ok(Box::new(driver))
}

#[cfg(not(any(feature = "browser", feature = "webdriver")))]
async fn launch_chrome(_config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
    Err(VitrinaError::BrowserNotAvailable {
        browser: BrowserKind::Chrome.to_string(),
        feature: "browser".to_string(),
    })
}

#[cfg(feature = "webdriver")]
async fn launch_firefox(config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
    let driver = crate::webdriver::WebDriverDriver::connect(config).await?;
    Ok(Box::new(driver))
}

#[cfg(not(feature = "webdriver"))]
async fn launch_firefox(_config: &SuiteConfig) -> VitrinaResult<Box<dyn BrowserDriver>> {
    Err(VitrinaError::BrowserNotAvailable {
        browser: BrowserKind::Firefox.to_string(),
        feature: "webdriver".to_string(),
    })
}

/// Pick element `index` out of a query result
pub(crate) fn nth<T>(items: Vec<T>, target: &ElementRef) -> VitrinaResult<T> {
    let count = items.len();
    items.into_iter().nth(target.index).ok_or_else(|| VitrinaError::Driver {
        message: format!(
            "no element at index {} for {} ({count} matched)",
            target.index, target.css
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod element_ref_tests {
        use super::*;

        #[test]
        fn test_display_includes_index() {
            let target = ElementRef::new("[data-testid='blog-post-card-0']", 0);
            assert_eq!(target.to_string(), "[data-testid='blog-post-card-0'][0]");
        }

        #[test]
        fn test_nth_out_of_range_is_error() {
            let err = nth(vec![1, 2], &ElementRef::new("li", 5)).unwrap_err();
            assert!(err.to_string().contains("index 5"));
            assert!(err.to_string().contains("2 matched"));
        }

        #[test]
        fn test_nth_picks_index() {
            assert_eq!(nth(vec!['a', 'b', 'c'], &ElementRef::new("li", 1)).unwrap(), 'b');
        }
    }

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_clickable_needs_visible_and_enabled() {
            let mut snap = ElementSnapshot {
                visible: true,
                enabled: true,
                ..ElementSnapshot::default()
            };
            assert!(snap.is_clickable());
            snap.enabled = false;
            assert!(!snap.is_clickable());
        }

        #[test]
        fn test_value_attribute_prefers_control_value() {
            let mut snap = ElementSnapshot::default();
            snap.attributes.insert("value".to_string(), "initial".to_string());
            assert_eq!(snap.attribute("value").as_deref(), Some("initial"));
            snap.value = Some("typed".to_string());
            assert_eq!(snap.attribute("value").as_deref(), Some("typed"));
        }

        #[test]
        fn test_deserializes_from_page_script_shape() {
            let json = serde_json::json!({
                "tag": "button",
                "text": "Explore",
                "value": null,
                "visible": true,
                "enabled": true,
                "selected": false,
                "opacity": 1.0,
                "image_loaded": true,
                "attributes": {"data-testid": "explore-work-button"},
                "rect": {"x": 0.0, "y": 10.0, "width": 120.0, "height": 40.0}
            });
            let snap: ElementSnapshot = serde_json::from_value(json).unwrap();
            assert_eq!(snap.test_id(), Some("explore-work-button"));
            assert!(snap.is_opaque());
            assert!(snap.rect.unwrap().has_area());
        }
    }

    mod key_tests {
        use super::*;

        #[test]
        fn test_shift_tab_is_shifted_tab() {
            assert_eq!(Key::ShiftTab.dom_key(), "Tab");
            assert!(Key::ShiftTab.shifted());
            assert!(!Key::Tab.shifted());
        }

        #[test]
        fn test_webdriver_sequences() {
            assert_eq!(Key::Enter.webdriver_sequence(), "\u{E007}");
            assert!(Key::ShiftTab.webdriver_sequence().starts_with('\u{E008}'));
        }

        #[test]
        fn test_double_click_ends_with_dblclick() {
            assert_eq!(
                PointerAction::DoubleClick.dom_events().last(),
                Some(&"dblclick")
            );
        }
    }

    #[cfg(not(any(feature = "browser", feature = "webdriver")))]
    mod factory_tests {
        use super::*;

        #[tokio::test]
        async fn test_missing_backend_is_setup_error() {
            let err = LiveDriverFactory::new()
                .create(&SuiteConfig::default())
                .await
                .err()
                .unwrap();
            assert_eq!(err.category(), crate::result::ErrorCategory::Setup);
        }
    }
}
