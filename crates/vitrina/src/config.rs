//! Suite configuration
//!
//! A single immutable [`SuiteConfig`] is resolved once per process and shared as
//! `Arc<SuiteConfig>` with every session and page object. Layers, lowest to highest:
//! defaults, optional YAML file, environment variables, command-line overrides.

use crate::result::{VitrinaError, VitrinaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default application URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:9002";

/// Default implicit wait (seconds)
pub const DEFAULT_IMPLICIT_WAIT_SECS: u64 = 10;

/// Default explicit wait used by page objects (seconds)
pub const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 15;

/// Default poll interval for waits (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default directory for screenshots
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Environment variable names
pub mod env {
    /// Application base URL
    pub const BASE_URL: &str = "BASE_URL";
    /// Headless flag
    pub const HEADLESS: &str = "HEADLESS";
    /// Browser kind
    pub const BROWSER: &str = "BROWSER";
    /// Implicit wait in seconds
    pub const IMPLICIT_WAIT: &str = "IMPLICIT_WAIT";
    /// Explicit wait in seconds
    pub const EXPLICIT_WAIT: &str = "EXPLICIT_WAIT";
    /// Window width
    pub const BROWSER_WIDTH: &str = "BROWSER_WIDTH";
    /// Window height
    pub const BROWSER_HEIGHT: &str = "BROWSER_HEIGHT";
    /// Screenshot directory
    pub const SCREENSHOT_DIR: &str = "SCREENSHOT_DIR";
    /// WebDriver endpoint
    pub const WEBDRIVER_URL: &str = "WEBDRIVER_URL";
    /// Chromium executable
    pub const CHROMIUM_PATH: &str = "CHROMIUM_PATH";

    /// Every variable the suite reads
    pub const ALL: [&str; 10] = [
        BASE_URL,
        HEADLESS,
        BROWSER,
        IMPLICIT_WAIT,
        EXPLICIT_WAIT,
        BROWSER_WIDTH,
        BROWSER_HEIGHT,
        SCREENSHOT_DIR,
        WEBDRIVER_URL,
        CHROMIUM_PATH,
    ];
}

// =============================================================================
// BROWSER KIND
// =============================================================================

/// Browser the suite drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    #[default]
    Chrome,
    /// Mozilla Firefox
    Firefox,
}

impl BrowserKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }

    /// Conventional local WebDriver endpoint for this browser
    #[must_use]
    pub const fn default_webdriver_url(self) -> &'static str {
        match self {
            Self::Chrome => "http://localhost:9515",
            Self::Firefox => "http://localhost:4444",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = VitrinaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(VitrinaError::config(format!(
                "unsupported browser '{other}' (expected chrome or firefox)"
            ))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VIEWPORT
// =============================================================================

/// Browser window size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Phone portrait
    pub const MOBILE: Self = Self::new(375, 667);
    /// Tablet portrait
    pub const TABLET: Self = Self::new(768, 1024);
    /// Small desktop, the suite default
    pub const DESKTOP: Self = Self::new(1024, 768);
    /// Wide desktop
    pub const WIDE: Self = Self::new(1280, 720);

    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Look up a named viewport (`mobile`, `tablet`, `desktop`, `wide`)
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mobile" => Some(Self::MOBILE),
            "tablet" => Some(Self::TABLET),
            "desktop" => Some(Self::DESKTOP),
            "wide" => Some(Self::WIDE),
            _ => None,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DESKTOP
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// SUITE CONFIG
// =============================================================================

/// Immutable configuration shared by every test in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Application root, without trailing slash
    pub base_url: String,
    /// Browser to drive
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Implicit element wait applied to WebDriver sessions
    #[serde(with = "duration_secs")]
    pub implicit_wait: Duration,
    /// Default budget for page-object waits
    #[serde(with = "duration_secs")]
    pub explicit_wait: Duration,
    /// Interval between wait probes
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,
    /// Initial window size
    pub viewport: Viewport,
    /// Where screenshots are written
    pub screenshot_dir: PathBuf,
    /// WebDriver endpoint (None = browser default)
    pub webdriver_url: Option<String>,
    /// Chromium executable (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: true,
            implicit_wait: Duration::from_secs(DEFAULT_IMPLICIT_WAIT_SECS),
            explicit_wait: Duration::from_secs(DEFAULT_EXPLICIT_WAIT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            viewport: Viewport::DESKTOP,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            webdriver_url: None,
            chromium_path: None,
        }
    }
}

impl SuiteConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> VitrinaResult<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Read a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: &Path) -> VitrinaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML text; missing keys keep their defaults
    pub fn from_yaml_str(text: &str) -> VitrinaResult<Self> {
        let file: FileConfig = serde_yaml_ng::from_str(text)?;
        Ok(file.apply(Self::default()).normalized())
    }

    /// Overlay values from an environment lookup
    pub fn with_env<F>(mut self, lookup: F) -> VitrinaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(env::BASE_URL) {
            self.base_url = url;
        }
        if let Some(flag) = get(env::HEADLESS) {
            self.headless = parse_flag(&flag);
        }
        if let Some(browser) = get(env::BROWSER) {
            self.browser = browser.parse()?;
        }
        if let Some(secs) = get(env::IMPLICIT_WAIT) {
            self.implicit_wait = Duration::from_secs(parse_number(env::IMPLICIT_WAIT, &secs)?);
        }
        if let Some(secs) = get(env::EXPLICIT_WAIT) {
            self.explicit_wait = Duration::from_secs(parse_number(env::EXPLICIT_WAIT, &secs)?);
        }
        if let Some(width) = get(env::BROWSER_WIDTH) {
            self.viewport.width = parse_number(env::BROWSER_WIDTH, &width)?;
        }
        if let Some(height) = get(env::BROWSER_HEIGHT) {
            self.viewport.height = parse_number(env::BROWSER_HEIGHT, &height)?;
        }
        if let Some(dir) = get(env::SCREENSHOT_DIR) {
            self.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(url) = get(env::WEBDRIVER_URL) {
            self.webdriver_url = Some(url);
        }
        if let Some(path) = get(env::CHROMIUM_PATH) {
            self.chromium_path = Some(path);
        }
        Ok(self.normalized())
    }

    /// Apply command-line overrides, the highest-precedence layer
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(headless) = overrides.headless {
            self.headless = headless;
        }
        if let Some(browser) = overrides.browser {
            self.browser = browser;
        }
        if let Some(ref url) = overrides.base_url {
            self.base_url.clone_from(url);
        }
        if let Some(ref dir) = overrides.screenshot_dir {
            self.screenshot_dir.clone_from(dir);
        }
        if let Some(ref url) = overrides.webdriver_url {
            self.webdriver_url = Some(url.clone());
        }
        self.normalized()
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self.normalized()
    }

    /// Set explicit wait
    #[must_use]
    pub const fn with_explicit_wait(mut self, wait: Duration) -> Self {
        self.explicit_wait = wait;
        self
    }

    /// Set poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set viewport
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Absolute URL for an application path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() {
            return format!("{}/", self.base_url);
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// WebDriver endpoint for the configured browser
    #[must_use]
    pub fn effective_webdriver_url(&self) -> &str {
        self.webdriver_url
            .as_deref()
            .unwrap_or_else(|| self.browser.default_webdriver_url())
    }

    /// Human-readable lines printed at session start
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Base URL: {}", self.base_url),
            format!("Browser: {}", self.browser),
            format!("Headless: {}", self.headless),
            format!("Viewport: {}", self.viewport),
            format!("Explicit wait: {}s", self.explicit_wait.as_secs()),
            format!("Screenshots: {}", self.screenshot_dir.display()),
        ]
    }

    fn normalized(mut self) -> Self {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        self
    }
}

/// Command-line overrides, each `None` when the flag was not given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--headless` / `--headed`
    pub headless: Option<bool>,
    /// `--browser`
    pub browser: Option<BrowserKind>,
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--screenshot-dir`
    pub screenshot_dir: Option<PathBuf>,
    /// `--webdriver-url`
    pub webdriver_url: Option<String>,
}

/// YAML file shape: every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    browser: Option<BrowserKind>,
    headless: Option<bool>,
    implicit_wait: Option<u64>,
    explicit_wait: Option<u64>,
    poll_interval_ms: Option<u64>,
    width: Option<u32>,
    height: Option<u32>,
    screenshot_dir: Option<PathBuf>,
    webdriver_url: Option<String>,
    chromium_path: Option<String>,
}

impl FileConfig {
    fn apply(self, mut config: SuiteConfig) -> SuiteConfig {
        if let Some(v) = self.base_url {
            config.base_url = v;
        }
        if let Some(v) = self.browser {
            config.browser = v;
        }
        if let Some(v) = self.headless {
            config.headless = v;
        }
        if let Some(v) = self.implicit_wait {
            config.implicit_wait = Duration::from_secs(v);
        }
        if let Some(v) = self.explicit_wait {
            config.explicit_wait = Duration::from_secs(v);
        }
        if let Some(v) = self.poll_interval_ms {
            config.poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = self.width {
            config.viewport.width = v;
        }
        if let Some(v) = self.height {
            config.viewport.height = v;
        }
        if let Some(v) = self.screenshot_dir {
            config.screenshot_dir = v;
        }
        if self.webdriver_url.is_some() {
            config.webdriver_url = self.webdriver_url;
        }
        if self.chromium_path.is_some() {
            config.chromium_path = self.chromium_path;
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> VitrinaResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| VitrinaError::config(format!("{key} must be a number, got '{value}'")))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

pub(crate) mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
