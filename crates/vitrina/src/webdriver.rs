//! W3C WebDriver backend (chromedriver, geckodriver, Selenium Grid).
//!
//! Compiled with the `webdriver` feature. WebDriver has no portable log endpoint,
//! so console output is collected by a page shim that is re-installed after every
//! navigation; messages logged before the shim runs are not captured.

use crate::config::{BrowserKind, SuiteConfig, Viewport};
use crate::console::ConsoleEntry;
use crate::driver::{nth, BrowserDriver, ElementRef, ElementSnapshot, Key, PointerAction};
use crate::result::{VitrinaError, VitrinaResult};
use crate::script;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info, warn};

/// Session against a WebDriver endpoint
#[derive(Debug)]
pub struct WebDriverDriver {
    client: Client,
    browser: BrowserKind,
}

impl WebDriverDriver {
    /// Open a session at [`SuiteConfig::effective_webdriver_url`]
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::SessionSetup`] if the endpoint refuses the session
    pub async fn connect(config: &SuiteConfig) -> VitrinaResult<Self> {
        let url = config.effective_webdriver_url();
        info!(%url, browser = %config.browser, "connecting to webdriver");

        let client = ClientBuilder::native()
            .capabilities(capabilities(config))
            .connect(url)
            .await
            .map_err(|e| VitrinaError::setup(format!("{url}: {e}")))?;

        let driver = Self {
            client,
            browser: config.browser,
        };
        driver.set_viewport(config.viewport).await?;
        Ok(driver)
    }

    async fn element(&self, target: &ElementRef) -> VitrinaResult<Element> {
        let elements = self
            .client
            .find_all(Locator::Css(&target.css))
            .await
            .map_err(VitrinaError::driver)?;
        nth(elements, target)
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> VitrinaResult<T> {
        let value = self
            .client
            .execute(&format!("return {expr};"), vec![])
            .await
            .map_err(VitrinaError::driver)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn install_console_shim(&self) {
        if let Err(e) = self.client.execute(script::CONSOLE_SHIM, vec![]).await {
            debug!(error = %e, "console shim not installed");
        }
    }
}

/// Capabilities for the configured browser
pub(crate) fn capabilities(config: &SuiteConfig) -> serde_json::Map<String, serde_json::Value> {
    let Viewport { width, height } = config.viewport;
    let mut caps = serde_json::Map::new();

    match config.browser {
        BrowserKind::Chrome => {
            let mut args = vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
                format!("--window-size={width},{height}"),
            ];
            if config.headless {
                args.push("--headless=new".to_string());
            }
            caps.insert("browserName".to_string(), json!("chrome"));
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Firefox => {
            let mut args = vec![format!("--width={width}"), format!("--height={height}")];
            if config.headless {
                args.push("--headless".to_string());
            }
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
    }

    let implicit_ms = u64::try_from(config.implicit_wait.as_millis()).unwrap_or(u64::MAX);
    caps.insert("timeouts".to_string(), json!({ "implicit": implicit_ms }));
    caps
}

#[async_trait]
impl BrowserDriver for WebDriverDriver {
    fn backend(&self) -> &'static str {
        match self.browser {
            BrowserKind::Chrome => "webdriver-chrome",
            BrowserKind::Firefox => "webdriver-firefox",
        }
    }

    async fn navigate(&self, url: &str) -> VitrinaResult<()> {
        self.client
            .goto(url)
            .await
            .map_err(|e| VitrinaError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.install_console_shim().await;
        Ok(())
    }

    async fn current_url(&self) -> VitrinaResult<String> {
        Ok(self
            .client
            .current_url()
            .await
            .map_err(VitrinaError::driver)?
            .to_string())
    }

    async fn title(&self) -> VitrinaResult<String> {
        self.client.title().await.map_err(VitrinaError::driver)
    }

    async fn ready_state(&self) -> VitrinaResult<String> {
        self.eval(script::READY_STATE).await
    }

    async fn reload(&self) -> VitrinaResult<()> {
        self.client.refresh().await.map_err(VitrinaError::driver)?;
        self.install_console_shim().await;
        Ok(())
    }

    async fn go_back(&self) -> VitrinaResult<()> {
        self.client.back().await.map_err(VitrinaError::driver)?;
        self.install_console_shim().await;
        Ok(())
    }

    async fn query(&self, css: &str) -> VitrinaResult<Vec<ElementSnapshot>> {
        self.eval(&script::query(css)).await
    }

    async fn click(&self, target: &ElementRef) -> VitrinaResult<()> {
        self.element(target)
            .await?
            .click()
            .await
            .map_err(VitrinaError::driver)
    }

    async fn clear(&self, target: &ElementRef) -> VitrinaResult<()> {
        self.element(target)
            .await?
            .clear()
            .await
            .map_err(VitrinaError::driver)
    }

    async fn type_text(&self, target: &ElementRef, text: &str) -> VitrinaResult<()> {
        self.element(target)
            .await?
            .send_keys(text)
            .await
            .map_err(VitrinaError::driver)
    }

    async fn pointer(&self, target: &ElementRef, action: PointerAction) -> VitrinaResult<()> {
        let dispatched: bool = self.eval(&script::pointer(target, action)).await?;
        if dispatched {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }

    async fn scroll_into_view(&self, target: &ElementRef) -> VitrinaResult<()> {
        let scrolled: bool = self.eval(&script::scroll_into_view(target)).await?;
        if scrolled {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }

    async fn press_key(&self, target: Option<&ElementRef>, key: Key) -> VitrinaResult<()> {
        let element = match target {
            Some(target) => self.element(target).await?,
            None => self
                .client
                .active_element()
                .await
                .map_err(VitrinaError::driver)?,
        };
        element
            .send_keys(key.webdriver_sequence())
            .await
            .map_err(VitrinaError::driver)
    }

    async fn active_element(&self) -> VitrinaResult<Option<ElementSnapshot>> {
        self.eval(&script::active_element()).await
    }

    async fn outer_html(&self, target: &ElementRef) -> VitrinaResult<String> {
        self.element(target)
            .await?
            .html(false)
            .await
            .map_err(VitrinaError::driver)
    }

    async fn execute_script(&self, script: &str) -> VitrinaResult<serde_json::Value> {
        self.eval(&format!("({script})")).await
    }

    async fn set_viewport(&self, viewport: Viewport) -> VitrinaResult<()> {
        self.client
            .set_window_size(viewport.width, viewport.height)
            .await
            .map_err(VitrinaError::driver)?;
        debug!(%viewport, "window resized");
        Ok(())
    }

    async fn screenshot(&self) -> VitrinaResult<Vec<u8>> {
        self.client
            .screenshot()
            .await
            .map_err(|e| VitrinaError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn console_logs(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        let entries: Vec<ConsoleEntry> = self.eval(script::DRAIN_CONSOLE).await?;
        self.install_console_shim().await;
        Ok(entries)
    }

    async fn close(&self) -> VitrinaResult<()> {
        let result = self.client.clone().close().await;
        if let Err(ref e) = result {
            warn!(error = %e, "webdriver session did not close cleanly");
        }
        result.map_err(VitrinaError::driver)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    mod capability_tests {
        use super::*;

        #[test]
        fn test_chrome_headless_args() {
            let caps = capabilities(&SuiteConfig::default());
            let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
            assert!(args.contains(&json!("--headless=new")));
            assert!(args.contains(&json!("--window-size=1024,768")));
            assert!(args.contains(&json!("--no-sandbox")));
        }

        #[test]
        fn test_headed_chrome_has_no_headless_arg() {
            let mut config = SuiteConfig::default();
            config.headless = false;
            let caps = capabilities(&config);
            let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
            assert!(!args.iter().any(|a| a.as_str().unwrap().starts_with("--headless")));
        }

        #[test]
        fn test_firefox_size_args() {
            let mut config = SuiteConfig::default().with_viewport(Viewport::MOBILE);
            config.browser = BrowserKind::Firefox;
            let caps = capabilities(&config);
            let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
            assert!(args.contains(&json!("--width=375")));
            assert!(args.contains(&json!("--height=667")));
            assert!(args.contains(&json!("--headless")));
        }

        #[test]
        fn test_implicit_wait_capability() {
            let mut config = SuiteConfig::default();
            config.implicit_wait = Duration::from_secs(3);
            let caps = capabilities(&config);
            assert_eq!(caps["timeouts"]["implicit"], json!(3000));
        }
    }
}
