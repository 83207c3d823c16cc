//! Chromium backend over the Chrome DevTools Protocol.
//!
//! Compiled with the `browser` feature. One `ChromiumDriver` owns one browser
//! process and a single page; the CDP handler loop and the console listeners run
//! as background tasks that are aborted on [`BrowserDriver::close`].

use crate::config::{SuiteConfig, Viewport};
use crate::console::{ConsoleEntry, LogLevel};
use crate::driver::{nth, BrowserDriver, ElementRef, ElementSnapshot, Key, PointerAction};
use crate::result::{VitrinaError, VitrinaResult};
use crate::script;
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::log::{EnableParams as LogEnableParams, EventEntryAdded};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type ConsoleSink = Arc<StdMutex<Vec<ConsoleEntry>>>;

/// Chrome/Chromium session driven through CDP
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    handle: JoinHandle<()>,
    listeners: Vec<JoinHandle<()>>,
    console: ConsoleSink,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page sized to the configured viewport
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::SessionSetup`] if the browser cannot be started
    pub async fn launch(config: &SuiteConfig) -> VitrinaResult<Self> {
        let Viewport { width, height } = config.viewport;
        let mut builder = CdpConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .window_size(width, height);

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(VitrinaError::setup)?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(VitrinaError::setup)?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(VitrinaError::setup)?;

        let console: ConsoleSink = Arc::new(StdMutex::new(Vec::new()));
        let listeners = attach_console(&page, &console).await?;

        let driver = Self {
            browser: Arc::new(Mutex::new(browser)),
            page,
            handle,
            listeners,
            console,
        };
        driver.set_viewport(config.viewport).await?;
        info!(headless = config.headless, "chromium session ready");
        Ok(driver)
    }

    async fn element(&self, target: &ElementRef) -> VitrinaResult<Element> {
        let elements = self
            .page
            .find_elements(target.css.as_str())
            .await
            .map_err(VitrinaError::driver)?;
        nth(elements, target)
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> VitrinaResult<T> {
        self.page
            .evaluate(expr)
            .await
            .map_err(VitrinaError::driver)?
            .into_value()
            .map_err(VitrinaError::driver)
    }

    async fn dispatch_key(&self, key: Key) -> VitrinaResult<()> {
        let modifiers = if key.shifted() { 8 } else { 0 };
        let text = match key {
            Key::Enter => Some("\r"),
            Key::Space => Some(" "),
            _ => None,
        };

        let mut down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key(key.dom_key())
            .code(key.dom_code())
            .windows_virtual_key_code(key.virtual_key_code())
            .modifiers(modifiers);
        if let Some(text) = text {
            down = down.text(text);
        }
        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key.dom_key())
            .code(key.dom_code())
            .windows_virtual_key_code(key.virtual_key_code())
            .modifiers(modifiers);

        for params in [down, up] {
            let params = params.build().map_err(VitrinaError::driver)?;
            self.page
                .execute(params)
                .await
                .map_err(VitrinaError::driver)?;
        }
        Ok(())
    }
}

async fn attach_console(page: &CdpPage, sink: &ConsoleSink) -> VitrinaResult<Vec<JoinHandle<()>>> {
    page.execute(LogEnableParams::default())
        .await
        .map_err(VitrinaError::setup)?;

    let mut log_events = page
        .event_listener::<EventEntryAdded>()
        .await
        .map_err(VitrinaError::setup)?;
    let log_sink = Arc::clone(sink);
    let log_task = tokio::spawn(async move {
        while let Some(event) = log_events.next().await {
            let entry = ConsoleEntry::new(
                LogLevel::from_console_name(event.entry.level.as_ref()),
                event.entry.text.clone(),
            )
            .with_source(event.entry.source.as_ref());
            push(&log_sink, entry);
        }
    });

    let mut api_events = page
        .event_listener::<EventConsoleApiCalled>()
        .await
        .map_err(VitrinaError::setup)?;
    let api_sink = Arc::clone(sink);
    let api_task = tokio::spawn(async move {
        while let Some(event) = api_events.next().await {
            let message = event
                .args
                .iter()
                .map(|arg| match (&arg.value, &arg.description) {
                    (Some(serde_json::Value::String(s)), _) => s.clone(),
                    (Some(other), _) => other.to_string(),
                    (None, Some(desc)) => desc.clone(),
                    (None, None) => String::new(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            let entry = ConsoleEntry::new(LogLevel::from_console_name(event.r#type.as_ref()), message)
                .with_source("console-api");
            push(&api_sink, entry);
        }
    });

    Ok(vec![log_task, api_task])
}

fn push(sink: &ConsoleSink, entry: ConsoleEntry) {
    if entry.level == LogLevel::Severe {
        debug!(message = %entry.message, "browser console error");
    }
    if let Ok(mut entries) = sink.lock() {
        entries.push(entry);
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    fn backend(&self) -> &'static str {
        "chromium"
    }

    async fn navigate(&self, url: &str) -> VitrinaResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| VitrinaError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> VitrinaResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(VitrinaError::driver)?
            .unwrap_or_default())
    }

    async fn title(&self) -> VitrinaResult<String> {
        Ok(self
            .page
            .get_title()
            .await
            .map_err(VitrinaError::driver)?
            .unwrap_or_default())
    }

    async fn ready_state(&self) -> VitrinaResult<String> {
        self.eval(script::READY_STATE.to_string()).await
    }

    async fn reload(&self) -> VitrinaResult<()> {
        self.page.reload().await.map_err(VitrinaError::driver)?;
        Ok(())
    }

    async fn go_back(&self) -> VitrinaResult<()> {
        self.execute_script(script::HISTORY_BACK).await?;
        Ok(())
    }

    async fn query(&self, css: &str) -> VitrinaResult<Vec<ElementSnapshot>> {
        self.eval(script::query(css)).await
    }

    async fn click(&self, target: &ElementRef) -> VitrinaResult<()> {
        self.element(target)
            .await?
            .click()
            .await
            .map_err(VitrinaError::driver)?;
        Ok(())
    }

    async fn clear(&self, target: &ElementRef) -> VitrinaResult<()> {
        let cleared: bool = self.eval(script::clear(target)).await?;
        if cleared {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }

    async fn type_text(&self, target: &ElementRef, text: &str) -> VitrinaResult<()> {
        let element = self.element(target).await?;
        element.focus().await.map_err(VitrinaError::driver)?;
        element.type_str(text).await.map_err(VitrinaError::driver)?;
        Ok(())
    }

    async fn pointer(&self, target: &ElementRef, action: PointerAction) -> VitrinaResult<()> {
        if action == PointerAction::Hover {
            self.element(target)
                .await?
                .hover()
                .await
                .map_err(VitrinaError::driver)?;
            return Ok(());
        }
        let dispatched: bool = self.eval(script::pointer(target, action)).await?;
        if dispatched {
            Ok(())
        } else {
            Err(VitrinaError::NotInteractable {
                locator: target.to_string(),
            })
        }
    }

    async fn scroll_into_view(&self, target: &ElementRef) -> VitrinaResult<()> {
        self.element(target)
            .await?
            .scroll_into_view()
            .await
            .map_err(VitrinaError::driver)?;
        Ok(())
    }

    async fn press_key(&self, target: Option<&ElementRef>, key: Key) -> VitrinaResult<()> {
        if let Some(target) = target {
            self.element(target)
                .await?
                .focus()
                .await
                .map_err(VitrinaError::driver)?;
        }
        self.dispatch_key(key).await
    }

    async fn active_element(&self) -> VitrinaResult<Option<ElementSnapshot>> {
        self.eval(script::active_element()).await
    }

    async fn outer_html(&self, target: &ElementRef) -> VitrinaResult<String> {
        let html: Option<String> = self.eval(script::outer_html(target)).await?;
        html.ok_or_else(|| VitrinaError::ElementNotFound {
            locator: target.to_string(),
            timeout_ms: 0,
        })
    }

    async fn execute_script(&self, script: &str) -> VitrinaResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(VitrinaError::driver)?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn set_viewport(&self, viewport: Viewport) -> VitrinaResult<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(viewport.width))
            .height(i64::from(viewport.height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(VitrinaError::driver)?;
        self.page
            .execute(params)
            .await
            .map_err(VitrinaError::driver)?;
        debug!(%viewport, "viewport set");
        Ok(())
    }

    async fn screenshot(&self) -> VitrinaResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(true)
            .build();

        let screenshot = self
            .page
            .execute(params)
            .await
            .map_err(|e| VitrinaError::Screenshot {
                message: e.to_string(),
            })?;

        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| VitrinaError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn console_logs(&self) -> VitrinaResult<Vec<ConsoleEntry>> {
        let mut entries = self
            .console
            .lock()
            .map_err(|_| VitrinaError::driver("console buffer lock poisoned"))?;
        Ok(std::mem::take(&mut *entries))
    }

    async fn close(&self) -> VitrinaResult<()> {
        for listener in &self.listeners {
            listener.abort();
        }
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        if let Err(ref e) = closed {
            warn!(error = %e, "chromium did not close cleanly");
        }
        let _ = browser.wait().await;
        self.handle.abort();
        closed.map(|_| ()).map_err(VitrinaError::driver)
    }
}
