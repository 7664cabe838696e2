use crate::config::VerifyConfig;
use crate::core::BrowserTrait;
use crate::errors::{Result, VerifyError};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;

/// Chrome browser implementation
pub struct ChromeBrowser {
    browser: Option<Browser>,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self { browser: None }
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for ChromeBrowser {
    type TabHandle = Arc<Tab>;

    async fn launch(&mut self, config: &VerifyConfig) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.browser.viewport.width, config.browser.viewport.height
        );

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        for arg in &config.browser.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.browser.headless)
            .args(args)
            .build()
            .map_err(|e| VerifyError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| VerifyError::LaunchFailed(e.to_string()))?;

        self.browser = Some(browser);
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        let browser = self
            .browser
            .as_ref()
            .ok_or(VerifyError::BrowserNotLaunched)?;

        let tab = browser
            .new_tab()
            .map_err(|e| VerifyError::TabCreationFailed(e.to_string()))?;

        Ok(tab)
    }

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()> {
        tab.navigate_to(url)
            .map_err(|e| VerifyError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| VerifyError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| VerifyError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>> {
        // Clip to the document scroll extent so content below the fold is
        // included in the capture.
        let size_script = r#"
            (() => {
                const d = document.documentElement;
                return {
                    width: Math.max(d.scrollWidth, d.clientWidth),
                    height: Math.max(d.scrollHeight, d.clientHeight)
                };
            })()
        "#;
        let size = self.execute_script(tab, size_script).await?;
        let width = size.get("width").and_then(Value::as_f64).unwrap_or(0.0);
        let height = size.get("height").and_then(Value::as_f64).unwrap_or(0.0);

        let clip = if width > 0.0 && height > 0.0 {
            Some(Page::Viewport {
                x: 0.0,
                y: 0.0,
                width,
                height,
                scale: 1.0,
            })
        } else {
            None
        };

        let screenshot = tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, clip, true)
            .map_err(|e| VerifyError::ScreenshotFailed(e.to_string()))?;

        Ok(screenshot)
    }

    fn is_running(&self) -> bool {
        self.browser.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        self.browser = None;
        Ok(())
    }
}
