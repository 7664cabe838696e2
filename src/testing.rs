//! Scripted browser double for exercising the runner and watchers without a
//! real Chrome process.

use crate::config::VerifyConfig;
use crate::core::BrowserTrait;
use crate::errors::{Result, VerifyError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub struct FakeBrowser {
    navigation_error: Option<String>,
    tab_error: Option<String>,
    page_ready: bool,
    /// Number of visibility polls that report not-visible before the heading
    /// appears. `None` means the heading never becomes visible.
    heading_visible_after_polls: Option<u32>,
    screenshot_error: bool,
    visibility_polls: AtomicU32,
    launched: bool,
    close_calls: CloseCallCount,
}

#[derive(Clone)]
pub struct CloseCallCount(Arc<AtomicU32>);

impl CloseCallCount {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            navigation_error: None,
            tab_error: None,
            page_ready: true,
            heading_visible_after_polls: Some(0),
            screenshot_error: false,
            visibility_polls: AtomicU32::new(0),
            launched: false,
            close_calls: CloseCallCount(Arc::new(AtomicU32::new(0))),
        }
    }

    pub fn with_navigation_error(mut self, message: &str) -> Self {
        self.navigation_error = Some(message.to_string());
        self
    }

    pub fn with_tab_error(mut self, message: &str) -> Self {
        self.tab_error = Some(message.to_string());
        self
    }

    pub fn with_page_never_ready(mut self) -> Self {
        self.page_ready = false;
        self
    }

    pub fn with_heading_never_visible(mut self) -> Self {
        self.heading_visible_after_polls = None;
        self
    }

    pub fn with_heading_visible_after_polls(mut self, polls: u32) -> Self {
        self.heading_visible_after_polls = Some(polls);
        self
    }

    pub fn with_screenshot_error(mut self) -> Self {
        self.screenshot_error = true;
        self
    }

    pub fn close_call_count(&self) -> CloseCallCount {
        self.close_calls.clone()
    }
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for FakeBrowser {
    type TabHandle = ();

    async fn launch(&mut self, _config: &VerifyConfig) -> Result<()> {
        self.launched = true;
        Ok(())
    }

    async fn new_tab(&self) -> Result<Self::TabHandle> {
        if let Some(message) = &self.tab_error {
            return Err(VerifyError::TabCreationFailed(message.clone()));
        }
        Ok(())
    }

    async fn navigate(&self, _tab: &Self::TabHandle, _url: &str) -> Result<()> {
        if let Some(message) = &self.navigation_error {
            return Err(VerifyError::NavigationFailed(message.clone()));
        }
        Ok(())
    }

    async fn execute_script(&self, _tab: &Self::TabHandle, script: &str) -> Result<Value> {
        if script.contains("readyState") {
            let state = if self.page_ready { "complete" } else { "loading" };
            return Ok(json!({
                "readyState": state,
                "url": "http://localhost:5173/",
            }));
        }
        if script.contains("accessibleName") {
            let poll = self.visibility_polls.fetch_add(1, Ordering::SeqCst);
            let visible = match self.heading_visible_after_polls {
                Some(after) => poll >= after,
                None => false,
            };
            return Ok(json!({ "found": visible, "visible": visible }));
        }
        Ok(Value::Null)
    }

    async fn take_screenshot(&self, _tab: &Self::TabHandle) -> Result<Vec<u8>> {
        if self.screenshot_error {
            return Err(VerifyError::ScreenshotFailed(
                "target crashed".to_string(),
            ));
        }
        // Minimal PNG signature is enough for the file-writing paths
        Ok(vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }

    fn is_running(&self) -> bool {
        self.launched
    }

    async fn close(&mut self) -> Result<()> {
        self.close_calls.0.fetch_add(1, Ordering::SeqCst);
        self.launched = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_browser_lifecycle() {
        let mut browser = FakeBrowser::new();
        let close_calls = browser.close_call_count();
        assert!(!browser.is_running());

        browser.launch(&VerifyConfig::default()).await.unwrap();
        assert!(browser.is_running());

        browser.close().await.unwrap();
        assert!(!browser.is_running());
        assert_eq!(close_calls.get(), 1);
    }
}
