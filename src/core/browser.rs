use crate::config::VerifyConfig;
use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait BrowserTrait: Send + Sync {
    type TabHandle: Send + Sync;

    /// Launch a new browser instance
    async fn launch(&mut self, config: &VerifyConfig) -> Result<()>;

    /// Create a new tab/page
    async fn new_tab(&self) -> Result<Self::TabHandle>;

    /// Navigate to a URL and wait for the navigation to commit
    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()>;

    /// Execute JavaScript in the page and return its value
    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value>;

    /// Capture a full-page PNG screenshot
    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>>;

    /// Check if browser is still running
    fn is_running(&self) -> bool;

    /// Close the browser
    async fn close(&mut self) -> Result<()>;
}
