use crate::errors::{Result, VerifyError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    pub target_url: String,
    /// Accessible name of the heading that proves the page rendered.
    pub heading: String,
    pub navigation_timeout_ms: u64,
    pub visibility_timeout_ms: u64,
    /// Unconditional pause after the heading appears, so animations and
    /// late data fetches settle before the capture.
    pub settle_delay_ms: u64,
    pub success_path: PathBuf,
    pub error_path: PathBuf,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:5173".to_string(),
            heading: "Pendataan Absensi".to_string(),
            navigation_timeout_ms: 30_000,
            visibility_timeout_ms: 15_000,
            settle_delay_ms: 3_000,
            success_path: PathBuf::from("jules-scratch/verification/attendance_page_redesign.png"),
            error_path: PathBuf::from("jules-scratch/verification/error.png"),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            args: vec![],
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl VerifyConfig {
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.target_url)
            .map_err(|e| VerifyError::ConfigurationError(format!("invalid target URL: {}", e)))?;
        if self.heading.trim().is_empty() {
            return Err(VerifyError::ConfigurationError(
                "heading must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
