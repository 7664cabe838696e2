use crate::browser::{HeadingWatcher, NavigationWatcher};
use crate::config::VerifyConfig;
use crate::core::BrowserTrait;
use crate::errors::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Drives one verification pass: navigate, wait for the heading, settle,
/// capture. Every verification failure is caught here and turned into a
/// diagnostic screenshot; the browser is closed on all exit paths.
pub struct VerificationRunner<B: BrowserTrait> {
    browser: B,
    config: VerifyConfig,
}

#[derive(Debug)]
pub enum RunOutcome {
    Verified {
        screenshot: PathBuf,
    },
    Failed {
        error: String,
        screenshot: Option<PathBuf>,
    },
}

impl<B: BrowserTrait> VerificationRunner<B> {
    pub fn new(browser: B, config: VerifyConfig) -> Self {
        Self { browser, config }
    }

    /// Run the verification once. Launch and tab-creation failures surface
    /// as `Err`; failures during verification itself are caught and reported
    /// in the outcome. The browser close is issued exactly once either way.
    pub async fn run(mut self) -> Result<RunOutcome> {
        self.config.validate()?;

        self.browser.launch(&self.config).await?;

        let tab = match self.browser.new_tab().await {
            Ok(tab) => tab,
            Err(e) => {
                let _ = self.browser.close().await;
                return Err(e);
            }
        };

        let outcome = match self.verify(&tab).await {
            Ok(screenshot) => RunOutcome::Verified { screenshot },
            Err(e) => {
                error!("An error occurred: {}", e);
                let screenshot = self.capture_diagnostic(&tab).await;
                RunOutcome::Failed {
                    error: e.to_string(),
                    screenshot,
                }
            }
        };

        self.browser.close().await?;

        Ok(outcome)
    }

    async fn verify(&self, tab: &B::TabHandle) -> Result<PathBuf> {
        info!(url = %self.config.target_url, "navigating");
        self.browser.navigate(tab, &self.config.target_url).await?;
        NavigationWatcher::wait_for_load(&self.browser, tab, self.config.navigation_timeout_ms)
            .await?;

        info!(heading = %self.config.heading, "waiting for heading");
        HeadingWatcher::wait_for_visible(
            &self.browser,
            tab,
            &self.config.heading,
            self.config.visibility_timeout_ms,
        )
        .await?;

        // Let animations and late data fetches settle before capturing
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let png = self.browser.take_screenshot(tab).await?;
        write_screenshot(&self.config.success_path, &png)?;
        info!(path = %self.config.success_path.display(), "screenshot saved");

        Ok(self.config.success_path.clone())
    }

    /// Best-effort capture after a failure. Not guarded further: if the page
    /// is unusable we log and move on without an error screenshot.
    async fn capture_diagnostic(&self, tab: &B::TabHandle) -> Option<PathBuf> {
        let png = match self.browser.take_screenshot(tab).await {
            Ok(png) => png,
            Err(e) => {
                warn!("diagnostic screenshot failed: {}", e);
                return None;
            }
        };
        if let Err(e) = write_screenshot(&self.config.error_path, &png) {
            warn!("could not write diagnostic screenshot: {}", e);
            return None;
        }
        info!(path = %self.config.error_path.display(), "diagnostic screenshot saved");
        Some(self.config.error_path.clone())
    }
}

fn write_screenshot(path: &Path, png: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VerifyError;
    use crate::testing::FakeBrowser;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> VerifyConfig {
        VerifyConfig {
            navigation_timeout_ms: 500,
            visibility_timeout_ms: 500,
            settle_delay_ms: 0,
            success_path: dir.path().join("verified.png"),
            error_path: dir.path().join("error.png"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn happy_path_writes_success_screenshot_only() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let browser = FakeBrowser::new();
        let close_calls = browser.close_call_count();

        let outcome = VerificationRunner::new(browser, config.clone())
            .run()
            .await
            .unwrap();

        match outcome {
            RunOutcome::Verified { screenshot } => assert_eq!(screenshot, config.success_path),
            other => panic!("expected Verified, got {:?}", other),
        }
        assert!(config.success_path.exists());
        assert!(!config.error_path.exists());
        assert_eq!(close_calls.get(), 1);
    }

    #[tokio::test]
    async fn navigation_failure_writes_diagnostic_screenshot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let browser = FakeBrowser::new().with_navigation_error("connection refused");
        let close_calls = browser.close_call_count();

        let outcome = VerificationRunner::new(browser, config.clone())
            .run()
            .await
            .unwrap();

        match outcome {
            RunOutcome::Failed { error, screenshot } => {
                assert!(error.contains("connection refused"));
                assert_eq!(screenshot, Some(config.error_path.clone()));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(!config.success_path.exists());
        assert!(config.error_path.exists());
        assert_eq!(close_calls.get(), 1);
    }

    #[tokio::test]
    async fn missing_heading_takes_failure_path() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let browser = FakeBrowser::new().with_heading_never_visible();
        let close_calls = browser.close_call_count();

        let outcome = VerificationRunner::new(browser, config.clone())
            .run()
            .await
            .unwrap();

        match outcome {
            RunOutcome::Failed { error, screenshot } => {
                assert!(error.contains("did not become visible"));
                assert!(screenshot.is_some());
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(!config.success_path.exists());
        assert!(config.error_path.exists());
        assert_eq!(close_calls.get(), 1);
    }

    #[tokio::test]
    async fn diagnostic_capture_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let browser = FakeBrowser::new()
            .with_heading_never_visible()
            .with_screenshot_error();
        let close_calls = browser.close_call_count();

        let outcome = VerificationRunner::new(browser, config.clone())
            .run()
            .await
            .unwrap();

        match outcome {
            RunOutcome::Failed { screenshot, .. } => assert!(screenshot.is_none()),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(!config.error_path.exists());
        assert_eq!(close_calls.get(), 1);
    }

    #[tokio::test]
    async fn tab_creation_failure_still_closes_browser() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let browser = FakeBrowser::new().with_tab_error("no connection");
        let close_calls = browser.close_call_count();

        let err = VerificationRunner::new(browser, config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::TabCreationFailed(_)));
        assert_eq!(close_calls.get(), 1);
    }

    #[tokio::test]
    async fn repeated_runs_overwrite_the_same_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        for _ in 0..2 {
            let browser = FakeBrowser::new();
            let outcome = VerificationRunner::new(browser, config.clone())
                .run()
                .await
                .unwrap();
            assert!(matches!(outcome, RunOutcome::Verified { .. }));
        }

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_launch() {
        let dir = TempDir::new().unwrap();
        let config = VerifyConfig {
            target_url: "::nope::".to_string(),
            ..test_config(&dir)
        };
        let browser = FakeBrowser::new();
        let close_calls = browser.close_call_count();

        let err = VerificationRunner::new(browser, config)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::ConfigurationError(_)));
        assert_eq!(close_calls.get(), 0);
    }
}
