use crate::core::BrowserTrait;
use crate::errors::{Result, VerifyError};
use std::time::{Duration, Instant};

pub struct NavigationWatcher;

impl NavigationWatcher {
    /// Poll the page until the document finishes loading or the timeout
    /// elapses.
    pub async fn wait_for_load<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        timeout_ms: u64,
    ) -> Result<NavigationResult> {
        let start_time = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        let load_script = r#"
            (function() {
                return {
                    readyState: document.readyState,
                    url: window.location.href
                };
            })()
        "#;

        while start_time.elapsed() < timeout {
            match browser.execute_script(tab, load_script).await {
                Ok(result) => {
                    if let Some(obj) = result.as_object() {
                        let ready_state = obj
                            .get("readyState")
                            .and_then(|v| v.as_str())
                            .unwrap_or("");

                        if ready_state == "complete" {
                            return Ok(NavigationResult {
                                url: obj
                                    .get("url")
                                    .and_then(|v| v.as_str())
                                    .unwrap_or("")
                                    .to_string(),
                                ready_state: ready_state.to_string(),
                                duration_ms: start_time.elapsed().as_millis() as u64,
                            });
                        }
                    }
                }
                Err(_) => {
                    // Page may still be mid-navigation, keep polling
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(VerifyError::TimeoutError(format!(
            "page did not finish loading within {}ms",
            timeout_ms
        )))
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub ready_state: String,
    pub duration_ms: u64,
}
