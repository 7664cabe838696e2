use crate::core::BrowserTrait;
use crate::errors::{Result, VerifyError};
use std::time::{Duration, Instant};

pub struct HeadingWatcher;

impl HeadingWatcher {
    /// Poll the page until a heading whose accessible name exactly matches
    /// `name` is rendered and visible, or the timeout elapses.
    ///
    /// Headings are h1-h6 plus any element with role="heading". The
    /// accessible name is aria-label, aria-labelledby text, or the
    /// whitespace-collapsed text content, in that order.
    pub async fn wait_for_visible<B: BrowserTrait>(
        browser: &B,
        tab: &B::TabHandle,
        name: &str,
        timeout_ms: u64,
    ) -> Result<()> {
        let start_time = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let probe = Self::probe_script(name)?;

        while start_time.elapsed() < timeout {
            match browser.execute_script(tab, &probe).await {
                Ok(result) => {
                    let visible = result
                        .get("visible")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    if visible {
                        return Ok(());
                    }
                }
                Err(_) => {
                    // Transient evaluation failures happen while the app is
                    // still mounting, keep polling
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(VerifyError::HeadingNotVisible(format!(
            "heading \"{}\" did not become visible within {}ms",
            name, timeout_ms
        )))
    }

    fn probe_script(name: &str) -> Result<String> {
        // serde_json gives us a correctly escaped JS string literal
        let literal = serde_json::to_string(name)?;
        Ok(format!(
            r#"
            (function() {{
                const wanted = {literal};
                const accessibleName = (el) => {{
                    const aria = el.getAttribute('aria-label');
                    if (aria && aria.trim()) return aria.trim();
                    const labelledBy = el.getAttribute('aria-labelledby');
                    if (labelledBy) {{
                        const parts = labelledBy.split(/\s+/)
                            .map(id => document.getElementById(id))
                            .filter(Boolean)
                            .map(n => (n.textContent || '').trim())
                            .filter(t => t.length > 0);
                        if (parts.length) return parts.join(' ');
                    }}
                    return (el.textContent || '').trim().replace(/\s+/g, ' ');
                }};
                const isVisible = (el) => {{
                    const style = window.getComputedStyle(el);
                    if (style.display === 'none') return false;
                    if (style.visibility === 'hidden') return false;
                    if (parseFloat(style.opacity) === 0) return false;
                    const rect = el.getBoundingClientRect();
                    return rect.width > 0 && rect.height > 0;
                }};
                const headings = Array.from(
                    document.querySelectorAll('h1,h2,h3,h4,h5,h6,[role="heading"]')
                );
                const match = headings.find(el => accessibleName(el) === wanted);
                return {{
                    found: !!match,
                    visible: !!(match && isVisible(match))
                }};
            }})()
            "#
        ))
    }
}
