use tracing::{error, info};
use verishot::{ChromeBrowser, RunOutcome, VerificationRunner, VerifyConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = VerifyConfig::default();
    let runner = VerificationRunner::new(ChromeBrowser::new(), config);

    // Verification failures are reported through logs and the diagnostic
    // screenshot; the process exits 0 either way.
    match runner.run().await {
        Ok(RunOutcome::Verified { screenshot }) => {
            info!("Screenshot saved to {}", screenshot.display());
        }
        Ok(RunOutcome::Failed { error, screenshot }) => {
            match screenshot {
                Some(path) => error!(
                    "verification failed: {} (diagnostic screenshot: {})",
                    error,
                    path.display()
                ),
                None => error!("verification failed: {} (no diagnostic screenshot)", error),
            }
        }
        Err(e) => {
            error!("could not start verification: {}", e);
        }
    }
}
