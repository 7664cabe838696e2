pub mod browser;
pub mod config;
pub mod core;
pub mod errors;
pub mod runner;
pub mod testing;

pub use browser::ChromeBrowser;
pub use config::{BrowserConfig, VerifyConfig, Viewport};
pub use crate::core::BrowserTrait;
pub use errors::VerifyError;
pub use runner::{RunOutcome, VerificationRunner};
