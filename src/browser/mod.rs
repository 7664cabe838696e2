pub mod chrome;
pub mod navigation;
pub mod visibility;

pub use chrome::ChromeBrowser;
pub use navigation::{NavigationResult, NavigationWatcher};
pub use visibility::HeadingWatcher;
