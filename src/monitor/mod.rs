pub mod capture;
pub mod enumerate;
pub mod errors;
pub mod preview;
pub mod types;

#[cfg(windows)]
pub use enumerate::Win32Displays;
pub use enumerate::{initial_resolution, list_monitors};
pub use preview::PreviewOptions;
pub use types::Monitor;
