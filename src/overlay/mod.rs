pub mod errors;
pub mod handle;
pub mod placement;
#[cfg(windows)]
pub mod window;

pub use placement::{OperatingMode, PlacementController};
#[cfg(windows)]
pub use window::{Win32Window, spawn_main_window};
