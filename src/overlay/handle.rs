use super::errors::WindowError;

/// The operations placement and visibility need from the main window.
pub trait WindowHandle {
    fn set_position(&mut self, x: i32, y: i32) -> Result<(), WindowError>;
    fn set_size(&mut self, width: i32, height: i32) -> Result<(), WindowError>;
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), WindowError>;
    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError>;
    /// When `true`, pointer events pass through to whatever is behind the window.
    fn set_ignore_mouse_events(&mut self, ignore: bool) -> Result<(), WindowError>;
    fn focus(&mut self) -> Result<(), WindowError>;
}
