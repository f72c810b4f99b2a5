use tracing::{debug, info, warn};

use super::errors::{PlacementError, WindowError};
use super::handle::WindowHandle;
use crate::monitor::Monitor;

/// How the main window behaves, fixed for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    /// Click-through, always-on-top overlay layered over other applications.
    Overlay,
    /// Ordinary interactive application window.
    Window,
}

impl OperatingMode {
    pub fn is_overlay(self) -> bool {
        self == OperatingMode::Overlay
    }
}

/// Owns the main window and remembers whether it has been placed yet.
///
/// All calls must come from one logical pathway (the UI thread); the
/// controller takes `&mut self` so the borrow checker enforces that.
pub struct PlacementController<W> {
    window: W,
    mode: OperatingMode,
    placed: bool,
    click_through: bool,
}

impl<W: WindowHandle> PlacementController<W> {
    pub fn new(window: W, mode: OperatingMode) -> Self {
        Self {
            window,
            mode,
            placed: false,
            click_through: mode.is_overlay(),
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn has_been_placed(&self) -> bool {
        self.placed
    }

    /// Whether pointer events currently pass through the window.
    pub fn is_click_through(&self) -> bool {
        self.click_through
    }

    /// Move and resize the main window to cover `monitors[index]`.
    ///
    /// An out-of-range index is rejected without touching the window or
    /// the placement state. Outside overlay mode, the very first placement
    /// leaves fullscreen before moving, and every placement ends fullscreen
    /// and always-on-top.
    pub fn place_on_monitor(
        &mut self,
        index: usize,
        monitors: &[Monitor],
    ) -> Result<(), PlacementError> {
        let Some(monitor) = monitors.get(index) else {
            warn!(
                event = "core.placement.invalid_index",
                index = index,
                count = monitors.len()
            );
            return Err(PlacementError::InvalidIndex {
                index,
                count: monitors.len(),
            });
        };

        let overlay = self.mode.is_overlay();
        if !self.placed && !overlay {
            // Window managers resist resizing a window that is already fullscreen.
            debug!(event = "core.placement.leave_fullscreen");
            self.window.set_fullscreen(false)?;
        }

        self.window.set_position(monitor.origin_x, monitor.origin_y)?;
        self.window.set_size(monitor.width, monitor.height)?;

        if !overlay {
            self.window.set_fullscreen(true)?;
            self.window.set_always_on_top(true)?;
        }

        let first = !self.placed;
        self.placed = true;

        info!(
            event = "core.placement.completed",
            index = index,
            label = %monitor.display_label,
            x = monitor.origin_x,
            y = monitor.origin_y,
            width = monitor.width,
            height = monitor.height,
            first_placement = first
        );
        Ok(())
    }

    /// Let clicks pass through the window. No-op in window mode.
    pub fn blur(&mut self) -> Result<(), WindowError> {
        if !self.mode.is_overlay() {
            debug!(event = "core.visibility.blur_skipped", reason = "window_mode");
            return Ok(());
        }
        self.window.set_ignore_mouse_events(true)?;
        self.click_through = true;
        info!(event = "core.visibility.blurred");
        Ok(())
    }

    /// Intercept pointer events again and take input focus. No-op in window mode.
    pub fn focus(&mut self) -> Result<(), WindowError> {
        if !self.mode.is_overlay() {
            debug!(event = "core.visibility.focus_skipped", reason = "window_mode");
            return Ok(());
        }
        self.window.set_ignore_mouse_events(false)?;
        self.click_through = false;
        self.window.focus()?;
        info!(event = "core.visibility.focused");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Position(i32, i32),
        Size(i32, i32),
        Fullscreen(bool),
        AlwaysOnTop(bool),
        IgnoreMouse(bool),
        Focus,
    }

    #[derive(Default)]
    struct RecordingWindow {
        calls: Vec<Call>,
        fail_size: bool,
        fail_focus: bool,
    }

    impl WindowHandle for RecordingWindow {
        fn set_position(&mut self, x: i32, y: i32) -> Result<(), WindowError> {
            self.calls.push(Call::Position(x, y));
            Ok(())
        }

        fn set_size(&mut self, width: i32, height: i32) -> Result<(), WindowError> {
            if self.fail_size {
                return Err(WindowError::os("SetWindowPos", "access denied"));
            }
            self.calls.push(Call::Size(width, height));
            Ok(())
        }

        fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), WindowError> {
            self.calls.push(Call::Fullscreen(fullscreen));
            Ok(())
        }

        fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError> {
            self.calls.push(Call::AlwaysOnTop(on_top));
            Ok(())
        }

        fn set_ignore_mouse_events(&mut self, ignore: bool) -> Result<(), WindowError> {
            self.calls.push(Call::IgnoreMouse(ignore));
            Ok(())
        }

        fn focus(&mut self) -> Result<(), WindowError> {
            if self.fail_focus {
                return Err(WindowError::os("SetForegroundWindow", "foreground lock"));
            }
            self.calls.push(Call::Focus);
            Ok(())
        }
    }

    fn monitor(x: i32, width: i32, height: i32) -> Monitor {
        Monitor {
            display_label: format!("[1] {}x{}", width, height),
            width,
            height,
            origin_x: x,
            origin_y: 0,
            preview: String::new(),
        }
    }

    fn two_monitors() -> Vec<Monitor> {
        vec![monitor(0, 1920, 1080), monitor(1920, 2560, 1440)]
    }

    #[test]
    fn test_first_placement_in_window_mode_leaves_fullscreen_first() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Window);
        assert!(!controller.has_been_placed());

        controller.place_on_monitor(1, &two_monitors()).unwrap();

        assert!(controller.has_been_placed());
        assert_eq!(
            controller.window.calls,
            vec![
                Call::Fullscreen(false),
                Call::Position(1920, 0),
                Call::Size(2560, 1440),
                Call::Fullscreen(true),
                Call::AlwaysOnTop(true),
            ]
        );
    }

    #[test]
    fn test_second_placement_skips_fullscreen_detoggle() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Window);
        let monitors = two_monitors();
        controller.place_on_monitor(0, &monitors).unwrap();
        controller.window.calls.clear();

        controller.place_on_monitor(1, &monitors).unwrap();

        assert_eq!(
            controller.window.calls,
            vec![
                Call::Position(1920, 0),
                Call::Size(2560, 1440),
                Call::Fullscreen(true),
                Call::AlwaysOnTop(true),
            ]
        );
    }

    #[test]
    fn test_overlay_placement_only_moves_and_resizes() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Overlay);
        let monitors = two_monitors();

        controller.place_on_monitor(0, &monitors).unwrap();
        controller.place_on_monitor(1, &monitors).unwrap();

        assert!(controller.has_been_placed());
        assert_eq!(
            controller.window.calls,
            vec![
                Call::Position(0, 0),
                Call::Size(1920, 1080),
                Call::Position(1920, 0),
                Call::Size(2560, 1440),
            ]
        );
    }

    #[test]
    fn test_out_of_range_index_changes_nothing() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Window);

        let err = controller.place_on_monitor(2, &two_monitors()).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidIndex { index: 2, count: 2 }));

        let err = controller.place_on_monitor(0, &[]).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidIndex { index: 0, count: 0 }));

        assert!(!controller.has_been_placed());
        assert!(controller.window.calls.is_empty());
    }

    #[test]
    fn test_failed_placement_stays_unplaced() {
        let window = RecordingWindow {
            fail_size: true,
            ..RecordingWindow::default()
        };
        let mut controller = PlacementController::new(window, OperatingMode::Overlay);

        let err = controller.place_on_monitor(0, &two_monitors()).unwrap_err();
        assert_eq!(err.error_code(), "WINDOW_OS_CALL_FAILED");
        assert!(!controller.has_been_placed());
    }

    #[test]
    fn test_blur_and_focus_are_noops_in_window_mode() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Window);

        controller.blur().unwrap();
        controller.focus().unwrap();

        assert!(controller.window.calls.is_empty());
    }

    #[test]
    fn test_blur_and_focus_toggle_click_through_in_overlay_mode() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Overlay);

        controller.blur().unwrap();
        controller.focus().unwrap();

        assert_eq!(
            controller.window.calls,
            vec![Call::IgnoreMouse(true), Call::IgnoreMouse(false), Call::Focus]
        );
        assert!(!controller.has_been_placed());
    }

    #[test]
    fn test_refused_focus_still_records_mouse_capture() {
        let window = RecordingWindow {
            fail_focus: true,
            ..RecordingWindow::default()
        };
        let mut controller = PlacementController::new(window, OperatingMode::Overlay);
        assert!(controller.is_click_through());

        let err = controller.focus().unwrap_err();
        assert_eq!(err.error_code(), "WINDOW_OS_CALL_FAILED");
        assert!(!controller.is_click_through());
        assert_eq!(controller.window.calls, vec![Call::IgnoreMouse(false)]);

        controller.blur().unwrap();
        assert!(controller.is_click_through());
    }

    #[test]
    fn test_window_mode_never_reports_click_through() {
        let mut controller =
            PlacementController::new(RecordingWindow::default(), OperatingMode::Window);
        controller.blur().unwrap();
        assert!(!controller.is_click_through());
    }
}
