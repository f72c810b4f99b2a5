use tracing::{debug, info, warn};

use super::capture::ScreenCapture;
use super::errors::{GeometryError, MonitorError};
use super::preview::{PreviewOptions, encode_preview};
use super::types::{Monitor, MonitorRect};

/// Walks the displays attached to the machine.
pub trait DisplaySource {
    /// Call `visit` once per display, in whatever order the OS delivers them.
    ///
    /// Fails only when the walk itself cannot start.
    fn for_each_display(
        &self,
        visit: &mut dyn FnMut(Result<MonitorRect, GeometryError>),
    ) -> Result<(), MonitorError>;
}

/// Enumerate every attached monitor with a fresh preview of its contents.
///
/// The result is sorted by `origin_x` (stable). Labels keep the ordinal each
/// monitor was discovered at, so after sorting `"[2]"` may come first.
/// A monitor whose capture or encode fails is kept with an empty preview.
pub fn list_monitors<S>(source: &S, options: &PreviewOptions) -> Result<Vec<Monitor>, MonitorError>
where
    S: DisplaySource + ScreenCapture,
{
    info!(event = "core.monitor.enumeration_started");

    let mut monitors: Vec<Monitor> = Vec::new();
    source
        .for_each_display(&mut |geometry: Result<MonitorRect, GeometryError>| {
            let rect = match geometry {
                Ok(rect) => rect,
                Err(e) => match e.fallback {
                    Some(rect) => {
                        warn!(
                            event = "core.monitor.geometry_fallback",
                            error = %e.message
                        );
                        rect
                    }
                    None => {
                        warn!(event = "core.monitor.geometry_failed", error = %e.message);
                        return;
                    }
                },
            };

            if rect.is_empty() {
                warn!(
                    event = "core.monitor.empty_geometry_skipped",
                    width = rect.width(),
                    height = rect.height()
                );
                return;
            }

            let monitor = describe(source, rect, monitors.len() + 1, options);
            info!(
                event = "core.monitor.discovered",
                label = %monitor.display_label,
                x = monitor.origin_x,
                y = monitor.origin_y,
                has_preview = !monitor.preview.is_empty()
            );
            monitors.push(monitor);
        })
        .inspect_err(|e| {
            warn!(
                event = "core.monitor.enumeration_failed",
                code = e.error_code(),
                error = %e
            );
        })?;

    monitors.sort_by_key(|m| m.origin_x);

    info!(event = "core.monitor.enumeration_completed", count = monitors.len());
    Ok(monitors)
}

/// Width and height of the first enumerated monitor, used to size the
/// main window before any explicit placement.
pub fn initial_resolution(monitors: &[Monitor]) -> Option<(i32, i32)> {
    monitors.first().map(|m| (m.width, m.height))
}

fn describe<C: ScreenCapture + ?Sized>(
    capture: &C,
    rect: MonitorRect,
    ordinal: usize,
    options: &PreviewOptions,
) -> Monitor {
    let preview = match capture.capture(&rect) {
        Ok(buffer) => encode_preview(buffer, options),
        Err(e) => {
            warn!(
                event = "core.monitor.preview_failed",
                ordinal = ordinal,
                code = e.error_code(),
                error = %e
            );
            String::new()
        }
    };
    debug!(event = "core.monitor.preview_ready", ordinal = ordinal, bytes = preview.len());

    Monitor {
        display_label: format!("[{}] {}x{}", ordinal, rect.width(), rect.height()),
        width: rect.width(),
        height: rect.height(),
        origin_x: rect.left,
        origin_y: rect.top,
        preview,
    }
}

#[cfg(windows)]
pub use win32::Win32Displays;

#[cfg(windows)]
mod win32 {
    use windows::Win32::Foundation::{LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
    };

    use super::super::capture::{GdiCapture, ScreenCapture};
    use super::super::errors::CaptureError;
    use super::super::types::PixelBuffer;
    use super::{DisplaySource, GeometryError, MonitorError, MonitorRect};

    type Visitor<'a> = &'a mut dyn FnMut(Result<MonitorRect, GeometryError>);

    /// Live displays via `EnumDisplayMonitors`, captured through GDI.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Win32Displays {
        capture: GdiCapture,
    }

    impl Win32Displays {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ScreenCapture for Win32Displays {
        fn capture(&self, rect: &MonitorRect) -> Result<PixelBuffer, CaptureError> {
            self.capture.capture(rect)
        }
    }

    fn to_rect(rc: &RECT) -> MonitorRect {
        MonitorRect::new(rc.left, rc.top, rc.right, rc.bottom)
    }

    unsafe extern "system" fn enum_proc(
        hmonitor: HMONITOR,
        _hdc: HDC,
        rect: *mut RECT,
        lparam: LPARAM,
    ) -> windows::core::BOOL {
        unsafe {
            // LPARAM points at the visitor borrowed by `for_each_display`,
            // which outlives the synchronous EnumDisplayMonitors call.
            let visit = &mut *(lparam.0 as *mut Visitor<'_>);

            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };

            let geometry = if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
                Ok(to_rect(&info.rcMonitor))
            } else {
                Err(GeometryError {
                    message: "GetMonitorInfoW failed".to_string(),
                    fallback: rect.as_ref().map(to_rect),
                })
            };
            (*visit)(geometry);

            windows::core::BOOL(1) // continue enumeration
        }
    }

    impl DisplaySource for Win32Displays {
        fn for_each_display(
            &self,
            visit: &mut dyn FnMut(Result<MonitorRect, GeometryError>),
        ) -> Result<(), MonitorError> {
            let mut visitor: Visitor<'_> = visit;
            let ok = unsafe {
                EnumDisplayMonitors(
                    None,
                    None,
                    Some(enum_proc),
                    LPARAM(&mut visitor as *mut Visitor<'_> as isize),
                )
            };

            if !ok.as_bool() {
                return Err(MonitorError::EnumerationFailed {
                    message: "EnumDisplayMonitors returned FALSE".to_string(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::monitor::errors::CaptureError;
    use crate::monitor::types::PixelBuffer;

    /// Displays in a fixed discovery order, with optional capture failures.
    struct FakeDisplays {
        displays: Vec<Result<MonitorRect, GeometryError>>,
        failing_captures: Vec<MonitorRect>,
        captures: Cell<usize>,
        fail_start: bool,
    }

    impl FakeDisplays {
        fn with(rects: &[MonitorRect]) -> Self {
            Self {
                displays: rects.iter().copied().map(Ok).collect(),
                failing_captures: Vec::new(),
                captures: Cell::new(0),
                fail_start: false,
            }
        }
    }

    impl DisplaySource for FakeDisplays {
        fn for_each_display(
            &self,
            visit: &mut dyn FnMut(Result<MonitorRect, GeometryError>),
        ) -> Result<(), MonitorError> {
            if self.fail_start {
                return Err(MonitorError::EnumerationFailed {
                    message: "no display subsystem".to_string(),
                });
            }
            for display in &self.displays {
                let display = match display {
                    Ok(rect) => Ok(*rect),
                    Err(e) => Err(GeometryError {
                        message: e.message.clone(),
                        fallback: e.fallback,
                    }),
                };
                visit(display);
            }
            Ok(())
        }
    }

    impl ScreenCapture for FakeDisplays {
        fn capture(&self, rect: &MonitorRect) -> Result<PixelBuffer, CaptureError> {
            self.captures.set(self.captures.get() + 1);
            if self.failing_captures.contains(rect) {
                return Err(CaptureError::ReadPixels);
            }
            // Tiny fixed-size buffer; the encoder only sees what capture returns.
            Ok(PixelBuffer::new(2, 2, vec![0, 0, 255, 255].repeat(4)))
        }
    }

    fn options() -> PreviewOptions {
        PreviewOptions::default()
    }

    #[test]
    fn test_single_monitor_scenario() {
        let source = FakeDisplays::with(&[MonitorRect::new(0, 0, 1920, 1080)]);
        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(monitors.len(), 1);
        let m = &monitors[0];
        assert_eq!((m.origin_x, m.origin_y, m.width, m.height), (0, 0, 1920, 1080));
        assert_eq!(m.display_label, "[1] 1920x1080");
        assert!(m.preview.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_sorted_by_origin_but_labels_keep_discovery_order() {
        let source = FakeDisplays::with(&[
            MonitorRect::from_origin(1920, 0, 2560, 1440),
            MonitorRect::from_origin(0, 0, 1920, 1080),
        ]);
        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(monitors[0].origin_x, 0);
        assert_eq!(monitors[0].display_label, "[2] 1920x1080");
        assert_eq!(monitors[1].origin_x, 1920);
        assert_eq!(monitors[1].display_label, "[1] 2560x1440");
    }

    #[test]
    fn test_sort_is_ascending_and_stable() {
        let source = FakeDisplays::with(&[
            MonitorRect::from_origin(0, 1080, 1280, 1024),
            MonitorRect::from_origin(-1920, 0, 1920, 1080),
            MonitorRect::from_origin(0, 0, 1920, 1080),
            MonitorRect::from_origin(3840, 0, 1024, 768),
        ]);
        let monitors = list_monitors(&source, &options()).unwrap();

        for pair in monitors.windows(2) {
            assert!(pair[0].origin_x <= pair[1].origin_x);
        }
        assert!(monitors.iter().all(|m| m.width > 0 && m.height > 0));
        // Both monitors at x = 0 keep their encounter order.
        assert_eq!(monitors[1].display_label, "[1] 1280x1024");
        assert_eq!(monitors[2].display_label, "[3] 1920x1080");
    }

    #[test]
    fn test_capture_failure_keeps_monitor_with_empty_preview() {
        let broken = MonitorRect::from_origin(1920, 0, 1920, 1080);
        let mut source = FakeDisplays::with(&[MonitorRect::from_origin(0, 0, 1920, 1080), broken]);
        source.failing_captures.push(broken);

        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(monitors.len(), 2);
        assert!(!monitors[0].preview.is_empty());
        assert_eq!(monitors[1].preview, "");
        assert_eq!(monitors[1].width, 1920);
        assert_eq!(source.captures.get(), 2);
    }

    #[test]
    fn test_geometry_failure_uses_fallback_rect() {
        let mut source = FakeDisplays::with(&[MonitorRect::from_origin(0, 0, 1920, 1080)]);
        source.displays.push(Err(GeometryError {
            message: "GetMonitorInfoW failed".to_string(),
            fallback: Some(MonitorRect::from_origin(1920, 0, 1280, 720)),
        }));
        source.displays.push(Err(GeometryError {
            message: "GetMonitorInfoW failed".to_string(),
            fallback: None,
        }));

        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[1].display_label, "[2] 1280x720");
    }

    #[test]
    fn test_empty_geometry_is_skipped() {
        let source = FakeDisplays::with(&[
            MonitorRect::new(0, 0, 0, 0),
            MonitorRect::from_origin(0, 0, 800, 600),
        ]);
        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].display_label, "[1] 800x600");
    }

    #[test]
    fn test_enumeration_failure_is_reported() {
        let mut source = FakeDisplays::with(&[MonitorRect::from_origin(0, 0, 1920, 1080)]);
        source.fail_start = true;

        let err = list_monitors(&source, &options()).unwrap_err();
        assert_eq!(err.error_code(), "MONITOR_ENUMERATION_FAILED");
        assert_eq!(source.captures.get(), 0);
    }

    #[test]
    fn test_initial_resolution_is_first_monitor() {
        let source = FakeDisplays::with(&[
            MonitorRect::from_origin(2560, 0, 1920, 1080),
            MonitorRect::from_origin(0, 0, 2560, 1440),
        ]);
        let monitors = list_monitors(&source, &options()).unwrap();

        assert_eq!(initial_resolution(&monitors), Some((2560, 1440)));
        assert_eq!(initial_resolution(&[]), None);
    }
}
