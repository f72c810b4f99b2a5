use std::ffi::c_void;
use std::sync::{OnceLock, mpsc};
use std::time::Duration;

use tracing::{debug, info, warn};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, GetMonitorInfoW, HBRUSH,
    MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow, PAINTSTRUCT, UpdateWindow,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DispatchMessageW, GWL_EXSTYLE,
    GWL_STYLE, GetMessageW, GetWindowLongPtrW, GetWindowRect, HWND_NOTOPMOST, HWND_TOPMOST,
    IsWindow, LWA_COLORKEY, MSG, PostQuitMessage, RegisterClassW, SW_SHOW, SWP_FRAMECHANGED,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW,
    SET_WINDOW_POS_FLAGS, SetForegroundWindow, SetLayeredWindowAttributes, SetWindowLongPtrW,
    SetWindowPos, ShowWindow, TranslateMessage, WINDOW_EX_STYLE, WINDOW_STYLE, WM_DESTROY,
    WM_PAINT, WNDCLASSW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT,
    WS_OVERLAPPEDWINDOW, WS_POPUP, WS_VISIBLE,
};
use windows::core::PCWSTR;

use super::errors::WindowError;
use super::handle::WindowHandle;
use super::placement::OperatingMode;

const CLASS_NAME: &str = "GlassOverlayMainClass\0";
const WINDOW_TITLE: &str = "Glass Overlay\0";

/// Black is the layered colour key, so unpainted overlay areas are see-through.
const TRANSPARENT_KEY: COLORREF = COLORREF(0x00000000);

/// How long the creator waits for the window thread to report its handle.
const CREATION_TIMEOUT: Duration = Duration::from_secs(2);

static WINDOW_CLASS_ATOM: OnceLock<u16> = OnceLock::new();

// ─── Window procedure ───────────────────────────────────────────────────────

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        match msg {
            WM_PAINT => {
                let mut ps = PAINTSTRUCT::default();
                let hdc = BeginPaint(hwnd, &mut ps);
                if !hdc.is_invalid() {
                    let brush = CreateSolidBrush(TRANSPARENT_KEY);
                    if !brush.is_invalid() {
                        let _ = FillRect(hdc, &ps.rcPaint, brush);
                        let _ = DeleteObject(brush.into());
                    }
                    let _ = EndPaint(hwnd, &ps);
                }
                LRESULT(0)
            }
            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

// ─── Class registration ─────────────────────────────────────────────────────

/// Register the main window class. Idempotent.
pub fn register_window_class() -> Result<(), WindowError> {
    if WINDOW_CLASS_ATOM.get().is_some() {
        return Ok(());
    }

    let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();
    let wc = WNDCLASSW {
        lpfnWndProc: Some(wnd_proc),
        hInstance: HINSTANCE(std::ptr::null_mut()),
        lpszClassName: PCWSTR(class_name.as_ptr()),
        style: CS_HREDRAW | CS_VREDRAW,
        hbrBackground: HBRUSH(std::ptr::null_mut()),
        ..Default::default()
    };

    let atom = unsafe { RegisterClassW(&wc) };
    if atom == 0 {
        return Err(WindowError::os("RegisterClassW", "class registration failed"));
    }

    let _ = WINDOW_CLASS_ATOM.set(atom);
    Ok(())
}

// ─── Window creation ────────────────────────────────────────────────────────

fn styles_for(mode: OperatingMode) -> (WINDOW_EX_STYLE, WINDOW_STYLE) {
    match mode {
        // Layered, click-through, topmost, hidden from the taskbar.
        OperatingMode::Overlay => (
            WINDOW_EX_STYLE(
                WS_EX_LAYERED.0 | WS_EX_TRANSPARENT.0 | WS_EX_TOPMOST.0 | WS_EX_TOOLWINDOW.0,
            ),
            WS_POPUP,
        ),
        OperatingMode::Window => (WINDOW_EX_STYLE(0), WS_OVERLAPPEDWINDOW),
    }
}

/// Create the main window and run its message loop on the current thread.
fn run_main_window(
    mode: OperatingMode,
    width: i32,
    height: i32,
    hwnd_tx: mpsc::Sender<isize>,
) -> Result<(), WindowError> {
    unsafe {
        let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();
        let window_name: Vec<u16> = WINDOW_TITLE.encode_utf16().collect();
        let (ex_style, style) = styles_for(mode);

        let hwnd = CreateWindowExW(
            ex_style,
            PCWSTR(class_name.as_ptr()),
            PCWSTR(window_name.as_ptr()),
            style,
            0,
            0,
            width,
            height,
            None,
            None,
            Some(HINSTANCE(std::ptr::null_mut())),
            None,
        )
        .map_err(|e| WindowError::os("CreateWindowExW", e.message()))?;

        if mode.is_overlay() {
            let _ = SetLayeredWindowAttributes(hwnd, TRANSPARENT_KEY, 255, LWA_COLORKEY);
        }

        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);

        // The creator may have timed out already; the window still runs.
        let _ = hwnd_tx.send(hwnd.0 as isize);
        info!(event = "core.window.created", mode = ?mode, width = width, height = height);

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        info!(event = "core.window.message_loop_ended");
        Ok(())
    }
}

/// Spawn the main window on a dedicated thread and wait for its handle.
pub fn spawn_main_window(
    mode: OperatingMode,
    width: i32,
    height: i32,
) -> Result<Win32Window, WindowError> {
    register_window_class()?;

    let (tx, rx) = mpsc::channel::<isize>();
    std::thread::spawn(move || {
        if let Err(e) = run_main_window(mode, width, height, tx) {
            warn!(event = "core.window.thread_failed", code = e.error_code(), error = %e);
        }
    });

    let raw = rx.recv_timeout(CREATION_TIMEOUT).map_err(|e| match e {
        mpsc::RecvTimeoutError::Timeout => WindowError::CreationTimedOut {
            seconds: CREATION_TIMEOUT.as_secs(),
        },
        mpsc::RecvTimeoutError::Disconnected => WindowError::Closed,
    })?;

    Ok(Win32Window::from_raw(raw))
}

// ─── Window handle ──────────────────────────────────────────────────────────

/// Style and bounds to restore when leaving fullscreen.
#[derive(Clone, Copy, Debug)]
struct Restore {
    style: isize,
    rect: RECT,
}

/// The main window as seen from other threads.
///
/// The handle is kept as an integer so the value can cross threads; every
/// call goes through the OS, which marshals it to the window's own thread.
pub struct Win32Window {
    hwnd: isize,
    restore: Option<Restore>,
}

impl Win32Window {
    fn from_raw(hwnd: isize) -> Self {
        Self {
            hwnd,
            restore: None,
        }
    }

    fn hwnd(&self) -> HWND {
        HWND(self.hwnd as *mut c_void)
    }

    fn alive(&self) -> Result<HWND, WindowError> {
        let hwnd = self.hwnd();
        if unsafe { IsWindow(Some(hwnd)) }.as_bool() {
            Ok(hwnd)
        } else {
            Err(WindowError::Closed)
        }
    }

    fn set_pos(
        &self,
        insert_after: Option<HWND>,
        rect: (i32, i32, i32, i32),
        flags: SET_WINDOW_POS_FLAGS,
    ) -> Result<(), WindowError> {
        let hwnd = self.alive()?;
        let (x, y, w, h) = rect;
        unsafe { SetWindowPos(hwnd, insert_after, x, y, w, h, flags | SWP_NOACTIVATE) }
            .map_err(|e| WindowError::os("SetWindowPos", e.message()))
    }

    fn monitor_bounds(&self, hwnd: HWND) -> Result<RECT, WindowError> {
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
        if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
            return Err(WindowError::os("GetMonitorInfoW", "no monitor for window"));
        }
        Ok(info.rcMonitor)
    }
}

impl WindowHandle for Win32Window {
    fn set_position(&mut self, x: i32, y: i32) -> Result<(), WindowError> {
        self.set_pos(None, (x, y, 0, 0), SWP_NOSIZE | SWP_NOZORDER)
    }

    fn set_size(&mut self, width: i32, height: i32) -> Result<(), WindowError> {
        self.set_pos(None, (0, 0, width, height), SWP_NOMOVE | SWP_NOZORDER)
    }

    /// Borderless window covering the monitor the window currently sits on.
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), WindowError> {
        let hwnd = self.alive()?;

        match (fullscreen, self.restore) {
            (true, None) => {
                let mut rect = RECT::default();
                unsafe { GetWindowRect(hwnd, &mut rect) }
                    .map_err(|e| WindowError::os("GetWindowRect", e.message()))?;
                let style = unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) };
                self.restore = Some(Restore { style, rect });

                let bounds = self.monitor_bounds(hwnd)?;
                unsafe {
                    SetWindowLongPtrW(hwnd, GWL_STYLE, (WS_POPUP.0 | WS_VISIBLE.0) as isize);
                }
                self.set_pos(
                    None,
                    (
                        bounds.left,
                        bounds.top,
                        bounds.right - bounds.left,
                        bounds.bottom - bounds.top,
                    ),
                    SWP_NOZORDER | SWP_FRAMECHANGED,
                )?;
                debug!(event = "core.window.fullscreen_entered");
            }
            (false, Some(restore)) => {
                unsafe {
                    SetWindowLongPtrW(hwnd, GWL_STYLE, restore.style);
                }
                let rc = restore.rect;
                self.set_pos(
                    None,
                    (rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top),
                    SWP_NOZORDER | SWP_FRAMECHANGED,
                )?;
                self.restore = None;
                debug!(event = "core.window.fullscreen_left");
            }
            _ => {}
        }
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool) -> Result<(), WindowError> {
        let insert_after = if on_top { HWND_TOPMOST } else { HWND_NOTOPMOST };
        self.set_pos(
            Some(insert_after),
            (0, 0, 0, 0),
            SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW,
        )
    }

    fn set_ignore_mouse_events(&mut self, ignore: bool) -> Result<(), WindowError> {
        let hwnd = self.alive()?;
        let transparent = WS_EX_TRANSPARENT.0 as isize;
        unsafe {
            let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
            let updated = if ignore {
                ex_style | transparent | WS_EX_LAYERED.0 as isize
            } else {
                ex_style & !transparent
            };
            SetWindowLongPtrW(hwnd, GWL_EXSTYLE, updated);
        }
        self.set_pos(
            None,
            (0, 0, 0, 0),
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_FRAMECHANGED,
        )
    }

    fn focus(&mut self) -> Result<(), WindowError> {
        let hwnd = self.alive()?;
        if !unsafe { SetForegroundWindow(hwnd) }.as_bool() {
            return Err(WindowError::os(
                "SetForegroundWindow",
                "foreground change was refused",
            ));
        }
        Ok(())
    }
}
