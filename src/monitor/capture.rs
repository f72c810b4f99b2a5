use super::errors::CaptureError;
use super::types::{MonitorRect, PixelBuffer};

/// Reads the current contents of a region of the virtual screen.
pub trait ScreenCapture {
    /// Copy `rect` into a top-down BGRA buffer of exactly `width * height * 4` bytes.
    fn capture(&self, rect: &MonitorRect) -> Result<PixelBuffer, CaptureError>;
}

/// Validate capture bounds before any OS resource is acquired.
pub fn capture_size(rect: &MonitorRect) -> Result<(u32, u32), CaptureError> {
    if rect.is_empty() {
        return Err(CaptureError::EmptyBounds {
            width: rect.width(),
            height: rect.height(),
        });
    }
    Ok((rect.width() as u32, rect.height() as u32))
}

#[cfg(windows)]
pub use gdi::GdiCapture;

#[cfg(windows)]
mod gdi {
    use std::mem;

    use tracing::{debug, warn};
    use windows::Win32::Graphics::Gdi::{
        BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
        DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, HBITMAP, HDC, HGDIOBJ,
        ReleaseDC, SRCCOPY, SelectObject,
    };

    use super::{CaptureError, MonitorRect, PixelBuffer, ScreenCapture, capture_size};

    /// Captures through GDI: screen DC, compatible memory DC + bitmap, `BitBlt`, `GetDIBits`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct GdiCapture;

    // ─── Scoped GDI handles ─────────────────────────────────────────────────

    /// Device context for the whole virtual screen, released on drop.
    struct ScreenDc(HDC);

    impl ScreenDc {
        fn acquire() -> Result<Self, CaptureError> {
            let hdc = unsafe { GetDC(None) };
            if hdc.is_invalid() {
                return Err(CaptureError::ScreenDc);
            }
            Ok(Self(hdc))
        }
    }

    impl Drop for ScreenDc {
        fn drop(&mut self) {
            if unsafe { ReleaseDC(None, self.0) } == 0 {
                warn!(event = "core.capture.release_dc_failed");
            }
        }
    }

    /// Off-screen device context, deleted on drop.
    struct MemoryDc(HDC);

    impl MemoryDc {
        fn compatible_with(screen: &ScreenDc) -> Result<Self, CaptureError> {
            let hdc = unsafe { CreateCompatibleDC(Some(screen.0)) };
            if hdc.is_invalid() {
                return Err(CaptureError::MemoryDc);
            }
            Ok(Self(hdc))
        }
    }

    impl Drop for MemoryDc {
        fn drop(&mut self) {
            if !unsafe { DeleteDC(self.0) }.as_bool() {
                warn!(event = "core.capture.delete_dc_failed");
            }
        }
    }

    /// Bitmap compatible with the screen, deleted on drop.
    ///
    /// Must be dropped after it has been deselected from any DC.
    struct Bitmap(HBITMAP);

    impl Bitmap {
        fn compatible_with(
            screen: &ScreenDc,
            width: i32,
            height: i32,
        ) -> Result<Self, CaptureError> {
            let hbm = unsafe { CreateCompatibleBitmap(screen.0, width, height) };
            if hbm.is_invalid() {
                return Err(CaptureError::Bitmap { width, height });
            }
            Ok(Self(hbm))
        }
    }

    impl Drop for Bitmap {
        fn drop(&mut self) {
            if !unsafe { DeleteObject(self.0.into()) }.as_bool() {
                warn!(event = "core.capture.delete_bitmap_failed");
            }
        }
    }

    /// Keeps `bitmap` selected into `dc` and restores the previous object on drop.
    struct Selection<'a> {
        dc: &'a MemoryDc,
        previous: HGDIOBJ,
    }

    impl<'a> Selection<'a> {
        fn select(dc: &'a MemoryDc, bitmap: &Bitmap) -> Self {
            let previous = unsafe { SelectObject(dc.0, bitmap.0.into()) };
            Self { dc, previous }
        }
    }

    impl Drop for Selection<'_> {
        fn drop(&mut self) {
            unsafe {
                SelectObject(self.dc.0, self.previous);
            }
        }
    }

    // ─── Capture ────────────────────────────────────────────────────────────

    impl ScreenCapture for GdiCapture {
        fn capture(&self, rect: &MonitorRect) -> Result<PixelBuffer, CaptureError> {
            let (width, height) = capture_size(rect)?;
            let (w, h) = (rect.width(), rect.height());

            // Declaration order fixes drop order: selection, bitmap, memory DC, screen DC.
            let screen = ScreenDc::acquire()?;
            let memory = MemoryDc::compatible_with(&screen)?;
            let bitmap = Bitmap::compatible_with(&screen, w, h)?;
            let selection = Selection::select(&memory, &bitmap);

            unsafe { BitBlt(memory.0, 0, 0, w, h, Some(screen.0), rect.left, rect.top, SRCCOPY) }
                .map_err(|e| CaptureError::Blit {
                    message: e.to_string(),
                })?;

            // GetDIBits requires the bitmap not be selected into a DC.
            drop(selection);

            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: w,
                    biHeight: -h, // top-down
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bgra = vec![0u8; PixelBuffer::expected_len(width, height)];
            let rows = unsafe {
                GetDIBits(
                    memory.0,
                    bitmap.0,
                    0,
                    height,
                    Some(bgra.as_mut_ptr().cast()),
                    &mut info,
                    DIB_RGB_COLORS,
                )
            };
            if rows == 0 {
                return Err(CaptureError::ReadPixels);
            }

            debug!(
                event = "core.capture.completed",
                x = rect.left,
                y = rect.top,
                width = width,
                height = height
            );
            Ok(PixelBuffer::new(width, height, bgra))
        }
    }
}
