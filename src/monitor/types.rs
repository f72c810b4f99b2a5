use serde::Serialize;

/// A connected display as seen by one enumeration pass.
///
/// Values are rebuilt on every call to [`list_monitors`](super::list_monitors)
/// and carry no identity beyond that call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// `"[<ordinal>] <width>x<height>"`, ordinal taken from discovery order.
    pub display_label: String,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// X coordinate of the top-left corner in virtual-screen space.
    pub origin_x: i32,
    /// Y coordinate of the top-left corner in virtual-screen space.
    pub origin_y: i32,
    /// `data:image/jpeg;base64,...` thumbnail, or empty when capture failed.
    pub preview: String,
}

/// Display geometry in virtual-desktop coordinates, edges as the OS reports them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonitorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl MonitorRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[cfg(test)]
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Raw top-down BGRA pixels, 4 bytes per pixel, no row padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, bgra: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bgra,
        }
    }

    /// Number of bytes a buffer of this size must hold.
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }
}
