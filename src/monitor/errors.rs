#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to enumerate displays: {message}")]
    EnumerationFailed { message: String },
}

impl MonitorError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MonitorError::EnumerationFailed { .. } => "MONITOR_ENUMERATION_FAILED",
        }
    }
}

/// Geometry for a single display could not be resolved.
///
/// Carries the rectangle the enumeration primitive delivered alongside the
/// display, if any, so the caller can still place an entry for it.
#[derive(Debug, thiserror::Error)]
#[error("Failed to resolve display geometry: {message}")]
pub struct GeometryError {
    pub message: String,
    pub fallback: Option<super::types::MonitorRect>,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture bounds are empty: {width}x{height}")]
    EmptyBounds { width: i32, height: i32 },

    #[error("Failed to acquire the screen device context")]
    ScreenDc,

    #[error("Failed to create an off-screen device context")]
    MemoryDc,

    #[error("Failed to create a {width}x{height} capture bitmap")]
    Bitmap { width: i32, height: i32 },

    #[error("Block copy from the screen failed: {message}")]
    Blit { message: String },

    #[error("Failed to read bitmap pixels")]
    ReadPixels,
}

impl CaptureError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CaptureError::EmptyBounds { .. } => "CAPTURE_EMPTY_BOUNDS",
            CaptureError::ScreenDc => "CAPTURE_SCREEN_DC",
            CaptureError::MemoryDc => "CAPTURE_MEMORY_DC",
            CaptureError::Bitmap { .. } => "CAPTURE_BITMAP",
            CaptureError::Blit { .. } => "CAPTURE_BLIT",
            CaptureError::ReadPixels => "CAPTURE_READ_PIXELS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("JPEG encoding failed: {message}")]
    Encode { message: String },

    #[error("Preview encoder did not answer in time")]
    Timeout,

    #[error("Preview encoder exited without a result")]
    WorkerGone,
}

impl PreviewError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreviewError::BufferSize { .. } => "PREVIEW_BUFFER_SIZE",
            PreviewError::Encode { .. } => "PREVIEW_ENCODE_FAILED",
            PreviewError::Timeout => "PREVIEW_TIMEOUT",
            PreviewError::WorkerGone => "PREVIEW_WORKER_GONE",
        }
    }
}
