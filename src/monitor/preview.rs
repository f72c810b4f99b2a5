use std::io::Cursor;
use std::sync::mpsc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage, imageops};
use tracing::{debug, warn};

use super::errors::PreviewError;
use super::types::PixelBuffer;

/// Scheme every preview payload starts with. UI consumers parse on this.
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// How previews are compressed and how long the caller waits for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Previews wider than this are downscaled, aspect preserved.
    pub max_width: Option<u32>,
    /// `None` waits for the encoder indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            max_width: Some(480),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// Encode a captured buffer into a preview data URI.
///
/// Compression runs on its own thread while the caller blocks on a
/// single-slot channel for the answer. Any failure yields an empty string.
pub fn encode_preview(buffer: PixelBuffer, options: &PreviewOptions) -> String {
    match encode_on_worker(buffer, options) {
        Ok(uri) => uri,
        Err(e) => {
            warn!(
                event = "core.preview.encode_failed",
                code = e.error_code(),
                error = %e
            );
            String::new()
        }
    }
}

fn encode_on_worker(buffer: PixelBuffer, options: &PreviewOptions) -> Result<String, PreviewError> {
    let worker_options = *options;
    wait_for_worker(
        move || encode_data_uri(&buffer, &worker_options),
        options.timeout,
    )
}

fn wait_for_worker<F>(job: F, timeout: Option<Duration>) -> Result<String, PreviewError>
where
    F: FnOnce() -> Result<String, PreviewError> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    std::thread::spawn(move || {
        // The receiver may already have given up after a timeout.
        let _ = tx.send(job());
    });

    match timeout {
        Some(timeout) => rx.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => PreviewError::Timeout,
            mpsc::RecvTimeoutError::Disconnected => PreviewError::WorkerGone,
        })?,
        None => rx.recv().map_err(|_| PreviewError::WorkerGone)?,
    }
}

/// Synchronous encode: BGRA to RGBA, optional downscale, JPEG, base64.
pub fn encode_data_uri(
    buffer: &PixelBuffer,
    options: &PreviewOptions,
) -> Result<String, PreviewError> {
    let jpeg = encode_jpeg(buffer, options)?;
    debug!(
        event = "core.preview.encoded",
        width = buffer.width,
        height = buffer.height,
        jpeg_bytes = jpeg.len()
    );
    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(jpeg)))
}

/// Extract the JPEG bytes from a preview data URI.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let payload = uri.strip_prefix(DATA_URI_PREFIX)?;
    STANDARD.decode(payload).ok()
}

fn encode_jpeg(buffer: &PixelBuffer, options: &PreviewOptions) -> Result<Vec<u8>, PreviewError> {
    let rgba = bgra_to_rgba(buffer)?;
    let image = match options.max_width {
        Some(max_width) if max_width > 0 && rgba.width() > max_width => {
            let height = scaled_height(rgba.width(), rgba.height(), max_width);
            imageops::thumbnail(&rgba, max_width, height)
        }
        _ => rgba,
    };

    // JPEG carries no alpha; the channel is dropped, not blended.
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, options.quality.clamp(1, 100))
        .write_image(&rgb, rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        })?;

    Ok(out.into_inner())
}

fn bgra_to_rgba(buffer: &PixelBuffer) -> Result<RgbaImage, PreviewError> {
    let expected = PixelBuffer::expected_len(buffer.width, buffer.height);
    if buffer.bgra.len() != expected {
        return Err(PreviewError::BufferSize {
            expected,
            actual: buffer.bgra.len(),
        });
    }

    let mut pixels = buffer.bgra.clone();
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    RgbaImage::from_raw(buffer.width, buffer.height, pixels).ok_or(PreviewError::BufferSize {
        expected,
        actual: buffer.bgra.len(),
    })
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = u64::from(height) * u64::from(target_width) / u64::from(width);
    (scaled as u32).max(1)
}
