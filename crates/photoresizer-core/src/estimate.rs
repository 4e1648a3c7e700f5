//! Closed-form output size prediction.
//!
//! The estimate is a heuristic meant to give the user an order-of-magnitude
//! idea of the result before anything is transcoded. It scales the source
//! byte size by the pixel-count ratio and, for lossy formats, by the
//! requested quality. It makes no claim of accuracy beyond that.

use crate::consts::WEBP_SIZE_FACTOR;
use crate::format::OutputFormat;

/// Pixel-count ratio between the target and the original resolution.
///
/// Returns `None` when either original dimension is zero.
pub fn resolution_ratio(
    original_width: u32,
    original_height: u32,
    target_width: u32,
    target_height: u32,
) -> Option<f64> {
    let original_pixels = original_width as f64 * original_height as f64;
    if original_pixels == 0.0 {
        return None;
    }
    Some(target_width as f64 * target_height as f64 / original_pixels)
}

/// Predict the output size in bytes, rounded to the nearest byte.
///
/// Returns 0 whenever the original size or either original dimension is
/// unknown (zero).
pub fn estimate_size(
    original_size: u64,
    original_width: u32,
    original_height: u32,
    target_width: u32,
    target_height: u32,
    quality: u8,
    format: OutputFormat,
) -> u64 {
    if original_size == 0 {
        return 0;
    }
    let Some(ratio) = resolution_ratio(original_width, original_height, target_width, target_height)
    else {
        return 0;
    };

    let quality_factor = quality as f64 / 100.0;
    let scaled = original_size as f64 * ratio;
    let predicted = match format {
        OutputFormat::Png => scaled,
        OutputFormat::Jpeg => scaled * quality_factor,
        OutputFormat::Webp => scaled * quality_factor * WEBP_SIZE_FACTOR,
    };

    predicted.round().max(0.0) as u64
}
