//! Channel count normalisation
//!
//! Collapses color sources to luminance for grayscale buffers and broadcasts
//! grayscale sources into each of R, G and B for color buffers.

use std::path::Path;

use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::types::{ImageData, Pixel};

/// Rec. 709 luma weights, applied to values as stored.
pub const LUMINANCE_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_WEIGHTS[0] * r + LUMINANCE_WEIGHTS[1] * g + LUMINANCE_WEIGHTS[2] * b
}

/// Converts a decoded buffer into a typed buffer of `P::CHANNELS` channels.
///
/// Sources must have 1 or at least 3 channels. Channels past the third
/// (alpha, extra AOVs) are ignored.
pub fn to_image_data<P: Pixel>(decoded: &SampleBuffer, path: &Path) -> Result<ImageData<P>> {
    let source = decoded.channels;
    if source != 1 && source < 3 {
        return Err(ImageIoError::UnsupportedChannels {
            path: path.display().to_string(),
            channels: source,
        });
    }

    let pixel_count = decoded.width * decoded.height;
    if decoded.samples.len() != pixel_count * source {
        return Err(ImageIoError::DecodeError(format!(
            "{}: expected {} samples, decoder produced {}",
            path.display(),
            pixel_count * source,
            decoded.samples.len()
        )));
    }

    let data: Vec<P> = match (P::CHANNELS, source) {
        (1, 1) => decoded.samples.iter().map(|&v| P::from_normalized(&[v])).collect(),
        (1, _) => {
            debug!("Collapsing {} channels to luminance", source);
            decoded
                .samples
                .chunks_exact(source)
                .map(|px| P::from_normalized(&[luminance(px[0], px[1], px[2])]))
                .collect()
        }
        (_, 1) => {
            debug!("Broadcasting single channel to RGB");
            decoded
                .samples
                .iter()
                .map(|&v| P::from_normalized(&[v, v, v]))
                .collect()
        }
        _ => decoded
            .samples
            .chunks_exact(source)
            .map(|px| P::from_normalized(&px[..3]))
            .collect(),
    };

    ImageData::new(decoded.width, decoded.height, data)
}
