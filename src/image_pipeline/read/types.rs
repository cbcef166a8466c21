//! Decoder configuration and the normalised sample buffer shared by readers and writers

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::types::{Pixel, Sample, SampleType, check_buffer};

/// Output color encoding of decoded RAW files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawColorSpace {
    /// sRGB primaries with the sRGB transfer curve
    Srgb,
    /// sRGB primaries, linear values
    LinearSrgb,
}

/// Configuration applied when decoding camera RAW files
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Scale the image so that 1% of the pixels clip (exposure correction)
    pub auto_bright: bool,
    /// Apply the white balance recorded by the camera
    pub use_camera_wb: bool,
    /// Output color encoding
    pub color_space: RawColorSpace,
    /// Convert camera RGB to sRGB primaries using the embedded color matrix
    pub use_camera_matrix: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            auto_bright: false,
            use_camera_wb: true,
            color_space: RawColorSpace::Srgb,
            use_camera_matrix: true,
        }
    }
}

impl ReadOptions {
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::default()
    }
}

/// Builder for ReadOptions
#[derive(Default)]
pub struct ReadOptionsBuilder {
    auto_bright: Option<bool>,
    use_camera_wb: Option<bool>,
    color_space: Option<RawColorSpace>,
    use_camera_matrix: Option<bool>,
}

impl ReadOptionsBuilder {
    pub fn auto_bright(mut self, enable: bool) -> Self {
        self.auto_bright = Some(enable);
        self
    }

    pub fn use_camera_wb(mut self, enable: bool) -> Self {
        self.use_camera_wb = Some(enable);
        self
    }

    pub fn color_space(mut self, color_space: RawColorSpace) -> Self {
        self.color_space = Some(color_space);
        self
    }

    pub fn use_camera_matrix(mut self, enable: bool) -> Self {
        self.use_camera_matrix = Some(enable);
        self
    }

    pub fn build(self) -> ReadOptions {
        let default = ReadOptions::default();
        ReadOptions {
            auto_bright: self.auto_bright.unwrap_or(default.auto_bright),
            use_camera_wb: self.use_camera_wb.unwrap_or(default.use_camera_wb),
            color_space: self.color_space.unwrap_or(default.color_space),
            use_camera_matrix: self.use_camera_matrix.unwrap_or(default.use_camera_matrix),
        }
    }
}

/// Interleaved image with samples normalised to `f32`.
///
/// Integer sources are scaled to `0.0..=1.0`; float sources are kept as is.
/// `sample_type` records the storage type the samples came from (or should
/// be written as).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub sample_type: SampleType,
    pub samples: Vec<f32>,
}

impl SampleBuffer {
    /// Interleaves a typed buffer, normalising its samples.
    pub fn from_pixels<P: Pixel>(width: usize, height: usize, data: &[P]) -> Result<Self> {
        check_buffer(width, height, data.len())?;

        let mut samples = Vec::with_capacity(data.len() * P::CHANNELS);
        for &px in data {
            px.push_normalized(&mut samples);
        }

        Ok(Self {
            width,
            height,
            channels: P::CHANNELS,
            sample_type: <P::Sample as Sample>::TYPE,
            samples,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.width + x) * self.channels;
        &self.samples[start..start + self.channels]
    }
}
