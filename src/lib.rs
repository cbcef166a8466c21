//! Typed image file IO and pixel transforms.
//!
//! The free functions below use [`ImageIo::default()`]: RAW files are decoded
//! with camera white balance and color matrix into sRGB, EXR files are written
//! as PIZ-compressed half floats and JPEG files at quality 100.

pub mod image_pipeline;
pub mod logger;

use std::path::Path;

pub use image_pipeline::*;

/// Reads width, height, channel count and sample type of an image file.
pub fn read_image_spec<Q: AsRef<Path>>(path: Q) -> Result<ImageSpec> {
    ImageIo::default().read_image_spec(path)
}

/// Reads an image file into a `u8`, `Rgb8`, `f32` or `RgbF32` buffer.
pub fn read_image<P: Pixel, Q: AsRef<Path>>(path: Q) -> Result<ImageData<P>> {
    ImageIo::default().read_image(path)
}

/// Writes a `width x height` buffer; the format follows the file extension.
pub fn write_image<P: Pixel, Q: AsRef<Path>>(
    path: Q,
    width: usize,
    height: usize,
    data: &[P],
) -> Result<()> {
    ImageIo::default().write_image(path, width, height, data)
}

/// Transposes a `width x height` buffer in place. The result is `height x width`.
pub fn transpose_image<P: Pixel>(width: usize, height: usize, data: &mut [P]) -> Result<()> {
    transform::transpose_image(width, height, data)
}

/// Downscales by an integer factor with a named filter (`""` for the default).
pub fn resize_image<P: Pixel>(
    width: usize,
    height: usize,
    downscale: usize,
    input: &[P],
    filter: &str,
    filter_size: f32,
) -> Result<Vec<P>> {
    let filter = transform::resize_filter(filter)?;
    transform::resize_image(width, height, downscale, input, filter, filter_size)
}

/// Convolves with a named kernel of `kernel_width x kernel_height` pixels.
pub fn convolve_image<P>(
    width: usize,
    height: usize,
    input: &[P],
    kernel: &str,
    kernel_width: f32,
    kernel_height: f32,
) -> Result<Vec<P>>
where
    P: Pixel,
    f32: From<P::Sample>,
{
    transform::convolve_image(width, height, input, kernel, kernel_width, kernel_height)
}
