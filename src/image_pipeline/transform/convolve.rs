use imageproc::filter::Kernel;
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::transform::kernel::ConvolutionKernel;
use crate::image_pipeline::types::{Pixel, Sample, check_buffer, from_image_buffer, to_image_buffer};

/// Convolves a `width x height` buffer with a named kernel of the given footprint.
///
/// Accumulation is done in `f32`, samples past the border repeat the edge
/// pixel. Byte results are rounded and clamped to `0..=255`. Footprints wider
/// than `2 * width + 1` (or taller than `2 * height + 1`) only ever sample
/// repeated edge pixels and are rejected.
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
    check_buffer(width, height, input.len())?;
    let kernel: ConvolutionKernel = kernel.parse()?;
    if kernel_width > (2 * width + 1) as f32 || kernel_height > (2 * height + 1) as f32 {
        return Err(ImageIoError::InvalidKernelSize(kernel_width, kernel_height));
    }
    let weights = kernel.weights(kernel_width, kernel_height)?;

    debug!(
        "Convolving {}x{} with {:?} ({}x{} taps)",
        width, height, kernel, weights.width, weights.height
    );

    let image = to_image_buffer(width, height, input)?;
    let taps = Kernel::new(&weights.data, weights.width as u32, weights.height as u32);
    let filtered: image::ImageBuffer<P::Native, Vec<P::Sample>> =
        taps.filter(&image, |out: &mut P::Sample, v: f32| {
            *out = <P::Sample as Sample>::saturate(v)
        });

    Ok(from_image_buffer::<P>(&filtered))
}
