use image::{ImageBuffer, Luma};
use imageproc::filter::separable_filter;
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::transform::filter::FilterShape;
use crate::image_pipeline::types::{Pixel, check_buffer, image_dimensions};

type Plane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Parses a resize filter name; the empty string selects `lanczos3`.
pub fn resize_filter(name: &str) -> Result<FilterShape> {
    if name.trim().is_empty() {
        return Ok(FilterShape::default());
    }
    FilterShape::from_name(name).ok_or_else(|| ImageIoError::UnknownFilter(name.to_string()))
}

/// Output dimensions of a downscale by an integer factor.
pub fn downscaled_size(width: usize, height: usize, downscale: usize) -> Result<(usize, usize)> {
    if downscale == 0 {
        return Err(ImageIoError::InvalidDimensions(width, height));
    }

    let size = (width / downscale, height / downscale);
    if size.0 == 0 || size.1 == 0 {
        return Err(ImageIoError::InvalidDimensions(size.0, size.1));
    }
    Ok(size)
}

/// 1D resampling taps for a downscale by `downscale`.
///
/// The footprint is `filter_width` output pixels, i.e. `filter_width *
/// downscale` source pixels. Even factors put the output centre between two
/// source pixels, so their tap grid is shifted by half a pixel and has an even
/// length. Taps past `2 * extent + 1` would only see repeated edge pixels.
fn resample_taps(filter: FilterShape, filter_width: f32, downscale: usize, extent: usize) -> Vec<f32> {
    let radius = filter_width * 0.5 * downscale as f32;
    let even = downscale % 2 == 0;
    let reach = (radius.ceil() as usize + 1).min(2 * extent + 1);
    let len = 2 * reach + if even { 2 } else { 1 };
    let (center, shift) = ((len / 2) as f32, if even { 0.5 } else { 0.0 });

    let mut taps: Vec<f32> = (0..len)
        .map(|i| filter.evaluate((i as f32 - center + shift) / radius))
        .collect();

    let sum: f32 = taps.iter().sum();
    if sum.abs() > f32::EPSILON {
        taps.iter_mut().for_each(|t| *t /= sum);
    } else {
        // footprint narrower than the tap spacing
        taps.fill(0.0);
        if even {
            taps[len / 2 - 1] = 0.5;
            taps[len / 2] = 0.5;
        } else {
            taps[len / 2] = 1.0;
        }
    }
    taps
}

/// Downscales a `width x height` buffer by `downscale`.
///
/// Each output pixel is the filter-weighted average of the source pixels under
/// its footprint, computed in `f32` without clamping. Byte results are rounded
/// and clamped on the way out. `filter_size` of 0 uses the filter's natural
/// width, in output pixels.
pub fn resize_image<P: Pixel>(
    width: usize,
    height: usize,
    downscale: usize,
    input: &[P],
    filter: FilterShape,
    filter_size: f32,
) -> Result<Vec<P>> {
    check_buffer(width, height, input.len())?;
    let (out_width, out_height) = downscaled_size(width, height, downscale)?;
    let (w, h) = image_dimensions(width, height)?;

    if filter_size < 0.0 || !filter_size.is_finite() {
        return Err(ImageIoError::InvalidKernelSize(filter_size, filter_size));
    }
    let filter_width = if filter_size > 0.0 {
        filter_size
    } else {
        filter.natural_width()
    };

    debug!(
        "Resizing {}x{} -> {}x{} with {:?} (width {})",
        width, height, out_width, out_height, filter, filter_width
    );

    let h_taps = resample_taps(filter, filter_width, downscale, width);
    let v_taps = resample_taps(filter, filter_width, downscale, height);

    let mut samples = Vec::with_capacity(input.len() * P::CHANNELS);
    for &px in input {
        px.push_normalized(&mut samples);
    }

    let mut planes = Vec::with_capacity(P::CHANNELS);
    for c in 0..P::CHANNELS {
        let channel: Vec<f32> = samples.iter().skip(c).step_by(P::CHANNELS).copied().collect();
        let plane = Plane::from_raw(w, h, channel)
            .ok_or(ImageIoError::InvalidDimensions(width, height))?;
        let filtered = separable_filter(&plane, &h_taps, &v_taps);

        let mut decimated = Vec::with_capacity(out_width * out_height);
        for oy in 0..out_height {
            let y = (oy * downscale + downscale / 2) as u32;
            for ox in 0..out_width {
                let x = (ox * downscale + downscale / 2) as u32;
                decimated.push(filtered.get_pixel(x, y).0[0]);
            }
        }
        planes.push(decimated);
    }

    let mut values = vec![0.0f32; P::CHANNELS];
    Ok((0..out_width * out_height)
        .map(|i| {
            for (value, plane) in values.iter_mut().zip(&planes) {
                *value = plane[i];
            }
            P::from_normalized(&values)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::types::{Rgb8, RgbF32};
    use approx::assert_relative_eq;

    #[test]
    fn test_filter_names() {
        assert_eq!(resize_filter("").unwrap(), FilterShape::Lanczos3);
        assert_eq!(resize_filter("gaussian").unwrap(), FilterShape::Gaussian);
        assert_eq!(resize_filter("Catmull-Rom").unwrap(), FilterShape::CatmullRom);
        assert_eq!(resize_filter("mitchell").unwrap(), FilterShape::Mitchell);
        assert_eq!(resize_filter("blackman-harris").unwrap(), FilterShape::BlackmanHarris);
        assert_eq!(resize_filter("bspline").unwrap(), FilterShape::BSpline);
        assert!(matches!(
            resize_filter("sinc-ish"),
            Err(ImageIoError::UnknownFilter(_))
        ));
    }

    #[test]
    fn test_downscaled_size_uses_integer_division() {
        assert_eq!(downscaled_size(101, 50, 2).unwrap(), (50, 25));
        assert_eq!(downscaled_size(8, 8, 1).unwrap(), (8, 8));
        assert!(downscaled_size(8, 8, 0).is_err());
        assert!(downscaled_size(3, 8, 4).is_err());
    }

    #[test]
    fn test_taps_are_normalised_and_centred() {
        let odd = resample_taps(FilterShape::Triangle, 2.0, 3, 100);
        assert_eq!(odd.len() % 2, 1);
        assert_relative_eq!(odd.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert_eq!(odd[odd.len() / 2 - 1], odd[odd.len() / 2 + 1]);

        let even = resample_taps(FilterShape::Box, 1.0, 2, 100);
        assert_eq!(even.iter().filter(|&&t| t > 0.0).count(), 2);
        assert_eq!(even[even.len() / 2 - 1], 0.5);
        assert_eq!(even[even.len() / 2], 0.5);

        let capped = resample_taps(FilterShape::Gaussian, 1e6, 2, 4);
        assert!(capped.len() <= 2 * 9 + 2);
    }

    #[test]
    fn test_box_averages_the_footprint() {
        let output = resize_image(2, 2, 2, &[0u8, 255, 255, 0], FilterShape::Box, 0.0).unwrap();
        assert_eq!(output, vec![128]);

        let input: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let output = resize_image(4, 4, 2, &input, FilterShape::Box, 0.0).unwrap();
        assert_eq!(output, vec![2.5, 4.5, 10.5, 12.5]);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let input = vec![Rgb8::new(10, 200, 90); 16 * 12];
        let output = resize_image(16, 12, 4, &input, FilterShape::Triangle, 0.0).unwrap();
        assert_eq!(output.len(), 4 * 3);
        assert!(output.iter().all(|&px| px == Rgb8::new(10, 200, 90)));
    }

    #[test]
    fn test_float_values_are_not_clamped() {
        let output = resize_image(4, 4, 2, &[2.5f32; 16], FilterShape::Lanczos3, 0.0).unwrap();
        assert_eq!(output.len(), 4);
        for v in output {
            assert_relative_eq!(v, 2.5, epsilon = 1e-5);
        }

        let input = vec![RgbF32::new(-0.75, 4.0, 1.0); 6 * 6];
        for filter in [FilterShape::Mitchell, FilterShape::Gaussian, FilterShape::BSpline] {
            for px in resize_image(6, 6, 3, &input, filter, 0.0).unwrap() {
                assert_relative_eq!(px.r, -0.75, epsilon = 1e-5);
                assert_relative_eq!(px.g, 4.0, epsilon = 1e-5);
                assert_relative_eq!(px.b, 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_float_resize_output_size() {
        let input: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let output = resize_image(8, 8, 2, &input, FilterShape::Gaussian, 0.0).unwrap();
        assert_eq!(output.len(), 16);
        let mean: f32 = output.iter().sum::<f32>() / output.len() as f32;
        assert_relative_eq!(mean, 0.4921875, epsilon = 0.05);
    }

    #[test]
    fn test_filter_size_widens_footprint() {
        let input: Vec<f32> = (0..8 * 8)
            .map(|i| {
                let x = (i % 8) as f32;
                x * x + (i / 8) as f32
            })
            .collect();
        let natural = resize_image(8, 8, 2, &input, FilterShape::Triangle, 0.0).unwrap();
        let wide = resize_image(8, 8, 2, &input, FilterShape::Triangle, 4.0).unwrap();
        assert_eq!(natural.len(), wide.len());
        assert_ne!(natural, wide);
        assert!(matches!(
            resize_image(8, 8, 2, &input, FilterShape::Triangle, -1.0),
            Err(ImageIoError::InvalidKernelSize(..))
        ));
    }

    #[test]
    fn test_rgb_float_identity_scale() {
        let input: Vec<RgbF32> = (0..9).map(|i| RgbF32::splat(i as f32)).collect();
        let output = resize_image(3, 3, 1, &input, FilterShape::Box, 0.0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_resize_rejects_wrong_length() {
        let input = vec![0u8; 10];
        assert!(matches!(
            resize_image(4, 4, 2, &input, FilterShape::Box, 0.0),
            Err(ImageIoError::BufferSizeMismatch { .. })
        ));
    }
}
