//! Pixel buffer types
//!
//! Buffers are flat, row-major `Vec<P>` where `P` is one of the four supported
//! pixel types: `u8`, `Rgb<u8>`, `f32` and `Rgb<f32>`.

use std::fmt;

use image::{Luma, Primitive};

use crate::image_pipeline::common::error::{ImageIoError, Result};

/// Storage type of a single channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    F16,
    F32,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::U32 => "uint32",
            SampleType::F16 => "half",
            SampleType::F32 => "float",
        };
        f.write_str(name)
    }
}

/// A channel value that can be converted to and from normalised `f32`.
///
/// Integer samples map `0..=MAX` onto `0.0..=1.0`; float samples are stored as is.
pub trait Sample: Primitive + Default + fmt::Debug + Send + Sync + 'static {
    const TYPE: SampleType;

    fn normalize(self) -> f32;

    fn denormalize(value: f32) -> Self;

    /// Converts a value in the sample's own range, rounding and saturating integers.
    fn saturate(value: f32) -> Self;
}

impl Sample for u8 {
    const TYPE: SampleType = SampleType::U8;

    fn normalize(self) -> f32 {
        self as f32 / 255.0
    }

    fn denormalize(value: f32) -> Self {
        // NaN clamps to 0
        Self::saturate(value * 255.0)
    }

    fn saturate(value: f32) -> Self {
        value.round().clamp(0.0, 255.0) as u8
    }
}

impl Sample for f32 {
    const TYPE: SampleType = SampleType::F32;

    fn normalize(self) -> f32 {
        self
    }

    fn denormalize(value: f32) -> Self {
        value
    }

    fn saturate(value: f32) -> Self {
        value
    }
}

/// Interleaved RGB triple.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgb<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

impl<T> Rgb<T> {
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }
}

impl<T: Copy> Rgb<T> {
    pub const fn splat(v: T) -> Self {
        Self { r: v, g: v, b: v }
    }
}

pub type Rgb8 = Rgb<u8>;
pub type RgbF32 = Rgb<f32>;

/// One of the four buffer element types the crate reads, writes and transforms.
///
/// `Native` is the matching `image` crate pixel, used whenever a buffer is
/// handed to `image`/`imageproc`.
pub trait Pixel: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    type Sample: Sample;
    type Native: image::Pixel<Subpixel = Self::Sample> + 'static;

    /// Number of interleaved channels, 1 or 3.
    const CHANNELS: usize;

    /// Builds a pixel from `CHANNELS` normalised values.
    fn from_normalized(values: &[f32]) -> Self;

    /// Appends the `CHANNELS` normalised values of this pixel to `out`.
    fn push_normalized(self, out: &mut Vec<f32>);

    fn to_native(self) -> Self::Native;

    fn from_native(native: &Self::Native) -> Self;
}

macro_rules! impl_pixel {
    ($sample:ty) => {
        impl Pixel for $sample {
            type Sample = $sample;
            type Native = Luma<$sample>;

            const CHANNELS: usize = 1;

            fn from_normalized(values: &[f32]) -> Self {
                <$sample as Sample>::denormalize(values[0])
            }

            fn push_normalized(self, out: &mut Vec<f32>) {
                out.push(Sample::normalize(self));
            }

            fn to_native(self) -> Luma<$sample> {
                Luma([self])
            }

            fn from_native(native: &Luma<$sample>) -> Self {
                native.0[0]
            }
        }

        impl Pixel for Rgb<$sample> {
            type Sample = $sample;
            type Native = image::Rgb<$sample>;

            const CHANNELS: usize = 3;

            fn from_normalized(values: &[f32]) -> Self {
                Rgb::new(
                    <$sample as Sample>::denormalize(values[0]),
                    <$sample as Sample>::denormalize(values[1]),
                    <$sample as Sample>::denormalize(values[2]),
                )
            }

            fn push_normalized(self, out: &mut Vec<f32>) {
                out.extend([self.r.normalize(), self.g.normalize(), self.b.normalize()]);
            }

            fn to_native(self) -> image::Rgb<$sample> {
                image::Rgb([self.r, self.g, self.b])
            }

            fn from_native(native: &image::Rgb<$sample>) -> Self {
                let [r, g, b] = native.0;
                Rgb::new(r, g, b)
            }
        }
    };
}

impl_pixel!(u8);
impl_pixel!(f32);

/// A typed, owned pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData<P> {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Row-major pixels, `width * height` entries
    pub data: Vec<P>,
}

impl<P: Pixel> ImageData<P> {
    pub fn new(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        check_buffer(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn channels(&self) -> usize {
        P::CHANNELS
    }

    pub fn pixel(&self, x: usize, y: usize) -> P {
        self.data[y * self.width + x]
    }
}

/// Image header metadata: size, channel count and storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub sample_type: SampleType,
}

/// Validates that a `width x height` image fits in a buffer of `len` pixels.
pub fn check_buffer(width: usize, height: usize, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImageIoError::InvalidDimensions(width, height));
    }

    let expected = width
        .checked_mul(height)
        .ok_or(ImageIoError::InvalidDimensions(width, height))?;
    if expected != len {
        return Err(ImageIoError::BufferSizeMismatch {
            expected,
            actual: len,
        });
    }

    Ok(())
}

/// Dimensions as the `u32` pair `image` buffers are indexed with.
pub(crate) fn image_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImageIoError::InvalidDimensions(width, height)),
    }
}

/// Wraps a typed buffer as an `image` crate buffer.
pub(crate) fn to_image_buffer<P: Pixel>(
    width: usize,
    height: usize,
    data: &[P],
) -> Result<image::ImageBuffer<P::Native, Vec<P::Sample>>> {
    let (w, h) = image_dimensions(width, height)?;
    check_buffer(width, height, data.len())?;

    let mut buffer = image::ImageBuffer::new(w, h);
    for (dst, src) in buffer.pixels_mut().zip(data) {
        *dst = src.to_native();
    }
    Ok(buffer)
}

/// Copies an `image` crate buffer back into a typed buffer.
pub(crate) fn from_image_buffer<P: Pixel>(
    buffer: &image::ImageBuffer<P::Native, Vec<P::Sample>>,
) -> Vec<P> {
    buffer.pixels().map(P::from_native).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_sample_conversion_rounds_and_clamps() {
        assert_eq!(u8::denormalize(0.0), 0);
        assert_eq!(u8::denormalize(1.0), 255);
        assert_eq!(u8::denormalize(0.5), 128);
        assert_eq!(u8::denormalize(-3.0), 0);
        assert_eq!(u8::denormalize(7.5), 255);
        assert_eq!(u8::denormalize(f32::NAN), 0);
    }

    #[test]
    fn test_u8_normalisation_is_lossless() {
        for v in 0..=255u8 {
            assert_eq!(u8::denormalize(v.normalize()), v);
        }
    }

    #[test]
    fn test_f32_sample_is_identity() {
        assert_eq!(f32::denormalize(3.25), 3.25);
        assert_eq!((-1.5f32).normalize(), -1.5);
    }

    #[test]
    fn test_pixel_channel_counts() {
        assert_eq!(<u8 as Pixel>::CHANNELS, 1);
        assert_eq!(<f32 as Pixel>::CHANNELS, 1);
        assert_eq!(<Rgb8 as Pixel>::CHANNELS, 3);
        assert_eq!(<RgbF32 as Pixel>::CHANNELS, 3);
    }

    #[test]
    fn test_rgb_normalized_round_trip() {
        let px = Rgb8::new(10, 128, 255);
        let mut values = Vec::new();
        px.push_normalized(&mut values);
        assert_eq!(values.len(), 3);
        assert_eq!(Rgb8::from_normalized(&values), px);
    }

    #[test]
    fn test_check_buffer() {
        assert!(check_buffer(4, 3, 12).is_ok());
        assert!(matches!(
            check_buffer(4, 3, 11),
            Err(ImageIoError::BufferSizeMismatch { expected: 12, actual: 11 })
        ));
        assert!(matches!(
            check_buffer(0, 3, 0),
            Err(ImageIoError::InvalidDimensions(0, 3))
        ));
    }

    #[test]
    fn test_image_buffer_conversion_preserves_layout() {
        let data: Vec<RgbF32> = (0..6)
            .map(|i| RgbF32::new(i as f32, i as f32 * 2.0, -(i as f32)))
            .collect();
        let buffer = to_image_buffer(3, 2, &data).unwrap();
        assert_eq!(buffer.get_pixel(2, 1).0, [5.0, 10.0, -5.0]);
        assert_eq!(from_image_buffer::<RgbF32>(&buffer), data);
    }

    #[test]
    fn test_dimensions_past_u32_are_rejected() {
        let too_wide = u32::MAX as usize + 1;
        assert_eq!(image_dimensions(640, 480).unwrap(), (640, 480));
        assert!(matches!(
            image_dimensions(too_wide, 1),
            Err(ImageIoError::InvalidDimensions(w, 1)) if w == too_wide
        ));
        assert!(matches!(
            to_image_buffer::<u8>(too_wide, 1, &[]),
            Err(ImageIoError::InvalidDimensions(..))
        ));
    }
}
