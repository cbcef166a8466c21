use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::reader::ImageReader;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::{ImageSpec, SampleType};

/// TIFF reader built on the `tiff` decoder.
///
/// Handles 8/16/32-bit integer and 32/64-bit float strips and tiles, gray or RGB,
/// with or without extra samples.
pub struct TiffReader;

fn open(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| ImageIoError::input(path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| ImageIoError::input(path, e))
}

fn channel_count(path: &Path, color: ColorType) -> Result<usize> {
    match color {
        ColorType::Gray(_) => Ok(1),
        ColorType::GrayA(_) => Ok(2),
        ColorType::RGB(_) => Ok(3),
        ColorType::RGBA(_) => Ok(4),
        ColorType::Multiband { num_samples, .. } => Ok(num_samples as usize),
        other => Err(ImageIoError::UnsupportedFormat(format!(
            "{}: TIFF color type {:?}",
            path.display(),
            other
        ))),
    }
}

fn bit_depth(color: ColorType) -> u8 {
    match color {
        ColorType::Gray(b)
        | ColorType::GrayA(b)
        | ColorType::RGB(b)
        | ColorType::RGBA(b)
        | ColorType::Palette(b)
        | ColorType::CMYK(b)
        | ColorType::CMYKA(b)
        | ColorType::YCbCr(b) => b,
        ColorType::Multiband { bit_depth, .. } => bit_depth,
        _ => 8,
    }
}

fn sample_type_of(color: ColorType) -> SampleType {
    match bit_depth(color) {
        0..=8 => SampleType::U8,
        9..=16 => SampleType::U16,
        _ => SampleType::F32,
    }
}

fn normalize(path: &Path, result: DecodingResult) -> Result<Vec<f32>> {
    let samples = match result {
        DecodingResult::U8(v) => v.into_iter().map(|s| s as f32 / 255.0).collect(),
        DecodingResult::U16(v) => v.into_iter().map(|s| s as f32 / 65535.0).collect(),
        DecodingResult::U32(v) => v
            .into_iter()
            .map(|s| (s as f64 / u32::MAX as f64) as f32)
            .collect(),
        DecodingResult::F16(v) => v.into_iter().map(|s| s.to_f32()).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|s| s as f32).collect(),
        _ => {
            return Err(ImageIoError::UnsupportedFormat(format!(
                "{}: signed or 64-bit integer TIFF samples",
                path.display()
            )));
        }
    };
    Ok(samples)
}

impl ImageReader for TiffReader {
    fn probe(&self, path: &Path) -> Result<ImageSpec> {
        let mut decoder = open(path)?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ImageIoError::DecodeError(e.to_string()))?;
        let color = decoder
            .colortype()
            .map_err(|e| ImageIoError::DecodeError(e.to_string()))?;

        Ok(ImageSpec {
            width: width as usize,
            height: height as usize,
            channels: channel_count(path, color)?,
            sample_type: sample_type_of(color),
        })
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<SampleBuffer> {
        let mut decoder = open(path)?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ImageIoError::DecodeError(e.to_string()))?;
        let color = decoder
            .colortype()
            .map_err(|e| ImageIoError::DecodeError(e.to_string()))?;
        let channels = channel_count(path, color)?;

        debug!("Decoding TIFF {}x{} {:?}", width, height, color);

        let result = decoder
            .read_image()
            .map_err(|e| ImageIoError::DecodeError(format!("{}: {}", path.display(), e)))?;

        Ok(SampleBuffer {
            width: width as usize,
            height: height as usize,
            channels,
            sample_type: sample_type_of(color),
            samples: normalize(path, result)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_type_follows_bit_depth() {
        assert_eq!(sample_type_of(ColorType::Gray(8)), SampleType::U8);
        assert_eq!(sample_type_of(ColorType::RGB(16)), SampleType::U16);
        assert_eq!(sample_type_of(ColorType::RGBA(32)), SampleType::F32);
        assert_eq!(
            sample_type_of(ColorType::Multiband {
                bit_depth: 16,
                num_samples: 5
            }),
            SampleType::U16
        );
    }

    #[test]
    fn test_channel_counts() {
        let path = Path::new("x.tif");
        assert_eq!(channel_count(path, ColorType::Gray(8)).unwrap(), 1);
        assert_eq!(channel_count(path, ColorType::GrayA(8)).unwrap(), 2);
        assert_eq!(channel_count(path, ColorType::RGB(16)).unwrap(), 3);
        assert!(channel_count(path, ColorType::CMYK(8)).is_err());
    }
}
