//! Reader for the common raster formats handled by the `image` crate
//! (JPEG, PNG, BMP, TGA, PNM, GIF, WebP, Radiance HDR).

use std::path::Path;

use image::{ColorType, DynamicImage, ImageDecoder, ImageReader as ImageFileReader};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::reader::ImageReader;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::{ImageSpec, SampleType};

pub struct StandardReader;

fn open(path: &Path) -> Result<ImageFileReader<std::io::BufReader<std::fs::File>>> {
    ImageFileReader::open(path)
        .map_err(|e| ImageIoError::input(path, e))?
        .with_guessed_format()
        .map_err(|e| ImageIoError::input(path, e))
}

fn sample_type_of(color: ColorType) -> SampleType {
    match color.bytes_per_pixel() / color.channel_count() {
        1 => SampleType::U8,
        2 => SampleType::U16,
        _ => SampleType::F32,
    }
}

fn normalize_u8(values: Vec<u8>) -> Vec<f32> {
    values.into_iter().map(|v| v as f32 / 255.0).collect()
}

fn normalize_u16(values: Vec<u16>) -> Vec<f32> {
    values.into_iter().map(|v| v as f32 / 65535.0).collect()
}

/// Flattens a decoded image into normalised interleaved samples, keeping its channel layout.
pub(crate) fn dynamic_to_samples(image: DynamicImage) -> SampleBuffer {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let color = image.color();

    let (channels, sample_type, samples) = match image {
        DynamicImage::ImageLuma8(b) => (1, SampleType::U8, normalize_u8(b.into_raw())),
        DynamicImage::ImageLumaA8(b) => (2, SampleType::U8, normalize_u8(b.into_raw())),
        DynamicImage::ImageRgb8(b) => (3, SampleType::U8, normalize_u8(b.into_raw())),
        DynamicImage::ImageRgba8(b) => (4, SampleType::U8, normalize_u8(b.into_raw())),
        DynamicImage::ImageLuma16(b) => (1, SampleType::U16, normalize_u16(b.into_raw())),
        DynamicImage::ImageLumaA16(b) => (2, SampleType::U16, normalize_u16(b.into_raw())),
        DynamicImage::ImageRgb16(b) => (3, SampleType::U16, normalize_u16(b.into_raw())),
        DynamicImage::ImageRgba16(b) => (4, SampleType::U16, normalize_u16(b.into_raw())),
        DynamicImage::ImageRgb32F(b) => (3, SampleType::F32, b.into_raw()),
        other => {
            debug!("Converting {:?} to RGBA float", color);
            (4, sample_type_of(color), other.to_rgba32f().into_raw())
        }
    };

    SampleBuffer {
        width,
        height,
        channels,
        sample_type,
        samples,
    }
}

impl ImageReader for StandardReader {
    fn probe(&self, path: &Path) -> Result<ImageSpec> {
        let decoder = open(path)?
            .into_decoder()
            .map_err(|e| ImageIoError::input(path, e))?;

        let (width, height) = decoder.dimensions();
        let color = decoder.color_type();

        Ok(ImageSpec {
            width: width as usize,
            height: height as usize,
            channels: color.channel_count() as usize,
            sample_type: sample_type_of(color),
        })
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<SampleBuffer> {
        let reader = open(path)?;
        debug!("Decoding {} as {:?}", path.display(), reader.format());

        let image = reader
            .decode()
            .map_err(|e| ImageIoError::DecodeError(format!("{}: {}", path.display(), e)))?;

        Ok(dynamic_to_samples(image))
    }
}
