use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageFormat};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::types::{Sample, SampleType, image_dimensions};
use crate::image_pipeline::write::types::WriteOptions;
use crate::image_pipeline::write::writer::ImageWriter;

/// Writer for formats handled by the `image` crate.
///
/// JPEG uses the configured quality (4:4:4, the encoder never subsamples
/// chroma). PNG is written uncompressed and unfiltered, 16 bits deep when the
/// source buffer holds float samples. Radiance HDR keeps float samples
/// unclamped. Everything else is clamped to `0.0..=1.0` and quantised to 8 bits.
pub struct StandardWriter {
    pub format: ImageFormat,
}

impl StandardWriter {
    pub fn new(format: ImageFormat) -> Self {
        Self { format }
    }

    fn encode_samples(&self, path: &Path, image: &SampleBuffer) -> Result<(ExtendedColorType, Vec<u8>)> {
        let unsupported = || {
            ImageIoError::UnsupportedFormat(format!(
                "{}: {} channel output",
                path.display(),
                image.channels
            ))
        };

        match self.format {
            ImageFormat::Hdr => {
                let rgb: Vec<f32> = match image.channels {
                    1 => image.samples.iter().flat_map(|&v| [v, v, v]).collect(),
                    3 => image.samples.clone(),
                    4 => image
                        .samples
                        .chunks_exact(4)
                        .flat_map(|px| [px[0], px[1], px[2]])
                        .collect(),
                    _ => return Err(unsupported()),
                };
                let bytes = rgb.iter().flat_map(|v| v.to_ne_bytes()).collect();
                Ok((ExtendedColorType::Rgb32F, bytes))
            }
            ImageFormat::Png if image.sample_type != SampleType::U8 => {
                let color = match image.channels {
                    1 => ExtendedColorType::L16,
                    3 => ExtendedColorType::Rgb16,
                    4 => ExtendedColorType::Rgba16,
                    _ => return Err(unsupported()),
                };
                let bytes = image
                    .samples
                    .iter()
                    .flat_map(|&v| quantize_u16(v).to_ne_bytes())
                    .collect();
                Ok((color, bytes))
            }
            _ => {
                let color = match image.channels {
                    1 => ExtendedColorType::L8,
                    3 => ExtendedColorType::Rgb8,
                    4 => ExtendedColorType::Rgba8,
                    _ => return Err(unsupported()),
                };
                let bytes = image.samples.iter().map(|&v| u8::denormalize(v)).collect();
                Ok((color, bytes))
            }
        }
    }
}

fn quantize_u16(value: f32) -> u16 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ImageIoError::output(path, e))
}

impl ImageWriter for StandardWriter {
    fn write(&self, path: &Path, image: &SampleBuffer, options: &WriteOptions) -> Result<()> {
        let (color, bytes) = self.encode_samples(path, image)?;
        let (width, height) = image_dimensions(image.width, image.height)?;

        debug!(
            "Encoding {:?} image: {}x{} {:?}",
            self.format, width, height, color
        );

        let result = match self.format {
            ImageFormat::Jpeg => {
                let mut writer = create(path)?;
                JpegEncoder::new_with_quality(&mut writer, options.jpeg_quality)
                    .write_image(&bytes, width, height, color)
                    .and_then(|_| writer.flush().map_err(ImageError::IoError))
            }
            ImageFormat::Png => {
                let mut writer = create(path)?;
                let encoder = PngEncoder::new_with_quality(
                    &mut writer,
                    CompressionType::Uncompressed,
                    FilterType::NoFilter,
                );
                encoder
                    .write_image(&bytes, width, height, color)
                    .and_then(|_| writer.flush().map_err(ImageError::IoError))
            }
            format => image::save_buffer_with_format(path, &bytes, width, height, color, format),
        };

        result.map_err(|e| ImageIoError::output(path, e))
    }
}
