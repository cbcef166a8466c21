use std::io::Cursor;
use std::path::Path;

use tiff::encoder::colortype::{ColorType, Gray8, Gray32Float, RGB8, RGB32Float};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, TiffValue};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::types::{Sample, SampleType, image_dimensions};
use crate::image_pipeline::write::types::{TiffCompression, WriteOptions};
use crate::image_pipeline::write::writer::ImageWriter;

/// TIFF writer: 8-bit samples for byte buffers, 32-bit float otherwise.
pub struct StandardTiffWriter;

fn compression(method: TiffCompression) -> Compression {
    match method {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

fn encode<C>(image: &SampleBuffer, data: &[C::Inner], options: &WriteOptions) -> Result<Vec<u8>>
where
    C: ColorType,
    [C::Inner]: TiffValue,
{
    let (width, height) = image_dimensions(image.width, image.height)?;
    let mut buffer = Vec::new();

    let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
        .map_err(|e| ImageIoError::EncodeError(e.to_string()))?
        .with_compression(compression(options.tiff_compression));

    encoder
        .write_image::<C>(width, height, data)
        .map_err(|e| ImageIoError::EncodeError(e.to_string()))?;

    Ok(buffer)
}

impl ImageWriter for StandardTiffWriter {
    fn write(&self, path: &Path, image: &SampleBuffer, options: &WriteOptions) -> Result<()> {
        debug!(
            "Encoding TIFF image: {}x{}x{} {}",
            image.width, image.height, image.channels, image.sample_type
        );

        let bytes = match (image.sample_type, image.channels) {
            (SampleType::U8, 1) | (SampleType::U8, 3) => {
                let data: Vec<u8> = image.samples.iter().map(|&v| u8::denormalize(v)).collect();
                if image.channels == 1 {
                    encode::<Gray8>(image, &data, options)?
                } else {
                    encode::<RGB8>(image, &data, options)?
                }
            }
            (_, 1) => encode::<Gray32Float>(image, &image.samples, options)?,
            (_, 3) => encode::<RGB32Float>(image, &image.samples, options)?,
            (_, channels) => {
                return Err(ImageIoError::UnsupportedFormat(format!(
                    "{}: {} channel TIFF output",
                    path.display(),
                    channels
                )));
            }
        };

        std::fs::write(path, bytes).map_err(|e| ImageIoError::output(path, e))?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
