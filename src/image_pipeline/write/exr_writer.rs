use std::path::Path;

use exr::compression::Compression;
use exr::prelude::{
    AnyChannel, AnyChannels, Encoding, FlatSamples, Image, Layer, LayerAttributes, WritableImage,
    f16,
};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::write::types::{ExrCompression, WriteOptions};
use crate::image_pipeline::write::writer::ImageWriter;

/// OpenEXR writer.
///
/// One channel is written as `Y`, three as `R`, `G`, `B`. Samples are stored
/// as half floats with PIZ compression unless the options say otherwise.
pub struct ExrWriter;

fn compression(method: ExrCompression) -> Compression {
    match method {
        ExrCompression::None => Compression::Uncompressed,
        ExrCompression::Rle => Compression::RLE,
        ExrCompression::Zip => Compression::ZIP16,
        ExrCompression::Piz => Compression::PIZ,
        ExrCompression::Pxr24 => Compression::PXR24,
    }
}

fn channel_names(channels: usize) -> Option<&'static [&'static str]> {
    match channels {
        1 => Some(&["Y"]),
        3 => Some(&["R", "G", "B"]),
        4 => Some(&["R", "G", "B", "A"]),
        _ => None,
    }
}

impl ImageWriter for ExrWriter {
    fn write(&self, path: &Path, image: &SampleBuffer, options: &WriteOptions) -> Result<()> {
        let names = channel_names(image.channels).ok_or_else(|| {
            ImageIoError::UnsupportedFormat(format!(
                "{}: {} channel EXR output",
                path.display(),
                image.channels
            ))
        })?;

        debug!(
            "Encoding EXR image: {}x{}, channels={:?}, half={}, compression={:?}",
            image.width, image.height, names, options.exr_half, options.exr_compression
        );

        let list: Vec<AnyChannel<FlatSamples>> = names
            .iter()
            .enumerate()
            .map(|(c, &name)| {
                let plane = image.samples.iter().skip(c).step_by(image.channels).copied();
                let samples = if options.exr_half {
                    FlatSamples::F16(plane.map(f16::from_f32).collect())
                } else {
                    FlatSamples::F32(plane.collect())
                };
                AnyChannel::new(name, samples)
            })
            .collect();

        let encoding = Encoding {
            compression: compression(options.exr_compression),
            ..Encoding::UNCOMPRESSED
        };

        let layer = Layer::new(
            (image.width, image.height),
            LayerAttributes::default(),
            encoding,
            AnyChannels::sort(list.into()),
        );

        Image::from_layer(layer)
            .write()
            .to_file(path)
            .map_err(|e| ImageIoError::output(path, e))?;

        debug!("EXR encoding complete");
        Ok(())
    }
}
