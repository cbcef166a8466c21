use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::format::FileFormat;
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::write::exr_writer::ExrWriter;
use crate::image_pipeline::write::standard_writer::StandardWriter;
use crate::image_pipeline::write::tiff_writer::StandardTiffWriter;
use crate::image_pipeline::write::types::WriteOptions;
use crate::image_pipeline::write::writer::ImageWriter;

/// Writer that picks the encoder from the output extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatWriter;

impl ImageWriter for FormatWriter {
    fn write(&self, path: &Path, image: &SampleBuffer, options: &WriteOptions) -> Result<()> {
        let format = FileFormat::from_path(path);
        debug!("Writing {} as {:?}", path.display(), format);

        match format {
            Some(FileFormat::Exr) => ExrWriter.write(path, image, options),
            Some(FileFormat::Tiff) => StandardTiffWriter.write(path, image, options),
            Some(FileFormat::Jpeg) => StandardWriter::new(ImageFormat::Jpeg).write(path, image, options),
            Some(FileFormat::Standard(format)) if format.writing_enabled() => {
                StandardWriter::new(format).write(path, image, options)
            }
            Some(FileFormat::Raw) | Some(FileFormat::Standard(_)) | None => Err(
                ImageIoError::UnsupportedFormat(format!("{}: no encoder for this extension", path.display())),
            ),
        }
    }
}
