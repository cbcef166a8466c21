use std::path::Path;

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::format::FileFormat;
use crate::image_pipeline::read::exr_reader::ExrReader;
use crate::image_pipeline::read::rawloader_reader::RawLoaderReader;
use crate::image_pipeline::read::reader::ImageReader;
use crate::image_pipeline::read::standard_reader::StandardReader;
use crate::image_pipeline::read::tiff_reader::TiffReader;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::ImageSpec;

/// Reader that dispatches on the file format.
///
/// Files without a recognised extension go to [`StandardReader`], which
/// sniffs the content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatReader;

impl FormatReader {
    fn reader_for(path: &Path) -> &'static dyn ImageReader {
        let format = FileFormat::from_path(path);
        debug!("Reading {} as {:?}", path.display(), format);

        match format {
            Some(FileFormat::Exr) => &ExrReader,
            Some(FileFormat::Tiff) => &TiffReader,
            Some(FileFormat::Raw) => &RawLoaderReader,
            Some(FileFormat::Jpeg) | Some(FileFormat::Standard(_)) | None => &StandardReader,
        }
    }
}

impl ImageReader for FormatReader {
    fn probe(&self, path: &Path) -> Result<ImageSpec> {
        Self::reader_for(path).probe(path)
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<SampleBuffer> {
        Self::reader_for(path).read(path, options)
    }
}
