use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::read::types::SampleBuffer;
use crate::image_pipeline::write::types::WriteOptions;

pub trait ImageWriter {
    fn write(&self, path: &Path, image: &SampleBuffer, options: &WriteOptions) -> Result<()>;
}
