use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::ImageSpec;

pub trait ImageReader {
    /// Reads width, height and channel count without keeping pixel data.
    fn probe(&self, path: &Path) -> Result<ImageSpec>;

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<SampleBuffer>;
}
