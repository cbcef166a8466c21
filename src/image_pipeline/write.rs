//! Image writing module
//!
//! Writers take a [`SampleBuffer`](crate::image_pipeline::read::SampleBuffer)
//! and apply the output policy in [`WriteOptions`].

mod writer;
mod format_writer;
mod exr_writer;
mod tiff_writer;
mod standard_writer;
pub mod types;

pub use writer::ImageWriter;
pub use format_writer::FormatWriter;
pub use exr_writer::ExrWriter;
pub use tiff_writer::StandardTiffWriter;
pub use standard_writer::StandardWriter;
pub use types::{ExrCompression, TiffCompression, WriteOptions, WriteOptionsBuilder};
