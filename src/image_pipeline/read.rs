//! Image reading module
//!
//! Every reader produces a [`SampleBuffer`]; [`channels::to_image_data`] then
//! turns it into one of the four typed buffers.

mod reader;
mod format_reader;
mod rawloader_reader;
mod exr_reader;
mod tiff_reader;
mod standard_reader;
pub mod channels;
pub mod types;

pub use reader::ImageReader;
pub use format_reader::FormatReader;
pub use rawloader_reader::RawLoaderReader;
pub use exr_reader::ExrReader;
pub use tiff_reader::TiffReader;
pub use standard_reader::StandardReader;
pub use channels::{LUMINANCE_WEIGHTS, luminance};
pub use types::{RawColorSpace, ReadOptions, ReadOptionsBuilder, SampleBuffer};
