//! Image processing pipeline module
//!
//! Typed image file IO over RAW, EXR, TIFF and the `image` crate formats,
//! plus in-memory transforms. Readers and writers meet at a normalised
//! `f32` [`SampleBuffer`]; everything user facing works on [`ImageData`].

pub mod common;
pub mod conversions;
pub mod debayer;
pub mod format;
pub mod read;
pub mod transform;
pub mod types;
pub mod write;

pub use common::{ImageIoError, Result};

pub use types::{ImageData, ImageSpec, Pixel, Rgb, Rgb8, RgbF32, Sample, SampleType};

pub use format::FileFormat;

pub use read::{
    FormatReader,
    ImageReader,
    RawColorSpace,
    ReadOptions,
    ReadOptionsBuilder,
    SampleBuffer,
};

pub use write::{
    ExrCompression,
    FormatWriter,
    ImageWriter,
    TiffCompression,
    WriteOptions,
    WriteOptionsBuilder,
};

pub use transform::{ConvolutionKernel, FilterShape};

pub use conversions::{ConvertConfig, ConvertConfigBuilder, ConvertPipeline, ImageIo};
