use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("Can't find/open image file: {0}")]
    InputReadError(String),

    #[error("Can't write output image file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Can't load channels of image file '{path}': {channels} channel(s)")]
    UnsupportedChannels { path: String, channels: usize },

    #[error("Unknown resize filter: {0}")]
    UnknownFilter(String),

    #[error("Unknown convolution kernel: {0}")]
    UnknownKernel(String),

    #[error("Invalid kernel size: width={0}, height={1}")]
    InvalidKernelSize(f32, f32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImageIoError {
    /// Builds an `InputReadError` of the form `<path>: <cause>`.
    pub fn input(path: &std::path::Path, cause: impl std::fmt::Display) -> Self {
        ImageIoError::InputReadError(format!("{}: {}", path.display(), cause))
    }

    /// Builds an `OutputWriteError` of the form `<path>: <cause>`.
    pub fn output(path: &std::path::Path, cause: impl std::fmt::Display) -> Self {
        ImageIoError::OutputWriteError(format!("{}: {}", path.display(), cause))
    }
}

pub type Result<T> = std::result::Result<T, ImageIoError>;
