//! Pipeline conversions module
//!
//! [`ImageIo`] ties a reader and a writer to their policies and exposes the
//! typed read/write/probe operations. [`ConvertPipeline`] chains them for
//! file-to-file conversion.

mod convert;
mod image_io;


pub use convert::{ConvertConfig, ConvertConfigBuilder, ConvertPipeline};
pub use image_io::ImageIo;
