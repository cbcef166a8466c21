//! In-memory pixel transforms
//!
//! Transpose, downscale and convolution over typed buffers. Each operation
//! wraps the buffer as an `image` crate buffer and hands it to `image` or
//! `imageproc`. Resize and convolve share the 1D filters in [`filter`].

pub mod convolve;
pub mod filter;
pub mod kernel;
pub mod resize;
pub mod transpose;

pub use convolve::convolve_image;
pub use kernel::{ConvolutionKernel, KernelWeights};
pub use filter::FilterShape;
pub use resize::{downscaled_size, resize_filter, resize_image};
pub use transpose::transpose_image;
