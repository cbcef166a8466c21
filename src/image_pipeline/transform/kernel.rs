//! Named convolution kernels
//!
//! A kernel of width `w` and height `h` (in pixels) is sampled at integer
//! offsets on an odd grid of `ceil(w) x ceil(h)` cells, rounded up to odd, and
//! normalised to sum to one.

use std::str::FromStr;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::transform::filter::FilterShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolutionKernel {
    /// Product of a 1D filter along each axis
    Separable(FilterShape),
    /// Elliptical disk of the given diameters
    Disk,
    /// Rows of Pascal's triangle along each axis
    Binomial,
    /// Fixed 3x3 Laplacian, size is ignored and weights sum to zero
    Laplacian,
}

impl FromStr for ConvolutionKernel {
    type Err = ImageIoError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(ConvolutionKernel::Disk),
            "binomial" => Ok(ConvolutionKernel::Binomial),
            "laplacian" => Ok(ConvolutionKernel::Laplacian),
            other => FilterShape::from_name(other)
                .map(ConvolutionKernel::Separable)
                .ok_or_else(|| ImageIoError::UnknownKernel(name.to_string())),
        }
    }
}

/// Sampled kernel weights, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelWeights {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl KernelWeights {
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}

impl ConvolutionKernel {
    /// Samples the kernel for a footprint of `width x height` pixels.
    pub fn weights(self, width: f32, height: f32) -> Result<KernelWeights> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(ImageIoError::InvalidKernelSize(width, height));
        }

        if self == ConvolutionKernel::Laplacian {
            return Ok(KernelWeights {
                width: 3,
                height: 3,
                data: vec![0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0],
            });
        }

        let w = odd_size(width);
        let h = odd_size(height);
        let (half_w, half_h) = (width / 2.0, height / 2.0);
        let (cx, cy) = ((w / 2) as f32, (h / 2) as f32);

        let mut data = Vec::with_capacity(w * h);
        match self {
            ConvolutionKernel::Binomial => {
                let (row, col) = (pascal_row(w), pascal_row(h));
                for y in 0..h {
                    data.extend(row.iter().map(|&wx| wx * col[y]));
                }
            }
            _ => {
                for y in 0..h {
                    for x in 0..w {
                        let tx = (x as f32 - cx) / half_w;
                        let ty = (y as f32 - cy) / half_h;
                        let value = match self {
                            ConvolutionKernel::Separable(shape) => {
                                shape.evaluate(tx) * shape.evaluate(ty)
                            }
                            _ if tx * tx + ty * ty <= 1.0 => 1.0,
                            _ => 0.0,
                        };
                        data.push(value);
                    }
                }
            }
        }

        let sum: f32 = data.iter().sum();
        if sum.abs() > f32::EPSILON {
            data.iter_mut().for_each(|v| *v /= sum);
        }

        Ok(KernelWeights {
            width: w,
            height: h,
            data,
        })
    }
}

/// `ceil(size)`, at least 1, rounded up to the next odd number.
fn odd_size(size: f32) -> usize {
    let n = (size.ceil() as usize).max(1);
    if n % 2 == 0 { n + 1 } else { n }
}

/// Binomial coefficients `C(n - 1, k)` scaled so the largest is one.
fn pascal_row(n: usize) -> Vec<f32> {
    // log space keeps long rows finite
    let mut log = Vec::with_capacity(n);
    let mut acc = 0.0f64;
    log.push(acc);
    for k in 1..n {
        acc += ((n - k) as f64 / k as f64).ln();
        log.push(acc);
    }
    let peak = log.iter().copied().fold(f64::MIN, f64::max);
    log.into_iter().map(|l| (l - peak).exp() as f32).collect()
}
