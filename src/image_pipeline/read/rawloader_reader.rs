//! RAW image reader implementation using the rawloader library.
//!
//! Supports whatever rawloader decodes (Sony ARW, Canon CR2, Nikon NEF, DNG,
//! Fujifilm RAF with Bayer sensors, ...). Sensor data is developed on the CPU
//! by [`CpuDebayer`] according to the [`ReadOptions`].

use std::path::Path;

use rawloader::{RawImage, RawImageData as RawloaderImageData};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::debayer::CpuDebayer;
use crate::image_pipeline::debayer::types::{CfaPattern, RawImageData, SensorLayout};
use crate::image_pipeline::read::reader::ImageReader;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::{ImageSpec, SampleType};

pub struct RawLoaderReader;

fn decode(path: &Path) -> Result<RawImage> {
    if !path.exists() {
        return Err(ImageIoError::input(path, "file does not exist"));
    }
    debug!("Decoding RAW image {}", path.display());

    rawloader::decode_file(path)
        .map_err(|e| ImageIoError::DecodeError(format!("{}: {}", path.display(), e)))
}

/// Converts rawloader output into the developer's input type.
fn to_raw_image_data(path: &Path, decoded: RawImage) -> Result<RawImageData> {
    let layout = match decoded.cpp {
        1 => {
            let pattern = CfaPattern::from_name(&decoded.cfa.name).ok_or_else(|| {
                ImageIoError::UnsupportedFormat(format!(
                    "{}: color filter array '{}'",
                    path.display(),
                    decoded.cfa.name
                ))
            })?;
            SensorLayout::Bayer(pattern)
        }
        3 => SensorLayout::Rgb,
        cpp => {
            return Err(ImageIoError::UnsupportedFormat(format!(
                "{}: {} components per pixel",
                path.display(),
                cpp
            )));
        }
    };

    let has_matrix = decoded.xyz_to_cam.iter().flatten().any(|&v| v != 0.0);
    let cam_to_xyz = if has_matrix {
        let full = decoded.cam_to_xyz_normalized();
        let matrix: [[f32; 3]; 3] = std::array::from_fn(|r| std::array::from_fn(|c| full[r][c]));
        if matrix.iter().flatten().all(|v| v.is_finite()) {
            matrix
        } else {
            [[0.0; 3]; 3]
        }
    } else {
        [[0.0; 3]; 3]
    };

    let (data, black_levels, white_levels) = match decoded.data {
        RawloaderImageData::Integer(values) => {
            let black = std::array::from_fn(|c| decoded.blacklevels[c] as f32);
            let white = std::array::from_fn(|c| decoded.whitelevels[c] as f32);
            (values, black, white)
        }
        // Float data is normalized 0.0-1.0; scale it to the u16 range
        RawloaderImageData::Float(values) => {
            let scaled = values
                .iter()
                .map(|&v| (v * u16::MAX as f32).clamp(0.0, u16::MAX as f32) as u16)
                .collect();
            (scaled, [0.0; 3], [u16::MAX as f32; 3])
        }
    };

    debug!(
        "RAW {} {}: {}x{}, cfa={}, wb={:?}",
        decoded.clean_make, decoded.clean_model, decoded.width, decoded.height, decoded.cfa.name,
        decoded.wb_coeffs
    );

    Ok(RawImageData {
        width: decoded.width,
        height: decoded.height,
        data,
        layout,
        black_levels,
        white_levels,
        wb_coeffs: [decoded.wb_coeffs[0], decoded.wb_coeffs[1], decoded.wb_coeffs[2]],
        cam_to_xyz,
        crops: decoded.crops,
    })
}

impl ImageReader for RawLoaderReader {
    fn probe(&self, path: &Path) -> Result<ImageSpec> {
        let raw = to_raw_image_data(path, decode(path)?)?;
        let (width, height) = raw.visible_size();

        Ok(ImageSpec {
            width,
            height,
            channels: 3,
            sample_type: SampleType::U16,
        })
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<SampleBuffer> {
        let raw = to_raw_image_data(path, decode(path)?)?;
        CpuDebayer::new().process(&raw, options)
    }
}
