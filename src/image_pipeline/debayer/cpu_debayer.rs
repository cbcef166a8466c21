use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info, warn};

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::debayer::types::{RawImageData, SensorLayout};
use crate::image_pipeline::read::types::{RawColorSpace, ReadOptions, SampleBuffer};
use crate::image_pipeline::types::SampleType;

/// Standard XYZ (D65) to linear sRGB matrix
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Fraction of pixels allowed to clip when auto brightening.
const AUTO_BRIGHT_THRESHOLD: f32 = 0.01;

/// Develops RAW sensor data into an RGB image on the CPU.
///
/// Steps: demosaic (bilinear, `bayer` crate), crop to the visible area,
/// black level and range normalisation, white balance, camera matrix,
/// optional auto brightening, output transfer curve.
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    /// Interpolates the mosaic into 16-bit RGB triples.
    fn demosaic(&self, raw_image: &RawImageData) -> Result<Vec<u16>> {
        let width = raw_image.width;
        let height = raw_image.height;

        let cfa = match raw_image.layout {
            SensorLayout::Rgb => return Ok(raw_image.data.clone()),
            SensorLayout::Bayer(cfa) => cfa,
        };

        let bayer_bytes: Vec<u8> = raw_image
            .data
            .iter()
            .flat_map(|&val| val.to_le_bytes())
            .collect();

        let mut output_buf = vec![0u8; width * height * 3 * 2];
        let mut cursor = Cursor::new(&bayer_bytes[..]);

        debug!("Running demosaic with CFA={:?}, algo=Linear", cfa);

        {
            let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
            bayer::run_demosaic(
                &mut cursor,
                BayerDepth::Depth16LE,
                cfa.to_bayer(),
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| ImageIoError::DecodeError(format!("Demosaic failed: {:?}", e)))?;
        }

        // RasterDepth::Depth16 stores native-endian u16
        Ok(output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect())
    }

    fn color_matrix(&self, raw_image: &RawImageData, options: &ReadOptions) -> [[f32; 3]; 3] {
        if !options.use_camera_matrix {
            return IDENTITY;
        }

        let known = raw_image.cam_to_xyz.iter().flatten().any(|&v| v != 0.0);
        if !known {
            warn!("No color matrix for this camera, keeping camera RGB");
            return IDENTITY;
        }

        let mut cam_to_srgb = [[0.0f32; 3]; 3];
        for (r, row) in cam_to_srgb.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3)
                    .map(|k| XYZ_TO_SRGB[r][k] * raw_image.cam_to_xyz[k][c])
                    .sum();
            }
        }
        cam_to_srgb
    }

    fn white_balance(&self, raw_image: &RawImageData, options: &ReadOptions) -> [f32; 3] {
        if !options.use_camera_wb {
            return [1.0; 3];
        }

        let [r, g, b] = raw_image.wb_coeffs;
        if !(r.is_finite() && g.is_finite() && b.is_finite()) || g <= 0.0 {
            warn!("Camera white balance unavailable, using unity multipliers");
            return [1.0; 3];
        }

        [r / g, 1.0, b / g]
    }

    pub fn process(&self, raw_image: &RawImageData, options: &ReadOptions) -> Result<SampleBuffer> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        let expected = match raw_image.layout {
            SensorLayout::Bayer(_) => width * height,
            SensorLayout::Rgb => width * height * 3,
        };
        if raw_image.data.len() != expected {
            return Err(ImageIoError::DecodeError(format!(
                "RAW data has {} values, expected {}",
                raw_image.data.len(),
                expected
            )));
        }

        let rgb = self.demosaic(raw_image)?;

        let cam_to_srgb = self.color_matrix(raw_image, options);
        let wb = self.white_balance(raw_image, options);
        let black = raw_image.black_levels;
        let range: [f32; 3] =
            std::array::from_fn(|c| (raw_image.white_levels[c] - black[c]).max(1.0));

        debug!("White balance {:?}, black levels {:?}", wb, black);

        let [top, _, _, left] = raw_image.crops;
        let (out_width, out_height) = raw_image.visible_size();
        let (top, left) = if (out_width, out_height) == (width, height) {
            (0, 0)
        } else {
            (top, left)
        };

        let mut samples = Vec::with_capacity(out_width * out_height * 3);
        for y in top..top + out_height {
            let row = &rgb[(y * width + left) * 3..(y * width + left + out_width) * 3];
            for px in row.chunks_exact(3) {
                let lin: [f32; 3] =
                    std::array::from_fn(|c| ((px[c] as f32 - black[c]).max(0.0) / range[c]) * wb[c]);

                for m in &cam_to_srgb {
                    samples.push(m[0] * lin[0] + m[1] * lin[1] + m[2] * lin[2]);
                }
            }
        }

        if options.auto_bright {
            let scale = auto_bright_scale(&samples);
            debug!("Auto bright scale {}", scale);
            samples.iter_mut().for_each(|v| *v *= scale);
        }

        for v in samples.iter_mut() {
            let clamped = v.clamp(0.0, 1.0);
            *v = match options.color_space {
                RawColorSpace::Srgb => srgb_encode(clamped),
                RawColorSpace::LinearSrgb => clamped,
            };
        }

        Ok(SampleBuffer {
            width: out_width,
            height: out_height,
            channels: 3,
            sample_type: SampleType::U16,
            samples,
        })
    }
}

impl Default for CpuDebayer {
    fn default() -> Self {
        Self::new()
    }
}

/// sRGB opto-electronic transfer function.
pub fn srgb_encode(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Gain that maps the 99th percentile of per-pixel maxima to 1.0.
fn auto_bright_scale(samples: &[f32]) -> f32 {
    let mut maxima: Vec<f32> = samples
        .chunks_exact(3)
        .map(|px| px[0].max(px[1]).max(px[2]))
        .collect();
    if maxima.is_empty() {
        return 1.0;
    }

    let index = ((maxima.len() as f32) * (1.0 - AUTO_BRIGHT_THRESHOLD)) as usize;
    let index = index.min(maxima.len() - 1);
    let (_, percentile, _) = maxima.select_nth_unstable_by(index, |a, b| a.total_cmp(b));

    if *percentile > 0.0 { 1.0 / *percentile } else { 1.0 }
}
