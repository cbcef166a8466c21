//! Types for debayering operations

/// 2x2 color filter array layouts supported by the demosaicer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl CfaPattern {
    /// Parses a pattern name such as `"RGGB"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RGGB" => Some(CfaPattern::Rggb),
            "BGGR" => Some(CfaPattern::Bggr),
            "GRBG" => Some(CfaPattern::Grbg),
            "GBRG" => Some(CfaPattern::Gbrg),
            _ => None,
        }
    }

    pub(crate) fn to_bayer(self) -> bayer::CFA {
        match self {
            CfaPattern::Rggb => bayer::CFA::RGGB,
            CfaPattern::Bggr => bayer::CFA::BGGR,
            CfaPattern::Grbg => bayer::CFA::GRBG,
            CfaPattern::Gbrg => bayer::CFA::GBRG,
        }
    }
}

/// Sensor layout of a decoded RAW file
#[derive(Debug, Clone)]
pub enum SensorLayout {
    /// Single channel mosaic behind a color filter array
    Bayer(CfaPattern),
    /// Already interleaved RGB (linear DNG and similar)
    Rgb,
}

/// Represents decoded RAW sensor data plus the metadata needed to develop it
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the sensor data in pixels
    pub width: usize,
    /// Height of the sensor data in pixels
    pub height: usize,
    /// Sensor values, one per photosite (or three per pixel for `SensorLayout::Rgb`)
    pub data: Vec<u16>,
    pub layout: SensorLayout,
    /// Per-color black levels (R, G, B)
    pub black_levels: [f32; 3],
    /// Per-color white levels (R, G, B)
    pub white_levels: [f32; 3],
    /// As-shot white balance multipliers (R, G, B), NaN when unknown
    pub wb_coeffs: [f32; 3],
    /// Camera RGB to XYZ matrix, all zeros when unknown
    pub cam_to_xyz: [[f32; 3]; 3],
    /// Visible area: top, right, bottom, left margins
    pub crops: [usize; 4],
}

impl RawImageData {
    /// Dimensions after applying the crop margins.
    pub fn visible_size(&self) -> (usize, usize) {
        let [top, right, bottom, left] = self.crops;
        if left + right >= self.width || top + bottom >= self.height {
            return (self.width, self.height);
        }
        (self.width - left - right, self.height - top - bottom)
    }
}
