//! One dimensional reconstruction filters
//!
//! Every filter is evaluated over a radius normalised to its footprint: `t`
//! runs from -1 to 1 across the filter width, and values outside are zero.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterShape {
    Box,
    Triangle,
    Gaussian,
    SharpGaussian,
    CatmullRom,
    BlackmanHarris,
    /// Truncated, unwindowed sinc
    Sinc,
    #[default]
    Lanczos3,
    Mitchell,
    BSpline,
    /// Keys cubic with `a = 0`
    Cubic,
    /// Keys cubic with `a = -0.5`
    Keys,
    /// Keys cubic with `a = -0.75`
    Simon,
    /// Keys cubic with `a = -1`
    Rifman,
}

impl FilterShape {
    /// Parses a filter name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let shape = match name.trim().to_ascii_lowercase().as_str() {
            "box" => FilterShape::Box,
            "triangle" | "bilinear" | "linear" => FilterShape::Triangle,
            "gaussian" => FilterShape::Gaussian,
            "sharp-gaussian" => FilterShape::SharpGaussian,
            "catmull-rom" | "catmullrom" => FilterShape::CatmullRom,
            "blackman-harris" => FilterShape::BlackmanHarris,
            "sinc" => FilterShape::Sinc,
            "lanczos3" | "lanczos" => FilterShape::Lanczos3,
            "mitchell" => FilterShape::Mitchell,
            "bspline" | "b-spline" => FilterShape::BSpline,
            "cubic" => FilterShape::Cubic,
            "keys" => FilterShape::Keys,
            "simon" => FilterShape::Simon,
            "rifman" => FilterShape::Rifman,
            _ => return None,
        };
        Some(shape)
    }

    /// Default full width of the footprint, in pixels.
    pub fn natural_width(self) -> f32 {
        match self {
            FilterShape::Box => 1.0,
            FilterShape::Triangle | FilterShape::SharpGaussian => 2.0,
            FilterShape::Gaussian | FilterShape::BlackmanHarris => 3.0,
            FilterShape::Lanczos3 => 6.0,
            FilterShape::CatmullRom
            | FilterShape::Sinc
            | FilterShape::Mitchell
            | FilterShape::BSpline
            | FilterShape::Cubic
            | FilterShape::Keys
            | FilterShape::Simon
            | FilterShape::Rifman => 4.0,
        }
    }

    /// Filter value at the normalised radius `t`.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.abs();
        if t > 1.0 {
            return 0.0;
        }
        match self {
            FilterShape::Box => 1.0,
            FilterShape::Triangle => 1.0 - t,
            FilterShape::Gaussian => (-2.0 * t * t).exp(),
            FilterShape::SharpGaussian => (-4.0 * t * t).exp(),
            FilterShape::CatmullRom | FilterShape::Keys => bicubic(2.0 * t, 0.0, 0.5),
            FilterShape::Simon => bicubic(2.0 * t, 0.0, 0.75),
            FilterShape::Rifman => bicubic(2.0 * t, 0.0, 1.0),
            FilterShape::Cubic => bicubic(2.0 * t, 0.0, 0.0),
            FilterShape::Mitchell => bicubic(2.0 * t, 1.0 / 3.0, 1.0 / 3.0),
            FilterShape::BSpline => bicubic(2.0 * t, 1.0, 0.0),
            FilterShape::BlackmanHarris => blackman_harris(t),
            FilterShape::Sinc => sinc(2.0 * t),
            FilterShape::Lanczos3 => {
                let x = 3.0 * t;
                sinc(x) * sinc(x / 3.0)
            }
        }
    }
}

pub(crate) fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-6 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Mitchell-Netravali family over `|x| < 2`.
pub(crate) fn bicubic(x: f32, b: f32, c: f32) -> f32 {
    let x = x.abs();
    let x2 = x * x;
    let x3 = x2 * x;
    let v = if x < 1.0 {
        (12.0 - 9.0 * b - 6.0 * c) * x3 + (-18.0 + 12.0 * b + 6.0 * c) * x2 + (6.0 - 2.0 * b)
    } else if x < 2.0 {
        (-b - 6.0 * c) * x3 + (6.0 * b + 30.0 * c) * x2 + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c)
    } else {
        0.0
    };
    v / 6.0
}

/// Four term Blackman-Harris window, peak at `t == 0`.
fn blackman_harris(t: f32) -> f32 {
    const A: [f32; 4] = [0.35875, -0.48829, 0.14128, -0.01168];
    let x = (t + 1.0) * 0.5;
    A[0] + A[1] * (2.0 * PI * x).cos() + A[2] * (4.0 * PI * x).cos() + A[3] * (6.0 * PI * x).cos()
}
