//! File format detection
//!
//! Formats are picked from the file extension. Extensions nobody claims fall
//! back to content sniffing through the `image` crate when reading.

use std::path::Path;

use image::ImageFormat;

/// Extensions decoded through `rawloader`.
const RAW_EXTENSIONS: &[&str] = &[
    "3fr", "ari", "arw", "cr2", "crw", "dcr", "dcs", "dng", "erf", "kdc", "mef", "mos", "mrw",
    "nef", "nrw", "orf", "pef", "raf", "raw", "rw2", "rwl", "srf", "srw", "x3f",
];

/// Container family a file is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// OpenEXR, handled by `exr`
    Exr,
    /// TIFF, handled by `tiff`
    Tiff,
    /// Camera RAW, handled by `rawloader` + `bayer`
    Raw,
    /// JPEG, handled by `image` with the quality/subsampling policy
    Jpeg,
    /// Any other format the `image` crate handles
    Standard(ImageFormat),
}

impl FileFormat {
    /// Detects the format from the extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        match ext.as_str() {
            "exr" => Some(FileFormat::Exr),
            "tif" | "tiff" => Some(FileFormat::Tiff),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(FileFormat::Jpeg),
            e if RAW_EXTENSIONS.contains(&e) => Some(FileFormat::Raw),
            e => ImageFormat::from_extension(e).map(FileFormat::Standard),
        }
    }
}
