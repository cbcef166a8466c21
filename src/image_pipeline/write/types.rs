//! Output policy configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// OpenEXR compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExrCompression {
    None,
    Rle,
    Zip,
    /// Wavelet based, lossless; best ratio for noisy float data
    Piz,
    Pxr24,
}

/// Configuration applied when writing image files
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// JPEG quality, 1-100. The `image` JPEG encoder never subsamples chroma (always 4:4:4).
    pub jpeg_quality: u8,
    /// Compression used for `.exr` outputs
    pub exr_compression: ExrCompression,
    /// Store `.exr` samples as half floats instead of 32-bit floats
    pub exr_half: bool,
    /// Compression used for `.tif`/`.tiff` outputs
    pub tiff_compression: TiffCompression,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            exr_compression: ExrCompression::Piz,
            exr_half: true,
            tiff_compression: TiffCompression::None,
        }
    }
}

impl WriteOptions {
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::default()
    }
}

/// Builder for WriteOptions
#[derive(Default)]
pub struct WriteOptionsBuilder {
    jpeg_quality: Option<u8>,
    exr_compression: Option<ExrCompression>,
    exr_half: Option<bool>,
    tiff_compression: Option<TiffCompression>,
}

impl WriteOptionsBuilder {
    /// Quality is clamped to 1-100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn exr_compression(mut self, compression: ExrCompression) -> Self {
        self.exr_compression = Some(compression);
        self
    }

    pub fn exr_half(mut self, half: bool) -> Self {
        self.exr_half = Some(half);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn build(self) -> WriteOptions {
        let default = WriteOptions::default();
        WriteOptions {
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            exr_compression: self.exr_compression.unwrap_or(default.exr_compression),
            exr_half: self.exr_half.unwrap_or(default.exr_half),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
        }
    }
}
