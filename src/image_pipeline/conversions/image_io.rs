use std::path::Path;

use tracing::{debug, info_span, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::read::channels::to_image_data;
use crate::image_pipeline::read::{FormatReader, ImageReader, ReadOptions, SampleBuffer};
use crate::image_pipeline::types::{ImageData, ImageSpec, Pixel};
use crate::image_pipeline::write::{FormatWriter, ImageWriter, WriteOptions};

/// Typed image file access.
///
/// Owns a reader, a writer and the decode/encode policies they are driven
/// with. `ImageIo::default()` dispatches on file extensions with the default
/// policies.
pub struct ImageIo<R: ImageReader = FormatReader, W: ImageWriter = FormatWriter> {
    reader: R,
    writer: W,
    read_options: ReadOptions,
    write_options: WriteOptions,
}

impl ImageIo<FormatReader, FormatWriter> {
    pub fn new(read_options: ReadOptions, write_options: WriteOptions) -> Self {
        Self {
            reader: FormatReader,
            writer: FormatWriter,
            read_options,
            write_options,
        }
    }
}

impl Default for ImageIo<FormatReader, FormatWriter> {
    fn default() -> Self {
        Self::new(ReadOptions::default(), WriteOptions::default())
    }
}

impl<R: ImageReader, W: ImageWriter> ImageIo<R, W> {
    pub fn with_custom(
        reader: R,
        writer: W,
        read_options: ReadOptions,
        write_options: WriteOptions,
    ) -> Self {
        Self {
            reader,
            writer,
            read_options,
            write_options,
        }
    }

    /// Reads dimensions, channel count and sample type without decoding pixels
    /// (except for RAW files).
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn read_image_spec<Q: AsRef<Path>>(&self, path: Q) -> Result<ImageSpec> {
        let spec = self.reader.probe(path.as_ref())?;
        debug!(
            "{}x{}, {} channel(s), {}",
            spec.width, spec.height, spec.channels, spec.sample_type
        );
        Ok(spec)
    }

    /// Decodes a file into a `P` buffer, collapsing or broadcasting channels.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), channels = P::CHANNELS))]
    pub fn read_image<P: Pixel, Q: AsRef<Path>>(&self, path: Q) -> Result<ImageData<P>> {
        let path = path.as_ref();

        let decoded = {
            let _span = info_span!("decode").entered();
            self.reader.read(path, &self.read_options)?
        };

        let _span = info_span!(
            "normalize_channels",
            width = decoded.width,
            height = decoded.height,
            source_channels = decoded.channels
        )
        .entered();
        to_image_data(&decoded, path)
    }

    /// Encodes a `width x height` buffer; the format follows the extension of `path`.
    #[instrument(skip(self, path, data), fields(path = %path.as_ref().display()))]
    pub fn write_image<P: Pixel, Q: AsRef<Path>>(
        &self,
        path: Q,
        width: usize,
        height: usize,
        data: &[P],
    ) -> Result<()> {
        let buffer = SampleBuffer::from_pixels(width, height, data)?;

        let _span = info_span!("encode").entered();
        self.writer.write(path.as_ref(), &buffer, &self.write_options)
    }

    pub fn read_options(&self) -> &ReadOptions {
        &self.read_options
    }

    pub fn write_options(&self) -> &WriteOptions {
        &self.write_options
    }

    pub fn set_read_options(&mut self, options: ReadOptions) {
        self.read_options = options;
    }

    pub fn set_write_options(&mut self, options: WriteOptions) {
        self.write_options = options;
    }
}
