use std::path::Path;

use tracing::{info, info_span, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::conversions::image_io::ImageIo;
use crate::image_pipeline::read::{FormatReader, ImageReader, ReadOptions};
use crate::image_pipeline::types::{Pixel, Rgb8, RgbF32};
use crate::image_pipeline::write::{FormatWriter, ImageWriter, WriteOptions};

/// Configuration for file-to-file conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// Collapse color sources to a single luminance channel
    pub grayscale: bool,
    /// Keep 32-bit float samples instead of quantising to 8 bits
    pub float: bool,
    pub read_options: ReadOptions,
    pub write_options: WriteOptions,
}

impl ConvertConfig {
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::default()
    }
}

/// Builder for ConvertConfig
#[derive(Default)]
pub struct ConvertConfigBuilder {
    grayscale: Option<bool>,
    float: Option<bool>,
    read_options: Option<ReadOptions>,
    write_options: Option<WriteOptions>,
}

impl ConvertConfigBuilder {
    pub fn grayscale(mut self, enable: bool) -> Self {
        self.grayscale = Some(enable);
        self
    }

    pub fn float(mut self, enable: bool) -> Self {
        self.float = Some(enable);
        self
    }

    pub fn read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = Some(options);
        self
    }

    pub fn write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = Some(options);
        self
    }

    pub fn build(self) -> ConvertConfig {
        ConvertConfig {
            grayscale: self.grayscale.unwrap_or(false),
            float: self.float.unwrap_or(false),
            read_options: self.read_options.unwrap_or_default(),
            write_options: self.write_options.unwrap_or_default(),
        }
    }
}

/// Reads an image in one format and writes it in another.
pub struct ConvertPipeline<R: ImageReader = FormatReader, W: ImageWriter = FormatWriter> {
    io: ImageIo<R, W>,
    config: ConvertConfig,
}

impl ConvertPipeline<FormatReader, FormatWriter> {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            io: ImageIo::new(config.read_options.clone(), config.write_options.clone()),
            config,
        }
    }
}

impl<R: ImageReader, W: ImageWriter> ConvertPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConvertConfig) -> Self {
        Self {
            io: ImageIo::with_custom(
                reader,
                writer,
                config.read_options.clone(),
                config.write_options.clone(),
            ),
            config,
        }
    }

    fn transfer<P: Pixel>(&self, input: &Path, output: &Path) -> Result<(usize, usize)> {
        let image = {
            let _span = info_span!("read_input").entered();
            self.io.read_image::<P, _>(input)?
        };

        {
            let _span = info_span!("write_output", width = image.width, height = image.height)
                .entered();
            self.io
                .write_image(output, image.width, image.height, &image.data)?;
        }

        Ok((image.width, image.height))
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input = input_path.as_ref();
        let output = output_path.as_ref();

        info!(
            input = %input.display(),
            output = %output.display(),
            grayscale = self.config.grayscale,
            float = self.config.float,
            "Converting file"
        );

        let (width, height) = match (self.config.grayscale, self.config.float) {
            (true, true) => self.transfer::<f32>(input, output)?,
            (true, false) => self.transfer::<u8>(input, output)?,
            (false, true) => self.transfer::<RgbF32>(input, output)?,
            (false, false) => self.transfer::<Rgb8>(input, output)?,
        };

        info!(width, height, "Conversion complete");
        Ok(())
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConvertConfig) {
        self.io.set_read_options(config.read_options.clone());
        self.io.set_write_options(config.write_options.clone());
        self.config = config;
    }

    pub fn io(&self) -> &ImageIo<R, W> {
        &self.io
    }
}
