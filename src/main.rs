//! imageio CLI
//!
//! Inspects, converts and transforms image files through the `imageio_rs`
//! library. Formats are picked from file extensions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use imageio_rs::logger;
use imageio_rs::{ConvertConfig, ConvertPipeline, ImageData, RgbF32};

#[derive(Parser, Debug)]
#[command(name = "imageio")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show debug output and stage timings
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print width, height, channel count and sample type
    Info {
        input: PathBuf,
    },
    /// Convert between formats
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Collapse color to luminance
        #[arg(long)]
        gray: bool,
        /// Keep 32-bit float samples (EXR/TIFF outputs)
        #[arg(long)]
        float: bool,
    },
    /// Swap rows and columns
    Transpose {
        input: PathBuf,
        output: PathBuf,
    },
    /// Downscale by an integer factor
    Resize {
        input: PathBuf,
        output: PathBuf,
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        downscale: u32,
        /// box, triangle, gaussian, sharp-gaussian, catmull-rom, blackman-harris,
        /// sinc, lanczos3 (default), mitchell, bspline, cubic, keys, simon, rifman
        #[arg(long, default_value = "")]
        filter: String,
        /// Filter width in output pixels, 0 for the filter's own
        #[arg(long, default_value_t = 0.0)]
        filter_size: f32,
    },
    /// Convolve with a named kernel
    Convolve {
        input: PathBuf,
        output: PathBuf,
        /// Any resize filter name, or disk, binomial, laplacian
        #[arg(short, long)]
        kernel: String,
        #[arg(long, default_value_t = 3.0)]
        width: f32,
        #[arg(long, default_value_t = 3.0)]
        height: f32,
    },
}

fn read_rgb(input: &Path) -> Result<ImageData<RgbF32>> {
    imageio_rs::read_image::<RgbF32, _>(input)
        .with_context(|| format!("failed to read {}", input.display()))
}

fn write_rgb(output: &Path, width: usize, height: usize, data: &[RgbF32]) -> Result<()> {
    imageio_rs::write_image(output, width, height, data)
        .with_context(|| format!("failed to write {}", output.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_with_level(if args.verbose { "debug" } else { "info" });

    match args.command {
        Command::Info { input } => {
            let spec = imageio_rs::read_image_spec(&input)
                .with_context(|| format!("failed to probe {}", input.display()))?;
            println!(
                "{} {} {} {}",
                spec.width, spec.height, spec.channels, spec.sample_type
            );
        }
        Command::Convert {
            input,
            output,
            gray,
            float,
        } => {
            let config = ConvertConfig::builder().grayscale(gray).float(float).build();
            ConvertPipeline::new(config)
                .convert_file(&input, &output)
                .with_context(|| {
                    format!("failed to convert {} to {}", input.display(), output.display())
                })?;
        }
        Command::Transpose { input, output } => {
            let mut image = read_rgb(&input)?;
            imageio_rs::transpose_image(image.width, image.height, &mut image.data)?;
            write_rgb(&output, image.height, image.width, &image.data)?;
        }
        Command::Resize {
            input,
            output,
            downscale,
            filter,
            filter_size,
        } => {
            let image = read_rgb(&input)?;
            let downscale = downscale as usize;
            let resized = imageio_rs::resize_image(
                image.width,
                image.height,
                downscale,
                &image.data,
                &filter,
                filter_size,
            )?;
            write_rgb(
                &output,
                image.width / downscale,
                image.height / downscale,
                &resized,
            )?;
        }
        Command::Convolve {
            input,
            output,
            kernel,
            width,
            height,
        } => {
            let image = read_rgb(&input)?;
            let filtered = imageio_rs::convolve_image(
                image.width,
                image.height,
                &image.data,
                &kernel,
                width,
                height,
            )?;
            write_rgb(&output, image.width, image.height, &filtered)?;
        }
    }

    info!("Done");
    Ok(())
}
