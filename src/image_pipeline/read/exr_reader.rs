//! OpenEXR reader using the `exr` crate.
//!
//! Only the first valid layer at its largest resolution level is read. Channels
//! are matched by name: `R`, `G`, `B` (and `A`) become an RGB(A) image, `Y` a
//! grayscale image. Layer prefixes such as `diffuse.R` are ignored.

use std::path::Path;

use exr::meta::MetaData;
use exr::meta::attribute::SampleType as ExrSampleType;
use exr::prelude::{AnyChannel, FlatSamples, read_first_flat_layer_from_file};
use tracing::debug;

use crate::image_pipeline::common::error::{ImageIoError, Result};
use crate::image_pipeline::read::reader::ImageReader;
use crate::image_pipeline::read::types::{ReadOptions, SampleBuffer};
use crate::image_pipeline::types::{ImageSpec, SampleType};

pub struct ExrReader;

fn sample_type_of(sample: ExrSampleType) -> SampleType {
    match sample {
        ExrSampleType::F16 => SampleType::F16,
        ExrSampleType::F32 => SampleType::F32,
        ExrSampleType::U32 => SampleType::U32,
    }
}

/// Base channel name with any layer prefix stripped, upper-cased.
fn base_name(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_uppercase()
}

/// Picks the channels to read, in output order.
fn select_channels(names: &[String]) -> Vec<usize> {
    let find = |wanted: &str| names.iter().position(|n| base_name(n) == wanted);

    if let (Some(r), Some(g), Some(b)) = (find("R"), find("G"), find("B")) {
        let mut selected = vec![r, g, b];
        selected.extend(find("A"));
        return selected;
    }

    if let Some(y) = find("Y") {
        let mut selected = vec![y];
        selected.extend(find("A"));
        return selected;
    }

    (0..names.len()).collect()
}

fn flat_sample_type(samples: &FlatSamples) -> SampleType {
    match samples {
        FlatSamples::F16(_) => SampleType::F16,
        FlatSamples::F32(_) => SampleType::F32,
        FlatSamples::U32(_) => SampleType::U32,
    }
}

impl ImageReader for ExrReader {
    fn probe(&self, path: &Path) -> Result<ImageSpec> {
        let meta = MetaData::read_from_file(path, false).map_err(|e| ImageIoError::input(path, e))?;
        let header = meta
            .headers
            .first()
            .ok_or_else(|| ImageIoError::DecodeError(format!("{}: no EXR headers", path.display())))?;

        let channels = &header.channels.list;
        let sample_type = channels
            .first()
            .map(|c| sample_type_of(c.sample_type))
            .unwrap_or(SampleType::F32);

        Ok(ImageSpec {
            width: header.layer_size.width(),
            height: header.layer_size.height(),
            channels: channels.len(),
            sample_type,
        })
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<SampleBuffer> {
        if !path.exists() {
            return Err(ImageIoError::input(path, "file does not exist"));
        }

        let image = read_first_flat_layer_from_file(path)
            .map_err(|e| ImageIoError::DecodeError(format!("{}: {}", path.display(), e)))?;

        let layer = image.layer_data;
        let width = layer.size.width();
        let height = layer.size.height();
        let list: &[AnyChannel<FlatSamples>] = &layer.channel_data.list;

        let names: Vec<String> = list.iter().map(|c| c.name.to_string()).collect();
        let selected = select_channels(&names);
        debug!("EXR channels {:?}, reading {:?}", names, selected);

        let planes: Vec<Vec<f32>> = selected
            .iter()
            .map(|&i| list[i].sample_data.values_as_f32().collect())
            .collect();

        let channels = planes.len();
        let samples = interleave(path, &names, &selected, &planes, width * height)?;

        let sample_type = selected
            .first()
            .map(|&i| flat_sample_type(&list[i].sample_data))
            .unwrap_or(SampleType::F32);

        Ok(SampleBuffer {
            width,
            height,
            channels,
            sample_type,
            samples,
        })
    }
}

/// Interleaves full resolution channel planes into pixel order.
///
/// Subsampled channels hold fewer than `pixel_count` samples and are rejected.
fn interleave(
    path: &Path,
    names: &[String],
    selected: &[usize],
    planes: &[Vec<f32>],
    pixel_count: usize,
) -> Result<Vec<f32>> {
    for (&i, plane) in selected.iter().zip(planes) {
        if plane.len() != pixel_count {
            return Err(ImageIoError::DecodeError(format!(
                "{}: channel {} has {} samples, expected {} (subsampled channels are not supported)",
                path.display(),
                names[i],
                plane.len(),
                pixel_count
            )));
        }
    }

    let mut samples = Vec::with_capacity(pixel_count * planes.len());
    for p in 0..pixel_count {
        for plane in planes {
            samples.push(plane[p]);
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rgb_channels_are_reordered() {
        // exr sorts channels alphabetically
        assert_eq!(select_channels(&names(&["A", "B", "G", "R"])), vec![3, 2, 1, 0]);
        assert_eq!(select_channels(&names(&["B", "G", "R"])), vec![2, 1, 0]);
    }

    #[test]
    fn test_layer_prefixes_are_ignored() {
        assert_eq!(
            select_channels(&names(&["beauty.B", "beauty.G", "beauty.R"])),
            vec![2, 1, 0]
        );
    }

    #[test]
    fn test_luminance_channel() {
        assert_eq!(select_channels(&names(&["Y"])), vec![0]);
        assert_eq!(select_channels(&names(&["A", "Y"])), vec![1, 0]);
    }

    #[test]
    fn test_unnamed_channels_are_kept_in_order() {
        assert_eq!(select_channels(&names(&["Z"])), vec![0]);
        assert_eq!(select_channels(&names(&["U", "V"])), vec![0, 1]);
    }

    #[test]
    fn test_interleave_orders_by_pixel() {
        let planes = vec![vec![1.0, 2.0], vec![10.0, 20.0], vec![100.0, 200.0]];
        let samples = interleave(Path::new("a.exr"), &names(&["R", "G", "B"]), &[0, 1, 2], &planes, 2)
            .unwrap();
        assert_eq!(samples, vec![1.0, 10.0, 100.0, 2.0, 20.0, 200.0]);
    }

    #[test]
    fn test_subsampled_channel_is_an_error() {
        let planes = vec![vec![0.5; 16], vec![0.5; 4]];
        match interleave(Path::new("chroma.exr"), &names(&["Y", "RY"]), &[0, 1], &planes, 16) {
            Err(ImageIoError::DecodeError(message)) => {
                assert!(message.contains("chroma.exr"), "{}", message);
                assert!(message.contains("RY"), "{}", message);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
