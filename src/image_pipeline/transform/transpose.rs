use image::imageops;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::types::{Pixel, from_image_buffer, to_image_buffer};

/// Transposes a `width x height` buffer in place.
///
/// Afterwards the buffer holds a `height x width` image with
/// `out[x * height + y] == in[y * width + x]`.
pub fn transpose_image<P: Pixel>(width: usize, height: usize, buffer: &mut [P]) -> Result<()> {
    debug!("Transposing {}x{} image", width, height);

    let image = to_image_buffer(width, height, buffer)?;

    // a clockwise quarter turn followed by a mirror is a transpose
    let mut transposed = imageops::rotate90(&image);
    imageops::flip_horizontal_in_place(&mut transposed);

    buffer.copy_from_slice(&from_image_buffer::<P>(&transposed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ImageIoError;
    use crate::image_pipeline::types::{Rgb8, RgbF32};

    #[test]
    fn test_transpose_non_square_gray() {
        // 3x2:
        // 1 2 3
        // 4 5 6
        let mut buffer: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        transpose_image(3, 2, &mut buffer).unwrap();
        // 2x3:
        // 1 4
        // 2 5
        // 3 6
        assert_eq!(buffer, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_transpose_rgb_float() {
        let mut buffer: Vec<RgbF32> = (0..6).map(|i| RgbF32::splat(i as f32)).collect();
        let original = buffer.clone();
        transpose_image(2, 3, &mut buffer).unwrap();
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(buffer[x * 3 + y], original[y * 2 + x]);
            }
        }
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let mut buffer: Vec<Rgb8> = (0..12u8).map(|i| Rgb8::new(i, i * 2, 255 - i)).collect();
        let original = buffer.clone();
        transpose_image(4, 3, &mut buffer).unwrap();
        transpose_image(3, 4, &mut buffer).unwrap();
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_transpose_rejects_wrong_length() {
        let mut buffer = vec![0.0f32; 5];
        assert!(matches!(
            transpose_image(3, 2, &mut buffer),
            Err(ImageIoError::BufferSizeMismatch { expected: 6, actual: 5 })
        ));
    }
}
