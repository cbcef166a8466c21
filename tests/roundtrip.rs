use approx::assert_abs_diff_eq;
use tempfile::tempdir;

use imageio_rs::{
    ImageIoError, ImageIo, Rgb8, RgbF32, SampleType, WriteOptions, read_image, read_image_spec,
    write_image,
};

const WIDTH: usize = 7;
const HEIGHT: usize = 5;

fn gradient_rgb8() -> Vec<Rgb8> {
    (0..WIDTH * HEIGHT)
        .map(|i| {
            let x = (i % WIDTH) as u8;
            let y = (i / WIDTH) as u8;
            Rgb8::new(x * 36, y * 60, 255 - x * 20 - y * 10)
        })
        .collect()
}

fn gradient_rgbf32() -> Vec<RgbF32> {
    (0..WIDTH * HEIGHT)
        .map(|i| {
            let x = (i % WIDTH) as f32;
            let y = (i / WIDTH) as f32;
            RgbF32::new(x / 6.0, y / 4.0, 2.5 - x * 0.1)
        })
        .collect()
}

#[test]
fn test_exr_roundtrip_within_half_precision() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gradient.exr");
    let data = gradient_rgbf32();

    write_image(&path, WIDTH, HEIGHT, &data).unwrap();
    let image = read_image::<RgbF32, _>(&path).unwrap();

    assert_eq!((image.width, image.height), (WIDTH, HEIGHT));
    for (a, b) in image.data.iter().zip(&data) {
        assert_abs_diff_eq!(a.r, b.r, epsilon = 4e-3);
        assert_abs_diff_eq!(a.g, b.g, epsilon = 4e-3);
        assert_abs_diff_eq!(a.b, b.b, epsilon = 4e-3);
    }

    let spec = read_image_spec(&path).unwrap();
    assert_eq!((spec.width, spec.height, spec.channels), (WIDTH, HEIGHT, 3));
    assert_eq!(spec.sample_type, SampleType::F16);

    let meta = exr::meta::MetaData::read_from_file(&path, false).unwrap();
    assert_eq!(meta.headers[0].compression, exr::compression::Compression::PIZ);
}

#[test]
fn test_exr_full_float_when_requested() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("full.exr");
    let data = gradient_rgbf32();

    let io = ImageIo::new(
        Default::default(),
        WriteOptions::builder().exr_half(false).build(),
    );
    io.write_image(&path, WIDTH, HEIGHT, &data).unwrap();

    let image = io.read_image::<RgbF32, _>(&path).unwrap();
    assert_eq!(image.data, data);
    assert_eq!(io.read_image_spec(&path).unwrap().sample_type, SampleType::F32);
}

#[test]
fn test_tiff_roundtrip_is_exact() {
    let dir = tempdir().unwrap();
    let data = gradient_rgb8();

    let path = dir.path().join("gradient.tif");
    write_image(&path, WIDTH, HEIGHT, &data).unwrap();
    let image = read_image::<Rgb8, _>(&path).unwrap();
    assert_eq!(image.data, data);

    let spec = read_image_spec(&path).unwrap();
    assert_eq!((spec.width, spec.height, spec.channels), (WIDTH, HEIGHT, 3));
    assert_eq!(spec.sample_type, SampleType::U8);

    let float_path = dir.path().join("gradient.tiff");
    let floats = gradient_rgbf32();
    write_image(&float_path, WIDTH, HEIGHT, &floats).unwrap();
    assert_eq!(read_image::<RgbF32, _>(&float_path).unwrap().data, floats);
    assert_eq!(read_image_spec(&float_path).unwrap().sample_type, SampleType::F32);
}

#[test]
fn test_png_roundtrip_is_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gradient.png");
    let data = gradient_rgb8();

    write_image(&path, WIDTH, HEIGHT, &data).unwrap();
    assert_eq!(read_image::<Rgb8, _>(&path).unwrap().data, data);

    let gray: Vec<u8> = (0..WIDTH * HEIGHT).map(|i| (i * 7) as u8).collect();
    let gray_path = dir.path().join("gray.PNG");
    write_image(&gray_path, WIDTH, HEIGHT, &gray).unwrap();
    assert_eq!(read_image::<u8, _>(&gray_path).unwrap().data, gray);
    assert_eq!(read_image_spec(&gray_path).unwrap().channels, 1);
}

#[test]
fn test_jpeg_quality_100_is_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flat.jpg");
    let data = vec![Rgb8::new(200, 120, 40); 16 * 16];

    write_image(&path, 16, 16, &data).unwrap();
    let image = read_image::<Rgb8, _>(&path).unwrap();

    assert_eq!((image.width, image.height), (16, 16));
    for px in image.data {
        assert!((px.r as i32 - 200).abs() <= 3, "{:?}", px);
        assert!((px.g as i32 - 120).abs() <= 3, "{:?}", px);
        assert!((px.b as i32 - 40).abs() <= 3, "{:?}", px);
    }
}

/// Sampling factors of each component in the baseline frame header.
fn jpeg_sampling_factors(bytes: &[u8]) -> Vec<u8> {
    let mut i = 2;
    while i + 4 <= bytes.len() {
        assert_eq!(bytes[i], 0xFF, "marker expected at {}", i);
        let marker = bytes[i + 1];
        let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if marker == 0xC0 {
            let components = bytes[i + 9] as usize;
            return (0..components).map(|c| bytes[i + 10 + c * 3 + 1]).collect();
        }
        i += 2 + len;
    }
    panic!("no SOF0 marker");
}

#[test]
fn test_jpeg_chroma_is_not_subsampled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gradient.jpeg");

    write_image(&path, WIDTH, HEIGHT, &gradient_rgb8()).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    assert_eq!(jpeg_sampling_factors(&bytes), vec![0x11, 0x11, 0x11]);
}

#[test]
fn test_hdr_keeps_values_above_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bright.hdr");
    let data = vec![
        RgbF32::new(12.0, 0.5, 2.0),
        RgbF32::new(0.25, 0.25, 0.25),
        RgbF32::new(3.0, 6.0, 1.5),
        RgbF32::new(0.0, 0.0, 0.0),
    ];

    write_image(&path, 2, 2, &data).unwrap();
    let image = read_image::<RgbF32, _>(&path).unwrap();

    assert_eq!((image.width, image.height), (2, 2));
    for (a, b) in image.data.iter().zip(&data) {
        assert_abs_diff_eq!(a.r, b.r, epsilon = 1e-6);
        assert_abs_diff_eq!(a.g, b.g, epsilon = 1e-6);
        assert_abs_diff_eq!(a.b, b.b, epsilon = 1e-6);
    }
}

#[test]
fn test_float_png_is_sixteen_bit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ramp.png");
    let data: Vec<f32> = (0..WIDTH * HEIGHT).map(|i| i as f32 / 1000.0).collect();

    write_image(&path, WIDTH, HEIGHT, &data).unwrap();

    let spec = read_image_spec(&path).unwrap();
    assert_eq!((spec.channels, spec.sample_type), (1, SampleType::U16));

    let image = read_image::<f32, _>(&path).unwrap();
    for (a, b) in image.data.iter().zip(&data) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1.0 / 65535.0);
    }
}

#[test]
fn test_float_resize_keeps_range_through_exr() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide_range.exr");
    let data = vec![RgbF32::new(2.5, -0.5, 8.0); 8 * 6];

    let small = imageio_rs::resize_image(8, 6, 2, &data, "lanczos3", 0.0).unwrap();
    assert_eq!(small.len(), 4 * 3);
    write_image(&path, 4, 3, &small).unwrap();

    for px in read_image::<RgbF32, _>(&path).unwrap().data {
        assert_abs_diff_eq!(px.r, 2.5, epsilon = 4e-3);
        assert_abs_diff_eq!(px.g, -0.5, epsilon = 4e-3);
        assert_abs_diff_eq!(px.b, 8.0, epsilon = 8e-3);
    }
}

#[test]
fn test_gray_read_collapses_rgb() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("primaries.tif");
    let data = vec![
        RgbF32::new(1.0, 0.0, 0.0),
        RgbF32::new(0.0, 1.0, 0.0),
        RgbF32::new(0.0, 0.0, 1.0),
    ];

    write_image(&path, 3, 1, &data).unwrap();
    let gray = read_image::<f32, _>(&path).unwrap();

    assert_abs_diff_eq!(gray.data[0], 0.2126, epsilon = 1e-6);
    assert_abs_diff_eq!(gray.data[1], 0.7152, epsilon = 1e-6);
    assert_abs_diff_eq!(gray.data[2], 0.0722, epsilon = 1e-6);
}

#[test]
fn test_rgb_read_broadcasts_gray() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gray.png");
    let data: Vec<u8> = vec![0, 64, 128, 255];

    write_image(&path, 2, 2, &data).unwrap();
    let rgb = read_image::<Rgb8, _>(&path).unwrap();

    let expected: Vec<Rgb8> = data.iter().map(|&v| Rgb8::splat(v)).collect();
    assert_eq!(rgb.data, expected);
}

#[test]
fn test_missing_file_error_names_path() {
    let dir = tempdir().unwrap();

    for name in ["missing.png", "missing.exr", "missing.tif", "missing.arw"] {
        let path = dir.path().join(name);
        match read_image::<Rgb8, _>(&path) {
            Err(ImageIoError::InputReadError(message)) => {
                assert!(message.contains(name), "{}", message)
            }
            other => panic!("{}: unexpected result {:?}", name, other.map(|i| i.width)),
        }
        assert!(matches!(
            read_image_spec(&path),
            Err(ImageIoError::InputReadError(_))
        ));
    }
}

#[test]
fn test_unknown_output_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.xyz");

    let result = write_image(&path, 1, 1, &[0.5f32]);
    assert!(matches!(result, Err(ImageIoError::UnsupportedFormat(_))));
    assert!(!path.exists());
}

#[test]
fn test_write_to_missing_directory_fails_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.png");

    match write_image(&path, 1, 1, &[Rgb8::splat(1)]) {
        Err(ImageIoError::OutputWriteError(message)) => assert!(message.contains("out.png")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_transform_then_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("transposed.png");
    let mut data = gradient_rgb8();

    imageio_rs::transpose_image(WIDTH, HEIGHT, &mut data).unwrap();
    write_image(&path, HEIGHT, WIDTH, &data).unwrap();

    let image = read_image::<Rgb8, _>(&path).unwrap();
    assert_eq!((image.width, image.height), (HEIGHT, WIDTH));
    assert_eq!(image.pixel(4, 6), gradient_rgb8()[4 * WIDTH + 6]);

    let small = imageio_rs::resize_image(HEIGHT, WIDTH, 2, &image.data, "", 0.0).unwrap();
    assert_eq!(small.len(), (HEIGHT / 2) * (WIDTH / 2));

    let blurred = imageio_rs::convolve_image(HEIGHT, WIDTH, &image.data, "gaussian", 3.0, 3.0)
        .unwrap();
    assert_eq!(blurred.len(), image.data.len());
}
