mod common;

use image::{Rgb, RgbImage};
use ndarray::Array2;

use common::gray_image;
use kzstereo_core::disparity::DisparityMap;
use kzstereo_core::error::KzError;
use kzstereo_core::io::image_io::{load_rgb, save_disparity, save_scaled_disparity, StereoPair};

fn write_rgb(path: &std::path::Path, pixels: &[[u8; 3]], width: u32) {
    let height = pixels.len() as u32 / width;
    let img = RgbImage::from_fn(width, height, |x, y| Rgb(pixels[(y * width + x) as usize]));
    img.save(path).unwrap();
}

#[test]
fn test_load_missing_file() {
    let err = load_rgb(std::path::Path::new("does/not/exist.png")).unwrap_err();
    match err {
        KzError::ResourceUnavailable { path, .. } => {
            assert!(path.ends_with("exist.png"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_gray_pair_is_converted() {
    let dir = tempfile::tempdir().unwrap();
    let left = dir.path().join("left.png");
    let right = dir.path().join("right.png");
    write_rgb(&left, &[[10, 10, 10], [200, 200, 200]], 2);
    write_rgb(&right, &[[30, 30, 30], [40, 40, 40]], 2);

    let pair = StereoPair::load(&left, &right).unwrap();
    assert!(!pair.is_color());
    assert_eq!(pair.left.channels(), 1);
    assert_eq!(pair.left.data[[0, 1, 0]], 200);
    assert_eq!(pair.right.data[[0, 0, 0]], 30);
}

#[test]
fn test_color_pair_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let left = dir.path().join("left.png");
    let right = dir.path().join("right.png");
    write_rgb(&left, &[[10, 10, 10], [200, 200, 200]], 2);
    write_rgb(&right, &[[30, 31, 30], [40, 40, 40]], 2);

    let pair = StereoPair::load(&left, &right).unwrap();
    assert!(pair.is_color());
    assert_eq!(pair.right.data[[0, 0, 1]], 31);
}

#[test]
fn test_size_mismatch() {
    let err = StereoPair::new(gray_image(2, 1, &[1, 2]), gray_image(1, 2, &[1, 2])).unwrap_err();
    assert!(matches!(err, KzError::InvalidArgument(_)));
}

fn sample_map() -> DisparityMap {
    let data = Array2::from_shape_vec((1, 3), vec![Some(-4), None, Some(0)]).unwrap();
    DisparityMap {
        data,
        min: -4,
        max: 0,
    }
}

#[test]
fn test_save_disparity_offsets_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disp.tif");
    save_disparity(&sample_map(), &path).unwrap();

    let loaded = image::open(&path).unwrap().to_luma16();
    assert_eq!(loaded.get_pixel(0, 0).0[0], 1);
    assert_eq!(loaded.get_pixel(1, 0).0[0], 0);
    assert_eq!(loaded.get_pixel(2, 0).0[0], 5);
}

#[test]
fn test_save_scaled_marks_occlusions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaled.png");
    save_scaled_disparity(&sample_map(), &path, false).unwrap();

    let loaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(loaded.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(loaded.get_pixel(1, 0).0, [0, 255, 255]);
    assert_eq!(loaded.get_pixel(2, 0).0, [0, 0, 0]);

    save_scaled_disparity(&sample_map(), &path, true).unwrap();
    let loaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(loaded.get_pixel(2, 0).0, [255, 255, 255]);
}

#[test]
fn test_save_full_i32_range() {
    let data = Array2::from_shape_vec((1, 3), vec![Some(i32::MIN), None, Some(i32::MAX)]).unwrap();
    let map = DisparityMap {
        data,
        min: i32::MIN,
        max: i32::MAX,
    };
    let dir = tempfile::tempdir().unwrap();

    let raw = dir.path().join("disp.png");
    save_disparity(&map, &raw).unwrap();
    let loaded = image::open(&raw).unwrap().to_luma16();
    assert_eq!(loaded.get_pixel(0, 0).0[0], 1);
    assert_eq!(loaded.get_pixel(2, 0).0[0], u16::MAX);

    let scaled = dir.path().join("scaled.png");
    save_scaled_disparity(&map, &scaled, false).unwrap();
    let loaded = image::open(&scaled).unwrap().to_rgb8();
    assert_eq!(loaded.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(loaded.get_pixel(2, 0).0, [0, 0, 0]);
}
