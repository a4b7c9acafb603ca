use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma, Rgb};
use ndarray::{Array3, Axis};
use tracing::debug;

use crate::consts::OCCLUDED_RGB;
use crate::disparity::DisparityMap;
use crate::error::{KzError, Result};

/// 8-bit image stored as shape = (height, width, channels).
/// `channels` is 3 for color and 1 for gray.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StereoImage {
    pub data: Array3<u8>,
}

impl StereoImage {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// True when every pixel has equal channels.
    pub fn is_gray(&self) -> bool {
        self.channels() == 1
            || self
                .data
                .lanes(Axis(2))
                .into_iter()
                .all(|px| px.iter().all(|&c| c == px[0]))
    }

    /// Keep only the first (red) channel.
    pub fn to_gray(&self) -> StereoImage {
        let red = self.data.index_axis(Axis(2), 0).to_owned();
        StereoImage::new(red.insert_axis(Axis(2)))
    }
}

/// Load an image file as 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<StereoImage> {
    let img = image::open(path)
        .map_err(|source| KzError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (w, h) = img.dimensions();
    let mut data = Array3::<u8>::zeros((h as usize, w as usize, 3));
    for (x, y, pixel) in img.enumerate_pixels() {
        for c in 0..3 {
            data[[y as usize, x as usize, c]] = pixel.0[c];
        }
    }
    Ok(StereoImage::new(data))
}

/// Left and right views of a rectified stereo pair.
#[derive(Clone, Debug)]
pub struct StereoPair {
    pub left: StereoImage,
    pub right: StereoImage,
}

impl StereoPair {
    /// Pair two images, converting both to gray when neither has color.
    pub fn new(left: StereoImage, right: StereoImage) -> Result<Self> {
        if left.height() != right.height() || left.width() != right.width() {
            return Err(KzError::InvalidArgument(format!(
                "Image sizes differ: {}x{} and {}x{}",
                left.width(),
                left.height(),
                right.width(),
                right.height()
            )));
        }
        if left.is_gray() && right.is_gray() {
            debug!("Both images are gray, dropping color channels");
            return Ok(Self {
                left: left.to_gray(),
                right: right.to_gray(),
            });
        }
        Ok(Self { left, right })
    }

    pub fn load(left: &Path, right: &Path) -> Result<Self> {
        let l = load_rgb(left)?;
        let r = load_rgb(right)?;
        Self::new(l, r)
    }

    pub fn is_color(&self) -> bool {
        self.left.channels() > 1
    }
}

/// Save raw disparities as 16-bit gray: `d - min + 1`, 0 when occluded.
pub fn save_disparity(map: &DisparityMap, path: &Path) -> Result<()> {
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(
        map.width() as u32,
        map.height() as u32,
        |x, y| {
            let value = match map.data[[y as usize, x as usize]] {
                Some(d) => (d as i64 - map.min as i64 + 1).clamp(0, u16::MAX as i64) as u16,
                None => 0,
            };
            Luma([value])
        },
    );

    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => img.save_with_format(path, ImageFormat::Png)?,
        _ => img.save_with_format(path, ImageFormat::Tiff)?,
    }
    Ok(())
}

/// Save disparities scaled to 8 bits over `[min, max]`, occluded in cyan.
///
/// With `brighter_far` the largest disparity is white, otherwise the
/// smallest one is.
pub fn save_scaled_disparity(map: &DisparityMap, path: &Path, brighter_far: bool) -> Result<()> {
    let range = (map.max as i64 - map.min as i64) as f32;
    let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_fn(
        map.width() as u32,
        map.height() as u32,
        |x, y| match map.data[[y as usize, x as usize]] {
            Some(d) => {
                let offset = if brighter_far {
                    d as i64 - map.min as i64
                } else {
                    map.max as i64 - d as i64
                };
                let v = if range > 0.0 {
                    (255.0 * offset as f32 / range).round().clamp(0.0, 255.0) as u8
                } else {
                    255
                };
                Rgb([v, v, v])
            }
            None => Rgb(OCCLUDED_RGB),
        },
    );
    img.save(path)?;
    Ok(())
}
