//! Utility functions for image handling.
//!
//! This module provides functions for loading images from disk and converting
//! decoded RGB buffers into the channels-last tensors used by the pipeline.

use crate::core::{NetInputError, Tensor3D};
use image::{DynamicImage, RgbImage};

/// Converts a DynamicImage to an RgbImage.
///
/// # Arguments
///
/// * `img` - The DynamicImage to convert
///
/// # Returns
///
/// * `RgbImage` - The converted RGB image
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns `NetInputError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, NetInputError> {
    let img = image::open(path).map_err(NetInputError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Converts an RGB image into a `height x width x 3` tensor.
///
/// Pixel values keep their `[0, 255]` range; no normalization is applied.
///
/// # Examples
///
/// ```
/// use image::{Rgb, RgbImage};
/// use netinput::utils::rgb_to_tensor3;
///
/// let img = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
/// let tensor = rgb_to_tensor3(&img);
/// assert_eq!(tensor.shape(), &[2, 4, 3]);
/// assert_eq!(tensor[[1, 3, 2]], 30.0);
/// ```
pub fn rgb_to_tensor3(img: &RgbImage) -> Tensor3D {
    let (width, height) = img.dimensions();
    Tensor3D::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
        img.get_pixel(x as u32, y as u32)[c] as f32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_rgb_to_tensor3_layout() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([1, 2, 3]));
        img.put_pixel(0, 0, Rgb([255, 0, 128]));

        let tensor = rgb_to_tensor3(&img);

        assert_eq!(tensor.shape(), &[2, 3, 3]);
        assert_eq!(tensor[[1, 2, 0]], 1.0);
        assert_eq!(tensor[[1, 2, 2]], 3.0);
        assert_eq!(tensor[[0, 0, 0]], 255.0);
        assert_eq!(tensor[[0, 0, 2]], 128.0);
    }

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(std::path::Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(NetInputError::ImageLoad(_))));
    }
}
