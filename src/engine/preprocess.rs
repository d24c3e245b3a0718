//! Image preprocessing for the skin lesion classifier

use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use crate::utils::image::decode_image;

/// Input size of the classifier (width, height)
pub const CLASSIFIER_INPUT_SIZE: (u32, u32) = (224, 224);

/// Number of color channels the classifier expects
pub const CLASSIFIER_CHANNELS: usize = 3;

/// Decode encoded image bytes and preprocess them for the classifier
pub fn preprocess_bytes(data: &[u8]) -> Result<Array4<f32>> {
    let image = decode_image(data)?;
    Ok(preprocess_for_classifier(&image))
}

/// Preprocess an image for the classifier
///
/// Converts to RGB, resizes to exactly 224x224 (bicubic, aspect ratio not
/// kept) and returns a `(1, 224, 224, 3)` NHWC batch of raw 0..=255 values.
/// The model was trained on unscaled pixels, so no normalization is applied.
pub fn preprocess_for_classifier(image: &DynamicImage) -> Array4<f32> {
    let (target_w, target_h) = CLASSIFIER_INPUT_SIZE;

    let resized = imageops::resize(&image.to_rgb8(), target_w, target_h, FilterType::CatmullRom);
    image_to_nhwc(&resized)
}

/// Convert an RGB image to an NHWC tensor without scaling
fn image_to_nhwc(rgb: &RgbImage) -> Array4<f32> {
    let (width, height) = rgb.dimensions();

    let mut tensor = Array4::<f32>::zeros((
        1,
        height as usize,
        width as usize,
        CLASSIFIER_CHANNELS,
    ));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..CLASSIFIER_CHANNELS {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32;
        }
    }

    tensor
}
