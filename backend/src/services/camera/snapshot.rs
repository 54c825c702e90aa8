//! Turns a raw camera frame into a stored photo.
//!
//! The pipeline runs in a fixed order: orientation correction for the
//! device rotation, center-crop to the smaller axis, resample to the
//! 500x500 target, lossless PNG encode, and an atomic write to a uuid-named
//! file in the photos directory.

use crate::services::camera::feed::Frame;
use common::model::camera::Orientation;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, RgbImage};
use std::io::{Cursor, Write};
use std::path::Path;
use uuid::Uuid;

/// Edge length of every stored photo.
pub const TARGET_SIZE: u32 = 500;

/// Runs the full in-memory pipeline on one frame.
pub fn process_frame(frame: Frame, orientation: Orientation) -> Result<RgbImage, String> {
    let image: RgbImage = ImageBuffer::from_raw(frame.width, frame.height, frame.rgb)
        .ok_or_else(|| "frame buffer does not match its dimensions".to_string())?;
    let upright = correct_orientation(image, orientation);
    let square = crop_to_square(&upright);
    Ok(imageops::resize(
        &square,
        TARGET_SIZE,
        TARGET_SIZE,
        FilterType::Triangle,
    ))
}

/// Remaps pixels for the device rotation. Each of the four angles is a
/// discrete transform; no resampling happens here.
fn correct_orientation(image: RgbImage, orientation: Orientation) -> RgbImage {
    match orientation.rotation_degrees() {
        90 => imageops::rotate90(&image),
        -90 => imageops::rotate270(&image),
        180 => imageops::rotate180(&image),
        _ => image,
    }
}

fn crop_to_square(image: &RgbImage) -> RgbImage {
    let size = image.width().min(image.height());
    let x = (image.width() - size) / 2;
    let y = (image.height() - size) / 2;
    imageops::crop_imm(image, x, y, size, size).to_image()
}

/// Encodes the photo as PNG and writes it under a fresh uuid-based name.
/// The bytes land in a temp file first and are renamed into place; readers
/// never observe a half-written photo.
pub fn save_png(photos_dir: &Path, image: RgbImage) -> Result<String, String> {
    std::fs::create_dir_all(photos_dir).map_err(|e| e.to_string())?;
    let file_name = format!("{}.png", Uuid::new_v4());

    let mut encoded = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    let mut tmp = tempfile::NamedTempFile::new_in(photos_dir).map_err(|e| e.to_string())?;
    tmp.write_all(&encoded).map_err(|e| e.to_string())?;
    tmp.persist(photos_dir.join(&file_name))
        .map_err(|e| e.to_string())?;
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    fn two_pixel_frame() -> Frame {
        // A 2x1 strip: red on the left, green on the right.
        Frame {
            width: 2,
            height: 1,
            rgb: vec![255, 0, 0, 0, 255, 0],
        }
    }

    fn image_of(frame: Frame) -> RgbImage {
        ImageBuffer::from_raw(frame.width, frame.height, frame.rgb).unwrap()
    }

    #[test]
    fn portrait_leaves_pixels_in_place() {
        let upright = correct_orientation(image_of(two_pixel_frame()), Orientation::Portrait);
        assert_eq!(upright.dimensions(), (2, 1));
        assert_eq!(upright.get_pixel(0, 0), &RED);
        assert_eq!(upright.get_pixel(1, 0), &GREEN);
    }

    #[test]
    fn landscape_right_rotates_clockwise() {
        let upright =
            correct_orientation(image_of(two_pixel_frame()), Orientation::LandscapeRight);
        assert_eq!(upright.dimensions(), (1, 2));
        assert_eq!(upright.get_pixel(0, 0), &RED);
        assert_eq!(upright.get_pixel(0, 1), &GREEN);
    }

    #[test]
    fn landscape_left_rotates_counter_clockwise() {
        let upright = correct_orientation(image_of(two_pixel_frame()), Orientation::LandscapeLeft);
        assert_eq!(upright.dimensions(), (1, 2));
        assert_eq!(upright.get_pixel(0, 0), &GREEN);
        assert_eq!(upright.get_pixel(0, 1), &RED);
    }

    #[test]
    fn upside_down_flips_both_axes() {
        let upright = correct_orientation(
            image_of(two_pixel_frame()),
            Orientation::PortraitUpsideDown,
        );
        assert_eq!(upright.dimensions(), (2, 1));
        assert_eq!(upright.get_pixel(0, 0), &GREEN);
        assert_eq!(upright.get_pixel(1, 0), &RED);
    }

    #[test]
    fn crop_takes_the_centered_square() {
        // 4x2: columns 0..4 colored by index, so the crop keeps columns 1-2.
        let image = RgbImage::from_fn(4, 2, |x, _| Rgb([x as u8, 0, 0]));
        let square = crop_to_square(&image);
        assert_eq!(square.dimensions(), (2, 2));
        assert_eq!(square.get_pixel(0, 0), &Rgb([1, 0, 0]));
        assert_eq!(square.get_pixel(1, 0), &Rgb([2, 0, 0]));
    }

    #[test]
    fn landscape_source_becomes_fixed_square() {
        let frame = Frame {
            width: 1280,
            height: 720,
            rgb: vec![128; 1280 * 720 * 3],
        };
        let photo = process_frame(frame, Orientation::Portrait).unwrap();
        assert_eq!(photo.dimensions(), (TARGET_SIZE, TARGET_SIZE));
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let frame = Frame {
            width: 10,
            height: 10,
            rgb: vec![0; 7],
        };
        assert!(process_frame(frame, Orientation::Portrait).is_err());
    }

    #[test]
    fn saved_photos_get_unique_decodable_files() {
        let dir = tempfile::tempdir().unwrap();
        let photo = RgbImage::from_pixel(TARGET_SIZE, TARGET_SIZE, RED);
        let first = save_png(dir.path(), photo.clone()).unwrap();
        let second = save_png(dir.path(), photo).unwrap();
        assert_ne!(first, second);

        let reloaded = image::open(dir.path().join(&first)).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (TARGET_SIZE, TARGET_SIZE));
    }
}
