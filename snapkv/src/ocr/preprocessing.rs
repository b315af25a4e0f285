use std::io::Cursor;

use image::{imageops, DynamicImage, GrayImage, ImageReader, Luma};

use crate::error::{Result, SnapError};
use crate::models::NormalizedImage;

/// Multiplier applied around the mean intensity after auto-contrast.
const CONTRAST_FACTOR: f32 = 2.0;

/// 3x3 sharpening kernel `[-2 -2 -2; -2 32 -2; -2 -2 -2] / 16`, pre-divided so
/// it sums to 1.
const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

/// Normalize uploaded image bytes for OCR.
///
/// Applies, in order:
/// 1. Decode and flatten to RGB (palette, gray and alpha inputs alike)
/// 2. Apply the EXIF orientation to the pixels
/// 3. Convert to grayscale
/// 4. Auto-contrast (linear stretch of the darkest/lightest pixel to 0/255)
/// 5. Contrast boost of 2.0x around the mean intensity
/// 6. 3x3 sharpen
///
/// The only failure is an undecodable image.
pub fn preprocess_image(bytes: &[u8]) -> Result<NormalizedImage> {
    let img = decode(bytes)?;

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let oriented = apply_orientation(rgb, read_exif_orientation(bytes));

    let gray = oriented.to_luma8();
    let gray = autocontrast(gray);
    let gray = boost_contrast(gray, CONTRAST_FACTOR);
    let gray = sharpen(&gray);

    Ok(NormalizedImage::new(gray))
}

fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SnapError::Decode(format!("Failed to read image: {e}")))?;

    reader
        .decode()
        .map_err(|e| SnapError::Decode(format!("Failed to decode image: {e}")))
}

/// Read EXIF tag 0x0112 (Orientation). Returns 1 (normal) when the image has no
/// EXIF block or the tag is absent.
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(_) => return 1,
    };

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1)
}

/// Rotate/flip pixels so that an image tagged with `orientation` displays upright.
///
/// 1 = normal, 2 = mirrored, 3 = 180°, 4 = flipped vertically,
/// 5 = mirrored + 90° CW, 6 = 90° CW, 7 = mirrored + 270° CW, 8 = 270° CW.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Stretch intensities so the darkest pixel becomes 0 and the lightest 255.
///
/// A flat image is returned unchanged.
fn autocontrast(mut gray: GrayImage) -> GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), px| (lo.min(px[0]), hi.max(px[0])));

    if max_val <= min_val {
        return gray;
    }

    let range = u32::from(max_val - min_val);
    let lut: Vec<u8> = (0..=255u8)
        .map(|v| (u32::from(v.saturating_sub(min_val)) * 255 / range).min(255) as u8)
        .collect();

    for px in gray.pixels_mut() {
        px[0] = lut[px[0] as usize];
    }
    gray
}

/// Scale each pixel's distance from the rounded mean intensity by `factor`.
fn boost_contrast(mut gray: GrayImage, factor: f32) -> GrayImage {
    let count = u64::from(gray.width()) * u64::from(gray.height());
    if count == 0 {
        return gray;
    }

    let sum: u64 = gray.pixels().map(|px| u64::from(px[0])).sum();
    let mean = (sum as f64 / count as f64).round() as f32;

    let lut: Vec<u8> = (0..=255u8)
        .map(|v| (mean + factor * (f32::from(v) - mean)).round().clamp(0.0, 255.0) as u8)
        .collect();

    for px in gray.pixels_mut() {
        px[0] = lut[px[0] as usize];
    }
    gray
}

fn sharpen(gray: &GrayImage) -> GrayImage {
    let mut out: GrayImage = imageops::filter3x3(gray, &SHARPEN_KERNEL);

    // The kernel has no full neighbourhood on the outer frame; keep those pixels as-is.
    let (width, height) = gray.dimensions();
    for (x, y, px) in gray.enumerate_pixels() {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            out.put_pixel(x, y, Luma([px[0]]));
        }
    }
    out
}
