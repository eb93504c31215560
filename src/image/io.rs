//! I/O helpers for grayscale pages and JSON reports.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned 8-bit gray buffer.
//! - `save_grayscale_u8`: write an owned 8-bit gray buffer to disk.
//! - `binarize_in_place`: snap a grayscale scan to the {0, 255} ink convention.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::u8::{GrayU8, BACKGROUND, INK};
use super::ImageViewMut;
use image::{DynamicImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    GrayU8::from_raw(w, h, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size for {}", path.display()))
}

/// Save an 8-bit grayscale buffer; the format is inferred from the extension.
pub fn save_grayscale_u8(buffer: &GrayU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.w as u32, buffer.h as u32, buffer.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(img)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Threshold a grayscale scan into the binary page convention: pixels below
/// `threshold` become ink (0), everything else background (255).
pub fn binarize_in_place(buffer: &mut GrayU8, threshold: u8) {
    for row in buffer.rows_mut() {
        for v in row {
            *v = if *v < threshold { INK } else { BACKGROUND };
        }
    }
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binarize_maps_around_threshold() {
        let mut img = GrayU8::from_raw(4, 1, vec![0, 127, 128, 255]).unwrap();
        binarize_in_place(&mut img, 128);
        assert_eq!(img.data, vec![INK, INK, BACKGROUND, BACKGROUND]);
    }
}
