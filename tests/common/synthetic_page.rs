use linesegm::image::GrayU8;

pub const INK: u8 = 0;
pub const BACKGROUND: u8 = 255;

/// Generates a synthetic page with full-width ink bands at the given row
/// ranges (inclusive), leaving a small margin at the left and right edges.
pub fn page_with_bands(width: usize, height: usize, bands: &[(usize, usize)]) -> GrayU8 {
    assert!(width > 8 && height > 0, "page dimensions too small");
    let mut page = GrayU8::filled(width, height, BACKGROUND);
    for &(top, bottom) in bands {
        assert!(bottom < height, "band outside the page");
        for row in top..=bottom {
            for col in 4..width - 4 {
                page.set(row, col, INK);
            }
        }
    }
    page
}

/// Ink pixels per band for pages built by `page_with_bands`.
pub fn band_ink(width: usize, band: (usize, usize)) -> usize {
    (width - 8) * (band.1 - band.0 + 1)
}
