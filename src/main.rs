use linesegm::image::GrayU8;
use linesegm::{LineSegmenter, SegmenterParams};

fn main() {
    // Demo stub: builds a synthetic three-line page and segments it
    let w = 256usize;
    let h = 192usize;
    let mut page = GrayU8::filled(w, h, 255);
    for &row_band in &[(30usize, 50usize), (85, 105), (140, 160)] {
        for row in row_band.0..=row_band.1 {
            for col in 8..w - 8 {
                page.set(row, col, 0);
            }
        }
    }

    let segmenter = LineSegmenter::new(SegmenterParams::default());
    match segmenter.segment_page(&page) {
        Ok(result) => println!(
            "lines={} separators={} total_ms={:.3}",
            result.lines.len(),
            result.report.num_separators,
            result.report.total_ms
        ),
        Err(err) => eprintln!("Error: {err}"),
    }
}
