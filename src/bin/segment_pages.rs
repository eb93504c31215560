use linesegm::config::{parse_cli, RuntimeConfig};
use linesegm::diagnostics::PageReport;
use linesegm::eval::{evaluate_page, PageStats};
use linesegm::image::io::{binarize_in_place, load_grayscale_image, write_json_file};
use linesegm::image::GrayU8;
use linesegm::segmenter::write_lines;
use linesegm::{LineSegmenter, SegmenterParams};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Serialize)]
struct PageEntry {
    page: String,
    report: PageReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<PageStats>,
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "segment_pages".to_string());
    let config = parse_cli(&program, env::args().skip(1))?;

    let entries = process_all(&config);
    let mut failures = 0usize;
    let mut report_entries = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                print_page_summary(&entry);
                report_entries.push(entry);
            }
            Err(err) => {
                eprintln!("Error: {err}");
                failures += 1;
            }
        }
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report_entries)?;
        println!("JSON report written to {}", path.display());
    }

    if failures > 0 {
        return Err(format!("{failures} page(s) failed"));
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn process_all(config: &RuntimeConfig) -> Vec<Result<PageEntry, String>> {
    use rayon::prelude::*;
    config
        .inputs
        .par_iter()
        .map(|path| process_page(config, path))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn process_all(config: &RuntimeConfig) -> Vec<Result<PageEntry, String>> {
    config
        .inputs
        .iter()
        .map(|path| process_page(config, path))
        .collect()
}

fn page_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}

fn process_page(config: &RuntimeConfig, path: &Path) -> Result<PageEntry, String> {
    let mut page = load_grayscale_image(path)?;
    binarize_in_place(&mut page, config.binarize_threshold);

    let stem = page_stem(path);
    let segmenter = LineSegmenter::new(SegmenterParams {
        plan: config.params.plan,
        seeds: config.params.seeds,
    });
    let segmentation = segmenter
        .segment_page(&page)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    let page_dir = config.output.dir.join(&stem);
    let written = write_lines(&segmentation, &page_dir, &config.output.ext)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    let stats = match &config.groundtruth_dir {
        Some(dir) => {
            let detected: Vec<(String, GrayU8)> = written
                .iter()
                .zip(&segmentation.lines)
                .map(|(p, img)| (page_stem(p), img.clone()))
                .collect();
            let groundtruth = load_line_images(&dir.join(&stem), config.binarize_threshold)?;
            Some(evaluate_page(&detected, &groundtruth))
        }
        None => None,
    };

    Ok(PageEntry {
        page: stem,
        report: segmentation.report,
        stats,
    })
}

/// Load every image in a ground-truth directory, sorted by file name.
fn load_line_images(dir: &Path, threshold: u8) -> Result<Vec<(String, GrayU8)>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read ground-truth dir {}: {e}", dir.display()))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut lines = Vec::with_capacity(paths.len());
    for path in paths {
        let mut img = load_grayscale_image(&path)?;
        binarize_in_place(&mut img, threshold);
        lines.push((page_stem(&path), img));
    }
    Ok(lines)
}

fn print_page_summary(entry: &PageEntry) {
    println!(
        "{}: {} lines from {} separators in {:.1} ms",
        entry.page, entry.report.num_lines, entry.report.num_separators, entry.report.total_ms
    );
    if let Some(stats) = &entry.stats {
        for m in &stats.matches {
            println!(
                "\t## Groundtruth: {} - Detected: {} - Hit rate: {:.3} - Line detection GT: {:.3} - Line detection R: {:.3}",
                m.groundtruth, m.detected, m.hit_rate, m.detection_gt, m.detection_result
            );
        }
        println!(
            "\t## Avg. stats ==> Hit rate: {:.3} - Line detection GT: {:.3} - Line detection R: {:.3} - Correctly detected: {}/{}",
            stats.avg_hit_rate,
            stats.avg_detection_gt,
            stats.avg_detection_result,
            stats.correctly_detected,
            stats.groundtruth_lines
        );
    }
}
