//! Runtime configuration for the segmentation CLI.
//!
//! Settings can come from a JSON config file, from command-line flags, or
//! both; flags override the file.

use crate::cost::Dataset;
use crate::segmenter::SegmenterParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one subdirectory per page.
    pub dir: PathBuf,
    /// Extension (and thus format) of the written line images.
    pub ext: String,
    /// Optional path for the JSON segmentation report.
    pub json_out: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
            ext: "png".to_string(),
            json_out: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Pages to segment.
    pub inputs: Vec<PathBuf>,
    pub output: OutputConfig,
    /// Grayscale values below this become ink at ingress.
    pub binarize_threshold: u8,
    pub params: SegmenterParams,
    /// Per-page directories of ground-truth line images; enables evaluation.
    pub groundtruth_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: OutputConfig::default(),
            binarize_threshold: 128,
            params: SegmenterParams::default(),
            groundtruth_dir: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [FILES]... [OPTIONS]...\n\
         Line segmentation for handwritten documents.\n\
         \n\
         Options:\n\
         \t-s INT             Step value (1 or 2).\n\
         \t--mf INT           Multiplication factor (positive integer);\n\
         \t                   values above 1 inflate the heuristic.\n\
         \t--dataset TAG      Cost-weight vector (MLS or default).\n\
         \t--out DIR          Output directory (default: out).\n\
         \t--ext EXT          Line image format by extension (default: png).\n\
         \t--json PATH        Write a JSON segmentation report.\n\
         \t--threshold INT    Ingress binarization threshold (default: 128).\n\
         \t--groundtruth DIR  Evaluate against ground-truth line images.\n\
         \t--config PATH      Load a JSON config file (flags override it).\n\
         \t--help             Show this help.\n\
         \n\
         Examples:\n\
         \t{program} image.jpg -s 2 --mf 5\n\
         \t{program} images/*.png --dataset MLS --groundtruth data/gt\n"
    )
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{flag} requires a value"))?;
    raw.parse()
        .map_err(|_| format!("invalid value {raw:?} for {flag}"))
}

/// Parse command-line arguments (everything after the program name).
///
/// Prints usage and exits on `--help`, like the rest of the pipeline's
/// tooling.
pub fn parse_cli(
    program: &str,
    args: impl Iterator<Item = String>,
) -> Result<RuntimeConfig, String> {
    let mut config = RuntimeConfig::default();
    let mut inputs: Vec<PathBuf> = Vec::new();

    // A config file must be applied before any flag that overrides it.
    let raw: Vec<String> = args.collect();
    if let Some(pos) = raw.iter().position(|a| a == "--config") {
        let path = raw
            .get(pos + 1)
            .ok_or_else(|| "--config requires a value".to_string())?;
        config = load_config(Path::new(path))?;
    }

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            "--config" => {
                iter.next();
            }
            "-s" => config.params.plan.step = parse_value("-s", iter.next())?,
            "--mf" => config.params.plan.mfactor = parse_value("--mf", iter.next())?,
            "--dataset" => {
                let tag: String = parse_value("--dataset", iter.next())?;
                config.params.plan.dataset = Dataset::from_tag(&tag);
            }
            "--out" => config.output.dir = PathBuf::from(parse_value::<String>("--out", iter.next())?),
            "--ext" => config.output.ext = parse_value("--ext", iter.next())?,
            "--json" => {
                config.output.json_out =
                    Some(PathBuf::from(parse_value::<String>("--json", iter.next())?))
            }
            "--threshold" => {
                config.binarize_threshold = parse_value("--threshold", iter.next())?
            }
            "--groundtruth" => {
                config.groundtruth_dir = Some(PathBuf::from(parse_value::<String>(
                    "--groundtruth",
                    iter.next(),
                )?))
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option {other}; try --help"))
            }
            _ => inputs.push(PathBuf::from(arg)),
        }
    }

    if !inputs.is_empty() {
        config.inputs = inputs;
    }
    if config.inputs.is_empty() {
        return Err(format!("no input pages given\n\n{}", usage(program)));
    }
    Ok(config)
}
