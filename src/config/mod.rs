pub mod runtime;

pub use runtime::{load_config, parse_cli, OutputConfig, RuntimeConfig};
