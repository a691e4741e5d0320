//! Configuration loading from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ReapConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a reaper configuration from a JSON file.
///
/// Fields present in the file replace the defaults, absent fields keep them.
/// The returned config never carries observers.
pub fn load_config(path: &Path) -> Result<ReapConfig, ConfigError> {
    let file = File::open(path)?;
    let config: ReapConfig = serde_json::from_reader(BufReader::new(file))?;
    Ok(config)
}
