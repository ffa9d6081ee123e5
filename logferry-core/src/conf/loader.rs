use crate::conf::{ConfigError, FerryOptions};
use std::fs;
use std::path::Path;

/// Read a TOML config file into unvalidated options.
pub fn load_config(path: &Path) -> Result<FerryOptions, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    let options: FerryOptions = toml::from_str(&text).map_err(|e| ConfigError::parse(path, e))?;

    tracing::debug!(path = %path.display(), "config file loaded");
    Ok(options)
}
