//! Default configuration source.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::{FetchConfig, GmError};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "GMFETCH_CONFIG";

/// Configuration used when a caller supplies none.
///
/// Reads the JSON file named by `GMFETCH_CONFIG` when the variable is set and
/// non-empty; otherwise returns an empty configuration.
///
/// # Errors
/// Returns `InvalidConfig` if the named file cannot be read or parsed.
pub fn load_default_config() -> Result<FetchConfig, GmError> {
    config_from_env_value(std::env::var_os(CONFIG_ENV))
}

fn config_from_env_value(value: Option<OsString>) -> Result<FetchConfig, GmError> {
    match value {
        Some(path) if !path.is_empty() => FetchConfig::from_path(PathBuf::from(path)),
        _ => Ok(FetchConfig::default()),
    }
}
