//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use waggle_types::config::WaggleConfig;
use waggle_types::error::ConfigError;

/// Default config location: `<platform config dir>/waggle/waggle.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waggle")
        .join("waggle.toml")
}

/// Load configuration from `path`, or from the default location when none
/// is given.
///
/// A missing file is not an error: every setting has a default, so the
/// daemon runs without any config on disk. Unreadable or unparseable
/// files are fatal.
pub fn load_config(path: Option<&Path>) -> Result<WaggleConfig, ConfigError> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file found, using defaults");
            return Ok(WaggleConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let config: WaggleConfig = toml::from_str(&raw).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}
