//! CLI configuration utilities

use anyhow::Result;
use numen_http::ClientConfig;
use std::path::{Path, PathBuf};

/// File holding the persisted session
pub const SESSION_FILE: &str = "session.json";

/// Data directory: explicit flag, then the platform data dir
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("numen")
    })
}

pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

/// Load the client configuration, falling back to `numen.toml` in the data
/// directory when no file is given
pub fn load_client_config(data_dir: &Path, explicit: Option<&Path>) -> Result<ClientConfig> {
    let default_path = data_dir.join("numen.toml");
    let path = explicit.or_else(|| default_path.exists().then_some(default_path.as_path()));
    Ok(ClientConfig::load(path)?)
}
