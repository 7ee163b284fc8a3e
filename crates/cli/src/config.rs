use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/campuscash.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub state_dir: String,
    pub timeout_secs: u64,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            state_dir: "config".to_string(),
            timeout_secs: 10,
            level: "info".to_string(),
        }
    }
}

/// Config file, then `CAMPUSCASH_*` environment variables, then CLI flags;
/// later sources win.
pub fn load(
    config_path: Option<&str>,
    base_url: Option<String>,
    state_dir: Option<String>,
) -> Result<AppConfig> {
    let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CAMPUSCASH"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(state_dir) = state_dir {
        settings.state_dir = state_dir;
    }

    Ok(settings)
}
