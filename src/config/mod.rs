mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./tvreel.toml", "~/.config/tvreel/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.playback.seek_step_ms == 0 {
        anyhow::bail!("playback.seek_step_ms cannot be 0");
    }

    let namespace = config.storage.namespace.trim();
    if namespace.is_empty() {
        anyhow::bail!("storage.namespace cannot be empty");
    }
    if namespace.contains(['/', '\\']) {
        anyhow::bail!("storage.namespace must not contain path separators");
    }

    if config.library.resource_base.trim().is_empty() {
        anyhow::bail!("library.resource_base cannot be empty");
    }

    if config.playback.resume_min_ms > 0
        && config.playback.checkpoint_interval_ms > 0
        && config.playback.checkpoint_interval_ms < config.playback.resume_min_ms
    {
        tracing::warn!(
            "checkpoint_interval_ms ({}) is below resume_min_ms ({}); early checkpoints never prompt",
            config.playback.checkpoint_interval_ms,
            config.playback.resume_min_ms
        );
    }

    Ok(())
}
