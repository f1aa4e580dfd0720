use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::RecorderConfig;

const CONFIG_FILE: &str = "recorder.yaml";

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    // stdout is reserved for command output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

pub struct LoadedConfig {
    pub config: RecorderConfig,
    pub path: PathBuf,
}

pub fn default_config_path() -> Result<PathBuf> {
    // Priority: ./config/recorder.yaml > ~/.config/soulbrowser/recorder.yaml
    let local_config = PathBuf::from("config").join(CONFIG_FILE);
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("soulbrowser");
    path.push(CONFIG_FILE);
    Ok(path)
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;
        let config: RecorderConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded configuration from: {}", config_path.display());
        Ok(LoadedConfig {
            config,
            path: config_path,
        })
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        Ok(LoadedConfig {
            config: RecorderConfig::default(),
            path: config_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.yaml");
        let loaded = load_config(Some(&path)).await.expect("load");
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config, RecorderConfig::default());
    }

    #[tokio::test]
    async fn explicit_file_is_parsed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recorder.yaml");
        std::fs::write(&path, "storage_dir: sessions\npolicy:\n  dedup_window_ms: 3000\n")
            .expect("write");
        let loaded = load_config(Some(&path)).await.expect("load");
        assert_eq!(loaded.config.storage_dir, PathBuf::from("sessions"));
        assert_eq!(loaded.config.policy.dedup_window_ms, 3_000);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recorder.yaml");
        std::fs::write(&path, "policy: [not, a, map]\n").expect("write");
        assert!(load_config(Some(&path)).await.is_err());
    }
}
