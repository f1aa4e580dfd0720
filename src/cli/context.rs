use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use soulbrowser_session_store::{FileKvStore, SessionStore};

use super::output::OutputFormat;
use crate::config::RecorderConfig;

pub struct CliContext {
    config: Arc<RecorderConfig>,
    config_path: PathBuf,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(config: RecorderConfig, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    /// Opens the file-backed key-value store under `storage_dir`.
    pub fn kv_store(&self) -> Result<Arc<FileKvStore>> {
        let dir = &self.config.storage_dir;
        let kv = FileKvStore::open(dir.clone())
            .with_context(|| format!("Failed to open session storage at {}", dir.display()))?;
        Ok(Arc::new(kv))
    }

    pub fn session_store(&self) -> Result<SessionStore> {
        Ok(SessionStore::new(self.kv_store()?))
    }
}
