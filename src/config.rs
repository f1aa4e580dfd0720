use std::path::PathBuf;

use action_recorder::RecorderPolicyView;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use soulbrowser_privacy::PrivacyPolicyView;
use tracing::info;

/// On-disk settings of the `soul-recorder` binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecorderConfig {
    /// Directory holding one JSON record per session.
    pub storage_dir: PathBuf,
    pub policy: RecorderPolicyView,
    pub privacy: PrivacyPolicyView,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            policy: RecorderPolicyView::default(),
            privacy: PrivacyPolicyView::default(),
        }
    }
}

impl RecorderConfig {
    /// Installs the recorder and privacy views as the process-wide policies.
    pub fn apply(&self) -> Result<()> {
        action_recorder::set_policy(self.policy.clone()).context("invalid recorder policy")?;
        soulbrowser_privacy::set_policy(self.privacy.clone()).context("invalid privacy policy")?;
        info!(
            storage_dir = %self.storage_dir.display(),
            privacy = self.privacy.enable,
            "recorder policies applied"
        );
        Ok(())
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("soulbrowser").join("recordings"))
        .unwrap_or_else(|| PathBuf::from("recordings"))
}
