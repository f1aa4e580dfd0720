use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tokio::fs;
use tracing::info;

use crate::cli::context::CliContext;
use crate::config::RecorderConfig;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write the default configuration to the configuration path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path();
    match args.action {
        ConfigAction::Show => match ctx.output().render(ctx.config())? {
            Some(rendered) => println!("{rendered}"),
            None => {
                println!("Current configuration ({}):", path.display());
                println!("{}", serde_yaml::to_string(ctx.config())?);
            }
        },
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            save_config_file(path, &RecorderConfig::default()).await?;
            info!("Wrote default configuration to {}", path.display());
            println!("Saved configuration to {}", path.display());
        }
    }
    Ok(())
}

async fn save_config_file(path: &Path, config: &RecorderConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saved_defaults_parse_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("recorder.yaml");
        save_config_file(&path, &RecorderConfig::default())
            .await
            .expect("save");
        let content = std::fs::read_to_string(&path).expect("read");
        let parsed: RecorderConfig = serde_yaml::from_str(&content).expect("parse");
        assert_eq!(parsed, RecorderConfig::default());
    }
}
