use anyhow::Result;

use super::config::cmd_config;
use super::env::CliArgs;
use super::record::cmd_record;
use super::sessions::cmd_sessions;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Record(args) => cmd_record(args, ctx).await,
        Commands::Sessions(args) => cmd_sessions(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
