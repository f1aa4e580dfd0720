use clap::Parser;
use std::path::PathBuf;

use super::commands::Commands;
use super::output::OutputFormat;

#[derive(Parser)]
#[command(name = "soul-recorder", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, default_value = "human", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;
    use crate::cli::sessions::SessionsAction;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = CliArgs::try_parse_from([
            "soul-recorder",
            "sessions",
            "show",
            "abc",
            "--output",
            "json",
            "-c",
            "custom.yaml",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        match cli.command {
            Commands::Sessions(args) => match args.action {
                SessionsAction::Show { id } => assert_eq!(id, "abc"),
                other => panic!("unexpected action {other:?}"),
            },
            _ => panic!("expected sessions command"),
        }
    }

    #[test]
    fn record_requires_goal_and_events() {
        assert!(CliArgs::try_parse_from(["soul-recorder", "record", "--goal", "x"]).is_err());
        let cli = CliArgs::try_parse_from([
            "soul-recorder",
            "record",
            "--goal",
            "Search",
            "--events",
            "events.jsonl",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Commands::Record(_)));
    }
}
