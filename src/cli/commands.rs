use clap::Subcommand;

use super::config::ConfigArgs;
use super::record::RecordArgs;
use super::sessions::SessionsArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Replay a captured event log into a new recording session
    Record(RecordArgs),

    /// Inspect, export or delete stored sessions
    Sessions(SessionsArgs),

    /// Show the effective recorder configuration
    Config(ConfigArgs),
}
