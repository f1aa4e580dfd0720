use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use soulbrowser_core_types::{RecordingSession, SessionId, TimestampMs};
use soulbrowser_session_store::{export_jsonl, write_lines};
use tracing::info;

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub action: SessionsAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SessionsAction {
    /// List stored sessions, oldest first
    List,

    /// Show one session with its actions
    Show {
        /// Session id
        id: String,
    },

    /// Export a session as JSON lines
    Export {
        /// Session id
        id: String,

        /// Destination file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Delete a stored session
    Delete {
        /// Session id
        id: String,
    },
}

/// Row of `sessions list`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub task_goal: String,
    pub start_time: TimestampMs,
    pub end_time: Option<TimestampMs>,
    pub is_active: bool,
    pub total_actions: usize,
    pub duration_ms: u64,
}

impl From<&RecordingSession> for SessionSummary {
    fn from(session: &RecordingSession) -> Self {
        Self {
            id: session.id.to_string(),
            task_goal: session.task_goal.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            is_active: session.is_active,
            total_actions: session.metadata.total_actions,
            duration_ms: session.metadata.duration_ms,
        }
    }
}

pub async fn cmd_sessions(args: SessionsArgs, ctx: &CliContext) -> Result<()> {
    let store = ctx.session_store()?;
    match args.action {
        SessionsAction::List => {
            let mut sessions = store.list()?;
            sessions.sort_by_key(|session| session.start_time);
            let rows: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();
            if let Some(rendered) = ctx.output().render(&rows)? {
                println!("{rendered}");
                return Ok(());
            }
            if rows.is_empty() {
                println!("No sessions stored in {}", ctx.config().storage_dir.display());
                return Ok(());
            }
            for row in rows {
                println!(
                    "{}  {}  {:>4} actions  {:<8}  {}",
                    row.id,
                    format_timestamp(row.start_time),
                    row.total_actions,
                    if row.is_active { "active" } else { "finished" },
                    row.task_goal
                );
            }
        }
        SessionsAction::Show { id } => {
            let Some(session) = store.load(&SessionId::from(id.as_str()))? else {
                bail!("session {} not found", id);
            };
            match ctx.output().render(&session)? {
                Some(rendered) => println!("{rendered}"),
                None => print_session(&session),
            }
        }
        SessionsAction::Export { id, out } => {
            let Some(session) = store.load(&SessionId::from(id.as_str()))? else {
                bail!("session {} not found", id);
            };
            let lines = export_jsonl(&session)?;
            match out {
                Some(path) => {
                    let written = write_lines(&path, &lines)?;
                    info!(session_id = %session.id, lines = lines.len(), "session exported");
                    println!("Exported {} lines to {}", lines.len(), written.display());
                }
                None => {
                    for line in lines {
                        println!("{line}");
                    }
                }
            }
        }
        SessionsAction::Delete { id } => {
            if !store.delete(&SessionId::from(id.as_str()))? {
                bail!("session {} not found", id);
            }
            println!("Deleted session {id}");
        }
    }
    Ok(())
}

/// Human rendering shared by `record` and `sessions show`.
pub fn print_session(session: &RecordingSession) {
    println!("Goal: {}", session.task_goal);
    if let Some(description) = &session.description {
        println!("Description: {description}");
    }
    println!(
        "Started: {}  Duration: {} ms  Status: {}",
        format_timestamp(session.start_time),
        session.metadata.duration_ms,
        if session.is_active { "active" } else { "finished" }
    );
    let pages: Vec<&str> = session.metadata.pages_visited.iter().collect();
    println!("Pages: {}", pages.join(", "));
    println!("Actions ({}):", session.metadata.total_actions);
    for (index, action) in session.actions().iter().enumerate() {
        let value = action
            .value
            .as_ref()
            .map(|value| format!(" = {}", value.display()))
            .unwrap_or_default();
        println!(
            "  {:>3}. [{}] {}{} (intent: {})",
            index + 1,
            action.action_type.as_str(),
            action.description,
            value,
            action.intent
        );
    }
}

fn format_timestamp(ms: TimestampMs) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulbrowser_core_types::PageContext;

    #[test]
    fn summary_reflects_metadata() {
        let session = RecordingSession::new(
            "Find docs",
            None,
            1_700_000_000_000,
            PageContext::minimal("https://example.com/", "Example", 1_700_000_000_000),
        );
        let summary = SessionSummary::from(&session);
        assert_eq!(summary.task_goal, "Find docs");
        assert!(summary.is_active);
        assert_eq!(summary.total_actions, 0);
        assert_eq!(summary.id, session.id.to_string());
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
    }
}
