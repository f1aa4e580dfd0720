use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_string;
use soulbrowser_core_types::{RecordingSession, SemanticAction, SessionId, TimestampMs};

use crate::errors::StoreResult;

/// One line of a session export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "line", rename_all = "snake_case")]
pub enum JsonlLine {
    Header {
        session_id: SessionId,
        task_goal: String,
        #[serde(default)]
        description: Option<String>,
        start_time: TimestampMs,
        #[serde(default)]
        end_time: Option<TimestampMs>,
        initial_url: String,
    },
    Action {
        seq: usize,
        action: SemanticAction,
    },
    Footer {
        total_actions: usize,
        duration_ms: u64,
        pages_visited: Vec<String>,
    },
}

/// Header, one line per action in acceptance order, then footer.
pub fn export_jsonl(session: &RecordingSession) -> StoreResult<Vec<String>> {
    let mut lines = Vec::with_capacity(session.actions().len() + 2);
    lines.push(to_string(&JsonlLine::Header {
        session_id: session.id.clone(),
        task_goal: session.task_goal.clone(),
        description: session.description.clone(),
        start_time: session.start_time,
        end_time: session.end_time,
        initial_url: session.initial_context.url.clone(),
    })?);
    for (seq, action) in session.actions().iter().enumerate() {
        lines.push(to_string(&JsonlLine::Action {
            seq,
            action: action.clone(),
        })?);
    }
    lines.push(to_string(&JsonlLine::Footer {
        total_actions: session.actions().len(),
        duration_ms: session.metadata.duration_ms,
        pages_visited: session
            .metadata
            .pages_visited
            .iter()
            .map(str::to_string)
            .collect(),
    })?);
    Ok(lines)
}

pub fn write_lines(path: impl AsRef<Path>, lines: &[String]) -> StoreResult<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))?;
    }
    writer.flush()?;

    Ok(path.components().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulbrowser_core_types::PageContext;

    #[test]
    fn empty_session_has_header_and_footer() {
        let mut session = RecordingSession::new(
            "Read docs",
            None,
            100,
            PageContext::minimal("https://example.com", "Example", 100),
        );
        session.finalize(600);

        let lines = export_jsonl(&session).expect("export");
        assert_eq!(lines.len(), 2);
        let header: JsonlLine = serde_json::from_str(&lines[0]).expect("header");
        assert!(matches!(header, JsonlLine::Header { start_time: 100, .. }));
        let footer: serde_json::Value = serde_json::from_str(&lines[1]).expect("footer");
        assert_eq!(footer["line"], "footer");
        assert_eq!(footer["duration_ms"], 500);
        assert_eq!(footer["pages_visited"][0], "https://example.com");
    }

    #[test]
    fn writes_lines_to_nested_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("exports/session.jsonl");
        let written = write_lines(&target, &["{\"a\":1}".into(), "{\"b\":2}".into()])
            .expect("write");
        let content = std::fs::read_to_string(&written).expect("read back");
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n");
    }
}
