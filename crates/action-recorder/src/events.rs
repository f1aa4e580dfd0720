use serde::{Deserialize, Serialize};
use soulbrowser_core_types::{ActionType, SessionId, TimestampMs};
use tracing::debug;

use crate::ingest::CaptureChannel;

/// Fire-and-forget notification published for UI consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecorderNotification {
    ActionRecorded {
        session_id: SessionId,
        action_type: ActionType,
        description: String,
        timestamp: TimestampMs,
    },
    SessionStarted {
        session_id: SessionId,
    },
    SessionStopped {
        session_id: SessionId,
    },
}

pub fn emit_dropped(channel: CaptureChannel, kind: &str, reason: &str) {
    debug!(
        target: "recorder.events",
        %channel,
        kind,
        reason,
        "recorder.event.dropped"
    );
}

pub fn emit_rejected(session_id: &SessionId, action_type: ActionType, reason: &str) {
    debug!(
        target: "recorder.events",
        %session_id,
        action_type = action_type.as_str(),
        reason,
        "recorder.action.rejected"
    );
}

pub fn emit_recorded(session_id: &SessionId, action_type: ActionType, total_actions: usize) {
    debug!(
        target: "recorder.events",
        %session_id,
        action_type = action_type.as_str(),
        total_actions,
        "recorder.action.recorded"
    );
}

pub fn emit_page(session_id: &SessionId, url: &str, novel: bool) {
    debug!(
        target: "recorder.events",
        %session_id,
        url,
        novel,
        "recorder.page.visited"
    );
}
