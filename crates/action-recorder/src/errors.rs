use thiserror::Error;

use soulbrowser_core_types::{SessionId, SoulError};

/// Lifecycle errors surfaced to callers of the recorder.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("already recording session {session_id}")]
    AlreadyRecording { session_id: SessionId },
    #[error("no active recording session")]
    NoActiveSession,
    #[error("invalid recorder policy: {0}")]
    InvalidPolicy(String),
    #[error("recorder runtime is closed")]
    RuntimeClosed,
}

pub type RecorderResult<T> = Result<T, RecorderError>;

/// Raised at the ingestion boundary. Never surfaced; events are dropped and logged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("malformed {kind} event: {reason}")]
    MalformedEvent { kind: String, reason: String },
}

impl IngestError {
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        IngestError::MalformedEvent {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

impl From<RecorderError> for SoulError {
    fn from(value: RecorderError) -> Self {
        SoulError::new(value.to_string())
    }
}
