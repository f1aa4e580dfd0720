#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod clock;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::action::{ActionType, ActionValue, Coordinates, SemanticAction, SensitiveKind};
pub use model::element::{BoundingRect, ElementContext, ElementOrigin, ParentSummary};
pub use model::page::{KeyElement, PageContext, Viewport};
pub use model::session::{PagesVisited, RecordingSession, SessionMetadata};

/// Shared error type for the recorder crates.
#[derive(Debug, Error, Clone)]
pub enum SoulError {
    #[error("{message}")]
    Message { message: String },
}

impl SoulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub type TimestampMs = u64;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
