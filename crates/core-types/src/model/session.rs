use serde::{Deserialize, Serialize};

use crate::model::action::SemanticAction;
use crate::model::page::PageContext;
use crate::{SessionId, TimestampMs};

/// Insertion-ordered set of visited URLs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagesVisited(Vec<String>);

impl PagesVisited {
    /// Returns true when the URL was not seen before.
    pub fn insert(&mut self, url: &str) -> bool {
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.0.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|seen| seen == url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub total_actions: usize,
    pub duration_ms: u64,
    pub pages_visited: PagesVisited,
}

/// One recording episode from start to finalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordingSession {
    pub id: SessionId,
    pub task_goal: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: TimestampMs,
    #[serde(default)]
    pub end_time: Option<TimestampMs>,
    pub is_active: bool,
    pub initial_context: PageContext,
    actions: Vec<SemanticAction>,
    pub metadata: SessionMetadata,
}

impl RecordingSession {
    pub fn new(
        task_goal: impl Into<String>,
        description: Option<String>,
        start_time: TimestampMs,
        initial_context: PageContext,
    ) -> Self {
        let mut metadata = SessionMetadata::default();
        metadata.pages_visited.insert(&initial_context.url);
        Self {
            id: SessionId::new(),
            task_goal: task_goal.into(),
            description,
            start_time,
            end_time: None,
            is_active: true,
            initial_context,
            actions: Vec::new(),
            metadata,
        }
    }

    pub fn actions(&self) -> &[SemanticAction] {
        &self.actions
    }

    pub fn last_action(&self) -> Option<&SemanticAction> {
        self.actions.last()
    }

    /// Appends an accepted action. Finalized sessions ignore the call and return false.
    pub fn push_action(&mut self, action: SemanticAction) -> bool {
        if !self.is_active {
            return false;
        }
        self.actions.push(action);
        self.metadata.total_actions = self.actions.len();
        true
    }

    pub fn record_page(&mut self, url: &str) -> bool {
        self.metadata.pages_visited.insert(url)
    }

    /// Seals the session. Calling it twice keeps the first end time.
    pub fn finalize(&mut self, end_time: TimestampMs) {
        if !self.is_active {
            return;
        }
        let end_time = end_time.max(self.start_time);
        self.end_time = Some(end_time);
        self.metadata.duration_ms = end_time - self.start_time;
        self.metadata.total_actions = self.actions.len();
        self.is_active = false;
    }
}
