use std::collections::HashMap;

use element_context::{element_identity, ElementDescriptor};
use soulbrowser_core_types::TimestampMs;

use crate::ingest::EventMeta;

/// Pending text is keyed by document URL and element identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputKey {
    pub url: String,
    pub element: String,
}

impl InputKey {
    pub fn for_target(url: &str, target: &ElementDescriptor) -> Self {
        Self {
            url: url.to_string(),
            element: element_identity(target),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingInput {
    pub target: ElementDescriptor,
    /// Latest full field value.
    pub value: String,
    /// Metadata of the latest keystroke.
    pub meta: EventMeta,
    pub first_ts: TimestampMs,
    pub keystrokes: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRejection {
    TooShort,
    IncrementalEdit,
}

impl InputRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputRejection::TooShort => "too_short",
            InputRejection::IncrementalEdit => "incremental_edit",
        }
    }
}

/// Per-field text debouncer.
#[derive(Debug, Default)]
pub struct InputBuffer {
    pending: HashMap<InputKey, (PendingInput, u64)>,
    /// Last value actually recorded per field; kept in memory only.
    committed: HashMap<InputKey, String>,
    generation: u64,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending value for `key` and returns the generation to arm with.
    pub fn update(
        &mut self,
        key: InputKey,
        target: ElementDescriptor,
        value: String,
        meta: EventMeta,
    ) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        match self.pending.get_mut(&key) {
            Some((pending, current)) => {
                pending.target = target;
                pending.value = value;
                pending.meta = meta;
                pending.keystrokes += 1;
                *current = generation;
            }
            None => {
                let pending = PendingInput {
                    target,
                    value,
                    first_ts: meta.timestamp,
                    meta,
                    keystrokes: 1,
                };
                self.pending.insert(key, (pending, generation));
            }
        }
        generation
    }

    pub fn take_if_current(&mut self, key: &InputKey, generation: u64) -> Option<PendingInput> {
        match self.pending.get(key) {
            Some((_, current)) if *current == generation => {
                self.pending.remove(key).map(|(pending, _)| pending)
            }
            _ => None,
        }
    }

    pub fn take(&mut self, key: &InputKey) -> Option<PendingInput> {
        self.pending.remove(key).map(|(pending, _)| pending)
    }

    pub fn pending(&self, key: &InputKey) -> Option<&PendingInput> {
        self.pending.get(key).map(|(pending, _)| pending)
    }

    /// Pending keys, oldest entry first.
    pub fn pending_keys(&self) -> Vec<InputKey> {
        let mut keys: Vec<(&InputKey, TimestampMs)> = self
            .pending
            .iter()
            .map(|(key, (pending, _))| (key, pending.first_ts))
            .collect();
        keys.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        keys.into_iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Rejects short values and values whose length is within `min_delta` of
    /// the last recorded value for the same field.
    pub fn evaluate(
        &self,
        key: &InputKey,
        value: &str,
        min_len: usize,
        min_delta: usize,
    ) -> Result<(), InputRejection> {
        let len = value.chars().count();
        if len < min_len {
            return Err(InputRejection::TooShort);
        }
        if let Some(previous) = self.committed.get(key) {
            if len.abs_diff(previous.chars().count()) < min_delta {
                return Err(InputRejection::IncrementalEdit);
            }
        }
        Ok(())
    }

    pub fn remember(&mut self, key: InputKey, value: String) {
        self.committed.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.committed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::CaptureChannel;

    fn field() -> ElementDescriptor {
        ElementDescriptor {
            tag_name: Some("input".into()),
            id: Some("q".into()),
            ..Default::default()
        }
    }

    fn meta(ts: TimestampMs) -> EventMeta {
        EventMeta {
            channel: CaptureChannel::InPage,
            kind: "input".into(),
            url: "https://example.com/".into(),
            title: None,
            timestamp: ts,
            coordinates: None,
            page: None,
        }
    }

    #[test]
    fn keystrokes_collapse_under_one_key() {
        let mut buffer = InputBuffer::new();
        let key = InputKey::for_target("https://example.com/", &field());
        assert_eq!(key.element, "#q");

        let mut generation = 0;
        for (idx, value) in ["g", "gi", "git", "github"].iter().enumerate() {
            generation = buffer.update(key.clone(), field(), value.to_string(), meta(idx as u64));
        }
        assert!(buffer.take_if_current(&key, generation - 1).is_none());
        let pending = buffer.take_if_current(&key, generation).expect("pending");
        assert_eq!(pending.value, "github");
        assert_eq!(pending.keystrokes, 4);
        assert_eq!(pending.first_ts, 0);
    }

    #[test]
    fn rejects_short_and_incremental_values() {
        let mut buffer = InputBuffer::new();
        let key = InputKey::for_target("https://example.com/", &field());
        assert_eq!(buffer.evaluate(&key, "g", 2, 3), Err(InputRejection::TooShort));
        assert_eq!(buffer.evaluate(&key, "github", 2, 3), Ok(()));

        buffer.remember(key.clone(), "github".into());
        assert_eq!(
            buffer.evaluate(&key, "githubs", 2, 3),
            Err(InputRejection::IncrementalEdit)
        );
        assert_eq!(
            buffer.evaluate(&key, "githu", 2, 3),
            Err(InputRejection::IncrementalEdit)
        );
        assert_eq!(
            buffer.evaluate(&key, "gitlab", 2, 3),
            Err(InputRejection::IncrementalEdit)
        );
        assert_eq!(buffer.evaluate(&key, "github actions", 2, 3), Ok(()));
        assert_eq!(buffer.evaluate(&key, "git", 2, 3), Ok(()));
    }

    #[test]
    fn pending_keys_oldest_first() {
        let mut buffer = InputBuffer::new();
        let other = ElementDescriptor {
            tag_name: Some("input".into()),
            id: Some("email".into()),
            ..Default::default()
        };
        let late = InputKey::for_target("https://example.com/", &field());
        let early = InputKey::for_target("https://example.com/", &other);
        buffer.update(late.clone(), field(), "late".into(), meta(50));
        buffer.update(early.clone(), other, "early".into(), meta(10));
        assert_eq!(buffer.pending_keys(), vec![early, late]);
    }
}
