use element_context::{is_interactive, ElementDescriptor};
use soulbrowser_core_types::TimestampMs;

use crate::ingest::EventMeta;

/// One click, with its target already resolved to the interactive ancestor.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickRecord {
    pub target: ElementDescriptor,
    pub meta: EventMeta,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClickSequence {
    pub clicks: Vec<ClickRecord>,
    /// Engine time the window opened.
    pub opened_at: TimestampMs,
}

impl ClickSequence {
    /// The single click; else the first interactive target; else the last click.
    pub fn choose(&self) -> Option<&ClickRecord> {
        if self.clicks.len() == 1 {
            return self.clicks.first();
        }
        self.clicks
            .iter()
            .find(|click| is_interactive(&click.target))
            .or_else(|| self.clicks.last())
    }
}

/// Click-sequence aggregator with a fixed window from the first click.
#[derive(Debug, Default)]
pub struct ClickBuffer {
    pending: Option<ClickSequence>,
    generation: u64,
}

impl ClickBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a click. Returns the generation when the click opened a new
    /// window; the caller arms the timer only then.
    pub fn push(&mut self, record: ClickRecord, now: TimestampMs) -> Option<u64> {
        match self.pending.as_mut() {
            Some(sequence) => {
                sequence.clicks.push(record);
                None
            }
            None => {
                self.generation += 1;
                self.pending = Some(ClickSequence {
                    clicks: vec![record],
                    opened_at: now,
                });
                Some(self.generation)
            }
        }
    }

    pub fn take_if_current(&mut self, generation: u64) -> Option<ClickSequence> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn take(&mut self) -> Option<ClickSequence> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&ClickSequence> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
