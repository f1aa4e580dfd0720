use soulbrowser_core_types::TimestampMs;

use crate::ingest::EventMeta;

/// Navigation signals collapsed so far.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingNavigation {
    /// Latest destination wins.
    pub destination: String,
    /// Metadata of the latest signal.
    pub meta: EventMeta,
    pub first_ts: TimestampMs,
    pub signals: usize,
}

/// Single-slot navigation debouncer.
#[derive(Debug, Default)]
pub struct NavigationBuffer {
    pending: Option<PendingNavigation>,
    generation: u64,
}

impl NavigationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a signal into the slot and returns the generation to arm the timer with.
    pub fn push(&mut self, destination: String, meta: EventMeta) -> u64 {
        self.generation += 1;
        match self.pending.as_mut() {
            Some(pending) => {
                pending.destination = destination;
                pending.meta = meta;
                pending.signals += 1;
            }
            None => {
                self.pending = Some(PendingNavigation {
                    destination,
                    first_ts: meta.timestamp,
                    meta,
                    signals: 1,
                });
            }
        }
        self.generation
    }

    /// Takes the entry only when `generation` is still current.
    pub fn take_if_current(&mut self, generation: u64) -> Option<PendingNavigation> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn take(&mut self) -> Option<PendingNavigation> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
