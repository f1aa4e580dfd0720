use std::collections::HashMap;
use std::hash::Hash;

use soulbrowser_core_types::TimestampMs;

/// A due timer: the key it was armed for and the generation it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<K> {
    pub key: K,
    pub generation: u64,
    pub due: TimestampMs,
}

#[derive(Clone, Debug)]
struct Slot {
    due: TimestampMs,
    generation: u64,
    seq: u64,
}

/// One cancellable timer per key. Re-arming a key replaces its previous timer.
#[derive(Debug)]
pub struct TimerQueue<K> {
    slots: HashMap<K, Slot>,
    seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            seq: 0,
        }
    }
}

impl<K> TimerQueue<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, key: K, due: TimestampMs, generation: u64) {
        self.seq += 1;
        self.slots.insert(
            key,
            Slot {
                due,
                generation,
                seq: self.seq,
            },
        );
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn next_deadline(&self) -> Option<TimestampMs> {
        self.slots.values().map(|slot| slot.due).min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    /// Ties keep arming order.
    pub fn pop_due(&mut self, now: TimestampMs) -> Vec<Fired<K>> {
        let mut due: Vec<(K, Slot)> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.due <= now)
            .map(|(key, slot)| (key.clone(), slot.clone()))
            .collect();
        due.sort_by_key(|(_, slot)| (slot.due, slot.seq));
        for (key, _) in &due {
            self.slots.remove(key);
        }
        due.into_iter()
            .map(|(key, slot)| Fired {
                key,
                generation: slot.generation,
                due: slot.due,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule("click", 800, 1);
        timers.schedule("nav", 500, 1);
        timers.schedule("input", 900, 3);
        assert_eq!(timers.next_deadline(), Some(500));

        let fired: Vec<_> = timers.pop_due(850).into_iter().map(|f| f.key).collect();
        assert_eq!(fired, vec!["nav", "click"]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(900));
    }

    #[test]
    fn rearming_replaces_previous_timer() {
        let mut timers = TimerQueue::new();
        timers.schedule("input", 800, 1);
        timers.schedule("input", 1_200, 2);
        assert!(timers.pop_due(1_000).is_empty());
        let fired = timers.pop_due(1_200);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].generation, 2);
    }

    #[test]
    fn cancel_removes_timer() {
        let mut timers = TimerQueue::new();
        timers.schedule(7u32, 10, 1);
        assert!(timers.cancel(&7));
        assert!(!timers.cancel(&7));
        assert_eq!(timers.next_deadline(), None);
    }
}
