//! Rolling-window duplicate suppression and minimum-gap throttling

use std::collections::VecDeque;

use sha2::{Digest, Sha256};
use soulbrowser_core_types::{SemanticAction, TimestampMs};

/// Outcome of a duplicate check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DedupVerdict {
    Fresh,
    Duplicate,
    TooSoon,
}

impl DedupVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupVerdict::Fresh => "fresh",
            DedupVerdict::Duplicate => "duplicate",
            DedupVerdict::TooSoon => "too_soon",
        }
    }
}

/// Content fingerprint of an action: type, description, target and page.
pub fn fingerprint(action: &SemanticAction) -> String {
    let mut hasher = Sha256::new();
    hasher.update(action.action_type.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(action.description.as_bytes());
    hasher.update(b"|");
    hasher.update(action.target.description.as_bytes());
    hasher.update(b"|");
    hasher.update(action.page_context.url.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Accepted fingerprint with the event time it carries and the engine time
/// it was recorded at.
#[derive(Debug, Clone)]
struct Seen {
    key: String,
    at: TimestampMs,
    recorded_at: TimestampMs,
}

impl Seen {
    /// Entries leave the window only once the engine clock has moved a full
    /// window past both their event time and their arrival.
    fn expired(&self, now: TimestampMs, window_ms: u64) -> bool {
        self.at.max(self.recorded_at).saturating_add(window_ms) <= now
    }
}

#[derive(Debug)]
pub struct DedupFilter {
    window_ms: u64,
    min_gap_ms: u64,
    recent: VecDeque<Seen>,
    /// Accepted navigation destinations, for collapsing a raw navigation
    /// into the link click that caused it.
    navigations: VecDeque<Seen>,
    last_throttled: Option<TimestampMs>,
}

impl DedupFilter {
    pub fn new(window_ms: u64, min_gap_ms: u64) -> Self {
        Self {
            window_ms,
            min_gap_ms,
            recent: VecDeque::new(),
            navigations: VecDeque::new(),
            last_throttled: None,
        }
    }

    pub fn check(&self, action: &SemanticAction) -> DedupVerdict {
        let hash = fingerprint(action);
        let ts = action.timestamp;
        if self
            .recent
            .iter()
            .any(|seen| seen.key == hash && ts.abs_diff(seen.at) < self.window_ms)
        {
            return DedupVerdict::Duplicate;
        }
        if !action.action_type.is_self_debounced() {
            if let Some(last) = self.last_throttled {
                if ts.abs_diff(last) < self.min_gap_ms {
                    return DedupVerdict::TooSoon;
                }
            }
        }
        DedupVerdict::Fresh
    }

    /// Records an accepted action at engine time `now`. Only call once the
    /// action is in the session.
    pub fn record(&mut self, action: &SemanticAction, now: TimestampMs) {
        let ts = action.timestamp;
        self.prune(now);
        self.recent.push_back(Seen {
            key: fingerprint(action),
            at: ts,
            recorded_at: now,
        });
        if !action.action_type.is_self_debounced() {
            self.last_throttled = Some(ts);
        }
    }

    pub fn record_navigation(&mut self, destination: &str, ts: TimestampMs, now: TimestampMs) {
        self.prune(now);
        self.navigations.push_back(Seen {
            key: normalize_destination(destination),
            at: ts,
            recorded_at: now,
        });
    }

    /// True when an accepted navigation reached `destination` within the window.
    pub fn navigated_recently(&self, destination: &str, ts: TimestampMs) -> bool {
        let destination = normalize_destination(destination);
        self.navigations
            .iter()
            .any(|seen| seen.key == destination && ts.abs_diff(seen.at) < self.window_ms)
    }

    pub fn reset(&mut self) {
        self.recent.clear();
        self.navigations.clear();
        self.last_throttled = None;
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Drops entries that can no longer collide with anything still to come.
    pub fn prune(&mut self, now: TimestampMs) {
        let window_ms = self.window_ms;
        self.recent.retain(|seen| !seen.expired(now, window_ms));
        self.navigations.retain(|seen| !seen.expired(now, window_ms));
    }
}

/// Destination without fragment or trailing slash.
fn normalize_destination(destination: &str) -> String {
    match url::Url::parse(destination) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => destination
            .split('#')
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulbrowser_core_types::{ActionId, ActionType, ElementContext, PageContext};

    fn action(action_type: ActionType, description: &str, ts: TimestampMs) -> SemanticAction {
        SemanticAction {
            id: ActionId::new(),
            action_type,
            timestamp: ts,
            description: description.into(),
            target: ElementContext {
                description: "button id=\"go\"".into(),
                ..Default::default()
            },
            value: None,
            coordinates: None,
            page_context: PageContext::minimal("https://example.com/", "", ts),
            intent: String::new(),
        }
    }

    #[test]
    fn identical_actions_inside_window_are_duplicates() {
        let mut filter = DedupFilter::new(2_000, 200);
        let first = action(ActionType::Click, "Click \"Go\" button", 1_000);
        assert_eq!(filter.check(&first), DedupVerdict::Fresh);
        filter.record(&first, 1_000);

        let again = action(ActionType::Click, "Click \"Go\" button", 2_500);
        assert_eq!(filter.check(&again), DedupVerdict::Duplicate);

        let later = action(ActionType::Click, "Click \"Go\" button", 3_000);
        assert_eq!(filter.check(&later), DedupVerdict::Fresh);
    }

    #[test]
    fn min_gap_spares_type_and_navigation() {
        let mut filter = DedupFilter::new(2_000, 200);
        filter.record(&action(ActionType::Click, "Click a", 1_000), 1_000);

        let quick_click = action(ActionType::Click, "Click b", 1_100);
        assert_eq!(filter.check(&quick_click), DedupVerdict::TooSoon);

        let quick_type = action(ActionType::Type, "Type \"abc\"", 1_100);
        assert_eq!(filter.check(&quick_type), DedupVerdict::Fresh);
    }

    #[test]
    fn navigation_destinations_ignore_fragment() {
        let mut filter = DedupFilter::new(2_000, 200);
        filter.record_navigation("https://example.com/docs#intro", 1_000, 1_000);
        assert!(filter.navigated_recently("https://example.com/docs/", 1_500));
        assert!(!filter.navigated_recently("https://example.com/docs", 3_500));
        assert!(!filter.navigated_recently("https://example.com/blog", 1_500));
    }

    #[test]
    fn late_event_from_lagging_channel_still_collides() {
        let mut filter = DedupFilter::new(2_000, 200);
        let size = action(ActionType::Select, "Select \"L\" in size", 1_000);
        filter.record(&size, 1_000);
        // A channel running ahead must not push older entries out.
        filter.record(&action(ActionType::Select, "Select \"red\" in color", 5_000), 1_100);

        let late = action(ActionType::Select, "Select \"L\" in size", 1_500);
        assert_eq!(filter.check(&late), DedupVerdict::Duplicate);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn entries_expire_on_engine_time() {
        let mut filter = DedupFilter::new(2_000, 200);
        filter.record(&action(ActionType::Click, "Click a", 1_000), 1_000);
        filter.prune(2_999);
        assert_eq!(filter.len(), 1);
        filter.prune(3_000);
        assert!(filter.is_empty());
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = action(ActionType::Click, "Click a", 1);
        let b = action(ActionType::Click, "Click a", 99);
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);
    }
}
