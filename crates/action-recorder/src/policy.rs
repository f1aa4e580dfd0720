use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{RecorderError, RecorderResult};

#[cfg(test)]
use std::cell::RefCell;

#[cfg(not(test))]
use once_cell::sync::OnceCell;

/// Timing and admission knobs of the recording pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecorderPolicyView {
    /// Navigation signals within this window collapse into one action.
    pub navigation_debounce_ms: u64,
    /// Click sequence window, measured from the first click.
    pub click_window_ms: u64,
    /// Quiet period after the last keystroke before text is committed.
    pub input_debounce_ms: u64,
    pub dedup_window_ms: u64,
    /// Minimum spacing between throttled actions (everything but TYPE/NAVIGATION).
    pub min_action_gap_ms: u64,
    pub min_input_len: usize,
    /// Length change below which a prefix edit of the last recorded text is ignored.
    pub min_input_delta: usize,
    pub max_text_len: usize,
    pub max_key_elements: usize,
    /// Capacity of each capture channel feeding the runtime.
    pub channel_capacity: usize,
}

impl Default for RecorderPolicyView {
    fn default() -> Self {
        Self {
            navigation_debounce_ms: 500,
            click_window_ms: 800,
            input_debounce_ms: 800,
            dedup_window_ms: 2_000,
            min_action_gap_ms: 200,
            min_input_len: 2,
            min_input_delta: 3,
            max_text_len: 50,
            max_key_elements: 10,
            channel_capacity: 256,
        }
    }
}

impl RecorderPolicyView {
    pub fn validate(&self) -> RecorderResult<()> {
        let windows = [
            ("navigation_debounce_ms", self.navigation_debounce_ms),
            ("click_window_ms", self.click_window_ms),
            ("input_debounce_ms", self.input_debounce_ms),
            ("dedup_window_ms", self.dedup_window_ms),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(RecorderError::InvalidPolicy(format!("{name} must be positive")));
        }
        if self.max_text_len == 0 {
            return Err(RecorderError::InvalidPolicy(
                "max_text_len must be positive".into(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(RecorderError::InvalidPolicy(
                "channel_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(not(test))]
static RECORDER_POLICY: OnceCell<Arc<RwLock<RecorderPolicyView>>> = OnceCell::new();

#[cfg(test)]
thread_local! {
    static TEST_POLICY: RefCell<Arc<RwLock<RecorderPolicyView>>> =
        RefCell::new(Arc::new(RwLock::new(RecorderPolicyView::default())));
}

fn policy_cell() -> Arc<RwLock<RecorderPolicyView>> {
    #[cfg(test)]
    {
        return TEST_POLICY.with(|cell| Arc::clone(&cell.borrow()));
    }

    #[cfg(not(test))]
    {
        RECORDER_POLICY
            .get_or_init(|| Arc::new(RwLock::new(RecorderPolicyView::default())))
            .clone()
    }
}

#[derive(Clone)]
pub struct RecorderPolicyHandle {
    inner: Arc<RwLock<RecorderPolicyView>>,
}

impl RecorderPolicyHandle {
    pub fn new_with(view: RecorderPolicyView) -> Self {
        Self {
            inner: Arc::new(RwLock::new(view)),
        }
    }

    pub fn global() -> Self {
        Self {
            inner: policy_cell(),
        }
    }

    pub fn snapshot(&self) -> RecorderPolicyView {
        self.inner.read().clone()
    }

    pub fn update(&self, view: RecorderPolicyView) -> RecorderResult<()> {
        view.validate()?;
        *self.inner.write() = view;
        Ok(())
    }
}

pub fn set_policy(view: RecorderPolicyView) -> RecorderResult<()> {
    RecorderPolicyHandle::global().update(view)
}

pub fn current_policy() -> RecorderPolicyView {
    RecorderPolicyHandle::global().snapshot()
}
