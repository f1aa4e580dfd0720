//! Admission gates applied after deduplication

use element_context::{is_form_like_role, is_navigation_like_role};
use serde::{Deserialize, Serialize};
use soulbrowser_core_types::{ActionType, ActionValue, SemanticAction};
use tracing::trace;

/// Control keys worth recording on their own.
const CONTROL_KEYS: &[&str] = &[
    "Enter",
    "Escape",
    "Esc",
    "Tab",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "Backspace",
    "Delete",
    "Shift",
    "Control",
    "Alt",
    "Meta",
];

/// Minimum typed length (exclusive) for a TYPE to count as significant.
const SIGNIFICANT_TYPE_LEN: usize = 2;

/// Outcome of the two admission gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    Accepted,
    NotSignificant,
    LowQuality,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Admission::Accepted => "accepted",
            Admission::NotSignificant => "not_significant",
            Admission::LowQuality => "low_quality",
        }
    }
}

pub fn is_whitelisted_key(key: &str) -> bool {
    CONTROL_KEYS.contains(&key)
}

pub fn is_semantically_significant(action: &SemanticAction) -> bool {
    match action.action_type {
        ActionType::Navigation | ActionType::Submit => true,
        ActionType::Click => action.target.is_interactive,
        ActionType::Type => action.value_len() > SIGNIFICANT_TYPE_LEN,
        ActionType::Keypress => action
            .value
            .as_ref()
            .and_then(ActionValue::as_text)
            .map(is_whitelisted_key)
            .unwrap_or(false),
        ActionType::Scroll | ActionType::Hover => false,
        ActionType::Select
        | ActionType::Toggle
        | ActionType::Copy
        | ActionType::Cut
        | ActionType::Paste
        | ActionType::Drop
        | ActionType::Focus
        | ActionType::Blur
        | ActionType::Unknown => true,
    }
}

pub fn is_low_quality(action: &SemanticAction) -> bool {
    let target = &action.target;
    match action.action_type {
        ActionType::Focus | ActionType::Blur => {
            let role = target.role.to_ascii_lowercase();
            !(is_form_like_role(&role) || is_navigation_like_role(&role))
        }
        ActionType::Click => !target.has_identifying_fragment() && !target.is_interactive,
        ActionType::Type => action.value_len() == 0,
        _ => false,
    }
}

/// Significant and not low quality.
pub fn admit(action: &SemanticAction) -> Admission {
    let admission = if !is_semantically_significant(action) {
        Admission::NotSignificant
    } else if is_low_quality(action) {
        Admission::LowQuality
    } else {
        Admission::Accepted
    };
    trace!(
        target: "classifier.gate",
        action_type = action.action_type.as_str(),
        admission = admission.reason(),
        "classifier.gate.evaluated"
    );
    admission
}
