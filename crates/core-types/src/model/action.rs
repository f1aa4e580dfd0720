use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::element::ElementContext;
use crate::model::page::PageContext;
use crate::{ActionId, TimestampMs};

/// Stable action taxonomy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Click,
    Type,
    Navigation,
    Submit,
    Select,
    Toggle,
    Keypress,
    Scroll,
    Hover,
    Copy,
    Cut,
    Paste,
    Drop,
    Focus,
    Blur,
    Unknown,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "CLICK",
            ActionType::Type => "TYPE",
            ActionType::Navigation => "NAVIGATION",
            ActionType::Submit => "SUBMIT",
            ActionType::Select => "SELECT",
            ActionType::Toggle => "TOGGLE",
            ActionType::Keypress => "KEYPRESS",
            ActionType::Scroll => "SCROLL",
            ActionType::Hover => "HOVER",
            ActionType::Copy => "COPY",
            ActionType::Cut => "CUT",
            ActionType::Paste => "PASTE",
            ActionType::Drop => "DROP",
            ActionType::Focus => "FOCUS",
            ActionType::Blur => "BLUR",
            ActionType::Unknown => "UNKNOWN",
        }
    }

    /// Types already debounced upstream; they skip the minimum-gap throttle.
    pub fn is_self_debounced(&self) -> bool {
        matches!(self, ActionType::Type | ActionType::Navigation)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveKind {
    Password,
    CreditCard,
    Email,
}

impl SensitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveKind::Password => "password",
            SensitiveKind::CreditCard => "credit_card",
            SensitiveKind::Email => "email",
        }
    }
}

/// Value carried by an action. Sensitive input only ever exists in masked form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActionValue {
    Text(String),
    Masked {
        kind: SensitiveKind,
        display: String,
        length: usize,
    },
    Url(String),
    Key(String),
    Structured(serde_json::Value),
}

impl ActionValue {
    /// Rendering safe to show in descriptions and UIs.
    pub fn display(&self) -> String {
        match self {
            ActionValue::Text(text) | ActionValue::Url(text) | ActionValue::Key(text) => {
                text.clone()
            }
            ActionValue::Masked { display, .. } => display.clone(),
            ActionValue::Structured(value) => value.to_string(),
        }
    }

    /// Length in characters of the value as entered by the user.
    pub fn char_len(&self) -> usize {
        match self {
            ActionValue::Text(text) | ActionValue::Url(text) | ActionValue::Key(text) => {
                text.chars().count()
            }
            ActionValue::Masked { length, .. } => *length,
            ActionValue::Structured(value) => match value {
                serde_json::Value::Null => 0,
                serde_json::Value::String(s) => s.chars().count(),
                other => other.to_string().chars().count(),
            },
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, ActionValue::Masked { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ActionValue::Text(text) | ActionValue::Url(text) | ActionValue::Key(text) => {
                Some(text.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// Classified, deduplicated unit of user intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticAction {
    pub id: ActionId,
    pub action_type: ActionType,
    pub timestamp: TimestampMs,
    pub description: String,
    pub target: ElementContext,
    #[serde(default)]
    pub value: Option<ActionValue>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub page_context: PageContext,
    pub intent: String,
}

impl SemanticAction {
    pub fn value_len(&self) -> usize {
        self.value.as_ref().map(ActionValue::char_len).unwrap_or(0)
    }
}
