//! Event ingestion boundary
//!
//! Both capture channels deliver the same loose [`RawEvent`] record. It is
//! validated once here and turned into an [`InteractionEvent`]; nothing past
//! this module touches untyped payloads except to carry them as values.

use std::fmt;

use element_context::{ElementDescriptor, PageContextDescriptor};
use semantic_classifier::{action_type_for_kind, KindFamily};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use soulbrowser_core_types::{ActionType, Coordinates, TimestampMs};

use crate::errors::IngestError;

/// Producer of a raw event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureChannel {
    /// Privileged capture channel (browser shell side).
    Native,
    /// Listener injected into the page.
    InPage,
}

impl CaptureChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureChannel::Native => "native",
            CaptureChannel::InPage => "in_page",
        }
    }
}

impl fmt::Display for CaptureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire record delivered by a capture channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    #[serde(alias = "type")]
    pub kind: String,
    pub target: Option<ElementDescriptor>,
    pub value: Option<Value>,
    /// Key name for keyboard events, when not carried in `value`
    pub key: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub url: String,
    pub title: Option<String>,
    pub timestamp: TimestampMs,
    pub page_context: Option<PageContextDescriptor>,
}

/// Fields shared by every normalized event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMeta {
    pub channel: CaptureChannel,
    pub kind: String,
    pub url: String,
    pub title: Option<String>,
    pub timestamp: TimestampMs,
    pub coordinates: Option<Coordinates>,
    pub page: Option<PageContextDescriptor>,
}

/// Normalized interaction, one variant per raw kind family.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
    Click {
        meta: EventMeta,
        target: ElementDescriptor,
    },
    Input {
        meta: EventMeta,
        target: ElementDescriptor,
        value: String,
    },
    Keypress {
        meta: EventMeta,
        target: Option<ElementDescriptor>,
        key: String,
    },
    Navigation {
        meta: EventMeta,
        destination: String,
    },
    Submit {
        meta: EventMeta,
        target: Option<ElementDescriptor>,
    },
    Select {
        meta: EventMeta,
        target: ElementDescriptor,
        value: Option<String>,
    },
    Toggle {
        meta: EventMeta,
        target: ElementDescriptor,
        checked: Option<bool>,
    },
    Focus {
        meta: EventMeta,
        target: ElementDescriptor,
    },
    Blur {
        meta: EventMeta,
        target: ElementDescriptor,
    },
    Scroll {
        meta: EventMeta,
        target: Option<ElementDescriptor>,
    },
    Hover {
        meta: EventMeta,
        target: ElementDescriptor,
    },
    Clipboard {
        meta: EventMeta,
        action_type: ActionType,
        target: Option<ElementDescriptor>,
        text: Option<String>,
    },
    Drop {
        meta: EventMeta,
        target: ElementDescriptor,
        payload: Option<Value>,
    },
    Unknown {
        meta: EventMeta,
        target: Option<ElementDescriptor>,
        payload: Option<Value>,
    },
}

impl InteractionEvent {
    pub fn meta(&self) -> &EventMeta {
        match self {
            InteractionEvent::Click { meta, .. }
            | InteractionEvent::Input { meta, .. }
            | InteractionEvent::Keypress { meta, .. }
            | InteractionEvent::Navigation { meta, .. }
            | InteractionEvent::Submit { meta, .. }
            | InteractionEvent::Select { meta, .. }
            | InteractionEvent::Toggle { meta, .. }
            | InteractionEvent::Focus { meta, .. }
            | InteractionEvent::Blur { meta, .. }
            | InteractionEvent::Scroll { meta, .. }
            | InteractionEvent::Hover { meta, .. }
            | InteractionEvent::Clipboard { meta, .. }
            | InteractionEvent::Drop { meta, .. }
            | InteractionEvent::Unknown { meta, .. } => meta,
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            InteractionEvent::Click { .. } => "click",
            InteractionEvent::Input { .. } => "input",
            InteractionEvent::Keypress { .. } => "keypress",
            InteractionEvent::Navigation { .. } => "navigation",
            InteractionEvent::Submit { .. } => "submit",
            InteractionEvent::Select { .. } => "select",
            InteractionEvent::Toggle { .. } => "toggle",
            InteractionEvent::Focus { .. } => "focus",
            InteractionEvent::Blur { .. } => "blur",
            InteractionEvent::Scroll { .. } => "scroll",
            InteractionEvent::Hover { .. } => "hover",
            InteractionEvent::Clipboard { .. } => "clipboard",
            InteractionEvent::Drop { .. } => "drop",
            InteractionEvent::Unknown { .. } => "unknown",
        }
    }
}

/// Validates a raw event and maps it onto its family variant.
///
/// `fallback_ts` stands in for a missing timestamp.
pub fn normalize(
    channel: CaptureChannel,
    raw: RawEvent,
    fallback_ts: TimestampMs,
) -> Result<InteractionEvent, IngestError> {
    let kind = raw.kind.trim().to_string();
    if kind.is_empty() {
        return Err(IngestError::malformed("<empty>", "missing event kind"));
    }

    let family = KindFamily::parse(&kind);
    if family.requires_target() && raw.target.is_none() {
        return Err(IngestError::malformed(kind, "missing target"));
    }

    let meta = EventMeta {
        channel,
        kind: kind.clone(),
        url: raw.url.trim().to_string(),
        title: raw.title.filter(|title| !title.trim().is_empty()),
        timestamp: if raw.timestamp == 0 {
            fallback_ts
        } else {
            raw.timestamp
        },
        coordinates: raw.coordinates,
        page: raw.page_context,
    };
    let value = raw.value;
    let target = raw.target;

    let event = match family {
        KindFamily::Click => InteractionEvent::Click {
            meta,
            target: required(target, &kind)?,
        },
        KindFamily::Input => {
            let target = required(target, &kind)?;
            let value = value_text(value.as_ref())
                .or_else(|| target.value.clone())
                .unwrap_or_default();
            InteractionEvent::Input {
                meta,
                target,
                value,
            }
        }
        KindFamily::Keypress => {
            let key = raw
                .key
                .or_else(|| value_text(value.as_ref()))
                .filter(|key| !key.is_empty())
                .ok_or_else(|| IngestError::malformed(kind.clone(), "missing key"))?;
            InteractionEvent::Keypress { meta, target, key }
        }
        KindFamily::Navigation => {
            let destination = value_text(value.as_ref())
                .filter(|candidate| looks_like_url(candidate))
                .unwrap_or_else(|| meta.url.clone());
            if destination.is_empty() {
                return Err(IngestError::malformed(kind, "missing destination url"));
            }
            InteractionEvent::Navigation { meta, destination }
        }
        KindFamily::Submit => InteractionEvent::Submit { meta, target },
        KindFamily::Change => {
            let target = required(target, &kind)?;
            match action_type_for_kind(
                &kind,
                target.tag_name.as_deref(),
                target.input_type.as_deref(),
            ) {
                ActionType::Toggle => {
                    let checked = value
                        .as_ref()
                        .and_then(Value::as_bool)
                        .or(target.checked);
                    InteractionEvent::Toggle {
                        meta,
                        target,
                        checked,
                    }
                }
                ActionType::Type => {
                    let value = value_text(value.as_ref())
                        .or_else(|| target.value.clone())
                        .unwrap_or_default();
                    InteractionEvent::Input {
                        meta,
                        target,
                        value,
                    }
                }
                _ => {
                    let value = value_text(value.as_ref()).or_else(|| target.value.clone());
                    InteractionEvent::Select {
                        meta,
                        target,
                        value,
                    }
                }
            }
        }
        KindFamily::Focus => InteractionEvent::Focus {
            meta,
            target: required(target, &kind)?,
        },
        KindFamily::Blur => InteractionEvent::Blur {
            meta,
            target: required(target, &kind)?,
        },
        KindFamily::Scroll => InteractionEvent::Scroll { meta, target },
        KindFamily::Hover => InteractionEvent::Hover {
            meta,
            target: required(target, &kind)?,
        },
        KindFamily::Copy | KindFamily::Cut | KindFamily::Paste => {
            let action_type = match family {
                KindFamily::Copy => ActionType::Copy,
                KindFamily::Cut => ActionType::Cut,
                _ => ActionType::Paste,
            };
            InteractionEvent::Clipboard {
                meta,
                action_type,
                target,
                text: value_text(value.as_ref()),
            }
        }
        KindFamily::Drop => InteractionEvent::Drop {
            meta,
            target: required(target, &kind)?,
            payload: value,
        },
        KindFamily::Unknown => InteractionEvent::Unknown {
            meta,
            target,
            payload: value,
        },
    };
    Ok(event)
}

fn required(target: Option<ElementDescriptor>, kind: &str) -> Result<ElementDescriptor, IngestError> {
    target.ok_or_else(|| IngestError::malformed(kind, "missing target"))
}

/// Scalar payloads as text; objects and arrays are not text.
fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn looks_like_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(json: Value) -> RawEvent {
        serde_json::from_value(json).expect("raw event")
    }

    #[test]
    fn parses_camel_case_wire_record() {
        let event = raw(json!({
            "kind": "pointerup",
            "target": {"tagName": "BUTTON", "id": "go"},
            "coordinates": {"x": 10.0, "y": 20.0},
            "url": "https://example.com/",
            "timestamp": 1234,
            "pageContext": {"title": "Example"}
        }));
        let normalized = normalize(CaptureChannel::InPage, event, 0).expect("click");
        match normalized {
            InteractionEvent::Click { meta, target } => {
                assert_eq!(meta.timestamp, 1234);
                assert_eq!(meta.kind, "pointerup");
                assert_eq!(meta.coordinates, Some(Coordinates { x: 10.0, y: 20.0 }));
                assert_eq!(target.tag(), "button");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_target_is_malformed() {
        let event = raw(json!({"kind": "click", "url": "https://example.com"}));
        assert_eq!(
            normalize(CaptureChannel::Native, event, 5),
            Err(IngestError::malformed("click", "missing target"))
        );
    }

    #[test]
    fn navigation_prefers_url_payload() {
        let event = raw(json!({
            "kind": "did-navigate",
            "value": "https://example.com/next",
            "url": "https://example.com/",
            "timestamp": 10
        }));
        match normalize(CaptureChannel::Native, event, 0).expect("nav") {
            InteractionEvent::Navigation { destination, .. } => {
                assert_eq!(destination, "https://example.com/next");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn change_on_checkbox_becomes_toggle() {
        let event = raw(json!({
            "kind": "change",
            "target": {"tagName": "input", "type": "checkbox", "checked": true},
            "url": "https://example.com/"
        }));
        let normalized = normalize(CaptureChannel::InPage, event, 99).expect("toggle");
        assert_eq!(normalized.family(), "toggle");
        assert_eq!(normalized.meta().timestamp, 99);
    }

    #[test]
    fn unknown_kind_is_kept() {
        let event = raw(json!({"kind": "devicemotion", "url": "https://example.com/"}));
        let normalized = normalize(CaptureChannel::InPage, event, 1).expect("unknown");
        assert_eq!(normalized.family(), "unknown");
    }

    #[test]
    fn keypress_needs_a_key() {
        let event = raw(json!({"kind": "keydown", "url": "https://example.com/"}));
        assert!(normalize(CaptureChannel::InPage, event, 1).is_err());
        let event = raw(json!({"kind": "keydown", "key": "Enter", "url": "https://example.com/"}));
        assert_eq!(
            normalize(CaptureChannel::InPage, event, 1).expect("key").family(),
            "keypress"
        );
    }
}
