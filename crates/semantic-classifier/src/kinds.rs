//! Raw event kind mapping

use serde::{Deserialize, Serialize};
use soulbrowser_core_types::ActionType;

/// Family of raw event kinds that collapse into one handling path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFamily {
    Click,
    Input,
    Keypress,
    Navigation,
    Submit,
    Change,
    Focus,
    Blur,
    Scroll,
    Hover,
    Copy,
    Cut,
    Paste,
    Drop,
    Unknown,
}

impl KindFamily {
    /// Case-insensitive alias lookup. Never fails; unknown kinds map to `Unknown`.
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "click" | "mousedown" | "mouseup" | "pointerdown" | "pointerup" | "dblclick"
            | "auxclick" | "tap" => KindFamily::Click,
            "input" | "type" | "beforeinput" => KindFamily::Input,
            "keydown" | "keypress" | "keyup" => KindFamily::Keypress,
            "navigation" | "navigate" | "did-navigate" | "did-navigate-in-page" | "load"
            | "page-load" | "popstate" | "hashchange" | "pushstate" | "replacestate" => {
                KindFamily::Navigation
            }
            "submit" => KindFamily::Submit,
            "change" | "select" => KindFamily::Change,
            "focus" | "focusin" => KindFamily::Focus,
            "blur" | "focusout" => KindFamily::Blur,
            "scroll" | "wheel" => KindFamily::Scroll,
            "hover" | "mouseover" | "mouseenter" => KindFamily::Hover,
            "copy" => KindFamily::Copy,
            "cut" => KindFamily::Cut,
            "paste" => KindFamily::Paste,
            "drop" => KindFamily::Drop,
            _ => KindFamily::Unknown,
        }
    }

    /// Whether an event of this family is meaningless without a target element.
    /// Families that may address the whole page fall back to a page target.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            KindFamily::Click
                | KindFamily::Input
                | KindFamily::Change
                | KindFamily::Focus
                | KindFamily::Blur
                | KindFamily::Hover
                | KindFamily::Drop
        )
    }
}

/// Maps a raw kind plus the target's tag and input type to an action type.
pub fn action_type_for_kind(kind: &str, tag: Option<&str>, input_type: Option<&str>) -> ActionType {
    let tag = tag.map(str::to_ascii_lowercase);
    let input_type = input_type.map(str::to_ascii_lowercase);
    match KindFamily::parse(kind) {
        KindFamily::Click => ActionType::Click,
        KindFamily::Input => ActionType::Type,
        KindFamily::Keypress => ActionType::Keypress,
        KindFamily::Navigation => ActionType::Navigation,
        KindFamily::Submit => ActionType::Submit,
        KindFamily::Change => match (tag.as_deref(), input_type.as_deref()) {
            (_, Some("checkbox" | "radio")) => ActionType::Toggle,
            (Some("select"), _) => ActionType::Select,
            (Some("input" | "textarea"), _) => ActionType::Type,
            _ => ActionType::Select,
        },
        KindFamily::Focus => ActionType::Focus,
        KindFamily::Blur => ActionType::Blur,
        KindFamily::Scroll => ActionType::Scroll,
        KindFamily::Hover => ActionType::Hover,
        KindFamily::Copy => ActionType::Copy,
        KindFamily::Cut => ActionType::Cut,
        KindFamily::Paste => ActionType::Paste,
        KindFamily::Drop => ActionType::Drop,
        KindFamily::Unknown => ActionType::Unknown,
    }
}
