//! Intent inference
//!
//! Decision table keyed on the action type first, then on substrings of the
//! target's role, description and text.

use soulbrowser_core_types::{ActionType, ActionValue, ElementContext, SensitiveKind};

use crate::keywords::{self, mentions};

/// Infers a stable intent label. Total; unmatched rows fall back to a generic label.
pub fn infer_intent(
    action_type: ActionType,
    element: &ElementContext,
    value: Option<&ActionValue>,
) -> String {
    let haystack = haystack(element);
    let role = element.role.to_ascii_lowercase();

    let intent = match action_type {
        ActionType::Type => type_intent(element, &role, &haystack, value),
        ActionType::Click => click_intent(element, &role, &haystack),
        ActionType::Submit => {
            if mentions(&haystack, keywords::SEARCH) || role == "search" {
                "search"
            } else if mentions(&haystack, keywords::AUTH) {
                "authenticate"
            } else {
                "submit_form"
            }
        }
        ActionType::Navigation => "navigate",
        ActionType::Select => "choose_option",
        ActionType::Toggle => "toggle_option",
        ActionType::Keypress => key_intent(value),
        ActionType::Scroll => "browse_content",
        ActionType::Hover => "inspect_element",
        ActionType::Copy => "copy_content",
        ActionType::Cut => "cut_content",
        ActionType::Paste => "paste_content",
        ActionType::Drop => {
            if mentions(&haystack, keywords::UPLOAD) {
                "upload_file"
            } else {
                "drop_content"
            }
        }
        ActionType::Focus => "focus_field",
        ActionType::Blur => "leave_field",
        ActionType::Unknown => "unknown",
    };
    intent.to_string()
}

fn type_intent(
    element: &ElementContext,
    role: &str,
    haystack: &str,
    value: Option<&ActionValue>,
) -> &'static str {
    let masked = match value {
        Some(ActionValue::Masked { kind, .. }) => Some(*kind),
        _ => None,
    };

    if role == "searchbox" || mentions(haystack, keywords::SEARCH) {
        "search"
    } else if masked == Some(SensitiveKind::Password) || mentions(haystack, keywords::PASSWORD) {
        "enter_password"
    } else if masked == Some(SensitiveKind::Email) || mentions(haystack, keywords::EMAIL) {
        "enter_email"
    } else if masked == Some(SensitiveKind::CreditCard) || mentions(haystack, keywords::PAYMENT) {
        "enter_payment"
    } else if mentions(haystack, keywords::USERNAME) {
        "enter_username"
    } else if element.tag() == "textarea" || element.tag() == "div" {
        "compose_text"
    } else {
        "enter_text"
    }
}

fn click_intent(element: &ElementContext, role: &str, haystack: &str) -> &'static str {
    if role == "link" {
        return "navigate_to_page";
    }
    let is_button = role == "button" || element.tag() == "button";
    if is_button && mentions(haystack, keywords::SUBMIT) {
        return "submit_form";
    }
    if mentions(haystack, keywords::SEARCH) {
        "search"
    } else if mentions(haystack, keywords::DISMISS) {
        "dismiss"
    } else if mentions(haystack, keywords::MENU) {
        "open_menu"
    } else if mentions(haystack, keywords::PURCHASE) {
        "purchase"
    } else if matches!(role, "checkbox" | "radio" | "switch") {
        "toggle_option"
    } else if element.is_interactive {
        "activate_control"
    } else {
        "interact"
    }
}

fn key_intent(value: Option<&ActionValue>) -> &'static str {
    let key = value.and_then(ActionValue::as_text).unwrap_or_default();
    match key {
        "Enter" => "confirm",
        "Escape" | "Esc" => "dismiss",
        "Tab" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => "navigate_focus",
        "Backspace" | "Delete" => "edit_text",
        _ => "keyboard_shortcut",
    }
}

fn haystack(element: &ElementContext) -> String {
    let mut haystack = format!("{} {}", element.role, element.description);
    if let Some(text) = &element.text {
        haystack.push(' ');
        haystack.push_str(text);
    }
    haystack.to_lowercase()
}
