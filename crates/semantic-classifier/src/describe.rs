use soulbrowser_core_types::{ActionType, ActionValue, ElementContext, PageContext};

/// Short phrase naming the target: `"Sign in" button`, `textbox #email`, `page "Home"`.
pub fn target_phrase(target: &ElementContext) -> String {
    if target.role == "document" {
        return target.description.clone();
    }
    let noun = if target.role.is_empty() || target.role == "generic" {
        match target.tag() {
            "" => "element",
            tag => tag,
        }
    } else {
        target.role.as_str()
    };
    match (&target.text, target.best_identifier()) {
        (Some(text), _) => format!("\"{text}\" {noun}"),
        (None, Some(identifier)) => format!("{noun} {identifier}"),
        (None, None) => noun.to_string(),
    }
}

/// Human-readable one-liner for an action.
pub fn describe_action(
    action_type: ActionType,
    target: &ElementContext,
    value: Option<&ActionValue>,
    page: &PageContext,
) -> String {
    let subject = target_phrase(target);
    let shown = value.map(ActionValue::display);
    match action_type {
        ActionType::Click => format!("Click {subject}"),
        ActionType::Type => match shown {
            Some(text) => format!("Type \"{text}\" into {subject}"),
            None => format!("Clear {subject}"),
        },
        ActionType::Navigation => {
            let url = match value {
                Some(ActionValue::Url(url)) => url.as_str(),
                _ => page.url.as_str(),
            };
            if page.title.is_empty() || target.role != "document" {
                format!("Navigate to {url}")
            } else {
                format!("Navigate to {url} ({})", page.title)
            }
        }
        ActionType::Submit => format!("Submit {subject}"),
        ActionType::Select => match shown {
            Some(option) => format!("Select \"{option}\" in {subject}"),
            None => format!("Select in {subject}"),
        },
        ActionType::Toggle => match shown {
            Some(state) => format!("Toggle {subject} ({state})"),
            None => format!("Toggle {subject}"),
        },
        ActionType::Keypress => match shown {
            Some(key) if target.role == "document" => format!("Press {key}"),
            Some(key) => format!("Press {key} in {subject}"),
            None => format!("Press key in {subject}"),
        },
        ActionType::Scroll => format!("Scroll {subject}"),
        ActionType::Hover => format!("Hover over {subject}"),
        ActionType::Copy => format!("Copy from {subject}"),
        ActionType::Cut => format!("Cut from {subject}"),
        ActionType::Paste => format!("Paste into {subject}"),
        ActionType::Drop => format!("Drop onto {subject}"),
        ActionType::Focus => format!("Focus {subject}"),
        ActionType::Blur => format!("Leave {subject}"),
        ActionType::Unknown => {
            let kind = match value {
                Some(ActionValue::Structured(payload)) => payload
                    .get("kind")
                    .and_then(|kind| kind.as_str())
                    .map(str::to_string),
                _ => None,
            };
            match kind {
                Some(kind) => format!("Unrecognized \"{kind}\" on {subject}"),
                None => format!("Unrecognized interaction on {subject}"),
            }
        }
    }
}
