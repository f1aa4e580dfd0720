use element_context::{ElementContextExtractor, ElementDescriptor};
use semantic_classifier::{action_type_for_kind, admit, describe_action, infer_intent, Admission};
use soulbrowser_core_types::{ActionId, ActionType, ElementOrigin, PageContext, SemanticAction};

fn descriptor(json: &str) -> ElementDescriptor {
    serde_json::from_str(json).expect("descriptor json")
}

fn candidate(kind: &str, desc: &ElementDescriptor) -> SemanticAction {
    let target = ElementContextExtractor::default().extract(desc, ElementOrigin::InPage);
    let action_type = action_type_for_kind(kind, desc.tag_name.as_deref(), desc.input_type.as_deref());
    let page = PageContext::minimal("https://example.com/login", "Login", 1_000);
    SemanticAction {
        id: ActionId::new(),
        action_type,
        timestamp: 1_000,
        description: describe_action(action_type, &target, None, &page),
        intent: infer_intent(action_type, &target, None),
        target,
        value: None,
        coordinates: None,
        page_context: page,
    }
}

#[test]
fn sign_in_button_click_is_admitted_as_submit_form() {
    let desc = descriptor(r#"{"tagName": "BUTTON", "id": "signin", "innerText": "Sign in"}"#);
    let action = candidate("pointerup", &desc);
    assert_eq!(action.action_type, ActionType::Click);
    assert_eq!(action.description, "Click \"Sign in\" button");
    assert_eq!(action.intent, "submit_form");
    assert_eq!(admit(&action), Admission::Accepted);
}

#[test]
fn anonymous_div_click_is_rejected() {
    let desc = descriptor(r#"{"tagName": "DIV"}"#);
    let action = candidate("click", &desc);
    assert_ne!(admit(&action), Admission::Accepted);
}

#[test]
fn focus_on_search_field_is_kept() {
    let desc = descriptor(r#"{"tagName": "input", "type": "search", "name": "q"}"#);
    let action = candidate("focusin", &desc);
    assert_eq!(action.action_type, ActionType::Focus);
    assert_eq!(action.intent, "focus_field");
    assert_eq!(admit(&action), Admission::Accepted);
}
