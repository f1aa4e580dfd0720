use std::sync::Arc;

use pretty_assertions::assert_eq;
use soulbrowser_core_types::{
    ActionId, ActionType, ActionValue, ElementContext, PageContext, RecordingSession,
    SemanticAction, SensitiveKind,
};
use soulbrowser_session_store::{export_jsonl, FileKvStore, JsonlLine, SessionStore};

fn session_with_actions() -> RecordingSession {
    let page = PageContext::minimal("https://example.com/login", "Login", 1_000);
    let mut session = RecordingSession::new("Login test", None, 1_000, page.clone());
    session.push_action(SemanticAction {
        id: ActionId::new(),
        action_type: ActionType::Type,
        timestamp: 1_500,
        description: "Type \"a***@example.com\" into textbox #email".into(),
        target: ElementContext {
            description: "input(type=email) id=\"email\"".into(),
            selector: "input[type=\"email\"]#email".into(),
            role: "textbox".into(),
            is_interactive: true,
            unique_identifiers: vec!["#email".into()],
            ..Default::default()
        },
        value: Some(ActionValue::Masked {
            kind: SensitiveKind::Email,
            display: "a***@example.com".into(),
            length: 17,
        }),
        coordinates: None,
        page_context: page,
        intent: "enter_email".into(),
    });
    session.record_page("https://example.com/home");
    session.finalize(3_000);
    session
}

#[test]
fn sessions_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_actions();
    {
        let store = SessionStore::new(Arc::new(FileKvStore::open(dir.path()).expect("open")));
        store.save(&session).expect("save");
    }

    let reopened = SessionStore::new(Arc::new(FileKvStore::open(dir.path()).expect("reopen")));
    let loaded = reopened
        .load(&session.id)
        .expect("load")
        .expect("session present");
    assert_eq!(loaded, session);
    assert_eq!(loaded.metadata.total_actions, 1);
    assert_eq!(reopened.list().expect("list").len(), 1);
}

#[test]
fn export_keeps_action_order_and_masking() {
    let session = session_with_actions();
    let lines = export_jsonl(&session).expect("export");
    assert_eq!(lines.len(), 3);
    assert!(!lines.iter().any(|line| line.contains("alice")));

    let parsed: JsonlLine = serde_json::from_str(&lines[1]).expect("action line");
    match parsed {
        JsonlLine::Action { seq, action } => {
            assert_eq!(seq, 0);
            assert_eq!(action.action_type, ActionType::Type);
            assert_eq!(action.intent, "enter_email");
        }
        other => panic!("unexpected line {other:?}"),
    }
}
