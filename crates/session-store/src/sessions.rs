use std::sync::Arc;

use soulbrowser_core_types::{RecordingSession, SessionId};
use tracing::{debug, warn};

use crate::errors::StoreResult;
use crate::kv::KvStore;

/// Namespace of session records in the key-value store.
pub const SESSION_KEY_PREFIX: &str = "recording_session:";

/// Session records over a [`KvStore`]. Every save rewrites the full record.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn key_for(id: &SessionId) -> String {
        format!("{SESSION_KEY_PREFIX}{}", id.as_str())
    }

    pub fn save(&self, session: &RecordingSession) -> StoreResult<()> {
        let bytes = serde_json::to_vec(session)?;
        self.kv.put(&Self::key_for(&session.id), &bytes)?;
        debug!(
            session_id = %session.id,
            actions = session.actions().len(),
            "session persisted"
        );
        Ok(())
    }

    pub fn load(&self, id: &SessionId) -> StoreResult<Option<RecordingSession>> {
        match self.kv.get(&Self::key_for(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All decodable sessions; undecodable records are skipped with a warning.
    pub fn list(&self) -> StoreResult<Vec<RecordingSession>> {
        let mut sessions = Vec::new();
        for key in self.kv.list_keys(SESSION_KEY_PREFIX)? {
            let Some(bytes) = self.kv.get(&key)? else {
                continue;
            };
            match serde_json::from_slice::<RecordingSession>(&bytes) {
                Ok(session) => sessions.push(session),
                Err(err) => warn!(%key, %err, "skipping undecodable session record"),
            }
        }
        Ok(sessions)
    }

    pub fn ids(&self) -> StoreResult<Vec<SessionId>> {
        Ok(self
            .kv
            .list_keys(SESSION_KEY_PREFIX)?
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(SESSION_KEY_PREFIX)
                    .map(|id| SessionId(id.to_string()))
            })
            .collect())
    }

    pub fn delete(&self, id: &SessionId) -> StoreResult<bool> {
        self.kv.delete(&Self::key_for(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::InMemoryKvStore;
    use soulbrowser_core_types::PageContext;

    fn store() -> (Arc<InMemoryKvStore>, SessionStore) {
        let kv = Arc::new(InMemoryKvStore::new());
        let store = SessionStore::new(kv.clone());
        (kv, store)
    }

    #[test]
    fn save_and_load() {
        let (_, store) = store();
        let session = RecordingSession::new(
            "Search docs",
            Some("smoke".into()),
            10,
            PageContext::minimal("https://example.com", "Example", 10),
        );
        store.save(&session).expect("save");
        let loaded = store.load(&session.id).expect("load").expect("present");
        assert_eq!(loaded, session);
        assert_eq!(store.ids().expect("ids"), vec![session.id.clone()]);
        assert!(store.delete(&session.id).expect("delete"));
        assert!(store.load(&session.id).expect("load").is_none());
    }

    #[test]
    fn list_skips_garbage() {
        let (kv, store) = store();
        let session = RecordingSession::new(
            "goal",
            None,
            0,
            PageContext::minimal("https://example.com", "", 0),
        );
        store.save(&session).expect("save");
        kv.put("recording_session:broken", b"{not json").expect("put");
        kv.put("unrelated", b"{}").expect("put");

        let listed = store.list().expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, session.id);
    }
}
