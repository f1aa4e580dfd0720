use std::collections::HashMap;

use soulbrowser_core_types::{RecordingSession, SessionId, TimestampMs};
use soulbrowser_session_store::SessionStore;
use tracing::{debug, warn};

use crate::errors::{RecorderError, RecorderResult};

/// The session currently capturing, with its presentation-only pause state.
#[derive(Debug, Clone)]
pub struct ActiveRecording {
    pub session: RecordingSession,
    paused_since: Option<TimestampMs>,
    paused_total_ms: u64,
}

impl ActiveRecording {
    fn new(session: RecordingSession) -> Self {
        Self {
            session,
            paused_since: None,
            paused_total_ms: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Wall time since start minus paused spans.
    pub fn elapsed_ms(&self, now: TimestampMs) -> u64 {
        let running_pause = self
            .paused_since
            .map(|since| now.saturating_sub(since))
            .unwrap_or(0);
        now.saturating_sub(self.session.start_time)
            .saturating_sub(self.paused_total_ms)
            .saturating_sub(running_pause)
    }
}

/// Owns the active recording. Finished sessions are served from the store;
/// only those whose final write failed stay in memory.
pub struct SessionManager {
    store: SessionStore,
    active: Option<ActiveRecording>,
    unsaved: HashMap<SessionId, RecordingSession>,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            active: None,
            unsaved: HashMap::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn begin(&mut self, session: RecordingSession) -> RecorderResult<RecordingSession> {
        if let Some(active) = &self.active {
            return Err(RecorderError::AlreadyRecording {
                session_id: active.session.id.clone(),
            });
        }
        self.persist(&session);
        self.active = Some(ActiveRecording::new(session.clone()));
        Ok(session)
    }

    pub fn active(&self) -> Option<&ActiveRecording> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveRecording> {
        self.active.as_mut()
    }

    pub fn active_session(&self) -> Option<&RecordingSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn pause(&mut self, now: TimestampMs) -> RecorderResult<()> {
        let active = self.active.as_mut().ok_or(RecorderError::NoActiveSession)?;
        if active.paused_since.is_none() {
            active.paused_since = Some(now);
        }
        Ok(())
    }

    pub fn resume(&mut self, now: TimestampMs) -> RecorderResult<()> {
        let active = self.active.as_mut().ok_or(RecorderError::NoActiveSession)?;
        if let Some(since) = active.paused_since.take() {
            active.paused_total_ms += now.saturating_sub(since);
        }
        Ok(())
    }

    pub fn elapsed_ms(&self, now: TimestampMs) -> RecorderResult<u64> {
        self.active
            .as_ref()
            .map(|active| active.elapsed_ms(now))
            .ok_or(RecorderError::NoActiveSession)
    }

    /// Finalizes, persists and retires the active session.
    pub fn finish(&mut self, now: TimestampMs) -> RecorderResult<RecordingSession> {
        let mut active = self.active.take().ok_or(RecorderError::NoActiveSession)?;
        active.session.finalize(now);
        if !self.persist(&active.session) {
            self.unsaved
                .insert(active.session.id.clone(), active.session.clone());
        }
        Ok(active.session)
    }

    /// Re-writes the active session record after an append.
    pub fn persist_active(&self) {
        if let Some(active) = &self.active {
            self.persist(&active.session);
        }
    }

    pub fn session(&self, id: &SessionId) -> Option<RecordingSession> {
        if let Some(active) = self.active.as_ref().filter(|a| &a.session.id == id) {
            return Some(active.session.clone());
        }
        if let Some(session) = self.unsaved.get(id) {
            return Some(session.clone());
        }
        match self.store.load(id) {
            Ok(found) => found,
            Err(err) => {
                warn!(session_id = %id, error = %err, "failed to load recording session");
                None
            }
        }
    }

    /// Active, unsaved and persisted sessions, one entry per id.
    pub fn all_sessions(&self) -> Vec<RecordingSession> {
        let mut by_id: HashMap<SessionId, RecordingSession> = match self.store.list() {
            Ok(stored) => stored
                .into_iter()
                .map(|session| (session.id.clone(), session))
                .collect(),
            Err(err) => {
                warn!(error = %err, "failed to list stored recording sessions");
                HashMap::new()
            }
        };
        for (id, session) in &self.unsaved {
            by_id.insert(id.clone(), session.clone());
        }
        if let Some(active) = &self.active {
            by_id.insert(active.session.id.clone(), active.session.clone());
        }
        by_id.into_values().collect()
    }

    /// Deletes a finished session. The active session cannot be deleted.
    pub fn delete_session(&mut self, id: &SessionId) -> bool {
        if self.active.as_ref().is_some_and(|a| &a.session.id == id) {
            debug!(session_id = %id, "refusing to delete the active session");
            return false;
        }
        let in_memory = self.unsaved.remove(id).is_some();
        let stored = match self.store.delete(id) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(session_id = %id, error = %err, "failed to delete stored recording session");
                false
            }
        };
        in_memory || stored
    }

    pub fn unsaved_len(&self) -> usize {
        self.unsaved.len()
    }

    /// Returns false when the write failed.
    fn persist(&self, session: &RecordingSession) -> bool {
        match self.store.save(session) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    session_id = %session.id,
                    error = %err,
                    "failed to persist recording session; continuing in memory"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulbrowser_core_types::PageContext;
    use soulbrowser_session_store::{
        InMemoryKvStore, KvStore, StoreError, StoreErrorKind, StoreResult,
    };
    use std::sync::Arc;

    fn manager() -> SessionManager {
        SessionManager::new(SessionStore::new(Arc::new(InMemoryKvStore::new())))
    }

    /// Backend that accepts nothing.
    struct BrokenKv;

    impl KvStore for BrokenKv {
        fn put(&self, _key: &str, _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::new(StoreErrorKind::Backend("disk full".into())))
        }
        fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
            Ok(None)
        }
        fn list_keys(&self, _prefix: &str) -> StoreResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn delete(&self, _key: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    fn session(start: TimestampMs) -> RecordingSession {
        RecordingSession::new(
            "Search docs",
            None,
            start,
            PageContext::minimal("https://example.com/", "Example", start),
        )
    }

    #[test]
    fn second_begin_is_rejected() {
        let mut manager = manager();
        let first = manager.begin(session(0)).expect("first");
        let err = manager.begin(session(10)).expect_err("second");
        assert_eq!(
            err,
            RecorderError::AlreadyRecording {
                session_id: first.id
            }
        );
    }

    #[test]
    fn pause_only_affects_elapsed_time() {
        let mut manager = manager();
        manager.begin(session(1_000)).expect("begin");
        manager.pause(2_000).expect("pause");
        assert_eq!(manager.elapsed_ms(2_500).expect("elapsed"), 1_000);
        manager.resume(3_000).expect("resume");
        assert_eq!(manager.elapsed_ms(4_000).expect("elapsed"), 2_000);
        assert!(manager.is_recording());
    }

    #[test]
    fn idle_manager_reports_no_session() {
        let mut manager = manager();
        assert_eq!(manager.pause(0), Err(RecorderError::NoActiveSession));
        assert_eq!(manager.resume(0), Err(RecorderError::NoActiveSession));
        assert_eq!(
            manager.finish(0).map(|s| s.id),
            Err(RecorderError::NoActiveSession)
        );
    }

    #[test]
    fn finished_sessions_are_queryable_and_deletable() {
        let mut manager = manager();
        let started = manager.begin(session(0)).expect("begin");
        assert!(!manager.delete_session(&started.id));

        let done = manager.finish(1_500).expect("finish");
        assert!(!done.is_active);
        assert_eq!(done.metadata.duration_ms, 1_500);
        assert_eq!(manager.session(&done.id), Some(done.clone()));
        assert_eq!(manager.all_sessions().len(), 1);

        assert!(manager.delete_session(&done.id));
        assert_eq!(manager.session(&done.id), None);
        assert!(manager.all_sessions().is_empty());
    }

    #[test]
    fn persisted_sessions_are_not_retained_in_memory() {
        let mut manager = manager();
        for start in 0..5 {
            manager.begin(session(start * 1_000)).expect("begin");
            manager.finish(start * 1_000 + 500).expect("finish");
        }
        assert_eq!(manager.unsaved_len(), 0);
        assert_eq!(manager.all_sessions().len(), 5);
    }

    #[test]
    fn unsaved_sessions_stay_queryable() {
        let mut manager = SessionManager::new(SessionStore::new(Arc::new(BrokenKv)));
        manager.begin(session(0)).expect("begin");
        let done = manager.finish(800).expect("finish");
        assert_eq!(manager.unsaved_len(), 1);
        assert_eq!(manager.session(&done.id), Some(done.clone()));
        assert!(manager.delete_session(&done.id));
        assert_eq!(manager.unsaved_len(), 0);
    }
}
