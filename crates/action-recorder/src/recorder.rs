//! Recording engine
//!
//! [`Recorder`] is a synchronous state machine: capture events go in through
//! [`Recorder::ingest`], deferred commits run from [`Recorder::tick`], and
//! every candidate action takes the same path (describe, intent, dedup,
//! admission, append, persist, notify). The owner decides when `tick` runs;
//! [`crate::runtime::RecorderRuntime`] drives it from a tokio task.

use std::sync::Arc;

use element_context::{
    build_page_context, resolve_interaction_target, ElementContextExtractor, ElementDescriptor,
    ExtractOptions,
};
use semantic_classifier::{admit, describe_action, infer_intent};
use serde_json::json;
use soulbrowser_core_types::{
    ActionId, ActionType, ActionValue, Clock, ElementContext, ElementOrigin, PageContext,
    RecordingSession, SemanticAction, SessionId, SystemClock, TimestampMs,
};
use soulbrowser_event_bus::{EventBus, NoopBus};
use soulbrowser_privacy::{protect_value_with, FieldHints, PrivacyPolicyView};
use soulbrowser_session_store::{InMemoryKvStore, KvStore, SessionStore};
use tokio::sync::broadcast;
use tracing::{debug, info, trace};
use url::Url;

use crate::buffers::{
    BufferKey, ClickBuffer, ClickRecord, ClickSequence, InputBuffer, InputKey, NavigationBuffer,
    PendingInput, PendingNavigation,
};
use crate::dedup::{DedupFilter, DedupVerdict};
use crate::errors::{IngestError, RecorderError, RecorderResult};
use crate::events::{
    emit_dropped, emit_page, emit_recorded, emit_rejected, RecorderNotification,
};
use crate::ingest::{normalize, CaptureChannel, EventMeta, InteractionEvent, RawEvent};
use crate::policy::{current_policy, RecorderPolicyView};
use crate::ports::{PageContextProvider, StaticPageContext};
use crate::session::SessionManager;
use crate::timer::{Fired, TimerQueue};

const ENTER_KEY: &str = "Enter";

pub struct RecorderBuilder {
    clock: Arc<dyn Clock>,
    policy: RecorderPolicyView,
    privacy: PrivacyPolicyView,
    pages: Arc<dyn PageContextProvider>,
    kv: Arc<dyn KvStore>,
    bus: Arc<dyn EventBus<RecorderNotification>>,
}

impl Default for RecorderBuilder {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            policy: current_policy(),
            privacy: soulbrowser_privacy::current_policy(),
            pages: Arc::new(StaticPageContext::default()),
            kv: Arc::new(InMemoryKvStore::new()),
            bus: NoopBus::<RecorderNotification>::new(),
        }
    }
}

impl RecorderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(mut self, policy: RecorderPolicyView) -> Self {
        self.policy = policy;
        self
    }

    pub fn privacy(mut self, privacy: PrivacyPolicyView) -> Self {
        self.privacy = privacy;
        self
    }

    pub fn page_context(mut self, pages: Arc<dyn PageContextProvider>) -> Self {
        self.pages = pages;
        self
    }

    pub fn store(mut self, kv: Arc<dyn KvStore>) -> Self {
        self.kv = kv;
        self
    }

    pub fn bus(mut self, bus: Arc<dyn EventBus<RecorderNotification>>) -> Self {
        self.bus = bus;
        self
    }

    pub fn build(self) -> RecorderResult<Recorder> {
        self.policy.validate()?;
        let extractor = ElementContextExtractor::new(ExtractOptions {
            max_text_len: self.policy.max_text_len,
        });
        Ok(Recorder {
            dedup: DedupFilter::new(self.policy.dedup_window_ms, self.policy.min_action_gap_ms),
            clock: self.clock,
            policy: self.policy,
            privacy: self.privacy,
            extractor,
            pages: self.pages,
            bus: self.bus,
            sessions: SessionManager::new(SessionStore::new(self.kv)),
            timers: TimerQueue::new(),
            navigation: NavigationBuffer::new(),
            clicks: ClickBuffer::new(),
            inputs: InputBuffer::new(),
        })
    }
}

pub struct Recorder {
    clock: Arc<dyn Clock>,
    policy: RecorderPolicyView,
    privacy: PrivacyPolicyView,
    extractor: ElementContextExtractor,
    pages: Arc<dyn PageContextProvider>,
    bus: Arc<dyn EventBus<RecorderNotification>>,
    sessions: SessionManager,
    timers: TimerQueue<BufferKey>,
    navigation: NavigationBuffer,
    clicks: ClickBuffer,
    inputs: InputBuffer,
    dedup: DedupFilter,
}

impl Recorder {
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::new()
    }

    pub fn policy(&self) -> &RecorderPolicyView {
        &self.policy
    }

    pub fn now_ms(&self) -> TimestampMs {
        self.clock.now_ms()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecorderNotification> {
        self.bus.subscribe()
    }

    pub fn start_recording(
        &mut self,
        task_goal: impl Into<String>,
        description: Option<String>,
    ) -> RecorderResult<RecordingSession> {
        if let Some(active) = self.sessions.active_session() {
            return Err(RecorderError::AlreadyRecording {
                session_id: active.id.clone(),
            });
        }
        self.reset_buffers();
        let initial = self.pages.current_page_context();
        let session = RecordingSession::new(task_goal, description, self.clock.now_ms(), initial);
        let session = self.sessions.begin(session)?;
        info!(
            session_id = %session.id,
            task_goal = %session.task_goal,
            initial_url = %session.initial_context.url,
            "recording started"
        );
        self.bus.publish(RecorderNotification::SessionStarted {
            session_id: session.id.clone(),
        });
        Ok(session)
    }

    /// Flushes every buffer in causal order, then finalizes the session.
    pub fn stop_recording(&mut self) -> RecorderResult<RecordingSession> {
        if !self.sessions.is_recording() {
            return Err(RecorderError::NoActiveSession);
        }
        self.timers.cancel_all();
        self.flush_pending();

        let session = self.sessions.finish(self.clock.now_ms())?;
        self.reset_buffers();
        info!(
            session_id = %session.id,
            total_actions = session.metadata.total_actions,
            duration_ms = session.metadata.duration_ms,
            pages_visited = session.metadata.pages_visited.len(),
            "recording stopped"
        );
        self.bus.publish(RecorderNotification::SessionStopped {
            session_id: session.id.clone(),
        });
        Ok(session)
    }

    pub fn pause(&mut self) -> RecorderResult<()> {
        self.sessions.pause(self.clock.now_ms())
    }

    pub fn resume(&mut self) -> RecorderResult<()> {
        self.sessions.resume(self.clock.now_ms())
    }

    pub fn is_paused(&self) -> bool {
        self.sessions.active().is_some_and(|active| active.is_paused())
    }

    pub fn elapsed_ms(&self) -> RecorderResult<u64> {
        self.sessions.elapsed_ms(self.clock.now_ms())
    }

    pub fn is_recording(&self) -> bool {
        self.sessions.is_recording()
    }

    pub fn active_session(&self) -> Option<&RecordingSession> {
        self.sessions.active_session()
    }

    pub fn session(&self, id: &SessionId) -> Option<RecordingSession> {
        self.sessions.session(id)
    }

    pub fn all_sessions(&self) -> Vec<RecordingSession> {
        self.sessions.all_sessions()
    }

    pub fn delete_session(&mut self, id: &SessionId) -> bool {
        self.sessions.delete_session(id)
    }

    /// Earliest pending buffer deadline, in clock time.
    pub fn next_deadline(&self) -> Option<TimestampMs> {
        self.timers.next_deadline()
    }

    /// Feeds one capture event through the pipeline. Due timers run first.
    pub fn ingest(&mut self, channel: CaptureChannel, raw: RawEvent) {
        self.tick();
        if !self.sessions.is_recording() {
            trace!(%channel, kind = %raw.kind, "no active recording; event dropped");
            return;
        }
        match normalize(channel, raw, self.clock.now_ms()) {
            Ok(event) => self.dispatch(event),
            Err(IngestError::MalformedEvent { kind, reason }) => {
                emit_dropped(channel, &kind, &reason);
            }
        }
    }

    /// Commits every buffer entry whose timer is due. Returns the number of timers fired.
    pub fn tick(&mut self) -> usize {
        let fired = self.timers.pop_due(self.clock.now_ms());
        let count = fired.len();
        for Fired {
            key, generation, ..
        } in fired
        {
            match key {
                BufferKey::Navigation => {
                    if let Some(pending) = self.navigation.take_if_current(generation) {
                        self.commit_navigation(pending);
                    }
                }
                BufferKey::Click => {
                    if let Some(sequence) = self.clicks.take_if_current(generation) {
                        self.commit_clicks(sequence);
                    }
                }
                BufferKey::Input(key) => {
                    if let Some(pending) = self.inputs.take_if_current(&key, generation) {
                        self.commit_input(&key, pending);
                    }
                }
            }
        }
        count
    }

    fn dispatch(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::Click { meta, target } => self.on_click(meta, target),
            InteractionEvent::Input {
                meta,
                target,
                value,
            } => self.on_input(meta, target, value),
            InteractionEvent::Keypress { meta, target, key } => self.on_keypress(meta, target, key),
            InteractionEvent::Navigation { meta, destination } => {
                self.on_navigation(meta, destination)
            }
            InteractionEvent::Submit { meta, target } => self.on_submit(meta, target),
            InteractionEvent::Select {
                meta,
                target,
                value,
            } => {
                let value = value.map(ActionValue::Text);
                self.record_now(ActionType::Select, &meta, Some(&target), value);
            }
            InteractionEvent::Toggle {
                meta,
                target,
                checked,
            } => {
                let value = checked.map(|checked| {
                    ActionValue::Text(if checked { "checked" } else { "unchecked" }.into())
                });
                self.record_now(ActionType::Toggle, &meta, Some(&target), value);
            }
            InteractionEvent::Focus { meta, target } => {
                self.record_now(ActionType::Focus, &meta, Some(&target), None);
            }
            InteractionEvent::Blur { meta, target } => {
                self.flush_input_for(&meta.url, &target);
                self.record_now(ActionType::Blur, &meta, Some(&target), None);
            }
            InteractionEvent::Scroll { meta, target } => {
                self.record_now(ActionType::Scroll, &meta, target.as_ref(), None);
            }
            InteractionEvent::Hover { meta, target } => {
                self.record_now(ActionType::Hover, &meta, Some(&target), None);
            }
            InteractionEvent::Clipboard {
                meta,
                action_type,
                target,
                text,
            } => {
                let value = text.map(|text| match &target {
                    Some(desc) => protect_value_with(&field_hints(desc), &text, &self.privacy),
                    None => protect_value_with(&FieldHints::default(), &text, &self.privacy),
                });
                self.record_now(action_type, &meta, target.as_ref(), value);
            }
            InteractionEvent::Drop {
                meta,
                target,
                payload,
            } => {
                let value = payload.map(ActionValue::Structured);
                self.record_now(ActionType::Drop, &meta, Some(&target), value);
            }
            InteractionEvent::Unknown {
                meta,
                target,
                payload,
            } => {
                let value = ActionValue::Structured(json!({
                    "kind": meta.kind,
                    "value": payload,
                }));
                self.record_now(ActionType::Unknown, &meta, target.as_ref(), Some(value));
            }
        }
    }

    fn on_click(&mut self, meta: EventMeta, target: ElementDescriptor) {
        let target = resolve_interaction_target(&target).clone();
        let now = self.clock.now_ms();
        if let Some(generation) = self.clicks.push(ClickRecord { target, meta }, now) {
            self.timers.schedule(
                BufferKey::Click,
                now + self.policy.click_window_ms,
                generation,
            );
        }
    }

    fn on_input(&mut self, meta: EventMeta, target: ElementDescriptor, value: String) {
        let key = InputKey::for_target(&meta.url, &target);
        let generation = self.inputs.update(key.clone(), target, value, meta);
        let due = self.clock.now_ms() + self.policy.input_debounce_ms;
        self.timers.schedule(BufferKey::Input(key), due, generation);
    }

    fn on_navigation(&mut self, meta: EventMeta, destination: String) {
        let generation = self.navigation.push(destination, meta);
        let due = self.clock.now_ms() + self.policy.navigation_debounce_ms;
        self.timers.schedule(BufferKey::Navigation, due, generation);
    }

    fn on_keypress(&mut self, meta: EventMeta, target: Option<ElementDescriptor>, key: String) {
        if key == ENTER_KEY {
            if let Some(field) = &target {
                self.flush_input_for(&meta.url, field);
                let submits = std::iter::once(field)
                    .chain(field.ancestors())
                    .find_map(|desc| desc.form.as_ref())
                    .is_some_and(|form| form.has_visible_submit);
                if submits {
                    if let Some(session) = self.sessions.active_session() {
                        emit_rejected(&session.id, ActionType::Keypress, "form_submit_pending");
                    }
                    return;
                }
            }
        }
        self.record_now(
            ActionType::Keypress,
            &meta,
            target.as_ref(),
            Some(ActionValue::Key(key)),
        );
    }

    fn on_submit(&mut self, meta: EventMeta, target: Option<ElementDescriptor>) {
        self.flush_inputs_until(TimestampMs::MAX);
        if let Some(sequence) = self.clicks.take() {
            self.timers.cancel(&BufferKey::Click);
            self.commit_clicks(sequence);
        }
        if self.follows_button_click(&meta) {
            if let Some(session) = self.sessions.active_session() {
                emit_rejected(&session.id, ActionType::Submit, "button_click_recorded");
            }
            return;
        }
        self.record_now(ActionType::Submit, &meta, target.as_ref(), None);
    }

    /// True when the last accepted action is the button click that caused this submit.
    fn follows_button_click(&self, meta: &EventMeta) -> bool {
        self.sessions
            .active_session()
            .and_then(RecordingSession::last_action)
            .is_some_and(|last| {
                last.action_type == ActionType::Click
                    && last.target.role == "button"
                    && same_document(&last.page_context.url, &meta.url)
                    && meta.timestamp.abs_diff(last.timestamp) < self.policy.dedup_window_ms
            })
    }

    /// Clicks start a window; the window's commit picks one of them.
    fn commit_clicks(&mut self, sequence: ClickSequence) {
        let Some(opened_ts) = sequence.clicks.first().map(|click| click.meta.timestamp) else {
            return;
        };
        self.flush_inputs_until(opened_ts);
        let Some(chosen) = sequence.choose() else {
            return;
        };
        let ClickRecord { target, meta } = chosen.clone();
        trace!(
            clicks = sequence.clicks.len(),
            tag = %target.tag(),
            "click sequence committed"
        );

        let element = self.extractor.extract(&target, origin(meta.channel));
        let page = self.page_context(&meta);
        match link_destination(&target, &meta.url) {
            Some(destination) => {
                let value = ActionValue::Url(destination);
                self.candidate(ActionType::Navigation, element, Some(value), &meta, page);
            }
            None => {
                self.candidate(ActionType::Click, element, None, &meta, page);
            }
        }
    }

    fn commit_navigation(&mut self, pending: PendingNavigation) {
        self.flush_inputs_until(pending.first_ts);
        let earlier_clicks = self
            .clicks
            .pending()
            .and_then(|sequence| sequence.clicks.first())
            .is_some_and(|click| click.meta.timestamp <= pending.first_ts);
        if earlier_clicks {
            if let Some(sequence) = self.clicks.take() {
                self.timers.cancel(&BufferKey::Click);
                self.commit_clicks(sequence);
            }
        }

        let PendingNavigation {
            destination,
            meta,
            signals,
            ..
        } = pending;
        trace!(signals, destination = %destination, "navigation committed");
        self.record_page(&destination);

        if self.dedup.navigated_recently(&destination, meta.timestamp) {
            if let Some(session) = self.sessions.active_session() {
                emit_rejected(&session.id, ActionType::Navigation, "already_navigated");
            }
            return;
        }

        let mut page = self.page_context(&meta);
        if page.url.is_empty() {
            page.url = destination.clone();
        }
        let target = ElementContext::page(Some(page.title.as_str()));
        self.candidate(
            ActionType::Navigation,
            target,
            Some(ActionValue::Url(destination)),
            &meta,
            page,
        );
    }

    fn commit_input(&mut self, key: &InputKey, pending: PendingInput) {
        if let Err(rejection) = self.inputs.evaluate(
            key,
            &pending.value,
            self.policy.min_input_len,
            self.policy.min_input_delta,
        ) {
            if let Some(session) = self.sessions.active_session() {
                emit_rejected(&session.id, ActionType::Type, rejection.as_str());
            }
            return;
        }

        let PendingInput {
            target,
            value,
            meta,
            keystrokes,
            ..
        } = pending;
        trace!(keystrokes, field = %key.element, "input committed");
        let protected = protect_value_with(&field_hints(&target), &value, &self.privacy);
        let element = self.extractor.extract(&target, origin(meta.channel));
        let page = self.page_context(&meta);
        if self.candidate(ActionType::Type, element, Some(protected), &meta, page) {
            self.inputs.remember(key.clone(), value);
        }
    }

    /// Commits pending text for one field ahead of the event that ends its entry.
    /// Commits every pending buffer, earliest opened first. Navigation and
    /// click commits flush the inputs that started before them.
    fn flush_pending(&mut self) {
        let navigation_ts = self.navigation.pending().map(|pending| pending.first_ts);
        let click_ts = self
            .clicks
            .pending()
            .and_then(|sequence| sequence.clicks.first())
            .map(|click| click.meta.timestamp);
        if let (Some(navigation_ts), Some(click_ts)) = (navigation_ts, click_ts) {
            if click_ts > navigation_ts {
                if let Some(pending) = self.navigation.take() {
                    self.commit_navigation(pending);
                }
            }
        }
        if let Some(sequence) = self.clicks.take() {
            self.commit_clicks(sequence);
        }
        if let Some(pending) = self.navigation.take() {
            self.commit_navigation(pending);
        }
        self.flush_inputs_until(TimestampMs::MAX);
    }

    fn flush_input_for(&mut self, url: &str, target: &ElementDescriptor) {
        let key = InputKey::for_target(url, target);
        if let Some(pending) = self.inputs.take(&key) {
            self.timers.cancel(&BufferKey::Input(key.clone()));
            self.commit_input(&key, pending);
        }
    }

    /// Commits pending text started at or before `until`, oldest first.
    fn flush_inputs_until(&mut self, until: TimestampMs) {
        let due: Vec<InputKey> = self
            .inputs
            .pending_keys()
            .into_iter()
            .filter(|key| {
                self.inputs
                    .pending(key)
                    .is_some_and(|pending| pending.first_ts <= until)
            })
            .collect();
        for key in due {
            if let Some(pending) = self.inputs.take(&key) {
                self.timers.cancel(&BufferKey::Input(key.clone()));
                self.commit_input(&key, pending);
            }
        }
    }

    /// Records an action that needs no aggregation.
    fn record_now(
        &mut self,
        action_type: ActionType,
        meta: &EventMeta,
        target: Option<&ElementDescriptor>,
        value: Option<ActionValue>,
    ) -> bool {
        let page = self.page_context(meta);
        let element = match target {
            Some(desc) => self.extractor.extract(desc, origin(meta.channel)),
            None => ElementContext::page(Some(page.title.as_str())),
        };
        self.candidate(action_type, element, value, meta, page)
    }

    /// Shared tail of every action: describe, dedup, admit, append, persist, notify.
    fn candidate(
        &mut self,
        action_type: ActionType,
        target: ElementContext,
        value: Option<ActionValue>,
        meta: &EventMeta,
        page: PageContext,
    ) -> bool {
        let Some(session_id) = self.sessions.active_session().map(|s| s.id.clone()) else {
            return false;
        };

        let description = describe_action(action_type, &target, value.as_ref(), &page);
        let intent = infer_intent(action_type, &target, value.as_ref());
        let action = SemanticAction {
            id: ActionId::new(),
            action_type,
            timestamp: meta.timestamp,
            description,
            target,
            value,
            coordinates: meta.coordinates,
            page_context: page,
            intent,
        };

        let verdict = self.dedup.check(&action);
        if verdict != DedupVerdict::Fresh {
            emit_rejected(&session_id, action_type, verdict.as_str());
            return false;
        }
        let admission = admit(&action);
        if !admission.is_accepted() {
            emit_rejected(&session_id, action_type, admission.reason());
            return false;
        }

        let destination = match (&action.action_type, &action.value) {
            (ActionType::Navigation, Some(ActionValue::Url(url))) => Some(url.clone()),
            _ => None,
        };
        let notification = RecorderNotification::ActionRecorded {
            session_id: session_id.clone(),
            action_type,
            description: action.description.clone(),
            timestamp: action.timestamp,
        };

        let appended = self
            .sessions
            .active_mut()
            .is_some_and(|active| active.session.push_action(action.clone()));
        if !appended {
            return false;
        }
        let now = self.clock.now_ms();
        self.dedup.record(&action, now);
        if let Some(destination) = destination {
            self.dedup.record_navigation(&destination, action.timestamp, now);
            self.record_page(&destination);
        }

        let total_actions = self
            .sessions
            .active_session()
            .map(|session| session.actions().len())
            .unwrap_or_default();
        emit_recorded(&session_id, action_type, total_actions);
        self.sessions.persist_active();
        self.bus.publish(notification);
        true
    }

    fn record_page(&mut self, url: &str) {
        let Some(active) = self.sessions.active_mut() else {
            return;
        };
        let novel = active.session.record_page(url);
        emit_page(&active.session.id, url, novel);
        if novel {
            self.sessions.persist_active();
        }
    }

    fn page_context(&self, meta: &EventMeta) -> PageContext {
        build_page_context(
            meta.page.as_ref(),
            &meta.url,
            meta.title.as_deref(),
            meta.timestamp,
            self.policy.max_key_elements,
        )
    }

    fn reset_buffers(&mut self) {
        self.timers.cancel_all();
        self.navigation.clear();
        self.clicks.clear();
        self.inputs.clear();
        self.dedup.reset();
        debug!("recorder buffers reset");
    }
}

fn origin(channel: CaptureChannel) -> ElementOrigin {
    match channel {
        CaptureChannel::Native => ElementOrigin::Native,
        CaptureChannel::InPage => ElementOrigin::InPage,
    }
}

fn field_hints(desc: &ElementDescriptor) -> FieldHints<'_> {
    FieldHints {
        input_type: desc.input_type.as_deref(),
        name: desc.attr("name"),
        id: desc.attr("id"),
        autocomplete: desc.attr("autocomplete"),
        aria_label: desc.attr("aria-label"),
        placeholder: desc.attr("placeholder"),
    }
}

/// Destination of an anchor click, when it leaves the current document.
fn link_destination(target: &ElementDescriptor, current_url: &str) -> Option<String> {
    if target.tag() != "a" {
        return None;
    }
    let href = target.attr("href")?;
    let resolved = match Url::parse(current_url) {
        Ok(base) => base.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };
    if !matches!(resolved.scheme(), "http" | "https" | "file") {
        return None;
    }
    if same_document(resolved.as_str(), current_url) {
        return None;
    }
    Some(resolved.to_string())
}

/// URL equality ignoring the fragment.
fn same_document(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(mut a), Ok(mut b)) => {
            a.set_fragment(None);
            b.set_fragment(None);
            a == b
        }
        _ => a.split('#').next() == b.split('#').next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulbrowser_core_types::ManualClock;

    fn anchor(href: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag_name: Some("a".into()),
            href: Some(href.into()),
            ..Default::default()
        }
    }

    #[test]
    fn link_destination_resolves_relative_href() {
        assert_eq!(
            link_destination(&anchor("/docs"), "https://example.com/home"),
            Some("https://example.com/docs".into())
        );
        assert_eq!(link_destination(&anchor("#top"), "https://example.com/home"), None);
        assert_eq!(
            link_destination(&anchor("javascript:void(0)"), "https://example.com/"),
            None
        );
        assert_eq!(
            link_destination(&anchor("mailto:a@example.com"), "https://example.com/"),
            None
        );
    }

    #[test]
    fn same_document_ignores_fragment() {
        assert!(same_document(
            "https://example.com/a#one",
            "https://example.com/a#two"
        ));
        assert!(!same_document("https://example.com/a", "https://example.com/b"));
    }

    #[test]
    fn builder_rejects_invalid_policy() {
        let result = Recorder::builder()
            .policy(RecorderPolicyView {
                input_debounce_ms: 0,
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(RecorderError::InvalidPolicy(_))));
    }

    #[test]
    fn idle_recorder_drops_events() {
        let clock = ManualClock::new(1_000);
        let mut recorder = Recorder::builder()
            .clock(Arc::new(clock))
            .build()
            .expect("recorder");
        recorder.ingest(
            CaptureChannel::InPage,
            RawEvent {
                kind: "click".into(),
                target: Some(anchor("/docs")),
                url: "https://example.com/".into(),
                ..Default::default()
            },
        );
        assert_eq!(recorder.next_deadline(), None);
        assert!(recorder.all_sessions().is_empty());
    }

    #[test]
    fn stop_without_session_fails() {
        let mut recorder = Recorder::builder().build().expect("recorder");
        assert_eq!(
            recorder.stop_recording().map(|s| s.id),
            Err(RecorderError::NoActiveSession)
        );
        assert_eq!(recorder.pause(), Err(RecorderError::NoActiveSession));
    }
}
