use std::path::PathBuf;
use std::sync::Arc;

use action_recorder::{CaptureChannel, RawEvent, Recorder, StaticPageContext};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use soulbrowser_core_types::{Clock, ManualClock, PageContext, SystemClock};
use tokio::fs;
use tracing::{info, warn};

use super::sessions::print_session;
use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Task goal of the new session
    #[arg(long)]
    pub goal: String,

    /// JSON lines file of captured events, one raw event per line
    #[arg(long, value_name = "FILE")]
    pub events: PathBuf,

    /// Free-form session description
    #[arg(long)]
    pub description: Option<String>,

    /// Initial page URL, defaults to the URL of the first event
    #[arg(long)]
    pub url: Option<String>,
}

/// One line of the event log: a raw event tagged with its capture channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub channel: CaptureChannel,
    pub raw: RawEvent,
}

pub async fn cmd_record(args: RecordArgs, ctx: &CliContext) -> Result<()> {
    let content = fs::read_to_string(&args.events)
        .await
        .with_context(|| format!("Failed to read event log {}", args.events.display()))?;
    let events = parse_event_log(&content);
    info!(
        events = events.len(),
        file = %args.events.display(),
        "replaying captured events"
    );

    let start_ms = events
        .iter()
        .map(|event| event.raw.timestamp)
        .find(|ts| *ts > 0)
        .unwrap_or_else(|| SystemClock.now_ms());
    let (url, title) = match (&args.url, events.first()) {
        (Some(url), _) => (url.clone(), String::new()),
        (None, Some(first)) => (
            first.raw.url.clone(),
            first.raw.title.clone().unwrap_or_default(),
        ),
        (None, None) => (String::new(), String::new()),
    };

    let clock = Arc::new(ManualClock::new(start_ms));
    let config = ctx.config();
    let mut recorder = Recorder::builder()
        .clock(clock.clone())
        .policy(config.policy.clone())
        .privacy(config.privacy.clone())
        .page_context(Arc::new(StaticPageContext::new(PageContext::minimal(
            url, title, start_ms,
        ))))
        .store(ctx.kv_store()?)
        .build()?;

    recorder.start_recording(args.goal, args.description)?;
    replay(&mut recorder, &clock, events);
    let session = recorder.stop_recording()?;

    match ctx.output().render(&session)? {
        Some(rendered) => println!("{rendered}"),
        None => {
            println!("Recorded session {}", session.id);
            print_session(&session);
        }
    }
    Ok(())
}

/// Parses the event log, skipping blank and unparseable lines.
pub fn parse_event_log(content: &str) -> Vec<CapturedEvent> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse_line(line) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping event log line");
                None
            }
        })
        .collect()
}

fn parse_line(line: &str) -> Result<CapturedEvent> {
    let mut value: Value = serde_json::from_str(line)?;
    let channel = match value.as_object_mut().and_then(|obj| obj.remove("channel")) {
        Some(channel) => serde_json::from_value(channel)?,
        None => CaptureChannel::InPage,
    };
    let raw: RawEvent = serde_json::from_value(value)?;
    Ok(CapturedEvent { channel, raw })
}

/// Drives the recorder on simulated time: the clock follows event
/// timestamps, then runs forward until every pending window has closed.
pub fn replay(recorder: &mut Recorder, clock: &ManualClock, events: Vec<CapturedEvent>) {
    for CapturedEvent { channel, mut raw } in events {
        if raw.timestamp == 0 {
            raw.timestamp = clock.now_ms();
        }
        if raw.timestamp > clock.now_ms() {
            clock.set(raw.timestamp);
        }
        recorder.ingest(channel, raw);
    }

    while let Some(deadline) = recorder.next_deadline() {
        if deadline > clock.now_ms() {
            clock.set(deadline);
        }
        if recorder.tick() == 0 && recorder.next_deadline() == Some(deadline) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use soulbrowser_core_types::ActionType;
    use soulbrowser_privacy::PrivacyPolicyView;
    use soulbrowser_session_store::InMemoryKvStore;

    const LOG: &str = r#"
{"channel":"native","kind":"navigation","url":"https://example.com/docs","timestamp":1000}
{"kind":"input","target":{"tagName":"input","type":"search","id":"q"},"value":"g","url":"https://example.com/docs","timestamp":1100}
{"kind":"input","target":{"tagName":"input","type":"search","id":"q"},"value":"github","url":"https://example.com/docs","timestamp":1300}
not json at all
{"channel":"in_page","kind":"click","target":{"tagName":"button","textContent":"Search"},"url":"https://example.com/docs","timestamp":2500}
"#;

    #[test]
    fn event_log_lines_carry_their_channel() {
        let events = parse_event_log(LOG);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].channel, CaptureChannel::Native);
        assert_eq!(events[1].channel, CaptureChannel::InPage);
        assert_eq!(events[3].raw.kind, "click");
        assert_eq!(events[3].raw.timestamp, 2_500);
    }

    #[test]
    fn replay_closes_every_window() {
        let clock = Arc::new(ManualClock::new(1_000));
        let mut recorder = Recorder::builder()
            .clock(clock.clone())
            .policy(action_recorder::RecorderPolicyView::default())
            .privacy(PrivacyPolicyView::default())
            .page_context(Arc::new(StaticPageContext::new(PageContext::minimal(
                "https://example.com/",
                "Example",
                1_000,
            ))))
            .store(Arc::new(InMemoryKvStore::new()))
            .build()
            .expect("recorder");
        recorder.start_recording("Search", None).expect("start");

        replay(&mut recorder, &clock, parse_event_log(LOG));
        assert_eq!(recorder.next_deadline(), None);

        let active = recorder.active_session().expect("active");
        let kinds: Vec<_> = active.actions().iter().map(|a| a.action_type).collect();
        assert_eq!(
            kinds,
            vec![ActionType::Navigation, ActionType::Type, ActionType::Click]
        );
    }
}
