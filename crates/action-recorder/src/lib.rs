//! Semantic action recording engine
//!
//! Turns the raw interaction stream of a browser (clicks, keystrokes,
//! navigations, form changes) into a deduplicated, semantically labeled
//! action log per recording session.
//!
//! Pipeline: [`ingest`] normalizes raw events from both capture channels,
//! [`buffers`] coalesce bursts, [`dedup`] suppresses repeats, the
//! classifier gates and labels, and the [`recorder`] appends and persists.

pub mod buffers;
pub mod dedup;
pub mod errors;
pub mod events;
pub mod ingest;
pub mod policy;
pub mod ports;
pub mod recorder;
pub mod runtime;
pub mod session;
pub mod timer;

pub use dedup::{fingerprint, DedupFilter, DedupVerdict};
pub use errors::{IngestError, RecorderError, RecorderResult};
pub use events::RecorderNotification;
pub use ingest::{normalize, CaptureChannel, EventMeta, InteractionEvent, RawEvent};
pub use policy::{current_policy, set_policy, RecorderPolicyHandle, RecorderPolicyView};
pub use ports::{PageContextProvider, StaticPageContext};
pub use recorder::{Recorder, RecorderBuilder};
pub use runtime::{RecorderHandle, RecorderRuntime, TokioClock};
pub use session::{ActiveRecording, SessionManager};
pub use timer::{Fired, TimerQueue};
