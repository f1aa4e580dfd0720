use std::future::pending;
use std::time::Duration;

use soulbrowser_core_types::{Clock, RecordingSession, SessionId, SystemClock, TimestampMs};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::{RecorderError, RecorderResult};
use crate::ingest::{CaptureChannel, RawEvent};
use crate::recorder::Recorder;

/// Clock that follows tokio's timer, so paused-time tests stay deterministic.
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    base_ms: TimestampMs,
    base: Instant,
}

impl TokioClock {
    /// Anchored to the wall clock.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_ms())
    }

    pub fn starting_at(base_ms: TimestampMs) -> Self {
        Self {
            base_ms,
            base: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> TimestampMs {
        self.base_ms + self.base.elapsed().as_millis() as TimestampMs
    }
}

enum Command {
    Start {
        task_goal: String,
        description: Option<String>,
        reply: oneshot::Sender<RecorderResult<RecordingSession>>,
    },
    Stop {
        reply: oneshot::Sender<RecorderResult<RecordingSession>>,
    },
    Pause {
        reply: oneshot::Sender<RecorderResult<()>>,
    },
    Resume {
        reply: oneshot::Sender<RecorderResult<()>>,
    },
    Elapsed {
        reply: oneshot::Sender<RecorderResult<u64>>,
    },
    Active {
        reply: oneshot::Sender<Option<RecordingSession>>,
    },
    Session {
        id: SessionId,
        reply: oneshot::Sender<Option<RecordingSession>>,
    },
    AllSessions {
        reply: oneshot::Sender<Vec<RecordingSession>>,
    },
    Delete {
        id: SessionId,
        reply: oneshot::Sender<bool>,
    },
}

/// Owns one [`Recorder`] on a single tokio task.
pub struct RecorderRuntime;

impl RecorderRuntime {
    /// Moves the recorder onto a task and returns the handle driving it.
    pub fn spawn(recorder: Recorder) -> RecorderHandle {
        let capacity = recorder.policy().channel_capacity.max(1);
        let (commands, command_rx) = mpsc::channel(capacity);
        let (native, native_rx) = mpsc::channel(capacity);
        let (in_page, in_page_rx) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();
        let loop_token = cancel.clone();

        let task = tokio::spawn(run(recorder, loop_token, command_rx, native_rx, in_page_rx));
        RecorderHandle {
            commands,
            native,
            in_page,
            cancel,
            task: Some(task),
        }
    }
}

async fn run(
    mut recorder: Recorder,
    cancel: CancellationToken,
    mut commands: mpsc::Receiver<Command>,
    mut native: mpsc::Receiver<RawEvent>,
    mut in_page: mpsc::Receiver<RawEvent>,
) {
    loop {
        let wait = recorder
            .next_deadline()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(recorder.now_ms())));

        // Events before commands so a stop issued after sending events sees them.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                break;
            }
            Some(raw) = native.recv() => {
                recorder.ingest(CaptureChannel::Native, raw);
            }
            Some(raw) = in_page.recv() => {
                recorder.ingest(CaptureChannel::InPage, raw);
            }
            Some(command) = commands.recv() => {
                handle_command(&mut recorder, command);
            }
            _ = sleep_for(wait) => {
                recorder.tick();
            }
        }
    }

    if recorder.is_recording() {
        match recorder.stop_recording() {
            Ok(session) => info!(session_id = %session.id, "active recording stopped on shutdown"),
            Err(err) => warn!(error = %err, "failed to stop recording on shutdown"),
        }
    }
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(duration) => sleep(duration).await,
        None => pending::<()>().await,
    }
}

fn handle_command(recorder: &mut Recorder, command: Command) {
    // A dropped reply receiver only means the caller stopped waiting.
    match command {
        Command::Start {
            task_goal,
            description,
            reply,
        } => {
            let _ = reply.send(recorder.start_recording(task_goal, description));
        }
        Command::Stop { reply } => {
            let _ = reply.send(recorder.stop_recording());
        }
        Command::Pause { reply } => {
            let _ = reply.send(recorder.pause());
        }
        Command::Resume { reply } => {
            let _ = reply.send(recorder.resume());
        }
        Command::Elapsed { reply } => {
            let _ = reply.send(recorder.elapsed_ms());
        }
        Command::Active { reply } => {
            let _ = reply.send(recorder.active_session().cloned());
        }
        Command::Session { id, reply } => {
            let _ = reply.send(recorder.session(&id));
        }
        Command::AllSessions { reply } => {
            let _ = reply.send(recorder.all_sessions());
        }
        Command::Delete { id, reply } => {
            let _ = reply.send(recorder.delete_session(&id));
        }
    }
}

/// Async front of a running recorder.
pub struct RecorderHandle {
    commands: mpsc::Sender<Command>,
    native: mpsc::Sender<RawEvent>,
    in_page: mpsc::Sender<RawEvent>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RecorderHandle {
    /// Sender for the privileged capture channel.
    pub fn native_sender(&self) -> mpsc::Sender<RawEvent> {
        self.native.clone()
    }

    /// Sender for the in-page listener channel.
    pub fn in_page_sender(&self) -> mpsc::Sender<RawEvent> {
        self.in_page.clone()
    }

    pub async fn send_event(&self, channel: CaptureChannel, raw: RawEvent) -> RecorderResult<()> {
        let sender = match channel {
            CaptureChannel::Native => &self.native,
            CaptureChannel::InPage => &self.in_page,
        };
        sender
            .send(raw)
            .await
            .map_err(|_| RecorderError::RuntimeClosed)
    }

    pub async fn start_recording(
        &self,
        task_goal: impl Into<String>,
        description: Option<String>,
    ) -> RecorderResult<RecordingSession> {
        let task_goal = task_goal.into();
        self.request(|reply| Command::Start {
            task_goal,
            description,
            reply,
        })
        .await?
    }

    pub async fn stop_recording(&self) -> RecorderResult<RecordingSession> {
        self.request(|reply| Command::Stop { reply }).await?
    }

    pub async fn pause(&self) -> RecorderResult<()> {
        self.request(|reply| Command::Pause { reply }).await?
    }

    pub async fn resume(&self) -> RecorderResult<()> {
        self.request(|reply| Command::Resume { reply }).await?
    }

    pub async fn elapsed_ms(&self) -> RecorderResult<u64> {
        self.request(|reply| Command::Elapsed { reply }).await?
    }

    pub async fn active_session(&self) -> RecorderResult<Option<RecordingSession>> {
        self.request(|reply| Command::Active { reply }).await
    }

    pub async fn session(&self, id: SessionId) -> RecorderResult<Option<RecordingSession>> {
        self.request(|reply| Command::Session { id, reply }).await
    }

    pub async fn all_sessions(&self) -> RecorderResult<Vec<RecordingSession>> {
        self.request(|reply| Command::AllSessions { reply }).await
    }

    pub async fn delete_session(&self, id: SessionId) -> RecorderResult<bool> {
        self.request(|reply| Command::Delete { id, reply }).await
    }

    /// Stops any active recording (flushing its buffers) and waits for the task to end.
    pub async fn shutdown(mut self) -> RecorderResult<()> {
        self.cancel.cancel();
        match self.task.take() {
            Some(task) => match task.await {
                Ok(()) => Ok(()),
                Err(err) if err.is_cancelled() => Ok(()),
                Err(err) => {
                    warn!(error = %err, "recorder task ended abnormally");
                    Err(RecorderError::RuntimeClosed)
                }
            },
            None => Ok(()),
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> RecorderResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| RecorderError::RuntimeClosed)?;
        response.await.map_err(|_| RecorderError::RuntimeClosed)
    }
}

impl Drop for RecorderHandle {
    /// Cancels without aborting: the detached task still stops and flushes
    /// the active session before it exits.
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
