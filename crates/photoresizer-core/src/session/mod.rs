//! The intent dispatcher: owns the current snapshot and runs background jobs.
//!
//! All state lives on the thread that owns the `Session`. Jobs run on their
//! own threads and report back through a channel; their results are folded
//! in by [`Session::poll`] or [`Session::wait_idle`], one whole snapshot at a
//! time.
//!
//! Every job gets a token. `Reset` and `PickImage` cancel and forget all live
//! tokens, so a result that arrives afterwards is recognised as stale and
//! dropped instead of overwriting the newer state.

mod jobs;

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ResizerConfig;
use crate::intent::Intent;
use crate::io::gallery::{DirectoryStore, MediaStore};
use crate::io::probe::{HeaderProber, Prober};
use crate::reducer::{self, Effect, Outcome};
use crate::state::EditState;
use crate::transcode::{CancelToken, FfmpegTranscoder, Transcoder};

use jobs::Completion;

pub type JobToken = u64;

/// Collaborators the session delegates I/O to.
pub struct Services {
    pub prober: Arc<dyn Prober>,
    pub transcoder: Arc<dyn Transcoder>,
    pub store: Arc<dyn MediaStore>,
    pub config: ResizerConfig,
}

impl Services {
    /// Header prober, ffmpeg subprocess and a directory-backed gallery, all
    /// configured from `config`.
    pub fn from_config(config: ResizerConfig) -> Self {
        let transcoder = FfmpegTranscoder::new(&config.tool)
            .with_poll_interval(Duration::from_millis(config.poll_interval_ms));
        let store = DirectoryStore::new(config.album_dir());
        Self {
            prober: Arc::new(HeaderProber),
            transcoder: Arc::new(transcoder),
            store: Arc::new(store),
            config,
        }
    }
}

/// What `dispatch` did with an intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A pure transition; the new snapshot is already visible.
    Applied,
    /// Background work was started under this token.
    Scheduled(JobToken),
    /// A precondition failed or a transcode is already running.
    Rejected,
}

struct LiveJob {
    token: JobToken,
    effect: &'static str,
    cancel: CancelToken,
}

pub struct Session {
    state: EditState,
    services: Arc<Services>,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
    next_token: JobToken,
    live: Vec<LiveJob>,
}

impl Session {
    pub fn new(services: Services) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            state: EditState::default(),
            services: Arc::new(services),
            completion_tx,
            completion_rx,
            next_token: 1,
            live: Vec::new(),
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn config(&self) -> &ResizerConfig {
        &self.services.config
    }

    /// No background job is outstanding.
    pub fn is_idle(&self) -> bool {
        self.live.is_empty()
    }

    pub fn dispatch(&mut self, intent: Intent) -> DispatchOutcome {
        let name = intent.name();
        if matches!(intent, Intent::Reset | Intent::PickImage(_)) {
            self.cancel_all();
        }

        let transition = reducer::reduce(&self.state, intent);
        self.state = transition.state;

        if let Some(reason) = transition.rejection {
            warn!(intent = name, reason = %reason, "Intent rejected");
            return DispatchOutcome::Rejected;
        }
        debug!(intent = name, "Intent applied");

        match transition.effect {
            Some(effect) => DispatchOutcome::Scheduled(self.spawn(effect)),
            None => DispatchOutcome::Applied,
        }
    }

    /// Apply every completion that is already waiting. Returns how many
    /// changed the state.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until every live job has reported back, or `timeout` passes.
    /// Returns `true` when the session ended up idle. A timeout too large to
    /// represent as an instant waits without a deadline.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        self.poll();
        while !self.live.is_empty() {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    self.completion_rx.recv_timeout(remaining).ok()
                }
                None => self.completion_rx.recv().ok(),
            };
            match received {
                Some(completion) => {
                    self.apply(completion);
                }
                None => return false,
            }
        }
        true
    }

    fn spawn(&mut self, effect: Effect) -> JobToken {
        let token = self.next_token;
        self.next_token += 1;

        let cancel = CancelToken::new();
        let name = effect.name();
        self.live.push(LiveJob {
            token,
            effect: name,
            cancel: cancel.clone(),
        });

        let services = Arc::clone(&self.services);
        let tx = self.completion_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("photoresizer-{name}"))
            .spawn(move || {
                let outcome = jobs::run(&services, effect, &cancel);
                let _ = tx.send(Completion { token, outcome });
            });

        match spawned {
            Ok(_) => info!(token, job = name, "Job scheduled"),
            Err(e) => {
                warn!(token, job = name, error = %e, "Failed to spawn job thread");
                self.apply(Completion {
                    token,
                    outcome: Outcome::Failed {
                        message: format!("Could not start {name}: {e}"),
                    },
                });
            }
        }
        token
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let Some(index) = self.live.iter().position(|j| j.token == completion.token) else {
            debug!(token = completion.token, "Discarding stale job result");
            return false;
        };
        let job = self.live.remove(index);
        debug!(token = job.token, job = job.effect, "Job finished");
        self.state = reducer::complete(&self.state, completion.outcome);
        true
    }

    fn cancel_all(&mut self) {
        for job in self.live.drain(..) {
            debug!(token = job.token, job = job.effect, "Cancelling job");
            job.cancel.cancel();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
