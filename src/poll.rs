use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::LumaClient;
use crate::error::LumaError;
use crate::types::{GenerationHandle, GenerationKind, GenerationState, GenerationStatus};

const GENERIC_FAILURE: &str = "Generation failed";

/// Timing and limits for polling a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status queries.
    pub interval: Duration,
    /// A checkpoint is yielded on every cycle that is a non-zero multiple of this.
    pub checkpoint_every: u32,
    /// Total status queries allowed before the generation is considered timed out.
    pub max_cycles: u32,
    /// Failed status queries tolerated in a row before polling gives up.
    pub max_consecutive_errors: u32,
}

impl PollConfig {
    /// Ten minutes for images, twenty for videos, at the default two second interval.
    pub fn for_kind(kind: GenerationKind) -> Self {
        let max_cycles = match kind {
            GenerationKind::Image => 300,
            GenerationKind::Video => 600,
        };
        Self {
            interval: Duration::from_secs(2),
            checkpoint_every: 15,
            max_cycles,
            max_consecutive_errors: 5,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// The result of one poll cycle, or of waiting for the next noteworthy one.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The generation is still running; nothing to report.
    Pending {
        elapsed: Duration,
        remote_status: GenerationState,
    },
    /// The generation is still running and a periodic checkpoint was reached.
    /// Polling continues when the poller is invoked again.
    ProgressNotice {
        elapsed: Duration,
        remote_status: GenerationState,
    },
    Succeeded {
        artifact_url: String,
        elapsed: Duration,
    },
    Failed {
        reason: String,
    },
    /// The cycle cap was reached. The generation may still finish remotely.
    TimedOut {
        elapsed: Duration,
        generation_id: String,
    },
}

impl PollOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollOutcome::Succeeded { .. }
                | PollOutcome::Failed { .. }
                | PollOutcome::TimedOut { .. }
        )
    }
}

/// (Internal) The polling state machine, independent of any I/O.
#[derive(Debug, Clone)]
pub(crate) struct PollTracker {
    config: PollConfig,
    generation_id: String,
    kind: GenerationKind,
    cycle: u32,
    consecutive_errors: u32,
    terminal: Option<PollOutcome>,
}

impl PollTracker {
    pub(crate) fn new(handle: &GenerationHandle, config: PollConfig) -> Self {
        Self {
            config,
            generation_id: handle.id.clone(),
            kind: handle.kind,
            cycle: 0,
            consecutive_errors: 0,
            terminal: None,
        }
    }

    /// An outcome that is known without querying: a previous terminal outcome or the cap.
    pub(crate) fn settled(&mut self) -> Option<PollOutcome> {
        if let Some(terminal) = &self.terminal {
            return Some(terminal.clone());
        }
        if self.cycle >= self.config.max_cycles {
            let outcome = PollOutcome::TimedOut {
                elapsed: self.config.interval * self.config.max_cycles,
                generation_id: self.generation_id.clone(),
            };
            info!(generation_id = %self.generation_id, cycles = self.cycle, "polling timed out");
            self.terminal = Some(outcome.clone());
            return Some(outcome);
        }
        None
    }

    /// Consumes one cycle with the result of a status query.
    pub(crate) fn observe(&mut self, result: Result<GenerationStatus, LumaError>) -> PollOutcome {
        let cycle = self.cycle;
        self.cycle += 1;
        let elapsed = self.config.interval * cycle;

        let outcome = match result {
            Err(err) => {
                self.consecutive_errors += 1;
                if self.consecutive_errors > self.config.max_consecutive_errors {
                    PollOutcome::Failed {
                        reason: err.to_string(),
                    }
                } else {
                    warn!(
                        generation_id = %self.generation_id,
                        attempt = self.consecutive_errors,
                        error = %err,
                        "status query failed, retrying"
                    );
                    PollOutcome::Pending {
                        elapsed,
                        remote_status: GenerationState::Unknown,
                    }
                }
            }
            Ok(status) => {
                self.consecutive_errors = 0;
                self.classify(&status, cycle, elapsed)
            }
        };

        if outcome.is_terminal() {
            info!(generation_id = %self.generation_id, ?outcome, "generation finished");
            self.terminal = Some(outcome.clone());
        }
        outcome
    }

    fn classify(&self, status: &GenerationStatus, cycle: u32, elapsed: Duration) -> PollOutcome {
        match (status.state, status.artifact_url(self.kind)) {
            (GenerationState::Completed, Some(url)) => PollOutcome::Succeeded {
                artifact_url: url.to_string(),
                elapsed,
            },
            (GenerationState::Failed, _) => PollOutcome::Failed {
                reason: status
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            (remote_status, _) if self.is_checkpoint(cycle) => PollOutcome::ProgressNotice {
                elapsed,
                remote_status,
            },
            (remote_status, _) => PollOutcome::Pending {
                elapsed,
                remote_status,
            },
        }
    }

    fn is_checkpoint(&self, cycle: u32) -> bool {
        let every = self.config.checkpoint_every;
        every > 0 && cycle > 0 && cycle % every == 0
    }

    /// Whether the last query failed and the next one should follow without delay.
    pub(crate) fn retrying(&self) -> bool {
        self.consecutive_errors > 0
    }
}

/// Polls one generation until it reaches a checkpoint or a terminal outcome.
///
/// The poller keeps its cycle count between calls: after a
/// [`PollOutcome::ProgressNotice`], call [`Poller::wait`] again to continue
/// from where it stopped.
pub struct Poller<'a> {
    client: &'a LumaClient,
    tracker: PollTracker,
}

impl<'a> Poller<'a> {
    pub(crate) fn new(
        client: &'a LumaClient,
        handle: &GenerationHandle,
        config: PollConfig,
    ) -> Self {
        Self {
            client,
            tracker: PollTracker::new(handle, config),
        }
    }

    pub fn generation_id(&self) -> &str {
        &self.tracker.generation_id
    }

    /// Number of cycles consumed so far.
    pub fn cycle(&self) -> u32 {
        self.tracker.cycle
    }

    /// Runs exactly one cycle without sleeping.
    pub async fn poll_once(&mut self) -> PollOutcome {
        if let Some(outcome) = self.tracker.settled() {
            return outcome;
        }
        let result = self.client.get_generation(&self.tracker.generation_id).await;
        let outcome = self.tracker.observe(result);
        debug!(generation_id = %self.tracker.generation_id, ?outcome, "poll cycle");
        outcome
    }

    /// Runs cycles until one yields a checkpoint or a terminal outcome.
    pub async fn wait(&mut self) -> PollOutcome {
        loop {
            match self.poll_once().await {
                PollOutcome::Pending { .. } => {
                    if !self.tracker.retrying() {
                        sleep(self.tracker.config.interval).await;
                    }
                }
                outcome => return outcome,
            }
        }
    }
}
