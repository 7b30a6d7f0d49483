//! Dispatcher actor driving grading jobs from queued to a terminal state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use grading_core::{
    DispatcherConfig, DispatcherStats, Grader, Job, JobEvent, JobId, JobSnapshot, JobStatus,
};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::messages::DispatcherMessage;
use crate::reaper;

/// State for the dispatcher actor.
///
/// The job map and the pending queue live only here, and every mutation
/// arrives through the actor mailbox. That single serialized path is what
/// upholds the queue-membership and active-count invariants without any
/// extra locking.
pub struct DispatcherState {
    config: DispatcherConfig,
    /// All known jobs by ID.
    jobs: HashMap<JobId, Job>,
    /// IDs of queued jobs in arrival order. Pops only from the front.
    pending: VecDeque<JobId>,
    /// Scoring calls currently in flight. Bounded by the cap.
    active: usize,
    /// Jobs completed since start.
    completed: u64,
    /// Jobs failed since start.
    failed: u64,
    grader: Arc<dyn Grader>,
    event_tx: broadcast::Sender<JobEvent>,
}

impl DispatcherState {
    /// Create a new dispatcher state.
    pub fn new(config: DispatcherConfig, grader: Arc<dyn Grader>) -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            config,
            jobs: HashMap::new(),
            pending: VecDeque::new(),
            active: 0,
            completed: 0,
            failed: 0,
            grader,
            event_tx,
        }
    }

    /// Broadcast an event.
    fn broadcast(&self, event: JobEvent) {
        let _ = self.event_tx.send(event);
    }

    fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            queued: self.pending.len() as u64,
            processing: self.active as u64,
            completed: self.completed,
            failed: self.failed,
        }
    }

    fn publish_stats(&self) {
        self.broadcast(JobEvent::StatsUpdated {
            stats: self.stats(),
            timestamp: Utc::now(),
        });
    }
}

/// Pull queued jobs while a slot is free and start their grading tasks.
///
/// The grading task runs outside the actor and reports back through the
/// mailbox, so the actor never blocks on the external call. Each task is
/// capped by the configured grading timeout; a call that outlives it
/// fails the job and frees the slot.
fn dispatch(myself: &ActorRef<DispatcherMessage>, state: &mut DispatcherState) {
    while state.active < state.config.concurrency as usize {
        let Some(job_id) = state.pending.pop_front() else {
            break;
        };
        let Some(job) = state.jobs.get_mut(&job_id) else {
            continue;
        };

        let now = Utc::now();
        job.status = JobStatus::Processing { started_at: now };
        job.updated_at = now;
        let submission = job.submission.clone();
        state.active += 1;

        debug!("job {} started ({} in flight)", job_id, state.active);
        state.broadcast(JobEvent::JobStarted {
            job_id,
            timestamp: now,
        });

        let grader = state.grader.clone();
        let timeout_secs = state.config.grade_timeout_secs;
        let dispatcher = myself.clone();

        tokio::spawn(async move {
            let outcome = tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                grader.grade(&submission),
            )
            .await;

            let report = match outcome {
                Ok(Ok(result)) => DispatcherMessage::JobCompleted { job_id, result },
                Ok(Err(error)) => DispatcherMessage::JobFailed {
                    job_id,
                    error: error.to_string(),
                },
                Err(_) => DispatcherMessage::JobFailed {
                    job_id,
                    error: format!("grading timed out after {}s", timeout_secs),
                },
            };
            let _ = dispatcher.send_message(report);
        });
    }
}

/// Dispatcher actor that owns the job store and the pending queue.
pub struct DispatcherActor;

impl Actor for DispatcherActor {
    type Msg = DispatcherMessage;
    type State = DispatcherState;
    type Arguments = DispatcherState;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(
            "Starting grading dispatcher (cap {}, tick {}s)",
            args.config.concurrency, args.config.tick_interval_secs
        );

        // Safety tick: re-attempts dispatch even if a submission or
        // completion trigger was somehow missed.
        let tick_interval = Duration::from_secs(args.config.tick_interval_secs.max(1));
        let myself_clone = myself.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                if myself_clone.send_message(DispatcherMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DispatcherMessage::Submit { submission, reply } => {
                let job = Job::new(submission);
                let job_id = job.id;
                state.jobs.insert(job_id, job.clone());
                state.pending.push_back(job_id);

                info!("job {} queued (depth {})", job_id, state.pending.len());
                state.broadcast(JobEvent::JobQueued {
                    job: job.clone(),
                    timestamp: job.created_at,
                });

                if state.jobs.len() > state.config.reap_threshold {
                    let retention = chrono::Duration::seconds(state.config.retention_secs as i64);
                    let removed = reaper::reap(&mut state.jobs, retention, Utc::now());
                    if removed > 0 {
                        info!("reaped {} old terminal jobs", removed);
                        state.broadcast(JobEvent::JobsReaped {
                            removed,
                            timestamp: Utc::now(),
                        });
                    }
                }

                dispatch(&myself, state);
                state.publish_stats();

                let _ = reply.send(job);
            }

            DispatcherMessage::GetJob { job_id, reply } => {
                let snapshot = state.jobs.get(&job_id).map(|job| {
                    let position = if job.status.is_queued() {
                        state
                            .pending
                            .iter()
                            .position(|id| *id == job_id)
                            .map_or(0, |index| index + 1)
                    } else {
                        0
                    };
                    JobSnapshot {
                        job: job.clone(),
                        position,
                    }
                });
                let _ = reply.send(snapshot);
            }

            DispatcherMessage::JobCompleted { job_id, result } => {
                state.active = state.active.saturating_sub(1);

                if let Some(job) = state.jobs.get_mut(&job_id) {
                    let now = Utc::now();
                    let started_at = match &job.status {
                        JobStatus::Processing { started_at } => *started_at,
                        _ => now,
                    };
                    let duration_ms = (now - started_at).num_milliseconds() as u64;

                    job.status = JobStatus::Completed {
                        started_at,
                        completed_at: now,
                        result,
                    };
                    job.updated_at = now;
                    state.completed += 1;

                    info!("job {} completed in {}ms", job_id, duration_ms);
                    state.broadcast(JobEvent::JobCompleted {
                        job_id,
                        duration_ms,
                        timestamp: now,
                    });
                } else {
                    warn!("completion report for unknown job {}", job_id);
                }

                dispatch(&myself, state);
                state.publish_stats();
            }

            DispatcherMessage::JobFailed { job_id, error } => {
                state.active = state.active.saturating_sub(1);

                if let Some(job) = state.jobs.get_mut(&job_id) {
                    let now = Utc::now();
                    let started_at = match &job.status {
                        JobStatus::Processing { started_at } => *started_at,
                        _ => now,
                    };

                    job.status = JobStatus::Failed {
                        started_at,
                        failed_at: now,
                        error: error.clone(),
                    };
                    job.updated_at = now;
                    state.failed += 1;

                    warn!("job {} failed: {}", job_id, error);
                    state.broadcast(JobEvent::JobFailed {
                        job_id,
                        error,
                        timestamp: now,
                    });
                } else {
                    warn!("failure report for unknown job {}: {}", job_id, error);
                }

                dispatch(&myself, state);
                state.publish_stats();
            }

            DispatcherMessage::GetStats { reply } => {
                let _ = reply.send(state.stats());
            }

            DispatcherMessage::Subscribe { sender } => {
                // Forward from the dispatcher's channel to the subscriber's.
                let mut rx = state.event_tx.subscribe();
                tokio::spawn(async move {
                    while let Ok(event) = rx.recv().await {
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                });
            }

            DispatcherMessage::Tick => {
                dispatch(&myself, state);
            }

            DispatcherMessage::Shutdown => {
                info!("Shutting down grading dispatcher");
                myself.stop(None);
                return Ok(());
            }
        }

        Ok(())
    }
}

/// Start the dispatcher actor with the given config and grader.
pub async fn start_dispatcher(
    config: DispatcherConfig,
    grader: Arc<dyn Grader>,
) -> Result<(ActorRef<DispatcherMessage>, tokio::task::JoinHandle<()>), ractor::SpawnErr> {
    let state = DispatcherState::new(config, grader);
    let (actor, handle) = Actor::spawn(None, DispatcherActor, state).await?;

    Ok((actor, handle))
}
