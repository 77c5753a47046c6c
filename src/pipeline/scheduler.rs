//! The poll scheduler that drives the alert pipeline on a fixed interval.

use std::sync::Arc;

use tokio::{
    sync::{RwLock, mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use super::{buffer::AlertBuffer, dedup::filter_new};
use crate::{
    config::{AppConfig, NotifyPolicy},
    detection::{DetectionSource, FetchError},
    models::{Alert, AlertIdentity},
    notification::AlertNotifier,
};

/// The externally observable state of the poll scheduler.
///
/// `Idle` covers both the initial state and the settled state after a
/// successful cycle; `Failed` is the settled state after a failed cycle and
/// persists until the next cycle starts, so observers can render an error
/// indicator alongside the last-known-good snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for the next tick or a manual refresh.
    Idle,
    /// A polling cycle is in flight.
    Polling,
    /// The last cycle failed; the buffer holds the previous snapshot.
    Failed,
    /// The pipeline has been torn down; no further ticks will fire.
    Stopped,
}

/// A point-in-time view of the pipeline's status, published through a
/// `watch` channel.
#[derive(Debug, Clone)]
pub struct PipelineStatus {
    /// Current scheduler state.
    pub state: PollState,
    /// Message of the most recent fetch failure, cleared on the next
    /// successful cycle.
    pub last_error: Option<String>,
    /// Message of the most recent dispatch failure. Dispatch failures never
    /// affect the poll state.
    pub last_dispatch_error: Option<String>,
    /// Number of completed cycles, successful or failed.
    pub cycles_completed: u64,
}

impl PipelineStatus {
    fn initial() -> Self {
        Self {
            state: PollState::Idle,
            last_error: None,
            last_dispatch_error: None,
            cycles_completed: 0,
        }
    }
}

/// The outcome of one successful polling cycle.
#[derive(Debug, Default, PartialEq, Eq)]
struct CycleOutcome {
    admitted: usize,
    dispatched: usize,
}

/// The alert ingestion pipeline.
///
/// Owns the alert buffer and the notification cursor, and drives
/// fetch → dedup → admit → dispatch cycles on a fixed interval. Constructed
/// with injected collaborators so tests can run cycles deterministically
/// without timers or network access.
pub struct AlertPipeline {
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// The source of raw alert batches.
    source: Arc<dyn DetectionSource>,
    /// The push notification dispatcher.
    notifier: Arc<dyn AlertNotifier>,
    /// The shared alert buffer. Observers read it only through snapshots.
    buffer: Arc<RwLock<AlertBuffer>>,
    /// Publisher for the pipeline status.
    status_tx: watch::Sender<PipelineStatus>,
    /// Identity of the most recently dispatched alert, to suppress
    /// re-notification.
    cursor: Option<AlertIdentity>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl AlertPipeline {
    /// Creates a new pipeline with the given collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<dyn DetectionSource>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        let buffer = Arc::new(RwLock::new(AlertBuffer::new(config.buffer_capacity)));
        let (status_tx, _) = watch::channel(PipelineStatus::initial());
        Self {
            config,
            source,
            notifier,
            buffer,
            status_tx,
            cursor: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Spawns the scheduler loop and returns a handle for observing and
    /// controlling it.
    pub fn start(self) -> PipelineHandle {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let buffer = Arc::clone(&self.buffer);
        let status_rx = self.status_tx.subscribe();
        let cancellation_token = self.cancellation_token.clone();
        let join_handle = tokio::spawn(self.run(refresh_rx));
        PipelineHandle { buffer, status_rx, refresh_tx, cancellation_token, join_handle }
    }

    /// The scheduler loop.
    ///
    /// At most one polling cycle is in flight at a time; cancellation drops
    /// the in-flight cycle, so a late-arriving response can never mutate
    /// the buffer after teardown.
    async fn run(mut self, mut refresh_rx: mpsc::Receiver<()>) {
        let token = self.cancellation_token.clone();
        let mut interval = tokio::time::interval(self.config.poll_interval_ms);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::info!("Alert pipeline cancellation signal received, shutting down...");
                    break;
                }

                _ = interval.tick() => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => break,
                        _ = self.poll_once() => {}
                    }
                }

                maybe_refresh = refresh_rx.recv() => {
                    match maybe_refresh {
                        Some(()) => {
                            tokio::select! {
                                biased;
                                _ = token.cancelled() => break,
                                _ = self.poll_once() => {}
                            }
                        }
                        None => {
                            tracing::warn!("Pipeline handle dropped, shutting down.");
                            break;
                        }
                    }
                }
            }

            // A refresh that arrived while a cycle was in flight is coalesced
            // into that cycle rather than triggering another fetch.
            while refresh_rx.try_recv().is_ok() {}
        }

        self.status_tx.send_modify(|s| s.state = PollState::Stopped);
        tracing::info!("Alert pipeline has shut down.");
    }

    /// Runs one full cycle and settles the resulting state.
    async fn poll_once(&mut self) {
        self.status_tx.send_modify(|s| s.state = PollState::Polling);

        match self.run_cycle().await {
            Ok(outcome) => {
                tracing::debug!(
                    admitted = outcome.admitted,
                    dispatched = outcome.dispatched,
                    "Polling cycle completed."
                );
                self.status_tx.send_modify(|s| {
                    s.state = PollState::Idle;
                    s.last_error = None;
                    s.cycles_completed += 1;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Polling cycle failed. Retrying on next tick.");
                self.status_tx.send_modify(|s| {
                    s.state = PollState::Failed;
                    s.last_error = Some(e.to_string());
                    s.cycles_completed += 1;
                });
            }
        }
    }

    /// Performs fetch → dedup → admit → dispatch for one cycle.
    ///
    /// The buffer is left untouched when the fetch fails: a stale snapshot
    /// is preferable to clearing the view on a transient failure.
    async fn run_cycle(&mut self) -> Result<CycleOutcome, FetchError> {
        let batch = self.source.fetch_batch().await?;

        let known = self.buffer.read().await.known_identities();
        let new_alerts = filter_new(&batch, &known);
        if new_alerts.is_empty() {
            return Ok(CycleOutcome::default());
        }

        // Dispatch selection happens before admission mutates the buffer;
        // the batch is newest-first, so the first new alert is the newest.
        let selected: Vec<Alert> = match self.config.notify_policy {
            NotifyPolicy::NewestOnly => new_alerts.first().cloned().into_iter().collect(),
            NotifyPolicy::EveryAlert => new_alerts.clone(),
        };

        let admitted = self.buffer.write().await.admit(new_alerts);

        let mut dispatched = 0;
        if let Some(device_token) = self.config.device_token.as_deref() {
            for alert in &selected {
                let identity = alert.identity();
                if self.cursor.as_ref() == Some(&identity) {
                    continue;
                }
                match self.notifier.dispatch(alert, device_token).await {
                    Ok(()) => {
                        self.cursor = Some(identity);
                        dispatched += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            subject = %alert.subject,
                            "Push dispatch failed; alert remains in the buffer."
                        );
                        self.status_tx
                            .send_modify(|s| s.last_dispatch_error = Some(e.to_string()));
                    }
                }
            }
        }

        Ok(CycleOutcome { admitted, dispatched })
    }
}

/// A handle to a running pipeline.
///
/// Exposes read-only observation (snapshots and status) and the two control
/// operations: manual refresh and teardown.
pub struct PipelineHandle {
    buffer: Arc<RwLock<AlertBuffer>>,
    status_rx: watch::Receiver<PipelineStatus>,
    refresh_tx: mpsc::Sender<()>,
    cancellation_token: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl PipelineHandle {
    /// Returns an owned copy of the current buffer contents, newest first.
    pub async fn snapshot(&self) -> Vec<Alert> {
        self.buffer.read().await.snapshot()
    }

    /// Returns the current pipeline status.
    pub fn status(&self) -> PipelineStatus {
        self.status_rx.borrow().clone()
    }

    /// Subscribes to pipeline status changes.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.status_rx.clone()
    }

    /// Requests an immediate polling cycle.
    ///
    /// A request that arrives while a cycle is already in flight is
    /// coalesced into it; this call never blocks.
    pub fn refresh(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Stops the pipeline, cancelling any in-flight request, and waits for
    /// the scheduler task to exit.
    pub async fn stop(self) {
        self.cancellation_token.cancel();
        let _ = self.join_handle.await;
    }
}
