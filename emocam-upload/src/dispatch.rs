//! Upload dispatch and display-ordering policy
//!
//! Every upload runs as an explicit, cancellable task instead of a
//! fire-and-forget callback. Which responses reach the display is
//! decided here: by default whichever response resolves last wins,
//! matching the segment loop's lack of backpressure; the sequential
//! ordering discards responses older than the last applied one.

use crate::client::PredictClient;
use crate::error::UploadError;
use crate::protocol::Prediction;
use emocam_media::Segment;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How segment uploads relate to one another in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    /// Uploads may overlap arbitrarily; nothing throttles the segment
    /// cadence against the network.
    Overlapping,
    /// A single worker uploads one segment at a time in hand-off order.
    Sequential,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy::Overlapping
    }
}

/// Which responses may overwrite the displayed prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOrdering {
    /// Whichever response resolves last wins, regardless of segment
    /// order.
    LastResolvedWins,
    /// Responses for segments older than the last applied one are
    /// discarded.
    Sequential,
}

impl Default for DisplayOrdering {
    fn default() -> Self {
        DisplayOrdering::LastResolvedWins
    }
}

/// A prediction that passed the ordering policy and now backs the
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPrediction {
    /// Segment the prediction belongs to
    pub sequence: u64,
    /// The prediction itself
    pub prediction: Prediction,
}

/// Result of offering a resolved prediction to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The prediction now backs the display
    Applied,
    /// The ordering policy rejected the prediction
    Discarded {
        /// Sequence currently backing the display
        last_applied: u64,
    },
}

/// Events emitted as uploads resolve
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A prediction was applied to the display observable
    PredictionApplied {
        /// Segment number
        sequence: u64,
        /// Predicted emotion label
        emotion: String,
    },
    /// A prediction arrived too late under sequential ordering
    PredictionDiscarded {
        /// Segment number of the late response
        sequence: u64,
        /// Sequence currently backing the display
        last_applied: u64,
    },
    /// An upload failed; it is logged and not retried
    UploadFailed {
        /// Segment number
        sequence: u64,
        /// Failure description
        reason: String,
    },
}

/// Single writer for the displayed prediction.
///
/// Publishes applied predictions through a watch channel so exactly one
/// rendering consumer observes the current value.
pub struct ResultBoard {
    ordering: DisplayOrdering,
    last_applied: Option<u64>,
    tx: watch::Sender<Option<AppliedPrediction>>,
}

impl ResultBoard {
    /// Create a board and the receiver its consumer watches.
    pub fn new(ordering: DisplayOrdering) -> (Self, watch::Receiver<Option<AppliedPrediction>>) {
        let (tx, rx) = watch::channel(None);
        (
            Self {
                ordering,
                last_applied: None,
                tx,
            },
            rx,
        )
    }

    /// Offer a resolved prediction. Under sequential ordering a
    /// response older than the last applied one is discarded.
    pub fn apply(&mut self, sequence: u64, prediction: Prediction) -> ApplyOutcome {
        if self.ordering == DisplayOrdering::Sequential {
            if let Some(last) = self.last_applied {
                if sequence <= last {
                    return ApplyOutcome::Discarded { last_applied: last };
                }
            }
        }

        self.last_applied = Some(sequence);
        self.tx
            .send_replace(Some(AppliedPrediction { sequence, prediction }));
        ApplyOutcome::Applied
    }
}

/// Owns in-flight uploads and routes their outcomes.
///
/// Dispatching never blocks on the network; failures are logged and
/// swallowed (no retry, no backoff, no user-facing error state).
pub struct UploadDispatcher {
    client: Arc<PredictClient>,
    policy: UploadPolicy,
    board: Arc<Mutex<ResultBoard>>,
    result_rx: watch::Receiver<Option<AppliedPrediction>>,
    event_tx: broadcast::Sender<UploadEvent>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
    queue_tx: Option<mpsc::UnboundedSender<Segment>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl UploadDispatcher {
    /// Create a dispatcher. Must run inside a tokio runtime; the
    /// sequential policy spawns its worker here.
    pub fn new(client: PredictClient, policy: UploadPolicy, ordering: DisplayOrdering) -> Self {
        let client = Arc::new(client);
        let (board, result_rx) = ResultBoard::new(ordering);
        let board = Arc::new(Mutex::new(board));
        let (event_tx, _) = broadcast::channel(64);

        let (queue_tx, worker) = match policy {
            UploadPolicy::Sequential => {
                let (tx, mut rx) = mpsc::unbounded_channel::<Segment>();
                let worker_client = client.clone();
                let worker_board = board.clone();
                let worker_events = event_tx.clone();
                let handle = tokio::spawn(async move {
                    while let Some(segment) = rx.recv().await {
                        Self::run_upload(
                            worker_client.clone(),
                            worker_board.clone(),
                            worker_events.clone(),
                            segment,
                        )
                        .await;
                    }
                });
                (Some(tx), Some(handle))
            }
            UploadPolicy::Overlapping => (None, None),
        };

        Self {
            client,
            policy,
            board,
            result_rx,
            event_tx,
            in_flight: Arc::new(Mutex::new(Vec::new())),
            queue_tx,
            worker: Mutex::new(worker),
        }
    }

    /// Active upload policy
    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    /// Watch the prediction currently backing the display
    pub fn subscribe_results(&self) -> watch::Receiver<Option<AppliedPrediction>> {
        self.result_rx.clone()
    }

    /// Subscribe to upload events
    pub fn subscribe_events(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    /// Prediction currently backing the display, if any
    pub fn last_applied(&self) -> Option<AppliedPrediction> {
        self.result_rx.borrow().clone()
    }

    /// Hand off one finalized segment. Never waits for the upload to
    /// complete.
    pub fn dispatch(&self, segment: Segment) {
        match self.policy {
            UploadPolicy::Overlapping => {
                let mut in_flight = self.in_flight.lock();
                in_flight.retain(|handle| !handle.is_finished());
                let task = tokio::spawn(Self::run_upload(
                    self.client.clone(),
                    self.board.clone(),
                    self.event_tx.clone(),
                    segment,
                ));
                in_flight.push(task);
            }
            UploadPolicy::Sequential => {
                if let Some(queue) = &self.queue_tx {
                    if queue.send(segment).is_err() {
                        warn!("upload worker is gone; segment dropped");
                    }
                }
            }
        }
    }

    async fn run_upload(
        client: Arc<PredictClient>,
        board: Arc<Mutex<ResultBoard>>,
        event_tx: broadcast::Sender<UploadEvent>,
        segment: Segment,
    ) {
        let sequence = segment.sequence;
        match client.predict(&segment).await {
            Ok(prediction) => {
                let outcome = board.lock().apply(sequence, prediction.clone());
                match outcome {
                    ApplyOutcome::Applied => {
                        debug!(
                            "segment {} prediction applied: {}",
                            sequence, prediction.emotion
                        );
                        let _ = event_tx.send(UploadEvent::PredictionApplied {
                            sequence,
                            emotion: prediction.emotion,
                        });
                    }
                    ApplyOutcome::Discarded { last_applied } => {
                        debug!(
                            "segment {} prediction discarded, display already at {}",
                            sequence, last_applied
                        );
                        let _ = event_tx.send(UploadEvent::PredictionDiscarded {
                            sequence,
                            last_applied,
                        });
                    }
                }
            }
            Err(err) => {
                Self::log_failure(sequence, &err);
                let _ = event_tx.send(UploadEvent::UploadFailed {
                    sequence,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn log_failure(sequence: u64, err: &UploadError) {
        warn!("segment {} upload failed: {}", sequence, err);
    }

    /// Cancel every outstanding upload task and the sequential worker.
    pub fn shutdown(&self) {
        for task in self.in_flight.lock().drain(..) {
            task.abort();
        }
        if let Some(worker) = self.worker.lock().take() {
            worker.abort();
        }
    }
}
