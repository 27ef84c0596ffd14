//! Capture session management and the segmenting loop

use crate::config::SessionConfig;
use crate::error::EmocamError;
use crate::event::SessionEvent;
use emocam_media::{
    ffmpeg_available, CameraBackend, CameraStream, EncoderFactory, MediaError, SegmentRecorder,
};
use emocam_upload::{
    AppliedPrediction, DisplayOrdering, PredictClient, UploadDispatcher, UploadEvent, UploadPolicy,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Fluent builder for capture session configuration and startup
pub struct SessionBuilder {
    config: SessionConfig,
    backend: Option<Box<dyn CameraBackend>>,
    encoder_factory: Option<Arc<EncoderFactory>>,
}

impl SessionBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            backend: None,
            encoder_factory: None,
        }
    }

    /// Set the prediction endpoint URL (required)
    pub fn endpoint(mut self, url: &str) -> Self {
        self.config.endpoint = Some(url.to_string());
        self
    }

    /// Set the recording interval per segment
    pub fn segment_duration(mut self, duration: Duration) -> Self {
        self.config.segment_duration = duration;
        self
    }

    /// Select a camera by id or name instead of the default device
    pub fn camera_device(mut self, device: &str) -> Self {
        self.config.camera.device = Some(device.to_string());
        self
    }

    /// Set how uploads relate in time
    pub fn upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.config.upload_policy = policy;
        self
    }

    /// Set which responses may overwrite the display
    pub fn display_ordering(mut self, ordering: DisplayOrdering) -> Self {
        self.config.display_ordering = ordering;
        self
    }

    /// Set a per-request timeout (default: none)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Use a specific camera backend instead of the platform default
    /// (headless hosts, tests)
    pub fn camera_backend(mut self, backend: Box<dyn CameraBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Use a specific segment encoder factory instead of FFmpeg
    pub fn encoder_factory(mut self, factory: Arc<EncoderFactory>) -> Self {
        self.encoder_factory = Some(factory);
        self
    }

    /// Acquire the camera and start the segmenting loop.
    ///
    /// Denied or absent capture devices surface as a device-access
    /// error here; in that case no loop is started and the caller is
    /// expected to log the failure and move on.
    pub async fn start(self) -> Result<CaptureSession, EmocamError> {
        let endpoint =
            self.config
                .endpoint
                .clone()
                .ok_or_else(|| EmocamError::MissingConfiguration {
                    field: "endpoint".to_string(),
                })?;
        self.config.validate()?;

        // The default factory shells out to ffmpeg; fail up front when
        // the binary is missing rather than on the first segment.
        if self.encoder_factory.is_none() && !ffmpeg_available() {
            return Err(MediaError::EncoderUnavailable {
                reason: "ffmpeg not found on PATH".to_string(),
            }
            .into());
        }

        let stream = match self.backend {
            Some(backend) => CameraStream::acquire_with(backend, &self.config.camera)?,
            None => CameraStream::acquire(&self.config.camera)?,
        };
        let format = stream.format().clone();
        let stream_desc = format!(
            "{}x{} @ {}fps ({})",
            format.width, format.height, format.framerate, format.pixel_format
        );

        let mut recorder = match self.encoder_factory {
            Some(factory) => SegmentRecorder::with_encoder_factory(stream, factory),
            None => SegmentRecorder::new(stream),
        };

        let client = PredictClient::new(&endpoint, self.config.request_timeout)?;
        let dispatcher = Arc::new(UploadDispatcher::new(
            client,
            self.config.upload_policy,
            self.config.display_ordering,
        ));
        let results = dispatcher.subscribe_results();
        let (event_tx, _) = broadcast::channel(128);

        // Recording begins immediately on grant, ahead of the first tick
        recorder.start_segment()?;
        info!("capture session started: {}", stream_desc);
        let _ = event_tx.send(SessionEvent::CaptureStarted {
            stream: stream_desc,
        });

        let forwarder = Self::spawn_event_forwarder(dispatcher.subscribe_events(), event_tx.clone());
        let loop_task = Self::spawn_segment_loop(
            recorder,
            dispatcher.clone(),
            event_tx.clone(),
            self.config.segment_duration,
        );

        Ok(CaptureSession {
            dispatcher,
            event_tx,
            results,
            loop_task,
            forwarder,
        })
    }

    fn spawn_event_forwarder(
        mut upload_events: broadcast::Receiver<UploadEvent>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match upload_events.recv().await {
                    Ok(event) => {
                        let mapped = match event {
                            UploadEvent::PredictionApplied { sequence, emotion } => {
                                SessionEvent::PredictionApplied { sequence, emotion }
                            }
                            UploadEvent::PredictionDiscarded {
                                sequence,
                                last_applied,
                            } => SessionEvent::PredictionDiscarded {
                                sequence,
                                last_applied,
                            },
                            UploadEvent::UploadFailed { sequence, reason } => {
                                SessionEvent::UploadFailed { sequence, reason }
                            }
                        };
                        let _ = event_tx.send(mapped);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("session event forwarder lagged by {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// The record → stop → upload → restart loop. The cadence is driven
    /// purely by the timer; it never waits for an upload.
    fn spawn_segment_loop(
        mut recorder: SegmentRecorder,
        dispatcher: Arc<UploadDispatcher>,
        event_tx: broadcast::Sender<SessionEvent>,
        segment_duration: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(segment_duration);
            // The first tick of a tokio interval fires immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                match recorder.stop_segment().await {
                    Ok(segment) => {
                        if segment.is_empty() {
                            warn!(
                                "segment {} finalized empty, skipping upload",
                                segment.sequence
                            );
                            let _ = event_tx.send(SessionEvent::SegmentSkipped {
                                sequence: segment.sequence,
                            });
                        } else {
                            let _ = event_tx.send(SessionEvent::SegmentRecorded {
                                sequence: segment.sequence,
                                len: segment.len(),
                            });
                            dispatcher.dispatch(segment);
                        }
                    }
                    Err(err) => {
                        error!("segment finalization failed: {}", err);
                    }
                }

                if let Err(err) = recorder.start_segment() {
                    error!("cannot restart recording: {}", err);
                    let _ = event_tx.send(SessionEvent::CaptureStalled {
                        reason: err.to_string(),
                    });
                    break;
                }
            }
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running capture session.
///
/// Owns the segmenting loop and the upload dispatcher. Dropping the
/// session (or calling [`CaptureSession::stop`]) halts the loop,
/// releases the camera, and cancels in-flight uploads.
pub struct CaptureSession {
    dispatcher: Arc<UploadDispatcher>,
    event_tx: broadcast::Sender<SessionEvent>,
    results: watch::Receiver<Option<AppliedPrediction>>,
    loop_task: JoinHandle<()>,
    forwarder: JoinHandle<()>,
}

impl CaptureSession {
    /// Create a session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Subscribe to session events
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the prediction currently backing the display
    pub fn predictions(&self) -> watch::Receiver<Option<AppliedPrediction>> {
        self.results.clone()
    }

    /// Prediction currently backing the display, if any
    pub fn latest_prediction(&self) -> Option<AppliedPrediction> {
        self.results.borrow().clone()
    }

    /// Stop the session: halt the segmenting loop, release the camera,
    /// and cancel in-flight uploads.
    pub fn stop(self) {
        let _ = self.event_tx.send(SessionEvent::SessionClosed);
        info!("capture session stopped");
        // Drop performs the actual teardown
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.loop_task.abort();
        self.forwarder.abort();
        self.dispatcher.shutdown();
    }
}
