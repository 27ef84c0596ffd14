//! Fixed-interval segment recorder
//!
//! Owns the camera stream for the session lifetime. A dedicated capture
//! thread pulls frames continuously; segmentation happens by swapping
//! the encoder the thread feeds, so the camera is opened exactly once
//! no matter how many segments are recorded.

use crate::camera::CameraStream;
use crate::capture::StreamFormat;
use crate::encoder::{EncoderFactory, FfmpegEncoder, SegmentEncoder};
use crate::error::{MediaError, MediaResult};
use crate::segment::{Segment, SegmentAssembler};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Recorder lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No segment is open
    Idle,
    /// A segment is accumulating
    Recording,
    /// A stop was requested and the segment is being finalized
    Finalizing,
}

impl RecorderState {
    /// State name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Finalizing => "finalizing",
        }
    }
}

/// Events emitted while recording
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    /// A segment started accumulating
    SegmentStarted {
        /// Segment number
        sequence: u64,
    },
    /// An encoded chunk was accumulated into the open segment
    DataAvailable {
        /// Segment number
        sequence: u64,
        /// Chunk length in bytes
        len: usize,
    },
    /// A segment was finalized
    SegmentFinalized {
        /// Segment number
        sequence: u64,
        /// Total segment length in bytes
        len: usize,
    },
    /// Frame capture or encoding failed; the recorder keeps running
    CaptureError {
        /// Failure description
        reason: String,
    },
}

/// Records the camera stream in discrete segments.
///
/// At most one segment is open at a time: `start_segment` refuses to
/// run while a segment is accumulating or finalizing, and
/// `stop_segment` finalizes the open segment before the next one may
/// begin.
pub struct SegmentRecorder {
    state: Arc<RwLock<RecorderState>>,
    encoder_slot: Arc<Mutex<Option<Box<dyn SegmentEncoder>>>>,
    factory: Arc<EncoderFactory>,
    format: StreamFormat,
    running: Arc<AtomicBool>,
    capture_thread: Option<std::thread::JoinHandle<()>>,
    event_tx: broadcast::Sender<RecorderEvent>,
    next_sequence: u64,
    current: Option<(u64, Instant)>,
}

impl SegmentRecorder {
    /// Create a recorder encoding segments with FFmpeg.
    pub fn new(stream: CameraStream) -> Self {
        Self::with_encoder_factory(stream, FfmpegEncoder::factory())
    }

    /// Create a recorder with a custom encoder factory (tests,
    /// alternative encoders).
    pub fn with_encoder_factory(mut stream: CameraStream, factory: Arc<EncoderFactory>) -> Self {
        let format = stream.format().clone();
        let state = Arc::new(RwLock::new(RecorderState::Idle));
        let encoder_slot: Arc<Mutex<Option<Box<dyn SegmentEncoder>>>> =
            Arc::new(Mutex::new(None));
        let running = Arc::new(AtomicBool::new(true));
        let (event_tx, _) = broadcast::channel(64);

        let thread_running = running.clone();
        let thread_slot = encoder_slot.clone();
        let thread_events = event_tx.clone();

        // The capture thread owns the stream; the camera is released
        // when the thread exits and drops it.
        let capture_thread = std::thread::spawn(move || {
            while thread_running.load(Ordering::SeqCst) {
                match stream.read_frame() {
                    Ok(frame) => {
                        let mut slot = thread_slot.lock();
                        if let Some(encoder) = slot.as_mut() {
                            if let Err(e) = encoder.write_frame(&frame) {
                                warn!("dropping frame: {}", e);
                                let _ = thread_events.send(RecorderEvent::CaptureError {
                                    reason: e.to_string(),
                                });
                            }
                        }
                    }
                    Err(e) => {
                        warn!("frame capture failed: {}", e);
                        let _ = thread_events.send(RecorderEvent::CaptureError {
                            reason: e.to_string(),
                        });
                        std::thread::sleep(Duration::from_millis(50));
                    }
                }
            }
        });

        Self {
            state,
            encoder_slot,
            factory,
            format,
            running,
            capture_thread: Some(capture_thread),
            event_tx,
            next_sequence: 0,
            current: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecorderState {
        *self.state.read()
    }

    /// Format of the frames being recorded
    pub fn format(&self) -> &StreamFormat {
        &self.format
    }

    /// Subscribe to recorder events
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.event_tx.subscribe()
    }

    /// Open a new segment. Fails unless the recorder is idle; the
    /// previous segment must have been finalized first.
    pub fn start_segment(&mut self) -> MediaResult<u64> {
        {
            let state = self.state.read();
            if *state != RecorderState::Idle {
                return Err(MediaError::InvalidState {
                    expected: "idle".to_string(),
                    actual: state.name().to_string(),
                });
            }
        }

        let encoder = (self.factory)(&self.format)?;
        *self.encoder_slot.lock() = Some(encoder);
        *self.state.write() = RecorderState::Recording;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.current = Some((sequence, Instant::now()));

        let _ = self.event_tx.send(RecorderEvent::SegmentStarted { sequence });
        debug!("segment {} recording", sequence);
        Ok(sequence)
    }

    /// Stop the open segment and finalize it.
    ///
    /// Accumulation ends as soon as the encoder is removed from the
    /// capture thread's slot; finalization (encoder drain) runs on a
    /// blocking task so the caller's event loop stays responsive.
    pub async fn stop_segment(&mut self) -> MediaResult<Segment> {
        {
            let mut state = self.state.write();
            if *state != RecorderState::Recording {
                return Err(MediaError::CaptureNotActive);
            }
            *state = RecorderState::Finalizing;
        }

        let encoder = self.encoder_slot.lock().take();
        let (sequence, started_at) = match self.current.take() {
            Some(open) => open,
            None => {
                *self.state.write() = RecorderState::Idle;
                return Err(MediaError::InvalidState {
                    expected: "recording".to_string(),
                    actual: "idle".to_string(),
                });
            }
        };
        let duration = started_at.elapsed();

        let finish_result = match encoder {
            Some(encoder) => tokio::task::spawn_blocking(move || encoder.finish())
                .await
                .map_err(|e| MediaError::EncodingFailed {
                    reason: format!("finalization task failed: {}", e),
                })
                .and_then(|result| result),
            None => Ok(Vec::new()),
        };

        *self.state.write() = RecorderState::Idle;
        let chunks = finish_result?;

        let mut assembler = SegmentAssembler::new();
        for chunk in chunks {
            let len = chunk.len();
            if assembler.push(chunk) {
                let _ = self
                    .event_tx
                    .send(RecorderEvent::DataAvailable { sequence, len });
            }
        }

        let segment = assembler.finalize(sequence, duration);
        let _ = self.event_tx.send(RecorderEvent::SegmentFinalized {
            sequence,
            len: segment.len(),
        });
        debug!(
            "segment {} finalized: {} bytes over {:?}",
            sequence,
            segment.len(),
            segment.duration
        );
        Ok(segment)
    }

    /// Stop the capture thread and release the camera. Idempotent.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
        // A still-open encoder is dropped here, which kills its child
        self.encoder_slot.lock().take();
        *self.state.write() = RecorderState::Idle;
        self.current = None;
    }
}

impl Drop for SegmentRecorder {
    fn drop(&mut self) {
        self.shutdown();
    }
}
