//! # emocam - Segmented Webcam Emotion Prediction Client
//!
//! emocam acquires a webcam stream once, records it in fixed-duration
//! segments, uploads each finished segment to a remote prediction
//! endpoint, and exposes the returned emotion label through an
//! observable consumed by a single display renderer.
//!
//! ## Key Properties
//!
//! - **Single acquisition**: the camera is opened once for the session
//!   lifetime; segmentation swaps encoders, never the device
//! - **Timer-driven cadence**: segments rotate on a fixed interval,
//!   independent of upload completion
//! - **Explicit upload tasks**: every in-flight upload is a cancellable
//!   task; overlap and display ordering are configurable
//! - **Degrade, don't halt**: capture and upload failures are logged
//!   and swallowed; the loop keeps running
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use emocam::{ConsoleSurface, EmotionDisplay, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Acquire the default camera and start the segmenting loop
//!     let session = SessionBuilder::new()
//!         .endpoint("http://127.0.0.1:5000/predict")
//!         .start()
//!         .await?;
//!
//!     // Render each applied prediction
//!     let display = EmotionDisplay::new(session.predictions(), ConsoleSurface);
//!     display.run().await;
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export capture types for easy access
pub use emocam_media::{
    enumerate_devices, CameraBackend, CameraConfig, CameraDevice, CameraResolution, CameraStream,
    MediaError, RecorderEvent, Segment, SegmentRecorder, StreamFormat,
};

// Re-export upload types
pub use emocam_upload::{
    AppliedPrediction, DisplayOrdering, PredictClient, Prediction, UploadError, UploadPolicy,
};

// Public API modules
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod session;

// Re-export main API types
pub use config::{SessionConfig, DEFAULT_SEGMENT_DURATION};
pub use display::{BufferSurface, ConsoleSurface, DisplaySurface, EmotionDisplay, DISPLAY_LABEL};
pub use error::EmocamError;
pub use event::SessionEvent;
pub use session::{CaptureSession, SessionBuilder};
