//! # emocam upload
//!
//! The upload side of the emocam client: multipart submission of
//! finalized segments to the prediction endpoint, strict response
//! decoding, and the dispatcher that owns in-flight uploads and
//! decides which responses reach the display.

#![warn(clippy::all)]

pub mod client;
pub mod dispatch;
pub mod error;
pub mod protocol;

// Re-export main types
pub use client::PredictClient;
pub use dispatch::{
    AppliedPrediction, ApplyOutcome, DisplayOrdering, ResultBoard, UploadDispatcher, UploadEvent,
    UploadPolicy,
};
pub use error::{UploadError, UploadResult};
pub use protocol::Prediction;
