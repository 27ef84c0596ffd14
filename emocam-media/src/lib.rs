//! # emocam media
//!
//! Camera acquisition and segment recording for the emocam client.
//! This crate owns everything up to a finalized, uploadable segment:
//! camera backends, the capture thread, per-segment encoding, and the
//! segment data model.

#![warn(clippy::all)]

pub mod camera;
pub mod capture;
pub mod encoder;
pub mod error;
pub mod recorder;
pub mod segment;

// Re-export main types
pub use camera::{enumerate_devices, CameraConfig, CameraDevice, CameraResolution, CameraStream};
pub use capture::{CameraBackend, StreamFormat};
pub use encoder::{ffmpeg_available, EncoderFactory, FfmpegEncoder, SegmentEncoder};
pub use error::{MediaError, MediaResult};
pub use recorder::{RecorderEvent, RecorderState, SegmentRecorder};
pub use segment::{Segment, SegmentAssembler, SEGMENT_CONTENT_TYPE, SEGMENT_FILE_NAME};
