//! Media capture error types
//!
//! This module defines the error types used throughout the capture and
//! recording pipeline, providing clear error messages and context for
//! debugging and error handling.

use thiserror::Error;

/// Main error type for camera and recording operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Camera access was denied by the platform or the user
    #[error("Camera access denied for {device}: {reason}")]
    DeviceAccessDenied {
        /// Device identifier or "default"
        device: String,
        /// Failure reason reported by the platform
        reason: String,
    },

    /// Requested camera does not exist
    #[error("Camera not found: {device}")]
    DeviceNotFound {
        /// Device identifier
        device: String,
    },

    /// Device enumeration failed
    #[error("Device enumeration failed: {reason}")]
    DeviceEnumerationFailed {
        /// Failure reason
        reason: String,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Segment encoder could not be started
    #[error("Encoder unavailable: {reason}")]
    EncoderUnavailable {
        /// Failure reason
        reason: String,
    },

    /// Encoding operation failed
    #[error("Encoding failed: {reason}")]
    EncodingFailed {
        /// Failure reason
        reason: String,
    },

    /// Frame capture failed after the stream was opened
    #[error("Capture failed: {reason}")]
    CaptureFailed {
        /// Failure reason
        reason: String,
    },

    /// Recorder is not currently recording
    #[error("Capture not active")]
    CaptureNotActive,

    /// Invalid state for operation
    #[error("Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Check if this error belongs to the device-access family
    /// (denied, missing, or unenumerable capture devices).
    pub fn is_device_access(&self) -> bool {
        matches!(
            self,
            MediaError::DeviceAccessDenied { .. }
                | MediaError::DeviceNotFound { .. }
                | MediaError::DeviceEnumerationFailed { .. }
        )
    }
}
