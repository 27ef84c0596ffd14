//! Top-level error type for emocam sessions

use emocam_media::MediaError;
use emocam_upload::UploadError;
use thiserror::Error;

/// Main error type for session operations
#[derive(Error, Debug)]
pub enum EmocamError {
    /// Missing required configuration error
    #[error("Missing required configuration: {field}")]
    MissingConfiguration {
        /// Missing configuration field
        field: String,
    },

    /// Invalid session configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Capture-side failure (camera access, recording, encoding)
    #[error("Media error: {source}")]
    Media {
        /// Underlying media-layer error
        #[from]
        source: MediaError,
    },

    /// Upload-side failure
    #[error("Upload error: {source}")]
    Upload {
        /// Underlying upload-layer error
        #[from]
        source: UploadError,
    },
}

impl EmocamError {
    /// Whether the failure is in the device-access family, meaning the
    /// session never started capturing.
    pub fn is_device_access(&self) -> bool {
        matches!(self, EmocamError::Media { source } if source.is_device_access())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_access_passthrough() {
        let error = EmocamError::from(MediaError::DeviceNotFound {
            device: "2".to_string(),
        });
        assert!(error.is_device_access());

        let error = EmocamError::MissingConfiguration {
            field: "endpoint".to_string(),
        };
        assert!(!error.is_device_access());
    }
}
