//! Upload error types

use thiserror::Error;

/// Main error type for upload operations
#[derive(Error, Debug)]
pub enum UploadError {
    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint {
        /// The rejected URL
        url: String,
        /// Parse failure reason
        reason: String,
    },

    /// Endpoint answered with a non-success status. No status-specific
    /// handling exists beyond recording the code.
    #[error("Prediction request failed with status {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Transport-level failure (connect, timeout, body read)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// Response body rejected by the strict decoder
    #[error("Malformed prediction response: {reason}")]
    MalformedResponse {
        /// Decode failure reason
        reason: String,
    },
}

/// Result type alias for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = UploadError::RequestFailed { status: 500 };
        assert_eq!(error.to_string(), "Prediction request failed with status 500");

        let error = UploadError::MalformedResponse {
            reason: "missing field `emotion`".to_string(),
        };
        assert!(error.to_string().contains("missing field `emotion`"));
    }
}
