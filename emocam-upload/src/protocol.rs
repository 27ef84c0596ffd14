//! Prediction response schema
//!
//! The endpoint answers `{"emotion": "<label>"}`. Decoding is strict:
//! a body that is not JSON, or that lacks a string `emotion` field, is
//! rejected rather than silently rendered as an empty label.

use crate::error::{UploadError, UploadResult};
use serde::{Deserialize, Serialize};

/// Prediction returned by the inference endpoint for one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted emotion label
    pub emotion: String,
}

/// Decode a response body into a [`Prediction`].
pub fn decode(body: &[u8]) -> UploadResult<Prediction> {
    serde_json::from_slice(body).map_err(|e| UploadError::MalformedResponse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_body() {
        let prediction = decode(br#"{"emotion": "happy"}"#).unwrap();
        assert_eq!(prediction.emotion, "happy");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let prediction = decode(br#"{"emotion": "sad", "confidence": 0.93}"#).unwrap();
        assert_eq!(prediction.emotion, "sad");
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let result = decode(br#"{"label": "happy"}"#);
        assert!(matches!(result, Err(UploadError::MalformedResponse { .. })));
    }

    #[test]
    fn test_decode_rejects_wrong_type() {
        let result = decode(br#"{"emotion": 3}"#);
        assert!(matches!(result, Err(UploadError::MalformedResponse { .. })));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let result = decode(b"<html>Internal Server Error</html>");
        assert!(matches!(result, Err(UploadError::MalformedResponse { .. })));
    }
}
