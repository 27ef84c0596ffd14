//! Session configuration types and defaults

use crate::error::EmocamError;
use emocam_media::CameraConfig;
use emocam_upload::{DisplayOrdering, UploadPolicy};
use std::time::Duration;

/// Default recording interval per segment.
pub const DEFAULT_SEGMENT_DURATION: Duration = Duration::from_secs(5);

/// Capture session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Prediction endpoint URL (required)
    pub endpoint: Option<String>,
    /// Recording interval per segment
    pub segment_duration: Duration,
    /// Camera acquisition settings
    pub camera: CameraConfig,
    /// How uploads relate in time
    pub upload_policy: UploadPolicy,
    /// Which responses may overwrite the display
    pub display_ordering: DisplayOrdering,
    /// Per-request timeout; `None` means none, matching the default
    /// fire-and-forget behavior
    pub request_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            segment_duration: DEFAULT_SEGMENT_DURATION,
            camera: CameraConfig::default(),
            upload_policy: UploadPolicy::default(),
            display_ordering: DisplayOrdering::default(),
            request_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), EmocamError> {
        if self.segment_duration.is_zero() {
            return Err(EmocamError::InvalidConfiguration {
                message: "segment duration must be non-zero".to_string(),
            });
        }
        self.camera.validate()?;
        Ok(())
    }
}
