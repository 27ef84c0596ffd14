//! Camera configuration and stream acquisition

use crate::capture::{self, CameraBackend, StreamFormat};
use crate::error::{MediaError, MediaResult};
use bytes::Bytes;
use tracing::info;

/// Video resolution information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraResolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CameraResolution {
    /// Create a resolution from explicit dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 1280x720
    pub const HD: Self = Self::new(1280, 720);
    /// 1920x1080
    pub const FULL_HD: Self = Self::new(1920, 1080);
    /// 640x480
    pub const VGA: Self = Self::new(640, 480);
}

/// Camera acquisition configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Device id or name; `None` selects the default camera
    pub device: Option<String>,
    /// Preferred capture resolution (backends may deliver another)
    pub resolution: CameraResolution,
    /// Preferred capture framerate
    pub framerate: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: None,
            resolution: CameraResolution::VGA,
            framerate: 30,
        }
    }
}

impl CameraConfig {
    /// Validate configuration
    pub fn validate(&self) -> MediaResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid resolution".to_string(),
            });
        }

        if self.framerate == 0 || self.framerate > 120 {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid framerate".to_string(),
            });
        }

        Ok(())
    }
}

/// Camera device information
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Backend-specific identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Device description
    pub description: String,
}

/// List capture devices on the platform's default backend.
pub fn enumerate_devices() -> MediaResult<Vec<CameraDevice>> {
    capture::default_backend().enumerate_devices()
}

/// Live camera feed, exclusively owned for the session lifetime.
///
/// A stream is acquired once and never re-acquired; there is no
/// device-change handling. Dropping the stream releases the device.
pub struct CameraStream {
    backend: Box<dyn CameraBackend>,
    format: StreamFormat,
}

impl CameraStream {
    /// Acquire the platform default camera.
    ///
    /// Denial or absence of a capture device fails with an error from
    /// the device-access family; callers log it and take no further
    /// action.
    pub fn acquire(config: &CameraConfig) -> MediaResult<Self> {
        Self::acquire_with(capture::default_backend(), config)
    }

    /// Acquire through a specific backend (tests, headless hosts).
    pub fn acquire_with(
        mut backend: Box<dyn CameraBackend>,
        config: &CameraConfig,
    ) -> MediaResult<Self> {
        config.validate()?;
        let format = backend.open(config)?;
        info!(
            "camera stream acquired: {}x{} @ {}fps ({})",
            format.width, format.height, format.framerate, format.pixel_format
        );
        Ok(Self { backend, format })
    }

    /// Format of the frames this stream delivers
    pub fn format(&self) -> &StreamFormat {
        &self.format
    }

    /// Block until the next raw frame is available
    pub fn read_frame(&mut self) -> MediaResult<Bytes> {
        self.backend.read_frame()
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.backend.close();
    }
}
