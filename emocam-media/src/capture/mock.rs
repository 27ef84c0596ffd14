//! Mock camera backend for tests and unsupported platforms

use super::{CameraBackend, StreamFormat};
use crate::camera::{CameraConfig, CameraDevice};
use crate::error::MediaError;
use bytes::Bytes;
use std::time::Duration;

/// Synthetic camera delivering deterministic RGB frames at the
/// configured rate. Frame N is filled with the byte value N, so tests
/// can assert on content.
pub struct MockBackend {
    format: StreamFormat,
    frame_counter: u64,
    open: bool,
}

impl MockBackend {
    /// Create a mock camera with a small default format
    pub fn new() -> Self {
        Self::with_format(StreamFormat {
            width: 64,
            height: 48,
            framerate: 30,
            pixel_format: "rgb24".to_string(),
        })
    }

    /// Create a mock camera delivering frames of the given format
    pub fn with_format(format: StreamFormat) -> Self {
        Self {
            format,
            frame_counter: 0,
            open: false,
        }
    }

    fn frame_len(&self) -> usize {
        // rgb24: 3 bytes per pixel
        (self.format.width * self.format.height * 3) as usize
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for MockBackend {
    fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, MediaError> {
        Ok(vec![CameraDevice {
            id: "mock_camera_0".to_string(),
            name: "Mock Camera".to_string(),
            description: "Virtual camera for testing".to_string(),
        }])
    }

    fn open(&mut self, _config: &CameraConfig) -> Result<StreamFormat, MediaError> {
        self.open = true;
        self.frame_counter = 0;
        Ok(self.format.clone())
    }

    fn read_frame(&mut self) -> Result<Bytes, MediaError> {
        if !self.open {
            return Err(MediaError::CaptureNotActive);
        }

        // Pace delivery like a real device would
        std::thread::sleep(Duration::from_millis(
            1000 / u64::from(self.format.framerate.max(1)),
        ));

        let fill = (self.frame_counter & 0xff) as u8;
        self.frame_counter += 1;
        Ok(Bytes::from(vec![fill; self.frame_len()]))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_frames_are_deterministic() {
        let mut backend = MockBackend::with_format(StreamFormat {
            width: 2,
            height: 2,
            framerate: 1000,
            pixel_format: "rgb24".to_string(),
        });
        backend.open(&CameraConfig::default()).unwrap();

        let first = backend.read_frame().unwrap();
        let second = backend.read_frame().unwrap();

        assert_eq!(first.len(), 12);
        assert!(first.iter().all(|b| *b == 0));
        assert!(second.iter().all(|b| *b == 1));
    }

    #[test]
    fn test_read_before_open_fails() {
        let mut backend = MockBackend::new();
        assert!(matches!(
            backend.read_frame(),
            Err(MediaError::CaptureNotActive)
        ));
    }
}
