//! Native webcam capture using nokhwa
//!
//! Frames are delivered raw in the camera's native pixel format; the
//! segment encoder handles conversion.

use super::{CameraBackend, StreamFormat};
use crate::camera::{CameraConfig, CameraDevice};
use crate::error::MediaError;
use bytes::Bytes;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{info, warn};

/// Webcam backend built on the nokhwa crate.
pub struct NokhwaBackend {
    camera: Option<Camera>,
}

impl NokhwaBackend {
    /// Create an unopened backend
    pub fn new() -> Self {
        Self { camera: None }
    }

    fn camera_index(config: &CameraConfig) -> CameraIndex {
        match &config.device {
            Some(id) => {
                // Numeric ids select by index, anything else by name
                if let Ok(idx) = id.parse::<u32>() {
                    CameraIndex::Index(idx)
                } else {
                    CameraIndex::String(id.clone())
                }
            }
            None => CameraIndex::Index(0),
        }
    }

    fn device_label(config: &CameraConfig) -> String {
        config.device.clone().unwrap_or_else(|| "default".to_string())
    }
}

impl Default for NokhwaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for NokhwaBackend {
    fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, MediaError> {
        let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| {
            MediaError::DeviceEnumerationFailed {
                reason: e.to_string(),
            }
        })?;

        Ok(cameras
            .into_iter()
            .map(|info| {
                let id = match info.index() {
                    CameraIndex::Index(i) => i.to_string(),
                    CameraIndex::String(s) => s.to_string(),
                };
                CameraDevice {
                    id,
                    name: info.human_name().to_string(),
                    description: info.description().to_string(),
                }
            })
            .collect())
    }

    fn open(&mut self, config: &CameraConfig) -> Result<StreamFormat, MediaError> {
        let index = Self::camera_index(config);
        let device = Self::device_label(config);

        let format =
            RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let mut camera =
            Camera::new(index, format).map_err(|e| MediaError::DeviceAccessDenied {
                device: device.clone(),
                reason: e.to_string(),
            })?;

        camera
            .open_stream()
            .map_err(|e| MediaError::DeviceAccessDenied {
                device: device.clone(),
                reason: e.to_string(),
            })?;

        let camera_format = camera.camera_format();
        let width = camera_format.resolution().width();
        let height = camera_format.resolution().height();
        let framerate = camera_format.frame_rate();
        let frame_format = camera_format.format();

        // Map nokhwa frame formats to FFmpeg pixel format names
        let pixel_format = match frame_format {
            FrameFormat::YUYV => "yuyv422",
            FrameFormat::NV12 => "nv12",
            FrameFormat::RAWRGB => "rgb24",
            FrameFormat::MJPEG => "mjpeg",
            other => {
                warn!("unknown camera format {:?}, assuming yuyv422", other);
                "yuyv422"
            }
        };

        info!(
            "camera '{}' opened: {}x{} @ {}fps, format={:?}",
            device, width, height, framerate, frame_format
        );

        self.camera = Some(camera);
        Ok(StreamFormat {
            width,
            height,
            framerate,
            pixel_format: pixel_format.to_string(),
        })
    }

    fn read_frame(&mut self) -> Result<Bytes, MediaError> {
        let camera = self.camera.as_mut().ok_or(MediaError::CaptureNotActive)?;
        let frame = camera.frame().map_err(|e| MediaError::CaptureFailed {
            reason: e.to_string(),
        })?;
        Ok(Bytes::copy_from_slice(frame.buffer()))
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("error stopping camera stream: {:?}", e);
            }
        }
    }
}
