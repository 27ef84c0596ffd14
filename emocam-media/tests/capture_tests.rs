//! Tests for camera configuration, device management, and stream
//! acquisition

use emocam_media::capture::mock::MockBackend;
use emocam_media::{CameraBackend, CameraConfig, CameraResolution, CameraStream, StreamFormat};

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

#[tokio::test]
async fn test_camera_config_default() {
    let config = CameraConfig::default();

    assert!(config.device.is_none());
    assert_eq!(config.resolution.width, 640);
    assert_eq!(config.resolution.height, 480);
    assert_eq!(config.framerate, 30);
}

#[tokio::test]
async fn test_camera_config_custom() {
    let config = CameraConfig {
        device: Some("1".to_string()),
        resolution: CameraResolution::FULL_HD,
        framerate: 60,
    };

    assert_eq!(config.device.as_deref(), Some("1"));
    assert_eq!(config.resolution.width, 1920);
    assert_eq!(config.resolution.height, 1080);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_resolution_presets() {
    assert_eq!(CameraResolution::VGA, CameraResolution::new(640, 480));
    assert_eq!(CameraResolution::HD, CameraResolution::new(1280, 720));
    assert_eq!(CameraResolution::FULL_HD, CameraResolution::new(1920, 1080));
}

// ============================================================================
// DEVICE ENUMERATION TESTS
// ============================================================================

#[tokio::test]
async fn test_mock_backend_enumerates_one_device() {
    let backend = MockBackend::new();
    let devices = backend.enumerate_devices().unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "Mock Camera");
}

// ============================================================================
// ACQUISITION TESTS
// ============================================================================

#[tokio::test]
async fn test_acquire_reports_stream_format() {
    let format = StreamFormat {
        width: 320,
        height: 240,
        framerate: 15,
        pixel_format: "rgb24".to_string(),
    };
    let backend = MockBackend::with_format(format.clone());

    let stream = CameraStream::acquire_with(Box::new(backend), &CameraConfig::default()).unwrap();
    assert_eq!(*stream.format(), format);
}

#[tokio::test]
async fn test_acquire_validates_config_first() {
    let config = CameraConfig {
        framerate: 0,
        ..Default::default()
    };
    let result = CameraStream::acquire_with(Box::new(MockBackend::new()), &config);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_acquired_stream_delivers_frames() {
    let mut stream =
        CameraStream::acquire_with(Box::new(MockBackend::new()), &CameraConfig::default())
            .unwrap();

    let frame = stream.read_frame().unwrap();
    assert_eq!(frame.len(), 64 * 48 * 3);
}
