//! Lifecycle tests for the segment recorder
//!
//! These run against the mock camera backend and a scripted encoder,
//! so no camera hardware or ffmpeg binary is needed.

use bytes::Bytes;
use emocam_media::capture::mock::MockBackend;
use emocam_media::{
    CameraConfig, CameraStream, EncoderFactory, MediaError, RecorderState, SegmentEncoder,
    SegmentRecorder,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct ScriptedEncoder {
    chunks: Vec<Bytes>,
    frames_seen: Arc<AtomicUsize>,
}

impl SegmentEncoder for ScriptedEncoder {
    fn write_frame(&mut self, _frame: &[u8]) -> Result<(), MediaError> {
        self.frames_seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<Bytes>, MediaError> {
        Ok(self.chunks)
    }
}

fn scripted_factory(
    chunks: Vec<&'static [u8]>,
    frames_seen: Arc<AtomicUsize>,
) -> Arc<EncoderFactory> {
    let chunks: Vec<Bytes> = chunks.into_iter().map(Bytes::from_static).collect();
    Arc::new(move |_format| {
        Ok(Box::new(ScriptedEncoder {
            chunks: chunks.clone(),
            frames_seen: frames_seen.clone(),
        }) as Box<dyn SegmentEncoder>)
    })
}

fn mock_recorder(chunks: Vec<&'static [u8]>) -> (SegmentRecorder, Arc<AtomicUsize>) {
    let frames_seen = Arc::new(AtomicUsize::new(0));
    let stream =
        CameraStream::acquire_with(Box::new(MockBackend::new()), &CameraConfig::default())
            .expect("mock acquisition cannot fail");
    let recorder =
        SegmentRecorder::with_encoder_factory(stream, scripted_factory(chunks, frames_seen.clone()));
    (recorder, frames_seen)
}

#[tokio::test]
async fn test_start_stop_produces_segment() {
    let (mut recorder, frames_seen) = mock_recorder(vec![b"abc", b"", b"def"]);

    recorder.start_segment().unwrap();
    assert_eq!(recorder.state(), RecorderState::Recording);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let segment = recorder.stop_segment().await.unwrap();

    // The empty chunk is discarded before accumulation
    assert_eq!(&segment.data[..], b"abcdef");
    assert_eq!(segment.sequence, 0);
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(frames_seen.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn test_second_start_rejected_while_recording() {
    let (mut recorder, _) = mock_recorder(vec![b"x"]);

    recorder.start_segment().unwrap();
    let result = recorder.start_segment();

    assert!(matches!(result, Err(MediaError::InvalidState { .. })));
    // The open segment is unaffected
    assert_eq!(recorder.state(), RecorderState::Recording);
}

#[tokio::test]
async fn test_stop_without_start_fails() {
    let (mut recorder, _) = mock_recorder(vec![b"x"]);

    let result = recorder.stop_segment().await;
    assert!(matches!(result, Err(MediaError::CaptureNotActive)));
}

#[tokio::test]
async fn test_sequence_increments_across_segments() {
    let (mut recorder, _) = mock_recorder(vec![b"x"]);

    recorder.start_segment().unwrap();
    let first = recorder.stop_segment().await.unwrap();

    recorder.start_segment().unwrap();
    let second = recorder.stop_segment().await.unwrap();

    assert_eq!(first.sequence, 0);
    assert_eq!(second.sequence, 1);
}

#[tokio::test]
async fn test_segment_duration_covers_the_interval() {
    let (mut recorder, _) = mock_recorder(vec![b"x"]);

    recorder.start_segment().unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    let segment = recorder.stop_segment().await.unwrap();

    assert!(segment.duration >= Duration::from_millis(120));
}

#[tokio::test]
async fn test_encoder_with_no_output_yields_empty_segment() {
    let (mut recorder, _) = mock_recorder(vec![]);

    recorder.start_segment().unwrap();
    let segment = recorder.stop_segment().await.unwrap();

    assert!(segment.is_empty());
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let (mut recorder, _) = mock_recorder(vec![b"x"]);

    recorder.start_segment().unwrap();
    recorder.shutdown();
    recorder.shutdown();

    assert_eq!(recorder.state(), RecorderState::Idle);
}
