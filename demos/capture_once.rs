//! Record a single segment from the default camera and report its size.
//!
//! Requires a webcam and ffmpeg on PATH.

use emocam::{CameraConfig, CameraStream, SegmentRecorder};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let stream = CameraStream::acquire(&CameraConfig::default())?;
    let mut recorder = SegmentRecorder::new(stream);

    recorder.start_segment()?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    let segment = recorder.stop_segment().await?;

    println!(
        "segment {}: {} bytes over {:?}",
        segment.sequence,
        segment.len(),
        segment.duration
    );

    Ok(())
}
