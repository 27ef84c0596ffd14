//! Per-segment encoding via a spawned FFmpeg process
//!
//! Raw camera frames go into FFmpeg's stdin; encoded WebM comes back
//! out of stdout in chunks, which is exactly the shape the segment
//! assembler consumes.

use crate::capture::StreamFormat;
use crate::error::{MediaError, MediaResult};
use bytes::Bytes;
use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;
use tracing::{debug, warn};

/// Encoder for a single segment (the recording-API seam).
///
/// One encoder instance covers exactly one recording interval: frames
/// are written while the interval is open, then `finish` closes the
/// input side and drains the encoded chunks.
pub trait SegmentEncoder: Send {
    /// Feed one raw frame
    fn write_frame(&mut self, frame: &[u8]) -> MediaResult<()>;

    /// Close the input, drain the output, and return the encoded chunks
    fn finish(self: Box<Self>) -> MediaResult<Vec<Bytes>>;
}

/// Factory producing a fresh encoder for each segment.
pub type EncoderFactory =
    dyn Fn(&StreamFormat) -> MediaResult<Box<dyn SegmentEncoder>> + Send + Sync;

/// Check whether the ffmpeg binary is reachable on PATH.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// WebM segment encoder wrapping a spawned FFmpeg process.
pub struct FfmpegEncoder {
    process: Child,
    stdin: Option<ChildStdin>,
    reader: Option<std::thread::JoinHandle<Vec<Bytes>>>,
    frames_written: u64,
}

impl FfmpegEncoder {
    /// Spawn an FFmpeg process encoding raw frames of `format` into
    /// streamed WebM.
    pub fn spawn(format: &StreamFormat) -> MediaResult<Self> {
        let mut process = Command::new("ffmpeg")
            .args([
                "-y",
                "-f",
                "rawvideo",
                "-pixel_format",
                &format.pixel_format,
                "-video_size",
                &format!("{}x{}", format.width, format.height),
                "-framerate",
                &format.framerate.to_string(),
                "-i",
                "-",
                "-c:v",
                "libvpx-vp9",
                "-deadline",
                "realtime",
                "-cpu-used",
                "8",
                "-crf",
                "32",
                "-b:v",
                "0",
                "-f",
                "webm",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::EncoderUnavailable {
                reason: format!("failed to start ffmpeg: {}", e),
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| MediaError::EncoderUnavailable {
                reason: "failed to capture ffmpeg stdin".to_string(),
            })?;

        let mut stdout = process
            .stdout
            .take()
            .ok_or_else(|| MediaError::EncoderUnavailable {
                reason: "failed to capture ffmpeg stdout".to_string(),
            })?;

        // Drain stdout on its own thread so the encoder never stalls on
        // a full pipe while we keep feeding frames.
        let reader = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = [0u8; 32 * 1024];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => chunks.push(Bytes::copy_from_slice(&buf[..n])),
                    Err(e) => {
                        warn!("ffmpeg stdout read error: {}", e);
                        break;
                    }
                }
            }
            chunks
        });

        debug!(
            "ffmpeg encoder started: {}x{} @ {}fps, pixel_format={}",
            format.width, format.height, format.framerate, format.pixel_format
        );

        Ok(Self {
            process,
            stdin: Some(stdin),
            reader: Some(reader),
            frames_written: 0,
        })
    }

    /// Default encoder factory used by the recorder.
    pub fn factory() -> Arc<EncoderFactory> {
        Arc::new(|format: &StreamFormat| {
            Ok(Box::new(FfmpegEncoder::spawn(format)?) as Box<dyn SegmentEncoder>)
        })
    }

    /// Number of frames fed so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl SegmentEncoder for FfmpegEncoder {
    fn write_frame(&mut self, frame: &[u8]) -> MediaResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| MediaError::InvalidState {
                expected: "encoding".to_string(),
                actual: "finished".to_string(),
            })?;

        stdin
            .write_all(frame)
            .map_err(|e| MediaError::EncodingFailed {
                reason: format!("failed to write frame: {}", e),
            })?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> MediaResult<Vec<Bytes>> {
        // Closing stdin signals EOF so ffmpeg flushes and exits
        drop(self.stdin.take());

        let chunks = match self.reader.take() {
            Some(reader) => reader.join().map_err(|_| MediaError::EncodingFailed {
                reason: "encoder output thread panicked".to_string(),
            })?,
            None => Vec::new(),
        };

        let status = self
            .process
            .wait()
            .map_err(|e| MediaError::EncodingFailed {
                reason: format!("failed to wait for ffmpeg: {}", e),
            })?;

        if !status.success() {
            return Err(MediaError::EncodingFailed {
                reason: format!("ffmpeg exited with status {}", status),
            });
        }

        debug!(
            "ffmpeg encoder finished: {} frames in, {} chunks out",
            self.frames_written,
            chunks.len()
        );
        Ok(chunks)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // Only reached when finish() was never called
        if self.reader.is_some() {
            let _ = self.process.kill();
        }
    }
}
