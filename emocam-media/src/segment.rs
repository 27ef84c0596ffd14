//! Segment data model and chunk accumulation

use bytes::{Bytes, BytesMut};
use std::time::Duration;

/// Content type every finalized segment is tagged with. The prediction
/// endpoint only accepts WebM, so this is fixed rather than negotiated.
pub const SEGMENT_CONTENT_TYPE: &str = "video/webm";

/// File name attached to the multipart upload part.
pub const SEGMENT_FILE_NAME: &str = "video.webm";

/// One finalized recording interval, ready for upload.
///
/// Segments are immutable once finalized; ownership transfers to the
/// upload dispatcher for the duration of one request and the segment is
/// dropped afterwards.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Monotonically increasing segment number within a session
    pub sequence: u64,
    /// Encoded segment bytes
    pub data: Bytes,
    /// Wall-clock duration of the recording interval
    pub duration: Duration,
}

impl Segment {
    /// Create a segment from already-encoded bytes.
    pub fn new(sequence: u64, data: impl Into<Bytes>, duration: Duration) -> Self {
        Self {
            sequence,
            data: data.into(),
            duration,
        }
    }

    /// Segment length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the segment carries no encoded data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Declared media type of the segment
    pub fn content_type(&self) -> &'static str {
        SEGMENT_CONTENT_TYPE
    }

    /// File name used when the segment is uploaded
    pub fn file_name(&self) -> &'static str {
        SEGMENT_FILE_NAME
    }
}

/// Accumulates encoded chunks for the segment currently being recorded.
///
/// At most one assembler is live at a time; the recorder's state machine
/// enforces that a new segment cannot begin accumulating before the
/// previous one was finalized.
#[derive(Debug, Default)]
pub struct SegmentAssembler {
    chunks: Vec<Bytes>,
    total_len: usize,
}

impl SegmentAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one encoded chunk. Zero-byte chunks are discarded before
    /// accumulation; returns whether the chunk was kept.
    pub fn push(&mut self, chunk: Bytes) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_len += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Number of accumulated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total accumulated length in bytes
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Whether nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Consume the assembler and produce the immutable segment.
    pub fn finalize(self, sequence: u64, duration: Duration) -> Segment {
        let data = match self.chunks.len() {
            0 => Bytes::new(),
            1 => self.chunks.into_iter().next().unwrap_or_default(),
            _ => {
                let mut buf = BytesMut::with_capacity(self.total_len);
                for chunk in &self.chunks {
                    buf.extend_from_slice(chunk);
                }
                buf.freeze()
            }
        };

        Segment {
            sequence,
            data,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembler_discards_empty_chunks() {
        let mut assembler = SegmentAssembler::new();

        assert!(assembler.push(Bytes::from_static(b"abc")));
        assert!(!assembler.push(Bytes::new()));
        assert!(assembler.push(Bytes::from_static(b"def")));

        assert_eq!(assembler.chunk_count(), 2);
        assert_eq!(assembler.total_len(), 6);
    }

    #[test]
    fn test_finalize_concatenates_in_order() {
        let mut assembler = SegmentAssembler::new();
        assembler.push(Bytes::from_static(b"abc"));
        assembler.push(Bytes::from_static(b"def"));

        let segment = assembler.finalize(7, Duration::from_secs(5));
        assert_eq!(segment.sequence, 7);
        assert_eq!(&segment.data[..], b"abcdef");
        assert_eq!(segment.duration, Duration::from_secs(5));
    }

    #[test]
    fn test_finalize_empty_assembler() {
        let assembler = SegmentAssembler::new();
        let segment = assembler.finalize(0, Duration::from_secs(5));
        assert!(segment.is_empty());
        assert_eq!(segment.len(), 0);
    }

    #[test]
    fn test_segment_upload_metadata() {
        let mut assembler = SegmentAssembler::new();
        assembler.push(Bytes::from_static(b"x"));
        let segment = assembler.finalize(0, Duration::from_secs(5));

        assert_eq!(segment.content_type(), "video/webm");
        assert_eq!(segment.file_name(), "video.webm");
    }
}
