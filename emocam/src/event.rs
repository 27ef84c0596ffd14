//! Session event stream

/// Events emitted over a capture session's lifetime
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Camera acquired and the first segment started recording
    CaptureStarted {
        /// Description of the acquired stream
        stream: String,
    },
    /// A segment was finalized and handed to the upload dispatcher
    SegmentRecorded {
        /// Segment number
        sequence: u64,
        /// Segment length in bytes
        len: usize,
    },
    /// A finalized segment carried no data and was not uploaded
    SegmentSkipped {
        /// Segment number
        sequence: u64,
    },
    /// A prediction response was applied to the display
    PredictionApplied {
        /// Segment number
        sequence: u64,
        /// Predicted emotion label
        emotion: String,
    },
    /// A prediction response was discarded by the ordering policy
    PredictionDiscarded {
        /// Segment number of the late response
        sequence: u64,
        /// Sequence currently backing the display
        last_applied: u64,
    },
    /// An upload failed; it was logged and not retried
    UploadFailed {
        /// Segment number
        sequence: u64,
        /// Failure description
        reason: String,
    },
    /// The segmenting loop cannot continue (camera or encoder gone)
    CaptureStalled {
        /// Failure description
        reason: String,
    },
    /// The session was stopped
    SessionClosed,
}

impl SessionEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::CaptureStarted { .. } => "capture_started",
            SessionEvent::SegmentRecorded { .. } => "segment_recorded",
            SessionEvent::SegmentSkipped { .. } => "segment_skipped",
            SessionEvent::PredictionApplied { .. } => "prediction_applied",
            SessionEvent::PredictionDiscarded { .. } => "prediction_discarded",
            SessionEvent::UploadFailed { .. } => "upload_failed",
            SessionEvent::CaptureStalled { .. } => "capture_stalled",
            SessionEvent::SessionClosed => "session_closed",
        }
    }

    /// Check if this is a capture-side event
    pub fn is_capture_event(&self) -> bool {
        matches!(
            self,
            SessionEvent::CaptureStarted { .. }
                | SessionEvent::SegmentRecorded { .. }
                | SessionEvent::SegmentSkipped { .. }
                | SessionEvent::CaptureStalled { .. }
        )
    }

    /// Check if this is an upload-side event
    pub fn is_upload_event(&self) -> bool {
        matches!(
            self,
            SessionEvent::PredictionApplied { .. }
                | SessionEvent::PredictionDiscarded { .. }
                | SessionEvent::UploadFailed { .. }
        )
    }

    /// Check if this event reports a failure
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            SessionEvent::UploadFailed { .. } | SessionEvent::CaptureStalled { .. }
        )
    }
}
