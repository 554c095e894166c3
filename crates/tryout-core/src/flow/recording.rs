use std::{fmt, sync::Arc, time::Instant};

/// An immutable recorded answer payload.
///
/// Bytes are shared behind an `Arc` so the payload can sit in the
/// controller's state and ride along in an upload request at the same
/// time without copying the audio.
#[derive(Clone, PartialEq, Eq)]
pub struct AnswerAudio {
    data: Arc<[u8]>,
    mime_type: String,
    file_name: String,
}

impl AnswerAudio {
    /// Wrap encoded audio bytes with an explicit mime type and file name.
    pub fn new(data: Vec<u8>, mime_type: String, file_name: String) -> Self {
        Self {
            data: data.into(),
            mime_type,
            file_name,
        }
    }

    /// A WAV payload named after the question it answers.
    pub fn wav(question_id: &str, data: Vec<u8>) -> Self {
        Self::new(
            data,
            "audio/wav".to_string(),
            format!("answer_{question_id}.wav"),
        )
    }

    /// The encoded audio bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload carries no audio at all.
    ///
    /// An empty payload fails the upload precondition locally, before any
    /// network request is made.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mime type of the encoded audio.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Upload file name, e.g. `answer_q3.wav`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Debug for AnswerAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerAudio")
            .field("bytes", &self.data.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Recording lifecycle for the active question.
///
/// Transitions: idle to recording on start, recording to recorded on stop,
/// recorded back to idle when the session advances.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingState {
    /// No take exists for the active question.
    Idle,
    /// The microphone is live.
    Recording {
        /// When recording started.
        started_at: Instant,
    },
    /// A finished take is parked, waiting for upload.
    Recorded {
        /// The recorded answer payload.
        audio: AnswerAudio,
    },
}

impl RecordingState {
    /// Whether the microphone is currently live.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }

    /// The parked answer payload, if a take has finished.
    pub fn recorded_audio(&self) -> Option<&AnswerAudio> {
        match self {
            RecordingState::Recorded { audio } => Some(audio),
            _ => None,
        }
    }
}
