//! Recorder seam and the microphone implementation.
//!
//! The flow controller never talks to a recorder directly; the driver
//! executes its effects against [`Recorder`], so tests can substitute a
//! scripted implementation for the real microphone.

use crate::{CoreResult, FlowError, audio::AudioCapturer, flow::AnswerAudio};

use std::panic::Location;

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{info, instrument};

/// Source of recorded answer audio: start a take, stop it, get a payload.
pub trait Recorder {
    /// Begin capturing a take for the active question.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device cannot be started.
    fn start(&mut self) -> CoreResult<()>;

    /// Finish the take and encode it as an answer payload.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was captured or encoding fails.
    fn stop(&mut self, question_id: &str) -> CoreResult<AnswerAudio>;
}

/// Records answers from the configured (or default) input device and
/// encodes them as 16-bit PCM WAV.
pub struct MicRecorder {
    capturer: AudioCapturer,
}

impl MicRecorder {
    /// Open the input device named in the audio configuration, or the
    /// host default when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if no input device is available.
    #[track_caller]
    #[instrument]
    pub fn new(preferred_device: Option<&str>) -> CoreResult<Self> {
        let capturer = AudioCapturer::new(preferred_device)?;

        info!("MicRecorder initialized");

        Ok(Self { capturer })
    }
}

impl Recorder for MicRecorder {
    fn start(&mut self) -> CoreResult<()> {
        self.capturer.start()
    }

    fn stop(&mut self, question_id: &str) -> CoreResult<AnswerAudio> {
        let samples = self.capturer.stop()?;

        if samples.is_empty() {
            return Err(FlowError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let bytes = encode_wav(
            &samples,
            self.capturer.sample_rate(),
            self.capturer.channels(),
        )?;

        Ok(AnswerAudio::wav(question_id, bytes))
    }
}

/// Encode interleaved f32 samples as a 16-bit PCM WAV payload.
pub(crate) fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> CoreResult<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());

    let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| FlowError::EncodingError {
        reason: format!("Failed to create WAV writer: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(value)
            .map_err(|e| FlowError::EncodingError {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    writer.finalize().map_err(|e| FlowError::EncodingError {
        reason: format!("Failed to finalize WAV: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(cursor.into_inner())
}
