use crate::{CoreResult, FlowError};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Maximum samples to buffer (3 minutes of interleaved stereo at 48kHz).
/// Prevents unbounded memory growth if a stop event is delayed.
///
/// Question time limits top out around 90 seconds; three minutes leaves
/// slack for the stop round-trip without ever holding more than ~66MB.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 2 * 60 * 3;

pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after the lock
    /// is acquired in `stop()`.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    /// Open `preferred_device` by name, falling back to the host default
    /// input device when it is `None` or not present.
    #[track_caller]
    #[instrument]
    pub fn new(preferred_device: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = Self::select_device(&host, preferred_device)?;

        let config = device
            .default_input_config()
            .map_err(|e| FlowError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES))),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    #[track_caller]
    fn select_device(host: &cpal::Host, preferred: Option<&str>) -> CoreResult<Device> {
        if let Some(name) = preferred {
            let devices = host.input_devices().map_err(|e| FlowError::DeviceError {
                reason: format!("Failed to enumerate input devices: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            for device in devices {
                if device.name().is_ok_and(|n| n == name) {
                    return Ok(device);
                }
            }

            warn!(device = name, "Configured input device not found, using default");
        }

        host.default_input_device()
            .ok_or(FlowError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);

        // Reset shutdown flag for the new take
        self.shutdown.store(false, Ordering::Release);

        // Clear the previous question's samples
        samples
            .lock()
            .map_err(|e| FlowError::DeviceError {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check shutdown flag before acquiring the lock: once
                    // stop() sets it, no new samples are written even if
                    // CPAL fires one more callback before the stream drops.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping
                    // audio. A poisoned mutex means a previous holder
                    // panicked, but the VecDeque data is still valid.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    // Ring buffer: O(1) amortized drop of oldest samples
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| FlowError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| FlowError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Vec<f32>> {
        // Signal the callback to stop writing BEFORE dropping the stream,
        // so a callback in flight on another thread observes the flag and
        // returns before we collect the samples below.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag and completes. On most CPAL backends, drop() is
            // synchronous and joins the audio thread; the sleep covers
            // backends where it returns before the final callback.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| FlowError::DeviceError {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .iter()
            .copied()
            .collect();

        debug!(sample_count = samples.len(), "Captured answer samples");

        Ok(samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}
