//! Live capture from an input device through cpal.

use std::sync::{Arc, Mutex, PoisonError};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, info, warn};

use super::AudioSource;
use crate::error::{Error, Result};

/// Fixed-size ring holding the most recent mono samples
#[derive(Debug, Clone)]
pub struct SampleRing {
    data: Vec<f32>,
    /// Next write position, also the oldest sample
    head: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.data[self.head] = sample;
        self.head = (self.head + 1) % self.data.len();
    }

    /// Interleaved frames of `channels` samples, averaged to mono
    pub fn push_frames(&mut self, interleaved: &[f32], channels: usize) {
        let channels = channels.max(1);
        for frame in interleaved.chunks(channels) {
            self.push(frame.iter().sum::<f32>() / frame.len() as f32);
        }
    }

    /// Contents in chronological order
    pub fn snapshot(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.data.len());
        out.extend_from_slice(&self.data[self.head..]);
        out.extend_from_slice(&self.data[..self.head]);
        out
    }
}

/// Capture stream writing into a shared ring
pub struct LiveCapture {
    ring: Arc<Mutex<SampleRing>>,
    sample_rate: u32,
    stream: Option<Stream>,
}

impl LiveCapture {
    /// Open `device_name`, or else a playback monitor, or else the default input,
    /// and start streaming
    pub fn start(device_name: Option<&str>, buffer_size: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device_name {
            Some(name) => find_input_device(&host, name)?,
            None => default_device(&host)?,
        };

        let supported = device
            .default_input_config()
            .map_err(|e| Error::AudioDevice(format!("failed to get input config: {}", e)))?;
        let format = supported.sample_format();
        let config: StreamConfig = supported.config();

        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            format = ?format,
            "opening input device"
        );

        let ring = Arc::new(Mutex::new(SampleRing::new(buffer_size)));
        let stream = build_stream(&device, &config, format, Arc::clone(&ring))?;
        stream
            .play()
            .map_err(|e| Error::AudioDevice(format!("failed to start input stream: {}", e)))?;

        Ok(Self {
            ring,
            sample_rate: config.sample_rate.0,
            stream: Some(stream),
        })
    }
}

impl AudioSource for LiveCapture {
    fn read(&mut self) -> Vec<f32> {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("failed to pause input stream: {}", e);
            }
            debug!("input stream closed");
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn label(&self) -> &'static str {
        "LIVE"
    }
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        self.close();
    }
}

/// Names of the input devices the default host reports
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| Error::AudioDevice(format!("failed to enumerate devices: {}", e)))?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

fn find_input_device(host: &cpal::Host, name: &str) -> Result<Device> {
    let mut devices = host
        .input_devices()
        .map_err(|e| Error::AudioDevice(format!("failed to enumerate devices: {}", e)))?;
    devices
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
        .ok_or_else(|| Error::AudioDevice(format!("input device '{}' not found", name)))
}

/// Whether an input device name looks like a playback monitor source
fn is_monitor(name: &str) -> bool {
    name.to_lowercase().contains("monitor")
}

/// First monitor input, so playback is visualized rather than the microphone
fn default_device(host: &cpal::Host) -> Result<Device> {
    let monitor = host.input_devices().ok().and_then(|mut devices| {
        devices.find(|d| d.name().map(|n| is_monitor(&n)).unwrap_or(false))
    });
    if let Some(device) = monitor {
        debug!("using monitor source as default input");
        return Ok(device);
    }
    host.default_input_device()
        .ok_or_else(|| Error::AudioDevice("no input device found".to_string()))
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    ring: Arc<Mutex<SampleRing>>,
) -> Result<Stream> {
    let channels = config.channels as usize;
    let err_fn = |e| warn!("audio stream error: {}", e);

    let stream = match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &_| {
                let mut ring = ring.lock().unwrap_or_else(PoisonError::into_inner);
                ring.push_frames(data, channels);
            },
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &_| {
                let converted: Vec<f32> = data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                let mut ring = ring.lock().unwrap_or_else(PoisonError::into_inner);
                ring.push_frames(&converted, channels);
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &_| {
                let converted: Vec<f32> = data
                    .iter()
                    .map(|&s| (s as f32 - 32768.0) / 32768.0)
                    .collect();
                let mut ring = ring.lock().unwrap_or_else(PoisonError::into_inner);
                ring.push_frames(&converted, channels);
            },
            err_fn,
            None,
        ),
        other => {
            return Err(Error::AudioDevice(format!(
                "unsupported sample format {:?}",
                other
            )))
        }
    };

    stream.map_err(|e| Error::AudioDevice(format!("failed to build input stream: {}", e)))
}
