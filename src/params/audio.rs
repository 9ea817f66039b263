//! Audio analysis configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Audio capture and FFT window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Samples per frame snapshot, also the Hann window length.
    /// The FFT size is the next power of two at or above the snapshot length.
    pub buffer_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            buffer_size: 4096,
        }
    }
}

impl AudioConfig {
    /// Frequency spacing between FFT bins for a transform of `fft_size` points
    pub fn bin_resolution_hz(&self, fft_size: usize) -> f32 {
        self.sample_rate_hz as f32 / fft_size.max(1) as f32
    }

    /// Convert frequency (Hz) to FFT bin index (truncating)
    pub fn hz_to_bin(&self, hz: f32, fft_size: usize) -> usize {
        (hz / self.bin_resolution_hz(fft_size)) as usize
    }

    /// Nyquist frequency (Hz)
    pub fn nyquist_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz == 0 {
            return Err(Error::InvalidConfig("sample rate must be > 0".to_string()));
        }
        if self.buffer_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "buffer size must be at least 2, got {}",
                self.buffer_size
            )));
        }
        Ok(())
    }
}
