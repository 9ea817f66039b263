//! Looping playback of a WAV file as an analyzer feed.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::info;

use super::AudioSource;
use crate::error::{Error, Result};

pub struct WavSource {
    /// Whole file, downmixed to mono
    samples: Vec<f32>,
    sample_rate: u32,
    window: usize,
    /// Samples to advance per read
    step: usize,
    cursor: usize,
}

impl WavSource {
    /// Decode `path`; each read advances by one frame's worth of audio at `fps`
    pub fn open(path: &Path, window: usize, fps: u32) -> Result<Self> {
        let wav_err = |source: hound::Error| Error::Wav {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = WavReader::open(path).map_err(wav_err)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(wav_err)?,
            SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(wav_err)?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
        if samples.is_empty() {
            return Err(wav_err(hound::Error::FormatError("file contains no samples")));
        }

        info!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels,
            frames = samples.len(),
            "loaded WAV file"
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
            window: window.max(1),
            step: (spec.sample_rate / fps.max(1)).max(1) as usize,
            cursor: 0,
        })
    }
}

impl AudioSource for WavSource {
    fn read(&mut self) -> Vec<f32> {
        let len = self.samples.len();
        let out = (0..self.window)
            .map(|i| self.samples[(self.cursor + i) % len])
            .collect();
        self.cursor = (self.cursor + self.step) % len;
        out
    }

    fn close(&mut self) {}

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn label(&self) -> &'static str {
        "WAV"
    }
}
