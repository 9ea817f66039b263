//! Audio sources feeding the analyzer.
//!
//! A source hands out the most recent mono snapshot on every `read`; live
//! capture fills its ring from the device callback thread, the synthetic
//! and file sources generate on demand.

mod capture;
mod demo;
mod wav;

use std::path::Path;

use tracing::{info, warn};

pub use capture::{list_input_devices, LiveCapture, SampleRing};
pub use demo::DemoAudio;
pub use wav::WavSource;

use crate::error::Result;
use crate::params::AudioConfig;

/// A provider of mono sample snapshots
pub trait AudioSource {
    /// Latest snapshot; may repeat the previous one when nothing new arrived
    fn read(&mut self) -> Vec<f32>;

    /// Stop producing samples and release the device
    fn close(&mut self);

    /// Rate of the samples `read` returns, in Hz
    fn sample_rate(&self) -> u32;

    /// Short tag for the status bar
    fn label(&self) -> &'static str;
}

/// Which source the user asked for
#[derive(Debug, Clone, Copy)]
pub enum SourceRequest<'a> {
    Wav(&'a Path),
    Demo,
    Live { device: Option<&'a str> },
}

/// Result of opening a source
pub struct OpenedSource {
    pub source: Box<dyn AudioSource>,
    /// Set when live capture failed and the synthetic generator took over
    pub fallback: Option<String>,
}

impl OpenedSource {
    pub fn is_demo(&self) -> bool {
        self.source.label() == DemoAudio::LABEL
    }
}

/// Open the requested source.
///
/// A WAV file that cannot be decoded is an error; live capture failures
/// fall back to the synthetic generator.
pub fn open_source(
    request: SourceRequest<'_>,
    audio: &AudioConfig,
    fps: u32,
    seed: u64,
) -> Result<OpenedSource> {
    let source: Box<dyn AudioSource> = match request {
        SourceRequest::Wav(path) => Box::new(WavSource::open(path, audio.buffer_size, fps)?),
        SourceRequest::Demo => Box::new(DemoAudio::new(audio, seed)),
        SourceRequest::Live { device } => match LiveCapture::start(device, audio.buffer_size) {
            Ok(capture) => Box::new(capture),
            Err(e) => {
                warn!("live capture unavailable, using demo mode: {}", e);
                return Ok(OpenedSource {
                    source: Box::new(DemoAudio::new(audio, seed)),
                    fallback: Some(format!("No audio capture ({}), demo mode", e)),
                });
            }
        },
    };

    info!(
        source = source.label(),
        sample_rate = source.sample_rate(),
        "audio source ready"
    );
    Ok(OpenedSource {
        source,
        fallback: None,
    })
}
