//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::audio::SourceRequest;
use crate::colors::{ColorScheme, SCHEMES};
use crate::error::Result;
use crate::params::Config;
use crate::visualizer::Style;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "audiovis")]
#[command(about = "Terminal audio spectrum visualizer", long_about = None)]
pub struct Args {
    /// Config file (TOML); defaults to the platform config directory
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Visualization style: bars, wave, spectrum, circle, fire
    #[arg(long, value_name = "STYLE")]
    pub style: Option<Style>,

    /// Color scheme name (see --list)
    #[arg(long, value_name = "SCHEME")]
    pub colors: Option<String>,

    /// Output gain applied after normalization
    #[arg(long, value_name = "GAIN")]
    pub sensitivity: Option<f32>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Use the built-in synthetic signal instead of a capture device
    #[arg(long)]
    pub demo: bool,

    /// Play a WAV file in a loop instead of capturing
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Input device name (see --list); defaults to a playback monitor source
    /// when one exists, otherwise the system default input
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Seed for the random effects and the synthetic signal
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// List styles, color schemes and input devices, then exit
    #[arg(long)]
    pub list: bool,

    /// Print the effective configuration as TOML, then exit
    #[arg(long)]
    pub print_config: bool,

    /// Log file; defaults to the platform cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(name) = &self.colors {
            config.color_scheme = ColorScheme::by_name(name)?.name().to_string();
        }
        if let Some(sensitivity) = self.sensitivity {
            config.visual.sensitivity = sensitivity;
        }
        if let Some(fps) = self.fps {
            config.visual.fps = fps;
        }
        config.validate()
    }

    /// Audio source chosen by the flags: a WAV file, then demo, then live
    pub fn source_request(&self) -> SourceRequest<'_> {
        if let Some(path) = &self.wav {
            SourceRequest::Wav(path)
        } else if self.demo {
            SourceRequest::Demo
        } else {
            SourceRequest::Live {
                device: self.device.as_deref(),
            }
        }
    }
}

/// Catalog printed by `--list`
pub fn catalog(devices: &[String]) -> String {
    let mut out = String::from("Styles:\n");
    for style in Style::ALL {
        out.push_str(&format!("  {:<10} {}\n", style.name(), style.description()));
    }
    out.push_str("\nColor schemes:\n");
    for scheme in SCHEMES {
        out.push_str(&format!("  {}\n", scheme.name()));
    }
    out.push_str("\nInput devices:\n");
    if devices.is_empty() {
        out.push_str("  (none found)\n");
    }
    for device in devices {
        out.push_str(&format!("  {}\n", device));
    }
    out
}
