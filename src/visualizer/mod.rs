//! Visual effects and the effect registry.
//!
//! Each effect consumes the processed spectrum plus the raw snapshot and
//! writes glyphs into a [`Surface`]. Effects keep their own animation state
//! between frames and reallocate it when the draw area changes size.

mod bars;
mod circle;
mod fire;
mod math;
mod peak;
mod spectrum;
mod wave;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use bars::Bars;
pub use circle::Circle;
pub use fire::Fire;
pub use math::{box_blur_in_place, lerp, resample};
pub use peak::{DecayingPeak, FallingPeak};
pub use spectrum::SpectrumCurve;
pub use wave::Wave;

use crate::colors::ColorScheme;
use crate::error::Error;
use crate::params::VisualConfig;
use crate::render::Surface;

/// Fewest bands ever requested from the processor
pub const MIN_BANDS: usize = 16;
/// Bands requested for the circle effect
pub const CIRCLE_BANDS: usize = 128;

/// Everything an effect reads for one frame
pub struct Frame<'a> {
    /// Band energies in [0, 1]
    pub spectrum: &'a [f32],
    /// Raw mono snapshot the spectrum was computed from
    pub samples: &'a [f32],
    /// Surface width in cells
    pub width: usize,
    /// Surface height in cells, status row included
    pub height: usize,
    pub scheme: &'a ColorScheme,
    pub config: &'a VisualConfig,
}

impl Frame<'_> {
    /// Rows available to the effect
    pub fn draw_height(&self) -> usize {
        self.config.draw_height(self.height)
    }
}

/// A visual effect with private per-frame state
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Draw one frame; undersized areas are skipped silently
    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, rng: &mut dyn RngCore);
}

/// Effect identifiers in cycling order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bars,
    Wave,
    Spectrum,
    Circle,
    Fire,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Bars,
        Style::Wave,
        Style::Spectrum,
        Style::Circle,
        Style::Fire,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Style::Bars => "bars",
            Style::Wave => "wave",
            Style::Spectrum => "spectrum",
            Style::Circle => "circle",
            Style::Fire => "fire",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Style::Bars => "Classic frequency bars",
            Style::Wave => "Oscilloscope waveform",
            Style::Spectrum => "Smooth spectrum curve",
            Style::Circle => "Radial visualizer",
            Style::Fire => "Flame effect",
        }
    }

    pub fn next(self) -> Style {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownStyle(s.to_string()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The selected effect; each variant owns independent state
pub enum Visualizer {
    Bars(Bars),
    Wave(Wave),
    Spectrum(SpectrumCurve),
    Circle(Circle),
    Fire(Fire),
}

impl Visualizer {
    /// Fresh effect with empty state
    pub fn new(style: Style) -> Self {
        debug!(style = style.name(), "creating visualizer");
        match style {
            Style::Bars => Visualizer::Bars(Bars::default()),
            Style::Wave => Visualizer::Wave(Wave::default()),
            Style::Spectrum => Visualizer::Spectrum(SpectrumCurve::default()),
            Style::Circle => Visualizer::Circle(Circle::default()),
            Style::Fire => Visualizer::Fire(Fire::default()),
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Visualizer::Bars(_) => Style::Bars,
            Visualizer::Wave(_) => Style::Wave,
            Visualizer::Spectrum(_) => Style::Spectrum,
            Visualizer::Circle(_) => Style::Circle,
            Visualizer::Fire(_) => Style::Fire,
        }
    }

    /// Next effect in cycling order, with fresh state
    pub fn next(&self) -> Self {
        Self::new(self.style().next())
    }

    /// Bands to request from the processor for a surface `width` cells wide
    pub fn band_count(&self, width: usize, config: &VisualConfig) -> usize {
        let count = match self.style() {
            Style::Bars => Bars::bar_count(width, config),
            Style::Circle => CIRCLE_BANDS,
            _ => width,
        };
        count.max(MIN_BANDS)
    }

    fn effect_mut(&mut self) -> &mut dyn Effect {
        match self {
            Visualizer::Bars(v) => v,
            Visualizer::Wave(v) => v,
            Visualizer::Spectrum(v) => v,
            Visualizer::Circle(v) => v,
            Visualizer::Fire(v) => v,
        }
    }
}

impl Effect for Visualizer {
    fn name(&self) -> &'static str {
        self.style().name()
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, rng: &mut dyn RngCore) {
        self.effect_mut().draw(frame, surface, rng);
    }
}
