//! Classic vertical bars with eighth-cell resolution.

use rand::RngCore;

use super::{resample, Effect, FallingPeak, Frame};
use crate::params::VisualConfig;
use crate::render::{Style, Surface};

/// Partial block glyphs indexed by eighths filled
const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const PEAK_GLYPH: char = '▔';
const MIRROR_DIM: f32 = 0.3;
const PEAK_BOOST: f32 = 1.5;
/// Peaks at or below this height are hidden
const PEAK_VISIBLE: f32 = 0.01;

#[derive(Default)]
pub struct Bars {
    peaks: Vec<FallingPeak>,
}

impl Bars {
    /// Bars that fit into `width` cells, at least one
    pub fn bar_count(width: usize, config: &VisualConfig) -> usize {
        ((width + config.bar_gap) / (config.bar_width + config.bar_gap).max(1)).max(1)
    }
}

impl Effect for Bars {
    fn name(&self) -> &'static str {
        "bars"
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, _rng: &mut dyn RngCore) {
        let config = frame.config;
        let draw_h = frame.draw_height();
        if draw_h == 0 || frame.width == 0 {
            return;
        }

        let vis_h = if config.mirror { draw_h / 2 } else { draw_h }.max(1);
        let bottom = if config.mirror {
            draw_h / 2 + vis_h / 2
        } else {
            draw_h - 1
        };

        let count = Self::bar_count(frame.width, config);
        let data = resample(frame.spectrum, count);
        if self.peaks.len() != count {
            self.peaks = vec![FallingPeak::default(); count];
        }

        for (i, (&raw, peak)) in data.iter().zip(self.peaks.iter_mut()).enumerate() {
            let value = raw.clamp(0.0, 1.0);
            let peak = peak.update(value, config.peak_fall_speed);

            let eighths = (value * vis_h as f32 * 8.0) as usize;
            let full = eighths / 8;
            let remainder = eighths % 8;
            let x0 = i * (config.bar_width + config.bar_gap);

            for x in (x0..x0 + config.bar_width).take_while(|&x| x < frame.width) {
                for cy in 0..full.min(vis_h) {
                    let color = frame.scheme.at(cy as f32 / vis_h as f32);
                    surface.set_content(x, bottom - cy, BLOCKS[8], Style::fg(color));
                }
                if remainder > 0 && full < vis_h {
                    let color = frame.scheme.at(full as f32 / vis_h as f32);
                    surface.set_content(x, bottom - full, BLOCKS[remainder], Style::fg(color));
                }

                if config.mirror {
                    for cy in 0..full.min(vis_h) {
                        let y = bottom + 1 + cy;
                        if y >= draw_h {
                            break;
                        }
                        let color = frame.scheme.at(cy as f32 / vis_h as f32).scale(MIRROR_DIM);
                        surface.set_content(x, y, BLOCKS[8], Style::fg(color));
                    }
                    let y = bottom + 1 + full;
                    if remainder > 0 && full < vis_h && y < draw_h {
                        let color = frame
                            .scheme
                            .at(full as f32 / vis_h as f32)
                            .scale(MIRROR_DIM);
                        surface.set_content(x, y, BLOCKS[8 - remainder], Style::fg(color));
                    }
                }

                if config.show_peaks && peak > PEAK_VISIBLE {
                    let rise = (peak * vis_h as f32) as usize;
                    if let Some(y) = bottom.checked_sub(rise).filter(|&y| y < draw_h) {
                        let color = frame.scheme.at(peak).scale(PEAK_BOOST);
                        surface.set_content(x, y, PEAK_GLYPH, Style::fg(color));
                    }
                }
            }
        }
    }
}
