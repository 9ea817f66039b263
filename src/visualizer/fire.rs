//! Flame effect: a heat grid seeded by the spectrum along the bottom rows
//! and propagated upward with random cooling.

use rand::{Rng, RngCore};

use super::{resample, Effect, Frame};
use crate::colors::{ColorScheme, Rgb};
use crate::render::{Style, Surface};

const DECAY_MIN: f32 = 0.85;
const DECAY_SPREAD: f32 = 0.07;
const JITTER_CHANCE: f32 = 0.1;
const JITTER: f32 = 0.05;
/// Cells cooler than this are not drawn
const VISIBLE_HEAT: f32 = 0.02;
/// Below this, colors fade toward black
const DIM_HEAT: f32 = 0.15;

const TIPS: [char; 5] = ['·', '∗', '᛫', '⁘', '⁖'];
const EMBERS: [char; 5] = ['·', '∘', '°', '•', '*'];
const EMBER_TRIES: usize = 10;
/// Heat that counts as flame when measuring column height
const FLAME_HEAT: f32 = 0.3;
const MIN_FLAME_FOR_EMBERS: usize = 3;

/// Row-major heat values, `width × height`
#[derive(Debug, Default)]
struct HeatGrid {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl HeatGrid {
    /// Zeroed grid; a no-op when the size is unchanged
    fn ensure_size(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height || self.cells.is_empty() {
            self.width = width;
            self.height = height;
            self.cells = vec![0.0; width * height];
        }
    }

    fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.width + x]
    }

    fn set(&mut self, x: usize, y: usize, heat: f32) {
        self.cells[y * self.width + x] = heat;
    }

    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        &mut self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Rows from the top of column `x` down to the first hot cell
    fn flame_height(&self, x: usize) -> usize {
        (0..self.height)
            .find(|&y| self.get(x, y) > FLAME_HEAT)
            .map_or(0, |y| self.height - y)
    }
}

#[derive(Default)]
pub struct Fire {
    heat: HeatGrid,
}

impl Fire {
    /// Heat the three bottom rows from the spectrum
    fn seed(&mut self, spectrum: &[f32], sensitivity: f32, rng: &mut dyn RngCore) {
        let (w, h) = (self.heat.width, self.heat.height);
        let data = resample(spectrum, w);

        for (x, &raw) in data.iter().enumerate() {
            let v = raw.clamp(0.0, 1.0) * sensitivity;
            self.heat.set(x, h - 1, v + rng.random::<f32>() * 0.2 * v);
            if h > 1 {
                self.heat.set(x, h - 2, v * 0.85 + rng.random::<f32>() * 0.15 * v);
            }
            if h > 2 {
                self.heat.set(x, h - 3, v * 0.5 + rng.random::<f32>() * 0.1 * v);
            }
        }
    }

    /// Move heat upward, cooling it, then soften each row horizontally
    fn propagate(&mut self, rng: &mut dyn RngCore) {
        let (w, h) = (self.heat.width, self.heat.height);

        for y in 0..h.saturating_sub(2) {
            for x in 0..w {
                let mut sum = self.heat.get(x, y + 1) + self.heat.get(x, y + 2);
                let mut count = 2;
                if x > 0 {
                    sum += self.heat.get(x - 1, y + 1);
                    count += 1;
                }
                if x + 1 < w {
                    sum += self.heat.get(x + 1, y + 1);
                    count += 1;
                }

                let decay = DECAY_MIN + rng.random::<f32>() * DECAY_SPREAD;
                let mut heat = sum / count as f32 * decay;
                if rng.random::<f32>() < JITTER_CHANCE {
                    heat += (rng.random::<f32>() - 0.5) * JITTER;
                }
                self.heat.set(x, y, heat.clamp(0.0, 1.0));
            }

            let row = self.heat.row_mut(y);
            let copy = row.to_vec();
            for x in 0..w {
                let left = copy[x.saturating_sub(1)];
                let right = copy[(x + 1).min(w - 1)];
                row[x] = 0.25 * left + 0.5 * copy[x] + 0.25 * right;
            }
        }
    }

    fn draw_embers(&self, frame: &Frame<'_>, surface: &mut dyn Surface, rng: &mut dyn RngCore) {
        let (w, h) = (self.heat.width, self.heat.height);

        for _ in 0..EMBER_TRIES {
            let x = rng.random_range(0..w);
            let flame = self.heat.flame_height(x);
            if flame <= MIN_FLAME_FOR_EMBERS {
                continue;
            }
            let lift = rng.random_range(0..3) + 1;
            if let Some(y) = (h - flame).checked_sub(lift) {
                let color = frame.scheme.at(0.7 + rng.random::<f32>() * 0.3);
                let glyph = EMBERS[rng.random_range(0..EMBERS.len())];
                surface.set_content(x, y, glyph, Style::fg(color));
            }
        }
    }
}

/// Flame color for `heat`, fading out near zero
fn heat_color(heat: f32, scheme: &ColorScheme) -> Rgb {
    let color = scheme.at(heat.powf(0.6));
    if heat < DIM_HEAT {
        color.scale(heat / DIM_HEAT)
    } else {
        color
    }
}

fn heat_glyph(heat: f32, rng: &mut dyn RngCore) -> char {
    match heat {
        h if h > 0.8 => '█',
        h if h > 0.6 => '▓',
        h if h > 0.4 => '▒',
        h if h > 0.2 => '░',
        h if h > 0.1 => TIPS[rng.random_range(0..TIPS.len())],
        _ => '·',
    }
}

impl Effect for Fire {
    fn name(&self) -> &'static str {
        "fire"
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, rng: &mut dyn RngCore) {
        let draw_h = frame.draw_height();
        if draw_h < 2 || frame.width < 2 {
            return;
        }

        self.heat.ensure_size(frame.width, draw_h);
        self.seed(frame.spectrum, frame.config.sensitivity, rng);
        self.propagate(rng);

        for y in 0..draw_h {
            for x in 0..frame.width {
                let heat = self.heat.get(x, y);
                if heat < VISIBLE_HEAT {
                    continue;
                }
                let glyph = heat_glyph(heat, rng);
                surface.set_content(x, y, glyph, Style::fg(heat_color(heat, frame.scheme)));
            }
        }

        self.draw_embers(frame, surface, rng);
    }
}
