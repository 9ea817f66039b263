//! Smoothed, filled spectrum curve with a bright braille outline.

use rand::RngCore;

use super::{box_blur_in_place, resample, Effect, Frame};
use crate::render::{Style, SubpixelCanvas, Surface};

const BLUR_PASSES: usize = 3;
/// Weight of the new frame when blending with the previous one
const BLEND: f32 = 0.7;

#[derive(Default)]
pub struct SpectrumCurve {
    previous: Vec<f32>,
}

impl SpectrumCurve {
    /// Blur and blend `spectrum` into the per-column history
    fn smooth(&mut self, spectrum: &[f32], width: usize) -> Vec<f32> {
        let mut data = resample(spectrum, width);
        for _ in 0..BLUR_PASSES {
            box_blur_in_place(&mut data);
        }

        if self.previous.len() != width {
            self.previous = vec![0.0; width];
        }
        for (prev, value) in self.previous.iter_mut().zip(data.iter_mut()) {
            *prev = *prev * (1.0 - BLEND) + *value * BLEND;
            *value = *prev;
        }
        data
    }
}

impl Effect for SpectrumCurve {
    fn name(&self) -> &'static str {
        "spectrum"
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, _rng: &mut dyn RngCore) {
        let draw_h = frame.draw_height();
        if draw_h < 2 || frame.width == 0 {
            return;
        }

        let smoothed = self.smooth(frame.spectrum, frame.width);
        let span = (draw_h - 1) as f32;

        for (x, &raw) in smoothed.iter().enumerate() {
            let value = raw.clamp(0.0, 1.0);
            let height = value * span;
            let filled = height as usize;

            for y in 0..filled {
                let dist_from_top = (filled - y) as f32 / filled as f32;
                let brightness = 0.3 + 0.7 * (1.0 - dist_from_top).sqrt();
                let color = frame.scheme.at(y as f32 / draw_h as f32).scale(brightness);

                let glyph = if y + 1 < filled {
                    '█'
                } else if height.fract() > 0.5 {
                    '▄'
                } else {
                    '▂'
                };
                surface.set_content(x, draw_h - 1 - y, glyph, Style::fg(color));
            }
        }

        let mut canvas = SubpixelCanvas::new(frame.width, draw_h);
        let pw = canvas.pixel_width();
        let bottom = canvas.pixel_height() as i32 - 1;
        let curve = resample(&smoothed, pw);
        let to_y = |v: f32| bottom - (v.clamp(0.0, 1.0) * bottom as f32) as i32;

        for (x, pair) in curve.windows(2).enumerate() {
            let color = frame.scheme.at(x as f32 / pw as f32).boost(1.8, 50.0);
            let (y0, y1) = (to_y(pair[0]), to_y(pair[1]));
            let x = x as i32;
            canvas.draw_line(x, y0, x + 1, y1, color);
            if y0 > 0 {
                canvas.set(x, y0 - 1, color);
            }
        }

        canvas.render(surface, 0, 0);
    }
}
