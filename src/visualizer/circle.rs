//! Radial visualizer: rotating rays around an inner ring with a center glow.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};

use super::{resample, DecayingPeak, Effect, Frame, CIRCLE_BANDS, MIN_BANDS};
use crate::render::{Style, SubpixelCanvas, Surface};

const ASPECT_X: f32 = 1.0;
/// Braille dots are twice as tall as they are wide
const ASPECT_Y: f32 = 2.0;
const RADIUS_FILL: f32 = 0.85;
const INNER_FRACTION: f32 = 0.25;
const PEAK_RETAIN: f32 = 0.97;
const PEAK_VISIBLE: f32 = 0.05;
const ROTATION_STEP: f32 = 0.005;

#[derive(Default)]
pub struct Circle {
    rotation: f32,
    peaks: Vec<DecayingPeak>,
}

impl Effect for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, rng: &mut dyn RngCore) {
        let draw_h = frame.draw_height();
        if draw_h < 4 || frame.width < 4 {
            return;
        }

        let mut canvas = SubpixelCanvas::new(frame.width, draw_h);
        let pw = canvas.pixel_width() as i32;
        let ph = canvas.pixel_height() as i32;
        let (cx, cy) = (pw / 2, ph / 2);
        let max_radius = (pw as f32 / 2.0 * RADIUS_FILL / ASPECT_X)
            .min(ph as f32 / 2.0 * RADIUS_FILL / ASPECT_Y);
        let inner = max_radius * INNER_FRACTION;
        let reach = max_radius - inner;
        let point = |angle: f32, r: f32| {
            (
                cx + (angle.cos() * r * ASPECT_X) as i32,
                cy + (angle.sin() * r * ASPECT_Y) as i32,
            )
        };

        let bands = frame.spectrum.len().min(CIRCLE_BANDS).max(MIN_BANDS);
        let data = resample(frame.spectrum, bands);
        if self.peaks.len() != bands {
            self.peaks = vec![DecayingPeak::default(); bands];
        }
        for (peak, &value) in self.peaks.iter_mut().zip(&data) {
            peak.update(value, PEAK_RETAIN);
        }

        for (i, &raw) in data.iter().enumerate() {
            let angle = self.rotation + i as f32 * TAU / bands as f32;
            let t = i as f32 / bands as f32;
            let length = (raw.clamp(0.0, 1.0) * reach).max(1.0);

            for s in 0..=(length as usize) {
                let (x, y) = point(angle, inner + s as f32);
                let dt = s as f32 / reach;
                let color = frame.scheme.at(t + dt * 0.3).scale(0.5 + 0.5 * dt);
                canvas.set(x, y, color);
            }

            let peak = self.peaks[i].value();
            if peak > PEAK_VISIBLE {
                let (px, py) = point(angle, inner + peak * reach);
                let color = frame.scheme.at(t).boost(1.5, 80.0);
                canvas.set(px, py, color);
                if px + 1 < pw {
                    canvas.set(px + 1, py, color);
                }
                if py + 1 < ph {
                    canvas.set(px, py + 1, color);
                }
            }
        }

        let ring_steps = (inner * TAU) as usize;
        for i in 0..ring_steps {
            let angle = i as f32 * TAU / ring_steps as f32;
            let (x, y) = point(angle, inner);
            canvas.set(x, y, frame.scheme.at(i as f32 / ring_steps as f32));
        }

        canvas.render(surface, 0, 0);
        self.rotation += ROTATION_STEP;

        let energy = data.iter().sum::<f32>() / data.len() as f32;
        draw_glow(frame, surface, rng, (energy * 3.0) as i32, draw_h);
    }
}

/// Soft halo around the center cell, only on cells nothing else claimed
fn draw_glow(
    frame: &Frame<'_>,
    surface: &mut dyn Surface,
    rng: &mut dyn RngCore,
    radius: i32,
    draw_h: usize,
) {
    let (cx, cy) = ((frame.width / 2) as i32, (draw_h / 2) as i32);
    let base = frame.scheme.at(0.5);

    for dy in -radius..=radius {
        for dx in -radius * 2..=radius * 2 {
            let dist = ((dx * dx) as f32 / 4.0 + (dy * dy) as f32).sqrt();
            if dist > radius as f32 {
                continue;
            }
            let (sx, sy) = (cx + dx, cy + dy);
            if sx < 0 || sy < 0 || sx >= frame.width as i32 || sy >= draw_h as i32 {
                continue;
            }
            let (sx, sy) = (sx as usize, sy as usize);
            if surface.content(sx, sy) != Some(' ') {
                continue;
            }

            let intensity = 1.0 - dist / (radius + 1) as f32;
            let style = Style::fg(base.scale(intensity * 0.6));
            if intensity > 0.7 {
                surface.set_content(sx, sy, '░', style);
            } else if rng.random::<f32>() < intensity {
                surface.set_content(sx, sy, '·', style);
            }
        }
    }
}
