//! Layered oscilloscope trace over a faint spectrum backdrop.

use rand::RngCore;

use super::{resample, Effect, Frame};
use crate::render::{Style, SubpixelCanvas, Surface};

const LAYERS: usize = 3;
const LAYER_SPREAD: f32 = 1.5;
const LAYER_FADE: f32 = 0.3;
const GAIN: f32 = 3.0;
const REFLECTION_DIM: f32 = 0.4;
const BACKDROP_SCALE: f32 = 0.3;
const BACKDROP_DIM: f32 = 0.15;
const PHASE_STEP: f32 = 0.02;

#[derive(Default)]
pub struct Wave {
    phase: f32,
}

impl Effect for Wave {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn draw(&mut self, frame: &Frame<'_>, surface: &mut dyn Surface, _rng: &mut dyn RngCore) {
        let draw_h = frame.draw_height();
        if draw_h == 0 || frame.width == 0 {
            return;
        }

        let mut canvas = SubpixelCanvas::new(frame.width, draw_h);
        let pw = canvas.pixel_width();
        let ph = canvas.pixel_height() as i32;
        let center = ph / 2;
        let amplitude = (ph / 3) as f32;
        let clamp_y = |y: i32| y.clamp(0, ph - 1);

        let gain = frame.config.sensitivity * GAIN;
        let wave: Vec<f32> = resample(frame.samples, pw)
            .into_iter()
            .map(|s| s * gain)
            .collect();

        for layer in (0..LAYERS).rev() {
            let spread = layer as f32 * LAYER_SPREAD;
            let alpha = 1.0 - layer as f32 * LAYER_FADE;

            for (x, pair) in wave.windows(2).enumerate() {
                let color = frame.scheme.at(x as f32 / pw as f32).scale(alpha);
                let y0 = center - offset(pair[0] * amplitude + spread, ph);
                let y1 = center - offset(pair[1] * amplitude + spread, ph);
                let x = x as i32;
                canvas.draw_line(x, clamp_y(y0), x + 1, clamp_y(y1), color);

                if layer == 0 {
                    let y0 = center + offset(pair[0] * amplitude, ph);
                    let y1 = center + offset(pair[1] * amplitude, ph);
                    let dim = color.scale(REFLECTION_DIM);
                    canvas.draw_line(x, clamp_y(y0), x + 1, clamp_y(y1), dim);
                }
            }
        }

        let hue = 0.5 + 0.15 * self.phase.sin();
        let centerline = Style::fg(frame.scheme.at(hue)).dim();
        for x in 0..frame.width {
            surface.set_content(x, draw_h / 2, '·', centerline);
        }

        let backdrop = resample(frame.spectrum, frame.width);
        for (x, &value) in backdrop.iter().enumerate() {
            let level = value * BACKDROP_SCALE;
            if level <= 0.02 {
                continue;
            }
            let rows = ((level * draw_h as f32) as usize).min(draw_h);
            for y in (draw_h - rows..draw_h).rev() {
                let t = (draw_h - y) as f32 / draw_h as f32;
                let color = frame.scheme.at(t).scale(BACKDROP_DIM);
                surface.set_content(x, y, '░', Style::fg(color));
            }
        }

        canvas.render(surface, 0, 0);
        self.phase += PHASE_STEP;
    }
}

/// Dot offset from the center, bounded by `limit`; non-finite values are silence
fn offset(value: f32, limit: i32) -> i32 {
    if value.is_finite() {
        value.clamp(-(limit as f32), limit as f32) as i32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorScheme;
    use crate::params::VisualConfig;
    use crate::visualizer::test_support::{draw_frames, sine_samples};

    #[test]
    fn test_flat_signal_draws_three_layers() {
        let mut wave = Wave::default();
        let config = VisualConfig::default();
        // 4 draw rows: 16 dot rows, center dot row 8
        let buf = draw_frames(&mut wave, &[0.0; 8], &[0.0; 256], (6, 5), &config, 1, 0);

        // Layers at dot rows 5 and 7 share cell row 1; the main trace sits on row 8
        assert_eq!(buf.row_text(1), "⣒⣒⣒⣒⣒⣒");
        assert_eq!(buf.row_text(2), "⠉⠉⠉⠉⠉⠉");
        assert_eq!(buf.row_text(0), "      ");
        assert_eq!(buf.row_text(3), "      ");
    }

    #[test]
    fn test_backdrop_columns_follow_spectrum() {
        let mut wave = Wave::default();
        let config = VisualConfig::default();
        let buf = draw_frames(&mut wave, &[1.0; 4], &[0.0; 64], (4, 11), &config, 1, 0);

        // 0.3 of 10 rows
        let scheme = ColorScheme::default();
        for y in 7..10 {
            assert_eq!(buf.content(0, y), Some('░'));
            let t = (10 - y) as f32 / 10.0;
            assert_eq!(buf.get(0, y).unwrap().style.fg, Some(scheme.at(t).scale(BACKDROP_DIM)));
        }
        assert_eq!(buf.content(0, 6), Some(' '));
    }

    #[test]
    fn test_centerline_shows_where_trace_is_absent() {
        let mut wave = Wave::default();
        let config = VisualConfig::default();
        // A loud sine leaves the center cell row for most columns
        let samples = sine_samples(512, 1.0);
        let buf = draw_frames(&mut wave, &[], &samples, (40, 13), &config, 1, 0);

        let centerline = buf.row_text(6);
        assert!(centerline.contains('·'));
        assert!(buf.lit_cells() > 40);
    }

    #[test]
    fn test_phase_advances_per_frame() {
        let mut wave = Wave::default();
        let config = VisualConfig::default();
        draw_frames(&mut wave, &[], &[], (10, 5), &config, 3, 0);
        assert!((wave.phase - 3.0 * PHASE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_huge_and_non_finite_samples_stay_on_canvas() {
        let mut wave = Wave::default();
        let config = VisualConfig {
            sensitivity: 5.0,
            ..VisualConfig::default()
        };
        let mut samples = sine_samples(512, 0.5);
        samples[100] = 1.0e10;
        samples[200] = -1.0e10;
        samples[300] = f32::INFINITY;
        samples[400] = f32::NEG_INFINITY;
        samples[450] = f32::NAN;

        let buf = draw_frames(&mut wave, &[0.5; 8], &samples, (40, 13), &config, 2, 0);
        assert!(buf.lit_cells() > 40);
    }

    #[test]
    fn test_offset_is_bounded() {
        assert_eq!(offset(1.0e10, 48), 48);
        assert_eq!(offset(-1.0e10, 48), -48);
        assert_eq!(offset(f32::INFINITY, 48), 0);
        assert_eq!(offset(f32::NAN, 48), 0);
        assert_eq!(offset(7.9, 48), 7);
    }
}
