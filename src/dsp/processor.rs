//! Spectrum processor: FFT, log-spaced bands, attack/decay smoothing and
//! automatic gain.
//!
//! One `Processor` lives for the whole session. It keeps the previous
//! frame's smoothed bands, reallocated whenever the requested band count
//! changes.

use rustfft::num_complex::Complex;
use tracing::debug;

use super::fft::{fft_in_place, fft_size_for, half_spectrum_magnitudes, hann_coefficients};
use crate::params::{AudioConfig, VisualConfig};

/// Smallest transform ever run, whatever the snapshot length
pub const MIN_FFT_SIZE: usize = 64;
/// Band count used when the caller asks for zero bands
pub const DEFAULT_BAND_COUNT: usize = 64;

/// Lower edge of the first band (Hz)
const LOW_FREQ_HZ: f32 = 30.0;
/// Upper edge of the last band, unless Nyquist is lower (Hz)
const HIGH_FREQ_CAP_HZ: f32 = 18_000.0;
/// Extra gain reached by the highest band, countering spectral rolloff
const HIGH_BAND_BOOST: f32 = 2.0;
/// Weight of the new value when a band rises
const ATTACK_RATE: f32 = 0.7;
/// Normalization denominator floor, keeps silence at zero
const NORMALIZE_FLOOR: f32 = 0.001;
/// Exponent of the perceptual curve applied after normalization
const PERCEPTUAL_EXPONENT: f32 = 0.7;

/// Converts sample snapshots into normalized band energies in [0, 1]
pub struct Processor {
    audio: AudioConfig,

    /// Hann coefficients for `audio.buffer_size` samples
    window: Vec<f32>,

    /// Previous frame's smoothed bands
    smoothed: Vec<f32>,

    /// Reused FFT buffer
    fft_buffer: Vec<Complex<f32>>,
}

impl Processor {
    pub fn new(audio: AudioConfig) -> Self {
        let window = hann_coefficients(audio.buffer_size);
        debug!(
            sample_rate_hz = audio.sample_rate_hz,
            window = window.len(),
            "spectrum processor created"
        );
        Self {
            audio,
            window,
            smoothed: Vec::new(),
            fft_buffer: Vec::new(),
        }
    }

    pub fn audio_config(&self) -> &AudioConfig {
        &self.audio
    }

    /// Number of bands held in the smoothing history
    pub fn band_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Process one snapshot into `band_count` bands (0 selects the default).
    ///
    /// Always returns exactly that many values, each within [0, 1].
    pub fn process(
        &mut self,
        samples: &[f32],
        band_count: usize,
        visual: &VisualConfig,
    ) -> Vec<f32> {
        let band_count = if band_count == 0 {
            DEFAULT_BAND_COUNT
        } else {
            band_count
        };

        let fft_size = fft_size_for(samples.len(), MIN_FFT_SIZE);
        self.fft_buffer.clear();
        self.fft_buffer.resize(fft_size, Complex::new(0.0, 0.0));

        // Samples past the window length stay zero, as does the padding.
        for (slot, (&sample, &coeff)) in self
            .fft_buffer
            .iter_mut()
            .zip(samples.iter().zip(&self.window))
        {
            let sample = if sample.is_finite() { sample } else { 0.0 };
            *slot = Complex::new(sample * coeff, 0.0);
        }

        fft_in_place(&mut self.fft_buffer);
        let magnitudes = half_spectrum_magnitudes(&self.fft_buffer);

        let mut bands = self.group_into_bands(&magnitudes, band_count, fft_size);
        for band in &mut bands {
            *band = log_compress(*band);
        }

        if self.smoothed.len() != band_count {
            debug!(
                from = self.smoothed.len(),
                to = band_count,
                "band count changed, resetting smoothing history"
            );
            self.smoothed = vec![0.0; band_count];
        }
        for (stored, &new) in self.smoothed.iter_mut().zip(&bands) {
            *stored = smooth_band(*stored, new, visual.smoothing);
        }

        let peak = self.smoothed.iter().copied().fold(NORMALIZE_FLOOR, f32::max);
        self.smoothed
            .iter()
            .map(|&v| {
                let normalized = (v / peak).min(1.0).powf(PERCEPTUAL_EXPONENT);
                (normalized * visual.sensitivity).clamp(0.0, 1.0)
            })
            .collect()
    }

    /// Frequency range `[low, high)` covered by band `index` of `band_count`
    pub fn band_range_hz(&self, index: usize, band_count: usize) -> (f32, f32) {
        let high_freq = self.audio.nyquist_hz().min(HIGH_FREQ_CAP_HZ);
        let ratio = high_freq / LOW_FREQ_HZ;
        let count = band_count.max(1) as f32;
        (
            LOW_FREQ_HZ * ratio.powf(index as f32 / count),
            LOW_FREQ_HZ * ratio.powf((index + 1) as f32 / count),
        )
    }

    /// Average magnitudes over a log-spaced frequency grid, boosting highs
    fn group_into_bands(&self, magnitudes: &[f32], band_count: usize, fft_size: usize) -> Vec<f32> {
        let last_bin = magnitudes.len().saturating_sub(1);

        (0..band_count)
            .map(|i| {
                let (f0, f1) = self.band_range_hz(i, band_count);
                let bin0 = self.audio.hz_to_bin(f0, fft_size).min(last_bin);
                let bin1 = self.audio.hz_to_bin(f1, fft_size).min(last_bin).max(bin0);

                let bins = &magnitudes[bin0..=bin1];
                let mean = bins.iter().sum::<f32>() / bins.len() as f32;

                let weight = 1.0 + HIGH_BAND_BOOST * i as f32 / band_count as f32;
                mean * weight
            })
            .collect()
    }
}

/// Log compression mapping (0, 1] onto (0, 1] with a knee favoring quiet bands
pub fn log_compress(v: f32) -> f32 {
    if v > 0.0 {
        (1.0 + 9.0 * v).log10()
    } else {
        v
    }
}

/// One step of asymmetric smoothing: fast attack, `smoothing`-controlled decay
pub fn smooth_band(stored: f32, new: f32, smoothing: f32) -> f32 {
    if new >= stored {
        new * ATTACK_RATE + stored * (1.0 - ATTACK_RATE)
    } else {
        new * (1.0 - smoothing) + stored * smoothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::PI;

    fn sine(freq_hz: f32, amplitude: f32, len: usize, sample_rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn noise(len: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    fn assert_in_unit_range(spectrum: &[f32]) {
        for &v in spectrum {
            assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
        }
    }

    #[test]
    fn test_output_length_and_range() {
        let mut processor = Processor::new(AudioConfig::default());
        let visual = VisualConfig::default();

        for (i, &count) in [16, 64, 100, 128, 317].iter().enumerate() {
            let spectrum = processor.process(&noise(4096, i as u64), count, &visual);
            assert_eq!(spectrum.len(), count);
            assert_in_unit_range(&spectrum);
        }
    }

    #[test]
    fn test_zero_band_count_uses_default() {
        let mut processor = Processor::new(AudioConfig::default());
        let spectrum = processor.process(&noise(4096, 7), 0, &VisualConfig::default());
        assert_eq!(spectrum.len(), DEFAULT_BAND_COUNT);
    }

    #[test]
    fn test_odd_snapshot_lengths() {
        let audio = AudioConfig {
            buffer_size: 1024,
            ..AudioConfig::default()
        };
        let mut processor = Processor::new(audio);
        let visual = VisualConfig::default();

        for len in [0, 1, 10, 63, 1000, 3000] {
            let spectrum = processor.process(&noise(len, len as u64), 48, &visual);
            assert_eq!(spectrum.len(), 48);
            assert_in_unit_range(&spectrum);
        }
    }

    #[test]
    fn test_non_finite_samples_are_silence() {
        let mut processor = Processor::new(AudioConfig::default());
        let mut samples = noise(4096, 3);
        samples[100] = f32::NAN;
        samples[200] = f32::INFINITY;

        let spectrum = processor.process(&samples, 64, &VisualConfig::default());
        assert_in_unit_range(&spectrum);
        assert!(spectrum.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_silence_is_zero() {
        let mut processor = Processor::new(AudioConfig::default());
        let spectrum = processor.process(&[0.0; 4096], 64, &VisualConfig::default());
        assert!(spectrum.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_silence_after_signal_converges_to_zero() {
        let mut processor = Processor::new(AudioConfig::default());
        let visual = VisualConfig::default();

        for seed in 0..5 {
            processor.process(&noise(4096, seed), 64, &visual);
        }
        let mut spectrum = Vec::new();
        for _ in 0..200 {
            spectrum = processor.process(&[0.0; 4096], 64, &visual);
        }
        assert!(spectrum.iter().all(|&v| v < 1e-3), "{:?}", spectrum);
    }

    #[test]
    fn test_band_count_change_resets_history() {
        let mut processor = Processor::new(AudioConfig::default());
        let visual = VisualConfig::default();

        processor.process(&noise(4096, 1), 32, &visual);
        assert_eq!(processor.band_count(), 32);

        let spectrum = processor.process(&noise(4096, 2), 48, &visual);
        assert_eq!(spectrum.len(), 48);
        assert_eq!(processor.band_count(), 48);
    }

    #[test]
    fn test_sensitivity_scales_output() {
        let mut processor = Processor::new(AudioConfig::default());
        let visual = VisualConfig {
            sensitivity: 0.5,
            ..VisualConfig::default()
        };

        let spectrum = processor.process(&noise(4096, 9), 64, &visual);
        let max = spectrum.iter().copied().fold(0.0, f32::max);
        assert!((max - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_band_ranges_are_contiguous_and_log_spaced() {
        let processor = Processor::new(AudioConfig::default());

        let (first_low, _) = processor.band_range_hz(0, 64);
        let (_, last_high) = processor.band_range_hz(63, 64);
        assert!((first_low - 30.0).abs() < 1e-3);
        assert!((last_high - 18_000.0).abs() < 1.0);

        for i in 0..63 {
            let (low, high) = processor.band_range_hz(i, 64);
            let (next_low, next_high) = processor.band_range_hz(i + 1, 64);
            assert!((high - next_low).abs() < 1e-2);
            let ratio = high / low;
            assert!((next_high / next_low - ratio).abs() < 1e-3);
        }
    }

    #[test]
    fn test_high_band_capped_at_nyquist() {
        let processor = Processor::new(AudioConfig {
            sample_rate_hz: 22050,
            ..AudioConfig::default()
        });
        let (_, high) = processor.band_range_hz(31, 32);
        assert!((high - 11_025.0).abs() < 1.0);
    }

    #[test]
    fn test_log_compress() {
        assert_eq!(log_compress(0.0), 0.0);
        assert!((log_compress(1.0) - 1.0).abs() < 1e-6);
        // Quiet values are lifted
        assert!(log_compress(0.1) > 0.1);
    }

    #[test]
    fn test_smoothing_rises_faster_than_it_falls() {
        for smoothing in [0.35, 0.5, 0.65, 0.8, 0.95] {
            let mut value = 0.0;
            let mut rise_frames = 0;
            while value < 0.99 {
                value = smooth_band(value, 1.0, smoothing);
                rise_frames += 1;
            }

            let mut fall_frames = 0;
            while value > 0.01 {
                value = smooth_band(value, 0.0, smoothing);
                fall_frames += 1;
            }

            assert!(
                rise_frames < fall_frames,
                "smoothing {}: rise {} vs fall {}",
                smoothing,
                rise_frames,
                fall_frames
            );
        }
    }

    #[test]
    fn test_silence_then_low_tone() {
        let audio = AudioConfig::default();
        let sample_rate = audio.sample_rate_hz;
        let mut processor = Processor::new(audio);
        let visual = VisualConfig::default();

        let mut spectrum = Vec::new();
        for _ in 0..10 {
            spectrum = processor.process(&[0.0; 4096], 64, &visual);
        }
        assert!(spectrum.iter().all(|&v| v == 0.0));

        let tone = sine(100.0, 1.0, 4096, sample_rate);
        let spectrum = processor.process(&tone, 64, &visual);
        let (loudest, &value) = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();

        let (low_hz, _) = processor.band_range_hz(loudest, 64);
        assert!(low_hz < 150.0, "loudest band {} starts at {} Hz", loudest, low_hz);
        assert!((value - 1.0).abs() < 1e-6);
    }
}
