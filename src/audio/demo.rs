//! Synthetic signal used when no capture device is available.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::AudioSource;
use crate::params::AudioConfig;

const NOISE: f64 = 0.01;
const OUTPUT_GAIN: f64 = 0.3;

/// Sine oscillator with amplitude and frequency wobble
#[derive(Debug, Clone, Copy)]
struct Oscillator {
    freq: f64,
    amp: f64,
    /// Depth of the amplitude modulation in [0, 1]
    amp_depth: f64,
    amp_rate: f64,
    /// Frequency deviation in Hz
    freq_depth: f64,
    freq_rate: f64,
}

impl Oscillator {
    const fn new(freq: f64, amp: f64, amp_depth: f64, amp_rate: f64) -> Self {
        Self {
            freq,
            amp,
            amp_depth,
            amp_rate,
            freq_depth: 0.0,
            freq_rate: 0.0,
        }
    }

    const fn with_vibrato(self, depth: f64, rate: f64) -> Self {
        Self {
            freq_depth: depth,
            freq_rate: rate,
            ..self
        }
    }

    fn sample(&self, t: f64) -> f64 {
        let envelope = 1.0 - self.amp_depth + self.amp_depth * (TAU * self.amp_rate * t).sin().abs();
        let freq = self.freq + self.freq_depth * (TAU * self.freq_rate * t).sin();
        self.amp * envelope * (TAU * freq * t).sin()
    }
}

/// Kick-like bass, a chord in the mids and a thinning top end
const BANK: [Oscillator; 15] = [
    Oscillator::new(55.0, 0.8, 0.9, 2.1).with_vibrato(10.0, 2.1),
    Oscillator::new(80.0, 0.6, 0.8, 1.05),
    Oscillator::new(150.0, 0.4, 0.7, 3.3),
    Oscillator::new(220.0, 0.35, 0.6, 1.7),
    Oscillator::new(440.0, 0.3, 0.8, 0.8),
    Oscillator::new(554.0, 0.25, 0.7, 1.2),
    Oscillator::new(660.0, 0.25, 0.75, 0.6),
    Oscillator::new(880.0, 0.2, 0.6, 1.5),
    Oscillator::new(1200.0, 0.15, 0.5, 2.5),
    Oscillator::new(1800.0, 0.1, 0.6, 3.0),
    Oscillator::new(2400.0, 0.08, 0.5, 1.8),
    Oscillator::new(3600.0, 0.06, 0.4, 2.2),
    Oscillator::new(5000.0, 0.04, 0.3, 4.0),
    Oscillator::new(8000.0, 0.03, 0.4, 5.5),
    Oscillator::new(12000.0, 0.02, 0.3, 3.5),
];

pub struct DemoAudio {
    sample_rate: u32,
    buffer_size: usize,
    /// Seconds of signal produced so far
    time: f64,
    rng: StdRng,
}

impl DemoAudio {
    pub const LABEL: &'static str = "DEMO";

    pub fn new(audio: &AudioConfig, seed: u64) -> Self {
        Self {
            sample_rate: audio.sample_rate_hz,
            buffer_size: audio.buffer_size,
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AudioSource for DemoAudio {
    fn read(&mut self) -> Vec<f32> {
        let dt = 1.0 / self.sample_rate as f64;
        let start = self.time;
        let samples = (0..self.buffer_size)
            .map(|i| {
                let t = start + i as f64 * dt;
                let tone: f64 = BANK.iter().map(|osc| osc.sample(t)).sum();
                let noise = self.rng.random_range(-1.0..1.0) * NOISE;
                ((tone + noise) * OUTPUT_GAIN) as f32
            })
            .collect();
        self.time += self.buffer_size as f64 * dt;
        samples
    }

    fn close(&mut self) {}

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn label(&self) -> &'static str {
        Self::LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::Processor;
    use crate::params::VisualConfig;

    #[test]
    fn test_reads_are_buffer_sized_and_bounded() {
        let mut demo = DemoAudio::new(&AudioConfig::default(), 1);
        let samples = demo.read();
        assert_eq!(samples.len(), 4096);

        // Sum of oscillator amplitudes plus noise, scaled
        let bound = (BANK.iter().map(|o| o.amp).sum::<f64>() + NOISE) * OUTPUT_GAIN;
        assert!(samples.iter().all(|s| (*s as f64).abs() <= bound + 1e-6));
        assert!(samples.iter().any(|s| s.abs() > 0.01));
    }

    #[test]
    fn test_time_continues_across_reads() {
        let mut demo = DemoAudio::new(&AudioConfig::default(), 1);
        demo.read();
        demo.read();
        assert!((demo.time - 2.0 * 4096.0 / 44100.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_signal() {
        let mut a = DemoAudio::new(&AudioConfig::default(), 42);
        let mut b = DemoAudio::new(&AudioConfig::default(), 42);
        assert_eq!(a.read(), b.read());
    }

    #[test]
    fn test_spectrum_is_bass_heavy() {
        let audio = AudioConfig::default();
        let mut demo = DemoAudio::new(&audio, 3);
        let mut processor = Processor::new(audio);
        let visual = VisualConfig::default();

        let mut bands = Vec::new();
        for _ in 0..5 {
            bands = processor.process(&demo.read(), 32, &visual);
        }
        let low: f32 = bands[..8].iter().sum();
        let high: f32 = bands[24..].iter().sum();
        assert!(low > high);
    }
}
