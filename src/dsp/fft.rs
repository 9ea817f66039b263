//! Radix-2 FFT and window helpers.

use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Precompute a Hann window of `size` coefficients
pub fn hann_coefficients(size: usize) -> Vec<f32> {
    (0..size).map(|i| hann_window(i, size)).collect()
}

/// Smallest power of two >= `n`, never below `floor`
pub fn fft_size_for(n: usize, floor: usize) -> usize {
    n.max(floor).max(1).next_power_of_two()
}

/// In-place iterative radix-2 FFT (decimation in time).
///
/// `data.len()` must be a power of two; other lengths are left untouched.
pub fn fft_in_place(data: &mut [Complex<f32>]) {
    let n = data.len();
    if n <= 1 || !n.is_power_of_two() {
        return;
    }

    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = bit_reverse(i, bits);
        if j > i {
            data.swap(i, j);
        }
    }

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle_step = -2.0 * std::f64::consts::PI / size as f64;
        for start in (0..n).step_by(size) {
            for k in 0..half {
                // Twiddles in f64 keep large transforms from drifting.
                let twiddle = Complex::from_polar(1.0f64, angle_step * k as f64);
                let twiddle = Complex::new(twiddle.re as f32, twiddle.im as f32);
                let t = twiddle * data[start + k + half];
                data[start + k + half] = data[start + k] - t;
                data[start + k] += t;
            }
        }
        size *= 2;
    }
}

/// Reverse the lowest `bits` bits of `x`
fn bit_reverse(x: usize, bits: u32) -> usize {
    let mut x = x;
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (x & 1);
        x >>= 1;
    }
    result
}

/// Magnitudes of the first N/2 bins, normalized by N
pub fn half_spectrum_magnitudes(spectrum: &[Complex<f32>]) -> Vec<f32> {
    let n = spectrum.len();
    spectrum
        .iter()
        .take(n / 2)
        .map(|c| c.norm() / n as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn real_signal(samples: &[f32]) -> Vec<Complex<f32>> {
        samples.iter().map(|&x| Complex::new(x, 0.0)).collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
        assert_eq!(hann_coefficients(1), vec![1.0]);
    }

    #[test]
    fn test_fft_size_for() {
        assert_eq!(fft_size_for(0, 64), 64);
        assert_eq!(fft_size_for(10, 64), 64);
        assert_eq!(fft_size_for(64, 64), 64);
        assert_eq!(fft_size_for(65, 64), 128);
        assert_eq!(fft_size_for(4096, 64), 4096);
    }

    #[test]
    fn test_bit_reverse() {
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b110, 3), 0b011);
        assert_eq!(bit_reverse(5, 0), 0);
    }

    #[test]
    fn test_dc_signal_concentrates_in_bin_zero() {
        let mut data = real_signal(&[0.5; 64]);
        fft_in_place(&mut data);
        let mags = half_spectrum_magnitudes(&data);

        assert!((mags[0] - 0.5).abs() < 1e-5);
        for &m in &mags[1..] {
            assert!(m < 1e-5, "leakage {} outside bin 0", m);
        }
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut samples = vec![0.0; 256];
        samples[0] = 1.0;
        let mut data = real_signal(&samples);
        fft_in_place(&mut data);

        for c in &data {
            assert!((c.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let n = 512;
        let bin = 37;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let mut data = real_signal(&samples);
        fft_in_place(&mut data);
        let mags = half_spectrum_magnitudes(&data);

        let peak = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(bin));
        assert!((mags[bin] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_matches_rustfft_reference() {
        let n = 1024;
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                (2.0 * PI * 13.0 * t).sin() * 0.7 + (2.0 * PI * 201.0 * t).cos() * 0.2 + t
            })
            .collect();

        let mut ours = real_signal(&samples);
        fft_in_place(&mut ours);

        let mut reference = real_signal(&samples);
        FftPlanner::<f32>::new()
            .plan_fft_forward(n)
            .process(&mut reference);

        for (a, b) in ours.iter().zip(&reference) {
            assert!((a - b).norm() < 5e-2, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_non_power_of_two_is_untouched() {
        let mut data = real_signal(&[1.0, 2.0, 3.0]);
        fft_in_place(&mut data);
        assert_eq!(data, real_signal(&[1.0, 2.0, 3.0]));
    }
}
