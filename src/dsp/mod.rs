//! Signal processing: radix-2 FFT and the band spectrum processor.

mod fft;
mod processor;

pub use fft::{fft_in_place, fft_size_for, half_spectrum_magnitudes, hann_coefficients, hann_window};
pub use processor::{log_compress, smooth_band, Processor, DEFAULT_BAND_COUNT, MIN_FFT_SIZE};
