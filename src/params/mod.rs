//! Parameter definitions with documented units and defaults.
//!
//! Everything here is plain data: the analyzer and effects read it every
//! frame, the app mutates it from key presses.

mod audio;
mod config;
mod visual;

// Re-export all types
pub use audio::AudioConfig;
pub use config::Config;
pub use visual::{VisualConfig, MAX_BAR_WIDTH, MAX_SENSITIVITY, MIN_SENSITIVITY};
