//! audiovis - terminal audio visualizer
//!
//! Audio snapshots are turned into log-spaced band energies by
//! [`dsp::Processor`] and drawn by one of the [`visualizer`] effects onto a
//! character-cell [`render::Surface`].

pub mod app;
pub mod audio;
pub mod cli;
pub mod colors;
pub mod dsp;
pub mod error;
pub mod logging;
pub mod params;
pub mod render;
pub mod ui;
pub mod visualizer;

pub use error::{Error, Result};
