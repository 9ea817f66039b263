//! Visual tuning knobs shared by the analyzer and the effects.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound for the runtime sensitivity adjustment
pub const MAX_SENSITIVITY: f32 = 5.0;
/// Lower bound for the runtime sensitivity adjustment
pub const MIN_SENSITIVITY: f32 = 0.01;
/// Widest bar the runtime controls allow (cells)
pub const MAX_BAR_WIDTH: usize = 10;

/// Visual configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Target frames per second
    pub fps: u32,

    /// Bar width in cells (bars style)
    pub bar_width: usize,

    /// Gap between bars in cells (bars style)
    pub bar_gap: usize,

    /// Decay coefficient in [0, 1): higher = slower fall
    pub smoothing: f32,

    /// Post-normalization gain
    pub sensitivity: f32,

    /// Per-frame acceleration of falling peak markers
    pub peak_fall_speed: f32,

    pub show_peaks: bool,

    /// Draw a dimmed reflection under the bars
    pub mirror: bool,

    /// Reserve the last row for the status bar
    pub show_status: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            bar_width: 2,
            bar_gap: 1,
            smoothing: 0.65,
            sensitivity: 1.0,
            peak_fall_speed: 0.03,
            show_peaks: true,
            mirror: false,
            show_status: true,
        }
    }
}

impl VisualConfig {
    /// Rows available to an effect on a surface `height` rows tall
    pub fn draw_height(&self, height: usize) -> usize {
        if self.show_status {
            height.saturating_sub(1)
        } else {
            height
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=240).contains(&self.fps) {
            return Err(Error::InvalidConfig(format!(
                "fps must be within 1..=240, got {}",
                self.fps
            )));
        }
        if self.bar_width == 0 {
            return Err(Error::InvalidConfig("bar width must be >= 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be within [0, 1), got {}",
                self.smoothing
            )));
        }
        if !(self.sensitivity > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sensitivity must be > 0, got {}",
                self.sensitivity
            )));
        }
        if !(self.peak_fall_speed >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "peak fall speed must be >= 0, got {}",
                self.peak_fall_speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_height_reserves_status_row() {
        let mut visual = VisualConfig::default();
        assert_eq!(visual.draw_height(24), 23);
        assert_eq!(visual.draw_height(0), 0);

        visual.show_status = false;
        assert_eq!(visual.draw_height(24), 24);
    }

    #[test]
    fn test_validate_rejects_out_of_range_knobs() {
        assert!(VisualConfig::default().validate().is_ok());

        let bad_smoothing = VisualConfig {
            smoothing: 1.0,
            ..VisualConfig::default()
        };
        assert!(bad_smoothing.validate().is_err());

        let nan_sensitivity = VisualConfig {
            sensitivity: f32::NAN,
            ..VisualConfig::default()
        };
        assert!(nan_sensitivity.validate().is_err());

        let no_fps = VisualConfig {
            fps: 0,
            ..VisualConfig::default()
        };
        assert!(no_fps.validate().is_err());
    }
}
