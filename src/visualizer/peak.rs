//! Peak trackers: markers that snap up to a value and fall back over time.

/// Peak with gravity-like fall: the fall velocity grows every frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FallingPeak {
    value: f32,
    velocity: f32,
}

impl FallingPeak {
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Feed this frame's value; `fall_speed` is added to the velocity per frame
    pub fn update(&mut self, current: f32, fall_speed: f32) -> f32 {
        if current >= self.value {
            self.value = current;
            self.velocity = 0.0;
        } else {
            self.velocity += fall_speed;
            self.value -= self.velocity;
            if self.value < 0.0 {
                self.value = 0.0;
                self.velocity = 0.0;
            }
        }
        self.value
    }
}

/// Peak that loses a fixed fraction of its height every frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecayingPeak {
    value: f32,
}

impl DecayingPeak {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn update(&mut self, current: f32, retain: f32) -> f32 {
        if current > self.value {
            self.value = current;
        } else {
            self.value *= retain;
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falling_peak_accelerates_to_zero() {
        let mut peak = FallingPeak::default();
        let inputs = [0.0, 0.8, 0.0, 0.0, 0.0];
        let tracked: Vec<f32> = inputs.iter().map(|&v| peak.update(v, 0.03)).collect();

        assert_eq!(tracked[0], 0.0);
        assert_eq!(tracked[1], 0.8);

        // Keep feeding silence until the marker lands
        let mut history = tracked[1..].to_vec();
        while peak.value() > 0.0 {
            history.push(peak.update(0.0, 0.03));
            assert!(history.len() < 100, "peak never reached zero");
        }

        let mut previous_drop = 0.0;
        for pair in history.windows(2) {
            let drop = pair[0] - pair[1];
            assert!(pair[1] >= 0.0);
            if pair[1] > 0.0 {
                assert!(drop > 0.0, "peak must strictly fall");
                assert!(drop > previous_drop, "fall must accelerate");
                previous_drop = drop;
            }
        }
        assert_eq!(*history.last().unwrap(), 0.0);
    }

    #[test]
    fn test_falling_peak_snaps_up_and_resets_velocity() {
        let mut peak = FallingPeak::default();
        peak.update(1.0, 0.1);
        peak.update(0.0, 0.1);
        peak.update(0.0, 0.1);
        assert!((peak.value() - 0.7).abs() < 1e-6);

        peak.update(0.9, 0.1);
        assert_eq!(peak.value(), 0.9);
        // Velocity restarted from zero
        assert!((peak.update(0.0, 0.1) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_decaying_peak_is_multiplicative() {
        let mut peak = DecayingPeak::default();
        assert_eq!(peak.update(0.5, 0.97), 0.5);
        assert!((peak.update(0.1, 0.97) - 0.485).abs() < 1e-6);
        assert!((peak.update(0.1, 0.97) - 0.47045).abs() < 1e-6);
        assert_eq!(peak.update(0.9, 0.97), 0.9);
    }
}
