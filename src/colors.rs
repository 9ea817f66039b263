//! Color schemes: pure mappings from a scalar in [0, 1] to a 24-bit color.

use std::fmt;

use crate::error::{Error, Result};

/// 24-bit color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, clamped to 0..=255
    pub fn scale(self, factor: f32) -> Self {
        self.boost(factor, 0.0)
    }

    /// `channel * factor + add`, clamped to 0..=255
    pub fn boost(self, factor: f32, add: f32) -> Self {
        let map = |c: u8| (c as f32 * factor + add).clamp(0.0, 255.0) as u8;
        Self::new(map(self.r), map(self.g), map(self.b))
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1)
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Palette {
    /// HSV hue sweep from red (t = 0) to `end_degrees` (t = 1)
    HueSweep { end_degrees: f32 },
    /// Piecewise-linear gradient over evenly spaced stops
    Stops(&'static [Rgb]),
}

/// Named color scheme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScheme {
    name: &'static str,
    palette: Palette,
}

const FIRE: &[Rgb] = &[
    Rgb::new(40, 0, 0),
    Rgb::new(160, 20, 0),
    Rgb::new(240, 90, 0),
    Rgb::new(255, 190, 30),
    Rgb::new(255, 250, 200),
];

const OCEAN: &[Rgb] = &[
    Rgb::new(0, 20, 60),
    Rgb::new(0, 70, 140),
    Rgb::new(0, 150, 200),
    Rgb::new(80, 220, 230),
    Rgb::new(200, 255, 250),
];

const NEON: &[Rgb] = &[
    Rgb::new(255, 0, 160),
    Rgb::new(170, 0, 255),
    Rgb::new(0, 120, 255),
    Rgb::new(0, 255, 230),
    Rgb::new(180, 255, 0),
];

const PASTEL: &[Rgb] = &[
    Rgb::new(255, 179, 186),
    Rgb::new(255, 223, 186),
    Rgb::new(255, 255, 186),
    Rgb::new(186, 255, 201),
    Rgb::new(186, 225, 255),
];

const MATRIX: &[Rgb] = &[
    Rgb::new(0, 40, 0),
    Rgb::new(0, 120, 20),
    Rgb::new(0, 200, 40),
    Rgb::new(120, 255, 120),
];

const SUNSET: &[Rgb] = &[
    Rgb::new(60, 20, 90),
    Rgb::new(170, 40, 120),
    Rgb::new(240, 90, 80),
    Rgb::new(255, 160, 60),
    Rgb::new(255, 220, 120),
];

const AURORA: &[Rgb] = &[
    Rgb::new(10, 40, 80),
    Rgb::new(0, 160, 120),
    Rgb::new(60, 230, 140),
    Rgb::new(140, 100, 230),
    Rgb::new(230, 120, 220),
];

/// All schemes in cycling order
pub const SCHEMES: [ColorScheme; 8] = [
    ColorScheme::new("rainbow", Palette::HueSweep { end_degrees: 300.0 }),
    ColorScheme::new("fire", Palette::Stops(FIRE)),
    ColorScheme::new("ocean", Palette::Stops(OCEAN)),
    ColorScheme::new("neon", Palette::Stops(NEON)),
    ColorScheme::new("pastel", Palette::Stops(PASTEL)),
    ColorScheme::new("matrix", Palette::Stops(MATRIX)),
    ColorScheme::new("sunset", Palette::Stops(SUNSET)),
    ColorScheme::new("aurora", Palette::Stops(AURORA)),
];

impl ColorScheme {
    const fn new(name: &'static str, palette: Palette) -> Self {
        Self { name, palette }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Case-insensitive lookup
    pub fn by_name(name: &str) -> Result<Self> {
        SCHEMES
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::UnknownScheme(name.to_string()))
    }

    /// Color at `t`; values outside [0, 1] are clamped
    pub fn at(&self, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.palette {
            Palette::HueSweep { end_degrees } => hsv_to_rgb(t * end_degrees, 1.0, 1.0),
            Palette::Stops(stops) => {
                let segments = stops.len().saturating_sub(1);
                if segments == 0 {
                    return stops.first().copied().unwrap_or_default();
                }
                let pos = t * segments as f32;
                let idx = (pos as usize).min(segments - 1);
                stops[idx].lerp(stops[idx + 1], pos - idx as f32)
            }
        }
    }

    pub fn next(&self) -> Self {
        SCHEMES[(self.index() + 1) % SCHEMES.len()]
    }

    pub fn prev(&self) -> Self {
        SCHEMES[(self.index() + SCHEMES.len() - 1) % SCHEMES.len()]
    }

    fn index(&self) -> usize {
        SCHEMES
            .iter()
            .position(|s| s.name == self.name)
            .unwrap_or(0)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        SCHEMES[0]
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// HSV (hue in degrees, saturation and value in [0, 1]) to RGB
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let h = hue.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(ColorScheme::by_name("Fire").unwrap().name(), "fire");
        assert!(matches!(
            ColorScheme::by_name("plaid"),
            Err(Error::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_gradient_endpoints_and_clamping() {
        let fire = ColorScheme::by_name("fire").unwrap();
        assert_eq!(fire.at(0.0), FIRE[0]);
        assert_eq!(fire.at(1.0), FIRE[FIRE.len() - 1]);
        assert_eq!(fire.at(-3.0), fire.at(0.0));
        assert_eq!(fire.at(7.0), fire.at(1.0));
        assert_eq!(fire.at(f32::NAN), fire.at(0.0));
    }

    #[test]
    fn test_rainbow_sweep() {
        let rainbow = ColorScheme::default();
        assert_eq!(rainbow.at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(rainbow.at(120.0 / 300.0), Rgb::new(0, 255, 0));
        assert_eq!(rainbow.at(240.0 / 300.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_cycling_visits_every_scheme() {
        let mut scheme = ColorScheme::default();
        for expected in SCHEMES.iter().skip(1) {
            scheme = scheme.next();
            assert_eq!(scheme.name(), expected.name());
        }
        assert_eq!(scheme.next(), ColorScheme::default());
        assert_eq!(ColorScheme::default().prev().name(), "aurora");
    }

    #[test]
    fn test_scale_and_boost_clamp() {
        let c = Rgb::new(200, 100, 0);
        assert_eq!(c.scale(0.5), Rgb::new(100, 50, 0));
        assert_eq!(c.scale(2.0), Rgb::new(255, 200, 0));
        assert_eq!(c.boost(1.5, 80.0), Rgb::new(255, 230, 80));
    }
}
