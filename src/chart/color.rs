use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Rgb – renderer-agnostic colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour. Serialises as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GRAY: Rgb = Rgb::new(160, 160, 160);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    fn to_linear(self) -> LinSrgb {
        Srgb::new(self.r, self.g, self.b)
            .into_format::<f32>()
            .into_linear()
    }

    fn from_linear(color: LinSrgb) -> Self {
        let srgb: Srgb<f32> = Srgb::from_linear(color);
        let c: Srgb<u8> = srgb.into_format();
        Self::new(c.red, c.green, c.blue)
    }

    /// Perceived brightness in `[0, 1]`, used to pick readable label colours.
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Continuous colour scales used by heatmaps and the state map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorScale {
    /// Diverging red → white → blue.
    RdBu,
    Reds,
    Blues,
}

const RDBU: [Rgb; 11] = [
    Rgb::new(103, 0, 31),
    Rgb::new(178, 24, 43),
    Rgb::new(214, 96, 77),
    Rgb::new(244, 165, 130),
    Rgb::new(253, 219, 199),
    Rgb::new(247, 247, 247),
    Rgb::new(209, 229, 240),
    Rgb::new(146, 197, 222),
    Rgb::new(67, 147, 195),
    Rgb::new(33, 102, 172),
    Rgb::new(5, 48, 97),
];

const REDS: [Rgb; 9] = [
    Rgb::new(255, 245, 240),
    Rgb::new(254, 224, 210),
    Rgb::new(252, 187, 161),
    Rgb::new(252, 146, 114),
    Rgb::new(251, 106, 74),
    Rgb::new(239, 59, 44),
    Rgb::new(203, 24, 29),
    Rgb::new(165, 15, 21),
    Rgb::new(103, 0, 13),
];

const BLUES: [Rgb; 9] = [
    Rgb::new(247, 251, 255),
    Rgb::new(222, 235, 247),
    Rgb::new(198, 219, 239),
    Rgb::new(158, 202, 225),
    Rgb::new(107, 174, 214),
    Rgb::new(66, 146, 198),
    Rgb::new(33, 113, 181),
    Rgb::new(8, 81, 156),
    Rgb::new(8, 48, 107),
];

impl ColorScale {
    fn stops(self) -> &'static [Rgb] {
        match self {
            ColorScale::RdBu => &RDBU,
            ColorScale::Reds => &REDS,
            ColorScale::Blues => &BLUES,
        }
    }

    /// Colour at position `t` in `[0, 1]` (clamped; NaN maps to the start).
    pub fn sample(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = (pos - lo as f64) as f32;
        Rgb::from_linear(stops[lo].to_linear().mix(stops[hi].to_linear(), frac))
    }

    /// Colour of `value` on a scale spanning `[min, max]`.
    pub fn map(self, value: f64, min: f64, max: f64) -> Rgb {
        if max <= min {
            return self.sample(1.0);
        }
        self.sample((value - min) / (max - min))
    }
}

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::new(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Maps the distinct values of a category (e.g. severity levels) to
/// distinct colours, so the same level has the same colour in every series.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    pub fn new<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let unique: BTreeSet<&CellValue> = values.into_iter().collect();
        let palette = generate_palette(unique.len());
        let mapping = unique
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Rgb::from_hex("#007BFF").unwrap();
        assert_eq!(c, Rgb::new(0, 123, 255));
        assert_eq!(c.to_string(), "#007bff");
        assert!(Rgb::from_hex("007BFF").is_none());
    }

    #[test]
    fn scale_endpoints_match_stops() {
        assert_eq!(ColorScale::Reds.sample(0.0), REDS[0]);
        assert_eq!(ColorScale::Reds.sample(1.0), REDS[8]);
        assert_eq!(ColorScale::RdBu.map(0.0, -1.0, 1.0), RDBU[5]);
        assert_eq!(ColorScale::Blues.sample(f64::NAN), BLUES[0]);
    }

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(4);
        let unique: BTreeSet<(u8, u8, u8)> = p.iter().map(|c| (c.r, c.g, c.b)).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn color_map_is_stable_per_value() {
        let values = [CellValue::Integer(3), CellValue::Integer(1), CellValue::Integer(3)];
        let map = ColorMap::new(&values);
        assert_eq!(map.color_for(&values[0]), map.color_for(&values[2]));
        assert_ne!(map.color_for(&values[0]), map.color_for(&values[1]));
        assert_eq!(map.color_for(&CellValue::Null), Rgb::GRAY);
    }
}
