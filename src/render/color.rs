//! Label palette and the heatmap gradient.

use std::collections::BTreeMap;

use super::surface::Rgba;
use crate::state::{DEFAULT_LABEL, FALLBACK_COLOR, SERIES_COLORS};

/// Faint center gridline, `rgba(0,0,0,0.04)`
pub const GRID_COLOR: Rgba = [0, 0, 0, 10];

/// Heatmap row separators, `rgba(255,255,255,0.06)`
pub const HEATMAP_SEPARATOR_COLOR: Rgba = [255, 255, 255, 15];

/// Label → color lookup. Unknown labels use the `default` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<String, [u8; 3]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: SERIES_COLORS
                .iter()
                .map(|(label, color)| (label.to_string(), *color))
                .collect(),
        }
    }
}

impl Palette {
    pub fn color_for(&self, label: &str) -> Rgba {
        let [r, g, b] = self
            .colors
            .get(label)
            .or_else(|| self.colors.get(DEFAULT_LABEL))
            .copied()
            .unwrap_or(FALLBACK_COLOR);
        [r, g, b, 255]
    }

    pub fn set(&mut self, label: impl Into<String>, color: [u8; 3]) {
        self.colors.insert(label.into(), color);
    }

    /// Serialize as `label → "#rrggbb"` for the worker wire
    pub fn to_hex_map(&self) -> BTreeMap<String, String> {
        self.colors
            .iter()
            .map(|(label, [r, g, b])| (label.clone(), format!("#{:02x}{:02x}{:02x}", r, g, b)))
            .collect()
    }

    /// Rebuild from a wire color map. Unparsable entries are skipped and the
    /// built-in palette fills any gaps.
    pub fn from_hex_map(map: &BTreeMap<String, String>) -> Self {
        let mut palette = Self::default();
        for (label, hex) in map {
            match parse_hex(hex) {
                Some(color) => palette.set(label.clone(), color),
                None => tracing::debug!("Ignoring invalid color {:?} for {}", hex, label),
            }
        }
        palette
    }
}

/// Parse `#rrggbb` (or `#rgb`)
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in digits.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        _ => None,
    }
}

/// Heatmap gradient for a normalized value (clamped to `[0, 1]`)
pub fn heat_color(v: f32) -> Rgba {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    let r = (255.0 * v).round() as u8;
    let g = (160.0 * (1.0 - (0.5 - v).abs() * 2.0)).round() as u8;
    let b = (200.0 * (1.0 - v)).round() as u8;
    [r, g, b, 255]
}
