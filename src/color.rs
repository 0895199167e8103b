use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.6);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb`, falling back to grey.
pub fn hex(code: &str) -> Color32 {
    match Srgb::<u8>::from_str(code) {
        Ok(c) => Color32::from_rgb(c.red, c.green, c.blue),
        Err(_) => Color32::GRAY,
    }
}

/// Fill for entries outside the brush.
pub const FILTERED: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);

// ---------------------------------------------------------------------------
// Threshold scale: sighting count → purple shade
// ---------------------------------------------------------------------------

/// Step colour scale over sighting counts.
///
/// `n` thresholds split the line into `n + 1` bands; a value equal to a
/// threshold falls in the upper band.
#[derive(Debug, Clone)]
pub struct ThresholdScale {
    thresholds: [f64; 3],
    colors: [Color32; 4],
}

impl ThresholdScale {
    pub fn new(thresholds: [f64; 3]) -> Self {
        Self {
            thresholds,
            colors: [
                hex("#8c6bb1"),
                hex("#88419d"),
                hex("#810f7c"),
                hex("#4d004b"),
            ],
        }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let band = self.thresholds.iter().filter(|t| value >= **t).count();
        self.colors[band]
    }

    /// Colour for an aggregate, greyed when filtered.
    pub fn fill(&self, count: usize, filtered: bool) -> Color32 {
        if filtered {
            FILTERED
        } else {
            self.color_for(count as f64)
        }
    }

    pub fn thresholds(&self) -> [f64; 3] {
        self.thresholds
    }

    /// Legend entries (band label → colour).
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        let [a, b, c] = self.thresholds;
        vec![
            (format!("< {a}"), self.colors[0]),
            (format!("{a} – {b}"), self.colors[1]),
            (format!("{b} – {c}"), self.colors[2]),
            (format!("≥ {c}"), self.colors[3]),
        ]
    }
}

impl Default for ThresholdScale {
    fn default() -> Self {
        Self::new([50.0, 150.0, 250.0])
    }
}
