use std::collections::BTreeMap;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the group labels of the colour column to distinct colours.  Keyed by
/// the relabeled string ("Unknown" included) so the histogram, scatter and
/// bar chart all agree on colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Color32>,
    /// Labels in first-seen dataset order, for stable legends.
    order: Vec<String>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from labels in first-seen order.  Duplicates are
    /// ignored.
    pub fn from_labels<I>(column: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut order: Vec<String> = Vec::new();
        for label in labels {
            if !order.contains(&label) {
                order.push(label);
            }
        }

        let palette = generate_palette(order.len());
        let mapping: BTreeMap<String, Color32> = order
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            order,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a group label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (label → colour) in first-seen order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .map(|l| (l.clone(), self.color_for(l)))
            .collect()
    }
}
