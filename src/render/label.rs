//! Value label text and the text measurement seam.

/// Format a fractional value as a percentage.
///
/// Magnitudes of at least 1% get no decimals, smaller ones get two:
/// `0.25 -> "25%"`, `0.005 -> "0.50%"`. Ties round away from zero, so
/// `0.125 -> "13%"`.
pub fn format_percent(value: f64) -> String {
    let percent = value * 100.0;
    let decimals: usize = if percent.abs() >= 1.0 { 0 } else { 2 };
    let scale = 10f64.powi(decimals as i32);
    let rounded = (percent * scale).round() / scale;
    format!("{rounded:.decimals$}%")
}

/// Measures rendered text.
///
/// The render surface owns fonts; the core only needs a height to center
/// value labels vertically.
pub trait TextMeasurer {
    /// Rendered height of `text` at `font_size`.
    fn text_height(&self, text: &str, font_size: f64) -> f64;
}

/// Line-height estimate used when the host provides no measurer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasurer {
    pub line_height: f64,
}

impl Default for EstimatedTextMeasurer {
    fn default() -> Self {
        Self { line_height: 1.2 }
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn text_height(&self, text: &str, font_size: f64) -> f64 {
        if text.is_empty() {
            0.0
        } else {
            font_size * self.line_height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_get_two_decimals() {
        assert_eq!(format_percent(0.005), "0.50%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_whole_percentages() {
        assert_eq!(format_percent(0.25), "25%");
        assert_eq!(format_percent(0.01), "1%");
        assert_eq!(format_percent(1.5), "150%");
    }

    #[test]
    fn test_ties_round_up() {
        assert_eq!(format_percent(0.125), "13%");
        assert_eq!(format_percent(0.375), "38%");
        assert_eq!(format_percent(0.625), "63%");
        assert_eq!(format_percent(0.875), "88%");
        assert_eq!(format_percent(0.00125), "0.13%");
    }

    #[test]
    fn test_estimated_height() {
        let measurer = EstimatedTextMeasurer::default();
        assert!((measurer.text_height("25%", 10.0) - 12.0).abs() < 1e-9);
        assert_eq!(measurer.text_height("", 10.0), 0.0);
    }
}
