//! Visual configuration supplied by the host's formatting pane.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Recognized configuration options.
///
/// Every field has a default, so a host may send a partial (or empty) object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Share of the viewport height kept free around the chart (default: 10).
    pub margin_percent: f64,
    /// Ceiling of the logarithmic value transform (default: 2.0, must be > 1).
    pub transform_compression_factor: f64,
    /// Rotation applied to every default ring angle, in degrees (default: 20).
    pub angle_offset_degrees: f64,
    /// Legend label font size per 1000px of viewport width (default: 12).
    pub legend_font_scale: f64,
    /// Floor on bubble radius as a percentage of viewport height (default: 0, disabled).
    pub min_bubble_radius_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            margin_percent: 10.0,
            transform_compression_factor: 2.0,
            angle_offset_degrees: 20.0,
            legend_font_scale: 12.0,
            min_bubble_radius_percent: 0.0,
        }
    }
}

impl Settings {
    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..100.0).contains(&self.margin_percent) {
            return Err(SettingsError::Margin(self.margin_percent));
        }
        let factor = self.transform_compression_factor;
        if !factor.is_finite() || factor <= 1.0 {
            return Err(SettingsError::CompressionFactor(factor));
        }
        if !self.angle_offset_degrees.is_finite() {
            return Err(SettingsError::AngleOffset(self.angle_offset_degrees));
        }
        if !self.legend_font_scale.is_finite() || self.legend_font_scale <= 0.0 {
            return Err(SettingsError::LegendFontScale(self.legend_font_scale));
        }
        if !(0.0..=50.0).contains(&self.min_bubble_radius_percent) {
            return Err(SettingsError::MinBubbleRadius(
                self.min_bubble_radius_percent,
            ));
        }
        Ok(())
    }

    /// Replace each invalid field with its default.
    ///
    /// A broken formatting pane must never stop the chart from rendering, so
    /// this is what the render pipeline consumes.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;

        // Fix one field at a time until validation passes; each arm resets
        // exactly the field that failed.
        while let Err(err) = out.validate() {
            log::warn!("ignoring invalid setting: {err}");
            match err {
                SettingsError::Margin(_) => out.margin_percent = defaults.margin_percent,
                SettingsError::CompressionFactor(_) => {
                    out.transform_compression_factor = defaults.transform_compression_factor
                }
                SettingsError::AngleOffset(_) => {
                    out.angle_offset_degrees = defaults.angle_offset_degrees
                }
                SettingsError::LegendFontScale(_) => {
                    out.legend_font_scale = defaults.legend_font_scale
                }
                SettingsError::MinBubbleRadius(_) => {
                    out.min_bubble_radius_percent = defaults.min_bubble_radius_percent
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "angleOffsetDegrees": 45 }"#).unwrap();
        assert_eq!(settings.angle_offset_degrees, 45.0);
        assert_eq!(settings.margin_percent, 10.0);
        assert_eq!(settings.transform_compression_factor, 2.0);
    }

    #[test]
    fn test_validate_rejects_low_compression_factor() {
        let settings = Settings {
            transform_compression_factor: 1.0,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::CompressionFactor(1.0))
        );
    }

    #[test]
    fn test_sanitized_resets_only_invalid_fields() {
        let settings = Settings {
            margin_percent: 150.0,
            legend_font_scale: f64::NAN,
            angle_offset_degrees: 33.0,
            ..Default::default()
        };
        let clean = settings.sanitized();
        assert_eq!(clean.margin_percent, 10.0);
        assert_eq!(clean.legend_font_scale, 12.0);
        assert_eq!(clean.angle_offset_degrees, 33.0);
        assert_eq!(clean.validate(), Ok(()));
    }
}
