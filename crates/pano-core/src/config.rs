//! Tool configuration: hit tolerance, spline resolution, label format, styles.
//!
//! Every field has a default, so hosts can pass a partial JSON overlay.

use crate::spline::DEFAULT_SAMPLES_PER_SEGMENT;
use serde::{Deserialize, Serialize};

/// Handle hit radius in screen pixels.
pub const DEFAULT_HIT_THRESHOLD_PX: f64 = 8.0;

/// Presentation attributes for one drawing primitive.
///
/// Field names follow SVG attribute conventions so a sink can pass them
/// straight through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawStyle {
    pub color: String,
    pub width: f64,
    pub handle_radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub font_size: f64,
    pub padding: f64,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: "lime".to_string(),
            width: 1.0,
            handle_radius: 3.0,
            fill: None,
            background: None,
            font_size: 12.0,
            padding: 0.0,
        }
    }
}

impl DrawStyle {
    pub fn line(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            ..Self::default()
        }
    }

    pub fn handle(color: &str, radius: f64) -> Self {
        Self {
            color: color.to_string(),
            handle_radius: radius,
            ..Self::default()
        }
    }

    pub fn label(color: &str, background: &str) -> Self {
        Self {
            color: color.to_string(),
            background: Some(background.to_string()),
            padding: 6.0,
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }
}

/// Styles for each element the curve tool draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveStyles {
    pub curve: DrawStyle,
    pub handles: DrawStyle,
    pub center: DrawStyle,
    pub length_label: DrawStyle,
    pub measure_marks: DrawStyle,
    pub measure_label: DrawStyle,
}

impl Default for CurveStyles {
    fn default() -> Self {
        Self {
            curve: DrawStyle::line("lime", 2.0),
            handles: DrawStyle::handle("yellow", 3.0),
            center: DrawStyle::handle("cyan", 5.0).with_fill("rgba(0,255,255,0.3)"),
            length_label: DrawStyle::label("yellow", "rgba(0,0,0,0.35)"),
            measure_marks: DrawStyle::handle("red", 4.0),
            measure_label: DrawStyle::label("yellow", "rgba(0,0,0,0.35)"),
        }
    }
}

/// Configuration for the panorama curve tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveConfig {
    /// Handle hit radius in screen pixels (not world units).
    pub hit_threshold_px: f64,
    /// Spline samples per control-point span. Default: **12**. The tool
    /// clamps it to `1..=MAX_SAMPLES_PER_SEGMENT`.
    pub samples_per_segment: usize,
    /// Suffix for length readouts.
    pub unit_label: String,
    /// Decimal places in length readouts.
    pub label_precision: usize,
    pub styles: CurveStyles,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            hit_threshold_px: DEFAULT_HIT_THRESHOLD_PX,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            unit_label: "mm".to_string(),
            label_precision: 2,
            styles: CurveStyles::default(),
        }
    }
}

impl CurveConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Config parse error: {e}"))
    }

    /// Format a length readout, e.g. `12.34 mm`.
    pub fn format_length(&self, value: f64) -> String {
        format!("{value:.prec$} {}", self.unit_label, prec = self.label_precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_tool_conventions() {
        let config = CurveConfig::default();
        assert_eq!(config.hit_threshold_px, 8.0);
        assert_eq!(config.samples_per_segment, 12);
        assert_eq!(config.styles.curve.color, "lime");
        assert_eq!(config.styles.handles.handle_radius, 3.0);
        assert_eq!(
            config.styles.center.fill.as_deref(),
            Some("rgba(0,255,255,0.3)")
        );
    }

    #[test]
    fn partial_json_overlays_defaults() {
        let config = CurveConfig::from_json(
            r#"{"hitThresholdPx": 12, "styles": {"curve": {"color": "orange"}}}"#,
        )
        .unwrap();
        assert_eq!(config.hit_threshold_px, 12.0);
        assert_eq!(config.samples_per_segment, 12);
        assert_eq!(config.styles.curve.color, "orange");
        // Unspecified fields inside a given style fall back to DrawStyle defaults
        assert_eq!(config.styles.curve.width, 1.0);
        assert_eq!(config.styles.handles, CurveStyles::default().handles);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = CurveConfig::from_json("{ nope").unwrap_err();
        assert!(err.starts_with("Config parse error"));
    }

    #[test]
    fn length_formatting() {
        let config = CurveConfig::default();
        assert_eq!(config.format_length(12.345_6), "12.35 mm");
    }
}
