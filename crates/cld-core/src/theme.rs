//! Presentation constants for causal-loop diagrams.
//!
//! Every field has a default, so override documents only need to name what they change:
//!
//! ```
//! let theme = cld_core::Theme::from_json_str(r#"{ "edge": { "head_length": 16 } }"#)?;
//! assert_eq!(theme.edge.head_length, 16.0);
//! assert_eq!(theme.node.ry, 35.0);
//! # Ok::<(), cld_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::model::Sign;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 10.0,
            weight: FontWeight::Normal,
            slant: FontSlant::Normal,
        }
    }
}

impl Font {
    pub fn regular(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
            ..Self::default()
        }
    }

    pub fn italic(size: f64) -> Self {
        Self {
            size,
            slant: FontSlant::Italic,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeTheme {
    pub ry: f64,
    pub min_rx: f64,
    pub rx_per_char: f64,
    pub default_fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub font: Font,
    pub text_color: String,
    /// Greedy wrap threshold, in characters.
    pub wrap_width: usize,
    pub line_height: f64,
}

impl Default for NodeTheme {
    fn default() -> Self {
        Self {
            ry: 35.0,
            min_rx: 55.0,
            rx_per_char: 3.5,
            default_fill: "lightblue".to_string(),
            stroke: "#333".to_string(),
            stroke_width: 2.0,
            font: Font::bold(10.0),
            text_color: "black".to_string(),
            wrap_width: 18,
            line_height: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeTheme {
    pub stroke: String,
    pub stroke_width: f64,
    pub head_length: f64,
    /// Half-opening of the arrowhead V, in degrees.
    pub head_angle_deg: f64,
    /// Control-point offset as a fraction of the chord length.
    pub curve_factor: f64,
    /// Bézier parameter used to approximate the tangent at the curve's end.
    pub tangent_t: f64,
}

impl Default for EdgeTheme {
    fn default() -> Self {
        Self {
            stroke: "#555".to_string(),
            stroke_width: 2.0,
            head_length: 12.0,
            head_angle_deg: 30.0,
            curve_factor: 0.3,
            tangent_t: 0.99,
        }
    }
}

impl EdgeTheme {
    pub fn head_angle(&self) -> f64 {
        self.head_angle_deg.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignTheme {
    pub badge_radius: f64,
    pub badge_offset_y: f64,
    pub badge_fill: String,
    pub font: Font,
    pub positive_color: String,
    pub negative_color: String,
    pub label_font: Font,
    pub label_color: String,
    pub label_offset_y: f64,
}

impl Default for SignTheme {
    fn default() -> Self {
        Self {
            badge_radius: 10.0,
            badge_offset_y: -5.0,
            badge_fill: "white".to_string(),
            font: Font::bold(16.0),
            positive_color: "green".to_string(),
            negative_color: "red".to_string(),
            label_font: Font::italic(9.0),
            label_color: "#666".to_string(),
            label_offset_y: 12.0,
        }
    }
}

impl SignTheme {
    pub fn color(&self, sign: Sign) -> &str {
        match sign {
            Sign::Positive => &self.positive_color,
            Sign::Negative => &self.negative_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationTheme {
    pub loop_title_font: Font,
    pub loop_description_font: Font,
    pub loop_description_color: String,
    /// Offset from a loop title to its first description line.
    pub loop_description_offset: f64,
    pub loop_line_height: f64,
    pub callout_stroke_width: f64,
    pub callout_heading_font: Font,
    pub callout_font: Font,
    pub callout_text_color: String,
    pub callout_heading_offset: f64,
    pub callout_line_height: f64,
    pub legend_title_font: Font,
    pub legend_font: Font,
    pub legend_color: String,
    pub legend_first_offset: f64,
    pub legend_line_height: f64,
    /// Extra space between the sign entries and the loop entries.
    pub legend_section_gap: f64,
}

impl Default for AnnotationTheme {
    fn default() -> Self {
        Self {
            loop_title_font: Font::bold(14.0),
            loop_description_font: Font::italic(11.0),
            loop_description_color: "#666".to_string(),
            loop_description_offset: 16.0,
            loop_line_height: 14.0,
            callout_stroke_width: 2.0,
            callout_heading_font: Font::bold(10.0),
            callout_font: Font::regular(10.0),
            callout_text_color: "#333".to_string(),
            callout_heading_offset: 15.0,
            callout_line_height: 15.0,
            legend_title_font: Font::bold(12.0),
            legend_font: Font::regular(11.0),
            legend_color: "#333".to_string(),
            legend_first_offset: 20.0,
            legend_line_height: 18.0,
            legend_section_gap: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasTheme {
    /// Background fill; `None` leaves the surface transparent.
    pub background: Option<String>,
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self {
            background: Some("white".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub node: NodeTheme,
    pub edge: EdgeTheme,
    pub sign: SignTheme,
    pub annotation: AnnotationTheme,
    pub canvas: CanvasTheme,
}

impl Theme {
    /// Deep-merges `overrides` over this theme: objects merge key by key, everything else
    /// replaces the current value.
    pub fn with_overrides(&self, overrides: &Value) -> Result<Self> {
        if !overrides.is_object() {
            return Err(Error::Theme {
                message: "theme overrides must be a JSON object".to_string(),
            });
        }
        let mut base = serde_json::to_value(self)?;
        deep_merge_value(&mut base, overrides);
        let theme: Theme = serde_json::from_value(base)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        Self::default().with_overrides(&overrides)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_yaml::from_str(text)?;
        Self::default().with_overrides(&overrides)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("node.ry", self.node.ry),
            ("node.min_rx", self.node.min_rx),
            ("node.line_height", self.node.line_height),
            ("edge.head_length", self.edge.head_length),
            ("sign.badge_radius", self.sign.badge_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Theme {
                    message: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        if !(self.edge.tangent_t > 0.0 && self.edge.tangent_t < 1.0) {
            return Err(Error::Theme {
                message: format!(
                    "edge.tangent_t must lie strictly between 0 and 1, got {}",
                    self.edge.tangent_t
                ),
            });
        }
        if self.node.wrap_width == 0 {
            return Err(Error::Theme {
                message: "node.wrap_width must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => merge_objects(base, incoming),
        (base, incoming) => *base = incoming.clone(),
    }
}

fn merge_objects(base: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        match base.get_mut(key) {
            Some(slot) => deep_merge_value(slot, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
