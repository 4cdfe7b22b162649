use crate::geom::{Point, Rect, point};
use crate::theme::NodeTheme;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Stable node identifier. The id doubles as the node's display label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    /// Fill color; the theme's default fill is used when absent.
    #[serde(default)]
    pub fill: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn label(&self) -> &str {
        self.id.as_str()
    }

    /// Horizontal and vertical display radii. Longer labels get a wider ellipse, never narrower
    /// than `min_rx`.
    pub fn radii(&self, theme: &NodeTheme) -> (f64, f64) {
        let chars = self.label().chars().count() as f64;
        let rx = theme.min_rx.max(chars * theme.rx_per_char);
        (rx, theme.ry)
    }
}

/// Polarity of a causal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub const ALL: [Sign; 2] = [Sign::Positive, Sign::Negative];

    pub fn glyph(self) -> &'static str {
        match self {
            Sign::Positive => "+",
            Sign::Negative => "\u{2013}",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Sign::Positive => "Positive relationship (same direction change)",
            Sign::Negative => "Negative relationship (opposite direction change)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub sign: Sign,
    /// Signed bow coefficient. `0.0` draws a straight arrow; only the sign picks the side.
    #[serde(default)]
    pub curve: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, sign: Sign) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            sign,
            curve: 0.0,
            label: None,
        }
    }

    pub fn curved(mut self, curve: f64) -> Self {
        self.curve = curve;
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_curved(&self) -> bool {
        self.curve != 0.0
    }

    /// `1.0`, `-1.0`, or `0.0` for a straight edge.
    pub fn curve_direction(&self) -> f64 {
        if self.curve > 0.0 {
            1.0
        } else if self.curve < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopKind {
    Balancing,
    Reinforcing,
}

impl LoopKind {
    pub fn tag_prefix(self) -> char {
        match self {
            LoopKind::Balancing => 'B',
            LoopKind::Reinforcing => 'R',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LoopKind::Balancing => "Balancing",
            LoopKind::Reinforcing => "Reinforcing",
        }
    }
}

/// A declared feedback loop, drawn as a titled caption and summarized in the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopAnnotation {
    pub kind: LoopKind,
    pub number: u32,
    pub title: String,
    pub description: Vec<String>,
    pub summary: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

impl LoopAnnotation {
    /// `B1`, `R2`, ...
    pub fn tag(&self) -> String {
        format!("{}{}", self.kind.tag_prefix(), self.number)
    }

    pub fn heading(&self) -> String {
        format!("{}: {}", self.tag(), self.title)
    }

    pub fn legend_line(&self) -> String {
        format!(
            "{}: {} loop - {}",
            self.tag(),
            self.kind.name(),
            self.summary
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub border: String,
    pub fill: String,
    pub heading: String,
    pub lines: Vec<String>,
}

impl Callout {
    pub fn rect(&self) -> Rect {
        crate::geom::rect(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub title: String,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            x: 30.0,
            y: 560.0,
            title: "Legend:".to_string(),
        }
    }
}
