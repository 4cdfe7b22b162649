//! Arrow geometry for causal-loop edges.
//!
//! Edges are anchored on node outlines with [`boundary_point`], then drawn either as a straight
//! shaft or as a quadratic Bézier bowed to one side of the chord. Both kinds end in the same
//! open V arrowhead, oriented along the reversed tangent at the tip.

use cld_core::geom::{Point, Vector, point, vector};
use cld_core::theme::EdgeTheme;
use serde::Serialize;

/// Chords shorter than this are treated as degenerate.
pub const MIN_CHORD_LENGTH: f64 = 1e-9;

/// Point on an ellipse outline facing `target`, parametrized by the angle toward it.
///
/// This is `center + (rx cos θ, ry sin θ)` with `θ = atan2(target - center)`. For `rx != ry`
/// it is not the exact line/ellipse intersection, but it always lies on the ellipse and keeps
/// the direction toward the target, which is what arrow anchoring needs.
pub fn boundary_point(center: Point, rx: f64, ry: f64, target: Point) -> Point {
    let theta = (target.y - center.y).atan2(target.x - center.x);
    point(center.x + rx * theta.cos(), center.y + ry * theta.sin())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowStyle {
    pub head_length: f64,
    pub head_angle: f64,
    pub curve_factor: f64,
    pub tangent_t: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self::from(&EdgeTheme::default())
    }
}

impl From<&EdgeTheme> for ArrowStyle {
    fn from(theme: &EdgeTheme) -> Self {
        Self {
            head_length: theme.head_length,
            head_angle: theme.head_angle(),
            curve_factor: theme.curve_factor,
            tangent_t: theme.tangent_t,
        }
    }
}

/// Two barbs from `tip`, spread by `±head_angle` around `back_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowHead {
    pub tip: Point,
    /// Direction from the tip back along the incoming line, in radians.
    pub back_angle: f64,
    pub barbs: [Point; 2],
}

impl ArrowHead {
    pub fn new(tip: Point, back_angle: f64, length: f64, half_angle: f64) -> Self {
        let barb = |angle: f64| point(tip.x + length * angle.cos(), tip.y + length * angle.sin());
        Self {
            tip,
            back_angle,
            barbs: [barb(back_angle - half_angle), barb(back_angle + half_angle)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadraticBezier {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

impl QuadraticBezier {
    pub fn at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        point(
            a * self.from.x + b * self.control.x + c * self.to.x,
            a * self.from.y + b * self.control.y + c * self.to.y,
        )
    }

    pub fn derivative(&self, t: f64) -> Vector {
        let u = 1.0 - t;
        (self.control - self.from) * (2.0 * u) + (self.to - self.control) * (2.0 * t)
    }
}

/// Control point bowed `factor × chord length` away from the chord midpoint, on the side
/// selected by `direction` (`+1`, `-1`, or `0` for the midpoint itself).
///
/// Returns `None` for a zero-length chord.
pub fn control_point(from: Point, to: Point, direction: f64, factor: f64) -> Option<Point> {
    let chord = to - from;
    let length = chord.length();
    if !(length >= MIN_CHORD_LENGTH) {
        return None;
    }
    let mid = from.lerp(to, 0.5);
    let offset = length * factor * direction;
    let perpendicular = vector(-chord.y / length, chord.x / length);
    Some(mid + perpendicular * offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    /// Present for curved arrows.
    pub control: Option<Point>,
    pub head: ArrowHead,
}

impl Arrow {
    pub fn is_curved(&self) -> bool {
        self.control.is_some()
    }

    pub fn curve(&self) -> Option<QuadraticBezier> {
        self.control.map(|control| QuadraticBezier {
            from: self.start,
            control,
            to: self.end,
        })
    }
}

pub fn straight_arrow(from: Point, to: Point, style: &ArrowStyle) -> Option<Arrow> {
    let chord = to - from;
    if !(chord.length() >= MIN_CHORD_LENGTH) {
        return None;
    }
    let back_angle = chord.y.atan2(chord.x) + std::f64::consts::PI;
    Some(Arrow {
        start: from,
        end: to,
        control: None,
        head: ArrowHead::new(to, back_angle, style.head_length, style.head_angle),
    })
}

/// Quadratic arrow from `from` to `to`, bowed to the side picked by `direction`.
///
/// The head follows the tangent near the tip, approximated by the chord from
/// `B(style.tangent_t)` to the end point; the exact derivative at `t = 1` vanishes when the
/// control point coincides with the end.
pub fn curved_arrow(from: Point, to: Point, direction: f64, style: &ArrowStyle) -> Option<Arrow> {
    let control = control_point(from, to, direction, style.curve_factor)?;
    let curve = QuadraticBezier { from, control, to };
    let near_end = curve.at(style.tangent_t);
    let (dx, dy) = (to.x - near_end.x, to.y - near_end.y);
    let back_angle = dy.atan2(dx) + std::f64::consts::PI;
    Some(Arrow {
        start: from,
        end: to,
        control: Some(control),
        head: ArrowHead::new(to, back_angle, style.head_length, style.head_angle),
    })
}

/// Signed distance of `p` from the line through `a` and `b`; positive on the left of `a → b`
/// in a y-down coordinate system.
pub fn side_of_chord(a: Point, b: Point, p: Point) -> f64 {
    let chord = b - a;
    let length = chord.length();
    if length < MIN_CHORD_LENGTH {
        return 0.0;
    }
    chord.cross(p - a) / length
}
