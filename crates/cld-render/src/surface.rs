//! Immediate-mode drawing targets.
//!
//! Every call carries its own style; a surface never inherits fill, stroke or font state from
//! an earlier call.

use cld_core::geom::{Point, Rect};
use cld_core::theme::Font;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn quad_to(mut self, control: Point, to: Point) -> Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Number of `MoveTo`-started pieces.
    pub fn subpath_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::MoveTo(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: String,
}

impl Fill {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn circle(center: Point, r: f64) -> Self {
        Self { center, rx: r, ry: r }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Alphabetic,
    #[default]
    Middle,
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub color: String,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn centered(font: Font, color: impl Into<String>) -> Self {
        Self {
            font,
            color: color.into(),
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }

    pub fn left(font: Font, color: impl Into<String>) -> Self {
        Self {
            align: TextAlign::Start,
            ..Self::centered(font, color)
        }
    }
}

pub trait Surface {
    /// Opens a named group; groups nest and must be closed in order.
    fn begin_group(&mut self, class: &str);
    fn end_group(&mut self);

    fn fill_path(&mut self, path: &Path, fill: &Fill);
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);
    fn fill_ellipse(&mut self, ellipse: &Ellipse, fill: &Fill);
    fn stroke_ellipse(&mut self, ellipse: &Ellipse, stroke: &Stroke);
    fn fill_rect(&mut self, rect: &Rect, fill: &Fill);
    fn stroke_rect(&mut self, rect: &Rect, stroke: &Stroke);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    FillPath(Path, Fill),
    StrokePath(Path, Stroke),
    FillEllipse(Ellipse, Fill),
    StrokeEllipse(Ellipse, Stroke),
    FillRect(Rect, Fill),
    StrokeRect(Rect, Stroke),
    FillText {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// A recorded draw call together with the group classes open when it was issued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub groups: Vec<String>,
    pub op: DrawOp,
}

impl DrawCommand {
    pub fn in_group(&self, class: &str) -> bool {
        self.groups.iter().any(|g| g == class)
    }
}

/// Display-list surface: keeps every call for later inspection or replay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    stack: Vec<String>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Commands issued while a group with `class` was open.
    pub fn in_group<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.commands.iter().filter(move |c| c.in_group(class))
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.commands.clear();
    }

    /// Re-issues every recorded command on another surface, groups included.
    pub fn replay(&self, target: &mut dyn Surface) {
        let mut open: Vec<&str> = Vec::new();
        for command in &self.commands {
            let common = open
                .iter()
                .zip(command.groups.iter())
                .take_while(|(a, b)| **a == b.as_str())
                .count();
            while open.len() > common {
                target.end_group();
                open.pop();
            }
            for class in &command.groups[common..] {
                target.begin_group(class);
                open.push(class.as_str());
            }
            match &command.op {
                DrawOp::FillPath(path, fill) => target.fill_path(path, fill),
                DrawOp::StrokePath(path, stroke) => target.stroke_path(path, stroke),
                DrawOp::FillEllipse(ellipse, fill) => target.fill_ellipse(ellipse, fill),
                DrawOp::StrokeEllipse(ellipse, stroke) => target.stroke_ellipse(ellipse, stroke),
                DrawOp::FillRect(rect, fill) => target.fill_rect(rect, fill),
                DrawOp::StrokeRect(rect, stroke) => target.stroke_rect(rect, stroke),
                DrawOp::FillText { text, at, style } => target.fill_text(text, *at, style),
            }
        }
        for _ in open {
            target.end_group();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.commands.push(DrawCommand {
            groups: self.stack.clone(),
            op,
        });
    }
}

impl Surface for RecordingSurface {
    fn begin_group(&mut self, class: &str) {
        self.stack.push(class.to_string());
    }

    fn end_group(&mut self) {
        self.stack.pop();
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        self.push(DrawOp::FillPath(path.clone(), fill.clone()));
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.push(DrawOp::StrokePath(path.clone(), stroke.clone()));
    }

    fn fill_ellipse(&mut self, ellipse: &Ellipse, fill: &Fill) {
        self.push(DrawOp::FillEllipse(*ellipse, fill.clone()));
    }

    fn stroke_ellipse(&mut self, ellipse: &Ellipse, stroke: &Stroke) {
        self.push(DrawOp::StrokeEllipse(*ellipse, stroke.clone()));
    }

    fn fill_rect(&mut self, rect: &Rect, fill: &Fill) {
        self.push(DrawOp::FillRect(*rect, fill.clone()));
    }

    fn stroke_rect(&mut self, rect: &Rect, stroke: &Stroke) {
        self.push(DrawOp::StrokeRect(*rect, stroke.clone()));
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.push(DrawOp::FillText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }
}
