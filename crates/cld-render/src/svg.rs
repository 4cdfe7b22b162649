use crate::layout::Bounds;
use crate::surface::{
    Ellipse, Fill, Path, PathSegment, Stroke, Surface, TextAlign, TextBaseline, TextStyle,
};
use cld_core::geom::{Point, Rect};
use cld_core::theme::{FontSlant, FontWeight};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Root `<svg id="...">`; defaults to `cld`.
    pub diagram_id: Option<String>,
    /// Page background. Falls back to the theme's canvas background when `None`.
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            diagram_id: None,
            background: None,
        }
    }
}

/// Streams draw calls into an SVG document.
pub struct SvgSurface {
    out: String,
    open_groups: usize,
}

impl SvgSurface {
    pub fn new(viewport: &Bounds, options: &SvgRenderOptions, background: Option<&str>) -> Self {
        let pad = options.viewbox_padding.max(0.0);
        let min_x = viewport.min_x - pad;
        let min_y = viewport.min_y - pad;
        let w = (viewport.width() + 2.0 * pad).max(1.0);
        let h = (viewport.height() + 2.0 * pad).max(1.0);
        let id = options.diagram_id.as_deref().unwrap_or("cld");

        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="causal-loop">"#,
            id = escape_xml(id),
            x = fmt(min_x),
            y = fmt(min_y),
            w = fmt(w),
            h = fmt(h),
        );
        if let Some(bg) = background {
            let _ = write!(
                &mut out,
                r#"<rect class="background" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
                x = fmt(min_x),
                y = fmt(min_y),
                w = fmt(w),
                h = fmt(h),
                fill = escape_xml(bg),
            );
        }
        Self {
            out,
            open_groups: 0,
        }
    }

    /// Closes any groups left open and the root element.
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.end_group();
        }
        self.out.push_str("</svg>\n");
        self.out
    }

    fn push_stroke_attrs(&mut self, stroke: &Stroke) {
        let _ = write!(
            &mut self.out,
            r#" fill="none" stroke="{color}" stroke-width="{width}""#,
            color = escape_xml(&stroke.color),
            width = fmt(stroke.width),
        );
    }

    fn push_fill_attrs(&mut self, fill: &Fill) {
        let _ = write!(
            &mut self.out,
            r#" fill="{color}" stroke="none""#,
            color = escape_xml(&fill.color),
        );
    }

    fn open_path(&mut self, path: &Path) {
        let _ = write!(&mut self.out, r#"<path d="{}""#, path_data(path));
    }

    fn open_ellipse(&mut self, e: &Ellipse) {
        if e.rx == e.ry {
            let _ = write!(
                &mut self.out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt(e.center.x),
                fmt(e.center.y),
                fmt(e.rx)
            );
        } else {
            let _ = write!(
                &mut self.out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                fmt(e.center.x),
                fmt(e.center.y),
                fmt(e.rx),
                fmt(e.ry)
            );
        }
    }

    fn open_rect(&mut self, r: &Rect) {
        let _ = write!(
            &mut self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            fmt(r.origin.x),
            fmt(r.origin.y),
            fmt(r.size.width),
            fmt(r.size.height)
        );
    }
}

impl Surface for SvgSurface {
    fn begin_group(&mut self, class: &str) {
        let _ = write!(&mut self.out, r#"<g class="{}">"#, escape_xml(class));
        self.open_groups += 1;
    }

    fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.out.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        self.open_path(path);
        self.push_fill_attrs(fill);
        self.out.push_str("/>");
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.open_path(path);
        self.push_stroke_attrs(stroke);
        self.out.push_str("/>");
    }

    fn fill_ellipse(&mut self, ellipse: &Ellipse, fill: &Fill) {
        self.open_ellipse(ellipse);
        self.push_fill_attrs(fill);
        self.out.push_str("/>");
    }

    fn stroke_ellipse(&mut self, ellipse: &Ellipse, stroke: &Stroke) {
        self.open_ellipse(ellipse);
        self.push_stroke_attrs(stroke);
        self.out.push_str("/>");
    }

    fn fill_rect(&mut self, rect: &Rect, fill: &Fill) {
        self.open_rect(rect);
        self.push_fill_attrs(fill);
        self.out.push_str("/>");
    }

    fn stroke_rect(&mut self, rect: &Rect, stroke: &Stroke) {
        self.open_rect(rect);
        self.push_stroke_attrs(stroke);
        self.out.push_str("/>");
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
            TextAlign::End => "end",
        };
        let baseline = match style.baseline {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
            TextBaseline::Top => "hanging",
        };
        let _ = write!(
            &mut self.out,
            r#"<text x="{x}" y="{y}" text-anchor="{anchor}" dominant-baseline="{baseline}" font-family="{family}" font-size="{size}""#,
            x = fmt(at.x),
            y = fmt(at.y),
            family = escape_xml(&style.font.family),
            size = fmt(style.font.size),
        );
        if style.font.weight == FontWeight::Bold {
            self.out.push_str(r#" font-weight="bold""#);
        }
        if style.font.slant == FontSlant::Italic {
            self.out.push_str(r#" font-style="italic""#);
        }
        let _ = write!(
            &mut self.out,
            r#" fill="{}">{}</text>"#,
            escape_xml(&style.color),
            escape_xml(text)
        );
    }
}

pub fn path_data(path: &Path) -> String {
    let mut out = String::new();
    for segment in &path.segments {
        match segment {
            PathSegment::MoveTo(p) => {
                let _ = write!(&mut out, "M{},{}", fmt_path(p.x), fmt_path(p.y));
            }
            PathSegment::LineTo(p) => {
                let _ = write!(&mut out, "L{},{}", fmt_path(p.x), fmt_path(p.y));
            }
            PathSegment::QuadTo { control, to } => {
                let _ = write!(
                    &mut out,
                    "Q{},{},{},{}",
                    fmt_path(control.x),
                    fmt_path(control.y),
                    fmt_path(to.x),
                    fmt_path(to.y)
                );
            }
            PathSegment::Close => out.push('Z'),
        }
    }
    out
}

/// Round-trippable decimal without `-0` and tiny float noise.
pub fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }
    format!("{v}")
}

/// Path coordinates with at most three fractional digits.
pub fn fmt_path(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", (v * 1000.0).round() / 1000.0);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cld_core::geom::point;

    #[test]
    fn fmt_drops_float_noise() {
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(0.30000000000000004), "0.30000000000000004");
        assert_eq!(fmt(4.9999999999), "5");
    }

    #[test]
    fn fmt_path_keeps_three_digits() {
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-0.0001), "0");
        assert_eq!(fmt_path(10.5), "10.5");
    }

    #[test]
    fn path_data_uses_absolute_commands() {
        let path = Path::new()
            .move_to(point(0.0, 0.0))
            .quad_to(point(5.0, 5.0), point(10.0, 0.0))
            .line_to(point(10.0, 10.0))
            .close();
        assert_eq!(path_data(&path), "M0,0Q5,5,10,0L10,10Z");
    }

    #[test]
    fn text_is_escaped() {
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
        let mut svg = SvgSurface::new(&bounds, &SvgRenderOptions::default(), None);
        svg.fill_text(
            "quick fix & real solution",
            point(1.0, 2.0),
            &TextStyle::centered(cld_core::Font::regular(10.0), "#333"),
        );
        let out = svg.finish();
        assert!(out.contains(">quick fix &amp; real solution</text>"));
        assert!(out.ends_with("</svg>\n"));
    }

    #[test]
    fn unclosed_groups_are_closed_on_finish() {
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
        let mut svg = SvgSurface::new(&bounds, &SvgRenderOptions::default(), Some("white"));
        svg.begin_group("outer");
        svg.begin_group("inner");
        let out = svg.finish();
        assert!(out.ends_with("<g class=\"outer\"><g class=\"inner\"></g></g></svg>\n"));
        assert!(out.contains(r#"fill="white""#));
        assert!(out.contains(r#"viewBox="-8 -8 26 26""#));
    }
}
