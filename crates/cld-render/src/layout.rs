use crate::geometry::{Arrow, ArrowStyle, boundary_point, curved_arrow, straight_arrow};
use crate::surface::TextStyle;
use crate::text::{TextMeasurer, centered_line_offsets, wrap_words};
use crate::{Error, LayoutOptions, Result};
use cld_core::geom::{Point, Rect, point, rect};
use cld_core::{Diagram, Endpoint, NodeId, Sign, Theme};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let p0 = it.next()?;
        let mut b = Self {
            min_x: p0.x,
            min_y: p0.y,
            max_x: p0.x,
            max_y: p0.y,
        };
        for p in it {
            b.include_point(p);
        }
        Some(b)
    }

    pub fn from_rect(r: &Rect) -> Self {
        Self {
            min_x: r.min_x(),
            min_y: r.min_y(),
            max_x: r.max_x(),
            max_y: r.max_y(),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn to_rect(&self) -> Rect {
        rect(self.min_x, self.min_y, self.width(), self.height())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// A positioned, fully styled piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub at: Point,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: NodeId,
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub fill: String,
    pub label: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignBadge {
    pub center: Point,
    pub radius: f64,
    pub glyph: TextRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub index: usize,
    pub from: NodeId,
    pub to: NodeId,
    pub sign: Sign,
    pub arrow: Arrow,
    pub badge: SignBadge,
    pub label: Option<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopLabelLayout {
    pub tag: String,
    pub title: TextRun,
    pub description: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalloutLayout {
    pub rect: Rect,
    pub border: String,
    pub fill: String,
    pub text: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendLayout {
    pub title: TextRun,
    pub entries: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramLayout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub loops: Vec<LoopLabelLayout>,
    pub callout: Option<CalloutLayout>,
    pub legend: LegendLayout,
    /// Extent of everything drawn, text included as estimated by the layout's measurer.
    pub bounds: Bounds,
    /// The canvas, grown to cover `bounds`.
    pub viewport: Bounds,
}

impl DiagramLayout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.nodes
            .iter()
            .flat_map(|n| n.label.iter())
            .chain(
                self.edges
                    .iter()
                    .flat_map(|e| std::iter::once(&e.badge.glyph).chain(e.label.iter())),
            )
            .chain(
                self.loops
                    .iter()
                    .flat_map(|l| std::iter::once(&l.title).chain(l.description.iter())),
            )
            .chain(self.callout.iter().flat_map(|c| c.text.iter()))
            .chain(std::iter::once(&self.legend.title))
            .chain(self.legend.entries.iter())
    }
}

pub fn layout_diagram(
    diagram: &Diagram,
    theme: &Theme,
    options: &LayoutOptions,
) -> Result<DiagramLayout> {
    theme.validate()?;
    let measurer = options.text_measurer.as_ref();

    let nodes = layout_nodes(diagram, theme);
    let edges = layout_edges(diagram, theme)?;
    let loops = layout_loops(diagram, theme);
    let callout = layout_callout(diagram, theme);
    let legend = layout_legend(diagram, theme);

    let size = diagram.canvas();
    let canvas = Bounds::from_rect(&rect(0.0, 0.0, size.width, size.height));
    let mut layout = DiagramLayout {
        nodes,
        edges,
        loops,
        callout,
        legend,
        bounds: canvas,
        viewport: canvas,
    };
    if let Some(bounds) = content_bounds(&layout, theme, measurer) {
        layout.bounds = bounds;
        layout.viewport = canvas.union(&bounds);
    }

    tracing::debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        width = layout.viewport.width(),
        height = layout.viewport.height(),
        "diagram laid out"
    );
    Ok(layout)
}

fn layout_nodes(diagram: &Diagram, theme: &Theme) -> Vec<NodeLayout> {
    let nt = &theme.node;
    diagram
        .nodes()
        .map(|node| {
            let (rx, ry) = node.radii(nt);
            let lines = wrap_words(node.label(), nt.wrap_width);
            let ys = centered_line_offsets(lines.len(), node.y, nt.line_height);
            let style = TextStyle::centered(nt.font.clone(), nt.text_color.clone());
            let label = lines
                .into_iter()
                .zip(ys)
                .map(|(text, y)| TextRun {
                    text,
                    at: point(node.x, y),
                    style: style.clone(),
                })
                .collect();
            NodeLayout {
                id: node.id.clone(),
                center: node.center(),
                rx,
                ry,
                fill: node.fill.clone().unwrap_or_else(|| nt.default_fill.clone()),
                label,
            }
        })
        .collect()
}

fn layout_edges(diagram: &Diagram, theme: &Theme) -> Result<Vec<EdgeLayout>> {
    let style = ArrowStyle::from(&theme.edge);
    let st = &theme.sign;

    let mut out = Vec::with_capacity(diagram.edges().len());
    for (index, edge) in diagram.edges().iter().enumerate() {
        let Some((from, to)) = diagram.endpoints(edge) else {
            let (endpoint, id) = if diagram.node(edge.from.as_str()).is_none() {
                (Endpoint::Source, &edge.from)
            } else {
                (Endpoint::Target, &edge.to)
            };
            return Err(cld_core::Error::DanglingEdge {
                index,
                endpoint,
                id: id.to_string(),
            }
            .into());
        };
        let (from_rx, from_ry) = from.radii(&theme.node);
        let (to_rx, to_ry) = to.radii(&theme.node);
        let (from_c, to_c) = (from.center(), to.center());

        let start = boundary_point(from_c, from_rx, from_ry, to_c);
        let end = boundary_point(to_c, to_rx, to_ry, from_c);
        let arrow = if edge.is_curved() {
            curved_arrow(start, end, edge.curve_direction(), &style)
        } else {
            straight_arrow(start, end, &style)
        };
        let Some(arrow) = arrow else {
            return Err(Error::DegenerateGeometry {
                index,
                from: edge.from.to_string(),
                to: edge.to.to_string(),
            });
        };
        tracing::debug!(
            index,
            from = %edge.from,
            to = %edge.to,
            curved = arrow.is_curved(),
            back_angle = arrow.head.back_angle,
            "edge arrow placed"
        );

        let mid = from_c.lerp(to_c, 0.5);
        let badge_center = point(mid.x, mid.y + st.badge_offset_y);
        let badge = SignBadge {
            center: badge_center,
            radius: st.badge_radius,
            glyph: TextRun {
                text: edge.sign.glyph().to_string(),
                at: badge_center,
                style: TextStyle::centered(st.font.clone(), st.color(edge.sign)),
            },
        };
        let label = edge.label.as_ref().map(|text| TextRun {
            text: text.clone(),
            at: point(mid.x, mid.y + st.label_offset_y),
            style: TextStyle::centered(st.label_font.clone(), st.label_color.clone()),
        });

        out.push(EdgeLayout {
            index,
            from: edge.from.clone(),
            to: edge.to.clone(),
            sign: edge.sign,
            arrow,
            badge,
            label,
        });
    }
    Ok(out)
}

fn layout_loops(diagram: &Diagram, theme: &Theme) -> Vec<LoopLabelLayout> {
    let at = &theme.annotation;
    diagram
        .loops()
        .iter()
        .map(|l| {
            let first = l.y + at.loop_description_offset;
            let description = l
                .description
                .iter()
                .enumerate()
                .map(|(i, line)| TextRun {
                    text: line.clone(),
                    at: point(l.x, first + i as f64 * at.loop_line_height),
                    style: TextStyle::centered(
                        at.loop_description_font.clone(),
                        at.loop_description_color.clone(),
                    ),
                })
                .collect();
            LoopLabelLayout {
                tag: l.tag(),
                title: TextRun {
                    text: l.heading(),
                    at: point(l.x, l.y),
                    style: TextStyle::centered(at.loop_title_font.clone(), l.color.clone()),
                },
                description,
            }
        })
        .collect()
}

fn layout_callout(diagram: &Diagram, theme: &Theme) -> Option<CalloutLayout> {
    let at = &theme.annotation;
    let c = diagram.callout()?;
    let cx = c.center_x();
    let mut text = Vec::with_capacity(c.lines.len() + 1);
    text.push(TextRun {
        text: c.heading.clone(),
        at: point(cx, c.y + at.callout_heading_offset),
        style: TextStyle::centered(
            at.callout_heading_font.clone(),
            at.callout_text_color.clone(),
        ),
    });
    for (i, line) in c.lines.iter().enumerate() {
        text.push(TextRun {
            text: line.clone(),
            at: point(
                cx,
                c.y + at.callout_heading_offset + (i + 1) as f64 * at.callout_line_height,
            ),
            style: TextStyle::centered(at.callout_font.clone(), at.callout_text_color.clone()),
        });
    }
    Some(CalloutLayout {
        rect: c.rect(),
        border: c.border.clone(),
        fill: c.fill.clone(),
        text,
    })
}

fn layout_legend(diagram: &Diagram, theme: &Theme) -> LegendLayout {
    let at = &theme.annotation;
    let legend = diagram.legend();
    let mut y = legend.y + at.legend_first_offset;
    let mut entries = Vec::new();
    for sign in Sign::ALL {
        entries.push(TextRun {
            text: format!("{} {}", sign.glyph(), sign.description()),
            at: point(legend.x, y),
            style: TextStyle::left(at.legend_font.clone(), theme.sign.color(sign)),
        });
        y += at.legend_line_height;
    }
    y += at.legend_section_gap;
    for l in diagram.loops() {
        entries.push(TextRun {
            text: l.legend_line(),
            at: point(legend.x, y),
            style: TextStyle::left(at.legend_font.clone(), at.legend_color.clone()),
        });
        y += at.legend_line_height;
    }
    LegendLayout {
        title: TextRun {
            text: legend.title.clone(),
            at: point(legend.x, legend.y),
            style: TextStyle::left(at.legend_title_font.clone(), at.legend_color.clone()),
        },
        entries,
    }
}

fn text_bounds(run: &TextRun, measurer: &dyn TextMeasurer) -> Bounds {
    use crate::surface::{TextAlign, TextBaseline};

    let m = measurer.measure(&run.text, &run.style.font);
    let min_x = match run.style.align {
        TextAlign::Start => run.at.x,
        TextAlign::Center => run.at.x - m.width / 2.0,
        TextAlign::End => run.at.x - m.width,
    };
    let min_y = match run.style.baseline {
        TextBaseline::Top => run.at.y,
        TextBaseline::Middle => run.at.y - m.height / 2.0,
        TextBaseline::Alphabetic => run.at.y - m.height * 0.8,
    };
    Bounds {
        min_x,
        min_y,
        max_x: min_x + m.width,
        max_y: min_y + m.height,
    }
}

fn content_bounds(
    layout: &DiagramLayout,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> Option<Bounds> {
    let node_pad = theme.node.stroke_width / 2.0;
    let edge_pad = theme.edge.stroke_width / 2.0;

    let mut points: Vec<Point> = Vec::new();
    for n in &layout.nodes {
        let (rx, ry) = (n.rx + node_pad, n.ry + node_pad);
        points.push(point(n.center.x - rx, n.center.y - ry));
        points.push(point(n.center.x + rx, n.center.y + ry));
    }
    for e in &layout.edges {
        let a = &e.arrow;
        match a.curve() {
            Some(curve) => points.extend((0..=16).map(|i| curve.at(i as f64 / 16.0))),
            None => points.extend([a.start, a.end]),
        }
        points.extend(a.head.barbs);
        let r = e.badge.radius;
        points.push(point(e.badge.center.x - r, e.badge.center.y - r));
        points.push(point(e.badge.center.x + r, e.badge.center.y + r));
    }
    if let Some(c) = &layout.callout {
        let pad = theme.annotation.callout_stroke_width / 2.0;
        points.push(point(c.rect.min_x() - pad, c.rect.min_y() - pad));
        points.push(point(c.rect.max_x() + pad, c.rect.max_y() + pad));
    }

    let mut bounds = Bounds::from_points(points)?;
    bounds.min_x -= edge_pad;
    bounds.min_y -= edge_pad;
    bounds.max_x += edge_pad;
    bounds.max_y += edge_pad;
    for run in layout.text_runs() {
        bounds = bounds.union(&text_bounds(run, measurer));
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cld_core::dataset;

    #[test]
    fn bounds_grow_to_cover_points() {
        let b = Bounds::from_points([point(3.0, 4.0), point(-1.0, 10.0), point(2.0, -2.0)])
            .unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-1.0, -2.0, 3.0, 10.0));
        assert_eq!(b.to_rect(), rect(-1.0, -2.0, 4.0, 12.0));
        assert!(Bounds::from_points(std::iter::empty()).is_none());

        let other = Bounds::from_rect(&rect(0.0, 0.0, 20.0, 1.0));
        let u = b.union(&other);
        assert_eq!((u.min_x, u.max_x, u.max_y), (-1.0, 20.0, 10.0));
    }

    #[test]
    fn bounds_cover_every_shape() {
        let diagram = dataset::drifting_goals().unwrap();
        let theme = Theme::default();
        let layout = layout_diagram(&diagram, &theme, &LayoutOptions::default()).unwrap();
        for n in &layout.nodes {
            assert!(layout.bounds.contains(point(n.center.x - n.rx, n.center.y - n.ry)));
            assert!(layout.bounds.contains(point(n.center.x + n.rx, n.center.y + n.ry)));
        }
        for e in &layout.edges {
            assert!(layout.bounds.contains(e.arrow.start));
            assert!(e.arrow.head.barbs.iter().all(|b| layout.bounds.contains(*b)));
        }
        let callout = layout.callout.as_ref().unwrap();
        assert!(layout.bounds.contains(callout.rect.max()));
    }

    #[test]
    fn node_labels_are_centered_on_the_node() {
        let diagram = dataset::drifting_goals().unwrap();
        let layout =
            layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).unwrap();
        let program = layout.node(dataset::AFFORDABLE_HOUSING_PROGRAM).unwrap();
        let lines: Vec<_> = program.label.iter().map(|r| (r.text.as_str(), r.at.y)).collect();
        assert_eq!(lines, [("Affordable Housing", 414.0), ("Program", 426.0)]);
        assert_eq!(program.fill, "#90EE90");
        assert_eq!(program.rx, 26.0 * 3.5);
    }

    #[test]
    fn loop_and_callout_text_positions() {
        let diagram = dataset::drifting_goals().unwrap();
        let layout =
            layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).unwrap();
        let b1 = &layout.loops[0];
        assert_eq!(b1.tag, "B1");
        assert_eq!(b1.title.at, point(400.0, 140.0));
        let ys: Vec<f64> = b1.description.iter().map(|r| r.at.y).collect();
        assert_eq!(ys, [156.0, 170.0]);

        let callout = layout.callout.as_ref().unwrap();
        let ys: Vec<f64> = callout.text.iter().map(|r| r.at.y).collect();
        assert_eq!(ys, [305.0, 320.0, 335.0]);
        assert!(callout.text.iter().all(|r| r.at.x == 650.0));
    }
}
