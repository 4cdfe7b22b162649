use cld_core::dataset::{self, HOMELESSNESS_PRESENCE, TEMPORARY_SHELTERS};
use cld_core::geom::point;
use cld_core::{Diagram, Edge, Node, Sign, Theme};
use cld_render::geometry::boundary_point;
use cld_render::render::{GROUP_EDGES, GROUP_LEGEND, GROUP_NODES, render};
use cld_render::surface::{DrawOp, PathSegment, RecordingSurface};
use cld_render::svg::{SvgRenderOptions, SvgSurface};
use cld_render::{Error, LayoutOptions, layout_diagram, render_layout_svg, render_svg};

fn recorded(diagram: &Diagram, theme: &Theme) -> RecordingSurface {
    let layout = layout_diagram(diagram, theme, &LayoutOptions::default()).expect("layout ok");
    let mut surface = RecordingSurface::new();
    render(&layout, theme, &mut surface);
    surface
}

#[test]
fn draws_seven_node_fills_and_eight_arrow_strokes() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let surface = recorded(&diagram, &Theme::default());

    let fills = surface
        .in_group(GROUP_NODES)
        .filter(|c| matches!(c.op, DrawOp::FillEllipse(..)))
        .count();
    let strokes = surface
        .in_group(GROUP_EDGES)
        .filter(|c| matches!(c.op, DrawOp::StrokePath(..)))
        .count();
    assert_eq!(fills, 7);
    assert_eq!(strokes, 8);
}

#[test]
fn arrowheads_sit_on_the_target_outline() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let theme = Theme::default();
    let surface = recorded(&diagram, &theme);

    let paths: Vec<_> = surface
        .in_group(GROUP_EDGES)
        .filter_map(|c| match &c.op {
            DrawOp::StrokePath(path, _) => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), diagram.edges().len());

    for (edge, path) in diagram.edges().iter().zip(paths) {
        let (from, to) = diagram.endpoints(edge).expect("endpoints");
        let (rx, ry) = to.radii(&theme.node);
        let want = boundary_point(to.center(), rx, ry, from.center());

        let tip = match path.segments[1] {
            PathSegment::LineTo(p) => p,
            PathSegment::QuadTo { to, .. } => to,
            other => panic!("unexpected shaft segment {other:?}"),
        };
        assert!((tip - want).length() < 1e-9, "{} -> {}", edge.from, edge.to);
        assert!((tip - to.center()).length() > ry - 1e-9);
        assert_eq!(path.segments[2], PathSegment::MoveTo(tip));
        assert_eq!(path.segments[4], PathSegment::MoveTo(tip));
    }
}

#[test]
fn only_the_shelter_feedback_edge_is_curved() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let layout =
        layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).expect("layout ok");
    let curved: Vec<_> = layout.edges.iter().filter(|e| e.arrow.is_curved()).collect();
    assert_eq!(curved.len(), 1);
    assert_eq!(curved[0].from.as_str(), TEMPORARY_SHELTERS);
    assert_eq!(curved[0].to.as_str(), HOMELESSNESS_PRESENCE);
    assert_eq!(
        curved[0].label.as_ref().map(|l| l.text.as_str()),
        Some("short-term")
    );
}

#[test]
fn badges_and_labels_hang_off_the_center_midpoint() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let layout =
        layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).expect("layout ok");
    // Temporary Shelters (650, 80) -> Homelessness Presence (150, 250).
    let edge = &layout.edges[3];
    assert_eq!(edge.badge.center, point(400.0, 160.0));
    assert_eq!(edge.badge.glyph.text, "\u{2013}");
    assert_eq!(edge.badge.glyph.style.color, "red");
    assert_eq!(
        edge.label.as_ref().map(|l| l.at),
        Some(point(400.0, 177.0))
    );
}

#[test]
fn legend_lists_signs_then_loops() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let surface = recorded(&diagram, &Theme::default());
    let texts: Vec<(String, f64)> = surface
        .in_group(GROUP_LEGEND)
        .filter_map(|c| match &c.op {
            DrawOp::FillText { text, at, .. } => Some((text.clone(), at.y)),
            _ => None,
        })
        .collect();

    assert_eq!(texts.len(), 5);
    assert_eq!(texts[0], ("Legend:".to_string(), 560.0));
    assert!(texts[1].0.starts_with("+ Positive relationship"));
    assert_eq!(texts[1].1, 580.0);
    assert!(texts[2].0.starts_with("\u{2013} Negative relationship"));
    assert_eq!(texts[2].1, 598.0);
    assert!(texts[3].0.starts_with("B1: Balancing loop"));
    assert_eq!(texts[3].1, 620.0);
    assert!(texts[4].0.starts_with("R1: Reinforcing loop"));
    assert_eq!(texts[4].1, 638.0);
}

#[test]
fn rendering_is_idempotent() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let theme = Theme::default();
    let opts = SvgRenderOptions::default();
    let a = render_svg(&diagram, &theme, &opts).expect("render ok");
    let b = render_svg(&diagram, &theme, &opts).expect("render ok");
    assert_eq!(a, b);
}

#[test]
fn replaying_a_recording_reproduces_the_svg() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let theme = Theme::default();
    let opts = SvgRenderOptions::default();
    let layout = layout_diagram(&diagram, &theme, &LayoutOptions::default()).expect("layout ok");

    let direct = render_layout_svg(&layout, &theme, &opts);

    let mut recording = RecordingSurface::new();
    render(&layout, &theme, &mut recording);
    let mut svg = SvgSurface::new(&layout.viewport, &opts, theme.canvas.background.as_deref());
    recording.replay(&mut svg);
    assert_eq!(svg.finish(), direct);
}

#[test]
fn svg_parses_and_groups_primitives() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let svg = render_svg(&diagram, &Theme::default(), &SvgRenderOptions::default())
        .expect("render ok");
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    let group = |class: &str| {
        doc.descendants()
            .find(|n| n.has_tag_name("g") && n.attribute("class") == Some(class))
            .unwrap_or_else(|| panic!("missing group {class}"))
    };
    let node_fills = group("nodes")
        .children()
        .filter(|n| n.has_tag_name("ellipse") && n.attribute("stroke") == Some("none"))
        .count();
    assert_eq!(node_fills, 7);
    assert_eq!(
        group("edges")
            .children()
            .filter(|n| n.has_tag_name("path"))
            .count(),
        8
    );
    assert!(
        doc.descendants()
            .any(|n| n.has_tag_name("text") && n.text() == Some("DRIFTING GOALS KEY:"))
    );
    assert!(
        doc.descendants()
            .any(|n| n.text() == Some("choice between quick fix & real solution"))
    );
}

#[test]
fn viewport_covers_the_canvas() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let layout =
        layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).expect("layout ok");
    assert!(layout.viewport.min_x <= 0.0 && layout.viewport.min_y <= 0.0);
    assert!(layout.viewport.max_x >= 800.0 && layout.viewport.max_y >= 660.0);
    assert!(layout.viewport.width() >= layout.bounds.width());
}

#[test]
fn layout_serializes_to_json() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let layout =
        layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default()).expect("layout ok");
    let value = serde_json::to_value(&layout).expect("serialize");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(7));
    assert_eq!(value["edges"].as_array().map(Vec::len), Some(8));
    assert_eq!(value["edges"][0]["sign"], "positive");
}

#[test]
fn touching_outlines_are_degenerate() {
    // Both radii are 55, so the boundary points meet at x = 55.
    let diagram = Diagram::builder()
        .node(Node::new("Alpha", 0.0, 0.0))
        .node(Node::new("Beta", 110.0, 0.0))
        .edge(Edge::new("Alpha", "Beta", Sign::Positive))
        .build()
        .expect("valid tables");
    let err = layout_diagram(&diagram, &Theme::default(), &LayoutOptions::default())
        .expect_err("zero-length chord");
    assert!(matches!(err, Error::DegenerateGeometry { index: 0, .. }));
}

#[test]
fn theme_overrides_reach_the_layout() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let theme = Theme::default()
        .with_overrides(&serde_json::json!({ "edge": { "head_length": 20.0 } }))
        .expect("valid override");
    let layout = layout_diagram(&diagram, &theme, &LayoutOptions::default()).expect("layout ok");
    let head = &layout.edges[0].arrow.head;
    assert!(((head.barbs[0] - head.tip).length() - 20.0).abs() < 1e-9);

    let mut broken = Theme::default();
    broken.edge.tangent_t = 1.0;
    let err = layout_diagram(&diagram, &broken, &LayoutOptions::default())
        .expect_err("tangent_t must be below 1");
    assert!(matches!(err, Error::Core(cld_core::Error::Theme { .. })));
}
