//! Issues the draw calls for a laid-out diagram.
//!
//! Paint order is fixed: node ellipses, arrows, sign badges and edge labels, loop labels, the
//! callout box, then the legend on top.

use crate::geometry::Arrow;
use crate::layout::{DiagramLayout, TextRun};
use crate::surface::{Ellipse, Fill, Path, Stroke, Surface};
use cld_core::Theme;

pub const GROUP_NODES: &str = "nodes";
pub const GROUP_EDGES: &str = "edges";
pub const GROUP_SIGNS: &str = "signs";
pub const GROUP_LOOPS: &str = "loops";
pub const GROUP_CALLOUT: &str = "callout";
pub const GROUP_LEGEND: &str = "legend";

pub fn render(layout: &DiagramLayout, theme: &Theme, surface: &mut dyn Surface) {
    surface.begin_group(GROUP_NODES);
    let node_stroke = Stroke::new(theme.node.stroke.clone(), theme.node.stroke_width);
    for node in &layout.nodes {
        let ellipse = Ellipse {
            center: node.center,
            rx: node.rx,
            ry: node.ry,
        };
        surface.fill_ellipse(&ellipse, &Fill::new(node.fill.clone()));
        surface.stroke_ellipse(&ellipse, &node_stroke);
        draw_runs(surface, &node.label);
    }
    surface.end_group();

    surface.begin_group(GROUP_EDGES);
    let edge_stroke = Stroke::new(theme.edge.stroke.clone(), theme.edge.stroke_width);
    for edge in &layout.edges {
        surface.stroke_path(&arrow_path(&edge.arrow), &edge_stroke);
    }
    surface.end_group();

    surface.begin_group(GROUP_SIGNS);
    let badge_fill = Fill::new(theme.sign.badge_fill.clone());
    for edge in &layout.edges {
        surface.fill_ellipse(
            &Ellipse::circle(edge.badge.center, edge.badge.radius),
            &badge_fill,
        );
        draw_run(surface, &edge.badge.glyph);
        if let Some(label) = &edge.label {
            draw_run(surface, label);
        }
    }
    surface.end_group();

    surface.begin_group(GROUP_LOOPS);
    for l in &layout.loops {
        draw_run(surface, &l.title);
        draw_runs(surface, &l.description);
    }
    surface.end_group();

    if let Some(callout) = &layout.callout {
        surface.begin_group(GROUP_CALLOUT);
        surface.stroke_rect(
            &callout.rect,
            &Stroke::new(
                callout.border.clone(),
                theme.annotation.callout_stroke_width,
            ),
        );
        surface.fill_rect(
            &callout.rect.inflate(-1.0, -1.0),
            &Fill::new(callout.fill.clone()),
        );
        draw_runs(surface, &callout.text);
        surface.end_group();
    }

    surface.begin_group(GROUP_LEGEND);
    draw_run(surface, &layout.legend.title);
    draw_runs(surface, &layout.legend.entries);
    surface.end_group();

    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        loops = layout.loops.len(),
        callout = layout.callout.is_some(),
        "diagram rendered"
    );
}

/// Shaft plus both barbs as a single path with three subpaths.
pub fn arrow_path(arrow: &Arrow) -> Path {
    let shaft = Path::new().move_to(arrow.start);
    let shaft = match arrow.control {
        Some(control) => shaft.quad_to(control, arrow.end),
        None => shaft.line_to(arrow.end),
    };
    let [left, right] = arrow.head.barbs;
    shaft
        .move_to(arrow.head.tip)
        .line_to(left)
        .move_to(arrow.head.tip)
        .line_to(right)
}

fn draw_run(surface: &mut dyn Surface, run: &TextRun) {
    surface.fill_text(&run.text, run.at, &run.style);
}

fn draw_runs(surface: &mut dyn Surface, runs: &[TextRun]) {
    for run in runs {
        draw_run(surface, run);
    }
}
