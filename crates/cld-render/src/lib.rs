#![forbid(unsafe_code)]
//! Layout and drawing for causal-loop diagrams.
//!
//! [`layout_diagram`] turns a validated [`cld_core::Diagram`] into positioned primitives,
//! [`render::render`] replays them onto any [`surface::Surface`], and [`render_svg`] wires both
//! to the SVG surface.

pub mod geometry;
pub mod layout;
pub mod render;
pub mod surface;
pub mod svg;
pub mod text;

pub use layout::{DiagramLayout, layout_diagram};

use crate::svg::{SvgRenderOptions, SvgSurface};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use cld_core::{Diagram, Theme};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cld_core::Error),
    #[error("edge #{index} from \"{from}\" to \"{to}\" has a zero-length chord")]
    DegenerateGeometry {
        index: usize,
        from: String,
        to: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

/// Emits an already computed layout as an SVG document.
pub fn render_layout_svg(layout: &DiagramLayout, theme: &Theme, options: &SvgRenderOptions) -> String {
    let background = options
        .background
        .as_deref()
        .or(theme.canvas.background.as_deref());
    let mut surface = SvgSurface::new(&layout.viewport, options, background);
    render::render(layout, theme, &mut surface);
    surface.finish()
}

pub fn render_svg(diagram: &Diagram, theme: &Theme, options: &SvgRenderOptions) -> Result<String> {
    let layout = layout_diagram(diagram, theme, &LayoutOptions::default())?;
    Ok(render_layout_svg(&layout, theme, options))
}
