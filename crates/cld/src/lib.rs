#![forbid(unsafe_code)]

//! `cld` renders causal-loop diagrams headlessly.
//!
//! The diagram tables live in [`cld_core`]; arrow geometry, layout and SVG output live in
//! [`cld_render`]. This crate re-exports both and bundles them behind [`render::HeadlessRenderer`].
//!
//! # Features
//!
//! - `raster`: PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use cld_core::*;

pub mod render {
    pub use cld_render::layout::DiagramLayout;
    pub use cld_render::surface::{RecordingSurface, Surface};
    pub use cld_render::svg::SvgRenderOptions;
    pub use cld_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use cld_render::{LayoutOptions, layout_diagram};

    use cld_core::{Diagram, Theme};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Model(#[from] cld_core::Error),
        #[error(transparent)]
        Render(#[from] cld_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns arbitrary text into an SVG `id` token: ASCII alphanumerics plus `-_:.`, starting
    /// with a letter.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.');
            out.push(if ok { ch } else { '-' });
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let trimmed = out.trim_matches('-');
        if trimmed.is_empty() {
            return "cld-untitled".to_string();
        }
        if trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            trimmed.to_string()
        } else {
            format!("cld-{trimmed}")
        }
    }

    /// Theme plus layout and SVG options, ready to render any number of diagrams.
    #[derive(Clone, Default)]
    pub struct HeadlessRenderer {
        pub theme: Theme,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_theme(mut self, theme: Theme) -> Self {
            self.theme = theme;
            self
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn with_background(mut self, background: impl Into<String>) -> Self {
            self.svg.background = Some(background.into());
            self
        }

        pub fn layout(&self, diagram: &Diagram) -> Result<DiagramLayout> {
            Ok(layout_diagram(diagram, &self.theme, &self.layout)?)
        }

        pub fn render_svg(&self, diagram: &Diagram) -> Result<String> {
            let layout = self.layout(diagram)?;
            Ok(cld_render::render_layout_svg(&layout, &self.theme, &self.svg))
        }

        /// Records the draw sequence instead of serializing it.
        pub fn record(&self, diagram: &Diagram) -> Result<RecordingSurface> {
            let layout = self.layout(diagram)?;
            let mut surface = RecordingSurface::new();
            cld_render::render::render(&layout, &self.theme, &mut surface);
            Ok(surface)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            diagram: &Diagram,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_png(self, diagram, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            diagram: &Diagram,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_jpeg(self, diagram, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(&self, diagram: &Diagram) -> raster::Result<Vec<u8>> {
            raster::render_pdf(self, diagram)
        }
    }
}
