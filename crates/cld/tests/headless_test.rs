use cld::dataset;
use cld::render::{HeadlessError, HeadlessRenderer, sanitize_svg_id};

#[test]
fn sanitize_svg_id_keeps_ids_usable() {
    assert_eq!(sanitize_svg_id("drifting goals"), "drifting-goals");
    assert_eq!(sanitize_svg_id("  B1 / R1  "), "B1-R1");
    assert_eq!(sanitize_svg_id("2024"), "cld-2024");
    assert_eq!(sanitize_svg_id("???"), "cld-untitled");
    assert_eq!(sanitize_svg_id(""), "cld-untitled");
}

#[test]
fn renderer_applies_id_and_background() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let svg = HeadlessRenderer::new()
        .with_diagram_id("homelessness policy")
        .with_background("#FAFAFA")
        .render_svg(&diagram)
        .expect("render ok");

    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let root = doc.root_element();
    assert_eq!(root.attribute("id"), Some("homelessness-policy"));
    assert_eq!(root.attribute("aria-roledescription"), Some("causal-loop"));
    let bg = root
        .children()
        .find(|n| n.attribute("class") == Some("background"))
        .expect("background rect");
    assert_eq!(bg.attribute("fill"), Some("#FAFAFA"));
}

#[test]
fn theme_without_background_leaves_the_page_transparent() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let theme = cld::Theme::from_json_str(r#"{ "canvas": { "background": null } }"#)
        .expect("theme ok");
    let svg = HeadlessRenderer::new()
        .with_theme(theme)
        .render_svg(&diagram)
        .expect("render ok");
    assert!(!svg.contains(r#"class="background""#));
}

#[test]
fn recording_matches_the_dataset() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let surface = HeadlessRenderer::new().record(&diagram).expect("record ok");
    let texts = surface
        .commands()
        .iter()
        .filter(|c| matches!(c.op, cld_render::surface::DrawOp::FillText { .. }))
        .count();
    // 9 node label lines, 8 glyphs, 2 edge labels, 2 loop titles with 4 description lines,
    // callout heading plus 2 lines, legend title plus 4 entries.
    assert_eq!(texts, 9 + 8 + 2 + 6 + 3 + 5);
}

#[test]
fn invalid_theme_surfaces_as_a_render_error() {
    let diagram = dataset::drifting_goals().expect("dataset ok");
    let mut renderer = HeadlessRenderer::new();
    renderer.theme.node.line_height = 0.0;
    let err = renderer.render_svg(&diagram).expect_err("zero line height");
    assert!(matches!(
        err,
        HeadlessError::Render(cld_render::Error::Core(cld::Error::Theme { .. }))
    ));
}

#[cfg(feature = "raster")]
mod raster {
    use super::*;
    use cld::render::raster::RasterOptions;

    #[test]
    fn png_jpeg_and_pdf_have_their_signatures() {
        let diagram = dataset::drifting_goals().expect("dataset ok");
        let renderer = HeadlessRenderer::new();
        let raster = RasterOptions::default();

        let png = renderer.render_png(&diagram, &raster).expect("png ok");
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
        let jpeg = renderer.render_jpeg(&diagram, &raster).expect("jpeg ok");
        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
        let pdf = renderer.render_pdf(&diagram).expect("pdf ok");
        assert!(pdf.starts_with(b"%PDF-"));
    }
}
