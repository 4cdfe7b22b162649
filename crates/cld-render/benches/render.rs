use cld_core::{Theme, dataset};
use cld_render::svg::SvgRenderOptions;
use cld_render::{LayoutOptions, layout_diagram, render_layout_svg};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_drifting_goals(c: &mut Criterion) {
    let diagram = dataset::drifting_goals().unwrap();
    let theme = Theme::default();
    let layout_opts = LayoutOptions::default();
    let svg_opts = SvgRenderOptions::default();

    let mut group = c.benchmark_group("drifting_goals");
    group.bench_function("layout", |b| {
        b.iter(|| layout_diagram(black_box(&diagram), &theme, &layout_opts).unwrap())
    });
    let layout = layout_diagram(&diagram, &theme, &layout_opts).unwrap();
    group.bench_function("svg", |b| {
        b.iter(|| render_layout_svg(black_box(&layout), &theme, &svg_opts))
    });
    group.finish();
}

criterion_group!(benches, bench_drifting_goals);
criterion_main!(benches);
