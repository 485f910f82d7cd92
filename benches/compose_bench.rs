use criterion::{black_box, criterion_group, criterion_main, Criterion};

use heatfig::rendering::{compose, export};
use heatfig::rendering::layout::plan;

fn bench_plan(c: &mut Criterion) {
    let ratios = [0.6, 4.0, 0.3, 0.3, 1.0, 0.7];
    c.bench_function("plan_six_rows", |b| {
        b.iter(|| plan(black_box(&ratios), black_box(30.0), black_box(760.0)).unwrap())
    });
}

fn bench_trigger_figure(c: &mut Criterion) {
    let spec = heatfig::figures::trigger_vs_events().expect("figure builds");

    c.bench_function("compose_trigger_figure", |b| {
        b.iter(|| compose::compose(&spec.layout, &spec.style).unwrap())
    });

    let canvas = compose::compose(&spec.layout, &spec.style).expect("compose");
    c.bench_function("encode_trigger_figure", |b| {
        b.iter(|| export::encode(black_box(&canvas), 10).unwrap())
    });

    c.bench_function("record_trigger_figure", |b| {
        b.iter(|| compose::record(&spec.layout, &spec.style).unwrap())
    });
}

criterion_group!(benches, bench_plan, bench_trigger_figure);
criterion_main!(benches);
