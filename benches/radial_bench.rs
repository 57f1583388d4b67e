use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::hint::black_box;
use radialtop::radial::distribute::distribute;
use radialtop::radial::layout::{CellMeasure, LayoutParams, layout_roots};
use radialtop::radial::node::Point;
use radialtop::radial::tree::{ProcessForest, ProcessRecord};
use radialtop::radial::{SceneOptions, build_scene};
use radialtop::ui::radial_canvas;
use radialtop::ui::theme::{ColorSupport, Theme};
use radialtop::view::View;

const MEASURE: CellMeasure = CellMeasure { cell_width: 9.0 };

/// A few roots with a bushy first tree, like a typical desktop.
fn make_records(n: usize) -> Vec<ProcessRecord> {
    (0..n)
        .map(|i| {
            let pid = i as u32 + 1;
            let ppid = match i {
                0 => 0,
                _ if i % 97 == 0 => 0,
                _ => (i as u32 / 3) + 1,
            };
            ProcessRecord {
                pid,
                ppid,
                name: format!("proc_{i}"),
                cpu_percent: (i % 100) as f64,
                memory_percent: (i % 7) as f64,
            }
        })
        .collect()
}

fn weighed_forest(n: usize) -> ProcessForest {
    let mut forest = ProcessForest::build(&make_records(n));
    forest.compute_weights();
    forest
}

fn bench_forest_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_build_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let records = make_records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let mut forest = ProcessForest::build(black_box(records));
                forest.compute_weights();
                black_box(forest);
            })
        });
    }

    group.finish();
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let forest = weighed_forest(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &forest, |b, forest| {
            b.iter(|| {
                for node in forest.nodes.values() {
                    black_box(distribute(black_box(&node.children), forest));
                }
            })
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_500_1000_2000");
    let params = LayoutParams::default();

    for size in [500usize, 1000, 2000] {
        let forest = weighed_forest(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &forest, |b, forest| {
            b.iter(|| {
                let layout = layout_roots(
                    black_box(&forest.root_ids),
                    forest,
                    Point::default(),
                    &params,
                    &MEASURE,
                );
                black_box(layout);
            })
        });
    }

    group.finish();
}

fn bench_scene_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_pipeline_500_1000_2000");
    let options = SceneOptions::default();

    for size in [500usize, 1000, 2000] {
        let records = make_records(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let scene = build_scene(black_box(records), &options, &MEASURE);
                black_box(scene);
            })
        });
    }

    group.finish();
}

fn bench_canvas_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("radial_canvas_render_500_1000_2000");
    let theme = Theme::from_config("dark", ColorSupport::Truecolor);
    let view = View::default();

    for size in [500usize, 1000, 2000] {
        let scene = build_scene(&make_records(size), &SceneOptions::default(), &MEASURE);
        group.bench_with_input(BenchmarkId::from_parameter(size), &scene, |b, scene| {
            b.iter(|| {
                let backend = TestBackend::new(160, 50);
                let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
                terminal
                    .draw(|frame| {
                        radial_canvas::render(
                            frame,
                            Rect::new(0, 0, 160, 50),
                            black_box(scene),
                            &view,
                            &theme,
                        );
                    })
                    .expect("bench draw failed");
                black_box(terminal.backend());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_forest_build,
    bench_distribute,
    bench_layout,
    bench_scene_pipeline,
    bench_canvas_render
);
criterion_main!(benches);
