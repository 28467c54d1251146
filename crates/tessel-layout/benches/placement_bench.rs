//! Benchmarks for placement and the document reducer.
//!
//! Run with: cargo bench -p tessel-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tessel_layout::{
    CollisionPolicy, GridPos, GridRect, GridSize, LayoutConfig, LayoutDocument, LayoutEngine,
    ManualClock, NewWidget, WidgetKind, next_non_overlapping_pos,
};

/// A packed grid of `n` mixed-size rects on 12 columns.
fn make_rects(n: usize) -> Vec<GridRect> {
    let mut rects = Vec::with_capacity(n);
    for i in 0..n {
        let size = match i % 4 {
            0 => GridSize::new(6, 4),
            1 => GridSize::new(4, 3),
            2 => GridSize::new(3, 3),
            _ => GridSize::new(2, 2),
        };
        let pos = next_non_overlapping_pos(&rects, size, 12);
        rects.push(GridRect::from_parts(pos, size));
    }
    rects
}

fn make_document(engine: &LayoutEngine<ManualClock>, n: usize) -> LayoutDocument {
    let kinds = [
        WidgetKind::PriceChart,
        WidgetKind::Watchlist,
        WidgetKind::TokenStats,
        WidgetKind::Notes,
    ];
    (0..n).fold(LayoutDocument::new("bench"), |doc, i| {
        engine.add_widget(&doc, NewWidget::new(kinds[i % kinds.len()]))
    })
}

fn bench_skyline_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/skyline_scan");

    for n in [8, 32, 128, 512] {
        let rects = make_rects(n);
        group.bench_with_input(BenchmarkId::new("append", n), &rects, |b, rects| {
            b.iter(|| black_box(next_non_overlapping_pos(rects, GridSize::new(4, 3), 12)))
        });
    }

    group.finish();
}

fn bench_add_widget(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/add_widget");
    let engine = LayoutEngine::with_clock(LayoutConfig::default(), ManualClock::new(0));

    for n in [8, 32, 128] {
        let doc = make_document(&engine, n);
        group.bench_with_input(BenchmarkId::new("auto_place", n), &doc, |b, doc| {
            b.iter(|| black_box(engine.add_widget(doc, NewWidget::new(WidgetKind::Notes))))
        });
        group.bench_with_input(BenchmarkId::new("explicit_origin", n), &doc, |b, doc| {
            b.iter(|| {
                black_box(engine.add_widget(
                    doc,
                    NewWidget::new(WidgetKind::Notes).at(GridPos::ORIGIN),
                ))
            })
        });
    }

    group.finish();
}

fn bench_move_widget(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/move_widget");

    for policy in [CollisionPolicy::RelocateMover, CollisionPolicy::PushDown] {
        let engine = LayoutEngine::with_clock(
            LayoutConfig::default().with_collision_policy(policy),
            ManualClock::new(0),
        );
        for n in [8, 32, 128] {
            let doc = make_document(&engine, n);
            let last = doc.widgets[n - 1].id.clone();
            let label = format!("{policy:?}");
            group.bench_with_input(BenchmarkId::new(label, n), &doc, |b, doc| {
                b.iter_batched(
                    || doc.clone(),
                    |doc| black_box(engine.move_widget(&doc, &last, GridPos::ORIGIN)),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

fn bench_state_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/state_hash");
    let engine = LayoutEngine::with_clock(LayoutConfig::default(), ManualClock::new(0));

    for n in [8, 128] {
        let doc = make_document(&engine, n);
        group.bench_with_input(BenchmarkId::new("document", n), &doc, |b, doc| {
            b.iter(|| black_box(doc.state_hash()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_skyline_scan,
    bench_add_widget,
    bench_move_widget,
    bench_state_hash,
);

criterion_main!(benches);
