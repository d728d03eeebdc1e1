//! # Row Packing Benchmark
//!
//! Packing runs on every control registration, once per live panel.
//!
//! Run with: `cargo bench --package graft_engine`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graft_engine::packing::{plan, PackMetrics};
use graft_engine::{ControlSpec, EngineConfig, LabelSpec, NativeSettings};
use graft_prefs::{shared, MemoryStore};
use graft_shared::{Language, LocalText, Vec2};
use graft_tree::{FixtureOptions, HostFixture, UiTree};

const CELL: Vec2 = Vec2::new(420.0, 64.0);
const SPACING: Vec2 = Vec2::new(16.0, 12.0);

fn metrics() -> PackMetrics {
    PackMetrics::new(CELL, SPACING, 18.0, 45.0, 45.0, 1100.0)
}

/// Mostly half-width items with a full-width one every seventh slot.
fn mixed(count: usize) -> Vec<(usize, Option<Vec2>)> {
    (0..count)
        .map(|i| {
            let size = if i % 7 == 3 {
                Vec2::new(2000.0, 80.0)
            } else {
                Vec2::new(300.0, 60.0)
            };
            (i, Some(size))
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for count in [8, 64, 512] {
        let items = mixed(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| black_box(plan(metrics(), items.iter().copied())));
        });
    }

    group.finish();
}

/// Full rebuild of a 32-control tab into a host panel.
fn bench_rebuild(c: &mut Criterion) {
    let mut tree = UiTree::new();
    let host = HostFixture::build(&mut tree, &FixtureOptions::default());
    let settings = NativeSettings::init(
        tree.into_shared(),
        shared(MemoryStore::new()),
        EngineConfig::default(),
        Language::English,
    );
    let _ = settings.inject(host.settings, false);

    let tab = settings.register_tab("bench", LocalText::new("bench", "", "Bench"), true);
    for i in 0..32 {
        let text = LocalText::new(format!("label_{i}"), "", format!("Label {i}"));
        let _ = tab.create_label(
            LabelSpec::new(format!("label_{i}"), text).preferred_size(Vec2::new(300.0, 60.0)),
        );
    }

    c.bench_function("rebuild_32_controls", |b| {
        b.iter(|| {
            let text = LocalText::new("label_0", "", "Label 0");
            black_box(tab.create_label(
                LabelSpec::new("label_0", text).preferred_size(Vec2::new(300.0, 60.0)),
            ))
        });
    });
}

criterion_group!(benches, bench_plan, bench_rebuild);
criterion_main!(benches);
