// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Microbenchmarks for the hot per-frame paths: the placement passes that
//! run on every throttled scroll/resize tick, the wheel-bounds check, and
//! scheduler churn under bursts of deferred transitions.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use marginalia_driver::schedule::Scheduler;
use marginalia_placement::layout::{
    HorizontalInputs, VerticalInputs, horizontal_layout, vertical_layout,
};
use marginalia_placement::room::room_for;
use marginalia_placement::scroll::{ScrollMetrics, intercept};

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    let viewport = Size::new(1280.0, 800.0);

    group.bench_function("vertical_pass", |b| {
        let trigger = Rect::new(620.0, 740.0, 640.0, 755.0);
        b.iter(|| {
            let room = room_for(black_box(trigger), black_box(viewport));
            vertical_layout(&VerticalInputs {
                room,
                rendered_height: 180.0,
                margin: 10.0,
                max_height: 10_000.0,
                edge_gap: 15.0,
            })
        });
    });

    group.bench_function("full_pass", |b| {
        let trigger = Rect::new(620.0, 740.0, 640.0, 755.0);
        b.iter(|| {
            let room = room_for(black_box(trigger), black_box(viewport));
            let vertical = vertical_layout(&VerticalInputs {
                room,
                rendered_height: 180.0,
                margin: 10.0,
                max_height: 10_000.0,
                edge_gap: 15.0,
            });
            let horizontal = horizontal_layout(&HorizontalInputs {
                room,
                viewport_width: viewport.width,
                max_width: 0.9,
                content_width: 420.0,
                trigger_width: 20.0,
                trigger_margin_left: 2.0,
            });
            (vertical, horizontal)
        });
    });

    group.bench_function("wheel_intercept", |b| {
        let metrics = ScrollMetrics {
            scroll_top: 140.0,
            client_height: 200.0,
            scroll_height: 500.0,
        };
        b.iter(|| intercept(black_box(-30.0), black_box(&metrics)));
    });

    group.finish();
}

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");

    group.bench_function("schedule_cancel_churn", |b| {
        b.iter(|| {
            let mut scheduler: Scheduler<u32> = Scheduler::new();
            for round in 0..64_u64 {
                let keep = scheduler.schedule(round + 100, 0);
                let drop = scheduler.schedule(round + 200, 1);
                scheduler.cancel(drop);
                black_box(keep);
            }
            black_box(scheduler.due(1_000).len())
        });
    });

    group.bench_function("drain_due_in_order", |b| {
        b.iter(|| {
            let mut scheduler: Scheduler<u32> = Scheduler::new();
            for i in 0..128_u64 {
                scheduler.schedule(i % 7, black_box(0));
            }
            black_box(scheduler.due(10).len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_placement, bench_scheduler);
criterion_main!(benches);
