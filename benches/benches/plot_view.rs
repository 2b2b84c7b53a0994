// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use understory_plot_view::{
    Axis, AxisMask, Bound, Constraints, Domain, PlotView, PlotViewOptions, Scale, Sensitivity,
};

fn aircraft_view(animation_duration_ms: u64) -> PlotView {
    let options = PlotViewOptions {
        constraints: Constraints::new()
            .with_position_x(Bound::between(0.0, 18_000.0))
            .with_position_y(Bound::between(0.0, 900.0))
            .with_extent_x(Bound::new(Some(50.0), None)),
        animation_duration_ms,
        ..PlotViewOptions::default()
    };
    PlotView::with_options(
        Domain::new(0.0, 18_000.0),
        Domain::new(0.0, 900.0),
        1_200.0,
        800.0,
        options,
    )
    .unwrap()
}

fn bench_scales(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_view/scale");

    // Rendering maps every mark through the view scale once per frame.
    for marks in [256usize, 4_096, 65_536] {
        let xs: Vec<f64> = (0..marks).map(|i| i as f64 * 0.27).collect();
        group.throughput(Throughput::Elements(marks as u64));

        let view = aircraft_view(0);
        group.bench_with_input(BenchmarkId::new("forward", marks), &xs, |b, xs| {
            b.iter(|| {
                let scale = view.view_scale(Axis::X);
                let mut acc = 0.0;
                for &x in xs {
                    acc += scale.forward(black_box(x));
                }
                black_box(acc);
            });
        });

        group.bench_with_input(BenchmarkId::new("inverse", marks), &xs, |b, xs| {
            b.iter(|| {
                let scale = view.view_scale(Axis::Y);
                let mut acc = 0.0;
                for &px in xs {
                    acc += scale.inverse(black_box(px));
                }
                black_box(acc);
            });
        });
    }

    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_view/drag");

    // One pointer-move stream per iteration, clamped against position bounds.
    for moves in [16usize, 256] {
        group.throughput(Throughput::Elements(moves as u64));
        group.bench_with_input(BenchmarkId::new("on_move", moves), &moves, |b, &moves| {
            b.iter_batched(
                || {
                    let mut view = aircraft_view(0);
                    view.zoom(4.0, None, AxisMask::Both).unwrap();
                    let drag = view.bind_drag(AxisMask::Both, false, Sensitivity::View);
                    view.on_press(&drag, Point::new(600.0, 400.0)).unwrap();
                    (view, drag)
                },
                |(mut view, drag)| {
                    for i in 0..moves {
                        let t = i as f64;
                        let pointer = Point::new(600.0 + 3.0 * t, 400.0 - 2.0 * t);
                        black_box(view.on_move(&drag, pointer).unwrap());
                    }
                    black_box(view.viewport());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_wheel_and_animation(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_view/animation");

    group.bench_function("wheel_then_settle", |b| {
        b.iter_batched(
            || {
                let mut view = aircraft_view(300);
                let wheel = view.bind_wheel(AxisMask::Both, None, false);
                view.tick(0);
                (view, wheel)
            },
            |(mut view, wheel)| {
                view.on_wheel(&wheel, Point::new(300.0, 200.0), -1.0)
                    .unwrap();
                let mut now = 0;
                while view.tick(now) {
                    now += 16;
                }
                black_box(view.animated_viewport());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_scales, bench_drag, bench_wheel_and_animation);
criterion_main!(benches);
