// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid versus flat scan on the raw index.

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use inkwell_index::{Aabb2D, GridIndex, Index};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Canvas-like layout: shapes of 40..240 units scattered over a square world.
fn gen_canvas_rects(count: usize, world: f64, seed: u64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let w = 40.0 + rng.next_f64() * 200.0;
            let h = 40.0 + rng.next_f64() * 200.0;
            let x = (rng.next_f64() - 0.5) * world;
            let y = (rng.next_f64() - 0.5) * world;
            Aabb2D::from_xywh(x, y, w, h)
        })
        .collect()
}

fn gen_points(count: usize, world: f64, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            (
                (rng.next_f64() - 0.5) * world,
                (rng.next_f64() - 0.5) * world,
            )
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000] {
        let rects = gen_canvas_rects(n, 20_000.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter_batched(
                GridIndex::<u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        idx.insert(i as u32, r);
                    }
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("flat_n{n}"), |b| {
            b.iter_batched(
                Index::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        idx.insert(i as u32, r);
                    }
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_query_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_point");
    let points = gen_points(1_000, 20_000.0, 0xBADC_F00D_1234_5678);
    for &n in &[1_000usize, 10_000] {
        let rects = gen_canvas_rects(n, 20_000.0, 0xC1A5_7E55_9999_ABCD);
        let mut grid = GridIndex::<u32>::new();
        let mut flat = Index::<f64, u32>::new();
        for (i, r) in rects.iter().copied().enumerate() {
            grid.insert(i as u32, r);
            flat.insert(i as u32, r);
        }
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter(|| {
                let hits: usize = points
                    .iter()
                    .map(|&(x, y)| grid.query_point(x, y).len())
                    .sum();
                black_box(hits)
            });
        });
        group.bench_function(format!("flat_n{n}"), |b| {
            b.iter(|| {
                let hits: usize = points
                    .iter()
                    .map(|&(x, y)| flat.query_point(x, y).len())
                    .sum();
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    // A dragged shape moves a few units per frame, mostly staying inside its cells.
    let mut group = c.benchmark_group("drag_update");
    let rects = gen_canvas_rects(10_000, 20_000.0, 0xFACE_FEED_CAFE_BABE);
    let mut grid = GridIndex::<u32>::new();
    for (i, r) in rects.iter().copied().enumerate() {
        grid.insert(i as u32, r);
    }
    let start = rects[0];
    group.bench_function("grid_n10000", |b| {
        let mut step = 0.0;
        b.iter(|| {
            step += 3.0;
            let dx = step % 600.0;
            grid.update(
                0,
                Aabb2D::new(start.min_x + dx, start.min_y, start.max_x + dx, start.max_y),
            );
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query_point, bench_drag);
criterion_main!(benches);
