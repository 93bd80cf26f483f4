// Copyright 2025 the Inkwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end hit testing through the document.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use inkwell_document::{Document, DocumentStore};
use inkwell_index::{FlatVec, IndexGeneric};
use inkwell_shapes::{Shape, ShapeId};
use kurbo::Point;

fn populate(store: &mut DocumentStore, n: usize) {
    let side = (n as f64).sqrt().ceil() as usize;
    for i in 0..n {
        let (col, row) = (i % side, i / side);
        let id = ShapeId::new(&format!("s{i}")).expect("valid id");
        let x = col as f64 * 150.0;
        let y = row as f64 * 150.0;
        let shape = if i % 3 == 0 {
            Shape::line(id, 120.0, 60.0).at(x, y)
        } else {
            Shape::rect(id, 100.0, 80.0)
                .at(x, y)
                .with_rotation((i % 7) as f64 * 0.2)
        };
        store.put_shape(shape.with_index(format!("a{i:06}")));
    }
}

fn probes(n: usize) -> Vec<Point> {
    let side = (n as f64).sqrt().ceil();
    (0..512)
        .map(|i| {
            let t = i as f64 * 0.618_033_988_75;
            Point::new((t.fract()) * side * 150.0, ((t * 1.7).fract()) * side * 150.0)
        })
        .collect()
}

fn bench_find_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_top_shape_at");
    for &n in &[1_000usize, 10_000] {
        let points = probes(n);
        group.throughput(Throughput::Elements(points.len() as u64));

        let mut store = DocumentStore::new();
        populate(&mut store, n);
        let grid = Document::from_parts(store, inkwell_index::GridIndex::new());
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter(|| {
                let found = points
                    .iter()
                    .filter(|p| grid.find_top_shape_at(**p).is_some())
                    .count();
                black_box(found)
            });
        });

        let mut store = DocumentStore::new();
        populate(&mut store, n);
        let index: IndexGeneric<f64, ShapeId, FlatVec<f64>> = IndexGeneric::new();
        let flat = Document::from_parts(store, index);
        group.bench_function(format!("flat_n{n}"), |b| {
            b.iter(|| {
                let found = points
                    .iter()
                    .filter(|p| flat.find_top_shape_at(**p).is_some())
                    .count();
                black_box(found)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_top);
criterion_main!(benches);
