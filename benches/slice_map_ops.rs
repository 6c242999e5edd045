//! Criterion micro-benchmarks for insert, lookup, removal and traversal.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use slice_map::{Identity, SliceMap};

const N: u32 = 10_000;

#[derive(Clone)]
struct Entity {
    id: u32,
    pos: [f32; 3],
}

impl Identity for Entity {
    type Id = u32;

    fn identity(&self) -> u32 {
        self.id
    }
}

fn populated() -> SliceMap<Entity> {
    (0..N)
        .map(|id| Entity {
            id,
            pos: [id as f32; 3],
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert_10k", |b| {
        b.iter(|| {
            let mut map = SliceMap::with_capacity(N as usize);
            for id in 0..N {
                map.insert(Entity { id, pos: [0.0; 3] });
            }
            black_box(map.len())
        });
    });
}

fn bench_get(c: &mut Criterion) {
    let map = populated();
    c.bench_function("get_10k", |b| {
        b.iter(|| {
            let mut hits = 0;
            for id in 0..N {
                if map.get(black_box(&id)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("remove_half_10k", |b| {
        b.iter_batched(
            populated,
            |mut map| {
                for id in (0..N).step_by(2) {
                    map.remove(&id);
                }
                black_box(map.capacity())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_iteration(c: &mut Criterion) {
    let map = populated();
    c.bench_function("fast_iter_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            map.fast_iter(|e| sum += e.pos[0]);
            black_box(sum)
        });
    });

    c.bench_function("iter_tolerant_10k", |b| {
        b.iter_batched(
            populated,
            |mut map| {
                let mut sum = 0.0f32;
                map.iter_tolerant(|cursor| {
                    if let Some(e) = cursor.get() {
                        sum += e.pos[0];
                    }
                });
                black_box(sum)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_insert, bench_get, bench_remove, bench_iteration);
criterion_main!(benches);
