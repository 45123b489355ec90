use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lww_dict::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Dict = LwwElementDict<u32, u64, u64, u32>;

fn random_replica(peer: u32, seed: u64, ops: usize) -> Dict {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dict = Dict::new(peer, Clock::logical());
    for _ in 0..ops {
        let key = rng.gen_range(0..1000);
        if rng.gen_bool(0.8) {
            dict.set(key, rng.gen());
        } else {
            dict.remove(key);
        }
    }
    dict
}

fn bench_set(c: &mut Criterion) {
    c.bench_function("LwwElementDict::set x1000", |b| {
        b.iter(|| {
            let mut dict = Dict::new(1, Clock::logical());
            for i in 0..1000u32 {
                dict.set(i, u64::from(i));
            }
            black_box(dict.len())
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let dict = random_replica(1, 7, 2000);

    c.bench_function("LwwElementDict::get x1000", |b| {
        b.iter(|| {
            let mut hits = 0;
            for i in 0..1000u32 {
                if dict.get(&i).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_entries(c: &mut Criterion) {
    let dict = random_replica(1, 11, 2000);

    c.bench_function("LwwElementDict::entries 1000 keys", |b| {
        b.iter(|| black_box(dict.entries().len()))
    });
}

fn bench_merge(c: &mut Criterion) {
    let left = random_replica(1, 1, 2000);
    let right = random_replica(2, 2, 2000);

    c.bench_function("LwwElementDict::merge 2000+2000 ops", |b| {
        b.iter(|| {
            let mut merged = left.clone();
            merged.merge(&right);
            black_box(merged.len())
        })
    });

    let replicas: Vec<Dict> = (0..10).map(|i| random_replica(i, u64::from(i), 500)).collect();

    c.bench_function("LwwElementDict::merge 10 replicas", |b| {
        b.iter(|| {
            let mut merged = replicas[0].clone();
            for other in &replicas[1..] {
                merged.merge(other);
            }
            black_box(merged.len())
        })
    });
}

criterion_group!(benches, bench_set, bench_get, bench_entries, bench_merge);
criterion_main!(benches);
