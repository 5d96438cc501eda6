use afli_nfl::afli::AfliConfig;
use afli_nfl::Afli;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use itertools::iproduct;
use once_cell::sync::Lazy;
use rand::Rng;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];
const BUCKET_SIZES: [i64; 2] = [8, 32];

fn uniform_data(n: usize) -> Vec<(f64, u64)> {
    (0..n).map(|i| (i as f64, i as u64)).collect()
}

static LARGE_INDEX: Lazy<Afli<f64, u64>> = Lazy::new(|| {
    let mut index = Afli::new(AfliConfig::new(16, 0));
    index.bulk_load(&uniform_data(100_000), None).unwrap();
    index
});

fn bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");
    for (n, bucket_size) in iproduct!(SIZES, BUCKET_SIZES) {
        let data = uniform_data(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("bucket_size={bucket_size}"), n),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut index: Afli<f64, u64> = Afli::new(AfliConfig::new(bucket_size, 0));
                    index.bulk_load(data, None).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    for n in SIZES {
        let data = uniform_data(n);
        let mut index: Afli<f64, u64> = Afli::new(AfliConfig::new(16, 0));
        index.bulk_load(&data, None).unwrap();
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("present", n), &index, |b, index| {
            let probe = (n / 2) as f64;
            b.iter(|| index.find(probe));
        });
    }
    group.finish();
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in SIZES {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("new_key", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut index: Afli<f64, u64> = Afli::new(AfliConfig::new(16, 0));
                    index.bulk_load(&uniform_data(n), None).unwrap();
                    index
                },
                |mut index| index.insert(n as f64 + 0.5, 0),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn random_find(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    c.bench_function("find/random", |b| {
        b.iter(|| {
            let key = rng.gen_range(0..100_000) as f64;
            LARGE_INDEX.find(key)
        });
    });
}

criterion_group!(benches, bulk_load, find, insert, random_find);
criterion_main!(benches);
