//! Hot-path benchmarks per bucket shape.
//! 各桶布局的热路径基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use cuckoo_table::{Codec, CuckooTable, Fp4x4, Fp8x4, Fp12x4, Fp16x4, Fp32x2, bucket_index};

const BUCKETS: usize = 1 << 16;

fn filled<C: Codec>() -> CuckooTable<C> {
    let mut t = CuckooTable::<C>::with_seed(BUCKETS, u32::MAX, 1);
    let mask = t.fp_mask();
    let mut rng = fastrand::Rng::with_seed(2);
    // Fill to ~90% so contains sees mostly full buckets
    // 填充至约 90%
    for _ in 0..t.max_elements() * 9 / 10 {
        let fp = (rng.u32(..) & mask).max(1);
        let _ = t.insert_with_eviction(rng.usize(0..BUCKETS), fp, false);
    }
    t
}

fn bench_shape<C: Codec>(c: &mut Criterion, name: &str) {
    let mut group = c.benchmark_group(name);
    let mut t = filled::<C>();
    let mask = t.fp_mask();

    group.bench_function(BenchmarkId::new("contains_either", BUCKETS), |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) & (BUCKETS - 1);
            let r = t.contains_either(i, i ^ 0x155, (i as u32 & mask).max(1));
            std::hint::black_box(r)
        })
    });

    group.bench_function(BenchmarkId::new("kick", BUCKETS), |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7) & (BUCKETS - 1);
            let r = t.insert_with_eviction(i, (i as u32 & mask).max(1), true);
            std::hint::black_box(r)
        })
    });
    group.finish();
}

fn shapes(c: &mut Criterion) {
    bench_shape::<Fp4x4>(c, "fp4x4");
    bench_shape::<Fp8x4>(c, "fp8x4");
    bench_shape::<Fp12x4>(c, "fp12x4");
    bench_shape::<Fp16x4>(c, "fp16x4");
    bench_shape::<Fp32x2>(c, "fp32x2");
}

fn index(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_index");
    for n in [1usize << 10, 1 << 20, 1_000_003] {
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            let mut k = 0u64;
            b.iter(|| {
                k += 1;
                std::hint::black_box(bucket_index(&k, n))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, shapes, index);
criterion_main!(benches);
