//! Limb arithmetic benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sable_primitives::U256;

fn operands() -> (U256, U256, U256) {
    (
        U256::from_limbs([0x0123_4567_89ab_cdef, 0xfedc_ba98, 0x1111, 0x8000_0000_0000_0001]),
        U256::from_limbs([0xdead_beef, 0xcafe_babe, 0, 0x7fff]),
        U256::from_limbs([0xffff_ffff_ffff_fffb, 0, 0x42, 0]),
    )
}

fn bench_arithmetic(c: &mut Criterion) {
    let (a, b, m) = operands();

    c.bench_function("u256_overflowing_add", |bench| {
        bench.iter(|| black_box(a).overflowing_add(black_box(b)))
    });
    c.bench_function("u256_overflowing_mul", |bench| {
        bench.iter(|| black_box(a).overflowing_mul(black_box(b)))
    });
    c.bench_function("u256_wrapping_mul", |bench| {
        bench.iter(|| black_box(a).wrapping_mul(black_box(b)))
    });
    c.bench_function("u256_div_rem", |bench| {
        bench.iter(|| black_box(a).div_rem(black_box(m)))
    });
    c.bench_function("u256_mul_mod", |bench| {
        bench.iter(|| black_box(a).mul_mod(black_box(b), black_box(m)))
    });
    c.bench_function("u256_pow", |bench| {
        bench.iter(|| black_box(a).pow(black_box(U256::from(255u64))))
    });
}

criterion_group!(benches, bench_arithmetic);
criterion_main!(benches);
