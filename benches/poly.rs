//! Micro-benchmarks of the hot-path polynomial routines.

use core::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mlkem_math::{
    NttPolynomial, POLYBYTES, Polynomial, Q,
    compress::{D4, D10},
    sample::{CbdWidth, Eta2, Eta3},
};

fn fixed_poly(step: i64) -> Polynomial {
    let mut p = Polynomial::zero();
    for (i, c) in p.coeffs_mut().iter_mut().enumerate() {
        *c = ((i as i64 * step) % Q as i64) as i16;
    }
    p
}

fn fixed_ntt_poly(step: i64) -> NttPolynomial {
    let mut p = fixed_poly(step).ntt();
    p.reduce();
    p
}

fn bench_ntt(c: &mut Criterion) {
    let p = fixed_poly(31);
    c.bench_function("poly/ntt", |b| {
        b.iter(|| black_box(black_box(p).ntt()));
    });

    let p = fixed_ntt_poly(31);
    c.bench_function("poly/invntt", |b| {
        b.iter(|| black_box(black_box(p).ntt_inverse()));
    });
}

fn bench_basemul(c: &mut Criterion) {
    let a = fixed_ntt_poly(17);
    let b_poly = fixed_ntt_poly(23);
    let cache = b_poly.mulcache();

    c.bench_function("poly/mulcache_compute", |b| {
        b.iter(|| black_box(black_box(&b_poly).mulcache()));
    });

    c.bench_function("poly/basemul_cached", |b| {
        b.iter(|| black_box(black_box(&a).basemul_cached(black_box(&b_poly), black_box(&cache))));
    });
}

fn bench_codecs(c: &mut Criterion) {
    let p = fixed_ntt_poly(29);
    let mut buf = [0u8; POLYBYTES];

    c.bench_function("poly/to_bytes", |b| {
        b.iter(|| {
            black_box(&p).to_bytes(&mut buf);
            black_box(&buf);
        });
    });

    p.to_bytes(&mut buf);
    c.bench_function("poly/from_bytes", |b| {
        b.iter(|| black_box(mlkem_math::RawNttPolynomial::from_bytes(black_box(&buf))));
    });

    let p = fixed_poly(41);
    let mut cbuf = [0u8; 320];
    c.bench_function("poly/compress_d10", |b| {
        b.iter(|| {
            black_box(&p).compress::<D10>(&mut cbuf);
            black_box(&cbuf);
        });
    });

    let mut vbuf = [0u8; 128];
    c.bench_function("poly/compress_d4", |b| {
        b.iter(|| {
            black_box(&p).compress::<D4>(&mut vbuf);
            black_box(&vbuf);
        });
    });
}

fn bench_sampling(c: &mut Criterion) {
    let buf2: [u8; Eta2::BUF_BYTES] = core::array::from_fn(|i| (i as u8).wrapping_mul(67));
    c.bench_function("poly/cbd_eta2", |b| {
        b.iter(|| black_box(Polynomial::sample_cbd::<Eta2>(black_box(&buf2))));
    });

    let buf3: [u8; Eta3::BUF_BYTES] = core::array::from_fn(|i| (i as u8).wrapping_mul(151));
    c.bench_function("poly/cbd_eta3", |b| {
        b.iter(|| black_box(Polynomial::sample_cbd::<Eta3>(black_box(&buf3))));
    });
}

criterion_group!(benches, bench_ntt, bench_basemul, bench_codecs, bench_sampling);
criterion_main!(benches);
