//! Cross-checks of the NTT pipeline against slow reference implementations
//! computed from first principles.

use mlkem_math::{
    N, NttPolynomial, Polynomial, Q,
    reduce::{barrett_reduce, fqmul, to_unsigned},
};

const Q64: i64 = Q as i64;
const ZETA: i64 = 17;

fn pow_mod(mut base: i64, mut exp: i64) -> i64 {
    let mut result = 1i64;
    base = base.rem_euclid(Q64);
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % Q64;
        }
        exp >>= 1;
        base = base * base % Q64;
    }
    result
}

fn bitrev7(x: usize) -> usize {
    (0..7).fold(0, |acc, b| acc | (((x >> b) & 1) << (6 - b)))
}

/// Textbook FIPS 203 NTT: for each of the 128 quadratic factors, evaluate the
/// even and odd sub-polynomials at zeta^{2*BitRev_7(i)+1}. Quadratic in N,
/// independent of the butterfly implementation under test.
fn reference_ntt(f: &[i16; N]) -> [i64; N] {
    let mut out = [0i64; N];
    for i in 0..N / 2 {
        let root = pow_mod(ZETA, (2 * bitrev7(i) + 1) as i64);
        let mut even = 0i64;
        let mut odd = 0i64;
        let mut root_pow = 1i64;
        for j in 0..N / 2 {
            even = (even + (f[2 * j] as i64) * root_pow).rem_euclid(Q64);
            odd = (odd + (f[2 * j + 1] as i64) * root_pow).rem_euclid(Q64);
            root_pow = root_pow * root % Q64;
        }
        out[2 * i] = even;
        out[2 * i + 1] = odd;
    }
    out
}

/// Schoolbook negacyclic product in `Z_q[X]/(X^{256}+1)`.
fn schoolbook_mul(a: &[i16; N], b: &[i16; N]) -> [i64; N] {
    let mut c = [0i64; N];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            let prod = (ai as i64) * (bj as i64);
            if i + j < N {
                c[i + j] += prod;
            } else {
                c[i + j - N] -= prod;
            }
        }
    }
    for v in c.iter_mut() {
        *v = v.rem_euclid(Q64);
    }
    c
}

fn canonical(c: i16) -> i64 {
    to_unsigned(barrett_reduce(c)) as i64
}

/// Deterministic pseudo-random canonical coefficients.
fn test_poly(seed: u64) -> Polynomial {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut p = Polynomial::zero();
    for c in p.coeffs_mut().iter_mut() {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        *c = ((state >> 33) % Q64 as u64) as i16;
    }
    p
}

#[test]
fn ntt_matches_reference_evaluation() {
    for seed in 0..4u64 {
        let p = test_poly(seed);
        let expected = reference_ntt(p.coeffs());

        let ntt_p = p.ntt();
        for (i, &c) in ntt_p.coeffs().iter().enumerate() {
            assert_eq!(canonical(c), expected[i], "seed {seed}, index {i}");
        }
    }
}

#[test]
fn inverse_ntt_undoes_forward() {
    let p = test_poly(42);
    let original = *p.coeffs();

    let recovered = p.ntt().ntt_inverse();
    // inverse_ntt leaves one Montgomery factor; fqmul by 1 removes it.
    for (i, &c) in recovered.coeffs().iter().enumerate() {
        assert_eq!(
            canonical(fqmul(c, 1)),
            original[i] as i64,
            "mismatch at index {i}"
        );
    }
}

#[test]
fn basemul_pipeline_matches_schoolbook() {
    let mut a = Polynomial::zero();
    let mut b = Polynomial::zero();
    for i in 0..N {
        a.coeffs_mut()[i] = ((i * 7 + 3) % 100) as i16;
        b.coeffs_mut()[i] = ((i * 13 + 1) % 100) as i16;
    }
    let expected = schoolbook_mul(a.coeffs(), b.coeffs());

    let mut a_ntt = a.ntt();
    // The first basemul operand needs the 12-bit bound; reduce to get it.
    a_ntt.reduce();
    let b_ntt = b.ntt();

    let cache = b_ntt.mulcache();
    let c_ntt = a_ntt.basemul_cached(&b_ntt, &cache);
    let c = c_ntt.ntt_inverse();

    // The basemul's 2^{-16} cancels against the inverse transform's
    // Montgomery factor, so the result is the plain product.
    for (i, (&got, &exp)) in c.coeffs().iter().zip(expected.iter()).enumerate() {
        assert_eq!(canonical(got), exp, "mismatch at {i}");
    }
}

#[test]
fn ntt_bound_holds_for_many_inputs() {
    for seed in 0..16u64 {
        let p = test_poly(seed);
        let ntt_p = p.ntt();
        assert!(
            ntt_p.coeffs().iter().all(|&c| (c as i32).abs() < 8 * Q as i32),
            "seed {seed}"
        );
    }
}

#[test]
fn invntt_bound_holds_for_arbitrary_inputs() {
    let mut state = 0xDEAD_BEEFu64;
    let mut p = NttPolynomial::zero();
    for c in p.coeffs_mut().iter_mut() {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        *c = (state >> 48) as i16;
    }
    let out = p.ntt_inverse();
    assert!(out.coeffs().iter().all(|&c| (c as i32).abs() < 8 * Q as i32));
}

#[test]
fn reduce_after_pipeline_is_canonical() {
    let p = test_poly(7);
    let mut out = p.ntt().ntt_inverse();
    out.reduce();
    assert!(out.coeffs().iter().all(|&c| (0..Q).contains(&c)));
}
