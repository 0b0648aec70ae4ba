//! Layer-merged Number-Theoretic Transform and its inverse.
//!
//! # Forward transform
//!
//! A Cooley-Tukey decimation-in-time NTT with 7 butterfly layers. The
//! butterfly at twiddle zeta maps `(a, b)` to `(a + zeta*b, a - zeta*b)`,
//! with the product Montgomery-reduced (the tables carry the compensating
//! 2^{16} factor). Layers are merged as 1+2+3, 4+5, 6, 7; this particular
//! split was settled by benchmarking.
//!
//! Reduction is deferred: each layer grows the coefficient bound additively
//! by q, giving the ladder q -> 4q -> 6q -> 7q -> 8q across the merged
//! stages. 8q - 1 fits an `i16`, so no intermediate reduction is needed.
//!
//! # Inverse transform
//!
//! Gentleman-Sande butterflies `(a, b) -> (a + b, (b - a)*zeta)`. Here the
//! sum side doubles per layer instead of growing by q, so the reduction
//! points differ: layer 7 folds the normalisation constant `MONT_F` into its
//! first read of every coefficient and Barrett-reduces the sums (output
//! < q); layer 6 defers (< 2q); merged layers 5+4 defer then Barrett-reduce
//! (< q); merged layers 3+2+1 defer throughout (< 8q).
//!
//! Inner loops touch at most 8 coefficients per iteration so that
//! auto-vectorisation can kick in on targets with 128-bit vectors.

use crate::{
    N, Q, coeffs_abs_bound,
    reduce::{barrett_reduce, fqmul},
    zetas::{
        L1_ZETA, L2_ZETAS, L3_ZETAS, LAYER4_ZETAS, LAYER5_EVEN_ZETAS, LAYER5_ODD_ZETAS,
        LAYER6_ZETAS, LAYER7_ZETAS,
    },
};

const BOUND1: i32 = Q as i32;
const BOUND2: i32 = 2 * Q as i32;
const BOUND4: i32 = 4 * Q as i32;
const BOUND6: i32 = 6 * Q as i32;
const BOUND7: i32 = 7 * Q as i32;
const BOUND8: i32 = 8 * Q as i32;

/// mont^2 / 128 mod q. Multiplying by it undoes the 128x scaling of the
/// seven inverse layers and re-applies the Montgomery factor in one shot.
const MONT_F: i16 = 1441;

// -- Forward NTT --------------------------------------------------------------

/// Layers 1-3 merged: three butterfly applications per coefficient.
/// Input bound q, output bound 4q.
fn ntt_layer123(r: &mut [i16; N]) {
    for j in 0..32 {
        let (ci1, ci2, ci3, ci4) = (j, j + 32, j + 64, j + 96);
        let (ci5, ci6, ci7, ci8) = (j + 128, j + 160, j + 192, j + 224);

        // Layer 1
        let t = fqmul(r[ci5], L1_ZETA);
        let a = r[ci1];
        r[ci5] = a - t;
        r[ci1] = a + t;

        let t = fqmul(r[ci7], L1_ZETA);
        let a = r[ci3];
        r[ci7] = a - t;
        r[ci3] = a + t;

        let t = fqmul(r[ci6], L1_ZETA);
        let a = r[ci2];
        r[ci6] = a - t;
        r[ci2] = a + t;

        let t = fqmul(r[ci8], L1_ZETA);
        let a = r[ci4];
        r[ci8] = a - t;
        r[ci4] = a + t;

        // Layer 2
        let t = fqmul(r[ci3], L2_ZETAS[0]);
        let a = r[ci1];
        r[ci3] = a - t;
        r[ci1] = a + t;

        let t = fqmul(r[ci7], L2_ZETAS[1]);
        let a = r[ci5];
        r[ci7] = a - t;
        r[ci5] = a + t;

        let t = fqmul(r[ci4], L2_ZETAS[0]);
        let a = r[ci2];
        r[ci4] = a - t;
        r[ci2] = a + t;

        let t = fqmul(r[ci8], L2_ZETAS[1]);
        let a = r[ci6];
        r[ci8] = a - t;
        r[ci6] = a + t;

        // Layer 3
        let t = fqmul(r[ci2], L3_ZETAS[0]);
        let a = r[ci1];
        r[ci2] = a - t;
        r[ci1] = a + t;

        let t = fqmul(r[ci4], L3_ZETAS[1]);
        let a = r[ci3];
        r[ci4] = a - t;
        r[ci3] = a + t;

        let t = fqmul(r[ci6], L3_ZETAS[2]);
        let a = r[ci5];
        r[ci6] = a - t;
        r[ci5] = a + t;

        let t = fqmul(r[ci8], L3_ZETAS[3]);
        let a = r[ci7];
        r[ci8] = a - t;
        r[ci7] = a + t;
    }
}

/// One 32-coefficient sub-tree of the merged layers 4+5.
#[inline]
fn ntt_layer45_butterfly(r: &mut [i16; N], subtree: usize, start: usize) {
    let z1 = LAYER4_ZETAS[subtree];
    let z2 = LAYER5_EVEN_ZETAS[subtree];
    let z3 = LAYER5_ODD_ZETAS[subtree];

    for j in 0..8 {
        let ci1 = start + j;
        let ci2 = ci1 + 8;
        let ci3 = ci1 + 16;
        let ci4 = ci1 + 24;

        // Layer 4
        let t = fqmul(r[ci3], z1);
        let a = r[ci1];
        r[ci3] = a - t;
        r[ci1] = a + t;

        let t = fqmul(r[ci4], z1);
        let a = r[ci2];
        r[ci4] = a - t;
        r[ci2] = a + t;

        // Layer 5
        let t = fqmul(r[ci2], z2);
        let a = r[ci1];
        r[ci2] = a - t;
        r[ci1] = a + t;

        let t = fqmul(r[ci4], z3);
        let a = r[ci3];
        r[ci4] = a - t;
        r[ci3] = a + t;
    }
}

/// Layers 4+5 merged over 8 independent sub-trees. Input bound 4q, output 6q.
fn ntt_layer45(r: &mut [i16; N]) {
    // Unrolled so the butterfly inlines with constant sub-tree indices.
    ntt_layer45_butterfly(r, 0, 0);
    ntt_layer45_butterfly(r, 1, 32);
    ntt_layer45_butterfly(r, 2, 64);
    ntt_layer45_butterfly(r, 3, 96);
    ntt_layer45_butterfly(r, 4, 128);
    ntt_layer45_butterfly(r, 5, 160);
    ntt_layer45_butterfly(r, 6, 192);
    ntt_layer45_butterfly(r, 7, 224);
}

#[inline]
fn ntt_layer6_butterfly(r: &mut [i16; N], zeta_index: usize, start: usize) {
    let zeta = LAYER6_ZETAS[zeta_index];
    for j in 0..4 {
        let ci1 = start + j;
        let ci2 = ci1 + 4;
        let t = fqmul(r[ci2], zeta);
        let a = r[ci1];
        r[ci2] = a - t;
        r[ci1] = a + t;
    }
}

/// Layer 6 over 32 8-coefficient groups. Input bound 6q, output 7q.
fn ntt_layer6(r: &mut [i16; N]) {
    for j in 0..32 {
        ntt_layer6_butterfly(r, j, j * 8);
    }
}

#[inline]
fn ntt_layer7_butterfly(r: &mut [i16; N], zeta_index: usize, start: usize) {
    let zeta = LAYER7_ZETAS[zeta_index];
    let (ci0, ci1, ci2, ci3) = (start, start + 1, start + 2, start + 3);

    // Read and write in natural order of increasing memory location.
    let c0 = r[ci0];
    let c1 = r[ci1];
    let c2 = r[ci2];
    let c3 = r[ci3];

    let zc2 = fqmul(c2, zeta);
    let zc3 = fqmul(c3, zeta);

    r[ci0] = c0 + zc2;
    r[ci1] = c1 + zc3;
    r[ci2] = c0 - zc2;
    r[ci3] = c1 - zc3;
}

/// Layer 7 over 64 4-coefficient groups. Input bound 7q, output 8q.
fn ntt_layer7(r: &mut [i16; N]) {
    for j in 0..64 {
        ntt_layer7_butterfly(r, j, j * 4);
    }
}

/// Forward NTT (in-place). Standard order in, bit-reversed order out.
///
/// Input coefficients must be bounded by q in absolute value; outputs are
/// bounded by 8q.
pub fn forward_ntt(r: &mut [i16; N]) {
    debug_assert!(coeffs_abs_bound(r, BOUND1), "ntt input bound");

    ntt_layer123(r);
    debug_assert!(coeffs_abs_bound(r, BOUND4), "ntt layer123 bound");
    ntt_layer45(r);
    debug_assert!(coeffs_abs_bound(r, BOUND6), "ntt layer45 bound");
    ntt_layer6(r);
    debug_assert!(coeffs_abs_bound(r, BOUND7), "ntt layer6 bound");
    ntt_layer7(r);
    debug_assert!(coeffs_abs_bound(r, BOUND8), "ntt output bound");
}

// -- Inverse NTT --------------------------------------------------------------

#[inline]
fn invntt_layer7_invert_butterfly(r: &mut [i16; N], zeta_index: usize, start: usize) {
    let zeta = LAYER7_ZETAS[zeta_index];
    let (ci0, ci1, ci2, ci3) = (start, start + 1, start + 2, start + 3);

    // Scale by MONT_F on the first read of each coefficient; this both
    // normalises the transform and admits arbitrary i16 input.
    let c0 = fqmul(r[ci0], MONT_F);
    let c1 = fqmul(r[ci1], MONT_F);
    let c2 = fqmul(r[ci2], MONT_F);
    let c3 = fqmul(r[ci3], MONT_F);

    // Reduce the sums now so layer 6 starts from coefficients below q.
    r[ci0] = barrett_reduce(c0 + c2);
    r[ci2] = fqmul(c2 - c0, zeta);

    r[ci1] = barrett_reduce(c1 + c3);
    r[ci3] = fqmul(c3 - c1, zeta);
}

/// Layer 7 with fused normalisation. Any i16 input, output bound q.
fn invntt_layer7_invert(r: &mut [i16; N]) {
    for i in 0..64 {
        invntt_layer7_invert_butterfly(r, 63 - i, i * 4);
    }
}

#[inline]
fn invntt_layer6_butterfly(r: &mut [i16; N], zeta_index: usize, start: usize) {
    let zeta = LAYER6_ZETAS[zeta_index];
    for j in 0..4 {
        let ci0 = start + j;
        let ci4 = ci0 + 4;
        let a = r[ci0];
        let b = r[ci4];
        // Sums stay unreduced here; they remain below 2q.
        r[ci0] = a + b;
        r[ci4] = fqmul(b - a, zeta);
    }
}

/// Layer 6, deferred reduction. Input bound q, output bound 2q.
fn invntt_layer6(r: &mut [i16; N]) {
    for i in 0..32 {
        invntt_layer6_butterfly(r, 31 - i, i * 8);
    }
}

/// One 32-coefficient sub-tree of the merged layers 5+4.
#[inline]
fn invntt_layer54_butterfly(r: &mut [i16; N], zeta_index: usize, start: usize) {
    let l4zeta = LAYER4_ZETAS[zeta_index];
    let l5zeta1 = LAYER5_EVEN_ZETAS[zeta_index];
    let l5zeta2 = LAYER5_ODD_ZETAS[zeta_index];

    for j in 0..8 {
        let ci0 = start + j;
        let ci8 = ci0 + 8;
        let ci16 = ci0 + 16;
        let ci24 = ci0 + 24;

        // Layer 5: defer reduction of the sums.
        {
            let c0 = r[ci0];
            let c8 = r[ci8];
            let c16 = r[ci16];
            let c24 = r[ci24];

            r[ci0] = c0 + c8;
            r[ci8] = fqmul(c8 - c0, l5zeta2);

            r[ci16] = c16 + c24;
            r[ci24] = fqmul(c24 - c16, l5zeta1);
        }

        // Layer 4: Barrett-reduce the sums so layers 3-1 start below q.
        {
            let c0 = r[ci0];
            let c8 = r[ci8];
            let c16 = r[ci16];
            let c24 = r[ci24];

            r[ci0] = barrett_reduce(c0 + c16);
            r[ci16] = fqmul(c16 - c0, l4zeta);

            r[ci8] = barrett_reduce(c8 + c24);
            r[ci24] = fqmul(c24 - c8, l4zeta);
        }
    }
}

/// Layers 5+4 merged. Input bound 2q, output bound q.
fn invntt_layer54(r: &mut [i16; N]) {
    // Unrolled so the butterfly inlines with constant zeta indices.
    invntt_layer54_butterfly(r, 7, 0);
    invntt_layer54_butterfly(r, 6, 32);
    invntt_layer54_butterfly(r, 5, 64);
    invntt_layer54_butterfly(r, 4, 96);
    invntt_layer54_butterfly(r, 3, 128);
    invntt_layer54_butterfly(r, 2, 160);
    invntt_layer54_butterfly(r, 1, 192);
    invntt_layer54_butterfly(r, 0, 224);
}

/// Layers 3+2+1 merged, all deferring reduction. Input bound q, output 8q.
fn invntt_layer321(r: &mut [i16; N]) {
    for j in 0..32 {
        let (ci0, ci32, ci64, ci96) = (j, j + 32, j + 64, j + 96);
        let (ci128, ci160, ci192, ci224) = (j + 128, j + 160, j + 192, j + 224);

        // Layer 3
        {
            let c0 = r[ci0];
            let c32 = r[ci32];
            let c64 = r[ci64];
            let c96 = r[ci96];
            let c128 = r[ci128];
            let c160 = r[ci160];
            let c192 = r[ci192];
            let c224 = r[ci224];

            r[ci0] = c0 + c32;
            r[ci32] = fqmul(c32 - c0, L3_ZETAS[3]);

            r[ci64] = c64 + c96;
            r[ci96] = fqmul(c96 - c64, L3_ZETAS[2]);

            r[ci128] = c128 + c160;
            r[ci160] = fqmul(c160 - c128, L3_ZETAS[1]);

            r[ci192] = c192 + c224;
            r[ci224] = fqmul(c224 - c192, L3_ZETAS[0]);
        }

        // Layer 2
        {
            let c0 = r[ci0];
            let c32 = r[ci32];
            let c64 = r[ci64];
            let c96 = r[ci96];
            let c128 = r[ci128];
            let c160 = r[ci160];
            let c192 = r[ci192];
            let c224 = r[ci224];

            r[ci0] = c0 + c64;
            r[ci64] = fqmul(c64 - c0, L2_ZETAS[1]);

            r[ci32] = c32 + c96;
            r[ci96] = fqmul(c96 - c32, L2_ZETAS[1]);

            r[ci128] = c128 + c192;
            r[ci192] = fqmul(c192 - c128, L2_ZETAS[0]);

            r[ci160] = c160 + c224;
            r[ci224] = fqmul(c224 - c160, L2_ZETAS[0]);
        }

        // Layer 1
        {
            let c0 = r[ci0];
            let c32 = r[ci32];
            let c64 = r[ci64];
            let c96 = r[ci96];
            let c128 = r[ci128];
            let c160 = r[ci160];
            let c192 = r[ci192];
            let c224 = r[ci224];

            r[ci0] = c0 + c128;
            r[ci128] = fqmul(c128 - c0, L1_ZETA);

            r[ci32] = c32 + c160;
            r[ci160] = fqmul(c160 - c32, L1_ZETA);

            r[ci64] = c64 + c192;
            r[ci192] = fqmul(c192 - c64, L1_ZETA);

            r[ci96] = c96 + c224;
            r[ci224] = fqmul(c224 - c96, L1_ZETA);
        }
    }
}

/// Inverse NTT (in-place), with the Montgomery normalisation factor folded
/// into the first layer. Bit-reversed order in, standard order out.
///
/// Accepts arbitrary i16 coefficients; outputs are bounded by 8q. The result
/// carries one Montgomery factor 2^{16}, matching a subsequent `fqmul`-based
/// use (or an explicit un-scaling by `fqmul(c, 1)`).
pub fn inverse_ntt(r: &mut [i16; N]) {
    invntt_layer7_invert(r);
    debug_assert!(coeffs_abs_bound(r, BOUND1), "invntt layer7 bound");
    invntt_layer6(r);
    debug_assert!(coeffs_abs_bound(r, BOUND2), "invntt layer6 bound");
    invntt_layer54(r);
    debug_assert!(coeffs_abs_bound(r, BOUND1), "invntt layer54 bound");
    invntt_layer321(r);
    debug_assert!(coeffs_abs_bound(r, BOUND8), "invntt output bound");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::to_unsigned;

    fn normalise(c: i16) -> u16 {
        // Undo the Montgomery factor left by inverse_ntt, then lift to [0, q).
        to_unsigned(barrett_reduce(fqmul(c, 1)))
    }

    #[test]
    fn ntt_of_unit_impulse() {
        // The constant polynomial 1 maps to (1, 0) in each quadratic factor.
        let mut a = [0i16; N];
        a[0] = 1;
        forward_ntt(&mut a);
        for (i, &c) in a.iter().enumerate() {
            // Exact: only 0 and 1 ever flow through the butterflies here.
            let expected = if i % 2 == 0 { 1 } else { 0 };
            assert_eq!(c, expected, "index {i}");
        }
    }

    #[test]
    fn ntt_inverse_ntt_roundtrip() {
        let mut a = [0i16; N];
        for (i, c) in a.iter_mut().enumerate() {
            *c = (i % 13) as i16 - 6;
        }
        let original = a;
        forward_ntt(&mut a);
        assert_ne!(a, original, "NTT should change coefficients");
        inverse_ntt(&mut a);

        for (i, (&got, &exp)) in a.iter().zip(original.iter()).enumerate() {
            assert_eq!(
                normalise(got) as i32,
                (exp as i32).rem_euclid(Q as i32),
                "mismatch at index {i}"
            );
        }
    }

    #[test]
    fn forward_bound_on_extremal_input() {
        let mut a = [0i16; N];
        for (i, c) in a.iter_mut().enumerate() {
            *c = if i % 2 == 0 { Q - 1 } else { -(Q - 1) };
        }
        forward_ntt(&mut a);
        assert!(coeffs_abs_bound(&a, BOUND8));
    }

    #[test]
    fn inverse_accepts_arbitrary_i16() {
        let mut a = [0i16; N];
        for (i, c) in a.iter_mut().enumerate() {
            *c = match i % 4 {
                0 => i16::MIN,
                1 => i16::MAX,
                2 => -12345,
                _ => 31337,
            };
        }
        inverse_ntt(&mut a);
        assert!(coeffs_abs_bound(&a, BOUND8));
    }
}
