//! Domain-separated polynomial types.
//!
//! [`Polynomial`] represents a polynomial in standard (coefficient) form.
//! [`NttPolynomial`] represents a polynomial in NTT (bit-reversed) form. The
//! NTT transform is a consuming operation that produces the other type,
//! preventing accidental misuse of domain-mismatched polynomials.
//!
//! [`RawNttPolynomial`] is the deserialisation product: its coefficients are
//! 12-bit values in [0, 4096) which may exceed q - 1. Keeping it distinct
//! makes the non-canonicity impossible to overlook; it is nonetheless a valid
//! first operand for base multiplication, whose contract only needs the
//! 12-bit bound.
//!
//! [`MulCache`] holds the twiddle-weighted odd coefficients of a second
//! operand, halving the twiddle multiplications in repeated base
//! multiplications against the same polynomial.

use core::ops;

use zeroize::Zeroize;

use crate::{
    N, Q, SYMBYTES,
    backend::{Active, Backend},
    coeffs_abs_bound, coeffs_unsigned_bound,
    compress::CompressWidth,
    encode,
    reduce::{barrett_reduce, fqmul, montgomery_reduce, to_unsigned},
    sample::CbdWidth,
    zetas::LAYER7_ZETAS,
};

/// Number of entries in a [`MulCache`]: one per quadratic factor.
pub const MULCACHE_LEN: usize = N / 2;

/// 2^{32} mod q; one `fqmul` by it converts a plain value to Montgomery form.
const MONT_SQ: i16 = 1353;

/// Polynomial in standard (coefficient) form over `R_q = Z_q[X]/(X^{256}+1)`.
#[derive(Clone, Copy, Zeroize)]
pub struct Polynomial(pub(crate) [i16; N]);

/// Polynomial in NTT (bit-reversed) domain.
#[derive(Clone, Copy, Zeroize)]
pub struct NttPolynomial(pub(crate) [i16; N]);

/// NTT-domain polynomial freshly deserialised from bytes: coefficients are
/// in [0, 4096) and may exceed q - 1.
#[derive(Clone, Copy, Zeroize)]
pub struct RawNttPolynomial(pub(crate) [i16; N]);

/// Precomputed twiddle-weighted odd coefficients of an NTT-domain polynomial.
///
/// Entry `2i` holds `a[4i+1] * zeta_i` and entry `2i+1` holds
/// `a[4i+3] * (-zeta_i)`, both Montgomery-reduced and so bounded by q.
#[derive(Clone, Copy, Zeroize)]
pub struct MulCache(pub(crate) [i16; MULCACHE_LEN]);

// -- Coefficient-level routines the backend seam dispatches to ----------------

/// Multiply every coefficient by 2^{32} mod q, entering Montgomery form.
/// Output bounded by q.
pub(crate) fn to_mont_coeffs(r: &mut [i16; N]) {
    for c in r.iter_mut() {
        *c = fqmul(*c, MONT_SQ);
    }
}

/// Barrett-reduce then conditionally add q: canonical representatives [0, q).
pub(crate) fn reduce_coeffs(r: &mut [i16; N]) {
    for c in r.iter_mut() {
        *c = to_unsigned(barrett_reduce(*c)) as i16;
    }
    debug_assert!(coeffs_unsigned_bound(r, Q as i32));
}

/// Fill the mulcache for `a`: entry 2i gets `a[4i+1] * zeta_i`, entry 2i+1
/// gets `a[4i+3] * (-zeta_i)`, Montgomery-reduced.
pub(crate) fn mulcache_compute_coeffs(x: &mut [i16; MULCACHE_LEN], a: &[i16; N]) {
    for i in 0..N / 4 {
        x[2 * i] = fqmul(a[4 * i + 1], LAYER7_ZETAS[i]);
        x[2 * i + 1] = fqmul(a[4 * i + 3], -LAYER7_ZETAS[i]);
    }
    debug_assert!(coeffs_abs_bound(x, Q as i32));
}

/// One base multiplication in `Z_q[X]/(X^2 - zeta)`:
/// `(r0, r1) = (a0*b0 + a1*b_cached, a0*b1 + a1*b0) / 2^{16}`.
///
/// With `b_cached = b1 * zeta` this is the product of `a0 + a1*X` and
/// `b0 + b1*X`. Requires `|a0|, |a1| < 4096`; `b` and `b_cached` may be any
/// i16. Outputs are bounded by 2q.
#[inline]
fn basemul_cached(r: &mut [i16; N], i: usize, a: &[i16; N], b: &[i16; N], b_cached: i16) {
    let t0 = (a[i + 1] as i32) * (b_cached as i32) + (a[i] as i32) * (b[i] as i32);
    let t1 = (a[i] as i32) * (b[i + 1] as i32) + (a[i + 1] as i32) * (b[i] as i32);

    // |t| < 2 * 4096 * 2^{15}, within the Montgomery reduction domain.
    r[i] = montgomery_reduce(t0);
    r[i + 1] = montgomery_reduce(t1);
}

/// Full cached base multiplication: two quadratic factors per iteration.
pub(crate) fn basemul_montgomery_cached(
    r: &mut [i16; N],
    a: &[i16; N],
    b: &[i16; N],
    cache: &[i16; MULCACHE_LEN],
) {
    debug_assert!(coeffs_abs_bound(a, 4096), "basemul input bound");
    debug_assert!(coeffs_abs_bound(cache, 4096), "mulcache bound");

    for i in 0..N / 4 {
        basemul_cached(r, 4 * i, a, b, cache[2 * i]);
        basemul_cached(r, 4 * i + 2, a, b, cache[2 * i + 1]);
    }
    debug_assert!(coeffs_abs_bound(r, 2 * Q as i32), "basemul output bound");
}

// -- Polynomial (standard form) -----------------------------------------------

impl Polynomial {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0i16; N])
    }

    /// Consuming forward NTT transform.
    ///
    /// Coefficients must be bounded by q in absolute value; the result is
    /// bounded by [`Active::NTT_OUTPUT_BOUND`](Backend::NTT_OUTPUT_BOUND).
    #[must_use]
    pub fn ntt(mut self) -> NttPolynomial {
        Active::forward_ntt(&mut self.0);
        NttPolynomial(self.0)
    }

    /// Canonicalise all coefficients into [0, q).
    pub fn reduce(&mut self) {
        Active::reduce(&mut self.0);
    }

    /// Compress to `D` bits per coefficient and write to `r`.
    /// Coefficients must be in (-q, q).
    pub fn compress<D: CompressWidth>(&self, r: &mut [u8]) {
        D::compress_poly(r, &self.0);
    }

    /// Decompress from `D`-bit packed form. Output coefficients are
    /// canonical.
    #[must_use]
    pub fn decompress<D: CompressWidth>(a: &[u8]) -> Self {
        let mut p = Self::zero();
        D::decompress_poly(&mut p.0, a);
        p
    }

    /// Decode a 32-byte message into a polynomial, constant-time in the
    /// message bits.
    #[must_use]
    pub fn from_message(msg: &[u8; SYMBYTES]) -> Self {
        let mut p = Self::zero();
        encode::message_to_coeffs(&mut p.0, msg);
        p
    }

    /// Encode to a 32-byte message. Coefficients must be in (-q, q).
    #[must_use]
    pub fn to_message(&self) -> [u8; SYMBYTES] {
        let mut msg = [0u8; SYMBYTES];
        encode::coeffs_to_message(&mut msg, &self.0);
        msg
    }

    /// Sample a noise polynomial from a PRF output buffer via the sealed
    /// [`CbdWidth`] trait.
    #[must_use]
    pub fn sample_cbd<Eta: CbdWidth>(buf: &[u8]) -> Self {
        let mut p = Self::zero();
        Eta::sample(&mut p.0, buf);
        p
    }

    #[must_use]
    pub const fn coeffs(&self) -> &[i16; N] {
        &self.0
    }

    #[must_use]
    pub fn coeffs_mut(&mut self) -> &mut [i16; N] {
        &mut self.0
    }
}

// -- NttPolynomial (NTT domain) -----------------------------------------------

impl NttPolynomial {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0i16; N])
    }

    /// Consuming inverse NTT transform. Result carries one Montgomery factor
    /// and is bounded by
    /// [`Active::INVNTT_OUTPUT_BOUND`](Backend::INVNTT_OUTPUT_BOUND).
    #[must_use]
    pub fn ntt_inverse(mut self) -> Polynomial {
        Active::inverse_ntt(&mut self.0);
        Polynomial(self.0)
    }

    /// Canonicalise all coefficients into [0, q). Afterwards the polynomial
    /// satisfies the 12-bit bound required of the first basemul operand.
    pub fn reduce(&mut self) {
        Active::reduce(&mut self.0);
    }

    /// Convert all coefficients to Montgomery representation.
    pub fn to_mont(&mut self) {
        Active::to_mont(&mut self.0);
    }

    /// Precompute the mulcache for repeated base multiplications with `self`
    /// as second operand.
    #[must_use]
    pub fn mulcache(&self) -> MulCache {
        let mut x = MulCache([0i16; MULCACHE_LEN]);
        Active::mulcache_compute(&mut x.0, &self.0);
        x
    }

    /// Cached pointwise Montgomery multiplication: 128 degree-1
    /// multiplications in the NTT domain.
    ///
    /// `self` is the first operand and must be coefficient-wise below 4096
    /// in absolute value (e.g. freshly reduced); `b` may be arbitrary.
    /// `cache` must be `b.mulcache()`. Outputs are bounded by 2q.
    #[must_use]
    pub fn basemul_cached(&self, b: &Self, cache: &MulCache) -> Self {
        let mut r = Self::zero();
        basemul_montgomery_cached(&mut r.0, &self.0, &b.0, &cache.0);
        r
    }

    /// Serialize to 384 bytes (12-bit packing). Coefficients must be in
    /// (-q, q).
    pub fn to_bytes(&self, r: &mut [u8]) {
        debug_assert!(coeffs_abs_bound(&self.0, Q as i32));
        Active::to_bytes(r, &self.0);
    }

    #[must_use]
    pub const fn coeffs(&self) -> &[i16; N] {
        &self.0
    }

    #[must_use]
    pub fn coeffs_mut(&mut self) -> &mut [i16; N] {
        &mut self.0
    }
}

// -- RawNttPolynomial (deserialised, unreduced) -------------------------------

impl RawNttPolynomial {
    /// Deserialize from 384 bytes of 12-bit packed data. The result is
    /// explicitly non-canonical: coefficients land in [0, 4096).
    #[must_use]
    pub fn from_bytes(a: &[u8]) -> Self {
        let mut p = Self([0i16; N]);
        Active::from_bytes(&mut p.0, a);
        p
    }

    /// Canonicalise into an [`NttPolynomial`] with coefficients in [0, q).
    #[must_use]
    pub fn reduce(mut self) -> NttPolynomial {
        Active::reduce(&mut self.0);
        NttPolynomial(self.0)
    }

    /// Precompute the mulcache for repeated base multiplications with `self`
    /// as second operand.
    #[must_use]
    pub fn mulcache(&self) -> MulCache {
        let mut x = MulCache([0i16; MULCACHE_LEN]);
        Active::mulcache_compute(&mut x.0, &self.0);
        x
    }

    /// Cached pointwise Montgomery multiplication with `self` as first
    /// operand; the 12-bit coefficient bound holds by construction.
    #[must_use]
    pub fn basemul_cached(&self, b: &NttPolynomial, cache: &MulCache) -> NttPolynomial {
        let mut r = NttPolynomial::zero();
        basemul_montgomery_cached(&mut r.0, &self.0, &b.0, &cache.0);
        r
    }

    #[must_use]
    pub const fn coeffs(&self) -> &[i16; N] {
        &self.0
    }
}

impl MulCache {
    #[must_use]
    pub const fn entries(&self) -> &[i16; MULCACHE_LEN] {
        &self.0
    }
}

// -- Conversions & traits -----------------------------------------------------

impl From<[i16; N]> for Polynomial {
    #[inline]
    fn from(coeffs: [i16; N]) -> Self {
        Self(coeffs)
    }
}

impl Default for Polynomial {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl Default for NttPolynomial {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl core::fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Polynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl core::fmt::Debug for NttPolynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NttPolynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl core::fmt::Debug for RawNttPolynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawNttPolynomial")
            .field("coeffs[..4]", &&self.0[..4])
            .finish_non_exhaustive()
    }
}

impl<'b> ops::Add<&'b Polynomial> for &Polynomial {
    type Output = Polynomial;

    /// Coefficient-wise addition without reduction; the caller keeps sums
    /// within i16 range.
    #[inline]
    fn add(self, rhs: &'b Polynomial) -> Polynomial {
        let mut r = *self;
        r += rhs;
        r
    }
}

impl<'b> ops::Sub<&'b Polynomial> for &Polynomial {
    type Output = Polynomial;

    #[inline]
    fn sub(self, rhs: &'b Polynomial) -> Polynomial {
        let mut r = *self;
        r -= rhs;
        r
    }
}

impl ops::AddAssign<&Self> for Polynomial {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        for (c, &b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *c += b;
        }
    }
}

impl ops::SubAssign<&Self> for Polynomial {
    #[inline]
    fn sub_assign(&mut self, rhs: &Self) {
        for (c, &b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *c -= b;
        }
    }
}

impl<'b> ops::Add<&'b NttPolynomial> for &NttPolynomial {
    type Output = NttPolynomial;

    #[inline]
    fn add(self, rhs: &'b NttPolynomial) -> NttPolynomial {
        let mut r = *self;
        r += rhs;
        r
    }
}

impl ops::AddAssign<&Self> for NttPolynomial {
    #[inline]
    fn add_assign(&mut self, rhs: &Self) {
        for (c, &b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *c += b;
        }
    }
}
