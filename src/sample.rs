//! Deterministic noise sampling: sealed CBD traits and batched generation.
//!
//! The centred binomial distribution CBD_eta turns `eta * N / 4` pseudorandom
//! bytes into 256 coefficients in [-eta, eta]: each coefficient is the
//! difference of two eta-bit popcounts taken from consecutive bits of the
//! stream (LSB first within each byte, bytes in increasing order).
//!
//! The pseudorandom stream itself comes from the caller through the [`Prf`]
//! collaborator trait: a pure function of a 32-byte seed and a 1-byte nonce.
//! [`PrfX4`] is its 4-lane batched refinement for PRF implementations that
//! can run four absorb/squeeze pipelines in parallel; the default method
//! falls back to four scalar calls.

use crate::{N, Polynomial, SYMBYTES, coeffs_abs_bound};

mod sealed {
    pub trait Sealed {}
}

/// Sealed trait for CBD noise sampling width.
pub trait CbdWidth: sealed::Sealed {
    const ETA: usize;
    /// PRF bytes consumed per polynomial: `ETA * N / 4`.
    const BUF_BYTES: usize;

    fn sample(r: &mut [i16; N], buf: &[u8]);
}

pub struct Eta2;
pub struct Eta3;

impl sealed::Sealed for Eta2 {}
impl CbdWidth for Eta2 {
    const ETA: usize = 2;
    const BUF_BYTES: usize = 2 * N / 4;

    #[inline]
    fn sample(r: &mut [i16; N], buf: &[u8]) {
        debug_assert!(buf.len() >= Self::BUF_BYTES);
        for i in 0..N / 8 {
            let t =
                u32::from_le_bytes([buf[4 * i], buf[4 * i + 1], buf[4 * i + 2], buf[4 * i + 3]]);
            let d = (t & 0x5555_5555) + ((t >> 1) & 0x5555_5555);
            for j in 0..8 {
                let a = ((d >> (4 * j)) & 3) as i16;
                let b = ((d >> (4 * j + 2)) & 3) as i16;
                r[8 * i + j] = a - b;
            }
        }
        debug_assert!(coeffs_abs_bound(r, Self::ETA as i32 + 1));
    }
}

impl sealed::Sealed for Eta3 {}
impl CbdWidth for Eta3 {
    const ETA: usize = 3;
    const BUF_BYTES: usize = 3 * N / 4;

    #[inline]
    fn sample(r: &mut [i16; N], buf: &[u8]) {
        debug_assert!(buf.len() >= Self::BUF_BYTES);
        for i in 0..N / 4 {
            let t =
                u32::from_le_bytes([buf[3 * i], buf[3 * i + 1], buf[3 * i + 2], 0]) & 0x00FF_FFFF;
            let d = (t & 0x0024_9249) + ((t >> 1) & 0x0024_9249) + ((t >> 2) & 0x0024_9249);
            for j in 0..4 {
                let a = ((d >> (6 * j)) & 7) as i16;
                let b = ((d >> (6 * j + 3)) & 7) as i16;
                r[4 * i + j] = a - b;
            }
        }
        debug_assert!(coeffs_abs_bound(r, Self::ETA as i32 + 1));
    }
}

/// Largest PRF buffer any width needs (eta = 3).
const MAX_CBD_BYTES: usize = 3 * N / 4;

/// Pseudorandom function collaborator: fills `out` with the stream determined
/// by `seed || nonce`. Pure; the same inputs always yield the same stream.
pub trait Prf {
    fn fill(seed: &[u8; SYMBYTES], nonce: u8, out: &mut [u8]);
}

/// 4-lane batched PRF. Implementations with a parallel permutation override
/// [`fill_x4`](Self::fill_x4); the default runs the lanes sequentially. All
/// four outputs must have the same length.
pub trait PrfX4: Prf {
    fn fill_x4(seed: &[u8; SYMBYTES], nonces: [u8; 4], out: [&mut [u8]; 4]) {
        let [o0, o1, o2, o3] = out;
        Self::fill(seed, nonces[0], o0);
        Self::fill(seed, nonces[1], o1);
        Self::fill(seed, nonces[2], o2);
        Self::fill(seed, nonces[3], o3);
    }
}

/// Sample one CBD_eta polynomial from `PRF(seed, nonce)`.
#[must_use]
pub fn getnoise<Eta: CbdWidth, P: Prf>(seed: &[u8; SYMBYTES], nonce: u8) -> Polynomial {
    let mut buf = [0u8; MAX_CBD_BYTES];
    P::fill(seed, nonce, &mut buf[..Eta::BUF_BYTES]);
    Polynomial::sample_cbd::<Eta>(&buf[..Eta::BUF_BYTES])
}

/// Sample four CBD_eta polynomials from one batched PRF invocation over
/// `seed` and four nonces.
#[must_use]
pub fn getnoise_x4<Eta: CbdWidth, P: PrfX4>(
    seed: &[u8; SYMBYTES],
    nonces: [u8; 4],
) -> [Polynomial; 4] {
    let mut bufs = [[0u8; MAX_CBD_BYTES]; 4];
    {
        let [b0, b1, b2, b3] = &mut bufs;
        P::fill_x4(
            seed,
            nonces,
            [
                &mut b0[..Eta::BUF_BYTES],
                &mut b1[..Eta::BUF_BYTES],
                &mut b2[..Eta::BUF_BYTES],
                &mut b3[..Eta::BUF_BYTES],
            ],
        );
    }
    [
        Polynomial::sample_cbd::<Eta>(&bufs[0][..Eta::BUF_BYTES]),
        Polynomial::sample_cbd::<Eta>(&bufs[1][..Eta::BUF_BYTES]),
        Polynomial::sample_cbd::<Eta>(&bufs[2][..Eta::BUF_BYTES]),
        Polynomial::sample_cbd::<Eta>(&bufs[3][..Eta::BUF_BYTES]),
    ]
}

/// Sample two CBD_etaA and two CBD_etaB polynomials, one per nonce lane.
/// When the widths coincide all four lanes share one batched PRF call;
/// otherwise the lanes run on the scalar PRF, since mixed output lengths
/// cannot share a batch.
#[must_use]
pub fn getnoise_mixed_x4<EtaA: CbdWidth, EtaB: CbdWidth, P: PrfX4>(
    seed: &[u8; SYMBYTES],
    nonces: [u8; 4],
) -> ([Polynomial; 2], [Polynomial; 2]) {
    if EtaA::ETA == EtaB::ETA {
        // Same width, same buffer length: all four lanes fit one batch.
        let [r0, r1, r2, r3] = getnoise_x4::<EtaA, P>(seed, nonces);
        ([r0, r1], [r2, r3])
    } else {
        (
            [
                getnoise::<EtaA, P>(seed, nonces[0]),
                getnoise::<EtaA, P>(seed, nonces[1]),
            ],
            [
                getnoise::<EtaB, P>(seed, nonces[2]),
                getnoise::<EtaB, P>(seed, nonces[3]),
            ],
        )
    }
}
