//! `mlkem-math` — Polynomial arithmetic core for ML-KEM (FIPS 203).
//!
//! `no_std`, zero-allocation arithmetic over `R_q = Z_q[X]/(X^{256}+1)` with
//! q = 3329. Sub-modules cover modular reduction, the layer-merged
//! Number-Theoretic Transform and its inverse, base multiplication in the NTT
//! domain, byte-level packing and compression codecs, message encoding, and
//! centred-binomial noise sampling from a caller-supplied PRF.
//!
//! # Design principles
//!
//! - **No `unsafe`** — enforced by `#![deny(unsafe_code)]`.
//! - **No allocation** — every polynomial lives in caller-provided storage.
//! - **Constant time** — no secret-dependent branches or memory accesses;
//!   secret-dependent selects go through the mask helpers in [`ct`].
//! - **Tracked coefficient bounds** — each NTT layer's contract states the
//!   absolute bound its outputs satisfy; `debug_assert!` checks enforce them
//!   in debug builds and are compiled out in release.
//! - **RAII zeroization** of secret-derived values via the `zeroize` crate.
//!
//! The symmetric primitives are not implemented here: sampling consumes a
//! pseudorandom byte stream through the [`sample::Prf`] and [`sample::PrfX4`]
//! collaborator traits.

#![no_std]
#![deny(unsafe_code)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

pub mod backend;
pub mod compress;
pub mod ct;
pub mod encode;
pub mod ntt;
pub mod params;
pub mod poly;
pub mod reduce;
pub mod sample;
pub mod zetas;

pub use poly::{MulCache, NttPolynomial, Polynomial, RawNttPolynomial};

/// Polynomial ring degree.
pub const N: usize = 256;

/// Field modulus.
pub const Q: i16 = 3329;

/// `(q + 1) / 2`, the image of a set message bit under decompression.
pub const HALF_Q: i16 = (Q + 1) / 2;

/// Size in bytes of hashes, seeds, and messages.
pub const SYMBYTES: usize = 32;

/// Size in bytes of a serialised polynomial (12 bits * 256 / 8).
pub const POLYBYTES: usize = 384;

/// Contractual absolute bound on coefficients after the forward NTT.
pub const NTT_BOUND: i32 = 8 * (Q as i32);

/// Contractual absolute bound on coefficients after the inverse NTT.
pub const INVNTT_BOUND: i32 = 8 * (Q as i32);

/// `true` iff every coefficient of `r` has absolute value strictly below
/// `bound`. Used in `debug_assert!` bound checks throughout the crate.
#[must_use]
pub fn coeffs_abs_bound(r: &[i16], bound: i32) -> bool {
    r.iter().all(|&c| (c as i32).abs() < bound)
}

/// `true` iff every coefficient of `r` lies in `[0, bound)`.
#[must_use]
pub fn coeffs_unsigned_bound(r: &[i16], bound: i32) -> bool {
    r.iter().all(|&c| (0..bound).contains(&(c as i32)))
}
