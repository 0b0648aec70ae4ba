//! Polynomial byte-level encoding (12-bit packing) and message encode/decode.
//!
//! Two canonical coefficients pack into three bytes, little-endian:
//!
//! ```text
//! b[3i]   = t0[7:0]
//! b[3i+1] = t0[11:8] | (t1[3:0] << 4)
//! b[3i+2] = t1[11:4]
//! ```
//!
//! Unpacking yields 12-bit values in [0, 4096) which are NOT reduced modulo
//! q; see [`crate::poly::RawNttPolynomial`] for how that shows up in the
//! type system.

use crate::{
    N, POLYBYTES, Q, SYMBYTES, coeffs_unsigned_bound,
    compress::{CompressWidth, D1},
    reduce::to_unsigned,
};

/// Pack 256 canonical coefficients into 384 bytes.
///
/// Inputs must be in (-q, q); each is lifted to its canonical representative
/// in [0, q) before packing.
pub fn coeffs_to_bytes(r: &mut [u8], a: &[i16; N]) {
    debug_assert!(r.len() >= POLYBYTES);
    for i in 0..N / 2 {
        let t0 = to_unsigned(a[2 * i]);
        let t1 = to_unsigned(a[2 * i + 1]);
        r[3 * i] = t0 as u8;
        r[3 * i + 1] = ((t0 >> 8) | (t1 << 4)) as u8;
        r[3 * i + 2] = (t1 >> 4) as u8;
    }
}

/// Unpack 384 bytes into 256 coefficients in [0, 4096).
///
/// The outputs are not canonical: 12-bit fields can exceed q - 1. Reduction
/// is the caller's responsibility where canonicity is needed.
pub fn bytes_to_coeffs(r: &mut [i16; N], a: &[u8]) {
    debug_assert!(a.len() >= POLYBYTES);
    for i in 0..N / 2 {
        let t0 = a[3 * i] as u16;
        let t1 = a[3 * i + 1] as u16;
        let t2 = a[3 * i + 2] as u16;
        r[2 * i] = (t0 | ((t1 & 0x0F) << 8)) as i16;
        r[2 * i + 1] = ((t1 >> 4) | (t2 << 4)) as i16;
    }
    debug_assert!(coeffs_unsigned_bound(r, 4096));
}

/// Decode a 32-byte message: bit b of the message maps coefficient `8i + j`
/// to `HALF_Q * b`. Constant time with respect to the message.
pub fn message_to_coeffs(r: &mut [i16; N], msg: &[u8; SYMBYTES]) {
    D1::decompress_poly(r, msg);
    debug_assert!(coeffs_unsigned_bound(r, Q as i32));
}

/// Encode a polynomial to a 32-byte message via 1-bit compression.
/// Coefficients must be in (-q, q).
pub fn coeffs_to_message(msg: &mut [u8; SYMBYTES], a: &[i16; N]) {
    D1::compress_poly(msg, a);
}
