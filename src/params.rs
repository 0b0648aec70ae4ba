//! ML-KEM parameter-set bundles.
//!
//! The sealed [`ParameterSet`] trait binds, per security level, the knobs the
//! polynomial core is parametric in: the eta-1 noise width and the d_u/d_v
//! compression widths. The polynomial routines themselves only ever see a
//! single `CbdWidth` or `CompressWidth`; a KEM layer picks the bundle once at
//! its outer boundary.

use crate::{
    POLYBYTES,
    compress::{CompressWidthParams, D4, D5, D10, D11},
    sample::{CbdWidth, Eta2, Eta3},
};

mod sealed {
    pub trait Sealed {}
}

/// ML-KEM parameter set. Sealed -- only implemented for [`MlKem512`],
/// [`MlKem768`], and [`MlKem1024`].
pub trait ParameterSet: sealed::Sealed + 'static {
    /// Module rank k.
    const K: usize;

    /// Noise width for secret and error vectors (3 only when k = 2).
    type Eta1: CbdWidth;
    /// Noise width for encryption noise; 2 for every set.
    type Eta2: CbdWidth;
    /// Compression width for the u ciphertext component.
    type Du: CompressWidthParams;
    /// Compression width for the v ciphertext component.
    type Dv: CompressWidthParams;

    /// Bytes of one d_u-compressed polynomial.
    const POLY_COMPRESSED_BYTES_DU: usize = <Self::Du as CompressWidthParams>::POLY_BYTES;
    /// Bytes of one d_v-compressed polynomial.
    const POLY_COMPRESSED_BYTES_DV: usize = <Self::Dv as CompressWidthParams>::POLY_BYTES;
    /// Bytes of the k serialised polynomials of a vector.
    const POLYVEC_BYTES: usize = Self::K * POLYBYTES;
}

/// ML-KEM-512 (k = 2, NIST security level 1).
#[derive(Debug, Clone, Copy)]
pub struct MlKem512;

/// ML-KEM-768 (k = 3, NIST security level 3).
#[derive(Debug, Clone, Copy)]
pub struct MlKem768;

/// ML-KEM-1024 (k = 4, NIST security level 5).
#[derive(Debug, Clone, Copy)]
pub struct MlKem1024;

impl sealed::Sealed for MlKem512 {}
impl ParameterSet for MlKem512 {
    const K: usize = 2;
    type Eta1 = Eta3;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;
}

impl sealed::Sealed for MlKem768 {}
impl ParameterSet for MlKem768 {
    const K: usize = 3;
    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D10;
    type Dv = D4;
}

impl sealed::Sealed for MlKem1024 {}
impl ParameterSet for MlKem1024 {
    const K: usize = 4;
    type Eta1 = Eta2;
    type Eta2 = Eta2;
    type Du = D11;
    type Dv = D5;
}

const _: () = {
    macro_rules! check_params {
        ($t:ty, $du:literal, $dv:literal, $pvb:literal) => {
            assert!(<$t as ParameterSet>::POLY_COMPRESSED_BYTES_DU == $du);
            assert!(<$t as ParameterSet>::POLY_COMPRESSED_BYTES_DV == $dv);
            assert!(<$t as ParameterSet>::POLYVEC_BYTES == $pvb);
        };
    }
    check_params!(MlKem512, 320, 128, 768);
    check_params!(MlKem768, 320, 128, 1152);
    check_params!(MlKem1024, 352, 160, 1536);

    assert!(<<MlKem512 as ParameterSet>::Eta1 as CbdWidth>::ETA == 3);
    assert!(<<MlKem768 as ParameterSet>::Eta1 as CbdWidth>::ETA == 2);
    assert!(<<MlKem1024 as ParameterSet>::Eta1 as CbdWidth>::ETA == 2);
};
