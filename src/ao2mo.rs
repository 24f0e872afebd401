//! AO→MO transform of the full two-electron integral tensor.
//!
//! Chemist notation is kept throughout:
//!
//! ```text
//! (IA|JB) = Σ_{pqrs} C[p,I] C[q,A] C[r,J] C[s,B] (pq|rs)
//! ```
//!
//! The contraction is done as four quarter transforms. Each one contracts the
//! last axis against `C` with a single matrix multiplication and rotates the
//! new MO axis to the front, so after four steps the axes are back in their
//! original order. Each step costs `O(nao^4 nmo)`.

use crate::prelude::*;

/// Contract the last axis of a 4-index tensor with `mo_coeff` and rotate it to the front.
///
/// `[d0, d1, d2, nao]` -> `[nmo, d0, d1, d2]`
pub fn quarter_transform(eri: &Tsr, mo_coeff: &Tsr) -> Tsr {
    let shape = eri.shape().to_vec();
    let nmo = mo_coeff.shape()[1];
    let (d0, d1, d2, d3) = (shape[0], shape[1], shape[2], shape[3]);

    let scr = eri.reshape((d0 * d1 * d2, d3)) % mo_coeff;
    let scr = scr.into_shape((d0, d1, d2, nmo));
    scr.transpose([3, 0, 1, 2]).to_owned()
}

/// Validate the coefficient matrix against the AO ERI tensor.
pub fn check_ao2mo_shapes(eri_ao: &Tsr, mo_coeff: &Tsr) -> Result<(), MP3Error> {
    if mo_coeff.ndim() != 2 {
        return Err(MP3Error::ShapeMismatch(format!("mo_coeff must be a matrix, got shape {:?}", mo_coeff.shape())));
    }
    let nao = mo_coeff.shape()[0];
    check_shape("eri_ao", eri_ao.shape(), &[nao, nao, nao, nao])
}

/// Transform AO integrals `(pq|rs)` to spatial MO integrals `(IA|JB)`.
///
/// Input `eri_ao` is `[nao; 4]`, `mo_coeff` is `[nao, nmo]`; output is `[nmo; 4]`.
/// The AO tensor is consumed.
pub fn get_mo_eri_spatial(eri_ao: Tsr, mo_coeff: &Tsr) -> Result<Tsr, MP3Error> {
    check_ao2mo_shapes(&eri_ao, mo_coeff)?;
    let nmo = mo_coeff.shape()[1];

    let timer = std::time::Instant::now();
    let eri = quarter_transform(&eri_ao, mo_coeff);
    drop(eri_ao);
    let eri = quarter_transform(&eri, mo_coeff);
    let eri = quarter_transform(&eri, mo_coeff);
    let eri = quarter_transform(&eri, mo_coeff);
    log::info!("Time elapsed (ao2mo): {:?}", timer.elapsed());

    check_shape("eri_mo", eri.shape(), &[nmo, nmo, nmo, nmo])?;
    Ok(eri)
}
