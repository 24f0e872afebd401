use crate::prelude::*;

/// Energy denominators over occupied-occupied-virtual-virtual spin-orbitals.
#[derive(Debug)]
pub struct Denominator {
    /// `1 / (e_i + e_j - e_a - e_b)`, shape `[nocc, nocc, nvir, nvir]`.
    pub epsilon: Tsr,
    /// Smallest `|e_i + e_j - e_a - e_b|` over all entries; infinity when empty.
    pub min_abs_denom: f64,
}

/// Build the resolvent tensor from per-spin-orbital energies.
///
/// Near-zero denominators are not guarded; they only show up in
/// `min_abs_denom` (and in a warning when below `denom_warn_tol`).
pub fn get_denominator(mo_energy_so: &Tsr, nocc: usize, config: &MP3Config) -> Result<Denominator, MP3Error> {
    if mo_energy_so.ndim() != 1 || nocc > mo_energy_so.shape()[0] {
        return Err(MP3Error::ShapeMismatch(format!(
            "{nocc} occupied spin-orbitals do not fit spin-orbital energies of shape {:?}",
            mo_energy_so.shape()
        )));
    }
    let nso = mo_energy_so.shape()[0];
    let nvir = nso - nocc;
    let (so, sv) = (slice!(0, nocc), slice!(nocc, nso));

    let eo = mo_energy_so.i(so);
    let ev = mo_energy_so.i(sv);
    let d_oovv: Tsr = eo.i((.., None, None, None)) + eo.i((None, .., None, None))
        - ev.i((None, None, .., None))
        - ev.i((None, None, None, ..));

    let min_abs_denom = d_oovv.raw().iter().fold(f64::INFINITY, |acc, d| acc.min(d.abs()));
    if min_abs_denom < config.denom_warn_tol {
        log::warn!("Near-degenerate energy denominator: min |e_i + e_j - e_a - e_b| = {min_abs_denom:.3e}");
    } else {
        log::debug!("Minimum |energy denominator|: {min_abs_denom:.6}");
    }

    let epsilon = 1.0_f64 / d_oovv;
    check_shape("epsilon", epsilon.shape(), &[nocc, nocc, nvir, nvir])?;
    Ok(Denominator { epsilon, min_abs_denom })
}
