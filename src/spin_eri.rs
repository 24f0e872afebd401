//! Spin-orbital expansion and antisymmetrization of spatial MO integrals.
//!
//! Spin-orbital `p` carries spatial orbital `p / 2` and spin `p % 2` (even is
//! alpha, odd is beta). Starting from chemist-notation spatial integrals
//! `(PQ|RS)`:
//!
//! 1. every axis is tiled into adjacent alpha/beta pairs;
//! 2. elements with `spin(p) != spin(q)` or `spin(r) != spin(s)` are masked to zero;
//! 3. the exchange term is subtracted in chemist order, `(pq|rs) - (ps|rq)`, and the
//!    axes are reordered to physicist notation, giving `<pq||rs> = <pq|rs> - <pq|sr>`.

use crate::prelude::*;

/// Duplicate every spatial index into two adjacent spin-orbital indices.
///
/// `[nmo; 4]` -> `[2 nmo; 4]`; no spin selection is applied here.
pub fn tile_spin(eri_spatial: &Tsr) -> Tsr {
    let nmo = eri_spatial.shape()[0];
    let nso = 2 * nmo;
    let device = eri_spatial.device().clone();

    let eri_tiled: Tsr = rt::zeros(([nso, nso, nso, nso], &device));
    let spin_blocks = iproduct!(0..2_usize, 0..2_usize, 0..2_usize, 0..2_usize).collect_vec();
    spin_blocks.into_par_iter().for_each(|(sp, sq, sr, ss)| {
        let mut eri_tiled = unsafe { eri_tiled.force_mut() };
        let sl_p = slice!(sp, nso, 2);
        let sl_q = slice!(sq, nso, 2);
        let sl_r = slice!(sr, nso, 2);
        let sl_s = slice!(ss, nso, 2);
        eri_tiled.i_mut((sl_p, sl_q, sl_r, sl_s)).assign(eri_spatial);
    });
    eri_tiled
}

/// Spin-compatibility mask for chemist-order integrals `(pq|rs)`.
///
/// The element is 1 when `spin(p) == spin(q)` and `spin(r) == spin(s)`, else 0.
pub fn spin_mask(nso: usize, device: &DeviceTsr) -> Tsr {
    let mut mask: Tsr = rt::zeros(([nso, nso, nso, nso], device));
    for (s1, s2) in iproduct!(0..2_usize, 0..2_usize) {
        let sl_1 = slice!(s1, nso, 2);
        let sl_2 = slice!(s2, nso, 2);
        mask.i_mut((sl_1, sl_1, sl_2, sl_2)).fill(1.0);
    }
    mask
}

/// Chemist-order antisymmetrization `A[p,q,r,s] = M[p,q,r,s] - M[p,s,r,q]`.
pub fn antisymmetrize_chemist(eri_masked: &Tsr) -> Tsr {
    eri_masked - eri_masked.swapaxes(1, 3)
}

/// Reorder chemist-order axes to physicist notation: `MO[p,q,r,s] = A[p,r,q,s]`.
///
/// The input buffer is reused; only the strides change.
pub fn chemist_to_physicist(eri_chemist: Tsr) -> Tsr {
    eri_chemist.into_swapaxes(1, 2).into_owned()
}

/// Build antisymmetrized spin-orbital integrals `<pq||rs>` from spatial `(PQ|RS)`.
///
/// The memory budget is checked before any spin-orbital tensor is allocated.
pub fn get_spin_orbital_eri(eri_spatial: &Tsr, config: &MP3Config) -> Result<Tsr, MP3Error> {
    if eri_spatial.ndim() != 4 {
        return Err(MP3Error::ShapeMismatch(format!(
            "spatial ERI must have 4 axes, got shape {:?}",
            eri_spatial.shape()
        )));
    }
    let nmo = eri_spatial.shape()[0];
    check_shape("eri_spatial", eri_spatial.shape(), &[nmo, nmo, nmo, nmo])?;
    memory::check_memory_budget(nmo, config, "spin-orbital expansion")?;

    let nso = 2 * nmo;
    let timer = std::time::Instant::now();
    log::info!("Starting spin-orbital MO transformation ({nso} spin-orbitals)...");

    let eri_tiled = tile_spin(eri_spatial);
    let mask = spin_mask(nso, eri_tiled.device());
    let eri_masked = eri_tiled * &mask;
    drop(mask);
    let eri_anti = antisymmetrize_chemist(&eri_masked);
    drop(eri_masked);
    let eri_so = chemist_to_physicist(eri_anti);

    log::info!("Time elapsed (spin-orbital transformation): {:?}", timer.elapsed());
    check_shape("eri_so", eri_so.shape(), &[nso, nso, nso, nso])?;
    Ok(eri_so)
}

/// Interleave spatial orbital energies into spin-orbital energies `[e0, e0, e1, e1, ...]`.
pub fn interleave_spin_energy(mo_energy: &Tsr) -> Tsr {
    let nso = 2 * mo_energy.shape()[0];
    let mut mo_energy_so: Tsr = rt::zeros(([nso], mo_energy.device()));
    mo_energy_so.i_mut(slice!(0, nso, 2)).assign(mo_energy);
    mo_energy_so.i_mut(slice!(1, nso, 2)).assign(mo_energy);
    mo_energy_so
}
