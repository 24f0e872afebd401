//! Explicit-loop reference implementations.
//!
//! These are independent of the reshape/matmul formulation in `spin_eri` and
//! `mp3` and exist to cross-check it on small systems. Complexity is the naive
//! O(N^8) for the MP3 terms, so never call these on production-sized inputs.

use crate::prelude::*;

/// `<pq||rs>` built element by element from spatial chemist integrals `(PQ|RS)`.
///
/// `<pq||rs> = δ(σp,σr) δ(σq,σs) (PR|QS) - δ(σp,σs) δ(σq,σr) (PS|QR)`
pub fn spin_orbital_eri_direct(eri_spatial: &Tsr) -> Tsr {
    let device = eri_spatial.device().clone();
    let nso = 2 * eri_spatial.shape()[0];
    let data = iproduct!(0..nso, 0..nso, 0..nso, 0..nso)
        .map(|(p, q, r, s)| {
            let coulomb = if p % 2 == r % 2 && q % 2 == s % 2 { eri_spatial[[p / 2, r / 2, q / 2, s / 2]] } else { 0.0 };
            let exchange = if p % 2 == s % 2 && q % 2 == r % 2 { eri_spatial[[p / 2, s / 2, q / 2, r / 2]] } else { 0.0 };
            coulomb - exchange
        })
        .collect_vec();
    rt::asarray((data, vec![nso, nso, nso, nso].c(), &device))
}

/// `1/4 Σ_{ijab} <ij||ab> <ab||ij> D_ijab` by explicit loops.
pub fn mp2_energy_naive(eri_so: &Tsr, epsilon: &Tsr, nocc: usize) -> f64 {
    let nvir = eri_so.shape()[0] - nocc;
    (0..nocc)
        .into_par_iter()
        .map(|i| {
            let mut e = 0.0;
            for (j, a, b) in iproduct!(0..nocc, 0..nvir, 0..nvir) {
                e += eri_so[[i, j, a + nocc, b + nocc]] * eri_so[[a + nocc, b + nocc, i, j]] * epsilon[[i, j, a, b]];
            }
            e
        })
        .sum::<f64>()
        * 0.25
}

/// The three MP3 terms by explicit loops over every index.
///
/// Occupied indices `a, b, c, d`, virtual indices `r, s, t, u` (offset by `nocc`
/// inside `eri_so`).
pub fn mp3_energy_terms_naive(eri_so: &Tsr, epsilon: &Tsr, nocc: usize) -> [f64; 3] {
    let nvir = eri_so.shape()[0] - nocc;
    let v = |x: usize| x + nocc;

    let e_hh = (0..nocc)
        .into_par_iter()
        .map(|a| {
            let mut e = 0.0;
            for (b, c, d, r, s) in iproduct!(0..nocc, 0..nocc, 0..nocc, 0..nvir, 0..nvir) {
                e += eri_so[[a, b, v(r), v(s)]]
                    * eri_so[[c, d, a, b]]
                    * eri_so[[v(r), v(s), c, d]]
                    * epsilon[[a, b, r, s]]
                    * epsilon[[c, d, r, s]];
            }
            e
        })
        .sum::<f64>()
        * 0.125;

    let e_pp = (0..nocc)
        .into_par_iter()
        .map(|a| {
            let mut e = 0.0;
            for (b, r, s, t, u) in iproduct!(0..nocc, 0..nvir, 0..nvir, 0..nvir, 0..nvir) {
                e += eri_so[[a, b, v(r), v(s)]]
                    * eri_so[[v(r), v(s), v(t), v(u)]]
                    * eri_so[[v(t), v(u), a, b]]
                    * epsilon[[a, b, r, s]]
                    * epsilon[[a, b, t, u]];
            }
            e
        })
        .sum::<f64>()
        * 0.125;

    let e_ring = (0..nocc)
        .into_par_iter()
        .map(|a| {
            let mut e = 0.0;
            for (b, c, r, s, t) in iproduct!(0..nocc, 0..nocc, 0..nvir, 0..nvir, 0..nvir) {
                e += eri_so[[a, b, v(r), v(s)]]
                    * eri_so[[c, v(s), v(t), b]]
                    * eri_so[[v(r), v(t), a, c]]
                    * epsilon[[a, b, s, r]]
                    * epsilon[[a, c, r, t]];
            }
            e
        })
        .sum::<f64>();

    [e_hh, e_pp, e_ring]
}

/// Closed-shell MP2 over spatial orbitals:
/// `Σ_{ijab} (ia|jb) [2 (ia|jb) - (ib|ja)] / (e_i + e_j - e_a - e_b)`.
pub fn rmp2_energy_spatial(eri_spatial: &Tsr, mo_energy: &Tsr, ndocc: usize) -> f64 {
    let nmo = eri_spatial.shape()[0];
    (0..ndocc)
        .into_par_iter()
        .map(|i| {
            let mut e = 0.0;
            for (j, a, b) in iproduct!(0..ndocc, ndocc..nmo, ndocc..nmo) {
                let iajb = eri_spatial[[i, a, j, b]];
                let ibja = eri_spatial[[i, b, j, a]];
                let d = mo_energy[[i]] + mo_energy[[j]] - mo_energy[[a]] - mo_energy[[b]];
                e += iajb * (2.0 * iajb - ibja) / d;
            }
            e
        })
        .sum()
}
