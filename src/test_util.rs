//! Synthetic inputs shared by unit tests.

use crate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a 4-index tensor (C order) from an element function.
pub fn tensor4_from_fn(shape: [usize; 4], f: impl Fn(usize, usize, usize, usize) -> f64) -> Tsr {
    let device = DeviceTsr::default();
    let [n0, n1, n2, n3] = shape;
    let data = iproduct!(0..n0, 0..n1, 0..n2, 0..n3).map(|(p, q, r, s)| f(p, q, r, s)).collect::<Vec<f64>>();
    rt::asarray((data, vec![n0, n1, n2, n3].c(), &device))
}

/// Random dense matrix with entries in `[-1, 1)`.
pub fn random_matrix(nrow: usize, ncol: usize, seed: u64) -> Tsr {
    let device = DeviceTsr::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..nrow * ncol).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>();
    rt::asarray((data, vec![nrow, ncol].c(), &device))
}

/// Random chemist-notation ERI with the full 8-fold permutational symmetry.
///
/// Built as `(pq|rs) = Σ_P B[P,pq] B[P,rs]` with `B` symmetric in `pq`, so the
/// supermatrix `(pq|rs)` is positive semidefinite like a physical ERI.
pub fn random_eri_spatial(n: usize, naux: usize, seed: u64) -> Tsr {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = vec![0.0; naux * n * n];
    for aux in 0..naux {
        for p in 0..n {
            for q in 0..=p {
                let val: f64 = rng.gen_range(-0.5..0.5);
                b[aux * n * n + p * n + q] = val;
                b[aux * n * n + q * n + p] = val;
            }
        }
    }
    tensor4_from_fn([n, n, n, n], |p, q, r, s| {
        (0..naux).map(|aux| b[aux * n * n + p * n + q] * b[aux * n * n + r * n + s]).sum()
    })
}

/// Well separated orbital energies: occupied in `[-2, -0.5)`, virtual in `[0.5, 2)`.
pub fn random_mo_energy(ndocc: usize, nvir_spatial: usize, seed: u64) -> Tsr {
    let device = DeviceTsr::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut occ = (0..ndocc).map(|_| rng.gen_range(-2.0..-0.5)).collect::<Vec<f64>>();
    let mut vir = (0..nvir_spatial).map(|_| rng.gen_range(0.5..2.0)).collect::<Vec<f64>>();
    occ.sort_by(|a, b| a.total_cmp(b));
    vir.sort_by(|a, b| a.total_cmp(b));
    rt::asarray((occ.into_iter().chain(vir).collect::<Vec<f64>>(), &device))
}

/// Spatial ERI of a two-orbital model (one occupied `i = 0`, one virtual `a = 1`).
///
/// `(ii|ii) = 0.6`, `(aa|aa) = 0.5`, `(ii|aa) = 0.45`, `(ia|ia) = 0.2`, with
/// all permutational copies filled in.
pub fn two_orbital_eri() -> Tsr {
    tensor4_from_fn([2, 2, 2, 2], |p, q, r, s| match (p == q, r == s) {
        (true, true) => match (p, r) {
            (0, 0) => 0.6,
            (1, 1) => 0.5,
            _ => 0.45,
        },
        (false, false) => 0.2,
        _ => 0.0,
    })
}
