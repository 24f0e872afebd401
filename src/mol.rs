//! Molecules assembled directly in libcint's `atm`/`bas`/`env` slot layout.
//!
//! Contraction coefficients are stored the way PySCF's `mol.build()` stores
//! them: every primitive carries its radial normalization, and the contracted
//! radial function is normalized as a whole.

use crate::prelude::*;
use libcint::util::gaussian_int;

/// Bohr radius in Angstrom (CODATA 2014).
pub const BOHR_ANGSTROM: f64 = 0.52917721067;

/// One segmented contraction: angular momentum, exponents, raw coefficients.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    pub l: i32,
    pub exps: &'static [f64],
    pub coeffs: &'static [f64],
}

static O_S_EXPS: [f64; 9] = [11720.0, 1759.0, 400.8, 113.7, 37.03, 13.27, 5.025, 1.013, 0.3023];
static O_P_EXPS: [f64; 4] = [17.70, 3.854, 1.046, 0.2753];
static H_S_EXPS: [f64; 4] = [13.01, 1.962, 0.4446, 0.1220];

#[rustfmt::skip]
static CC_PVDZ_O: [Shell; 6] = [
    Shell { l: 0, exps: &O_S_EXPS, coeffs: &[0.000710, 0.005470, 0.027837, 0.104800, 0.283062, 0.448719, 0.270952, 0.015458, -0.002585] },
    Shell { l: 0, exps: &O_S_EXPS, coeffs: &[-0.000160, -0.001263, -0.006267, -0.025716, -0.070924, -0.165411, -0.116955, 0.557368, 0.572759] },
    Shell { l: 0, exps: &[0.3023], coeffs: &[1.0] },
    Shell { l: 1, exps: &O_P_EXPS, coeffs: &[0.043018, 0.228913, 0.508728, 0.460531] },
    Shell { l: 1, exps: &[0.2753], coeffs: &[1.0] },
    Shell { l: 2, exps: &[1.185], coeffs: &[1.0] },
];

#[rustfmt::skip]
static CC_PVDZ_H: [Shell; 3] = [
    Shell { l: 0, exps: &H_S_EXPS, coeffs: &[0.019685, 0.137977, 0.478148, 0.501240] },
    Shell { l: 0, exps: &[0.1220], coeffs: &[1.0] },
    Shell { l: 1, exps: &[0.727], coeffs: &[1.0] },
];

/// cc-pVDZ shells for the elements used here (H and O).
pub fn cc_pvdz(charge: i32) -> Option<&'static [Shell]> {
    match charge {
        1 => Some(&CC_PVDZ_H[..]),
        8 => Some(&CC_PVDZ_O[..]),
        _ => None,
    }
}

/// Coefficients including primitive and contraction normalization.
pub fn normalize_shell(shell: &Shell) -> Vec<f64> {
    let l = shell.l as f64;
    let coeffs = shell
        .exps
        .iter()
        .zip(shell.coeffs)
        .map(|(&a, &c)| c / gaussian_int(2.0 * l + 2.0, 2.0 * a).sqrt())
        .collect_vec();
    let norm2 = iproduct!(0..coeffs.len(), 0..coeffs.len())
        .map(|(i, j)| coeffs[i] * coeffs[j] * gaussian_int(2.0 * l + 2.0, shell.exps[i] + shell.exps[j]))
        .sum::<f64>();
    coeffs.into_iter().map(|c| c / norm2.sqrt()).collect()
}

/// Build spherical-harmonic `CInt` data from point-charge atoms (coordinates in Bohr).
pub fn build_cint(
    atoms: &[(i32, [f64; 3])],
    basis: impl Fn(i32) -> Option<&'static [Shell]>,
) -> Result<CInt, MP3Error> {
    const PTR_ENV_START: usize = 20;
    const POINT_NUC: i32 = 1;

    let mut env = vec![0.0; PTR_ENV_START];
    let mut atm = vec![];
    for &(charge, coord) in atoms {
        let ptr = env.len() as i32;
        env.extend(coord);
        env.push(0.0); // zeta
        atm.push([charge, ptr, POINT_NUC, ptr + 3, 0, 0]);
    }

    let mut bas = vec![];
    for (iatm, &(charge, _)) in atoms.iter().enumerate() {
        let shells =
            basis(charge).ok_or_else(|| MP3Error::InvalidInput(format!("no basis functions for nuclear charge {charge}")))?;
        for shell in shells {
            let nprim = shell.exps.len() as i32;
            let ptr_exp = env.len() as i32;
            env.extend_from_slice(shell.exps);
            let ptr_coeff = env.len() as i32;
            env.extend(normalize_shell(shell));
            bas.push([iatm as i32, shell.l, nprim, 1, 0, ptr_exp, ptr_coeff, 0]);
        }
    }

    Ok(CInt { atm, bas, ecpbas: vec![], env, cint_type: CIntType::Spheric })
}

/// Water from the z-matrix `O; H 1 r; H 1 r 2 theta` (r in Angstrom, theta in degrees).
///
/// Returns Bohr coordinates of O, H, H.
pub fn water_coords(r_oh: f64, theta: f64) -> [[f64; 3]; 3] {
    let r = r_oh / BOHR_ANGSTROM;
    let theta = theta.to_radians();
    [[0.0, 0.0, 0.0], [0.0, 0.0, r], [r * theta.sin(), 0.0, r * theta.cos()]]
}

/// Water at O-H 1.1 Angstrom and 104 degrees in cc-pVDZ, all electrons.
pub fn init_h2o_cc_pvdz() -> Result<CInt, MP3Error> {
    let [o, h1, h2] = water_coords(1.1, 104.0);
    build_cint(&[(8, o), (1, h1), (1, h2)], cc_pvdz)
}
