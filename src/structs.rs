use crate::prelude::*;

/* #region RHF */

pub struct RHFResults {
    pub mo_coeff: Tsr,
    pub mo_energy: Tsr,
    pub dm: Tsr,
    pub nocc: usize,
    pub e_nuc: f64,
    pub e_elec: f64,
    pub e_tot: f64,
}

pub struct SCFConfig {
    pub max_cycle: usize,
    pub conv_tol_e: f64,
    pub conv_tol_d: f64,
}

impl Default for SCFConfig {
    fn default() -> Self {
        Self { max_cycle: 100, conv_tol_e: 1.0e-8, conv_tol_d: 1.0e-8 }
    }
}

/* #endregion */

/* #region spin-orbital MP3 */

/// Converged mean-field data consumed by the MP3 engine.
#[derive(Debug)]
pub struct MP3Info {
    /// Orbital coefficients, `[nao, nmo]`.
    pub mo_coeff: Tsr,
    /// Spatial orbital energies, `[nmo]`.
    pub mo_energy: Tsr,
    /// Number of doubly occupied spatial orbitals.
    pub ndocc: usize,
    /// Converged SCF total energy.
    pub e_scf: f64,
}

impl MP3Info {
    pub fn from_rhf(rhf_results: &RHFResults) -> Self {
        Self {
            mo_coeff: rhf_results.mo_coeff.clone(),
            mo_energy: rhf_results.mo_energy.clone(),
            ndocc: rhf_results.nocc,
            e_scf: rhf_results.e_tot,
        }
    }

    pub fn nao(&self) -> usize {
        self.mo_coeff.shape()[0]
    }

    pub fn nmo(&self) -> usize {
        self.mo_coeff.shape()[1]
    }

    /// Number of spin-orbitals.
    pub fn nso(&self) -> usize {
        2 * self.nmo()
    }

    /// Number of occupied spin-orbitals.
    pub fn nocc(&self) -> usize {
        2 * self.ndocc
    }

    /// Number of virtual spin-orbitals.
    pub fn nvir(&self) -> usize {
        self.nso() - self.nocc()
    }

    /// Validate the mutual consistency of coefficients, energies and occupation.
    pub fn check(&self) -> Result<(), MP3Error> {
        if self.mo_coeff.ndim() != 2 {
            return Err(MP3Error::ShapeMismatch(format!(
                "mo_coeff must be a matrix, got shape {:?}",
                self.mo_coeff.shape()
            )));
        }
        check_shape("mo_energy", self.mo_energy.shape(), &[self.nmo()])?;
        if self.ndocc > self.nmo() {
            return Err(MP3Error::ShapeMismatch(format!(
                "{} doubly occupied orbitals exceed {} molecular orbitals",
                self.ndocc,
                self.nmo()
            )));
        }
        Ok(())
    }
}

pub struct MP3Config {
    /// Memory budget for the spin-orbital stage in GB.
    pub max_memory_gb: f64,
    /// Projected peak footprint in units of one spin-orbital ERI tensor.
    pub footprint_factor: f64,
    /// Warn when the smallest |e_i + e_j - e_a - e_b| is below this value.
    pub denom_warn_tol: f64,
}

impl Default for MP3Config {
    fn default() -> Self {
        Self { max_memory_gb: 2.0, footprint_factor: 2.2, denom_warn_tol: 1.0e-3 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MP3Results {
    pub e_scf: f64,
    pub e_corr_mp2: f64,
    pub e_tot_mp2: f64,
    /// Hole-hole ladder, particle-particle ladder and ring diagrams.
    pub e_mp3_terms: [f64; 3],
    pub e_corr_mp3: f64,
    pub e_tot_mp3: f64,
    /// Smallest absolute energy denominator encountered.
    pub min_abs_denom: f64,
}

/* #endregion */
