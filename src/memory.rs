//! Projected memory footprint of the spin-orbital stage.
//!
//! The spin-orbital ERI tensor has `(2 nmo)^4` double-precision elements, and
//! the tiling/masking/antisymmetrization sequence keeps a few such tensors alive
//! at once. The projected peak is checked against the caller's budget before
//! any spin-orbital allocation happens.

use crate::prelude::*;

const BYTES_PER_GB: f64 = 1.0e9;

/// Size in GB of one spin-orbital ERI tensor for `nmo` spatial orbitals.
pub fn spin_eri_size_gb(nmo: usize) -> f64 {
    let nso = 2.0 * nmo as f64;
    nso.powi(4) * std::mem::size_of::<f64>() as f64 / BYTES_PER_GB
}

/// Projected peak memory in GB of the spin-orbital stage.
pub fn projected_footprint_gb(nmo: usize, config: &MP3Config) -> f64 {
    spin_eri_size_gb(nmo) * config.footprint_factor
}

/// Fail fast if the spin-orbital stage for `nmo` orbitals would exceed the budget.
pub fn check_memory_budget(nmo: usize, config: &MP3Config, stage: &'static str) -> Result<(), MP3Error> {
    let size_gb = spin_eri_size_gb(nmo);
    let required_gb = projected_footprint_gb(nmo, config);
    log::info!("Size of the SO ERI tensor will be {size_gb:4.2} GB.");
    if required_gb > config.max_memory_gb {
        return Err(MP3Error::MemoryBudget { stage, required_gb, budget_gb: config.max_memory_gb });
    }
    Ok(())
}
