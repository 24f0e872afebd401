use crate::prelude::*;

pub fn get_energy_nuc(cint_data: &CInt) -> f64 {
    let device = DeviceTsr::default();

    let atom_coords = {
        let coords = cint_data.atom_coords();
        let coords = coords.into_iter().flatten().collect::<Vec<f64>>();
        rt::asarray((coords, &device)).into_shape((-1, 3))
    };
    let atom_charges = rt::asarray((cint_data.atom_charges(), &device));
    let mut dist = rt::sci::cdist((atom_coords.view(), atom_coords.view()));
    dist.diagonal_mut(None).fill(f64::INFINITY);
    0.5 * (&atom_charges * atom_charges.i((.., None)) / dist).sum()
}

/// Number of doubly occupied orbitals of a neutral closed-shell molecule.
pub fn get_ndocc(cint_data: &CInt) -> Result<usize, MP3Error> {
    let nelec = cint_data.atom_charges().into_iter().sum::<f64>().round() as usize;
    if nelec % 2 != 0 {
        return Err(MP3Error::InvalidInput(format!("closed-shell reference needs an even electron count, got {nelec}")));
    }
    Ok(nelec / 2)
}

/// Conventional closed-shell SCF with full four-index integrals.
///
/// Iterates until both the energy change and the RMS density change drop below
/// the thresholds in `config`; returns `NotConverged` after `max_cycle` cycles.
pub fn minimal_rhf(cint_data: &CInt, config: &SCFConfig) -> Result<RHFResults, MP3Error> {
    let device = DeviceTsr::default();
    let time = std::time::Instant::now();

    let nocc = get_ndocc(cint_data)?;
    let nao = cint_data.nao();

    let e_nuc = get_energy_nuc(cint_data);
    log::info!("Nuclear repulsion energy: {e_nuc:16.10}");

    let hcore = util::intor_row_major(cint_data, "int1e_kin") + util::intor_row_major(cint_data, "int1e_nuc");
    let ovlp = util::intor_row_major(cint_data, "int1e_ovlp");
    let int2e = util::intor_row_major(cint_data, "int2e");

    let get_energy = |dm: &Tsr| -> f64 {
        let eng_scratch = &hcore + ((0.5_f64 * &int2e - 0.25_f64 * int2e.swapaxes(1, 2)) * dm).sum_axes([-1, -2]);
        (dm * &eng_scratch).sum()
    };

    let mut dm = ovlp.zeros_like();
    let mut mo_coeff = rt::zeros(([nao, nao], &device));
    let mut mo_energy = rt::zeros(([nao], &device));
    let mut e_elec = 0.0;
    let mut converged = false;
    for niter in 0..config.max_cycle {
        let fock = &hcore + ((1.0_f64 * &int2e - 0.5_f64 * int2e.swapaxes(1, 2)) * &dm).sum_axes([-1, -2]);
        (mo_energy, mo_coeff) = rt::linalg::eigh((fock.view(), ovlp.view())).into();
        let dm_new = 2.0_f64 * mo_coeff.i((.., ..nocc)) % mo_coeff.i((.., ..nocc)).t();

        let e_elec_new = get_energy(&dm_new);
        let de = (e_elec_new - e_elec).abs();
        let dm_diff = &dm_new - &dm;
        let ddm = ((&dm_diff * &dm_diff).sum() / (nao * nao) as f64).sqrt();
        log::debug!("SCF iter {niter:3}: E = {:16.10}, dE = {de:10.3e}, dD = {ddm:10.3e}", e_elec_new + e_nuc);

        dm = dm_new;
        e_elec = e_elec_new;
        if de < config.conv_tol_e && ddm < config.conv_tol_d {
            log::info!("SCF converged in {} iterations", niter + 1);
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(MP3Error::NotConverged(format!("RHF did not converge in {} cycles", config.max_cycle)));
    }

    let e_tot = e_nuc + e_elec;
    log::info!("Total elec energy: {e_elec:16.10}");
    log::info!("Total RHF energy: {e_tot:16.10}");
    log::info!("Time elapsed (RHF): {:?}", time.elapsed());

    Ok(RHFResults { mo_energy, mo_coeff, dm, nocc, e_nuc, e_elec, e_tot })
}
