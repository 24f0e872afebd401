//! MP2 and MP3 correlation energies from antisymmetrized spin-orbital integrals.
//!
//! With `o = [0, nocc)`, `v = [nocc, nso)` and `D = 1 / (e_i + e_j - e_a - e_b)`:
//!
//! ```text
//! E(2)   = 1/4 Σ <ij||ab> <ab||ij> D_ijab
//! E(3)_1 = 1/8 Σ <ab||rs> <cd||ab> <rs||cd> D_abrs D_cdrs     (hole-hole ladder)
//! E(3)_2 = 1/8 Σ <ab||rs> <rs||tu> <tu||ab> D_abrs D_abtu     (particle-particle ladder)
//! E(3)_3 =     Σ <ab||rs> <cs||tb> <rt||ac> D_absr D_acrt     (ring)
//! ```
//!
//! (`a, b, c, d` occupied; `r, s, t, u` virtual in the MP3 terms.)
//! The MP2 energy and all three MP3 terms share the first-order amplitudes `t = <oo||vv> D` and
//! `u = <vv||oo>ᵀ D`, and each diagram is reduced to one matrix multiplication.

use crate::denom::Denominator;
use crate::prelude::*;

/// Occupied/virtual blocks of the spin-orbital ERI needed by MP2/MP3.
pub struct MP3Blocks<'a> {
    pub oovv: TsrView<'a>,
    pub vvoo: TsrView<'a>,
    pub oooo: TsrView<'a>,
    pub vvvv: TsrView<'a>,
    pub ovvo: TsrView<'a>,
}

impl<'a> MP3Blocks<'a> {
    pub fn new(eri_so: &'a Tsr, nocc: usize) -> Self {
        let nso = eri_so.shape()[0];
        let (so, sv) = (slice!(0, nocc), slice!(nocc, nso));
        Self {
            oovv: eri_so.i((so, so, sv, sv)),
            vvoo: eri_so.i((sv, sv, so, so)),
            oooo: eri_so.i((so, so, so, so)),
            vvvv: eri_so.i((sv, sv, sv, sv)),
            ovvo: eri_so.i((so, sv, sv, so)),
        }
    }
}

/// First-order amplitudes shared by the MP2 energy and every MP3 diagram.
pub struct MP3Amplitudes {
    /// `t[i,j,a,b] = <ij||ab> D_ijab`
    pub t_oovv: Tsr,
    /// `u[i,j,a,b] = <ab||ij> D_ijab`
    pub u_oovv: Tsr,
}

pub fn get_amplitudes(blocks: &MP3Blocks, epsilon: &Tsr) -> MP3Amplitudes {
    let t_oovv = blocks.oovv.view() * epsilon;
    let u_oovv = blocks.vvoo.transpose([2, 3, 0, 1]) * epsilon;
    MP3Amplitudes { t_oovv, u_oovv }
}

/// `1/4 Σ <ij||ab> u[i,j,a,b]`
pub fn get_mp2_energy(blocks: &MP3Blocks, amplitudes: &MP3Amplitudes) -> f64 {
    0.25 * (blocks.oovv.view() * &amplitudes.u_oovv).sum()
}

/// Hole-hole ladder: `1/8 Σ t[ab,rs] <cd||ab> u[cd,rs]`.
fn get_mp3_hh_ladder(blocks: &MP3Blocks, t_oovv: &Tsr, u_oovv: &Tsr) -> f64 {
    let [nocc, _, nvir, _] = dims4(t_oovv);
    let w_oovv = blocks.oooo.reshape((nocc * nocc, nocc * nocc)) % t_oovv.reshape((nocc * nocc, nvir * nvir));
    let w_oovv = w_oovv.into_shape((nocc, nocc, nvir, nvir));
    0.125 * (w_oovv * u_oovv).sum()
}

/// Particle-particle ladder: `1/8 Σ t[ab,rs] <rs||tu> u[ab,tu]`.
fn get_mp3_pp_ladder(blocks: &MP3Blocks, t_oovv: &Tsr, u_oovv: &Tsr) -> f64 {
    let [nocc, _, nvir, _] = dims4(t_oovv);
    let w_oovv = t_oovv.reshape((nocc * nocc, nvir * nvir)) % blocks.vvvv.reshape((nvir * nvir, nvir * nvir));
    let w_oovv = w_oovv.into_shape((nocc, nocc, nvir, nvir));
    0.125 * (w_oovv * u_oovv).sum()
}

/// Ring: `Σ t[a,b,r,s] <cs||tb> u[a,c,r,t]`, contracted over the `(b,s)` pair.
fn get_mp3_ring(blocks: &MP3Blocks, t_oovv: &Tsr, u_oovv: &Tsr) -> f64 {
    let [nocc, _, nvir, _] = dims4(t_oovv);
    let nov = nocc * nvir;
    // t[a,b,r,s] -> [(a,r), (b,s)]
    let t_ovov = t_oovv.transpose([0, 2, 1, 3]);
    // <cs||tb> -> [(b,s), (c,t)]
    let g_ovov = blocks.ovvo.transpose([3, 1, 0, 2]);
    let w_ovov = t_ovov.reshape((nov, nov)) % g_ovov.reshape((nov, nov));
    let w_ovov = w_ovov.into_shape((nocc, nvir, nocc, nvir));
    // u[a,c,r,t] -> [a, r, c, t]
    (w_ovov * u_oovv.transpose([0, 2, 1, 3])).sum()
}

/// The three MP3 diagrams: hole-hole ladder, particle-particle ladder and ring.
pub fn get_mp3_energy_terms(blocks: &MP3Blocks, amplitudes: &MP3Amplitudes) -> [f64; 3] {
    let MP3Amplitudes { t_oovv, u_oovv } = amplitudes;

    let timer = std::time::Instant::now();
    let e_hh = get_mp3_hh_ladder(blocks, t_oovv, u_oovv);
    log::info!("Time elapsed (MP3 hole-hole ladder): {:?}", timer.elapsed());

    let timer = std::time::Instant::now();
    let e_pp = get_mp3_pp_ladder(blocks, t_oovv, u_oovv);
    log::info!("Time elapsed (MP3 particle-particle ladder): {:?}", timer.elapsed());

    let timer = std::time::Instant::now();
    let e_ring = get_mp3_ring(blocks, t_oovv, u_oovv);
    log::info!("Time elapsed (MP3 ring): {:?}", timer.elapsed());

    [e_hh, e_pp, e_ring]
}

fn dims4(tsr: &Tsr) -> [usize; 4] {
    let shape = tsr.shape();
    [shape[0], shape[1], shape[2], shape[3]]
}

/// Evaluate MP2/MP3 energies from a prepared spin-orbital ERI and resolvent.
///
/// `eri_so` is `[nso; 4]` physicist antisymmetrized, `epsilon` is `[nocc, nocc, nvir, nvir]`.
pub fn get_mp3_results(eri_so: &Tsr, denom: &Denominator, nocc: usize, e_scf: f64) -> Result<MP3Results, MP3Error> {
    let nso = eri_so.shape()[0];
    check_shape("eri_so", eri_so.shape(), &[nso, nso, nso, nso])?;
    if nocc > nso {
        return Err(MP3Error::ShapeMismatch(format!("{nocc} occupied spin-orbitals exceed {nso} spin-orbitals")));
    }
    let nvir = nso - nocc;
    check_shape("epsilon", denom.epsilon.shape(), &[nocc, nocc, nvir, nvir])?;

    let (e_corr_mp2, e_mp3_terms) = if nocc == 0 || nvir == 0 {
        log::info!("No occupied or virtual spin-orbitals - correlation energy is zero.");
        (0.0, [0.0; 3])
    } else {
        let blocks = MP3Blocks::new(eri_so, nocc);
        let timer = std::time::Instant::now();
        let amplitudes = get_amplitudes(&blocks, &denom.epsilon);
        let e_corr_mp2 = get_mp2_energy(&blocks, &amplitudes);
        log::info!("Time elapsed (MP2 energy): {:?}", timer.elapsed());
        (e_corr_mp2, get_mp3_energy_terms(&blocks, &amplitudes))
    };

    let e_tot_mp2 = e_scf + e_corr_mp2;
    let e_corr_mp3 = e_mp3_terms.iter().sum::<f64>();
    let e_tot_mp3 = e_tot_mp2 + e_corr_mp3;

    Ok(MP3Results {
        e_scf,
        e_corr_mp2,
        e_tot_mp2,
        e_mp3_terms,
        e_corr_mp3,
        e_tot_mp3,
        min_abs_denom: denom.min_abs_denom,
    })
}

/// Full pipeline: AO→MO transform, spin-orbital expansion, denominators, MP2/MP3.
///
/// The AO integral tensor is consumed. All shape and memory checks happen before
/// the first contraction, so a failure never leaves partial results behind.
pub fn kernel_mp3(mol_info: &MP3Info, eri_ao: Tsr, config: &MP3Config) -> Result<MP3Results, MP3Error> {
    let time_outer = std::time::Instant::now();

    mol_info.check()?;
    ao2mo::check_ao2mo_shapes(&eri_ao, &mol_info.mo_coeff)?;
    memory::check_memory_budget(mol_info.nmo(), config, "AO->MO transformation")?;

    let nocc = mol_info.nocc();
    log::info!(
        "MP3: nao = {}, nmo = {}, nocc (spin) = {}, nvir (spin) = {}",
        mol_info.nao(),
        mol_info.nmo(),
        nocc,
        mol_info.nvir()
    );

    let eri_spatial = ao2mo::get_mo_eri_spatial(eri_ao, &mol_info.mo_coeff)?;
    let eri_so = spin_eri::get_spin_orbital_eri(&eri_spatial, config)?;
    drop(eri_spatial);

    let timer = std::time::Instant::now();
    let mo_energy_so = spin_eri::interleave_spin_energy(&mol_info.mo_energy);
    let denom = denom::get_denominator(&mo_energy_so, nocc, config)?;
    log::info!("Time elapsed (denominators): {:?}", timer.elapsed());

    let results = get_mp3_results(&eri_so, &denom, nocc, mol_info.e_scf)?;
    log::info!("Total time elapsed (MP3): {:?}", time_outer.elapsed());
    Ok(results)
}

/// Log the energies in the usual report layout.
pub fn report_mp3_results(results: &MP3Results) {
    log::info!("MP2 correlation energy:      {:16.10}", results.e_corr_mp2);
    log::info!("MP2 total energy:            {:16.10}", results.e_tot_mp2);
    log::info!("MP3 hole-hole ladder:        {:16.10}", results.e_mp3_terms[0]);
    log::info!("MP3 particle-particle ladder:{:16.10}", results.e_mp3_terms[1]);
    log::info!("MP3 ring:                    {:16.10}", results.e_mp3_terms[2]);
    log::info!("MP3 correlation energy:      {:16.10}", results.e_corr_mp3);
    log::info!("MP3 total energy:            {:16.10}", results.e_tot_mp3);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn identity(n: usize) -> Tsr {
        let device = DeviceTsr::default();
        let mut eye: Tsr = rt::zeros(([n, n], &device));
        eye.diagonal_mut(None).fill(1.0);
        eye
    }

    fn prepare(eri_spatial: &Tsr, mo_energy: &Tsr, ndocc: usize) -> (Tsr, Denominator) {
        let config = MP3Config::default();
        let eri_so = spin_eri::get_spin_orbital_eri(eri_spatial, &config).unwrap();
        let mo_energy_so = spin_eri::interleave_spin_energy(mo_energy);
        let denom = denom::get_denominator(&mo_energy_so, 2 * ndocc, &config).unwrap();
        (eri_so, denom)
    }

    #[test]
    fn test_two_by_two_hand_computed_mp2() {
        // one doubly occupied orbital (2 occupied spin-orbitals), one virtual
        // (2 virtual spin-orbitals): only <i↑i↓||a↑a↓> = (ia|ia) = 0.2 survives,
        // E(2) = (ia|ia)^2 / (2 e_i - 2 e_a) = 0.04 / (-2.0) = -0.02
        let device = DeviceTsr::default();
        let mo_energy: Tsr = rt::asarray((vec![-0.5, 0.5], &device));
        let (eri_so, denom) = prepare(&two_orbital_eri(), &mo_energy, 1);
        let results = get_mp3_results(&eri_so, &denom, 2, -1.0).unwrap();
        assert_abs_diff_eq!(results.e_corr_mp2, -0.02, epsilon = 1e-10);
        assert_abs_diff_eq!(results.e_tot_mp2, -1.02, epsilon = 1e-10);
    }

    #[test]
    fn test_two_by_two_hand_built_spin_orbital_tensor() {
        // the same model written directly in spin-orbital form,
        // indices [i↑, i↓, a↑, a↓]
        let k = 0.2;
        let eri_so = tensor4_from_fn([4, 4, 4, 4], |p, q, r, s| {
            let occ_pair = p / 2 == 0 && q / 2 == 0 && p != q;
            let vir_pair = r / 2 == 1 && s / 2 == 1 && r != s;
            let sign = |x: usize, y: usize| if x % 2 == 0 && y % 2 == 1 { 1.0 } else { -1.0 };
            if occ_pair && vir_pair {
                k * sign(p, q) * sign(r, s)
            } else if p / 2 == 1 && q / 2 == 1 && p != q && r / 2 == 0 && s / 2 == 0 && r != s {
                k * sign(p, q) * sign(r, s)
            } else {
                0.0
            }
        });
        let device = DeviceTsr::default();
        let mo_energy_so: Tsr = rt::asarray((vec![-0.5, -0.5, 0.5, 0.5], &device));
        let denom = denom::get_denominator(&mo_energy_so, 2, &MP3Config::default()).unwrap();
        let blocks = MP3Blocks::new(&eri_so, 2);
        let amplitudes = get_amplitudes(&blocks, &denom.epsilon);
        assert_abs_diff_eq!(get_mp2_energy(&blocks, &amplitudes), -0.02, epsilon = 1e-10);
    }

    #[test]
    fn test_spin_orbital_mp2_matches_closed_shell_formula() {
        let (nmo, ndocc) = (6, 2);
        let eri = random_eri_spatial(nmo, 4, 101);
        let mo_energy = random_mo_energy(ndocc, nmo - ndocc, 102);
        let (eri_so, denom) = prepare(&eri, &mo_energy, ndocc);
        let results = get_mp3_results(&eri_so, &denom, 2 * ndocc, 0.0).unwrap();
        let e_rmp2 = mp3_naive::rmp2_energy_spatial(&eri, &mo_energy, ndocc);
        assert_abs_diff_eq!(results.e_corr_mp2, e_rmp2, epsilon = 1e-10);
    }

    #[test]
    fn test_mp3_terms_match_explicit_loops() {
        let (nmo, ndocc) = (5, 2);
        let eri = random_eri_spatial(nmo, 4, 7);
        let mo_energy = random_mo_energy(ndocc, nmo - ndocc, 8);
        let (eri_so, denom) = prepare(&eri, &mo_energy, ndocc);
        let nocc = 2 * ndocc;

        let blocks = MP3Blocks::new(&eri_so, nocc);
        let amplitudes = get_amplitudes(&blocks, &denom.epsilon);
        let e_mp2 = get_mp2_energy(&blocks, &amplitudes);
        let terms = get_mp3_energy_terms(&blocks, &amplitudes);

        let e_mp2_naive = mp3_naive::mp2_energy_naive(&eri_so, &denom.epsilon, nocc);
        let terms_naive = mp3_naive::mp3_energy_terms_naive(&eri_so, &denom.epsilon, nocc);
        assert_abs_diff_eq!(e_mp2, e_mp2_naive, epsilon = 1e-12);
        for (term, term_naive) in terms.iter().zip(terms_naive.iter()) {
            assert_abs_diff_eq!(term, term_naive, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mp2_from_either_amplitude() {
        // 1/4 Σ <ij||ab> u = 1/4 Σ t <ab||ij>
        let (nmo, ndocc) = (5, 2);
        let eri = random_eri_spatial(nmo, 3, 41);
        let mo_energy = random_mo_energy(ndocc, nmo - ndocc, 42);
        let (eri_so, denom) = prepare(&eri, &mo_energy, ndocc);
        let blocks = MP3Blocks::new(&eri_so, 2 * ndocc);
        let amplitudes = get_amplitudes(&blocks, &denom.epsilon);

        let e_from_t = 0.25 * (amplitudes.t_oovv.view() * blocks.vvoo.transpose([2, 3, 0, 1])).sum();
        assert_abs_diff_eq!(get_mp2_energy(&blocks, &amplitudes), e_from_t, epsilon = 1e-12);
        assert_eq!(amplitudes.t_oovv.shape(), &vec![4, 4, 6, 6]);
        assert_eq!(amplitudes.u_oovv.shape(), &vec![4, 4, 6, 6]);
    }

    #[test]
    fn test_kernel_mp3_pipeline() {
        let (nao, ndocc) = (4, 1);
        let eri_ao = random_eri_spatial(nao, 3, 55);
        let mo_info = MP3Info {
            mo_coeff: identity(nao),
            mo_energy: random_mo_energy(ndocc, nao - ndocc, 56),
            ndocc,
            e_scf: -10.0,
        };
        let eri_spatial = eri_ao.clone();
        let results = kernel_mp3(&mo_info, eri_ao, &MP3Config::default()).unwrap();

        let (eri_so, denom) = prepare(&eri_spatial, &mo_info.mo_energy, ndocc);
        let terms_naive = mp3_naive::mp3_energy_terms_naive(&eri_so, &denom.epsilon, 2 * ndocc);
        assert_abs_diff_eq!(results.e_scf, -10.0);
        assert_abs_diff_eq!(results.e_tot_mp2, -10.0 + results.e_corr_mp2, epsilon = 1e-12);
        assert_abs_diff_eq!(results.e_corr_mp3, terms_naive.iter().sum::<f64>(), epsilon = 1e-12);
        assert_abs_diff_eq!(results.e_tot_mp3, results.e_tot_mp2 + results.e_corr_mp3, epsilon = 1e-12);
        assert!(results.min_abs_denom > 0.0);
    }

    #[test]
    fn test_kernel_rejects_mismatched_coefficients() {
        let mo_info = MP3Info {
            mo_coeff: random_matrix(3, 3, 1),
            mo_energy: random_mo_energy(1, 2, 2),
            ndocc: 1,
            e_scf: 0.0,
        };
        let err = kernel_mp3(&mo_info, random_eri_spatial(4, 2, 3), &MP3Config::default()).unwrap_err();
        assert!(matches!(err, MP3Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_kernel_memory_guard_fails_fast() {
        let nao = 4;
        let mo_info = MP3Info {
            mo_coeff: identity(nao),
            mo_energy: random_mo_energy(1, 3, 4),
            ndocc: 1,
            e_scf: 0.0,
        };
        let config = MP3Config { max_memory_gb: 1.0e-7, ..Default::default() };
        let err = kernel_mp3(&mo_info, random_eri_spatial(nao, 2, 5), &config).unwrap_err();
        assert!(matches!(err, MP3Error::MemoryBudget { stage: "AO->MO transformation", .. }));
    }

    #[test]
    fn test_empty_occupied_space() {
        let (nao, ndocc) = (3, 0);
        let mo_info = MP3Info {
            mo_coeff: identity(nao),
            mo_energy: random_mo_energy(0, nao, 9),
            ndocc,
            e_scf: -1.5,
        };
        let results = kernel_mp3(&mo_info, random_eri_spatial(nao, 2, 10), &MP3Config::default()).unwrap();
        assert_eq!(results.e_corr_mp2, 0.0);
        assert_eq!(results.e_corr_mp3, 0.0);
        assert_eq!(results.e_tot_mp3, -1.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_mp2_is_negative(nmo in 2_usize..5, ndocc_frac in 0.0_f64..1.0, seed in any::<u64>()) {
            let ndocc = 1 + ((nmo - 1) as f64 * ndocc_frac) as usize;
            let ndocc = ndocc.min(nmo - 1);
            let eri = random_eri_spatial(nmo, 3, seed);
            let mo_energy = random_mo_energy(ndocc, nmo - ndocc, seed.wrapping_add(1));
            let (eri_so, denom) = prepare(&eri, &mo_energy, ndocc);
            let results = get_mp3_results(&eri_so, &denom, 2 * ndocc, 0.0).unwrap();
            prop_assert!(results.e_corr_mp2 < 0.0);
        }
    }
}
