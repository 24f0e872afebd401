use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use libcint::prelude::*;
use showcase_rstsr_somp3::prelude::*;
use showcase_rstsr_somp3::*;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct CliParser {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CliArgsCommon {
    #[clap(long = "max_memory", default_value_t = 2.0, help = "Memory budget (GB) for the spin-orbital ERI")]
    max_memory_gb: f64,

    #[clap(long = "reference", help = "Reference MP3 total energy to compare against")]
    reference: Option<f64>,

    #[clap(long = "decimals", default_value_t = 6, help = "Decimal places required to match the reference")]
    decimals: i32,
}

#[derive(Args, Debug)]
struct CliArgsStandalone {
    #[clap(short, long = "mol", help = "Path to the json file containing molecular data")]
    mol_file: String,

    #[clap(long = "mo_coeff", help = "Path to the npy file of MO coefficients [nao, nmo]")]
    mo_coeff_file: String,

    #[clap(long = "mo_energy", help = "Path to the npy file of MO energies [nmo]")]
    mo_energy_file: String,

    #[clap(long = "e_scf", help = "Converged SCF total energy", allow_hyphen_values = true)]
    e_scf: f64,

    #[clap(flatten)]
    common: CliArgsCommon,
}

#[derive(Args, Debug)]
struct CliArgsNpy {
    #[clap(long = "eri", help = "Path to the npy file of AO integrals (chemist notation) [nao; 4]")]
    eri_file: String,

    #[clap(long = "mo_coeff", help = "Path to the npy file of MO coefficients [nao, nmo]")]
    mo_coeff_file: String,

    #[clap(long = "mo_energy", help = "Path to the npy file of MO energies [nmo]")]
    mo_energy_file: String,

    #[clap(long = "ndocc", help = "Number of doubly occupied orbitals")]
    ndocc: usize,

    #[clap(long = "e_scf", help = "Converged SCF total energy", allow_hyphen_values = true)]
    e_scf: f64,

    #[clap(flatten)]
    common: CliArgsCommon,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(name = "rhf-mp3", about = "Run a minimal RHF followed by spin-orbital MP2/MP3")]
    RhfMp3 {
        #[clap(short, long = "mol", help = "Path to the json file containing molecular data")]
        mol_file: String,

        #[clap(flatten)]
        common: CliArgsCommon,
    },

    #[clap(name = "mp3-standalone", about = "Run spin-orbital MP2/MP3 with SCF data provided by user")]
    Mp3Standalone(CliArgsStandalone),

    #[clap(name = "mp3-npy", about = "Run spin-orbital MP2/MP3 with AO integrals and SCF data from npy files")]
    Mp3Npy(CliArgsNpy),
}

fn run_mp3(mp3_info: &MP3Info, eri_file: Option<&str>, cint_data: Option<&CInt>, common: &CliArgsCommon) -> anyhow::Result<()> {
    let config = MP3Config { max_memory_gb: common.max_memory_gb, ..Default::default() };

    let eri_ao = match (eri_file, cint_data) {
        (Some(eri_file), _) => util::tensor_from_npy(eri_file).with_context(|| format!("reading AO integrals from {eri_file}"))?,
        (None, Some(cint_data)) => {
            // fail before generating integrals if the spin-orbital stage cannot fit
            memory::check_memory_budget(mp3_info.nmo(), &config, "AO->MO transformation")?;
            let timer = std::time::Instant::now();
            let eri_ao = util::intor_row_major(cint_data, "int2e");
            log::info!("Time elapsed (AO integrals): {:?}", timer.elapsed());
            eri_ao
        },
        (None, None) => bail!("no source of AO integrals given"),
    };

    let mp3_results = mp3::kernel_mp3(mp3_info, eri_ao, &config)?;
    mp3::report_mp3_results(&mp3_results);
    println!("MP3 total energy: {:16.10}", mp3_results.e_tot_mp3);

    if let Some(reference) = common.reference {
        if !util::compare_values(reference, mp3_results.e_tot_mp3, common.decimals, "MP3 Energy") {
            bail!("MP3 total energy {:.10} does not match reference {:.10}", mp3_results.e_tot_mp3, reference);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliParser::parse();

    match args.command {
        Command::RhfMp3 { mol_file, common } => {
            let cint_data = CInt::from_json(&mol_file);
            let rhf_results = rhf::minimal_rhf(&cint_data, &SCFConfig::default())?;
            let mp3_info = MP3Info::from_rhf(&rhf_results);
            run_mp3(&mp3_info, None, Some(&cint_data), &common)?;
        },
        Command::Mp3Standalone(cli_args) => {
            let cint_data = CInt::from_json(&cli_args.mol_file);
            let mp3_info = MP3Info {
                mo_coeff: util::tensor_from_npy(&cli_args.mo_coeff_file)?,
                mo_energy: util::tensor_from_npy(&cli_args.mo_energy_file)?,
                ndocc: rhf::get_ndocc(&cint_data)?,
                e_scf: cli_args.e_scf,
            };
            mp3_info.check()?;
            run_mp3(&mp3_info, None, Some(&cint_data), &cli_args.common)?;
        },
        Command::Mp3Npy(cli_args) => {
            let mp3_info = MP3Info {
                mo_coeff: util::tensor_from_npy(&cli_args.mo_coeff_file)?,
                mo_energy: util::tensor_from_npy(&cli_args.mo_energy_file)?,
                ndocc: cli_args.ndocc,
                e_scf: cli_args.e_scf,
            };
            run_mp3(&mp3_info, Some(&cli_args.eri_file), None, &cli_args.common)?;
        },
    }
    Ok(())
}
