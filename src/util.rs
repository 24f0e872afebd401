use crate::prelude::*;

/// Obtain integrals (in row-major, same to PySCF but reverse of libcint).
///
/// # Usage
///
/// ```norun
/// let eri_ao = intor_row_major(&cint_data, "int2e");
/// ```
pub fn intor_row_major(cint_data: &CInt, intor: &str) -> Tsr {
    // use up all rayon available threads for tensor operations
    let device = DeviceTsr::default();

    // intor, "s1", full_shls_slice
    let (out, shape) = cint_data.integrate_row_major(intor, None, None).into();

    rt::asarray((out, shape.c(), &device))
}

/// Read a tensor from a `.npy` file, keeping the logical (numpy) axis order.
///
/// Both C- and Fortran-ordered arrays are accepted.
pub fn tensor_from_npy(fname: &str) -> Result<Tsr, MP3Error> {
    let bytes = std::fs::read(fname).map_err(|err| MP3Error::Io(format!("{fname}: {err}")))?;
    tensor_from_npy_bytes(&bytes).map_err(|err| match err {
        MP3Error::Io(msg) => MP3Error::Io(format!("{fname}: {msg}")),
        err => err,
    })
}

/// Parse an in-memory `.npy` image of `f64` data.
pub fn tensor_from_npy_bytes(bytes: &[u8]) -> Result<Tsr, MP3Error> {
    let device = DeviceTsr::default();
    let npy = npyz::NpyFile::new(bytes).map_err(|err| MP3Error::Io(err.to_string()))?;
    let shape = npy.shape().iter().map(|&x| x as usize).collect::<Vec<usize>>();
    let order = npy.order();
    let data: Vec<f64> = npy.into_vec().map_err(|err| MP3Error::Io(err.to_string()))?;
    let tsr = match order {
        npyz::Order::C => rt::asarray((data, shape.c(), &device)),
        npyz::Order::Fortran => rt::asarray((data, shape.f(), &device)),
    };
    Ok(tsr)
}

/// Compare two energies to a given number of decimal places.
///
/// Mirrors the convention of psi4's `compare_values`: the values agree when
/// `|computed - expected| < 10^-decimals`.
pub fn compare_values(expected: f64, computed: f64, decimals: i32, label: &str) -> bool {
    let diff = (computed - expected).abs();
    let passed = diff < 10.0_f64.powi(-decimals);
    if passed {
        log::info!("{label}: PASSED (expected {expected:.10}, computed {computed:.10})");
    } else {
        log::warn!("{label}: FAILED (expected {expected:.10}, computed {computed:.10}, diff {diff:.3e})");
    }
    passed
}
