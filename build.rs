#![allow(unused)]

use std::path::PathBuf;

/// Directories where an OpenBLAS shared library may live.
///
/// Environment variables are searched first (`SOMP3_EXT_DIR` for a user
/// override, then the usual loader paths), followed by common system prefixes.
fn openblas_search_dirs() -> Vec<PathBuf> {
    let sep = if cfg!(windows) { ';' } else { ':' };
    let env_dirs = ["SOMP3_EXT_DIR", "LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .flat_map(|paths| paths.split(sep).map(str::to_string).collect::<Vec<_>>())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    let prefixes = ["/usr", "/usr/local", "/opt"].into_iter().map(PathBuf::from);
    let suffixes = ["", "lib", "lib64", "lib/x86_64-linux-gnu"];

    env_dirs
        .chain(prefixes)
        .flat_map(|root| suffixes.iter().map(move |s| root.join(s)))
        .filter(|dir| dir.is_dir())
        .collect()
}

fn link_openblas() {
    println!("cargo:rerun-if-env-changed=SOMP3_EXT_DIR");
    for dir in openblas_search_dirs() {
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    println!("cargo:rustc-link-lib=openblas");
    println!("cargo:rustc-link-lib=gomp");
}

fn main() {
    #[cfg(feature = "use_openblas")]
    link_openblas();
}
