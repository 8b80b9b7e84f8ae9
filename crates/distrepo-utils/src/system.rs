/// Retrieves the architecture name of the running host, spelled the way
/// distributions name their repository architectures.
///
/// Rust reports 64-bit little-endian PowerPC as `powerpc64`; distributions call it
/// `ppc64le`. All other supported targets already match.
pub fn host_arch() -> &'static str {
    arch_name(std::env::consts::ARCH)
}

fn arch_name(rust_arch: &'static str) -> &'static str {
    match rust_arch {
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        other => other,
    }
}
