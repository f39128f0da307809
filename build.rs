fn main() {
    println!("cargo:rerun-if-env-changed=BUILD_NUMBER");

    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());

    // `relkit build` exports BUILD_NUMBER; plain `cargo build` falls back to a dev banner.
    let banner = match std::env::var("BUILD_NUMBER")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
    {
        Some(n) => format!("{} (build {})", pkg_version, n),
        None => format!("{} (build dev)", pkg_version),
    };

    println!("cargo:rustc-env=RELKIT_VERSION={}", banner);
}
