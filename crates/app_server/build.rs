use std::env;

// A blank MEDIMG_VERSION (common in CI templates) falls back to the crate version.
fn main() {
    println!("cargo:rerun-if-env-changed=MEDIMG_VERSION");
    let version = env::var("MEDIMG_VERSION")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| env::var("CARGO_PKG_VERSION").ok())
        .unwrap_or_else(|| "0.0.0".to_string());
    println!("cargo:rustc-env=MEDIMG_VERSION={version}");
}
