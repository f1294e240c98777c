//! Embeds the identity of the compiling toolchain (`rustc -vV`) so the
//! runtime snapshot can report it without shelling out on the host.

use std::env;
use std::error::Error;
use std::process::Command;

fn main() -> Result<(), Box<dyn Error>> {
    let rustc = env::var_os("RUSTC").unwrap_or_else(|| "rustc".into());
    let output = Command::new(rustc).arg("-vV").output()?;
    if !output.status.success() {
        return Err(format!("rustc -vV exited with {}", output.status).into());
    }
    let raw = String::from_utf8(output.stdout)?;

    let version_full = raw.lines().next().unwrap_or("rustc unknown");
    let field = |name: &str| {
        raw.lines()
            .find_map(|line| line.strip_prefix(name).map(|rest| rest.trim().to_string()))
            .unwrap_or_else(|| "unknown".to_string())
    };

    let release = field("release:");
    let channel = if release.contains("nightly") {
        "nightly"
    } else if release.contains("beta") {
        "beta"
    } else {
        "stable"
    };

    println!("cargo:rustc-env=HOSTINFO_RUSTC_VERSION_FULL={version_full}");
    println!("cargo:rustc-env=HOSTINFO_RUSTC_RELEASE={release}");
    println!("cargo:rustc-env=HOSTINFO_RUSTC_COMMIT_HASH={}", field("commit-hash:"));
    println!("cargo:rustc-env=HOSTINFO_RUSTC_COMMIT_DATE={}", field("commit-date:"));
    println!("cargo:rustc-env=HOSTINFO_RUSTC_HOST={}", field("host:"));
    println!("cargo:rustc-env=HOSTINFO_RUSTC_CHANNEL={channel}");
    println!("cargo:rerun-if-env-changed=RUSTC");

    Ok(())
}
