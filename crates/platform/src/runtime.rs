//! Rust toolchain and process runtime introspection
//!
//! The compiler's identity is embedded at build time by `build.rs` (which
//! runs `rustc -vV`); the remaining fields are ambient process state queried
//! when the snapshot is taken.

use crate::error::PlatformError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

const RUSTC_VERSION_FULL: &str = env!("HOSTINFO_RUSTC_VERSION_FULL");
const RUSTC_RELEASE: &str = env!("HOSTINFO_RUSTC_RELEASE");
const RUSTC_COMMIT_HASH: &str = env!("HOSTINFO_RUSTC_COMMIT_HASH");
const RUSTC_COMMIT_DATE: &str = env!("HOSTINFO_RUSTC_COMMIT_DATE");
const RUSTC_HOST: &str = env!("HOSTINFO_RUSTC_HOST");
const RUSTC_CHANNEL: &str = env!("HOSTINFO_RUSTC_CHANNEL");

/// `f64` characteristics, the analog of C's `float.h` constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatInfo {
    pub radix: u32,
    pub mantissa_digits: u32,
    pub digits: u32,
    pub epsilon: f64,
    pub max: f64,
    pub min_positive: f64,
}

impl FloatInfo {
    pub const fn current() -> Self {
        Self {
            radix: f64::RADIX,
            mantissa_digits: f64::MANTISSA_DIGITS,
            digits: f64::DIGITS,
            epsilon: f64::EPSILON,
            max: f64::MAX,
            min_positive: f64::MIN_POSITIVE,
        }
    }
}

/// Snapshot of the toolchain that produced this binary plus ambient process
/// state. Captured once; never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// Always "rustc"
    pub implementation: String,
    /// Full compiler identity line, e.g. "rustc 1.84.0 (9fc6b4312 2025-01-07)"
    pub compiler: String,
    /// Release string, e.g. "1.84.0"
    pub version: String,
    /// Release parsed as (major, minor, patch)
    pub version_tuple: (u32, u32, u32),
    /// Release channel: stable, beta or nightly
    pub channel: String,
    pub commit_hash: String,
    pub commit_date: String,
    /// Target triple the compiler ran on
    pub host: String,
    /// Path to the running executable, when the OS can report it
    pub executable: Option<PathBuf>,
    /// Entries of `$PATH` at capture time
    pub search_path: Vec<PathBuf>,
    /// Cargo installation prefix (`$CARGO_HOME` or `~/.cargo`)
    pub cargo_home: Option<PathBuf>,
    /// Rustup installation prefix (`$RUSTUP_HOME` or `~/.rustup`)
    pub rustup_home: Option<PathBuf>,
    /// Largest value a pointer-sized integer can hold
    pub max_int: u64,
    pub pointer_width: u32,
    /// Rust strings are always UTF-8
    pub default_encoding: String,
    pub float_info: FloatInfo,
}

impl RuntimeInfo {
    /// Capture toolchain and process details.
    ///
    /// Parsing the embedded release string is a core query: failure aborts
    /// the whole snapshot.
    pub fn capture() -> Result<Self, PlatformError> {
        let version_tuple = parse_version_tuple(RUSTC_RELEASE)?;

        let search_path = env::var_os("PATH")
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();

        Ok(Self {
            implementation: "rustc".to_string(),
            compiler: RUSTC_VERSION_FULL.to_string(),
            version: RUSTC_RELEASE.to_string(),
            version_tuple,
            channel: RUSTC_CHANNEL.to_string(),
            commit_hash: RUSTC_COMMIT_HASH.to_string(),
            commit_date: RUSTC_COMMIT_DATE.to_string(),
            host: RUSTC_HOST.to_string(),
            executable: env::current_exe().ok(),
            search_path,
            cargo_home: env_or_home_dir("CARGO_HOME", ".cargo"),
            rustup_home: env_or_home_dir("RUSTUP_HOME", ".rustup"),
            max_int: usize::MAX as u64,
            pointer_width: usize::BITS,
            default_encoding: "utf-8".to_string(),
            float_info: FloatInfo::current(),
        })
    }
}

fn env_or_home_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(fallback)))
}

/// Parse "1.84.0" (or "1.86.0-nightly") into a (major, minor, patch) tuple.
fn parse_version_tuple(release: &str) -> Result<(u32, u32, u32), PlatformError> {
    let base = release.split('-').next().unwrap_or(release);
    let mut parts = base.split('.');
    let mut next_part = |name: &str| -> Result<u32, PlatformError> {
        parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(|| {
                PlatformError::snapshot(format!(
                    "malformed rustc release string '{release}' (bad {name} component)"
                ))
            })
    };

    Ok((next_part("major")?, next_part("minor")?, next_part("patch")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_fully_populated() {
        let runtime = RuntimeInfo::capture().unwrap();

        assert_eq!(runtime.implementation, "rustc");
        assert!(runtime.compiler.starts_with("rustc"));
        assert!(!runtime.version.is_empty());
        assert!(!runtime.host.is_empty());
        assert_eq!(runtime.default_encoding, "utf-8");
        assert!(runtime.pointer_width == 32 || runtime.pointer_width == 64);
    }

    #[test]
    fn test_version_tuple_matches_version_string() {
        let runtime = RuntimeInfo::capture().unwrap();
        let (major, minor, patch) = runtime.version_tuple;
        assert!(runtime.version.starts_with(&format!("{major}.{minor}.{patch}")));
    }

    #[test]
    fn test_parse_version_tuple() {
        assert_eq!(parse_version_tuple("1.84.0").unwrap(), (1, 84, 0));
        assert_eq!(parse_version_tuple("1.86.0-nightly").unwrap(), (1, 86, 0));

        assert!(parse_version_tuple("unknown").is_err());
        assert!(parse_version_tuple("1.84").is_err());
    }

    #[test]
    fn test_float_info_constants() {
        let float_info = FloatInfo::current();
        assert_eq!(float_info.radix, 2);
        assert_eq!(float_info.mantissa_digits, 53);
    }
}
