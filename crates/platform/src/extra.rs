//! OS-specific "extra" platform details
//!
//! Some queries only make sense on one OS family (freedesktop os-release,
//! libc version, Windows edition). They are grouped into per-family records
//! behind a tagged [`PlatformExtra`] union and resolved lazily per call,
//! never stored on the base snapshot.

use crate::snapshot::{OsFamily, PlatformInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use sysinfo::System;
use tracing::{error, warn};

/// libc implementation name and version, e.g. ("glibc", "2.39").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibcVersion {
    pub name: String,
    pub version: String,
}

/// Linux-only details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinuxExtra {
    /// Parsed freedesktop os-release map; `None` when no os-release file is
    /// usable
    pub os_release: Option<BTreeMap<String, String>>,
    pub libc: Option<LibcVersion>,
}

impl LinuxExtra {
    pub fn query() -> Self {
        Self {
            os_release: freedesktop_os_release(),
            libc: libc_version(),
        }
    }
}

/// macOS-only details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacExtra {
    /// macOS product version, e.g. "15.3.1"
    pub mac_ver: Option<String>,
    pub libc: Option<LibcVersion>,
}

impl MacExtra {
    pub fn query() -> Self {
        Self {
            mac_ver: System::os_version(),
            libc: libc_version(),
        }
    }
}

/// Windows-only details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinExtra {
    pub version: Option<String>,
    pub kernel: Option<String>,
    /// Long edition string, e.g. "Windows 11 Pro"
    pub edition: Option<String>,
    pub is_iot: bool,
}

impl WinExtra {
    pub fn query() -> Self {
        let edition = System::long_os_version();
        let is_iot = edition
            .as_deref()
            .is_some_and(|name| name.contains("IoT"));

        Self {
            version: System::os_version(),
            kernel: System::kernel_version(),
            edition,
            is_iot,
        }
    }
}

/// Platform-specific info, exactly one shape per OS family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "os", rename_all = "lowercase")]
pub enum PlatformExtra {
    Linux(LinuxExtra),
    Mac(MacExtra),
    Windows(WinExtra),
    Unsupported { system: String },
}

impl PlatformExtra {
    /// Resolve the extra-info variant for an OS family.
    ///
    /// Unknown families degrade to [`PlatformExtra::Unsupported`] with an
    /// error log entry, never a hard failure.
    pub fn for_family(family: &OsFamily) -> Self {
        match family {
            OsFamily::Linux => PlatformExtra::Linux(LinuxExtra::query()),
            OsFamily::Mac => PlatformExtra::Mac(MacExtra::query()),
            OsFamily::Windows => PlatformExtra::Windows(WinExtra::query()),
            other => {
                error!("unknown OS family: {other}");
                PlatformExtra::Unsupported {
                    system: other.as_str().to_string(),
                }
            }
        }
    }
}

impl PlatformInfo {
    /// Resolve the OS-specific extra record for this snapshot's family.
    ///
    /// Re-derived on each call rather than stored on the snapshot: the
    /// underlying lookups (os-release parsing, libc probing) are more
    /// expensive and less stable than the base fields.
    pub fn platform_specific_info(&self) -> PlatformExtra {
        PlatformExtra::for_family(&self.family())
    }
}

/// Read and parse the freedesktop os-release file, trying `/etc/os-release`
/// then the `/usr/lib/os-release` fallback.
///
/// Returns `None` (with a warning) when neither file is usable; this is a
/// soft failure and never aborts the caller.
pub fn freedesktop_os_release() -> Option<BTreeMap<String, String>> {
    const CANDIDATES: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

    for path in CANDIDATES {
        if let Ok(raw) = fs::read_to_string(path) {
            return Some(parse_os_release(&raw));
        }
    }

    warn!("no usable os-release file under /etc or /usr/lib");
    None
}

/// glibc version via `gnu_get_libc_version(3)`.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn libc_version() -> Option<LibcVersion> {
    // SAFETY: gnu_get_libc_version returns a pointer to a static
    // NUL-terminated string owned by libc.
    let raw = unsafe { std::ffi::CStr::from_ptr(libc::gnu_get_libc_version()) };

    match raw.to_str() {
        Ok(version) => Some(LibcVersion {
            name: "glibc".to_string(),
            version: version.to_string(),
        }),
        Err(err) => {
            warn!("unable to decode libc version: {err}");
            None
        }
    }
}

/// libc version detection is only implemented for glibc targets.
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub fn libc_version() -> Option<LibcVersion> {
    warn!("libc version detection is not supported on this target");
    None
}

fn parse_os_release(raw: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        map.insert(key.trim().to_string(), unquote(value.trim()));
    }

    map
}

/// Strip surrounding quotes and unescape the characters os-release files
/// may escape inside double quotes.
fn unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));

    match inner {
        Some(inner) => inner
            .replace("\\\"", "\"")
            .replace("\\$", "$")
            .replace("\\`", "`")
            .replace("\\\\", "\\"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OS_RELEASE_FIXTURE: &str = r#"
# Sample os-release
NAME="Ubuntu"
VERSION="24.04.1 LTS (Noble Numbat)"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME='Ubuntu 24.04.1 LTS'
ANSI_COLOR="0;31"
ESCAPED="a \"quoted\" word"

MALFORMED LINE WITHOUT EQUALS
"#;

    #[test]
    fn test_parse_os_release() {
        let map = parse_os_release(OS_RELEASE_FIXTURE);

        assert_eq!(map.get("NAME").map(String::as_str), Some("Ubuntu"));
        assert_eq!(map.get("ID").map(String::as_str), Some("ubuntu"));
        assert_eq!(
            map.get("PRETTY_NAME").map(String::as_str),
            Some("Ubuntu 24.04.1 LTS")
        );
        assert_eq!(
            map.get("ESCAPED").map(String::as_str),
            Some(r#"a "quoted" word"#)
        );
        // Comments and malformed lines are skipped
        assert!(!map.keys().any(|k| k.starts_with('#')));
        assert!(!map.contains_key("MALFORMED LINE WITHOUT EQUALS"));
    }

    #[test]
    fn test_unknown_family_degrades_to_unsupported() {
        let extra = PlatformExtra::for_family(&OsFamily::Unknown("Plan9".to_string()));
        assert_eq!(
            extra,
            PlatformExtra::Unsupported {
                system: "Plan9".to_string()
            }
        );
    }

    #[test]
    fn test_java_family_is_unsupported() {
        // No extra queries exist for the Java family
        let extra = PlatformExtra::for_family(&OsFamily::Java);
        assert!(matches!(extra, PlatformExtra::Unsupported { system } if system == "Java"));
    }

    #[test]
    fn test_resolution_matches_snapshot_family() {
        let info = PlatformInfo::build().unwrap();
        let extra = info.platform_specific_info();

        match info.family() {
            OsFamily::Linux => assert!(matches!(extra, PlatformExtra::Linux(_))),
            OsFamily::Mac => assert!(matches!(extra, PlatformExtra::Mac(_))),
            OsFamily::Windows => assert!(matches!(extra, PlatformExtra::Windows(_))),
            _ => assert!(matches!(extra, PlatformExtra::Unsupported { .. })),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_extra_queries() {
        let extra = LinuxExtra::query();

        // os-release may legitimately be absent, but when present it
        // carries at least an ID or NAME key
        if let Some(map) = &extra.os_release {
            assert!(map.contains_key("ID") || map.contains_key("NAME"));
        }

        if let Some(libc) = &extra.libc {
            assert_eq!(libc.name, "glibc");
            assert!(!libc.version.is_empty());
        }
    }
}
