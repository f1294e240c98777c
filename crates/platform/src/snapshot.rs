//! The point-in-time platform snapshot

use crate::error::PlatformError;
use crate::runtime::RuntimeInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use sysinfo::System;
use tracing::error;

/// Operating-system family, classified from the captured system name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Mac,
    Windows,
    Java,
    Unknown(String),
}

impl OsFamily {
    /// Classify a `uname` system string ("Linux", "Darwin", "Windows", ...).
    ///
    /// Unrecognized names degrade to [`OsFamily::Unknown`] rather than
    /// failing.
    pub fn from_system(system: &str) -> Self {
        match system {
            "Linux" | "Unix" => OsFamily::Linux,
            "Darwin" => OsFamily::Mac,
            "Windows" => OsFamily::Windows,
            "Java" => OsFamily::Java,
            other => OsFamily::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OsFamily::Linux => "Linux",
            OsFamily::Mac => "Darwin",
            OsFamily::Windows => "Windows",
            OsFamily::Java => "Java",
            OsFamily::Unknown(name) => name,
        }
    }

    /// Small ASCII logo for banner output.
    pub fn ascii_art(&self) -> &'static str {
        match self {
            OsFamily::Linux => {
                r"   .--.
  |o_o |
  |:_/ |
 //   \ \
(|     | )
/'\_   _/`\
\___)=(___/"
            }
            OsFamily::Mac => {
                r"       .:'
    __ :'__
 .'`__`-'__``.
:__________.-'
:_________:
 :_________`-;
  `.__.-.__.'"
            }
            OsFamily::Windows => {
                r"__       __
\ \ ____ \ \
 | |    | | |
 | |____| | |
/_/      /_/"
            }
            _ => {
                r"+---------+
| unknown |
|   OS    |
+---------+"
            }
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Endianness of the running process, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub const fn current() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ByteOrder::Big => "big",
            ByteOrder::Little => "little",
        }
    }
}

/// Pointer width and executable linkage format, e.g. ("64bit", "ELF").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchInfo {
    pub bits: String,
    pub linkage: String,
}

impl ArchInfo {
    pub fn current() -> Self {
        let linkage = if cfg!(target_os = "windows") {
            "WindowsPE"
        } else if cfg!(target_os = "macos") {
            // Mach-O binaries report no linkage format, matching uname-era
            // architecture tuples
            ""
        } else {
            "ELF"
        };

        Self {
            bits: format!("{}bit", usize::BITS),
            linkage: linkage.to_string(),
        }
    }
}

/// Point-in-time copy of the `uname(2)` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnameInfo {
    pub system: String,
    pub node: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

impl UnameInfo {
    /// Capture the uname fields from the host.
    ///
    /// Uses `uname(2)` on Unix; other targets synthesize the same fields
    /// from the sysinfo backend. Any failure is a hard snapshot error.
    #[cfg(unix)]
    pub fn capture() -> Result<Self, PlatformError> {
        let uts = nix::sys::utsname::uname()
            .map_err(|err| PlatformError::snapshot_with("uname(2) failed", err))?;

        let node = match uts.nodename().to_string_lossy() {
            name if name.is_empty() => whoami::fallible::hostname().unwrap_or_default(),
            name => name.into_owned(),
        };

        Ok(Self {
            system: uts.sysname().to_string_lossy().into_owned(),
            node,
            release: uts.release().to_string_lossy().into_owned(),
            version: uts.version().to_string_lossy().into_owned(),
            machine: uts.machine().to_string_lossy().into_owned(),
        })
    }

    #[cfg(not(unix))]
    pub fn capture() -> Result<Self, PlatformError> {
        let system = System::name()
            .ok_or_else(|| PlatformError::snapshot("query for OS name failed"))?;
        let release = System::os_version()
            .ok_or_else(|| PlatformError::snapshot("query for OS version failed"))?;
        let version = System::kernel_version()
            .ok_or_else(|| PlatformError::snapshot("query for kernel version failed"))?;
        let node = System::host_name()
            .or_else(|| whoami::fallible::hostname().ok())
            .unwrap_or_default();

        Ok(Self {
            system,
            node,
            release,
            version,
            machine: std::env::consts::ARCH.to_string(),
        })
    }
}

/// Immutable snapshot of host and runtime metadata.
///
/// Built once per [`PlatformInfo::build`] call; nothing is cached or shared
/// between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Full platform string, e.g. "Linux-6.8.0-x86_64"
    pub platform: String,
    /// Platform string without the machine suffix
    pub platform_terse: String,
    /// Platform string with the system name aliased (Darwin -> macOS)
    pub platform_aliased: String,
    pub machine: String,
    pub system: String,
    pub release: String,
    pub version: String,
    /// CPU brand string; empty on backends that cannot report one
    pub processor: Option<String>,
    pub arch: ArchInfo,
    pub uname: UnameInfo,
    pub runtime: RuntimeInfo,
    pub byteorder: ByteOrder,
}

impl PlatformInfo {
    /// Query the host once and return a fully-populated snapshot.
    ///
    /// Core fields are all-or-nothing: if any underlying query fails the
    /// whole construction fails with [`PlatformError::Snapshot`]. There is
    /// no partial result.
    pub fn build() -> Result<Self, PlatformError> {
        let uname = UnameInfo::capture()?;
        let runtime = RuntimeInfo::capture()?;

        let system = uname.system.clone();
        let release = uname.release.clone();
        let version = uname.version.clone();
        let machine = uname.machine.clone();

        Ok(Self {
            platform: format!("{system}-{release}-{machine}"),
            platform_terse: format!("{system}-{release}"),
            platform_aliased: format!("{}-{release}-{machine}", aliased_system(&system)),
            machine,
            system,
            release,
            version,
            processor: query_processor(),
            arch: ArchInfo::current(),
            uname,
            runtime,
            byteorder: ByteOrder::current(),
        })
    }

    /// OS family classified from the captured system string.
    pub fn family(&self) -> OsFamily {
        OsFamily::from_system(&self.system)
    }

    /// ASCII logo for the captured OS family.
    pub fn ascii_art(&self) -> &'static str {
        self.family().ascii_art()
    }

    pub fn is_linux(&self) -> bool {
        self.family() == OsFamily::Linux
    }

    pub fn is_mac(&self) -> bool {
        self.family() == OsFamily::Mac
    }

    pub fn is_windows(&self) -> bool {
        self.family() == OsFamily::Windows
    }

    pub fn is_java(&self) -> bool {
        self.family() == OsFamily::Java
    }

    /// True for any Unix-family system (Linux or macOS).
    pub fn is_unix(&self) -> bool {
        self.is_linux() || self.is_mac()
    }

    pub fn is_32bit(&self) -> bool {
        self.arch.bits == "32bit"
    }

    pub fn is_64bit(&self) -> bool {
        self.arch.bits == "64bit"
    }
}

/// Build a snapshot, logging any hard failure before propagating it.
pub fn get_platform_info() -> Result<PlatformInfo, PlatformError> {
    PlatformInfo::build()
        .inspect_err(|err| error!("unhandled error initializing platform info: {err}"))
}

/// Logical CPU count, at least 1.
pub fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
}

fn aliased_system(system: &str) -> &str {
    match system {
        "Darwin" => "macOS",
        "SunOS" => "Solaris",
        other => other,
    }
}

/// CPU brand string via sysinfo, or `None` when the backend reports nothing.
fn query_processor() -> Option<String> {
    let mut sys = System::new();
    sys.refresh_cpu_all();

    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
}
