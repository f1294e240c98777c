//! Host and runtime introspection for hostinfo
//!
//! This crate provides:
//! - An immutable [`PlatformInfo`] snapshot of OS, uname and toolchain
//!   metadata, built once per call
//! - OS-specific extras ([`PlatformExtra`]) resolved lazily per family,
//!   degrading to a sentinel on unknown systems
//! - Byte-size conversion utilities ([`convert_bytes`])

mod bytes;
mod error;
mod extra;
mod map;
mod runtime;
mod snapshot;

pub use bytes::{Converted, ConvertedBytes, FILESIZE_UNITS, SizeUnit, convert_bytes};
pub use error::PlatformError;
pub use extra::{
    LibcVersion, LinuxExtra, MacExtra, PlatformExtra, WinExtra, freedesktop_os_release,
    libc_version,
};
pub use map::AsMap;
pub use runtime::{FloatInfo, RuntimeInfo};
pub use snapshot::{
    ArchInfo, ByteOrder, OsFamily, PlatformInfo, UnameInfo, cpu_count, get_platform_info,
};
