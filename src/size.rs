//! Byte counts in human units.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::file::file_size_bytes;

/// Binary size units, each 1024 times the previous, starting at kilobytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// 1024 bytes.
    Kb,
    /// 1024 kilobytes.
    Mb,
    /// 1024 megabytes.
    Gb,
    /// 1024 gigabytes.
    Tb,
    /// 1024 terabytes.
    Pb,
    /// 1024 petabytes.
    Xb,
    /// 1024 exabytes.
    Zb,
}

impl SizeUnit {
    /// Every unit, smallest first.
    pub const ALL: [SizeUnit; 7] = [
        SizeUnit::Kb,
        SizeUnit::Mb,
        SizeUnit::Gb,
        SizeUnit::Tb,
        SizeUnit::Pb,
        SizeUnit::Xb,
        SizeUnit::Zb,
    ];

    /// The two letter key, e.g. `"mb"`.
    pub fn key(self) -> &'static str {
        match self {
            SizeUnit::Kb => "kb",
            SizeUnit::Mb => "mb",
            SizeUnit::Gb => "gb",
            SizeUnit::Tb => "tb",
            SizeUnit::Pb => "pb",
            SizeUnit::Xb => "xb",
            SizeUnit::Zb => "zb",
        }
    }

    /// Number of bytes in one of this unit.
    pub fn bytes(self) -> f64 {
        let exponent = self as i32 + 1;
        1024f64.powi(exponent)
    }

    /// Converts a byte count into this unit.
    pub fn convert(self, byte_count: u64) -> f64 {
        byte_count as f64 / self.bytes()
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SizeUnit {
    type Err = Error;

    /// Keys are matched exactly; `"MB"` is not a unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeUnit::ALL
            .into_iter()
            .find(|u| u.key() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown size unit {s:?}")))
    }
}

/// Converts `byte_count` into the unit named by `unit`.
///
/// An unknown unit key returns the byte count unchanged.
pub fn convert_bytes(byte_count: u64, unit: &str) -> f64 {
    match unit.parse::<SizeUnit>() {
        Ok(unit) => unit.convert(byte_count),
        Err(_) => byte_count as f64,
    }
}

/// Formats `byte_count` as `"<value to 2 decimals><unit>"`, or as
/// `"<bytes>b"` when `unit` is not a known key.
pub fn format_bytes(byte_count: u64, unit: &str) -> String {
    match unit.parse::<SizeUnit>() {
        Ok(unit) => format!("{:.2}{}", unit.convert(byte_count), unit),
        Err(_) => format!("{byte_count}b"),
    }
}

/// Size of the file at `path` formatted with [`format_bytes`].
pub async fn format_file_size<P: AsRef<Path>>(path: P, unit: &str) -> Result<String, Error> {
    let byte_count = file_size_bytes(path).await?;
    Ok(format_bytes(byte_count, unit))
}
