// ─── Memory Allocation ───
// Parses heap sizes like "2G" and offers choices sized to the machine.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sysinfo::System;
use tracing::warn;

use crate::core::error::LauncherError;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Heap size passed to the JVM as `-Xmx<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RamAllocation {
    megabytes: u64,
}

impl RamAllocation {
    pub fn from_megabytes(megabytes: u64) -> Self {
        Self { megabytes }
    }

    pub fn megabytes(self) -> u64 {
        self.megabytes
    }

    /// Size in bytes, saturating at `u64::MAX`.
    pub fn bytes(self) -> u64 {
        self.megabytes.saturating_mul(MIB)
    }

    /// JVM spelling: whole gigabytes as `NG`, anything else as `NM`.
    pub fn jvm_value(self) -> String {
        if self.megabytes % 1024 == 0 {
            format!("{}G", self.megabytes / 1024)
        } else {
            format!("{}M", self.megabytes)
        }
    }

    /// Warn when the request exceeds the machine's physical memory.
    pub fn warn_if_exceeds_system(self) {
        let total = total_memory_bytes();
        if total > 0 && self.bytes() > total {
            warn!(
                "Requested heap {} exceeds physical memory ({} MiB)",
                self.jvm_value(),
                total / MIB
            );
        }
    }
}

impl FromStr for RamAllocation {
    type Err = LauncherError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || LauncherError::InvalidRam(raw.to_string());

        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        let amount: u64 = digits.parse().map_err(|_| invalid())?;

        let megabytes = match unit.to_ascii_uppercase().as_str() {
            "G" | "GB" => amount.checked_mul(1024).ok_or_else(invalid)?,
            "M" | "MB" | "" => amount,
            _ => return Err(invalid()),
        };

        if megabytes == 0 || megabytes.checked_mul(MIB).is_none() {
            return Err(invalid());
        }
        Ok(Self { megabytes })
    }
}

impl fmt::Display for RamAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.jvm_value())
    }
}

pub fn total_memory_bytes() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}

/// Whole-gigabyte choices from 1G up to the installed memory (at least 1G).
pub fn suggested_ram_options() -> Vec<RamAllocation> {
    ram_options_for(total_memory_bytes())
}

fn ram_options_for(total_bytes: u64) -> Vec<RamAllocation> {
    let max_gb = (total_bytes / GIB).max(1);
    (1..=max_gb)
        .map(|gb| RamAllocation::from_megabytes(gb * 1024))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("2G".parse::<RamAllocation>().unwrap().megabytes(), 2048);
        assert_eq!("4g".parse::<RamAllocation>().unwrap().megabytes(), 4096);
        assert_eq!("512M".parse::<RamAllocation>().unwrap().megabytes(), 512);
        assert_eq!(" 3072 ".parse::<RamAllocation>().unwrap().megabytes(), 3072);
        assert_eq!("6GB".parse::<RamAllocation>().unwrap().megabytes(), 6144);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "G", "0G", "2T", "-1G", "two"] {
            assert!(bad.parse::<RamAllocation>().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn rejects_sizes_that_overflow_bytes() {
        assert!(matches!(
            "17592186044416M".parse::<RamAllocation>(),
            Err(LauncherError::InvalidRam(_))
        ));
        assert!("17592186044415M".parse::<RamAllocation>().is_ok());
    }

    #[test]
    fn huge_allocation_saturates_instead_of_overflowing() {
        let huge = RamAllocation::from_megabytes(u64::MAX);
        assert_eq!(huge.bytes(), u64::MAX);
        huge.warn_if_exceeds_system();
    }

    #[test]
    fn jvm_value_prefers_gigabytes() {
        assert_eq!(RamAllocation::from_megabytes(2048).jvm_value(), "2G");
        assert_eq!(RamAllocation::from_megabytes(1536).to_string(), "1536M");
    }

    #[test]
    fn options_scale_with_memory() {
        let opts = ram_options_for(8 * GIB + 100 * MIB);
        assert_eq!(opts.len(), 8);
        assert_eq!(opts.first().unwrap().jvm_value(), "1G");
        assert_eq!(opts.last().unwrap().jvm_value(), "8G");
        assert_eq!(ram_options_for(0).len(), 1);
    }
}
