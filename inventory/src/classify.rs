//! Derivations over raw facts
//!
//! Everything here is pure: no I/O, no clock reads. The probe passes in
//! "now" so uptime stays testable.

use chrono::{DateTime, Utc};

use crate::types::{BiosFacts, LogicalDiskFacts, NetworkAdapterFacts, NOT_AVAILABLE};

/// Model substrings that mark a chassis as a virtual machine
pub const DEFAULT_VIRTUAL_INDICATORS: &[&str] = &[
    "Virtual",
    "VMware",
    "Hyper-V",
    "KVM",
    "VirtualBox",
    "Xen",
    "QEMU",
];

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Case-insensitive substring matcher over chassis model strings
#[derive(Debug, Clone)]
pub struct VirtualizationDetector {
    /// Lowercased once at construction
    indicators: Vec<String>,
}

impl VirtualizationDetector {
    pub fn new<I, S>(indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            indicators: indicators
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// True iff any indicator occurs in `model`
    pub fn is_virtual(&self, model: &str) -> bool {
        let model = model.to_lowercase();
        self.indicators.iter().any(|i| model.contains(i.as_str()))
    }
}

impl Default for VirtualizationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_INDICATORS)
    }
}

/// Bytes to GiB, rounded to one decimal
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round1(bytes as f64 / BYTES_PER_GB)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Days between boot and `now`, rounded to one decimal. Clock skew that
/// puts the boot in the future yields 0.0.
pub fn uptime_days(last_boot: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - last_boot).num_seconds().max(0);
    round1(seconds as f64 / SECONDS_PER_DAY)
}

/// `"C: 12.3GB free of 100.0GB; D: ..."`, or N/A when there are no volumes
pub fn disk_summary(disks: &[LogicalDiskFacts]) -> String {
    if disks.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    disks
        .iter()
        .map(|disk| {
            format!(
                "{}: {:.1}GB free of {:.1}GB",
                disk.device_id.trim_end_matches(':'),
                bytes_to_gb(disk.free_space.unwrap_or(0)),
                bytes_to_gb(disk.size.unwrap_or(0)),
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// IP and MAC of the first IP-enabled adapter, in enumeration order.
///
/// The query gives no ordering guarantee, so with several enabled adapters
/// the chosen one may differ between runs.
pub fn network_summary(adapters: &[NetworkAdapterFacts]) -> String {
    let Some(adapter) = adapters.iter().find(|a| a.ip_enabled) else {
        return NOT_AVAILABLE.to_string();
    };
    let ip = adapter
        .ip_address
        .as_ref()
        .and_then(|ips| ips.first())
        .map(String::as_str)
        .unwrap_or(NOT_AVAILABLE);
    let mac = adapter.mac_address.as_deref().unwrap_or(NOT_AVAILABLE);
    format!("IP: {}, MAC: {}", ip, mac)
}

/// `"Manufacturer: X, Version: Y"`, or N/A when nothing useful came back
pub fn bios_summary(bios: Option<&BiosFacts>) -> String {
    let Some(bios) = bios else {
        return NOT_AVAILABLE.to_string();
    };
    let manufacturer = non_blank(bios.manufacturer.as_deref());
    let version = non_blank(bios.smbios_bios_version.as_deref());
    if manufacturer.is_none() && version.is_none() {
        return NOT_AVAILABLE.to_string();
    }
    format!(
        "Manufacturer: {}, Version: {}",
        manufacturer.unwrap_or(NOT_AVAILABLE),
        version.unwrap_or(NOT_AVAILABLE)
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
