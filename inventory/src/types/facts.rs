//! Raw facts as returned by the CIM classes
//!
//! Field names follow the CIM property names so the JSON emitted by
//! `ConvertTo-Json` deserializes directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Win32_OperatingSystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperatingSystemFacts {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Emitted by the query as an ISO-8601 UTC string
    pub last_boot_up_time: DateTime<Utc>,
}

/// Win32_ComputerSystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystemFacts {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub total_physical_memory: Option<u64>,
}

/// Win32_Processor (one per socket)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorFacts {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number_of_cores: Option<u32>,
    #[serde(default)]
    pub number_of_logical_processors: Option<u32>,
}

impl ProcessorFacts {
    /// Fold per-socket rows into one: the first socket's name, summed counts.
    ///
    /// Returns `None` when there are no sockets at all.
    pub fn combine(sockets: Vec<ProcessorFacts>) -> Option<ProcessorFacts> {
        let mut iter = sockets.into_iter();
        let first = iter.next()?;
        let mut combined = ProcessorFacts {
            name: first.name.map(|n| n.trim().to_string()),
            number_of_cores: first.number_of_cores,
            number_of_logical_processors: first.number_of_logical_processors,
        };
        for socket in iter {
            combined.number_of_cores = sum(combined.number_of_cores, socket.number_of_cores);
            combined.number_of_logical_processors = sum(
                combined.number_of_logical_processors,
                socket.number_of_logical_processors,
            );
        }
        Some(combined)
    }
}

fn sum(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.saturating_add(b)),
        (a, b) => a.or(b),
    }
}

/// Win32_BIOS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BiosFacts {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "SMBIOSBIOSVersion", default)]
    pub smbios_bios_version: Option<String>,
}

/// Win32_NetworkAdapterConfiguration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAdapterFacts {
    #[serde(rename = "IPEnabled", default)]
    pub ip_enabled: bool,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<Vec<String>>,
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
}

/// Win32_LogicalDisk (fixed disks only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogicalDiskFacts {
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub free_space: Option<u64>,
}

/// Win32_Service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceFacts {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl ServiceFacts {
    pub fn is_running(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("running"))
    }
}
