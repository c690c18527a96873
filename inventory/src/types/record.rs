//! Inventory record types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ServiceStatus;

/// Literal used for optional facts that could not be collected
pub const NOT_AVAILABLE: &str = "N/A";

/// Column order shared by the CSV export and the HTML table
pub const FIELD_NAMES: [&str; 18] = [
    "HostName",
    "OSName",
    "OSVersion",
    "Manufacturer",
    "Model",
    "IsVirtual",
    "TotalPhysicalMemoryBytes",
    "CPUName",
    "CPUCoreCount",
    "CPULogicalProcessorCount",
    "SQLDatabaseEngineStatus",
    "SQLIntegrationServicesStatus",
    "SQLReportingServicesStatus",
    "BIOSInfo",
    "NetworkInfo",
    "DiskSummary",
    "LastBootTime",
    "UptimeDays",
];

/// Facts collected from one host that answered every mandatory query
///
/// Records are built once by the probe and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "HostName")]
    pub host_name: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    #[serde(rename = "OSVersion")]
    pub os_version: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "IsVirtual")]
    pub is_virtual: bool,
    #[serde(rename = "TotalPhysicalMemoryBytes")]
    pub total_physical_memory_bytes: u64,
    #[serde(rename = "CPUName")]
    pub cpu_name: String,
    #[serde(rename = "CPUCoreCount")]
    pub cpu_core_count: u32,
    #[serde(rename = "CPULogicalProcessorCount")]
    pub cpu_logical_processor_count: u32,
    #[serde(rename = "SQLDatabaseEngineStatus")]
    pub sql_database_engine_status: ServiceStatus,
    #[serde(rename = "SQLIntegrationServicesStatus")]
    pub sql_integration_services_status: ServiceStatus,
    #[serde(rename = "SQLReportingServicesStatus")]
    pub sql_reporting_services_status: ServiceStatus,
    #[serde(rename = "BIOSInfo")]
    pub bios_info: String,
    #[serde(rename = "NetworkInfo")]
    pub network_info: String,
    #[serde(rename = "DiskSummary")]
    pub disk_summary: String,
    #[serde(rename = "LastBootTime")]
    pub last_boot_time: DateTime<Utc>,
    /// Days since boot, one decimal place
    #[serde(rename = "UptimeDays")]
    pub uptime_days: f64,
}

impl InventoryRecord {
    /// Render every field as text, in [`FIELD_NAMES`] order.
    pub fn export_row(&self) -> Vec<String> {
        vec![
            self.host_name.clone(),
            self.os_name.clone(),
            self.os_version.clone(),
            self.manufacturer.clone(),
            self.model.clone(),
            if self.is_virtual { "True" } else { "False" }.to_string(),
            self.total_physical_memory_bytes.to_string(),
            self.cpu_name.clone(),
            self.cpu_core_count.to_string(),
            self.cpu_logical_processor_count.to_string(),
            self.sql_database_engine_status.to_string(),
            self.sql_integration_services_status.to_string(),
            self.sql_reporting_services_status.to_string(),
            self.bios_info.clone(),
            self.network_info.clone(),
            self.disk_summary.clone(),
            self.last_boot_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.1}", self.uptime_days),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn test_export_row_matches_field_order() {
        let mut rec = record("SQL01");
        rec.sql_database_engine_status = ServiceStatus::Running(vec!["MSSQLSERVER".into()]);
        rec.is_virtual = true;

        let row = rec.export_row();
        assert_eq!(row.len(), FIELD_NAMES.len());
        assert_eq!(row[0], "SQL01");
        assert_eq!(row[5], "True");
        assert_eq!(row[6], "68719476736");
        assert_eq!(row[10], "MSSQLSERVER");
        assert_eq!(row[11], "Not Found");
        assert_eq!(row[16], "2024-05-01T08:15:30Z");
        assert_eq!(row[17], "3.5");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(record("WS-01")).unwrap();
        let obj = json.as_object().unwrap();
        for name in FIELD_NAMES {
            assert!(obj.contains_key(name), "missing field {}", name);
        }
        assert_eq!(obj.len(), FIELD_NAMES.len());
    }
}
