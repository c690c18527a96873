//! CIM queries over PowerShell
//!
//! Each method runs one `Get-CimInstance` in its own PowerShell process.
//! Remote hosts get `-ComputerName`, which opens (and on exit closes) a
//! WS-Man session owned by that process alone.

use async_trait::async_trait;
use inventory_common::{quote, OneOrMany, PowerShell, QueryError, QueryResult};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::client::{ManagementClient, Target};
use crate::types::{
    BiosFacts, ComputerSystemFacts, LogicalDiskFacts, NetworkAdapterFacts, OperatingSystemFacts,
    ProcessorFacts, ServiceFacts,
};

const OS_SELECT: &str = "Caption,Version,@{n='LastBootUpTime';e={$_.LastBootUpTime.ToUniversalTime().ToString('o')}}";
const COMPUTER_SYSTEM_SELECT: &str = "Manufacturer,Model,TotalPhysicalMemory";
const PROCESSOR_SELECT: &str = "Name,NumberOfCores,NumberOfLogicalProcessors";
const BIOS_SELECT: &str = "Manufacturer,SMBIOSBIOSVersion";
const ADAPTER_SELECT: &str = "IPEnabled,IPAddress,MACAddress";
const DISK_SELECT: &str = "DeviceID,Size,FreeSpace";
const SERVICE_SELECT: &str = "Name,State";

/// [`ManagementClient`] backed by `Get-CimInstance`
#[derive(Debug, Clone)]
pub struct CimClient {
    ps: PowerShell,
}

impl CimClient {
    pub fn new(ps: PowerShell) -> Self {
        Self { ps }
    }

    async fn single<T: DeserializeOwned>(&self, script: String) -> QueryResult<T> {
        let rows: OneOrMany<T> = self.ps.run_json(&script).await?;
        rows.into_vec().into_iter().next().ok_or(QueryError::Empty)
    }

    async fn list<T: DeserializeOwned>(&self, script: String) -> QueryResult<Vec<T>> {
        match self.ps.run_json::<OneOrMany<T>>(&script).await {
            Ok(rows) => Ok(rows.into_vec()),
            Err(QueryError::Empty) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

/// `Get-CimInstance` for one class, emitted as a JSON array
pub(crate) fn cim_script(
    class: &str,
    target: &Target,
    filter: Option<&str>,
    select: &str,
) -> String {
    let mut query = format!("Get-CimInstance -ClassName {}", class);
    if !target.local {
        query.push_str(" -ComputerName ");
        query.push_str(&quote(&target.host));
    }
    if let Some(filter) = filter {
        query.push_str(" -Filter ");
        query.push_str(&quote(filter));
    }
    format!(
        "ConvertTo-Json -Compress -Depth 3 -InputObject @({} | Select-Object {})",
        query, select
    )
}

/// Service lookup that throws when nothing matches, so an absent family is
/// a failed lookup rather than an empty one.
pub(crate) fn service_script(target: &Target, pattern: &str) -> String {
    let filter = format!("Name LIKE '{}'", wql_like(pattern));
    let mut query = String::from("Get-CimInstance -ClassName Win32_Service");
    if !target.local {
        query.push_str(" -ComputerName ");
        query.push_str(&quote(&target.host));
    }
    query.push_str(" -Filter ");
    query.push_str(&quote(&filter));
    format!(
        "$s = @({} | Select-Object {}); if ($s.Count -eq 0) {{ throw 'no service matches {}' }}; ConvertTo-Json -Compress -InputObject $s",
        query,
        SERVICE_SELECT,
        pattern.replace('\'', "''")
    )
}

/// Translate a `*` wildcard pattern into a WQL LIKE operand
pub(crate) fn wql_like(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '*' => out.push('%'),
            '%' => out.push_str("[%]"),
            '_' => out.push_str("[_]"),
            '[' => out.push_str("[[]"),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

#[async_trait]
impl ManagementClient for CimClient {
    #[instrument(skip(self), fields(host = %target.host))]
    async fn operating_system(&self, target: &Target) -> QueryResult<OperatingSystemFacts> {
        self.single(cim_script("Win32_OperatingSystem", target, None, OS_SELECT))
            .await
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn computer_system(&self, target: &Target) -> QueryResult<ComputerSystemFacts> {
        self.single(cim_script(
            "Win32_ComputerSystem",
            target,
            None,
            COMPUTER_SYSTEM_SELECT,
        ))
        .await
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn processor(&self, target: &Target) -> QueryResult<ProcessorFacts> {
        let sockets: Vec<ProcessorFacts> = self
            .list(cim_script("Win32_Processor", target, None, PROCESSOR_SELECT))
            .await?;
        ProcessorFacts::combine(sockets).ok_or(QueryError::Empty)
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn bios(&self, target: &Target) -> QueryResult<Option<BiosFacts>> {
        let rows: Vec<BiosFacts> = self
            .list(cim_script("Win32_BIOS", target, None, BIOS_SELECT))
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn network_adapters(&self, target: &Target) -> QueryResult<Vec<NetworkAdapterFacts>> {
        self.list(cim_script(
            "Win32_NetworkAdapterConfiguration",
            target,
            None,
            ADAPTER_SELECT,
        ))
        .await
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn logical_disks(&self, target: &Target) -> QueryResult<Vec<LogicalDiskFacts>> {
        self.list(cim_script(
            "Win32_LogicalDisk",
            target,
            Some("DriveType=3"),
            DISK_SELECT,
        ))
        .await
    }

    #[instrument(skip(self), fields(host = %target.host))]
    async fn services(&self, target: &Target, pattern: &str) -> QueryResult<Vec<ServiceFacts>> {
        self.list(service_script(target, pattern)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_script_has_no_computer_name() {
        let script = cim_script("Win32_BIOS", &Target::new("WS-01", true), None, BIOS_SELECT);
        assert!(!script.contains("-ComputerName"));
        assert!(script.starts_with(
            "ConvertTo-Json -Compress -Depth 3 -InputObject @(Get-CimInstance -ClassName Win32_BIOS"
        ));
    }

    #[test]
    fn test_remote_script_quotes_host_and_filter() {
        let script = cim_script(
            "Win32_LogicalDisk",
            &Target::remote("srv'01"),
            Some("DriveType=3"),
            DISK_SELECT,
        );
        assert!(script.contains("-ComputerName 'srv''01'"));
        assert!(script.contains("-Filter 'DriveType=3'"));
        assert!(script.contains("Select-Object DeviceID,Size,FreeSpace"));
    }

    #[test]
    fn test_adapter_script_selects_summary_fields() {
        let script = cim_script(
            "Win32_NetworkAdapterConfiguration",
            &Target::remote("WS-01"),
            None,
            ADAPTER_SELECT,
        );
        assert!(script.contains("Select-Object IPEnabled,IPAddress,MACAddress)"));
    }

    #[test]
    fn test_wql_like_translation() {
        assert_eq!(wql_like("MSSQL*"), "MSSQL%");
        assert_eq!(wql_like("SQL_Agent*"), "SQL[_]Agent%");
        assert_eq!(wql_like("100%"), "100[%]");
    }

    #[test]
    fn test_service_script_throws_on_no_match() {
        let script = service_script(&Target::remote("SQL01"), "MSSQL*");
        assert!(script.contains("-Filter 'Name LIKE ''MSSQL%'''"));
        assert!(script.contains("throw 'no service matches MSSQL*'"));
        assert!(script.contains("-ComputerName 'SQL01'"));
    }
}
