//! Integration tests for host-inventory
//!
//! The scripted client below stands in for a real management backend so the
//! whole collect -> render -> write path runs without Windows hosts.
//!
//! # Running tests
//!
//! ```bash
//! cargo test -p host-inventory --test integration
//!
//! # Probe the machine running the tests (requires pwsh with CIM support)
//! cargo test -p host-inventory --test integration -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use inventory_common::{PowerShell, QueryError, QueryResult};

use host_inventory::pipeline::publish;
use host_inventory::types::{
    BiosFacts, ComputerSystemFacts, LogicalDiskFacts, NetworkAdapterFacts, OperatingSystemFacts,
    ProcessorFacts, ServiceFacts,
};
use host_inventory::{
    Category, CimClient, Config, HostProbe, InventoryCollector, ManagementClient, ServiceStatus,
    Target, VirtualizationDetector,
};

/// Hosts named `DOWN*` are unreachable, `VM*` report a virtual model and
/// `SQL*` run a database engine.
struct ScriptedClient;

fn unreachable() -> QueryError {
    QueryError::CommandFailed {
        code: 1,
        stderr: "WinRM cannot complete the operation".to_string(),
    }
}

fn reachable(target: &Target) -> QueryResult<()> {
    if target.host.starts_with("DOWN") {
        Err(unreachable())
    } else {
        Ok(())
    }
}

#[async_trait]
impl ManagementClient for ScriptedClient {
    async fn operating_system(&self, target: &Target) -> QueryResult<OperatingSystemFacts> {
        reachable(target)?;
        Ok(OperatingSystemFacts {
            caption: Some("Microsoft Windows Server 2019 Datacenter".to_string()),
            version: Some("10.0.17763".to_string()),
            last_boot_up_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
    }

    async fn computer_system(&self, target: &Target) -> QueryResult<ComputerSystemFacts> {
        reachable(target)?;
        let model = if target.host.starts_with("VM") {
            "VMware Virtual Platform"
        } else {
            "ProLiant DL380 Gen10"
        };
        Ok(ComputerSystemFacts {
            manufacturer: Some("HPE".to_string()),
            model: Some(model.to_string()),
            total_physical_memory: Some(34_359_738_368),
        })
    }

    async fn processor(&self, target: &Target) -> QueryResult<ProcessorFacts> {
        reachable(target)?;
        Ok(ProcessorFacts {
            name: Some("AMD EPYC 7302".to_string()),
            number_of_cores: Some(16),
            number_of_logical_processors: Some(32),
        })
    }

    async fn bios(&self, target: &Target) -> QueryResult<Option<BiosFacts>> {
        reachable(target)?;
        Ok(Some(BiosFacts {
            manufacturer: Some("HPE".to_string()),
            smbios_bios_version: Some("U30".to_string()),
        }))
    }

    async fn network_adapters(&self, target: &Target) -> QueryResult<Vec<NetworkAdapterFacts>> {
        reachable(target)?;
        Ok(vec![
            NetworkAdapterFacts {
                ip_enabled: false,
                ip_address: None,
                mac_address: None,
            },
            NetworkAdapterFacts {
                ip_enabled: true,
                ip_address: Some(vec!["192.168.10.20".to_string(), "fe80::1".to_string()]),
                mac_address: Some("00:11:22:33:44:55".to_string()),
            },
        ])
    }

    async fn logical_disks(&self, _target: &Target) -> QueryResult<Vec<LogicalDiskFacts>> {
        Err(QueryError::Timeout(Duration::from_secs(60)))
    }

    async fn services(&self, target: &Target, pattern: &str) -> QueryResult<Vec<ServiceFacts>> {
        reachable(target)?;
        if target.host.starts_with("SQL") && pattern == "MSSQL*" {
            Ok(vec![
                ServiceFacts {
                    name: "MSSQLSERVER".to_string(),
                    state: Some("Running".to_string()),
                },
                ServiceFacts {
                    name: "MSSQL$REPORTS".to_string(),
                    state: Some("Running".to_string()),
                },
            ])
        } else {
            Err(QueryError::CommandFailed {
                code: 1,
                stderr: format!("no service matches {}", pattern),
            })
        }
    }
}

fn collector(client: Arc<dyn ManagementClient>) -> InventoryCollector {
    let config = Config::default();
    let probe = HostProbe::new(
        client,
        VirtualizationDetector::new(&config.classifier.virtual_indicators),
        config.services.clone(),
    );
    InventoryCollector::new(probe, config.probe.timeout(), config.probe.concurrency)
}

#[tokio::test]
async fn collect_render_and_write_directory_category() {
    let hosts = ["SQL01", "DOWN01", "VM-APP01", "FILE01"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let collection = collector(Arc::new(ScriptedClient))
        .collect(hosts, Category::Directory)
        .await;

    assert_eq!(collection.attempted(), 4);
    assert_eq!(collection.failures.len(), 1);
    assert_eq!(collection.failures[0].host, "DOWN01");

    let sql = &collection.records[0];
    assert_eq!(sql.host_name, "SQL01");
    assert_eq!(
        sql.sql_database_engine_status,
        ServiceStatus::Running(vec!["MSSQLSERVER".to_string(), "MSSQL$REPORTS".to_string()])
    );
    assert_eq!(sql.sql_reporting_services_status, ServiceStatus::NotFound);
    assert_eq!(sql.network_info, "IP: 192.168.10.20, MAC: 00:11:22:33:44:55");
    assert_eq!(sql.disk_summary, "N/A");
    assert_eq!(sql.bios_info, "Manufacturer: HPE, Version: U30");
    assert!(collection.records[1].is_virtual);
    assert!(!collection.records[2].is_virtual);

    let dir = tempfile::tempdir().unwrap();
    let generated_at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
    let written = publish(&collection, dir.path(), generated_at).unwrap();
    assert_eq!(written.len(), 2);

    let html = std::fs::read_to_string(dir.path().join("directory_inventory.html")).unwrap();
    assert!(html.contains("<title>Directory Computer Inventory</title>"));
    assert!(html.contains("2024-02-01T09:30:00Z"));
    assert!(html.contains(
        r#""sqlEngine":{"labels":["SQL Server present","No SQL Server"],"data":[1,2]}"#
    ));
    assert!(!html.contains("DOWN01"));

    let mut reader = csv::Reader::from_path(dir.path().join("directory_inventory.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    let names: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(names, vec!["SQL01", "VM-APP01", "FILE01"]);
    assert_eq!(&rows[0][10], "MSSQLSERVER, MSSQL$REPORTS");
    assert_eq!(&rows[1][5], "True");
}

#[tokio::test]
#[ignore = "integration test - requires pwsh with CIM support"]
async fn probe_local_machine() {
    let config = Config::default();
    let ps = PowerShell::new(
        config.powershell.executable.clone(),
        config.powershell.query_timeout(),
    );
    let client: Arc<dyn ManagementClient> = Arc::new(CimClient::new(ps));
    let host = host_inventory::HostSource::Local
        .enumerate(&PowerShell::new("pwsh", Duration::from_secs(5)))
        .await
        .unwrap();

    let collection = collector(client).collect(host, Category::Local).await;
    assert_eq!(collection.records.len(), 1, "failures: {:?}", collection.failures);
}
