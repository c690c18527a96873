//! Host enumeration
//!
//! Each source turns into the host list for one [`Category`]. Directory and
//! cloud-directory lookups run through the same PowerShell executor as the
//! probes.

use inventory_common::{quote, OneOrMany, PowerShell, QueryError};
use sysinfo::System;
use thiserror::Error;
use tracing::{info, instrument};

use crate::types::Category;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{category} source unavailable: {source}")]
    Unavailable {
        category: Category,
        #[source]
        source: QueryError,
    },

    #[error("could not determine the local host name")]
    NoLocalHostName,
}

/// A configured host source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    Local,
    /// Computer objects known to the directory server at this address
    Directory { server: String },
    /// Devices registered in the cloud directory
    CloudDirectory,
}

impl HostSource {
    pub fn category(&self) -> Category {
        match self {
            HostSource::Local => Category::Local,
            HostSource::Directory { .. } => Category::Directory,
            HostSource::CloudDirectory => Category::CloudDirectory,
        }
    }

    /// Host names from this source, blanks removed, in source order
    #[instrument(skip(ps), fields(category = %self.category()))]
    pub async fn enumerate(&self, ps: &PowerShell) -> Result<Vec<String>, SourceError> {
        let hosts = match self {
            HostSource::Local => vec![local_host_name()?],
            HostSource::Directory { server } => {
                self.query(ps, &directory_script(server)).await?
            }
            HostSource::CloudDirectory => self.query(ps, CLOUD_DIRECTORY_SCRIPT).await?,
        };
        info!(hosts = hosts.len(), "enumerated hosts");
        Ok(hosts)
    }

    async fn query(&self, ps: &PowerShell, script: &str) -> Result<Vec<String>, SourceError> {
        let names = match ps.run_json::<OneOrMany<Option<String>>>(script).await {
            Ok(names) => names.into_vec(),
            Err(QueryError::Empty) => Vec::new(),
            Err(source) => {
                return Err(SourceError::Unavailable {
                    category: self.category(),
                    source,
                })
            }
        };
        Ok(clean_names(names.into_iter().flatten()))
    }
}

const CLOUD_DIRECTORY_SCRIPT: &str =
    "ConvertTo-Json -Compress -InputObject @(Get-MgDevice -All | Select-Object -ExpandProperty DisplayName)";

fn directory_script(server: &str) -> String {
    format!(
        "Import-Module ActiveDirectory; ConvertTo-Json -Compress -InputObject @(Get-ADComputer -Filter * -Server {} | Select-Object -ExpandProperty Name)",
        quote(server)
    )
}

fn local_host_name() -> Result<String, SourceError> {
    System::host_name()
        .or_else(|| std::env::var("COMPUTERNAME").ok())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(SourceError::NoLocalHostName)
}

/// Trim names and drop the blank ones
pub fn clean_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(HostSource::Local.category(), Category::Local);
        assert_eq!(
            HostSource::Directory {
                server: "dc01".into()
            }
            .category(),
            Category::Directory
        );
        assert_eq!(HostSource::CloudDirectory.category(), Category::CloudDirectory);
    }

    #[test]
    fn test_clean_names() {
        let names = vec![
            " SRV01 ".to_string(),
            String::new(),
            "   ".to_string(),
            "srv02".to_string(),
        ];
        assert_eq!(clean_names(names), vec!["SRV01", "srv02"]);
    }

    #[test]
    fn test_directory_script_quotes_server() {
        let script = directory_script("dc'01.corp.example");
        assert!(script.contains("-Server 'dc''01.corp.example'"));
        assert!(script.contains("Get-ADComputer -Filter *"));
    }

    #[tokio::test]
    async fn test_missing_shell_is_unavailable() {
        let ps = PowerShell::new("no-such-shell-for-host-inventory", Duration::from_secs(5));
        let source = HostSource::Directory {
            server: "dc01".into(),
        };

        let err = source.enumerate(&ps).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Unavailable {
                category: Category::Directory,
                source: QueryError::NotFound(_),
            }
        ));
    }
}
