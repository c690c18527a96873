//! Service family status

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ServiceFacts;

/// A family of services looked up by a name pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceFamily {
    DatabaseEngine,
    IntegrationServices,
    ReportingServices,
}

impl ServiceFamily {
    pub fn label(self) -> &'static str {
        match self {
            ServiceFamily::DatabaseEngine => "database engine",
            ServiceFamily::IntegrationServices => "integration services",
            ServiceFamily::ReportingServices => "reporting services",
        }
    }
}

/// Tri-state status of one service family on one host
///
/// `Running` always holds at least one name; build values through
/// [`ServiceStatus::from_lookup`] to keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "services")]
pub enum ServiceStatus {
    /// The lookup itself failed: the family is absent or unsupported
    #[default]
    NotFound,
    /// Services matched but none is running
    InstalledNotRunning,
    /// Names of the running services, in lookup order
    Running(Vec<String>),
}

impl ServiceStatus {
    /// Resolve the outcome of a service lookup into exactly one state.
    pub fn from_lookup<E>(lookup: Result<Vec<ServiceFacts>, E>) -> Self {
        match lookup {
            Err(_) => ServiceStatus::NotFound,
            Ok(services) => {
                let running: Vec<String> = services
                    .into_iter()
                    .filter(ServiceFacts::is_running)
                    .map(|s| s.name)
                    .collect();
                if running.is_empty() {
                    ServiceStatus::InstalledNotRunning
                } else {
                    ServiceStatus::Running(running)
                }
            }
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, ServiceStatus::NotFound)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::NotFound => f.write_str("Not Found"),
            ServiceStatus::InstalledNotRunning => f.write_str("Installed (Not Running)"),
            ServiceStatus::Running(names) => f.write_str(&names.join(", ")),
        }
    }
}
