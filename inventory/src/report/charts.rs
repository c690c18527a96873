//! Two-slice distributions shown next to the table

use serde::Serialize;

use crate::types::InventoryRecord;

/// Labels and counts for one pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub labels: [&'static str; 2],
    pub data: [usize; 2],
}

/// Both charts, computed once from the whole collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub sql_engine: Distribution,
    pub virtualization: Distribution,
}

impl Charts {
    pub fn from_records(records: &[InventoryRecord]) -> Self {
        let with_sql = records
            .iter()
            .filter(|r| r.sql_database_engine_status.is_found())
            .count();
        let virtual_count = records.iter().filter(|r| r.is_virtual).count();

        Self {
            sql_engine: Distribution {
                labels: ["SQL Server present", "No SQL Server"],
                data: [with_sql, records.len() - with_sql],
            },
            virtualization: Distribution {
                labels: ["Virtual", "Physical"],
                data: [virtual_count, records.len() - virtual_count],
            },
        }
    }
}
