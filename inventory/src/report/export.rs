//! Tabular (CSV) export

use crate::types::{InventoryRecord, FIELD_NAMES};

/// Header row plus one row per record, in collection order.
pub fn to_csv(records: &[InventoryRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(FIELD_NAMES)?;
    for record in records {
        writer.write_record(record.export_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
