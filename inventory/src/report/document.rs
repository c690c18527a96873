//! HTML document rendering
//!
//! The document is self-contained apart from the charting library. Every
//! table cell goes through tera's autoescaping; the only raw insertion is the
//! JSON payload, in which every `<` is written as `\u003c` so it cannot close
//! its script element.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use super::charts::Charts;
use super::RenderError;
use crate::types::{InventoryRecord, FIELD_NAMES};

const REPORT_TEMPLATE: &str = include_str!("templates/report.html");
const PLACEHOLDER_TEMPLATE: &str = include_str!("templates/placeholder.html");

/// Version of the embedded payload layout
pub const PAYLOAD_VERSION: u32 = 1;

/// Data embedded in the document for the client-side script
#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    pub version: u32,
    pub records: &'a [InventoryRecord],
    pub charts: Charts,
}

impl<'a> Payload<'a> {
    pub fn new(records: &'a [InventoryRecord]) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            records,
            charts: Charts::from_records(records),
        }
    }

    /// JSON safe to place inside a `<script>` element
    pub fn to_embedded_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace('<', "\\u003c"))
    }
}

fn timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Full report: charts, filter box and one table row per record
pub fn render_document(
    records: &[InventoryRecord],
    title: &str,
    generated_at: DateTime<Utc>,
) -> Result<String, RenderError> {
    let payload = Payload::new(records).to_embedded_json()?;
    let rows: Vec<Vec<String>> = records.iter().map(InventoryRecord::export_row).collect();

    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("generated_at", &timestamp(generated_at));
    ctx.insert("columns", &FIELD_NAMES);
    ctx.insert("rows", &rows);
    ctx.insert("record_count", &records.len());
    ctx.insert("payload", &payload);

    Ok(Tera::one_off(REPORT_TEMPLATE, &ctx, true)?)
}

/// Stand-in document for a category with no records
pub fn render_placeholder(title: &str, generated_at: DateTime<Utc>) -> Result<String, RenderError> {
    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("generated_at", &timestamp(generated_at));
    Ok(Tera::one_off(PLACEHOLDER_TEMPLATE, &ctx, true)?)
}
