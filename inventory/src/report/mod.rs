//! Report rendering
//!
//! A collection renders to an HTML document and, when it has records, a CSV
//! export. Rendering is pure; [`write_outputs`] puts the results on disk.

mod charts;
mod document;
mod export;
mod writer;

pub use charts::{Charts, Distribution};
pub use document::{render_document, render_placeholder, Payload, PAYLOAD_VERSION};
pub use export::to_csv;
pub use writer::{write_outputs, Destinations};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::InventoryRecord;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendered artifacts for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub document: String,
    /// `None` when there were no records to export
    pub export: Option<Vec<u8>>,
}

/// Render a document (and export) for `records`, titled `title`.
pub fn render(
    records: &[InventoryRecord],
    title: &str,
    generated_at: DateTime<Utc>,
) -> Result<Rendered, RenderError> {
    if records.is_empty() {
        return Ok(Rendered {
            document: render_placeholder(title, generated_at)?,
            export: None,
        });
    }

    Ok(Rendered {
        document: render_document(records, title, generated_at)?,
        export: Some(to_csv(records)?),
    })
}
