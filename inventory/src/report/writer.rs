//! All-or-nothing output
//!
//! Both artifacts are fully written to temporary files beside their
//! destinations before either is moved into place. A failure while staging
//! leaves existing files untouched. A run without an export removes the
//! previous run's export, so the files on disk always come from one run.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{RenderError, Rendered};

/// Where a category's artifacts land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub document: PathBuf,
    pub export: PathBuf,
}

impl Destinations {
    /// `<dir>/<slug>_inventory.html` and `<dir>/<slug>_inventory.csv`
    pub fn in_dir(dir: &Path, slug: &str) -> Self {
        Self {
            document: dir.join(format!("{}_inventory.html", slug)),
            export: dir.join(format!("{}_inventory.csv", slug)),
        }
    }
}

fn write_error(path: &Path, source: std::io::Error) -> RenderError {
    RenderError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile, RenderError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    file.write_all(contents).map_err(|e| write_error(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| write_error(path, e))?;
    Ok(file)
}

fn remove_stale(path: &Path) -> Result<(), RenderError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed export from previous run");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(write_error(path, e)),
    }
}

/// Write the document and, when present, the export.
///
/// Returns the paths that were written.
pub fn write_outputs(
    rendered: &Rendered,
    destinations: &Destinations,
) -> Result<Vec<PathBuf>, RenderError> {
    let document = stage(&destinations.document, rendered.document.as_bytes())?;
    let export = match &rendered.export {
        Some(bytes) => Some(stage(&destinations.export, bytes)?),
        None => None,
    };

    document
        .persist(&destinations.document)
        .map_err(|e| write_error(&destinations.document, e.error))?;
    let mut written = vec![destinations.document.clone()];

    match export {
        Some(export) => {
            if let Err(e) = export.persist(&destinations.export) {
                if let Err(cleanup) = std::fs::remove_file(&destinations.document) {
                    warn!(
                        path = %destinations.document.display(),
                        error = %cleanup,
                        "could not remove partial output"
                    );
                }
                return Err(write_error(&destinations.export, e.error));
            }
            written.push(destinations.export.clone());
        }
        None => remove_stale(&destinations.export)?,
    }

    debug!(files = written.len(), "outputs written");
    Ok(written)
}
