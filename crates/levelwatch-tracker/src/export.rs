//! Export document file I/O.

use levelwatch_core::{ExportDocument, Result};
use std::path::Path;
use tracing::debug;

/// Serialize `document` as JSON and write it to `path`, truncating any
/// existing file. No temp file, no retry: a failed write surfaces as `Error::Io`.
pub fn write_document(document: &ExportDocument, path: &Path, pretty: bool) -> Result<()> {
    let json = document.to_json(pretty)?;
    debug!("Writing {} bytes to {}", json.len(), path.display());
    std::fs::write(path, json)?;
    Ok(())
}

/// Parse an export document previously written by `write_document`.
pub fn read_document(path: &Path) -> Result<ExportDocument> {
    let content = std::fs::read_to_string(path)?;
    ExportDocument::from_json(&content)
}
