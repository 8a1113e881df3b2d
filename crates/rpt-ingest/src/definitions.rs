//! Report definitions document loading.

use std::path::Path;

use rpt_model::ReportCatalog;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Parses the YAML catalog of report definitions, keeping document order.
///
/// An empty document (or one holding only comments) yields an empty catalog.
pub fn load_definitions(path: &Path) -> Result<ReportCatalog> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::DefinitionsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let catalog = parse_definitions(&text).map_err(|message| IngestError::DefinitionsParse {
        path: path.to_path_buf(),
        message,
    })?;
    debug!(path = %path.display(), reports = catalog.len(), "loaded report definitions");
    Ok(catalog)
}

/// Parses a definitions document. Errors carry the YAML location.
pub fn parse_definitions(text: &str) -> std::result::Result<ReportCatalog, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    if value.is_null() {
        return Ok(ReportCatalog::new());
    }
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}
