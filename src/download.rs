//! Save a binary payload fetched from the backend as a user-chosen file.

use std::path::{Path, PathBuf};

use rfd::FileDialog;

use crate::fs_util;

/// Name offered in the save dialog for the generated report.
pub const REPORT_FILE_NAME: &str = "report.pdf";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Save cancelled")]
    Cancelled,
    #[error("Nothing to save")]
    EmptyPayload,
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a payload should land. Implemented by the native dialog and by tests.
pub trait SaveDestination: Send {
    /// Ask for a target path, `None` when the user backs out.
    fn choose(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// Native "Save as" dialog filtered to PDF files.
#[derive(Clone, Debug, Default)]
pub struct DialogDestination;

impl SaveDestination for DialogDestination {
    fn choose(&self, suggested_name: &str) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Save report")
            .set_file_name(suggested_name);
        if Path::new(suggested_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            dialog = dialog.add_filter("PDF", &["pdf"]);
        }
        dialog.save_file()
    }
}

/// Always answers with the same path. Handy for headless runs and tests.
#[derive(Clone, Debug)]
pub struct FixedDestination(pub Option<PathBuf>);

impl SaveDestination for FixedDestination {
    fn choose(&self, _suggested_name: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Ask `destination` for a path and write `payload` there atomically.
///
/// The payload is consumed so the caller drops its copy as soon as it is on disk.
pub fn save_payload(
    destination: &dyn SaveDestination,
    suggested_name: &str,
    payload: Vec<u8>,
) -> Result<PathBuf, SaveError> {
    if payload.is_empty() {
        return Err(SaveError::EmptyPayload);
    }
    let path = destination
        .choose(suggested_name)
        .ok_or(SaveError::Cancelled)?;
    fs_util::atomic_write(&path, &payload).map_err(|source| SaveError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!("Saved {} bytes to {}", payload.len(), path.display());
    Ok(path)
}
