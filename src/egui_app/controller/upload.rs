use std::path::{Path, PathBuf};

use rfd::FileDialog;

use super::*;
use crate::api::{ApiError, UploadResult};

pub(crate) const NO_FILE_SELECTED: &str = "No file selected";
pub(crate) const UPLOAD_SUCCEEDED: &str = "Upload successful";

impl EguiController {
    /// Choose a CSV through the native picker.
    pub fn pick_upload_file(&mut self) {
        let Some(path) = FileDialog::new()
            .set_title("Select equipment CSV")
            .add_filter("CSV", &["csv"])
            .pick_file()
        else {
            return;
        };
        self.set_upload_file(path);
    }

    pub fn set_upload_file(&mut self, path: PathBuf) {
        tracing::debug!("Selected {} for upload", path.display());
        self.ui.upload.file = Some(path);
        self.ui.upload.message = None;
    }

    /// Take the first dropped `.csv` as the upload selection.
    pub fn handle_dropped_files(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() || !self.ensure_authenticated() {
            return;
        }
        match paths.into_iter().find(|path| is_csv(path)) {
            Some(path) => {
                self.ui.route = Route::Upload;
                self.set_status(
                    format!("Ready to upload {}", display_name(&path)),
                    StatusTone::Info,
                );
                self.set_upload_file(path);
            }
            None => self.set_status("Only .csv files can be uploaded", StatusTone::Warning),
        }
    }

    /// Send the selected file; a missing selection never reaches the network.
    pub fn submit_upload(&mut self) {
        if !self.ensure_authenticated() || self.jobs.upload_in_progress() {
            return;
        }
        let Some(file) = self.ui.upload.file.clone() else {
            self.ui.upload.message = Some(InlineMessage::error(NO_FILE_SELECTED));
            return;
        };
        self.ui.upload.message = None;
        self.ui.upload.response = None;
        self.set_status(format!("Uploading {}…", display_name(&file)), StatusTone::Busy);
        self.jobs.begin_upload(&self.api, file);
    }

    pub(super) fn apply_upload_result(
        &mut self,
        file: PathBuf,
        result: Result<UploadResult, ApiError>,
    ) {
        match result {
            Ok(result) => {
                let notice = result.message().unwrap_or(UPLOAD_SUCCEEDED).to_string();
                self.ui.upload.file = None;
                self.ui.upload.response = Some(result.to_pretty_json());
                self.ui.upload.message = Some(InlineMessage::info(notice));
                self.set_status(format!("Uploaded {}", display_name(&file)), StatusTone::Info);
            }
            Err(err) => {
                tracing::warn!("Upload of {} failed: {err}", file.display());
                self.ui.upload.message =
                    Some(InlineMessage::error(format!("Error: {}", err.user_message())));
                self.report_request_failure("Upload failed", &err);
            }
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

pub(super) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
