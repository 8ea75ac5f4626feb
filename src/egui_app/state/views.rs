use std::path::PathBuf;

use crate::egui_app::view_model::{BarChart, HistoryRow, PieSlice, SummaryRow};

/// A one-line message rendered inline on a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineMessage {
    pub text: String,
    pub is_error: bool,
}

impl InlineMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadState {
    /// CSV chosen through the picker or by dropping it on the window.
    pub file: Option<PathBuf>,
    pub message: Option<InlineMessage>,
    /// Pretty-printed body of the last successful upload.
    pub response: Option<String>,
}

/// Table and chart derived from the last fetched summary.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<SummaryRow>,
    pub chart: BarChart,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    /// `None` until the first successful fetch.
    pub view: Option<DashboardView>,
    pub error: Option<String>,
    pub pdf_error: Option<String>,
    /// Where the last report was written.
    pub last_saved_report: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryState {
    /// `None` until the first successful fetch; may be empty afterwards.
    pub rows: Option<Vec<HistoryRow>>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizationView {
    pub slices: Vec<PieSlice>,
    pub chart: BarChart,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualizationState {
    pub view: Option<VisualizationView>,
    pub error: Option<String>,
}
