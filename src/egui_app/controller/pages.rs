use super::jobs::SummaryTarget;
use super::*;
use crate::api::{ApiError, HistoryEntry, Summary};
use crate::download::{self, REPORT_FILE_NAME, SaveError};
use crate::egui_app::view_model;

impl EguiController {
    /// Dashboard "Fetch Summary".
    pub fn fetch_summary(&mut self) {
        self.request_summary(SummaryTarget::Dashboard);
    }

    /// Visualizations "Generate Visualizations".
    pub fn fetch_visualizations(&mut self) {
        self.request_summary(SummaryTarget::Visualizations);
    }

    pub fn fetch_history(&mut self) {
        if !self.ensure_authenticated() || self.jobs.history_in_progress() {
            return;
        }
        self.ui.history.error = None;
        self.set_status("Loading history…", StatusTone::Busy);
        self.jobs.begin_history(&self.api);
    }

    /// Fetch the PDF report and offer it as `report.pdf`.
    pub fn download_pdf(&mut self) {
        if !self.ensure_authenticated() || self.jobs.pdf_in_progress() {
            return;
        }
        self.ui.dashboard.pdf_error = None;
        self.set_status("Generating PDF report…", StatusTone::Busy);
        self.jobs.begin_pdf(&self.api);
    }

    fn request_summary(&mut self, target: SummaryTarget) {
        if !self.ensure_authenticated() || self.jobs.summary_in_progress(target) {
            return;
        }
        match target {
            SummaryTarget::Dashboard => self.ui.dashboard.error = None,
            SummaryTarget::Visualizations => self.ui.visualizations.error = None,
        }
        self.set_status("Loading summary…", StatusTone::Busy);
        self.jobs.begin_summary(&self.api, target);
    }

    pub(super) fn apply_summary_result(
        &mut self,
        target: SummaryTarget,
        result: Result<Summary, ApiError>,
    ) {
        let summary = match result {
            Ok(summary) => summary,
            Err(err) => {
                let message = err.user_message();
                match target {
                    SummaryTarget::Dashboard => {
                        self.ui.dashboard.error = Some(format!("Failed to fetch summary: {message}"))
                    }
                    SummaryTarget::Visualizations => {
                        self.ui.visualizations.error = Some(format!("Failed to fetch data: {message}"))
                    }
                }
                self.report_request_failure("Summary request failed", &err);
                return;
            }
        };
        match target {
            SummaryTarget::Dashboard => {
                self.ui.dashboard.view = Some(DashboardView {
                    rows: view_model::summary_rows(&summary),
                    chart: view_model::dashboard_averages_chart(&summary),
                });
            }
            SummaryTarget::Visualizations => {
                self.ui.visualizations.view = Some(VisualizationView {
                    slices: view_model::pie_slices(&summary.type_distribution),
                    chart: view_model::visualization_averages_chart(&summary),
                });
            }
        }
        self.set_status(
            format!("Summary loaded ({} items)", summary.total_count),
            StatusTone::Info,
        );
    }

    pub(super) fn apply_history_result(&mut self, result: Result<Vec<HistoryEntry>, ApiError>) {
        match result {
            Ok(entries) => {
                let count = entries.len();
                self.ui.history.rows = Some(view_model::history_rows(&entries));
                self.set_status(format!("History loaded ({count} uploads)"), StatusTone::Info);
            }
            Err(err) => {
                self.ui.history.error =
                    Some(format!("Failed to fetch history: {}", err.user_message()));
                self.report_request_failure("History request failed", &err);
            }
        }
    }

    pub(super) fn apply_pdf_result(&mut self, result: Result<Vec<u8>, ApiError>) {
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                self.ui.dashboard.pdf_error =
                    Some(format!("Failed to download PDF: {}", err.user_message()));
                self.report_request_failure("PDF request failed", &err);
                return;
            }
        };
        match download::save_payload(self.save_destination.as_ref(), REPORT_FILE_NAME, payload) {
            Ok(path) => {
                self.set_status(format!("Saved report to {}", path.display()), StatusTone::Info);
                self.ui.dashboard.last_saved_report = Some(path);
            }
            Err(SaveError::Cancelled) => {
                self.set_status("Report download cancelled", StatusTone::Idle);
            }
            Err(err) => {
                tracing::warn!("Saving report failed: {err}");
                self.ui.dashboard.pdf_error = Some(format!("Failed to download PDF: {err}"));
                self.set_status(err.to_string(), StatusTone::Error);
            }
        }
    }

    /// Status-bar echo of an inline page error.
    pub(super) fn report_request_failure(&mut self, context: &str, err: &ApiError) {
        tracing::warn!("{context}: {err}");
        if err.is_unauthorized() {
            self.set_status(
                "The backend rejected the stored credentials; sign out to enter new ones",
                StatusTone::Warning,
            );
        } else {
            self.set_status(format!("{context}: {}", err.user_message()), StatusTone::Error);
        }
    }
}
