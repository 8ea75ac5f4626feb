//! Bridges the credential gate, the backend client and the egui renderer.
//!
//! Every backend call runs on a worker thread started through [`jobs`]; results
//! come back as [`jobs::JobMessage`]s drained by `poll_background_jobs` once per
//! frame, so the UI thread never waits on the network.

mod auth_flow;
mod background_jobs;
mod jobs;
mod pages;
mod upload;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthGate, AuthState};
use crate::config::{AppSettings, ConfigError};
use crate::credentials::CredentialStore;
use crate::download::SaveDestination;
use crate::egui_app::state::*;
pub use crate::egui_app::ui::style::StatusTone;

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    api: ApiClient,
    gate: AuthGate,
    jobs: jobs::ControllerJobs,
    save_destination: Box<dyn SaveDestination>,
}

impl EguiController {
    /// Build the controller and kick off the credential gate.
    pub fn new(
        settings: &AppSettings,
        credentials: Arc<dyn CredentialStore>,
        save_destination: Box<dyn SaveDestination>,
    ) -> Result<Self, ConfigError> {
        let api = ApiClient::new(&settings.api, credentials.clone())?;
        tracing::info!("Using backend at {}", api.base_url());
        let mut controller = Self {
            ui: UiState::default(),
            api,
            gate: AuthGate::new(credentials, settings.auth.max_attempts),
            jobs: jobs::ControllerJobs::new(),
            save_destination,
        };
        let step = controller.gate.start();
        controller.apply_gate_step(step);
        Ok(controller)
    }

    pub fn auth_state(&self) -> &AuthState {
        self.gate.state()
    }

    /// Inline notice for the sign-in modal.
    pub fn auth_notice(&self) -> Option<&str> {
        self.gate.notice()
    }

    pub fn signed_in_user(&self) -> Option<&str> {
        self.gate.signed_in_user()
    }

    /// True while any worker thread still owes a result.
    pub fn has_pending_jobs(&self) -> bool {
        self.jobs.any_in_progress()
    }

    pub fn is_validating(&self) -> bool {
        self.jobs.probe_in_progress()
    }

    pub fn is_uploading(&self) -> bool {
        self.jobs.upload_in_progress()
    }

    pub fn is_dashboard_loading(&self) -> bool {
        self.jobs.summary_in_progress(jobs::SummaryTarget::Dashboard)
    }

    pub fn is_pdf_downloading(&self) -> bool {
        self.jobs.pdf_in_progress()
    }

    pub fn is_history_loading(&self) -> bool {
        self.jobs.history_in_progress()
    }

    pub fn is_visualizations_loading(&self) -> bool {
        self.jobs.summary_in_progress(jobs::SummaryTarget::Visualizations)
    }

    /// Switch pages. Ignored until the gate has passed.
    pub fn navigate(&mut self, route: Route) {
        if !self.ensure_authenticated() {
            return;
        }
        if self.ui.route != route {
            tracing::debug!("Navigating to {}", route.label());
            self.ui.route = route;
        }
    }

    /// Reveal the log folder in the OS file browser.
    pub fn open_logs_folder(&mut self) {
        let dir = match crate::logging::log_folder() {
            Ok(dir) => dir,
            Err(err) => {
                self.set_status(format!("Logs folder unavailable: {err}"), StatusTone::Error);
                return;
            }
        };
        if let Err(err) = open::that(&dir) {
            self.set_status(
                format!("Could not open {}: {err}", dir.display()),
                StatusTone::Warning,
            );
        }
    }

    /// Open a previously saved file with the system viewer.
    pub fn open_saved_report(&mut self) {
        let Some(path) = self.ui.dashboard.last_saved_report.clone() else {
            return;
        };
        if let Err(err) = open::that(&path) {
            self.set_status(
                format!("Could not open {}: {err}", path.display()),
                StatusTone::Warning,
            );
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text.into(), tone);
    }
}
