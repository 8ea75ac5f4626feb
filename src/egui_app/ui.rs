//! egui renderer for the application UI.

mod auth_prompt;
mod charts;
mod chrome;
mod dashboard_page;
mod helpers;
mod history_page;
mod overlay_layers;
pub mod style;
mod upload_page;
mod visualizations_page;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthState;
use crate::config::AppSettings;
use crate::credentials::{CredentialStore, KeyringCredentialStore};
use crate::download::DialogDestination;
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::Route;
use eframe::egui;

/// Minimum window size that keeps tables and charts legible.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(900.0, 600.0);

/// Repaint cadence while a worker thread is outstanding.
const JOB_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Wire the OS credential store and native save dialog into a controller.
    pub fn new(settings: &AppSettings) -> Result<Self, String> {
        let store = KeyringCredentialStore::new()
            .map_err(|err| format!("Failed to open credential store: {err}"))?;
        let credentials: Arc<dyn CredentialStore> = Arc::new(store);
        let controller =
            EguiController::new(settings, credentials, Box::new(DialogDestination))
                .map_err(|err| format!("Invalid settings: {err}"))?;
        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.controller.handle_dropped_files(dropped);
        }
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(palette.bg_secondary)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                if !matches!(self.controller.auth_state(), AuthState::Authenticated) {
                    self.render_locked_placeholder(ui);
                    return;
                }
                match self.controller.ui.route {
                    Route::Upload => self.render_upload_page(ui),
                    Route::Dashboard => self.render_dashboard_page(ui),
                    Route::History => self.render_history_page(ui),
                    Route::Visualizations => self.render_visualizations_page(ui),
                }
            });
    }

    fn render_locked_placeholder(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            if self.controller.is_validating() {
                ui.spinner();
                ui.label(egui::RichText::new("Validating credentials…").color(palette.text_muted));
            } else {
                ui.label(egui::RichText::new("Sign in to continue").color(palette.text_muted));
                if !self.controller.ui.auth_prompt.open && ui.button("Sign in").clicked() {
                    self.controller.ensure_authenticated();
                }
            }
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        if let AuthState::Failed(message) = self.controller.auth_state().clone() {
            self.render_failure(ctx, &message);
            return;
        }
        self.handle_dropped_files(ctx);
        self.render_top_bar(ctx);
        self.render_status(ctx);
        self.render_central(ctx);
        self.render_auth_prompt(ctx);
        if self.controller.has_pending_jobs() {
            ctx.request_repaint_after(JOB_POLL_INTERVAL);
        }
    }
}
