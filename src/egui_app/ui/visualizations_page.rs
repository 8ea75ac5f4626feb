use super::charts;
use super::helpers;
use super::*;
use crate::egui_app::view_model::{self, GENERATE_VISUALIZATIONS_BUTTON};

const PIE_SIZE: egui::Vec2 = egui::vec2(320.0, 320.0);

impl EguiApp {
    pub(super) fn render_visualizations_page(&mut self, ui: &mut egui::Ui) {
        helpers::page_heading(ui, "Visualizations");
        if helpers::busy_button(
            ui,
            GENERATE_VISUALIZATIONS_BUTTON,
            self.controller.is_visualizations_loading(),
        ) {
            self.controller.fetch_visualizations();
        }
        ui.add_space(8.0);

        if let Some(error) = &self.controller.ui.visualizations.error {
            helpers::error_text(ui, error);
            ui.add_space(8.0);
        }
        let Some(view) = &self.controller.ui.visualizations.view else {
            helpers::muted_text(ui, &view_model::load_hint(GENERATE_VISUALIZATIONS_BUTTON));
            return;
        };

        egui::ScrollArea::vertical()
            .id_salt("visualizations_scroll")
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Equipment Type Distribution").strong());
                ui.add_space(4.0);
                if view_model::pie_is_drawable(&view.slices) {
                    charts::paint_pie(ui, &view.slices, PIE_SIZE);
                } else {
                    helpers::muted_text(ui, "No equipment types to display (Upload data first)");
                }
                ui.add_space(16.0);
                let width = ui.available_width().min(640.0);
                charts::paint_bar_chart(ui, &view.chart, egui::vec2(width, 280.0));
            });
    }
}
