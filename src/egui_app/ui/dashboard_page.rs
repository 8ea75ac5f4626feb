use super::charts;
use super::helpers;
use super::style;
use super::*;
use crate::egui_app::view_model::{self, CellValue, FETCH_SUMMARY_BUTTON};
use eframe::egui::RichText;

impl EguiApp {
    pub(super) fn render_dashboard_page(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        helpers::page_heading(ui, "Dashboard");
        let loading = self.controller.is_dashboard_loading();
        let downloading = self.controller.is_pdf_downloading();

        let (fetch, download) = ui
            .horizontal(|ui| {
                let fetch = helpers::busy_button(ui, FETCH_SUMMARY_BUTTON, loading);
                ui.add_space(8.0);
                let download = helpers::busy_button(ui, "Download PDF", downloading);
                (fetch, download)
            })
            .inner;
        if fetch {
            self.controller.fetch_summary();
        }
        if download {
            self.controller.download_pdf();
        }

        let mut open_report = false;
        if let Some(error) = &self.controller.ui.dashboard.pdf_error {
            helpers::error_text(ui, error);
        } else if let Some(path) = &self.controller.ui.dashboard.last_saved_report {
            ui.horizontal(|ui| {
                helpers::muted_text(ui, &format!("Report saved to {}", path.display()));
                open_report = ui.link("Open").clicked();
            });
        }
        if open_report {
            self.controller.open_saved_report();
        }
        ui.add_space(8.0);

        if let Some(error) = &self.controller.ui.dashboard.error {
            helpers::error_text(ui, error);
            ui.add_space(8.0);
        }
        let Some(view) = &self.controller.ui.dashboard.view else {
            helpers::muted_text(ui, &view_model::load_hint(FETCH_SUMMARY_BUTTON));
            return;
        };

        egui::ScrollArea::vertical()
            .id_salt("dashboard_scroll")
            .show(ui, |ui| {
                egui::Grid::new("dashboard_summary_table")
                    .num_columns(2)
                    .striped(true)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Metric").strong().color(palette.text_primary));
                        ui.label(RichText::new("Value").strong().color(palette.text_primary));
                        ui.end_row();
                        for row in &view.rows {
                            ui.label(RichText::new(row.metric).color(palette.text_primary));
                            match &row.value {
                                CellValue::Text(text) => {
                                    ui.label(RichText::new(text).color(palette.text_primary));
                                }
                                CellValue::Json(text) => helpers::json_block(ui, text),
                            }
                            ui.end_row();
                        }
                    });
                ui.add_space(16.0);
                let width = ui.available_width().min(640.0);
                charts::paint_bar_chart(ui, &view.chart, egui::vec2(width, 280.0));
            });
    }
}
