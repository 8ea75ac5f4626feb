use super::helpers;
use super::style;
use super::*;
use crate::egui_app::view_model::{self, FETCH_HISTORY_BUTTON, HISTORY_COLUMNS};
use eframe::egui::RichText;

/// Index of the pretty-printed distribution column.
const DISTRIBUTION_COLUMN: usize = HISTORY_COLUMNS.len() - 1;

impl EguiApp {
    pub(super) fn render_history_page(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        helpers::page_heading(ui, "Upload History");
        if helpers::busy_button(ui, FETCH_HISTORY_BUTTON, self.controller.is_history_loading()) {
            self.controller.fetch_history();
        }
        ui.add_space(8.0);

        if let Some(error) = &self.controller.ui.history.error {
            helpers::error_text(ui, error);
            ui.add_space(8.0);
        }
        let Some(rows) = &self.controller.ui.history.rows else {
            helpers::muted_text(ui, &view_model::load_hint(FETCH_HISTORY_BUTTON));
            return;
        };
        if rows.is_empty() {
            helpers::muted_text(ui, "No history available");
            return;
        }

        egui::ScrollArea::both()
            .id_salt("history_scroll")
            .show(ui, |ui| {
                egui::Grid::new("history_table")
                    .num_columns(HISTORY_COLUMNS.len())
                    .striped(true)
                    .spacing([18.0, 6.0])
                    .show(ui, |ui| {
                        for header in HISTORY_COLUMNS {
                            ui.label(RichText::new(header).strong().color(palette.text_primary));
                        }
                        ui.end_row();
                        for row in rows {
                            for (column, cell) in row.cells().into_iter().enumerate() {
                                if column == DISTRIBUTION_COLUMN {
                                    helpers::json_block(ui, cell);
                                } else {
                                    ui.label(RichText::new(cell).color(palette.text_primary));
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
