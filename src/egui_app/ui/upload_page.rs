use super::helpers;
use super::style;
use super::*;
use eframe::egui::RichText;

impl EguiApp {
    pub(super) fn render_upload_page(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        helpers::page_heading(ui, "Upload CSV");
        let uploading = self.controller.is_uploading();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!uploading, egui::Button::new("Choose file…"))
                .clicked()
            {
                self.controller.pick_upload_file();
            }
            let selected = self
                .controller
                .ui
                .upload
                .file
                .as_ref()
                .map(|path| path.display().to_string());
            match selected {
                Some(path) => ui.label(RichText::new(path).color(palette.text_primary)),
                None => ui.label(
                    RichText::new("No file chosen. Drop a .csv here or pick one.")
                        .color(palette.text_muted),
                ),
            };
        });
        ui.add_space(6.0);
        if helpers::busy_button(ui, "Upload", uploading) {
            self.controller.submit_upload();
        }

        if let Some(message) = &self.controller.ui.upload.message {
            ui.add_space(8.0);
            helpers::inline_message(ui, message);
        }
        if let Some(response) = &self.controller.ui.upload.response {
            ui.add_space(8.0);
            ui.label(RichText::new("Response").strong().color(palette.text_primary));
            egui::ScrollArea::vertical()
                .id_salt("upload_response_scroll")
                .max_height(ui.available_height())
                .show(ui, |ui| helpers::json_block(ui, response));
        }
    }
}
