use super::style;
use crate::egui_app::state::InlineMessage;
use eframe::egui::{self, RichText, Ui};

pub(super) fn page_heading(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).color(style::palette().text_primary));
    ui.add_space(8.0);
}

pub(super) fn inline_message(ui: &mut Ui, message: &InlineMessage) {
    ui.label(RichText::new(&message.text).color(style::message_text(message.is_error)));
}

pub(super) fn error_text(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(style::message_text(true)));
}

pub(super) fn muted_text(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(style::palette().text_muted));
}

/// Button that shows a spinner and stays disabled while its request is out.
pub(super) fn busy_button(ui: &mut Ui, label: &str, busy: bool) -> bool {
    ui.horizontal(|ui| {
        let clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
        if busy {
            ui.spinner();
        }
        clicked
    })
    .inner
}

/// Monospace block for pretty-printed JSON.
pub(super) fn json_block(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).monospace().color(style::palette().text_primary));
}
