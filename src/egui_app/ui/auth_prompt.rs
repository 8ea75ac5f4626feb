use super::overlay_layers;
use super::style;
use super::*;
use eframe::egui::{Align2, RichText};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PromptAction {
    None,
    Submit,
    Cancel,
}

impl EguiApp {
    /// Render the modal sign-in prompt while the gate asks for credentials.
    pub(super) fn render_auth_prompt(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.auth_prompt.open {
            return;
        }

        overlay_layers::modal_backdrop(
            ctx,
            egui::Id::new("auth_prompt"),
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 160),
        );

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.cancel_credentials_prompt();
            return;
        }

        let mut open = true;
        let mut action = PromptAction::None;
        egui::Window::new("Sign in")
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(overlay_layers::modal_order())
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .open(&mut open)
            .show(ctx, |ui| {
                action = self.render_auth_prompt_body(ui);
            });

        if !open {
            action = PromptAction::Cancel;
        }
        match action {
            PromptAction::None => {}
            PromptAction::Submit => self.controller.submit_credentials(),
            PromptAction::Cancel => self.controller.cancel_credentials_prompt(),
        }
    }

    fn render_auth_prompt_body(&mut self, ui: &mut egui::Ui) -> PromptAction {
        let palette = style::palette();
        ui.set_min_width(360.0);
        ui.label(
            RichText::new("Enter your dashboard credentials.").color(palette.text_primary),
        );
        if let Some(notice) = self.controller.auth_notice() {
            ui.add_space(4.0);
            ui.label(RichText::new(notice).color(palette.warning));
        }
        ui.add_space(8.0);

        let mut enter_pressed = false;
        let state = &mut self.controller.ui.auth_prompt;
        egui::Grid::new("auth_prompt_fields")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Username");
                let username = ui.add(
                    egui::TextEdit::singleline(&mut state.username)
                        .hint_text("username")
                        .desired_width(240.0),
                );
                if state.focus_username_requested && !username.has_focus() {
                    username.request_focus();
                    state.focus_username_requested = false;
                }
                ui.end_row();

                ui.label("Password");
                let password = ui.add(
                    egui::TextEdit::singleline(&mut state.password)
                        .password(true)
                        .hint_text("password")
                        .desired_width(240.0),
                );
                enter_pressed = (username.lost_focus() || password.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.end_row();
            });

        ui.add_space(10.0);
        let mut action = if enter_pressed {
            PromptAction::Submit
        } else {
            PromptAction::None
        };
        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                action = PromptAction::Cancel;
            }
            if ui.button("Sign in").clicked() {
                action = PromptAction::Submit;
            }
        });
        action
    }
}
