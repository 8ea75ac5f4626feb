use super::style;
use super::*;
use eframe::egui::{Frame, Margin, RichText, StrokeKind};

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let signed_in = matches!(self.controller.auth_state(), AuthState::Authenticated);
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::outer_border())
                    .inner_margin(Margin::symmetric(10, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Chemical Equipment Visualizer")
                            .strong()
                            .color(palette.text_primary),
                    );
                    ui.separator();
                    for route in Route::ALL {
                        let selected = self.controller.ui.route == route;
                        let response = ui.add_enabled(
                            signed_in,
                            egui::Button::selectable(selected, route.label()),
                        );
                        if response.clicked() {
                            self.controller.navigate(route);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if signed_in && ui.button("Sign out").clicked() {
                            self.controller.sign_out();
                        }
                        if let Some(user) = self.controller.signed_in_user() {
                            ui.label(RichText::new(user).color(palette.text_muted));
                        }
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::outer_border())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::chart_gridline(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    let response =
                        ui.label(RichText::new(&status.text).color(palette.text_primary));
                    if !status.log.is_empty() {
                        response.on_hover_text(status.log_text());
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Open logs").clicked() {
                            self.controller.open_logs_folder();
                        }
                    });
                });
            });
    }

    /// Terminal screen once the credential gate has given up.
    pub(super) fn render_failure(&mut self, ctx: &egui::Context, message: &str) {
        let palette = style::palette();
        egui::CentralPanel::default()
            .frame(Frame::new().fill(palette.bg_primary))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.3);
                    ui.heading(RichText::new("Cannot continue").color(palette.warning));
                    ui.add_space(8.0);
                    ui.label(RichText::new(message).color(palette.text_primary));
                    ui.add_space(16.0);
                    ui.horizontal(|ui| {
                        // Centre the two buttons under the message.
                        let width = 180.0;
                        ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
                        if ui.button("Open logs").clicked() {
                            self.controller.open_logs_folder();
                        }
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }
}
