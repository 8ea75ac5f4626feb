use eframe::egui::{self, Color32, Id, LayerId, Order};

/// Backdrop sits above the panels but below the modal window itself.
const BACKDROP_ORDER: Order = Order::Middle;
const MODAL_ORDER: Order = Order::Foreground;

pub(super) fn modal_order() -> Order {
    MODAL_ORDER
}

/// Paint a modal backdrop and swallow pointer input behind the modal.
pub(super) fn modal_backdrop(ctx: &egui::Context, id: impl Into<Id>, color: Color32) {
    let id = id.into();
    let rect = ctx.viewport_rect();
    let painter = ctx.layer_painter(LayerId::new(BACKDROP_ORDER, id.with("backdrop_paint")));
    painter.rect_filled(rect, 0.0, color);
    egui::Area::new(id.with("backdrop_blocker"))
        .order(BACKDROP_ORDER)
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            ui.allocate_rect(rect, egui::Sense::click_and_drag());
        });
}
