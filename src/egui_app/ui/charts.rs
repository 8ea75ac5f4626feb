//! Pie and bar charts painted directly with the egui painter.

use std::f32::consts::{FRAC_PI_2, TAU};

use super::style;
use crate::egui_app::view_model::{BarChart, PieSlice};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};

/// Arc segments for a full circle; wedges get a proportional share.
const FULL_CIRCLE_SEGMENTS: usize = 96;
/// Slices thinner than this share skip their percentage label.
const MIN_LABELLED_FRACTION: f32 = 0.04;
const AXIS_TICKS: usize = 4;

pub(super) fn paint_pie(ui: &mut Ui, slices: &[PieSlice], size: Vec2) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;
        let mut start = -FRAC_PI_2;
        for slice in slices {
            let sweep = slice.fraction * TAU;
            if sweep <= 0.0 {
                continue;
            }
            painter.add(egui::Shape::mesh(wedge_mesh(
                center,
                radius,
                start,
                sweep,
                slice.color,
            )));
            if slice.fraction >= MIN_LABELLED_FRACTION {
                let label_pos = polar(center, radius * 0.65, start + sweep / 2.0);
                painter.text(
                    label_pos,
                    Align2::CENTER_CENTER,
                    slice.percent_label(),
                    FontId::proportional(12.0),
                    Color32::BLACK,
                );
            }
            start += sweep;
        }
        painter.circle_stroke(center, radius, style::chart_gridline());

        ui.vertical(|ui| {
            for slice in slices {
                ui.horizontal(|ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 0.0, slice.color);
                    ui.label(
                        egui::RichText::new(format!("{} ({})", slice.label, slice.count))
                            .color(palette.text_primary),
                    );
                });
            }
        });
    });
}

pub(super) fn paint_bar_chart(ui: &mut Ui, chart: &BarChart, size: Vec2) {
    let palette = style::palette();
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let outer = response.rect;
    painter.text(
        egui::pos2(outer.center().x, outer.top() + 2.0),
        Align2::CENTER_TOP,
        chart.title,
        FontId::proportional(14.0),
        palette.text_primary,
    );
    let plot = plot_area(outer);
    let axis_max = chart.axis_max();

    for tick in 0..=AXIS_TICKS {
        let value = axis_max * tick as f64 / AXIS_TICKS as f64;
        let y = value_to_y(plot, value, axis_max);
        let stroke = if tick == 0 {
            style::chart_axis()
        } else {
            style::chart_gridline()
        };
        painter.line_segment([egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)], stroke);
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format_tick(value),
            FontId::proportional(11.0),
            palette.text_muted,
        );
    }
    painter.line_segment(
        [plot.left_top(), plot.left_bottom()],
        style::chart_axis(),
    );

    for (index, bar) in chart.bars.iter().enumerate() {
        let slot = slot_rect(plot, index, chart.bars.len());
        if let Some(value) = bar.value {
            let rect = bar_rect(slot, plot, value, axis_max);
            painter.rect_filled(rect, 0.0, chart.color);
            painter.text(
                egui::pos2(rect.center().x, rect.top() - 2.0),
                Align2::CENTER_BOTTOM,
                &bar.value_label,
                FontId::proportional(11.0),
                palette.text_primary,
            );
        } else {
            painter.text(
                egui::pos2(slot.center().x, plot.bottom() - 2.0),
                Align2::CENTER_BOTTOM,
                &bar.value_label,
                FontId::proportional(11.0),
                palette.text_muted,
            );
        }
        painter.text(
            egui::pos2(slot.center().x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            bar.label,
            FontId::proportional(12.0),
            palette.text_primary,
        );
    }
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * radius
}

/// Triangle fan covering `sweep` radians clockwise from `start`.
fn wedge_mesh(
    center: Pos2,
    radius: f32,
    start: f32,
    sweep: f32,
    color: Color32,
) -> egui::epaint::Mesh {
    let segments = ((sweep / TAU) * FULL_CIRCLE_SEGMENTS as f32).ceil().max(2.0) as usize;
    let mut mesh = egui::epaint::Mesh::default();
    mesh.colored_vertex(center, color);
    for step in 0..=segments {
        let angle = start + sweep * step as f32 / segments as f32;
        mesh.colored_vertex(polar(center, radius, angle), color);
    }
    for step in 0..segments as u32 {
        mesh.add_triangle(0, step + 1, step + 2);
    }
    mesh
}

/// Leave room for the title, tick labels and bar labels.
fn plot_area(outer: Rect) -> Rect {
    Rect::from_min_max(
        egui::pos2(outer.left() + 48.0, outer.top() + 24.0),
        egui::pos2(outer.right() - 8.0, outer.bottom() - 22.0),
    )
}

fn value_to_y(plot: Rect, value: f64, axis_max: f64) -> f32 {
    let ratio = if axis_max > 0.0 {
        (value / axis_max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    plot.bottom() - plot.height() * ratio as f32
}

fn slot_rect(plot: Rect, index: usize, count: usize) -> Rect {
    let width = plot.width() / count.max(1) as f32;
    let left = plot.left() + width * index as f32;
    Rect::from_min_max(
        egui::pos2(left, plot.top()),
        egui::pos2(left + width, plot.bottom()),
    )
}

/// Bars fill 60% of their slot and grow up from the baseline.
fn bar_rect(slot: Rect, plot: Rect, value: f64, axis_max: f64) -> Rect {
    let half_width = slot.width() * 0.3;
    Rect::from_min_max(
        egui::pos2(slot.center().x - half_width, value_to_y(plot, value, axis_max)),
        egui::pos2(slot.center().x + half_width, plot.bottom()),
    )
}

fn format_tick(value: f64) -> String {
    if value >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
