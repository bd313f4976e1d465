//! Reusable UI components

use crate::theme;
use eframe::egui;
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_millis(2200);

/// Sold badge text
pub fn format_sold(sold: &str) -> String {
    format!("{} sold", sold)
}

/// UV rect that crops a texture to fill `target` without stretching
pub fn cover_uv(texture_size: [usize; 2], target: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if texture_size[0] == 0 || texture_size[1] == 0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }

    let tex_aspect = texture_size[0] as f32 / texture_size[1] as f32;
    let target_aspect = target.x / target.y;

    if tex_aspect > target_aspect {
        // Wider than the slot: crop left and right
        let w = target_aspect / tex_aspect;
        let x0 = (1.0 - w) / 2.0;
        egui::Rect::from_min_max(egui::pos2(x0, 0.0), egui::pos2(x0 + w, 1.0))
    } else {
        let h = tex_aspect / target_aspect;
        let y0 = (1.0 - h) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, y0), egui::pos2(1.0, y0 + h))
    }
}

/// Centered panel with an icon and a message, used for loading/empty/error states
pub fn message_panel(
    ui: &mut egui::Ui,
    icon: &str,
    message: &str,
    color: egui::Color32,
    add_actions: impl FnOnce(&mut egui::Ui),
) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() * 0.25).max(theme::SPACING_XL));
        theme::message_frame().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(icon).size(36.0).color(color));
                ui.add_space(theme::SPACING_MD);
                ui.label(
                    egui::RichText::new(message)
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(theme::SPACING_LG);
                add_actions(ui);
            });
        });
    });
}

/// Bottom-centered toast that fades out
pub fn render_toast(
    ctx: &egui::Context,
    message: &mut Option<String>,
    start: &mut Option<Instant>,
) {
    let Some(started) = *start else {
        return;
    };

    let elapsed = started.elapsed();
    if elapsed >= TOAST_DURATION || message.is_none() {
        *message = None;
        *start = None;
        return;
    }
    let Some(text) = message.as_deref() else {
        return;
    };

    let remaining = (TOAST_DURATION - elapsed).as_secs_f32();
    let alpha = remaining.min(0.3) / 0.3;

    egui::Area::new(egui::Id::new("toast"))
        .order(egui::Order::Tooltip)
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_opacity(alpha);
            egui::Frame::new()
                .fill(theme::BG_SURFACE)
                .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT))
                .corner_radius(theme::RADIUS_LARGE)
                .inner_margin(egui::Margin::symmetric(14, 8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_PRIMARY),
                    );
                });
        });
    ctx.request_repaint();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_uv_square_is_full() {
        let uv = cover_uv([100, 100], egui::vec2(50.0, 50.0));
        assert_eq!(uv, egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)));
    }

    #[test]
    fn test_cover_uv_crops_wide_image_horizontally() {
        let uv = cover_uv([200, 100], egui::vec2(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn test_cover_uv_crops_tall_image_vertically() {
        let uv = cover_uv([100, 400], egui::vec2(100.0, 100.0));
        assert_eq!(uv.min.x, 0.0);
        assert!((uv.min.y - 0.375).abs() < 1e-6);
        assert!((uv.max.y - 0.625).abs() < 1e-6);
    }

    #[test]
    fn test_format_sold() {
        assert_eq!(format_sold("120"), "120 sold");
    }
}
