//! Burger button and the category overlay it opens

use super::App;
use crate::theme;
use crate::types::*;
use eframe::egui;

impl App {
    /// Burger toggle for the header. Shows an X while the overlay is open.
    pub(crate) fn render_burger_button(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(34.0, 34.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        let base = if self.overlay_open {
            theme::BG_SURFACE
        } else {
            theme::BG_ELEVATED
        };
        let (fill, draw_rect) = theme::button_visual(&response, base, rect);
        ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);

        let icon = if self.overlay_open {
            egui_phosphor::regular::X
        } else {
            egui_phosphor::regular::LIST
        };
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(20.0),
            if self.overlay_open { theme::ACCENT } else { theme::TEXT_PRIMARY },
        );

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.on_hover_text("Categories").clicked() {
            self.overlay_open = !self.overlay_open;
        }
    }

    /// Category overlay below the header. Clicking the backdrop closes it.
    pub(crate) fn render_category_overlay(&mut self, ctx: &egui::Context) {
        if !self.overlay_open {
            return;
        }

        let screen = ctx.screen_rect();
        let top = self.header_bottom;
        let backdrop_rect =
            egui::Rect::from_min_max(egui::pos2(screen.min.x, top), screen.max);

        // Backdrop sits between the grid and the panel
        let backdrop = egui::Area::new(egui::Id::new("category_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(backdrop_rect.min)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(backdrop_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(rect, 0.0, theme::BACKDROP);
                response
            });
        if backdrop.inner.clicked() {
            self.overlay_open = false;
            return;
        }

        let mut selected: Option<CategoryFilter> = None;
        let filters: Vec<CategoryFilter> = std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect();

        egui::Area::new(egui::Id::new("category_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(backdrop_rect.min)
            .show(ctx, |ui| {
                theme::overlay_frame().show(ui, |ui| {
                    ui.set_width(theme::OVERLAY_WIDTH);
                    ui.set_min_height(backdrop_rect.height() - theme::SPACING_XL * 2.0);
                    ui.label(
                        egui::RichText::new("CATEGORIES")
                            .size(theme::FONT_CAPTION)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(theme::SPACING_SM);

                    for filter in filters {
                        let active = self.active_filter == filter;
                        let count = self.category_count(filter);
                        if category_row(ui, filter, count, active) {
                            selected = Some(filter);
                        }
                    }
                });
            });

        if let Some(filter) = selected {
            self.select_category(filter);
        }
    }
}

/// One row in the overlay. Returns true if clicked.
fn category_row(ui: &mut egui::Ui, filter: CategoryFilter, count: usize, active: bool) -> bool {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), theme::OVERLAY_ROW_HEIGHT),
        egui::Sense::click(),
    );
    let painter = ui.painter();

    if active {
        painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER);
        painter.rect_filled(
            egui::Rect::from_min_size(rect.min, egui::vec2(3.0, rect.height())),
            0.0,
            theme::ACCENT,
        );
    } else if response.hovered() {
        painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_ELEVATED);
    }
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    let dot_color = match filter {
        CategoryFilter::All => theme::ACCENT,
        CategoryFilter::Only(c) => theme::category_color(c),
    };
    painter.circle_filled(rect.left_center() + egui::vec2(16.0, 0.0), 4.0, dot_color);

    painter.text(
        rect.left_center() + egui::vec2(30.0, 0.0),
        egui::Align2::LEFT_CENTER,
        filter.label(),
        egui::FontId::proportional(theme::FONT_HEADING),
        if active { theme::ACCENT } else { theme::TEXT_SECONDARY },
    );
    painter.text(
        rect.right_center() - egui::vec2(12.0, 0.0),
        egui::Align2::RIGHT_CENTER,
        count.to_string(),
        egui::FontId::proportional(theme::FONT_LABEL),
        theme::TEXT_DIM,
    );

    response.clicked()
}
