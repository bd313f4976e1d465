//! Product grid rendering

use super::App;
use crate::constants::{store_url, EMPTY_CATEGORY_MESSAGE, LOAD_ERROR_MESSAGE};
use crate::theme;
use crate::types::*;
use crate::ui::components::{cover_uv, format_sold, message_panel};
use eframe::egui;

impl App {
    /// Central area: loading, error, empty-category or the product cards
    pub(crate) fn render_catalog(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if let LoadState::Failed(_) = self.load_state {
            self.render_load_error(ui, ctx);
            return;
        }

        if self.products.is_empty() {
            match self.load_state {
                LoadState::Loading | LoadState::Idle => {
                    ui.vertical_centered(|ui| {
                        ui.add_space((ui.available_height() * 0.35).max(theme::SPACING_XL));
                        ui.add(egui::Spinner::new().size(32.0).color(theme::ACCENT));
                        ui.add_space(theme::SPACING_MD);
                        ui.label(
                            egui::RichText::new("Loading products…")
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_MUTED),
                        );
                    });
                    return;
                }
                _ => {}
            }
        }

        if let Some(notice) = &self.cached_notice {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::CLOUD_SLASH)
                        .color(theme::STATUS_WARNING),
                );
                ui.label(
                    egui::RichText::new(notice.as_str())
                        .size(theme::FONT_CAPTION)
                        .color(theme::STATUS_WARNING),
                );
            });
            ui.add_space(theme::SPACING_SM);
        }

        if self.filtered_indices.is_empty() {
            message_panel(
                ui,
                egui_phosphor::regular::PACKAGE,
                EMPTY_CATEGORY_MESSAGE,
                theme::TEXT_DIM,
                |_| {},
            );
            return;
        }

        self.render_grid(ui, ctx);
    }

    fn render_load_error(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let store = store_url(&self.shop_id);
        let mut retry = false;

        message_panel(
            ui,
            egui_phosphor::regular::WARNING_CIRCLE,
            LOAD_ERROR_MESSAGE,
            theme::STATUS_ERROR,
            |ui| {
                ui.hyperlink_to(
                    egui::RichText::new(format!(
                        "{}  Visit Taobao Store",
                        egui_phosphor::regular::STOREFRONT
                    ))
                    .size(theme::FONT_BODY),
                    &store,
                );
                ui.add_space(theme::SPACING_MD);
                if ui
                    .add(theme::button_accent(format!(
                        "{}  Retry",
                        egui_phosphor::regular::ARROWS_CLOCKWISE
                    )))
                    .clicked()
                {
                    retry = true;
                }
            },
        );

        if retry {
            self.start_catalog_fetch(ctx);
        }
    }

    fn render_grid(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let spacing = theme::SPACING_LG;
        let (base_w, base_img) = if self.large_cards {
            theme::CARD_LARGE
        } else {
            theme::CARD_SMALL
        };
        let available = ui.available_width() - theme::SPACING_MD;
        let num_cols = ((available + spacing) / (base_w + spacing)).floor().max(1.0);
        let card_w = ((available - spacing * (num_cols - 1.0)) / num_cols).floor();
        let img_h = (base_img * (card_w / base_w)).floor();
        let card_h = img_h + theme::CARD_INFO_HEIGHT;

        let mut scroll_area = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .id_salt("product_grid");
        if std::mem::take(&mut self.scroll_to_top) {
            scroll_area = scroll_area.vertical_scroll_offset(0.0);
        }

        let mut clicked: Option<usize> = None;
        let mut menu_action: Option<(usize, super::context_menu::ProductAction)> = None;

        scroll_area.show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = egui::vec2(spacing, spacing);
                let indices = self.filtered_indices.clone();
                for &idx in &indices {
                    // Clone product data to avoid borrow issues
                    let product = self.products[idx].clone();

                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(card_w, card_h), egui::Sense::click());

                    // Images are requested only for cards that are actually on screen
                    if ui.is_rect_visible(rect) {
                        let texture = self.load_thumbnail(ctx, &product);
                        paint_card(ui, rect, img_h, &product, texture.as_ref(), response.hovered());
                    }

                    let response = response.on_hover_text(&product.title);
                    if response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    if response.clicked_by(egui::PointerButton::Primary) {
                        clicked = Some(idx);
                    }

                    response.context_menu(|ui| {
                        if let Some(action) = self.product_context_menu(ui, &product) {
                            menu_action = Some((idx, action));
                        }
                    });
                }
            });
        });

        if let Some(idx) = clicked {
            if let Some(product) = self.products.get(idx).cloned() {
                self.open_product(&product);
            }
        }
        if let Some((idx, action)) = menu_action {
            if let Some(product) = self.products.get(idx).cloned() {
                self.run_product_action(ctx, &product, action);
            }
        }
    }
}

fn paint_card(
    ui: &egui::Ui,
    rect: egui::Rect,
    img_h: f32,
    product: &Product,
    texture: Option<&egui::TextureHandle>,
    hovered: bool,
) {
    let painter = ui.painter();
    painter.rect_filled(rect, theme::RADIUS_LARGE, theme::BG_ELEVATED);

    // Image
    let img_rect = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), img_h));
    match texture {
        Some(tex) => {
            let uv = cover_uv(tex.size(), img_rect.size());
            let brush = egui::epaint::Brush {
                fill_texture_id: tex.id(),
                uv,
            };
            let mut shape = egui::epaint::RectShape::filled(
                img_rect,
                egui::CornerRadius {
                    nw: theme::RADIUS_LARGE as u8,
                    ne: theme::RADIUS_LARGE as u8,
                    sw: 0,
                    se: 0,
                },
                egui::Color32::WHITE,
            );
            shape.brush = Some(std::sync::Arc::new(brush));
            painter.add(shape);
        }
        None => {
            painter.rect_filled(
                img_rect,
                egui::CornerRadius {
                    nw: theme::RADIUS_LARGE as u8,
                    ne: theme::RADIUS_LARGE as u8,
                    sw: 0,
                    se: 0,
                },
                theme::BG_SURFACE,
            );
            painter.text(
                img_rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::IMAGE,
                egui::FontId::proportional(28.0),
                theme::TEXT_DIM,
            );
        }
    }

    if hovered {
        painter.rect_filled(
            rect,
            theme::RADIUS_LARGE,
            egui::Color32::from_rgba_unmultiplied(0xfb, 0x92, 0x3c, 18),
        );
    }

    let border_color = if hovered {
        theme::ACCENT_MUTED
    } else {
        theme::BORDER_SUBTLE
    };
    painter.rect_stroke(
        rect,
        theme::RADIUS_LARGE,
        egui::Stroke::new(theme::STROKE_DEFAULT, border_color),
        egui::StrokeKind::Inside,
    );

    // Info strip: title (two lines max), price, sold count
    let info_rect = egui::Rect::from_min_max(
        egui::pos2(rect.min.x, img_rect.max.y),
        rect.max,
    )
    .shrink2(egui::vec2(theme::SPACING_MD, theme::SPACING_SM + 2.0));

    let mut job = egui::text::LayoutJob::single_section(
        product.title.clone(),
        egui::TextFormat::simple(egui::FontId::proportional(theme::FONT_LABEL - 1.0), theme::TEXT_PRIMARY),
    );
    job.wrap = egui::text::TextWrapping {
        max_width: info_rect.width(),
        max_rows: 2,
        break_anywhere: false,
        overflow_character: Some('…'),
    };
    let galley = ui.fonts(|f| f.layout_job(job));
    painter.galley(info_rect.left_top(), galley, theme::TEXT_PRIMARY);

    painter.text(
        info_rect.left_bottom(),
        egui::Align2::LEFT_BOTTOM,
        &product.price,
        egui::FontId::proportional(theme::FONT_BODY),
        theme::ACCENT,
    );

    if let Some(sold) = &product.sold {
        painter.text(
            info_rect.right_bottom(),
            egui::Align2::RIGHT_BOTTOM,
            format_sold(sold),
            egui::FontId::proportional(theme::FONT_CAPTION),
            theme::TEXT_DIM,
        );
    }
}
