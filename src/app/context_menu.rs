//! Context menu for product cards

use super::App;
use crate::theme;
use crate::types::Product;
use eframe::egui;
use tracing::debug;

/// What the user picked from a card's context menu
pub(crate) enum ProductAction {
    Open,
    CopyLink,
    CopyTitle,
}

impl App {
    pub(crate) fn product_context_menu(
        &mut self,
        ui: &mut egui::Ui,
        product: &Product,
    ) -> Option<ProductAction> {
        ui.spacing_mut().item_spacing.y = 2.0;

        let labels = [
            format!("{}  Open in browser", egui_phosphor::regular::ARROW_SQUARE_OUT),
            format!("{}  Copy link", egui_phosphor::regular::LINK),
            format!("{}  Copy title", egui_phosphor::regular::COPY),
        ];
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        theme::set_menu_width(ui, &label_refs);

        let mut action = None;
        if theme::menu_item(ui, egui_phosphor::regular::ARROW_SQUARE_OUT, "Open in browser") {
            action = Some(ProductAction::Open);
            ui.close_menu();
        }
        ui.separator();
        if theme::menu_item(ui, egui_phosphor::regular::LINK, "Copy link") {
            action = Some(ProductAction::CopyLink);
            ui.close_menu();
        }
        if theme::menu_item(ui, egui_phosphor::regular::COPY, "Copy title") {
            action = Some(ProductAction::CopyTitle);
            ui.close_menu();
        }

        if action.is_some() {
            debug!(id = %product.id, "Product context action");
        }
        action
    }

    pub(crate) fn run_product_action(
        &mut self,
        ctx: &egui::Context,
        product: &Product,
        action: ProductAction,
    ) {
        match action {
            ProductAction::Open => self.open_product(product),
            ProductAction::CopyLink => {
                ctx.copy_text(product.link.clone());
                self.show_toast("Link copied");
            }
            ProductAction::CopyTitle => {
                ctx.copy_text(product.title.clone());
                self.show_toast("Title copied");
            }
        }
    }
}
