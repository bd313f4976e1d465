//! Catalog fetch: spawn on the runtime, hand the result back to the UI thread

use super::App;
use crate::types::*;
use eframe::egui;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

impl App {
    pub fn start_catalog_fetch(&mut self, ctx: &egui::Context) {
        if self.load_state == LoadState::Loading {
            return;
        }

        let Some(client) = self.client.clone() else {
            self.load_state = LoadState::Failed("HTTP client unavailable".to_string());
            return;
        };

        // Drop queued image downloads and give failed images another chance
        self.image_cancel.cancel();
        self.image_cancel = CancellationToken::new();
        if let Ok(mut failed) = self.image_failed.lock() {
            failed.clear();
        }
        self.thumbnail_cache.retain(|_, texture| texture.is_some());

        info!(shop_id = %client.shop_id(), "Starting catalog fetch");
        self.load_state = LoadState::Loading;

        let slot = self.fetch_result.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = client.fetch_catalog().await.map_err(|e| e.to_string());
            if let Ok(mut s) = slot.lock() {
                *s = Some(result);
            }
            ctx.request_repaint();
        });
    }

    /// Pick up a finished fetch, if any
    pub fn poll_catalog_fetch(&mut self) {
        let result = match self.fetch_result.lock() {
            Ok(mut s) => s.take(),
            Err(_) => None,
        };

        match result {
            None => {}
            Some(Ok(products)) => {
                if let Err(e) = self.db.replace_products(&self.shop_id, &products) {
                    warn!(error = %e, "Failed to cache catalog");
                }
                self.cached_notice = None;
                self.load_state = LoadState::Loaded;
                self.set_products(products);
                self.scroll_to_top = true;
            }
            Some(Err(e)) => {
                error!(error = %e, "Error fetching products");
                self.handle_fetch_failure(e);
            }
        }
    }

    fn handle_fetch_failure(&mut self, message: String) {
        let has_cache = self.db.product_count(&self.shop_id).unwrap_or(0) > 0;
        let cached = if self.show_cached_on_error && has_cache {
            self.db.get_products(&self.shop_id).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read cached catalog");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        match products_after_failure(self.show_cached_on_error, cached, message) {
            (products, LoadState::Loaded) => {
                let when = self
                    .db
                    .last_fetched(&self.shop_id)
                    .ok()
                    .flatten()
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "an earlier session".to_string());
                warn!(count = products.len(), "Showing cached catalog after fetch failure");
                self.cached_notice = Some(format!("Showing the catalog saved from {}", when));
                self.load_state = LoadState::Loaded;
                self.set_products(products);
            }
            (products, state) => {
                self.cached_notice = None;
                self.set_products(products);
                self.load_state = state;
            }
        }
    }
}

/// What the grid shows after a failed fetch. The cached catalog is used only
/// when enabled and non-empty, otherwise the grid is cleared and the error
/// panel takes over.
fn products_after_failure(
    show_cached_on_error: bool,
    cached: Vec<Product>,
    message: String,
) -> (Vec<Product>, LoadState) {
    if show_cached_on_error && !cached.is_empty() {
        (cached, LoadState::Loaded)
    } else {
        (Vec::new(), LoadState::Failed(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::item_link;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Item {}", id),
            image: String::new(),
            price: "¥1".to_string(),
            link: item_link(id),
            sold: None,
        }
    }

    #[test]
    fn test_failure_without_fallback_shows_error() {
        let (products, state) =
            products_after_failure(false, vec![product("1")], "HTTP error! status: 500".into());
        assert!(products.is_empty());
        assert_eq!(state, LoadState::Failed("HTTP error! status: 500".to_string()));
    }

    #[test]
    fn test_failure_with_fallback_uses_cache() {
        let (products, state) =
            products_after_failure(true, vec![product("1"), product("2")], "timeout".into());
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "1");
        assert_eq!(state, LoadState::Loaded);
    }

    #[test]
    fn test_failure_with_empty_cache_shows_error() {
        let (products, state) = products_after_failure(true, Vec::new(), "timeout".into());
        assert!(products.is_empty());
        assert_eq!(state, LoadState::Failed("timeout".to_string()));
    }
}
