//! Category filtering

use super::App;
use crate::catalog;
use crate::types::*;
use tracing::debug;

impl App {
    /// Replace the loaded catalog. The filter goes back to All.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.category_counts = catalog::category_counts(&self.products);
        self.active_filter = CategoryFilter::All;
        self.apply_filter();
    }

    pub fn apply_filter(&mut self) {
        self.filtered_indices = catalog::filter_indices(&self.products, self.active_filter);
        debug!(
            filter = self.active_filter.label(),
            shown = self.filtered_indices.len(),
            total = self.products.len(),
            "Filter applied"
        );
    }

    /// Category picked from the overlay
    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.active_filter = filter;
        self.apply_filter();
        self.overlay_open = false;
        self.scroll_to_top = true;
    }

    pub fn category_count(&self, filter: CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.products.len(),
            CategoryFilter::Only(c) => self.category_counts.get(&c).copied().unwrap_or(0),
        }
    }
}
