//! App module - contains the main application state and logic

mod context_menu;
mod fetch;
mod filters;
mod grid;
mod overlay;
mod thumbnails;

use crate::api::ShopClient;
use crate::db::Database;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use crate::utils::get_cache_dir;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Result slot filled by the background catalog fetch
pub(crate) type FetchSlot = Arc<Mutex<Option<Result<Vec<Product>, String>>>>;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) db: Database,
    pub(crate) client: Option<ShopClient>,
    pub(crate) shop_id: String,
    pub(crate) products: Vec<Product>,
    pub(crate) filtered_indices: Vec<usize>,
    pub(crate) category_counts: HashMap<Category, usize>,
    pub(crate) active_filter: CategoryFilter,
    pub(crate) overlay_open: bool,
    pub(crate) header_bottom: f32,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Catalog fetch
    pub(crate) load_state: LoadState,
    pub(crate) fetch_result: FetchSlot,
    pub(crate) fetch_started: bool,
    pub(crate) cached_notice: Option<String>,
    pub(crate) show_cached_on_error: bool,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Thumbnail cache
    pub(crate) cache_dir: PathBuf,
    pub(crate) image_client: reqwest::Client,
    pub(crate) thumbnail_cache: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) image_pending: Arc<Mutex<HashSet<String>>>,
    pub(crate) image_failed: Arc<Mutex<HashSet<String>>>,
    pub(crate) image_semaphore: Arc<tokio::sync::Semaphore>,
    pub(crate) image_cancel: CancellationToken,
    // View
    pub(crate) large_cards: bool,
    pub(crate) scroll_to_top: bool,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        db: Database,
        settings: Settings,
        data_dir: PathBuf,
    ) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;

        let client = match ShopClient::new(
            &settings.shop_id,
            &settings.language,
            settings.page_count,
            settings.request_timeout(),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client");
                None
            }
        };

        let cache_dir = get_cache_dir();
        std::fs::create_dir_all(cache_dir.join("images")).ok();

        // Show the last good catalog while the fresh one loads
        let cached = db.get_products(&settings.shop_id).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read cached catalog");
            Vec::new()
        });
        info!(shop_id = %settings.shop_id, cached = cached.len(), "Loaded cached catalog");

        let mut app = Self {
            db,
            client,
            shop_id: settings.shop_id.clone(),
            products: Vec::new(),
            filtered_indices: Vec::new(),
            category_counts: HashMap::new(),
            active_filter: CategoryFilter::All,
            overlay_open: false,
            header_bottom: theme::HEADER_HEIGHT,
            logo_texture: None,
            load_state: LoadState::Idle,
            fetch_result: Arc::new(Mutex::new(None)),
            fetch_started: false,
            cached_notice: None,
            show_cached_on_error: settings.show_cached_on_error,
            runtime,
            cache_dir,
            image_client: reqwest::Client::new(),
            thumbnail_cache: HashMap::new(),
            image_pending: Arc::new(Mutex::new(HashSet::new())),
            image_failed: Arc::new(Mutex::new(HashSet::new())),
            image_semaphore: Arc::new(tokio::sync::Semaphore::new(
                settings.max_image_downloads.max(1),
            )),
            image_cancel: CancellationToken::new(),
            large_cards: settings.large_cards,
            scroll_to_top: false,
            toast_message: None,
            toast_start: None,
            settings,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        };
        app.set_products(cached);
        Ok(app)
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            large_cards: self.large_cards,
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }

    /// Open a product page in the system browser
    pub fn open_product(&mut self, product: &Product) {
        info!(id = %product.id, link = %product.link, "Opening product");
        if let Err(e) = open::that(&product.link) {
            warn!(error = %e, link = %product.link, "Failed to open browser");
            self.show_toast("Could not open the browser");
        }
    }
}
