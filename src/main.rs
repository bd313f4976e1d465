#![windows_subsystem = "windows"]
//! Shop Catalog Viewer - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod catalog;
mod constants;
mod db;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use db::Database;
use eframe::egui;
use tracing::{error, info};
use types::*;
use ui::components::render_toast;
use utils::get_data_dir;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "shop-catalog-viewer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shop_catalog_viewer=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Shop Catalog Viewer starting");

    let db_path = data_dir.join("catalog.db");
    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = %db_path.display(), "Failed to open database");
            return Err(eframe::Error::AppCreation(Box::new(e)));
        }
    };

    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1280.0, 820.0)))
        .with_min_inner_size([480.0, 420.0])
        .with_title(APP_NAME);

    // Window/taskbar icon from the logo
    if let Some((rgba, width, height)) = utils::rasterize_logo(64) {
        let icon = egui::IconData { rgba, width, height };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, db, settings, data_dir)?;
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Start the catalog fetch on first frame
        if !self.fetch_started {
            self.fetch_started = true;
            self.start_catalog_fetch(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.poll_catalog_fetch();

        // Keyboard shortcuts
        let (escape, refresh) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F5),
            )
        });
        if escape && self.overlay_open {
            self.overlay_open = false;
        }
        if refresh {
            self.start_catalog_fetch(ctx);
        }

        // Header with burger, title and refresh (must be added BEFORE CentralPanel)
        let header = egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show_separator_line(false)
            .frame(theme::header_frame())
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    self.render_burger_button(ui);
                    ui.add_space(theme::SPACING_MD);

                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(theme::LOGO_SIZE as u32 * 2)
                            .unwrap_or_else(|| (vec![0; 4], 1, 1));
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    ui.add(
                        egui::Image::new(&*texture)
                            .fit_to_exact_size(egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE)),
                    );

                    ui.label(
                        egui::RichText::new(format!("Shop {}", self.shop_id))
                            .size(theme::FONT_TITLE)
                            .color(theme::TEXT_PRIMARY),
                    );

                    if !self.products.is_empty() {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {} of {} products",
                                self.active_filter.label(),
                                self.filtered_indices.len(),
                                self.products.len()
                            ))
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_MUTED),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let loading = self.load_state == LoadState::Loading;
                        let refresh_btn = ui.add_enabled(
                            !loading,
                            theme::button(egui_phosphor::regular::ARROWS_CLOCKWISE),
                        );
                        if refresh_btn.on_hover_text("Refresh (F5)").clicked() {
                            self.start_catalog_fetch(ctx);
                        }

                        let size_icon = if self.large_cards {
                            egui_phosphor::regular::GRID_NINE
                        } else {
                            egui_phosphor::regular::SQUARES_FOUR
                        };
                        if ui
                            .add(theme::button(size_icon))
                            .on_hover_text("Toggle card size")
                            .clicked()
                        {
                            self.large_cards = !self.large_cards;
                        }

                        if loading {
                            ui.add(egui::Spinner::new().size(16.0).color(theme::ACCENT));
                        }
                    });
                });
            });
        self.header_bottom = header.response.rect.bottom();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(theme::SPACING_XL as i8)),
            )
            .show(ctx, |ui| {
                self.render_catalog(ui, ctx);
            });

        self.render_category_overlay(ctx);

        render_toast(ctx, &mut self.toast_message, &mut self.toast_start);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shop Catalog Viewer shutting down");
        self.image_cancel.cancel();
        self.save_settings();
    }
}
