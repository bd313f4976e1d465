//! Product image loading. Images are fetched only for cards that are on
//! screen, shrunk to a thumbnail and cached on disk as PNG.

use super::App;
use crate::types::Product;
use crate::utils::{absolute_image_url, image_cache_name};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

const THUMBNAIL_SIZE: u32 = 360;

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scratch path next to `dest`, unique per download so overlapping tasks for
/// the same image never write the same file.
fn partial_path(dest: &Path) -> PathBuf {
    let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_extension(format!("{}.part", n))
}

/// Download one image, shrink it and write it to `dest` as PNG.
async fn fetch_thumbnail(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;

    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
        let thumb = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        // Write aside and rename so the UI never decodes a half-written file
        let partial = partial_path(&dest);
        if let Err(e) = thumb.save_with_format(&partial, image::ImageFormat::Png) {
            std::fs::remove_file(&partial).ok();
            return Err(e.to_string());
        }
        std::fs::rename(&partial, &dest).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

impl App {
    fn thumbnail_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join("images").join(key)
    }

    /// Texture for a product's image, or None while it is still loading
    pub fn load_thumbnail(
        &mut self,
        ctx: &egui::Context,
        product: &Product,
    ) -> Option<egui::TextureHandle> {
        // Keyed by id and image URL so a changed image is picked up on refresh
        let key = image_cache_name(&product.id, &product.image);
        if let Some(cached) = self.thumbnail_cache.get(&key) {
            return cached.clone();
        }

        if self
            .image_pending
            .lock()
            .map(|p| p.contains(&key))
            .unwrap_or(false)
        {
            return None;
        }

        let path = self.thumbnail_path(&key);
        if path.exists() {
            let texture = image::open(&path).ok().map(|img| {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                ctx.load_texture(
                    format!("product_{}", product.id),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
            if texture.is_none() {
                warn!(id = %product.id, path = %path.display(), "Failed to decode cached image");
            }
            self.thumbnail_cache.insert(key, texture.clone());
            return texture;
        }

        self.request_thumbnail(ctx, product, key, path);
        None
    }

    fn request_thumbnail(
        &mut self,
        ctx: &egui::Context,
        product: &Product,
        key: String,
        dest: PathBuf,
    ) {
        let already_failed = self
            .image_failed
            .lock()
            .map(|f| f.contains(&key))
            .unwrap_or(false);
        if already_failed {
            self.thumbnail_cache.insert(key, None);
            return;
        }

        let Some(url) = absolute_image_url(&product.image) else {
            debug!(id = %product.id, image = %product.image, "Product has no usable image URL");
            self.thumbnail_cache.insert(key, None);
            return;
        };

        if let Ok(mut pending) = self.image_pending.lock() {
            pending.insert(key.clone());
        }

        let id = product.id.clone();
        let client = self.image_client.clone();
        let semaphore = self.image_semaphore.clone();
        let token = self.image_cancel.clone();
        let pending = self.image_pending.clone();
        let failed = self.image_failed.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => None,
                result = async {
                    let _permit = semaphore.acquire().await.ok();
                    fetch_thumbnail(&client, &url, &dest).await
                } => Some(result),
            };

            if let Some(Err(e)) = &result {
                warn!(id = %id, url = %url, error = %e, "Failed to fetch product image");
                if let Ok(mut f) = failed.lock() {
                    f.insert(key.clone());
                }
            }
            if let Ok(mut p) = pending.lock() {
                p.remove(&key);
            }
            // Cancelled requests stay unmarked so they run again when visible
            ctx.request_repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_paths_are_unique() {
        let dest = Path::new("/tmp/images/1_abc.png");
        let a = partial_path(dest);
        let b = partial_path(dest);
        assert_ne!(a, b);
        assert_eq!(a.parent(), dest.parent());
        assert!(a.to_string_lossy().ends_with(".part"));
        assert!(a.to_string_lossy().contains("1_abc."));
    }
}
