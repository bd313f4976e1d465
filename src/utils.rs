//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

// Shopping bag mark for the header
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><path d="M22 22v-6a10 10 0 0 1 20 0v6" fill="none" stroke="#fb923c" stroke-width="4" stroke-linecap="round"/><rect x="10" y="22" width="44" height="36" rx="6" fill="#fb923c"/><circle cx="24" cy="32" r="3" fill="#09090b"/><circle cx="40" cy="32" r="3" fill="#09090b"/></svg>"##;

/// Rasterize the logo SVG to a square RGBA image. Used for both the header
/// mark and the window icon.
pub fn rasterize_logo(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("cache")
}

/// Image URLs from the API are often protocol-relative (`//img...`)
pub fn absolute_image_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        None
    } else if url.starts_with("//") {
        Some(format!("https:{}", url))
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

/// File name for a cached product image. Product ids are numeric on Taobao but
/// anything outside `[A-Za-z0-9_-]` is replaced to keep the path safe. The
/// image URL is hashed into the name so a changed image is fetched again.
pub fn image_cache_name(product_id: &str, image_url: &str) -> String {
    let safe: String = product_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}_{:016x}.png", safe, fnv1a(image_url.as_bytes()))
}

// 64-bit FNV-1a; stable across builds, unlike std's DefaultHasher
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_image_url() {
        assert_eq!(
            absolute_image_url("//img.alicdn.com/a.jpg").as_deref(),
            Some("https://img.alicdn.com/a.jpg")
        );
        assert_eq!(
            absolute_image_url("https://x/y.png").as_deref(),
            Some("https://x/y.png")
        );
        assert_eq!(absolute_image_url("  "), None);
        assert_eq!(absolute_image_url("data:image/png;base64,xx"), None);
    }

    #[test]
    fn test_image_cache_name_is_path_safe() {
        assert_eq!(
            image_cache_name("712345", ""),
            format!("712345_{:016x}.png", 0xcbf2_9ce4_8422_2325u64)
        );
        let name = image_cache_name("../etc/passwd", "//img/a.jpg");
        assert!(name.starts_with("___etc_passwd_"));
        assert!(name.ends_with(".png"));
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_image_cache_name_follows_image_url() {
        let a = image_cache_name("1", "//img.alicdn.com/a.jpg");
        assert_eq!(a, image_cache_name("1", "//img.alicdn.com/a.jpg"));
        assert_ne!(a, image_cache_name("1", "//img.alicdn.com/b.jpg"));
    }

    #[test]
    fn test_rasterize_logo_size() {
        let (pixels, w, h) = rasterize_logo(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
    }
}
