//! Application constants and configuration

pub const SHOP_API_URL: &str = "https://joyabuy.com/search-info/get-tb-shop-full";
pub const SHOP_API_REFERER: &str = "https://joyabuy.com/shops/";
pub const ITEM_BASE_URL: &str = "https://item.taobao.com/item.htm";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Shop Catalog Viewer";

pub const DEFAULT_SHOP_ID: &str = "68237358";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PAGE_COUNT: u32 = 9;

/// Headers the shop endpoint expects, sent with every page request
pub const SHOP_API_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "en-GB,en;q=0.9"),
    ("referer", SHOP_API_REFERER),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

pub const LOAD_ERROR_MESSAGE: &str = "Unable to load products. Please try again later.";
pub const EMPTY_CATEGORY_MESSAGE: &str = "No products in this category";

/// Link to the shop's own storefront, shown when the catalog can't be fetched
pub fn store_url(shop_id: &str) -> String {
    format!("https://shop{}.world.taobao.com/", shop_id)
}
