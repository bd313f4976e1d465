//! Common types and data structures

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product shown as one card in the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image: String,
    pub price: String,
    pub link: String,
    pub sold: Option<String>,
}

/// Catalog category inferred from a product title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Jackets,
    Pants,
    Sweaters,
    Shoes,
    Accessories,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Jackets,
        Category::Pants,
        Category::Sweaters,
        Category::Shoes,
        Category::Accessories,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Jackets => "Jackets",
            Category::Pants => "Pants",
            Category::Sweaters => "Sweaters",
            Category::Shoes => "Shoes",
            Category::Accessories => "Accessories",
            Category::Other => "Other",
        }
    }
}

/// Active grid filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

/// Catalog fetch lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// One page response from the shop endpoint
#[derive(Debug, Deserialize)]
pub struct ShopPage {
    pub data: ShopPageData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPageData {
    pub shop_products: ShopProducts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProducts {
    #[serde(default)]
    pub product_list: Vec<RawProduct>,
}

/// Product entry as returned by the API. `id`, `price` and `sold` arrive as
/// either strings or numbers depending on the listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub sold: Value,
}

impl RawProduct {
    pub fn id_string(&self) -> String {
        value_to_string(&self.id).unwrap_or_default()
    }

    /// Sold count for display, hidden when the API reports nothing or zero
    pub fn sold_display(&self) -> Option<String> {
        match &self.sold {
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Bool(false) => None,
            other => value_to_string(other).filter(|s| !s.is_empty()),
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whole floats print without a fractional part (`88.0` becomes `88`), the
/// way the storefront renders them.
fn number_to_string(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Price formatted the way the storefront shows it
pub fn format_price(value: &Value) -> String {
    format!("¥{}", value_to_string(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_mixed_value_types() {
        let json = r#"{
            "data": {
                "shopProducts": {
                    "productList": [
                        {"id": 123, "name": "Wool Coat", "imgUrl": "//img/a.jpg", "price": 199.5, "sold": 12},
                        {"id": "456", "name": "Cargo Pants", "imgUrl": "//img/b.jpg", "price": "88", "sold": "1k+"}
                    ]
                }
            }
        }"#;
        let page: ShopPage = serde_json::from_str(json).unwrap();
        let list = &page.data.shop_products.product_list;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id_string(), "123");
        assert_eq!(list[1].id_string(), "456");
        assert_eq!(format_price(&list[0].price), "¥199.5");
        assert_eq!(format_price(&list[1].price), "¥88");
        assert_eq!(list[1].sold_display().as_deref(), Some("1k+"));
    }

    #[test]
    fn test_sold_hidden_when_zero_or_missing() {
        let json = r#"[
            {"id": 1, "name": "a", "imgUrl": "", "price": 1, "sold": 0},
            {"id": 2, "name": "b", "imgUrl": "", "price": 1, "sold": null},
            {"id": 3, "name": "c", "imgUrl": "", "price": 1, "sold": ""},
            {"id": 4, "name": "d", "imgUrl": "", "price": 1}
        ]"#;
        let products: Vec<RawProduct> = serde_json::from_str(json).unwrap();
        assert!(products.iter().all(|p| p.sold_display().is_none()));
    }

    #[test]
    fn test_missing_product_list_is_empty() {
        let page: ShopPage = serde_json::from_str(r#"{"data": {"shopProducts": {}}}"#).unwrap();
        assert!(page.data.shop_products.product_list.is_empty());
    }

    #[test]
    fn test_whole_floats_print_as_integers() {
        let raw: RawProduct = serde_json::from_str(
            r#"{"id": 1.0, "name": "Coat", "imgUrl": "", "price": 88.00, "sold": 12.0}"#,
        )
        .unwrap();
        assert_eq!(raw.id_string(), "1");
        assert_eq!(format_price(&raw.price), "¥88");
        assert_eq!(raw.sold_display().as_deref(), Some("12"));

        let raw: RawProduct =
            serde_json::from_str(r#"{"id": 2, "price": 19.9, "sold": -0.0}"#).unwrap();
        assert_eq!(format_price(&raw.price), "¥19.9");
        assert_eq!(raw.sold_display(), None);
    }

    #[test]
    fn test_null_text_fields_are_accepted() {
        let raw: RawProduct =
            serde_json::from_str(r#"{"id": 9, "name": null, "imgUrl": null, "price": null}"#).unwrap();
        assert_eq!(raw.name, None);
        assert_eq!(raw.img_url, None);
        assert_eq!(format_price(&raw.price), "¥");
    }

    #[test]
    fn test_category_filter_labels() {
        assert_eq!(CategoryFilter::default(), CategoryFilter::All);
        assert_eq!(CategoryFilter::All.label(), "All");
        assert_eq!(CategoryFilter::Only(Category::Shoes).label(), "Shoes");
        assert_eq!(Category::ALL.last().map(|c| c.label()), Some("Other"));
    }
}
