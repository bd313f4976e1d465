//! Catalog processing: deduplication, keyword categorization and filtering

use crate::constants::ITEM_BASE_URL;
use crate::types::{format_price, Category, CategoryFilter, Product, ShopPage};
use std::collections::{HashMap, HashSet};

/// Title keywords per category. Checked top to bottom; the first hit wins.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Jackets, &["jacket", "coat", "bomber", "blazer"]),
    (Category::Pants, &["pants", "trousers", "cargo", "jeans", "flare"]),
    (
        Category::Sweaters,
        &["sweater", "sweatshirt", "hoodie", "pullover", "crewneck", "turtleneck"],
    ),
    (Category::Shoes, &["shoes", "boots", "derby"]),
    (
        Category::Accessories,
        &["scarf", "bag", "belt", "necklace", "headgear", "balaclava"],
    ),
];

/// Infer a product's category from its title.
///
/// A keyword matches when the lowercased title contains the keyword, its
/// plural, or the keyword with its first `s` removed (so "pants" also
/// catches "pant").
pub fn categorize(title: &str) -> Category {
    let title = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| keyword_matches(&title, kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn keyword_matches(title: &str, keyword: &str) -> bool {
    title.contains(keyword)
        || title.contains(&format!("{}s", keyword))
        || title.contains(&keyword.replacen('s', "", 1))
}

/// Build the product link for a Taobao item id
pub fn item_link(id: &str) -> String {
    format!("{}?id={}", ITEM_BASE_URL, id)
}

/// Flatten fetched pages into one product list, keeping the first occurrence
/// of every id and the page order of the rest.
pub fn dedupe_pages(pages: Vec<ShopPage>) -> Vec<Product> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flat_map(|page| page.data.shop_products.product_list)
        .filter_map(|raw| {
            let id = raw.id_string();
            if !seen.insert(id.clone()) {
                return None;
            }
            Some(Product {
                link: item_link(&id),
                price: format_price(&raw.price),
                sold: raw.sold_display(),
                title: raw.name.unwrap_or_default(),
                image: raw.img_url.unwrap_or_default(),
                id,
            })
        })
        .collect()
}

/// Indices into `products` that pass `filter`, in catalog order
pub fn filter_indices(products: &[Product], filter: CategoryFilter) -> Vec<usize> {
    match filter {
        CategoryFilter::All => (0..products.len()).collect(),
        CategoryFilter::Only(category) => products
            .iter()
            .enumerate()
            .filter(|(_, p)| categorize(&p.title) == category)
            .map(|(i, _)| i)
            .collect(),
    }
}

/// Number of products per category, for the overlay badges
pub fn category_counts(products: &[Product]) -> HashMap<Category, usize> {
    let mut counts = HashMap::new();
    for product in products {
        *counts.entry(categorize(&product.title)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json_products: &str) -> ShopPage {
        let json = format!(
            r#"{{"data": {{"shopProducts": {{"productList": {}}}}}}}"#,
            json_products
        );
        serde_json::from_str(&json).unwrap()
    }

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: id.to_string(),
            title: title.to_string(),
            image: String::new(),
            price: "¥1".to_string(),
            link: item_link(id),
            sold: None,
        }
    }

    #[test]
    fn test_categorize_basic_keywords() {
        assert_eq!(categorize("Vintage Leather JACKET"), Category::Jackets);
        assert_eq!(categorize("Washed flare jeans"), Category::Pants);
        assert_eq!(categorize("Oversized Hoodie"), Category::Sweaters);
        assert_eq!(categorize("Chelsea boots"), Category::Shoes);
        assert_eq!(categorize("Knit balaclava"), Category::Accessories);
    }

    #[test]
    fn test_categorize_singular_variant() {
        // "pants" minus its first s
        assert_eq!(categorize("Wide leg pant"), Category::Pants);
        // "boots" minus its first s
        assert_eq!(categorize("Leather boot"), Category::Shoes);
    }

    #[test]
    fn test_categorize_first_category_wins() {
        // Matches both Jackets (coat) and Accessories (belt)
        assert_eq!(categorize("Belted trench coat"), Category::Jackets);
        // Matches both Pants (cargo) and Accessories (bag)
        assert_eq!(categorize("Cargo bag"), Category::Pants);
    }

    #[test]
    fn test_categorize_falls_back_to_other() {
        assert_eq!(categorize("Graphic tee"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_in_order() {
        let pages = vec![
            page(r#"[{"id": 1, "name": "first", "imgUrl": "a", "price": 10, "sold": 3},
                     {"id": 2, "name": "second", "imgUrl": "b", "price": 20}]"#),
            page(r#"[{"id": "1", "name": "duplicate", "imgUrl": "c", "price": 30},
                     {"id": 3, "name": "third", "imgUrl": "d", "price": 40}]"#),
        ];

        let products = dedupe_pages(pages);
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);

        let first = &products[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.image, "a");
        assert_eq!(first.price, "¥10");
        assert_eq!(first.link, "https://item.taobao.com/item.htm?id=1");
        assert_eq!(first.sold.as_deref(), Some("3"));
        assert_eq!(products[1].sold, None);
    }

    #[test]
    fn test_dedupe_empty_pages() {
        assert!(dedupe_pages(vec![page("[]"), page("[]")]).is_empty());
    }

    #[test]
    fn test_filter_all_is_identity() {
        let products = vec![product("1", "coat"), product("2", "tee")];
        assert_eq!(filter_indices(&products, CategoryFilter::All), vec![0, 1]);
    }

    #[test]
    fn test_filter_only_preserves_order() {
        let products = vec![
            product("1", "Bomber jacket"),
            product("2", "Denim jeans"),
            product("3", "Wool blazer"),
            product("4", "Tee"),
        ];
        assert_eq!(
            filter_indices(&products, CategoryFilter::Only(Category::Jackets)),
            vec![0, 2]
        );
        assert_eq!(
            filter_indices(&products, CategoryFilter::Only(Category::Other)),
            vec![3]
        );
        assert!(filter_indices(&products, CategoryFilter::Only(Category::Shoes)).is_empty());
    }

    #[test]
    fn test_category_counts() {
        let products = vec![
            product("1", "Bomber jacket"),
            product("2", "Puffer coat"),
            product("3", "Leather belt"),
        ];
        let counts = category_counts(&products);
        assert_eq!(counts.get(&Category::Jackets), Some(&2));
        assert_eq!(counts.get(&Category::Accessories), Some(&1));
        assert_eq!(counts.get(&Category::Shoes), None);
    }
}
