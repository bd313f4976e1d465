//! Database module for Shop Catalog Viewer
//! Keeps the last successfully fetched catalog per shop in SQLite

use crate::types::Product;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use std::path::Path;
use tracing::debug;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS products (
                shop_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                id TEXT NOT NULL,
                title TEXT NOT NULL,
                image TEXT NOT NULL,
                price TEXT NOT NULL,
                link TEXT NOT NULL,
                sold TEXT,
                PRIMARY KEY (shop_id, id)
            );

            CREATE INDEX IF NOT EXISTS idx_products_position ON products(shop_id, position);

            CREATE TABLE IF NOT EXISTS fetches (
                shop_id TEXT PRIMARY KEY,
                fetched_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Replace the cached catalog of a shop with a freshly fetched one
    pub fn replace_products(&mut self, shop_id: &str, products: &[Product]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM products WHERE shop_id = ?1", params![shop_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (shop_id, position, id, title, image, price, link, sold)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, p) in products.iter().enumerate() {
                stmt.execute(params![
                    shop_id,
                    position as i64,
                    p.id,
                    p.title,
                    p.image,
                    p.price,
                    p.link,
                    p.sold
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO fetches (shop_id, fetched_at) VALUES (?1, ?2)
             ON CONFLICT(shop_id) DO UPDATE SET fetched_at = excluded.fetched_at",
            params![shop_id, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        debug!(shop_id, count = products.len(), "Catalog cached");
        Ok(products.len())
    }

    /// Cached catalog of a shop, in original catalog order
    pub fn get_products(&self, shop_id: &str) -> Result<Vec<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, image, price, link, sold
             FROM products WHERE shop_id = ?1 ORDER BY position",
        )?;

        let products = stmt
            .query_map(params![shop_id], |row| {
                Ok(Product {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    image: row.get(2)?,
                    price: row.get(3)?,
                    link: row.get(4)?,
                    sold: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(products)
    }

    /// When the cached catalog of a shop was fetched
    pub fn last_fetched(&self, shop_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT fetched_at FROM fetches WHERE shop_id = ?1")?;
        let mut rows = stmt.query(params![shop_id])?;

        if let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            Ok(DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|t| t.with_timezone(&Utc)))
        } else {
            Ok(None)
        }
    }

    /// Get cached product count for a shop
    pub fn product_count(&self, shop_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE shop_id = ?1",
            params![shop_id],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, title: &str, sold: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            title: title.to_string(),
            image: format!("//img/{}.jpg", id),
            price: "¥99".to_string(),
            link: format!("https://item.taobao.com/item.htm?id={}", id),
            sold: sold.map(str::to_string),
        }
    }

    #[test]
    fn test_replace_and_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(&dir.path().join("catalog.db")).unwrap();

        let products = vec![
            product("30", "zeta coat", Some("5")),
            product("10", "alpha pants", None),
            product("20", "mid hoodie", Some("120")),
        ];
        assert_eq!(db.replace_products("shop", &products).unwrap(), 3);

        let loaded = db.get_products("shop").unwrap();
        assert_eq!(loaded, products);
        assert!(db.last_fetched("shop").unwrap().is_some());
    }

    #[test]
    fn test_replace_discards_previous_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(&dir.path().join("catalog.db")).unwrap();

        db.replace_products("shop", &[product("1", "old", None), product("2", "old", None)])
            .unwrap();
        db.replace_products("shop", &[product("3", "new", None)]).unwrap();

        let loaded = db.get_products("shop").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "3");
        assert_eq!(db.product_count("shop").unwrap(), 1);
    }

    #[test]
    fn test_shops_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open(&dir.path().join("catalog.db")).unwrap();

        db.replace_products("a", &[product("1", "coat", None)]).unwrap();
        assert_eq!(db.product_count("b").unwrap(), 0);
        assert!(db.get_products("b").unwrap().is_empty());
        assert!(db.last_fetched("b").unwrap().is_none());
    }
}
