//! HTTP client for the shop catalog endpoint

use crate::catalog::dedupe_pages;
use crate::constants::{SHOP_API_HEADERS, SHOP_API_URL};
use crate::types::{Product, ShopPage};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why a catalog fetch failed
#[derive(Debug)]
pub enum FetchError {
    Request(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "request failed: {}", e),
            FetchError::Status(code) => write!(f, "HTTP error! status: {}", code),
            FetchError::Decode(e) => write!(f, "invalid response: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Client for one shop's catalog
#[derive(Clone)]
pub struct ShopClient {
    client: reqwest::Client,
    base_url: String,
    shop_id: String,
    language: String,
    page_count: u32,
}

impl ShopClient {
    pub fn new(
        shop_id: &str,
        language: &str,
        page_count: u32,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for &(name, value) in SHOP_API_HEADERS {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: SHOP_API_URL.to_string(),
            shop_id: shop_id.to_string(),
            language: language.to_string(),
            page_count,
        })
    }

    /// Point the client at another catalog endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }

    /// URL for a 1-based catalog page
    pub fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        let page = page.to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("ShopId", self.shop_id.as_str()),
                ("Page", page.as_str()),
                ("Language", self.language.as_str()),
            ],
        )
        .map_err(|e| FetchError::Request(e.to_string()))
    }

    pub async fn fetch_page(&self, page: u32) -> Result<ShopPage, FetchError> {
        let url = self.page_url(page)?;
        debug!(page, url = %url, "Fetching catalog page");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!(page, status = %response.status(), "Catalog page request failed");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Fetch every page in parallel and wait for all of them. Any failed page
    /// fails the whole catalog.
    pub async fn fetch_catalog(&self) -> Result<Vec<Product>, FetchError> {
        let requests = (1..=self.page_count).map(|page| self.fetch_page(page));
        let pages = futures::future::try_join_all(requests).await?;

        let products = dedupe_pages(pages);
        info!(
            shop_id = %self.shop_id,
            pages = self.page_count,
            products = products.len(),
            "Catalog fetched"
        );
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShopClient {
        ShopClient::new("68237358", "en", 9, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_page_url_query() {
        let url = client().page_url(3).unwrap();
        assert_eq!(url.host_str(), Some("joyabuy.com"));
        assert_eq!(url.path(), "/search-info/get-tb-shop-full");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("ShopId".to_string(), "68237358".to_string()),
                ("Page".to_string(), "3".to_string()),
                ("Language".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Status(503).to_string(), "HTTP error! status: 503");
        assert!(FetchError::Decode("eof".into()).to_string().contains("eof"));
    }

    /// Serve catalog pages over plain HTTP/1.1. `respond` maps a page number
    /// to a status code and body.
    async fn serve_pages(respond: fn(u32) -> (u16, String)) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let page = request
                        .split(|c: char| c == '&' || c == '?' || c == ' ')
                        .find_map(|part| part.strip_prefix("Page="))
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(0);
                    let (status, body) = respond(page);
                    let response = format!(
                        "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}/search-info/get-tb-shop-full", addr)
    }

    fn page_body(products: &str) -> String {
        format!(
            r#"{{"data": {{"shopProducts": {{"productList": {}}}}}}}"#,
            products
        )
    }

    fn good_page(page: u32) -> (u16, String) {
        // Page 2 repeats the first product of page 1
        let body = match page {
            1 => page_body(r#"[{"id": 1, "name": "Wool coat", "imgUrl": "", "price": 10}]"#),
            2 => page_body(
                r#"[{"id": "1", "name": "Wool coat again", "imgUrl": "", "price": 10},
                    {"id": 2, "name": "Cargo pants", "imgUrl": "", "price": 20}]"#,
            ),
            _ => page_body(r#"[{"id": 3, "name": "Derby shoes", "imgUrl": "", "price": 30}]"#),
        };
        (200, body)
    }

    fn one_failing_page(page: u32) -> (u16, String) {
        if page == 2 {
            (500, "oops".to_string())
        } else {
            good_page(page)
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog_dedupes_across_pages() {
        let base = serve_pages(good_page).await;
        let client = ShopClient::new("1", "en", 3, Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);

        let products = client.fetch_catalog().await.unwrap();
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Wool coat", "Cargo pants", "Derby shoes"]);
    }

    #[tokio::test]
    async fn test_one_failed_page_fails_the_catalog() {
        let base = serve_pages(one_failing_page).await;
        let client = ShopClient::new("1", "en", 3, Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);

        match client.fetch_catalog().await {
            Err(FetchError::Status(500)) => {}
            other => panic!("expected status 500, got {:?}", other.map(|p| p.len())),
        }
    }

    #[tokio::test]
    async fn test_undecodable_page_is_a_decode_error() {
        let base = serve_pages(|_| (200, "<html>".to_string())).await;
        let client = ShopClient::new("1", "en", 1, Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);

        assert!(matches!(client.fetch_page(1).await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_zero_pages_yields_empty_catalog() {
        let client = ShopClient::new("1", "en", 0, Duration::from_secs(1)).unwrap();
        let products = client.fetch_catalog().await.unwrap();
        assert!(products.is_empty());
    }
}
