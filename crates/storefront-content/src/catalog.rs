//! # Catalog
//!
//! The read-only product/banner source the web app depends on.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          dyn Catalog                                    │
//! │                               │                                         │
//! │            ┌──────────────────┴──────────────────┐                     │
//! │            ▼                                     ▼                      │
//! │     ContentClient                          StaticCatalog                │
//! │     (live content API)                     (in memory, loaded from a   │
//! │                                             JSON export; offline dev   │
//! │                                             and tests)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fixture Format
//! ```json
//! {
//!   "products": [ { "_id": "...", "name": "...", "slug": { "current": "..." }, "price": 19.99 } ],
//!   "banners":  [ { "_id": "...", "midText": "..." } ]
//! }
//! ```
//! Documents use the same shape as the content API returns, and go
//! through the same mapping.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use storefront_core::{Banner, Product};

use crate::client::ContentClient;
use crate::error::{ContentError, ContentResult};
use crate::repository::banner::BannerDocument;
use crate::repository::product::ProductDocument;

/// Read access to products and banners.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Every product.
    async fn all_products(&self) -> ContentResult<Vec<Product>>;

    /// The product with this slug, if any.
    async fn product_by_slug(&self, slug: &str) -> ContentResult<Option<Product>>;

    /// Every product slug.
    async fn product_slugs(&self) -> ContentResult<Vec<String>>;

    /// Every banner; the first is the featured one.
    async fn banners(&self) -> ContentResult<Vec<Banner>>;
}

#[async_trait]
impl Catalog for ContentClient {
    async fn all_products(&self) -> ContentResult<Vec<Product>> {
        self.products().list_all().await
    }

    async fn product_by_slug(&self, slug: &str) -> ContentResult<Option<Product>> {
        self.products().get_by_slug(slug).await
    }

    async fn product_slugs(&self) -> ContentResult<Vec<String>> {
        self.products().list_slugs().await
    }

    async fn banners(&self) -> ContentResult<Vec<Banner>> {
        self.banners().list_all().await
    }
}

// =============================================================================
// Static Catalog
// =============================================================================

#[derive(Deserialize)]
struct Fixture {
    #[serde(default)]
    products: Vec<ProductDocument>,
    #[serde(default)]
    banners: Vec<BannerDocument>,
}

/// An in-memory catalog.
///
/// ## Usage
/// ```rust
/// use storefront_content::StaticCatalog;
/// use storefront_core::{Money, Product};
///
/// let catalog = StaticCatalog::new(
///     vec![Product::new("p1", "Speaker", "speaker", Money::from_cents(1999))],
///     vec![],
/// );
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    banners: Vec<Banner>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, banners: Vec<Banner>) -> Self {
        StaticCatalog { products, banners }
    }

    /// Parses a fixture document (see the module docs for the format).
    pub fn from_json(json: &str) -> ContentResult<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;

        let products = fixture
            .products
            .into_iter()
            .map(ProductDocument::into_product)
            .collect::<ContentResult<Vec<_>>>()?;
        let banners = fixture
            .banners
            .into_iter()
            .map(BannerDocument::into_banner)
            .collect::<ContentResult<Vec<_>>>()?;

        Ok(StaticCatalog { products, banners })
    }

    /// Loads a fixture file.
    pub async fn load(path: impl AsRef<Path>) -> ContentResult<Self> {
        let path = path.as_ref();
        let fixture_error = |reason: String| ContentError::Fixture {
            path: path.display().to_string(),
            reason,
        };

        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| fixture_error(e.to_string()))?;
        let catalog = StaticCatalog::from_json(&json).map_err(|e| fixture_error(e.to_string()))?;

        info!(
            path = %path.display(),
            products = catalog.products.len(),
            banners = catalog.banners.len(),
            "Loaded static catalog"
        );
        Ok(catalog)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn all_products(&self) -> ContentResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn product_by_slug(&self, slug: &str) -> ContentResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn product_slugs(&self) -> ContentResult<Vec<String>> {
        Ok(self.products.iter().map(|p| p.slug.clone()).collect())
    }

    async fn banners(&self) -> ContentResult<Vec<Banner>> {
        Ok(self.banners.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use storefront_core::Money;

    const FIXTURE: &str = r#"{
        "products": [
            { "_id": "p1", "name": "Speaker", "slug": { "current": "speaker" }, "price": 19.99 },
            { "_id": "p2", "name": "Earphones", "slug": { "current": "earphones" }, "price": 5 }
        ],
        "banners": [ { "_id": "b1", "largeText1": "Summer" } ]
    }"#;

    #[tokio::test]
    async fn test_static_catalog_from_json() {
        let catalog = StaticCatalog::from_json(FIXTURE).unwrap();

        let products = catalog.all_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, Money::from_cents(500));

        let speaker = catalog.product_by_slug("speaker").await.unwrap().unwrap();
        assert_eq!(speaker.id, "p1");
        assert!(catalog.product_by_slug("missing").await.unwrap().is_none());

        assert_eq!(
            catalog.product_slugs().await.unwrap(),
            vec!["speaker", "earphones"]
        );
        assert_eq!(
            catalog.banners().await.unwrap()[0].large_text1.as_deref(),
            Some("Summer")
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let catalog = StaticCatalog::load(file.path()).await.unwrap();

        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_load_reports_path_on_failure() {
        let err = StaticCatalog::load("/definitely/not/here.json").await.unwrap_err();

        match err {
            ContentError::Fixture { path, .. } => assert!(path.contains("not/here.json")),
            other => panic!("expected Fixture, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_document_in_fixture() {
        let json = r#"{ "products": [ { "_id": "p1", "name": "X", "slug": { "current": "x" }, "price": -1 } ] }"#;
        assert!(matches!(
            StaticCatalog::from_json(json),
            Err(ContentError::InvalidDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_trait_object() {
        let catalog: Box<dyn Catalog> = Box::new(StaticCatalog::from_json(FIXTURE).unwrap());
        assert_eq!(catalog.product_slugs().await.unwrap().len(), 2);
    }
}
