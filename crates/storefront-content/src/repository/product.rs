//! # Product Repository
//!
//! Content queries for products.
//!
//! ## Document Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Content document                        storefront_core::Product       │
//! │  ────────────────                        ────────────────────────       │
//! │  _id                          ────────►  id        (required)          │
//! │  name                         ────────►  name      (required)          │
//! │  slug.current                 ────────►  slug      (required)          │
//! │  price        19.99 (number)  ────────►  price     1999 cents, >= 0    │
//! │  details                      ────────►  details                       │
//! │  image[].asset._ref           ────────►  images    (order kept)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use serde_json::Number;
use tracing::debug;

use storefront_core::{Money, Product};

use super::{ImageDocument, SlugDocument};
use crate::client::ContentClient;
use crate::error::{ContentError, ContentResult};
use crate::query::Query;
use crate::PRODUCT_TYPE;

// =============================================================================
// Document
// =============================================================================

/// A product as stored in the content lake.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<SlugDocument>,
    pub price: Option<Number>,
    pub details: Option<String>,
    #[serde(default)]
    pub image: Vec<ImageDocument>,
}

impl ProductDocument {
    /// Maps the document into a validated `Product`.
    ///
    /// ## Errors
    /// `InvalidDocument` when id, name, slug or price is missing, or the
    /// price is negative or not a two-decimal amount.
    pub fn into_product(self) -> ContentResult<Product> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ContentError::invalid_document(PRODUCT_TYPE, "<unknown>", "missing _id"))?;
        let invalid = |reason: String| ContentError::invalid_document(PRODUCT_TYPE, id.clone(), reason);

        let name = self.name.ok_or_else(|| invalid("missing name".to_string()))?;
        let slug = self
            .slug
            .and_then(|s| s.current)
            .ok_or_else(|| invalid("missing slug".to_string()))?;
        let price = self.price.ok_or_else(|| invalid("missing price".to_string()))?;
        let price = Money::parse_decimal(&price.to_string()).map_err(|e| invalid(e.to_string()))?;

        let mut product = Product::new(id.clone(), name, slug, price);
        product.details = self.details;
        product.images = self
            .image
            .into_iter()
            .filter_map(ImageDocument::into_asset)
            .collect();

        product.validate().map_err(|e| invalid(e.to_string()))?;
        Ok(product)
    }
}

#[derive(Debug, Deserialize)]
struct SlugRow {
    slug: Option<SlugDocument>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product queries.
///
/// ## Usage
/// ```rust,ignore
/// let repo = client.products();
///
/// let all = repo.list_all().await?;
/// let one = repo.get_by_slug("speaker").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    client: ContentClient,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(client: ContentClient) -> Self {
        ProductRepository { client }
    }

    /// All products, in content-lake order.
    ///
    /// One malformed document fails the whole listing, so a broken price
    /// is noticed instead of the product silently disappearing.
    pub async fn list_all(&self) -> ContentResult<Vec<Product>> {
        let documents: Vec<ProductDocument> =
            self.client.fetch(&Query::documents(PRODUCT_TYPE)).await?;

        let products = documents
            .into_iter()
            .map(ProductDocument::into_product)
            .collect::<ContentResult<Vec<_>>>()?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// The product with this slug, if any.
    pub async fn get_by_slug(&self, slug: &str) -> ContentResult<Option<Product>> {
        debug!(slug = %slug, "Getting product by slug");

        let query = Query::documents(PRODUCT_TYPE)
            .where_eq("slug.current", "slug", slug)
            .first();
        let document: Option<ProductDocument> = self.client.fetch(&query).await?;

        document.map(ProductDocument::into_product).transpose()
    }

    /// Every product slug; documents without one are skipped.
    pub async fn list_slugs(&self) -> ContentResult<Vec<String>> {
        let query = Query::documents(PRODUCT_TYPE).project("{ slug { current } }");
        let rows: Vec<SlugRow> = self.client.fetch(&query).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.slug.and_then(|s| s.current))
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
