//! # storefront-content: Content Source Layer for the Storefront
//!
//! All product and banner data lives in a hosted content lake. This crate
//! queries it over HTTPS, maps its documents into `storefront-core` types
//! and resolves image references into CDN URLs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (GET /product/{slug})                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                storefront-content (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ ContentClient │    │ Repositories  │    │   Catalog    │  │   │
//! │  │   │  (client.rs)  │◄───│ ProductRepo   │◄───│  trait +     │  │   │
//! │  │   │  reqwest      │    │ BannerRepo    │    │ StaticCatalog│  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ Query (query.rs)       ImageUrlBuilder (image.rs)  │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  https://{project}.apicdn.sanity.io/v2022-12-21/data/query/production │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Project, dataset, API version, CDN and token settings
//! - [`query`] - GROQ query builder with bound parameters
//! - [`client`] - HTTP client and result envelope decoding
//! - [`repository`] - Product and banner queries plus document mapping
//! - [`image`] - Image reference → CDN URL
//! - [`catalog`] - The `Catalog` trait and the offline `StaticCatalog`
//! - [`error`] - Content error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_content::{ContentClient, ContentConfig};
//!
//! let client = ContentClient::new(ContentConfig::new("jl66lkg9"))?;
//!
//! let products = client.products().list_all().await?;
//! let speaker = client.products().get_by_slug("speaker").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{Catalog, StaticCatalog};
pub use client::ContentClient;
pub use config::ContentConfig;
pub use error::{ContentError, ContentResult};
pub use image::{ImageRef, ImageUrlBuilder};
pub use query::Query;

// Repository re-exports for convenience
pub use repository::banner::BannerRepository;
pub use repository::product::ProductRepository;

/// Document type of products in the content lake.
pub const PRODUCT_TYPE: &str = "product";

/// Document type of banners in the content lake.
pub const BANNER_TYPE: &str = "banner";
