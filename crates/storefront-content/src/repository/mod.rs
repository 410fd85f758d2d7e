//! # Repository Module
//!
//! Content queries and document mapping for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  client.products().get_by_slug("speaker")                      │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list_all(&self)                                                   │
//! │  ├── get_by_slug(&self, slug)                                          │
//! │  └── list_slugs(&self)                                                 │
//! │       │                                                                 │
//! │       │  GROQ Query                                                     │
//! │       ▼                                                                 │
//! │  Content API ──► raw documents ──► Product / Banner                    │
//! │                                                                         │
//! │  GROQ and document shapes stay in this module; callers see only        │
//! │  storefront-core types.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product listing and lookup
//! - [`BannerRepository`](banner::BannerRepository) - Banner listing

pub mod banner;
pub mod product;

use serde::Deserialize;
use storefront_core::ImageAsset;

// =============================================================================
// Shared Document Shapes
// =============================================================================

/// `{ "_type": "slug", "current": "speaker" }`
#[derive(Debug, Clone, Deserialize)]
pub struct SlugDocument {
    pub current: Option<String>,
}

/// `{ "_type": "reference", "_ref": "image-..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// `{ "_type": "image", "_key": "...", "asset": { "_ref": "image-..." } }`
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDocument {
    pub asset: Option<AssetReference>,
}

impl ImageDocument {
    /// Images without an asset (an upload that never finished) are skipped.
    pub fn into_asset(self) -> Option<ImageAsset> {
        self.asset.map(|a| ImageAsset::new(a.reference))
    }
}
