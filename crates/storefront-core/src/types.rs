//! # Domain Types
//!
//! Catalog types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Banner      │   │   ImageAsset    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (_id)       │   │  id (_id)       │   │  asset_ref      │       │
//! │  │  slug           │   │  product (slug) │   │  image-<id>-    │       │
//! │  │  name           │   │  texts, image   │   │  <W>x<H>-<fmt>  │       │
//! │  │  price          │   │  discount       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every product has:
//! - `id`: document id from the content source, used as the cart key
//! - `slug`: human-readable, used in page URLs

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_price_cents, validate_product_id, validate_product_name};

// =============================================================================
// Image Asset
// =============================================================================

/// Opaque reference to an image stored by the content source.
///
/// Resolution to a displayable URL happens outside the core
/// (see the content crate's image URL builder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    /// e.g. `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`
    pub asset_ref: String,
}

impl ImageAsset {
    pub fn new(asset_ref: impl Into<String>) -> Self {
        ImageAsset {
            asset_ref: asset_ref.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique document id; the cart key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL slug for the detail page.
    pub slug: String,

    /// Unit price.
    pub price: Money,

    /// Long description shown on the detail page.
    pub details: Option<String>,

    /// Gallery images, first one is the card/thumbnail image.
    pub images: Vec<ImageAsset>,
}

impl Product {
    /// Creates a product with no details and no images.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            price,
            details: None,
            images: Vec::new(),
        }
    }

    /// Adds detail text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Appends a gallery image.
    pub fn with_image(mut self, image: ImageAsset) -> Self {
        self.images.push(image);
        self
    }

    /// Returns the card image (first in the gallery).
    #[inline]
    pub fn primary_image(&self) -> Option<&ImageAsset> {
        self.images.first()
    }

    /// Checks that this product can be placed in a cart.
    ///
    /// ## Rules
    /// - id must be non-empty (it is the cart key)
    /// - name must be non-empty
    /// - price must be non-negative
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidProduct {
            id: self.id.clone(),
            reason,
        };

        validate_product_id(&self.id).map_err(|e| invalid(e.to_string()))?;
        validate_product_name(&self.name).map_err(|e| invalid(e.to_string()))?;
        validate_price_cents(self.price.cents()).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// Banner
// =============================================================================

/// A promotional banner. The first banner in the catalog is used for both
/// the hero banner and the footer banner on the homepage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub image: Option<ImageAsset>,
    pub button_text: Option<String>,
    /// Slug of the product the banner links to.
    pub product: Option<String>,
    pub desc: Option<String>,
    pub small_text: Option<String>,
    pub mid_text: Option<String>,
    pub large_text1: Option<String>,
    pub large_text2: Option<String>,
    pub discount: Option<String>,
    pub sale_time: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_builder() {
        let product = Product::new("p-1", "Speaker", "speaker", Money::from_cents(4999))
            .with_details("Loud.")
            .with_image(ImageAsset::new("image-a-10x10-png"))
            .with_image(ImageAsset::new("image-b-10x10-png"));

        assert_eq!(product.details.as_deref(), Some("Loud."));
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.primary_image().unwrap().asset_ref, "image-a-10x10-png");
    }

    #[test]
    fn test_product_validate() {
        let ok = Product::new("p-1", "Speaker", "speaker", Money::from_cents(0));
        assert!(ok.validate().is_ok());

        let no_id = Product::new("  ", "Speaker", "speaker", Money::from_cents(100));
        assert!(matches!(no_id.validate(), Err(CoreError::InvalidProduct { .. })));

        let negative = Product::new("p-1", "Speaker", "speaker", Money::from_cents(-1));
        assert!(matches!(negative.validate(), Err(CoreError::InvalidProduct { .. })));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::new("p-1", "Speaker", "speaker", Money::from_cents(1999))
            .with_image(ImageAsset::new("image-a-10x10-png"));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["price"], 1999);
        assert_eq!(json["images"][0]["assetRef"], "image-a-10x10-png");
    }

    #[test]
    fn test_banner_default_is_empty() {
        let banner = Banner::default();
        assert!(banner.image.is_none());
        assert!(banner.large_text1.is_none());
    }
}
