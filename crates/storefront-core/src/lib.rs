//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart
//! state container and the catalog domain types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Browser (HTML pages, SSE)                     │   │
//! │  │    Home ──► Product Detail ──► Cart Overlay ──► Toasts          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/web (axum handlers)                     │   │
//! │  │    add_to_cart, remove_item, adjust_item, selector, etc.       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ CartState │  │   rules   │  │   │
//! │  │   │  Banner   │  │           │  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-content (Content Source)                │   │
//! │  │            GROQ queries, product/banner repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Product, Banner, ImageAsset)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart state container
//! - [`observer`] - Cart events and the observer trait
//! - [`notification`] - Transient user-facing messages
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{CartState, Money, Product};
//!
//! let product = Product::new("p-1", "Boat Headphones", "boat-headphones", Money::from_cents(1000));
//!
//! let mut cart = CartState::new();
//! cart.add_item(&product, 2).unwrap();
//!
//! assert_eq!(cart.total_price(), Money::from_cents(2000));
//! assert_eq!(cart.total_quantity(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod notification;
pub mod observer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartItem, CartSnapshot, CartState, QuantityChange};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use notification::{Notification, NotificationLevel};
pub use observer::{CartEvent, CartObserver, SubscriptionId};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Starting value of the quantity selector on a product page.
pub const DEFAULT_SELECTOR_QUANTITY: i64 = 1;

/// The selector never goes below this value.
pub const MIN_SELECTOR_QUANTITY: i64 = 1;

/// Maximum quantity of one cart line.
///
/// Applies to what is added and to the merged line. The selector itself is
/// unbounded; adding a selector value above this is rejected.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a product slug.
pub const MAX_SLUG_LENGTH: usize = 96;
