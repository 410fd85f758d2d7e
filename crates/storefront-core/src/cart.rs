//! # Cart State Container
//!
//! Single source of truth for one session's cart: its lines, the running
//! totals, the product-page quantity selector and the overlay flag.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Event                 Operation                  State Change       │
//! │  ────────                 ─────────                  ────────────       │
//! │                                                                         │
//! │  Click "Add to cart" ───► add_item() ─────────────► merge or push      │
//! │                                                      totals += line     │
//! │                                                                         │
//! │  Click ✕ on a line ─────► remove_item() ──────────► items.remove(i)    │
//! │                                                      totals -= line     │
//! │                                                                         │
//! │  Click + / − on a line ─► adjust_item_quantity() ─► qty ± 1 (min 1)    │
//! │                                                                         │
//! │  Click + / − on page ───► increment/decrement ────► selector ± 1       │
//! │                           _selector()                (min 1)            │
//! │                                                                         │
//! │  Click cart icon ───────► set_visible() ──────────► visible flag       │
//! │                                                                         │
//! │  Every change then notifies the subscribed observers once.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `total_price == Σ unit_price × quantity` over items
//! - `total_quantity == Σ quantity` over items
//! - Every line has quantity in `1..=MAX_ITEM_QUANTITY` (decrement at 1 is
//!   a no-op, adds and increments past the ceiling are rejected)
//! - Lines are unique by product id (adding the same product merges)
//! - `selector_quantity >= 1`

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::notification::Notification;
use crate::observer::{CartEvent, CartObserver, ObserverRegistry, SubscriptionId};
use crate::types::{ImageAsset, Product};
use crate::validation::validate_quantity;
use crate::{DEFAULT_SELECTOR_QUANTITY, MAX_ITEM_QUANTITY, MIN_SELECTOR_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// The product fields are a frozen snapshot taken when the product was
/// first added. A later content edit does not change what the cart shows
/// or what it totals to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id (the cart key).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Product slug, for linking back to the detail page.
    pub slug: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Card image at time of adding.
    pub image: Option<ImageAsset>,

    /// Quantity in cart, always >= 1.
    pub quantity: i64,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            unit_price: product.price,
            image: product.primary_image().cloned(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Quantity Direction
// =============================================================================

/// Direction for stepping a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuantityChange {
    #[serde(rename = "inc")]
    Increment,
    #[serde(rename = "dec")]
    Decrement,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only copy of the cart, handed to observers and serialized to the
/// browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total_price: Money,
    pub total_quantity: i64,
    pub selector_quantity: i64,
    pub visible: bool,
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart state container.
///
/// Totals are kept as running values updated by each operation rather than
/// recomputed on read; [`CartState::is_consistent`] checks them against the
/// lines.
#[derive(Debug)]
pub struct CartState {
    items: Vec<CartItem>,
    total_price: Money,
    total_quantity: i64,
    selector_quantity: i64,
    visible: bool,
    observers: ObserverRegistry,
}

impl CartState {
    /// Creates an empty, hidden cart with the selector at 1.
    pub fn new() -> Self {
        CartState {
            items: Vec::new(),
            total_price: Money::zero(),
            total_quantity: 0,
            selector_quantity: DEFAULT_SELECTOR_QUANTITY,
            visible: false,
            observers: ObserverRegistry::default(),
        }
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Registers an observer; it is called after every state change.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    /// Removes an observer. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn emit(&self, event: CartEvent) {
        debug!(event = event.kind(), total_quantity = self.total_quantity, "cart changed");
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.observers.notify(&event, &snapshot);
    }

    // =========================================================================
    // Line Operations
    // =========================================================================

    /// Adds a product to the cart or merges into its existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: that line's quantity grows by `quantity`,
    ///   in place; other lines are untouched
    /// - Otherwise: a new snapshot line is appended
    /// - `total_price += price × quantity`, `total_quantity += quantity`,
    ///   where a merge charges the line's frozen unit price
    ///
    /// ## Returns
    /// The confirmation notification. Its count is the *selector* quantity
    /// at call time, which is what the product page shows next to the
    /// button; the [`CartEvent::ItemAdded`] event carries the quantity
    /// actually added.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` or the merged line quantity is outside
    ///   `1..=MAX_ITEM_QUANTITY`, or the cart total would overflow
    /// - `InvalidProduct` if the product has no id, no name or a negative price
    ///
    /// Every check runs before the cart is touched; a failed add changes
    /// nothing.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<Notification> {
        validate_quantity(quantity)?;
        product.validate()?;

        let position = self.position(&product.id);
        let unit_price = match position {
            Some(index) => {
                let item = &self.items[index];
                validate_quantity(item.quantity.saturating_add(quantity))?;
                item.unit_price
            }
            None => product.price,
        };
        let (total_price, total_quantity) = self.totals_after(unit_price, quantity)?;

        match position {
            Some(index) => self.items[index].quantity += quantity,
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        self.total_price = total_price;
        self.total_quantity = total_quantity;

        let notification = Notification::added_to_cart(self.selector_quantity, &product.name);
        self.emit(CartEvent::ItemAdded {
            product_id: product.id.clone(),
            quantity,
            notification: notification.clone(),
        });

        Ok(notification)
    }

    /// Removes a line by product id.
    ///
    /// ## Errors
    /// `ItemNotInCart` if there is no such line; the cart is unchanged.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<CartItem> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))?;

        let removed = self.items.remove(index);
        self.total_price -= removed.line_total();
        self.total_quantity -= removed.quantity;

        self.emit(CartEvent::ItemRemoved {
            product_id: removed.product_id.clone(),
        });

        Ok(removed)
    }

    /// Steps a line's quantity up or down by one.
    ///
    /// ## Behavior
    /// - Increment: quantity + 1, totals grow by one unit price
    /// - Decrement: only when quantity > 1; at 1 nothing changes and the
    ///   line is never removed by this path
    ///
    /// ## Returns
    /// The line's quantity after the call.
    ///
    /// ## Errors
    /// - `ItemNotInCart` if there is no such line
    /// - `Validation` if an increment would pass `MAX_ITEM_QUANTITY`
    ///
    /// The cart is unchanged on error.
    pub fn adjust_item_quantity(
        &mut self,
        product_id: &str,
        change: QuantityChange,
    ) -> CoreResult<i64> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))?;

        let current = self.items[index].quantity;
        let unit_price = self.items[index].unit_price;

        match change {
            QuantityChange::Increment => {
                validate_quantity(current.saturating_add(1))?;
                let (total_price, total_quantity) = self.totals_after(unit_price, 1)?;
                self.items[index].quantity += 1;
                self.total_price = total_price;
                self.total_quantity = total_quantity;
            }
            QuantityChange::Decrement => {
                if current <= 1 {
                    return Ok(current);
                }
                self.items[index].quantity -= 1;
                self.total_price -= unit_price;
                self.total_quantity -= 1;
            }
        }

        let quantity = self.items[index].quantity;
        self.emit(CartEvent::QuantityChanged {
            product_id: product_id.to_string(),
            quantity,
        });

        Ok(quantity)
    }

    // =========================================================================
    // Selector
    // =========================================================================

    /// Sets the selector, clamping anything below 1 up to 1.
    pub fn set_selector_quantity(&mut self, quantity: i64) -> i64 {
        let clamped = quantity.max(MIN_SELECTOR_QUANTITY);
        if clamped != self.selector_quantity {
            self.selector_quantity = clamped;
            self.emit(CartEvent::SelectorChanged { quantity: clamped });
        }
        self.selector_quantity
    }

    /// Selector + 1.
    pub fn increment_selector(&mut self) -> i64 {
        self.set_selector_quantity(self.selector_quantity.saturating_add(1))
    }

    /// Selector − 1, never below 1.
    pub fn decrement_selector(&mut self) -> i64 {
        self.set_selector_quantity(self.selector_quantity - 1)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Shows or hides the cart overlay. Setting the current value is a no-op.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.emit(CartEvent::VisibilityChanged { visible });
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn total_quantity(&self) -> i64 {
        self.total_quantity
    }

    pub fn selector_quantity(&self) -> i64 {
        self.selector_quantity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks the running totals against the lines.
    pub fn is_consistent(&self) -> bool {
        let price: Money = self.items.iter().map(CartItem::line_total).sum();
        let quantity: i64 = self.items.iter().map(|i| i.quantity).sum();
        let unique = self
            .items
            .iter()
            .enumerate()
            .all(|(n, item)| self.items[..n].iter().all(|o| o.product_id != item.product_id));

        price == self.total_price
            && quantity == self.total_quantity
            && unique
            && self
                .items
                .iter()
                .all(|i| (1..=MAX_ITEM_QUANTITY).contains(&i.quantity))
            && self.selector_quantity >= MIN_SELECTOR_QUANTITY
    }

    /// Copies the current state out.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_price: self.total_price,
            total_quantity: self.total_quantity,
            selector_quantity: self.selector_quantity,
            visible: self.visible,
        }
    }

    /// Running totals after charging `quantity` more units at `unit_price`.
    fn totals_after(&self, unit_price: Money, quantity: i64) -> CoreResult<(Money, i64)> {
        let price = unit_price
            .checked_multiply_quantity(quantity)
            .and_then(|charge| self.total_price.checked_add(charge));
        let count = self.total_quantity.checked_add(quantity);

        match (price, count) {
            (Some(price), Some(count)) => Ok((price, count)),
            _ => Err(ValidationError::OutOfRange {
                field: "total_price".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into()),
        }
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
