//! # Cart Observers
//!
//! Presentation consumers subscribe to a cart and are told about every
//! state change, so they can re-render without polling.
//!
//! ## Notification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart.add_item(&product, 2)                                            │
//! │       │                                                                 │
//! │       ├── 1. arithmetic: merge/append, update totals                   │
//! │       │                                                                 │
//! │       └── 2. notify: every observer gets (CartEvent, CartSnapshot)     │
//! │                 │                                                       │
//! │                 ├──► SSE broadcaster (pushes snapshot to browser)      │
//! │                 ├──► Toast queue (keeps the Notification)              │
//! │                 └──► Tracing logger                                    │
//! │                                                                         │
//! │  No-ops (decrement at 1, hiding a hidden cart) notify nobody.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Observers run synchronously inside the mutation and must not block.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::cart::CartSnapshot;
use crate::notification::Notification;

// =============================================================================
// Events
// =============================================================================

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// A product was added (new line or merged into an existing one).
    ItemAdded {
        #[serde(rename = "productId")]
        product_id: String,
        /// Quantity actually added by this call.
        quantity: i64,
        /// The confirmation to show the user.
        notification: Notification,
    },

    /// A line was removed.
    ItemRemoved {
        #[serde(rename = "productId")]
        product_id: String,
    },

    /// A line's quantity was stepped up or down.
    QuantityChanged {
        #[serde(rename = "productId")]
        product_id: String,
        quantity: i64,
    },

    /// The product-page quantity selector moved.
    SelectorChanged { quantity: i64 },

    /// The cart overlay was shown or hidden.
    VisibilityChanged { visible: bool },
}

impl CartEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded { .. } => "item_added",
            CartEvent::ItemRemoved { .. } => "item_removed",
            CartEvent::QuantityChanged { .. } => "quantity_changed",
            CartEvent::SelectorChanged { .. } => "selector_changed",
            CartEvent::VisibilityChanged { .. } => "visibility_changed",
        }
    }

    /// The notification carried by this event, if any.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            CartEvent::ItemAdded { notification, .. } => Some(notification),
            _ => None,
        }
    }
}

// =============================================================================
// Observer Trait
// =============================================================================

/// Receives cart changes.
///
/// ## Usage
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use storefront_core::{CartEvent, CartSnapshot, CartState};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// let mut cart = CartState::new();
/// cart.subscribe(Arc::new(move |event: &CartEvent, _: &CartSnapshot| {
///     sink.lock().unwrap().push(event.kind());
/// }));
///
/// cart.set_visible(true);
/// assert_eq!(*seen.lock().unwrap(), vec!["visibility_changed"]);
/// ```
pub trait CartObserver: Send + Sync {
    fn on_cart_event(&self, event: &CartEvent, cart: &CartSnapshot);
}

impl<F> CartObserver for F
where
    F: Fn(&CartEvent, &CartSnapshot) + Send + Sync,
{
    fn on_cart_event(&self, event: &CartEvent, cart: &CartSnapshot) {
        self(event, cart)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// Registry
// =============================================================================

/// The set of observers attached to one cart.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn CartObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn notify(&self, event: &CartEvent, snapshot: &CartSnapshot) {
        for (_, observer) in &self.observers {
            observer.on_cart_event(event, snapshot);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
