//! # Session Cart
//!
//! One `CartState` per browser session, shared between requests.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several requests of the same session may run concurrently
//! 2. Each mutation, including its observer notifications, must be atomic
//! 3. Locks are held only for the synchronous closure, never across `.await`
//!
//! ## Observers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartHandle::new()                                                      │
//! │      │                                                                  │
//! │      ├── BroadcastObserver ──► broadcast::Sender<CartSnapshot>         │
//! │      │                          └──► GET /api/cart/events (SSE)        │
//! │      ├── ToastQueue ─────────► pending notifications                   │
//! │      │                          └──► drained by the next HTML page     │
//! │      └── TracingObserver ────► debug! per event                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

use storefront_core::{CartEvent, CartObserver, CartSnapshot, CartState, Notification};

/// Snapshots buffered per SSE subscriber before it starts lagging.
const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Notifications kept for a session that has not rendered a page yet.
pub const MAX_PENDING_TOASTS: usize = 8;

// =============================================================================
// Observers
// =============================================================================

/// Pushes every post-change snapshot to the session's SSE subscribers.
struct BroadcastObserver {
    sender: broadcast::Sender<CartSnapshot>,
}

impl CartObserver for BroadcastObserver {
    fn on_cart_event(&self, _event: &CartEvent, cart: &CartSnapshot) {
        // No receivers is the normal case when no page is listening.
        let _ = self.sender.send(cart.clone());
    }
}

/// Keeps the notifications carried by events until a page shows them.
#[derive(Debug, Default)]
struct ToastQueue {
    pending: Mutex<VecDeque<Notification>>,
}

impl ToastQueue {
    fn drain(&self) -> Vec<Notification> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.drain(..).collect()
    }
}

impl CartObserver for ToastQueue {
    fn on_cart_event(&self, event: &CartEvent, _cart: &CartSnapshot) {
        if let Some(notification) = event.notification() {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if pending.len() == MAX_PENDING_TOASTS {
                pending.pop_front();
            }
            pending.push_back(notification.clone());
        }
    }
}

struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_cart_event(&self, event: &CartEvent, cart: &CartSnapshot) {
        debug!(
            event = event.kind(),
            total_quantity = cart.total_quantity,
            total_price = cart.total_price.cents(),
            "Cart changed"
        );
    }
}

// =============================================================================
// Cart Handle
// =============================================================================

/// A session's cart plus its update channel and pending toasts.
///
/// Cloning is cheap; clones share the same cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    cart: Arc<Mutex<CartState>>,
    updates: broadcast::Sender<CartSnapshot>,
    toasts: Arc<ToastQueue>,
}

impl CartHandle {
    /// Creates an empty cart with the session observers attached.
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let toasts = Arc::new(ToastQueue::default());

        let mut cart = CartState::new();
        cart.subscribe(Arc::new(BroadcastObserver {
            sender: updates.clone(),
        }));
        cart.subscribe(toasts.clone());
        cart.subscribe(Arc::new(TracingObserver));

        CartHandle {
            cart: Arc::new(Mutex::new(cart)),
            updates,
            toasts,
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = handle.with_cart(|cart| cart.total_price());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartState) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// handle.with_cart_mut(|cart| cart.add_item(&product, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartState) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(CartState::snapshot)
    }

    /// A receiver for every snapshot produced after this call.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Takes the pending notifications, oldest first.
    pub fn take_toasts(&self) -> Vec<Notification> {
        self.toasts.drain()
    }
}

impl Default for CartHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Money, Product, QuantityChange};

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), id, Money::from_cents(cents))
    }

    #[test]
    fn test_with_cart_mut_and_snapshot() {
        let handle = CartHandle::new();
        handle
            .with_cart_mut(|cart| cart.add_item(&product("a", 1000), 2))
            .unwrap();

        let clone = handle.clone();
        assert_eq!(clone.snapshot().total_quantity, 2);
        assert_eq!(handle.with_cart(|cart| cart.total_price()), Money::from_cents(2000));
    }

    #[tokio::test]
    async fn test_updates_are_broadcast() {
        let handle = CartHandle::new();
        let mut updates = handle.subscribe_updates();

        handle
            .with_cart_mut(|cart| cart.add_item(&product("a", 1000), 1))
            .unwrap();
        handle
            .with_cart_mut(|cart| cart.adjust_item_quantity("a", QuantityChange::Increment))
            .unwrap();

        assert_eq!(updates.recv().await.unwrap().total_quantity, 1);
        assert_eq!(updates.recv().await.unwrap().total_quantity, 2);
    }

    #[test]
    fn test_toasts_collect_add_notifications() {
        let handle = CartHandle::new();
        handle.with_cart_mut(|cart| cart.set_visible(true));
        handle
            .with_cart_mut(|cart| cart.add_item(&product("a", 1000), 1))
            .unwrap();

        let toasts = handle.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "1 Product a added to the cart.");
        assert!(handle.take_toasts().is_empty());
    }

    #[test]
    fn test_toast_queue_is_bounded() {
        let handle = CartHandle::new();
        for i in 0..(MAX_PENDING_TOASTS as i64 + 3) {
            handle.with_cart_mut(|cart| cart.set_selector_quantity(i + 1));
            handle
                .with_cart_mut(|cart| cart.add_item(&product("a", 100), 1))
                .unwrap();
        }

        let toasts = handle.take_toasts();
        assert_eq!(toasts.len(), MAX_PENDING_TOASTS);
        assert!(toasts[0].message.starts_with("4 "));
    }
}
