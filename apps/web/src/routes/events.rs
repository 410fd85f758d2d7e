//! Server-sent cart updates.
//!
//! `GET /api/cart/events` sends the current snapshot first, then one
//! `cart` event per state change of the session's cart.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Extension;
use futures_util::Stream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::warn;

use storefront_core::CartSnapshot;

use crate::state::CartHandle;

/// SSE event name for cart snapshots.
pub const CART_EVENT: &str = "cart";

fn cart_event(snapshot: &CartSnapshot) -> Result<Event, axum::Error> {
    Event::default().event(CART_EVENT).json_data(snapshot)
}

/// `GET /api/cart/events`
pub async fn cart_events(
    Extension(cart): Extension<CartHandle>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    // Subscribe before reading the snapshot so no change falls in between.
    let receiver = cart.subscribe_updates();
    let initial = cart.snapshot();

    let updates = BroadcastStream::new(receiver).filter_map(|update| match update {
        Ok(snapshot) => Some(snapshot),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "Cart event subscriber lagged");
            None
        }
    });

    let stream = tokio_stream::once(initial)
        .chain(updates)
        .map(|snapshot| cart_event(&snapshot));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
