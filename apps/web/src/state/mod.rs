//! # State Module
//!
//! Shared state for the axum handlers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Router::with_state(Arc<AppState>)                                     │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ dyn Catalog  │  │ SessionStore │  │  StoreSettings   │              │
//! │  │              │  │              │  │  ImageUrlBuilder │              │
//! │  │ products,    │  │ Uuid ──►     │  │                  │              │
//! │  │ banners      │  │  CartHandle  │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Catalog: read-only, Send + Sync                                     │
//! │  • SessionStore: RwLock over the map, one Mutex per cart               │
//! │  • Settings and image builder: read-only after startup                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;

pub use cart::{CartHandle, MAX_PENDING_TOASTS};
pub use session::{ResolvedSession, SessionStore};

use std::sync::Arc;

use storefront_content::{Catalog, ImageUrlBuilder};

use crate::config::{SessionSettings, StoreSettings};

/// Everything a handler can reach through `State`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub images: ImageUrlBuilder,
    pub sessions: SessionStore,
    pub store: StoreSettings,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        images: ImageUrlBuilder,
        store: StoreSettings,
        session: SessionSettings,
    ) -> Self {
        AppState {
            catalog,
            images,
            sessions: SessionStore::new(session.max_sessions),
            store,
            session,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("images", &self.images)
            .field("store", &self.store)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
