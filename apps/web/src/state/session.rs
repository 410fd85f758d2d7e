//! # Sessions
//!
//! Maps the session cookie to that browser's cart.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request ──► cookie id? ──yes──► known? ──yes──► touch, reuse cart     │
//! │                  │                  │                                   │
//! │                  no                 no                                  │
//! │                  └────────┬─────────┘                                   │
//! │                           ▼                                             │
//! │                  new UUID v4 + empty cart + Set-Cookie                 │
//! │                                                                         │
//! │  store full (max_sessions) ──► evict the least recently seen first     │
//! │                                                                         │
//! │  purge task (every purge_interval) ──► drop sessions idle for at       │
//! │                                        least idle_timeout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::CartHandle;

#[derive(Debug)]
struct Session {
    cart: CartHandle,
    last_seen: Instant,
}

/// Result of resolving a request's session.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub id: Uuid,
    pub cart: CartHandle,
    /// True when the session was just created and the cookie must be set.
    pub created: bool,
}

/// All live sessions, at most `max_sessions` of them. Cloning shares the
/// same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        SessionStore {
            sessions: Arc::default(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the session for `id`, or creates a fresh one when `id` is
    /// missing or unknown (expired, or from a previous process).
    pub async fn resolve(&self, id: Option<Uuid>) -> ResolvedSession {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = Instant::now();
                return ResolvedSession {
                    id,
                    cart: session.cart.clone(),
                    created: false,
                };
            }
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    debug!(session = %oldest, max = self.max_sessions, "Session store full, evicted least recently seen");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let cart = CartHandle::new();
        sessions.insert(
            id,
            Session {
                cart: cart.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, "Created session");

        ResolvedSession {
            id,
            cart,
            created: true,
        }
    }

    #[cfg(test)]
    async fn get(&self, id: &Uuid) -> Option<CartHandle> {
        self.sessions.read().await.get(id).map(|s| s.cart.clone())
    }

    /// Drops sessions not seen for at least `idle_timeout`. Returns how many
    /// were dropped.
    pub async fn purge_idle(&self, idle_timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Instant::now();

        sessions.retain(|_, session| now.duration_since(session.last_seen) < idle_timeout);

        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, remaining = sessions.len(), "Purged idle sessions");
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
