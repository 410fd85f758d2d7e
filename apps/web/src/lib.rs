//! # Storefront Web Library
//!
//! The HTTP server for the storefront: catalog pages, cart forms, the JSON
//! cart API and the cart event stream.
//!
//! ## Module Organization
//! ```text
//! storefront_web/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── config.rs       ◄─── storefront.toml + environment overrides
//! ├── error.rs        ◄─── ApiError / PageError
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── cart.rs     ◄─── CartHandle (one cart per session)
//! │   └── session.rs  ◄─── SessionStore
//! ├── routes/
//! │   ├── mod.rs      ◄─── Router
//! │   ├── session.rs  ◄─── Session cookie middleware
//! │   ├── pages.rs    ◄─── HTML pages
//! │   ├── cart.rs     ◄─── Cart form posts
//! │   ├── api.rs      ◄─── JSON API
//! │   └── events.rs   ◄─── Server-sent cart updates
//! └── render/
//!     ├── mod.rs      ◄─── Layout, navbar, cart overlay, toasts
//!     ├── home.rs     ◄─── Homepage
//!     └── product.rs  ◄─── Product detail page
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use storefront_content::{Catalog, ContentClient, ContentResult, ImageUrlBuilder, StaticCatalog};

use config::{SessionSettings, StorefrontConfig};
use state::{AppState, SessionStore};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_content=trace` - Trace the content client only
/// - Default: INFO, DEBUG for the storefront crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,storefront=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The catalog named by the config: the fixture file when one is set,
/// otherwise the live content API.
pub async fn build_catalog(config: &StorefrontConfig) -> ContentResult<Arc<dyn Catalog>> {
    let catalog: Arc<dyn Catalog> = match &config.content.fixture_path {
        Some(path) => Arc::new(StaticCatalog::load(path).await?),
        None => Arc::new(ContentClient::new(config.content.to_content_config())?),
    };
    Ok(catalog)
}

/// Shared handler state for a loaded config and catalog.
pub fn build_state(config: &StorefrontConfig, catalog: Arc<dyn Catalog>) -> Arc<AppState> {
    Arc::new(AppState::new(
        catalog,
        ImageUrlBuilder::from_config(&config.content.to_content_config()),
        config.store.clone(),
        config.session.clone(),
    ))
}

/// The application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    routes::router(state)
}

/// Periodically drops idle sessions. Runs until aborted.
pub fn spawn_session_purge(sessions: SessionStore, settings: &SessionSettings) -> JoinHandle<()> {
    let idle_timeout = settings.idle_timeout();
    let mut ticker = tokio::time::interval(settings.purge_interval());

    info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = settings.purge_interval().as_secs(),
        "Session purge task started"
    );

    tokio::spawn(async move {
        loop {
            ticker.tick().await;
            let purged = sessions.purge_idle(idle_timeout).await;
            debug!(purged, "Session purge pass");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn test_build_catalog_from_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{ "products": [ { "_id": "p1", "name": "Speaker", "slug": { "current": "speaker" }, "price": 19.99 } ] }"#,
        )
        .unwrap();

        let mut config = StorefrontConfig::default();
        config.content.fixture_path = Some(file.path().to_path_buf());

        let catalog = build_catalog(&config).await.unwrap();
        assert_eq!(catalog.product_slugs().await.unwrap(), vec!["speaker"]);
    }

    #[tokio::test]
    async fn test_build_state_uses_configured_project() {
        let mut config = StorefrontConfig::default();
        config.content.project_id = "abc123".to_string();
        config.content.dataset = "staging".to_string();
        config.session.max_sessions = 2;

        let state = build_state(&config, Arc::new(StaticCatalog::new(vec![], vec![])));
        let url = state
            .images
            .url(&storefront_core::ImageAsset::new("image-front-10x20-png"), None, None)
            .unwrap();

        assert_eq!(url, "https://cdn.sanity.io/images/abc123/staging/front-10x20.png");
        for _ in 0..5 {
            state.sessions.resolve(None).await;
        }
        assert_eq!(state.sessions.len().await, 2);
    }

    #[tokio::test]
    async fn test_bundled_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.json");
        let catalog = StaticCatalog::load(path).await.unwrap();

        assert_eq!(catalog.len(), 4);
        let banners = catalog.banners().await.unwrap();
        assert_eq!(banners[0].product.as_deref(), Some("headphones"));
        assert!(catalog.product_by_slug("headphones").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_drops_idle_sessions() {
        let sessions = SessionStore::new(16);
        sessions.resolve(None).await;

        let settings = SessionSettings {
            idle_timeout_secs: 30,
            purge_interval_secs: 10,
            ..SessionSettings::default()
        };
        let task = spawn_session_purge(sessions.clone(), &settings);

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert!(sessions.is_empty().await);

        task.abort();
    }
}
