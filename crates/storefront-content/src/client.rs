//! # Content Client
//!
//! HTTP access to the content API's query endpoint.
//!
//! ## Request Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET {host}/v{api_version}/data/query/{dataset}                        │
//! │        ?query=*[_type == "product" && slug.current == $slug][0]        │
//! │        &$slug="speaker"                                                 │
//! │  Authorization: Bearer <token>          (only when configured)         │
//! │                                                                         │
//! │  200 OK                                                                 │
//! │  { "ms": 4, "query": "...", "result": <documents | document | null> }  │
//! │                                   │                                     │
//! │                                   └──► decoded into T                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::ContentConfig;
use crate::error::{ContentError, ContentResult};
use crate::query::Query;
use crate::repository::banner::BannerRepository;
use crate::repository::product::ProductRepository;

/// Longest slice of an error body kept in `ContentError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Deserialize)]
struct QueryEnvelope<T> {
    result: T,
}

/// Content API handle providing repository access.
///
/// Cheap to clone; clones share one connection pool.
///
/// ## Usage
/// ```rust,ignore
/// let client = ContentClient::new(ContentConfig::new("jl66lkg9"))?;
///
/// let banners = client.banners().list_all().await?;
/// let slugs = client.products().list_slugs().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    config: Arc<ContentConfig>,
    endpoint: Url,
}

impl ContentClient {
    /// Validates the configuration and builds the HTTP client.
    pub fn new(config: ContentConfig) -> ContentResult<Self> {
        config.validate()?;

        let endpoint = Url::parse(&format!(
            "{}/v{}/data/query/{}",
            config.api_host(),
            config.api_version,
            config.dataset
        ))
        .map_err(|e| ContentError::InvalidConfig(format!("bad API host: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ContentError::InvalidConfig(format!("HTTP client: {}", e)))?;

        info!(
            endpoint = %endpoint,
            use_cdn = config.use_cdn,
            authenticated = config.token.is_some(),
            "Content client ready"
        );

        Ok(ContentClient {
            http,
            config: Arc::new(config),
            endpoint,
        })
    }

    /// Gets the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Gets the banner repository.
    pub fn banners(&self) -> BannerRepository {
        BannerRepository::new(self.clone())
    }

    /// Full request URL for a query.
    pub fn query_url(&self, query: &Query) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &query.expression());
            for (name, value) in query.params() {
                pairs.append_pair(&name, &value);
            }
        }
        url
    }

    /// Runs a query and decodes the `result` field of the response.
    ///
    /// ## Errors
    /// - `Transport` if no response arrived (including timeouts)
    /// - `Status` for non-2xx responses, with the start of the body
    /// - `Decode` if the body is not `{ "result": T }`
    pub async fn fetch<T: DeserializeOwned>(&self, query: &Query) -> ContentResult<T> {
        let started = Instant::now();
        let url = self.query_url(query);

        let mut request = self.http.get(url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let excerpt: String = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            warn!(query = %query, status = status.as_u16(), "Content query rejected");
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let envelope: QueryEnvelope<T> = serde_json::from_slice(&body)?;

        info!(
            query = %query,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Content query"
        );

        Ok(envelope.result)
    }
}

// =============================================================================
// Tests
// =============================================================================
