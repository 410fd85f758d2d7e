//! # Content Source Configuration
//!
//! Where the content lake lives and how to reach it.
//!
//! ## Host Selection
//! ```text
//! use_cdn = true   →  https://{project}.apicdn.sanity.io   (cached, public reads)
//! use_cdn = false  →  https://{project}.api.sanity.io      (fresh, live API)
//! base_url = Some  →  that URL verbatim (tests, proxies)
//! ```

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;

use crate::error::{ContentError, ContentResult};

/// Default dataset name.
pub const DEFAULT_DATASET: &str = "production";

/// Default API version (a date, as the content API expects).
pub const DEFAULT_API_VERSION: &str = "2022-12-21";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Content source configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use storefront_content::ContentConfig;
///
/// let config = ContentConfig::new("jl66lkg9")
///     .dataset("staging")
///     .use_cdn(false)
///     .timeout(Duration::from_secs(3));
///
/// assert_eq!(config.api_host(), "https://jl66lkg9.api.sanity.io");
/// ```
#[derive(Clone)]
pub struct ContentConfig {
    /// Project id, the first label of the API host.
    pub project_id: String,

    /// Dataset name.
    /// Default: `production`
    pub dataset: String,

    /// API version date.
    /// Default: `2022-12-21`
    pub api_version: String,

    /// Read through the API CDN.
    /// Default: true
    pub use_cdn: bool,

    /// Bearer token for private datasets.
    pub token: Option<String>,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Overrides the computed API host.
    pub base_url: Option<String>,
}

impl ContentConfig {
    /// Creates a configuration for a project with default settings.
    pub fn new(project_id: impl Into<String>) -> Self {
        ContentConfig {
            project_id: project_id.into(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_cdn: true,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Sets the dataset.
    pub fn dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Sets the API version date.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets whether reads go through the CDN.
    pub fn use_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    /// Sets the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points the client at a different host.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns the API host without a trailing slash.
    pub fn api_host(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.use_cdn => format!("https://{}.apicdn.sanity.io", self.project_id),
            None => format!("https://{}.api.sanity.io", self.project_id),
        }
    }

    /// Checks the configuration before any request is made.
    ///
    /// ## Rules
    /// - project id: non-empty, lowercase letters, digits and hyphens
    /// - dataset: non-empty, lowercase letters, digits, `_` and `-`
    /// - api version: a `YYYY-MM-DD` date
    /// - timeout: non-zero
    pub fn validate(&self) -> ContentResult<()> {
        let invalid = |msg: String| Err(ContentError::InvalidConfig(msg));

        if self.project_id.is_empty()
            || !self
                .project_id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return invalid(format!("project id '{}' is not valid", self.project_id));
        }

        if self.dataset.is_empty()
            || !self
                .dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return invalid(format!("dataset '{}' is not valid", self.dataset));
        }

        if NaiveDate::parse_from_str(&self.api_version, "%Y-%m-%d").is_err() {
            return invalid(format!(
                "api version '{}' must be a YYYY-MM-DD date",
                self.api_version
            ));
        }

        if self.timeout.is_zero() {
            return invalid("timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}

// Token stays out of logs.
impl fmt::Debug for ContentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}
