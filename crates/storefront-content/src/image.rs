//! # Image URL Builder
//!
//! Turns opaque image references into CDN URLs.
//!
//! ## Reference Format
//! ```text
//! image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
//! └─┬─┘ └──────────┬───────────┘ └───┬───┘ └┬┘
//!  kind         asset id         dimensions format
//!
//! → https://cdn.sanity.io/images/{project}/{dataset}/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg
//! ```

use storefront_core::ImageAsset;

use crate::config::ContentConfig;
use crate::error::{ContentError, ContentResult};

/// Image CDN root.
pub const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

/// A parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub asset_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl ImageRef {
    /// Parses `image-<assetId>-<W>x<H>-<format>`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_content::ImageRef;
    ///
    /// let image = ImageRef::parse("image-abc123-640x480-png").unwrap();
    /// assert_eq!(image.asset_id, "abc123");
    /// assert_eq!((image.width, image.height), (640, 480));
    /// assert!(ImageRef::parse("file-abc-pdf").is_err());
    /// ```
    pub fn parse(reference: &str) -> ContentResult<Self> {
        let invalid = || ContentError::InvalidImageRef(reference.to_string());

        let rest = reference.strip_prefix("image-").ok_or_else(invalid)?;

        // Asset ids never contain '-', but split from the right anyway.
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next().ok_or_else(invalid)?;
        let dimensions = parts.next().ok_or_else(invalid)?;
        let asset_id = parts.next().ok_or_else(invalid)?;

        if asset_id.is_empty()
            || format.is_empty()
            || !format.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid());
        }

        let (width, height) = dimensions.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.parse().map_err(|_| invalid())?;
        let height: u32 = height.parse().map_err(|_| invalid())?;

        Ok(ImageRef {
            asset_id: asset_id.to_string(),
            width,
            height,
            format: format.to_string(),
        })
    }

    /// File name on the CDN: `<assetId>-<W>x<H>.<format>`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.asset_id, self.width, self.height, self.format
        )
    }
}

/// Builds CDN URLs for one project and dataset.
///
/// ## Usage
/// ```rust
/// use storefront_content::ImageUrlBuilder;
/// use storefront_core::ImageAsset;
///
/// let images = ImageUrlBuilder::new("jl66lkg9", "production");
/// let url = images
///     .url(&ImageAsset::new("image-abc-800x600-webp"), Some(400), None)
///     .unwrap();
///
/// assert_eq!(
///     url,
///     "https://cdn.sanity.io/images/jl66lkg9/production/abc-800x600.webp?w=400"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        ImageUrlBuilder {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        ImageUrlBuilder::new(config.project_id.clone(), config.dataset.clone())
    }

    /// URL for an image, optionally resized.
    pub fn url(
        &self,
        asset: &ImageAsset,
        width: Option<u32>,
        height: Option<u32>,
    ) -> ContentResult<String> {
        let image = ImageRef::parse(&asset.asset_ref)?;

        let mut url = format!(
            "{}/{}/{}/{}",
            IMAGE_CDN,
            self.project_id,
            self.dataset,
            image.file_name()
        );

        let params: Vec<String> = [("w", width), ("h", height)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect();
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        Ok(url)
    }
}
