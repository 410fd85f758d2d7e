//! # Banner Repository
//!
//! Content queries for promotional banners. Banner text fields are all
//! optional; only `_id` is required.

use serde::Deserialize;
use tracing::debug;

use storefront_core::Banner;

use super::ImageDocument;
use crate::client::ContentClient;
use crate::error::{ContentError, ContentResult};
use crate::query::Query;
use crate::BANNER_TYPE;

/// A banner as stored in the content lake.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDocument {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub image: Option<ImageDocument>,
    pub button_text: Option<String>,
    pub product: Option<String>,
    pub desc: Option<String>,
    pub small_text: Option<String>,
    pub mid_text: Option<String>,
    pub large_text1: Option<String>,
    pub large_text2: Option<String>,
    pub discount: Option<String>,
    pub sale_time: Option<String>,
}

impl BannerDocument {
    pub fn into_banner(self) -> ContentResult<Banner> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ContentError::invalid_document(BANNER_TYPE, "<unknown>", "missing _id"))?;

        Ok(Banner {
            id,
            image: self.image.and_then(ImageDocument::into_asset),
            button_text: self.button_text,
            product: self.product,
            desc: self.desc,
            small_text: self.small_text,
            mid_text: self.mid_text,
            large_text1: self.large_text1,
            large_text2: self.large_text2,
            discount: self.discount,
            sale_time: self.sale_time,
        })
    }
}

/// Repository for banner queries.
#[derive(Debug, Clone)]
pub struct BannerRepository {
    client: ContentClient,
}

impl BannerRepository {
    /// Creates a new BannerRepository.
    pub fn new(client: ContentClient) -> Self {
        BannerRepository { client }
    }

    /// All banners, in content-lake order. The homepage uses the first.
    pub async fn list_all(&self) -> ContentResult<Vec<Banner>> {
        let documents: Vec<BannerDocument> =
            self.client.fetch(&Query::documents(BANNER_TYPE)).await?;

        let banners = documents
            .into_iter()
            .map(BannerDocument::into_banner)
            .collect::<ContentResult<Vec<_>>>()?;

        debug!(count = banners.len(), "Listed banners");
        Ok(banners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_maps_camel_case_fields() {
        let document: BannerDocument = serde_json::from_value(json!({
            "_id": "banner-1",
            "_type": "banner",
            "image": { "asset": { "_ref": "image-hero-1000x1000-png" } },
            "buttonText": "Shop Now",
            "product": "headphones",
            "smallText": "Beats Solo Air",
            "midText": "Summer Sale",
            "largeText1": "Fine",
            "largeText2": "Smile",
            "discount": "20% OFF",
            "saleTime": "15 Nov to 7 Dec"
        }))
        .unwrap();

        let banner = document.into_banner().unwrap();

        assert_eq!(banner.id, "banner-1");
        assert_eq!(banner.image.unwrap().asset_ref, "image-hero-1000x1000-png");
        assert_eq!(banner.button_text.as_deref(), Some("Shop Now"));
        assert_eq!(banner.large_text1.as_deref(), Some("Fine"));
        assert_eq!(banner.sale_time.as_deref(), Some("15 Nov to 7 Dec"));
        assert!(banner.desc.is_none());
    }

    #[test]
    fn test_missing_id_is_invalid() {
        let document: BannerDocument = serde_json::from_value(json!({ "midText": "x" })).unwrap();
        assert!(matches!(
            document.into_banner(),
            Err(ContentError::InvalidDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", r#"*[_type == "banner"]"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{ "_id": "b1", "midText": "Sale" }, { "_id": "b2" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentClient::new(ContentConfig::new("test1").base_url(server.uri())).unwrap();
        let banners = client.banners().list_all().await.unwrap();

        assert_eq!(banners.len(), 2);
        assert_eq!(banners[0].mid_text.as_deref(), Some("Sale"));
    }
}
