//! HTML page handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::Html;
use axum::Extension;
use serde::Deserialize;
use tracing::debug;

use storefront_core::validation::validate_slug;
use storefront_core::CartSnapshot;
use storefront_core::Notification;

use crate::error::{ApiError, PageError};
use crate::render::{self, PageContext};
use crate::state::{AppState, CartHandle};

/// Query string of the product page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPageQuery {
    /// Gallery index. Kept as text so a garbage value falls back to the
    /// first image instead of rejecting the request.
    pub image: Option<String>,
}

fn page_path(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

fn page_context<'a>(
    state: &'a AppState,
    cart: &'a CartSnapshot,
    toasts: &'a [Notification],
    path: &'a str,
) -> PageContext<'a> {
    PageContext {
        store: &state.store,
        images: &state.images,
        cart,
        toasts,
        path,
    }
}

/// `GET /`
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(cart): Extension<CartHandle>,
    uri: Uri,
) -> Result<Html<String>, PageError> {
    let (products, banners) =
        tokio::try_join!(state.catalog.all_products(), state.catalog.banners())?;
    debug!(products = products.len(), banners = banners.len(), "Rendering homepage");

    let snapshot = cart.snapshot();
    let toasts = cart.take_toasts();
    let ctx = page_context(&state, &snapshot, &toasts, page_path(&uri));

    Ok(Html(render::home::render(&ctx, &products, &banners)))
}

/// `GET /product/{slug}`
pub async fn product(
    State(state): State<Arc<AppState>>,
    Extension(cart): Extension<CartHandle>,
    Path(slug): Path<String>,
    Query(query): Query<ProductPageQuery>,
    uri: Uri,
) -> Result<Html<String>, PageError> {
    if validate_slug(&slug).is_err() {
        return Err(ApiError::not_found("Product", &slug).into());
    }

    let (product, related) = tokio::try_join!(
        state.catalog.product_by_slug(&slug),
        state.catalog.all_products()
    )?;
    let product = product.ok_or_else(|| ApiError::not_found("Product", &slug))?;

    let requested = query.image.and_then(|raw| raw.parse::<usize>().ok());
    let image_index = render::product::gallery_index(&product, requested);

    let snapshot = cart.snapshot();
    let toasts = cart.take_toasts();
    let ctx = page_context(&state, &snapshot, &toasts, page_path(&uri));

    Ok(Html(render::product::render(
        &ctx,
        &product,
        image_index,
        &related,
    )))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> PageError {
    ApiError::not_found("Page", uri.path()).into()
}
