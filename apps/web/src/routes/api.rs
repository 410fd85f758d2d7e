//! # JSON API
//!
//! The cart operations and catalog reads for script clients. Every cart
//! mutation answers with the post-change `CartSnapshot`.
//!
//! ## Endpoints
//! ```text
//! GET    /api/cart                   ──► CartSnapshot
//! POST   /api/cart/items             { slug, quantity? } ──► AddItemResponse
//! DELETE /api/cart/items/{id}        ──► CartSnapshot
//! PATCH  /api/cart/items/{id}        { direction } ──► CartSnapshot
//! PUT    /api/cart/selector          { quantity } ──► CartSnapshot
//! POST   /api/cart/selector/inc      ──► CartSnapshot
//! POST   /api/cart/selector/dec      ──► CartSnapshot
//! PUT    /api/cart/visibility        { visible } ──► CartSnapshot
//! GET    /api/products               ──► Product[]
//! GET    /api/products/{slug}        ──► Product
//! GET    /api/slugs                  ──► string[]
//! GET    /api/banners                ──► Banner[]
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use storefront_core::{Banner, CartSnapshot, Notification, Product, QuantityChange};

use crate::error::ApiError;
use crate::state::{AppState, CartHandle};

pub type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AddItemRequest {
    pub slug: String,
    /// Defaults to the current selector quantity.
    #[ts(optional)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct AddItemResponse {
    pub cart: CartSnapshot,
    pub notification: Notification,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct AdjustItemRequest {
    pub direction: QuantityChange,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SelectorRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct VisibilityRequest {
    pub visible: bool,
}

// =============================================================================
// Cart
// =============================================================================

/// `GET /api/cart`
pub async fn get_cart(Extension(cart): Extension<CartHandle>) -> Json<CartSnapshot> {
    Json(cart.snapshot())
}

/// `POST /api/cart/items`
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(cart): Extension<CartHandle>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> ApiResult<AddItemResponse> {
    let Json(request) = payload?;

    let product = state
        .catalog
        .product_by_slug(&request.slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &request.slug))?;

    let (notification, snapshot) = cart.with_cart_mut(|cart| {
        let quantity = request.quantity.unwrap_or_else(|| cart.selector_quantity());
        let notification = cart.add_item(&product, quantity)?;
        Ok::<_, ApiError>((notification, cart.snapshot()))
    })?;

    Ok(Json(AddItemResponse {
        cart: snapshot,
        notification,
    }))
}

/// `DELETE /api/cart/items/{id}`
pub async fn remove_item(
    Extension(cart): Extension<CartHandle>,
    Path(product_id): Path<String>,
) -> ApiResult<CartSnapshot> {
    let snapshot = cart.with_cart_mut(|cart| {
        cart.remove_item(&product_id)?;
        Ok::<_, ApiError>(cart.snapshot())
    })?;
    Ok(Json(snapshot))
}

/// `PATCH /api/cart/items/{id}`
pub async fn adjust_item(
    Extension(cart): Extension<CartHandle>,
    Path(product_id): Path<String>,
    payload: Result<Json<AdjustItemRequest>, JsonRejection>,
) -> ApiResult<CartSnapshot> {
    let Json(request) = payload?;

    let snapshot = cart.with_cart_mut(|cart| {
        cart.adjust_item_quantity(&product_id, request.direction)?;
        Ok::<_, ApiError>(cart.snapshot())
    })?;
    Ok(Json(snapshot))
}

/// `PUT /api/cart/selector`
pub async fn set_selector(
    Extension(cart): Extension<CartHandle>,
    payload: Result<Json<SelectorRequest>, JsonRejection>,
) -> ApiResult<CartSnapshot> {
    let Json(request) = payload?;

    let snapshot = cart.with_cart_mut(|cart| {
        cart.set_selector_quantity(request.quantity);
        cart.snapshot()
    });
    Ok(Json(snapshot))
}

/// `POST /api/cart/selector/inc`
pub async fn increment_selector(Extension(cart): Extension<CartHandle>) -> Json<CartSnapshot> {
    Json(cart.with_cart_mut(|cart| {
        cart.increment_selector();
        cart.snapshot()
    }))
}

/// `POST /api/cart/selector/dec`
pub async fn decrement_selector(Extension(cart): Extension<CartHandle>) -> Json<CartSnapshot> {
    Json(cart.with_cart_mut(|cart| {
        cart.decrement_selector();
        cart.snapshot()
    }))
}

/// `PUT /api/cart/visibility`
pub async fn set_visibility(
    Extension(cart): Extension<CartHandle>,
    payload: Result<Json<VisibilityRequest>, JsonRejection>,
) -> ApiResult<CartSnapshot> {
    let Json(request) = payload?;

    let snapshot = cart.with_cart_mut(|cart| {
        cart.set_visible(request.visible);
        cart.snapshot()
    });
    Ok(Json(snapshot))
}

// =============================================================================
// Catalog
// =============================================================================

/// `GET /api/products`
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Product>> {
    Ok(Json(state.catalog.all_products().await?))
}

/// `GET /api/products/{slug}`
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Product> {
    let product = state
        .catalog
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &slug))?;
    Ok(Json(product))
}

/// `GET /api/slugs`
pub async fn list_slugs(State(state): State<Arc<AppState>>) -> ApiResult<Vec<String>> {
    Ok(Json(state.catalog.product_slugs().await?))
}

/// `GET /api/banners`
pub async fn list_banners(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Banner>> {
    Ok(Json(state.catalog.banners().await?))
}
