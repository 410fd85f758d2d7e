//! # Cart Form Handlers
//!
//! Browser-facing cart operations. Each is a form POST that mutates the
//! session cart and answers `303 See Other` back to the page the form was
//! on, so a refresh never resubmits.
//!
//! ```text
//! POST /cart/add         slug, quantity?   ──► add_item (defaults to the selector)
//! POST /cart/remove      product_id        ──► remove_item
//! POST /cart/adjust      product_id, direction (inc|dec)
//! POST /cart/selector    quantity? | direction
//! POST /cart/visibility  visible
//! ```

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Redirect;
use axum::{Extension, Form};
use serde::Deserialize;
use tracing::debug;

use storefront_core::QuantityChange;

use crate::error::{ApiError, PageError};
use crate::state::{AppState, CartHandle};

#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub slug: String,
    pub quantity: Option<i64>,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustForm {
    pub product_id: String,
    pub direction: QuantityChange,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectorForm {
    pub quantity: Option<i64>,
    pub direction: Option<QuantityChange>,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityForm {
    pub visible: bool,
    pub return_to: Option<String>,
}

/// Where to send the browser after a form post. Only same-site paths are
/// accepted; anything else goes to the homepage.
pub fn safe_return_to(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn back(return_to: Option<&str>) -> Redirect {
    Redirect::to(safe_return_to(return_to))
}

/// `POST /cart/add`
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(cart): Extension<CartHandle>,
    form: Result<Form<AddForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;

    let product = state
        .catalog
        .product_by_slug(&form.slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &form.slug))?;

    let notification = cart.with_cart_mut(|cart| {
        let quantity = form.quantity.unwrap_or_else(|| cart.selector_quantity());
        cart.add_item(&product, quantity)
    })?;
    debug!(slug = %form.slug, message = %notification.message, "Added from form");

    Ok(back(form.return_to.as_deref()))
}

/// `POST /cart/remove`
pub async fn remove(
    Extension(cart): Extension<CartHandle>,
    form: Result<Form<RemoveForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;

    cart.with_cart_mut(|cart| cart.remove_item(&form.product_id))?;

    Ok(back(form.return_to.as_deref()))
}

/// `POST /cart/adjust`
pub async fn adjust(
    Extension(cart): Extension<CartHandle>,
    form: Result<Form<AdjustForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;

    cart.with_cart_mut(|cart| cart.adjust_item_quantity(&form.product_id, form.direction))?;

    Ok(back(form.return_to.as_deref()))
}

/// `POST /cart/selector`
///
/// An explicit `quantity` wins over `direction`.
pub async fn selector(
    Extension(cart): Extension<CartHandle>,
    form: Result<Form<SelectorForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;

    match (form.quantity, form.direction) {
        (Some(quantity), _) => {
            cart.with_cart_mut(|cart| cart.set_selector_quantity(quantity));
        }
        (None, Some(QuantityChange::Increment)) => {
            cart.with_cart_mut(|cart| cart.increment_selector());
        }
        (None, Some(QuantityChange::Decrement)) => {
            cart.with_cart_mut(|cart| cart.decrement_selector());
        }
        (None, None) => {
            return Err(ApiError::validation("Either quantity or direction is required").into());
        }
    }

    Ok(back(form.return_to.as_deref()))
}

/// `POST /cart/visibility`
pub async fn visibility(
    Extension(cart): Extension<CartHandle>,
    form: Result<Form<VisibilityForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let Form(form) = form?;

    cart.with_cart_mut(|cart| cart.set_visible(form.visible));

    Ok(back(form.return_to.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/product/speaker?image=1")), "/product/speaker?image=1");
        assert_eq!(safe_return_to(Some("/")), "/");
        assert_eq!(safe_return_to(None), "/");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/");
        assert_eq!(safe_return_to(Some("//evil.example")), "/");
        assert_eq!(safe_return_to(Some("/\\evil.example")), "/");
        assert_eq!(safe_return_to(Some("")), "/");
    }
}
