//! # HTML Rendering
//!
//! Server-side rendering of the storefront pages. Every page is a plain
//! string built from small section renderers; interactivity is HTML forms
//! posting to the `/cart/*` endpoints, which redirect back to the page.
//!
//! ## Page Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  layout()                                                               │
//! │  ├── render_navbar()        store name, cart icon with total quantity  │
//! │  ├── render_toasts()        notifications queued since the last page   │
//! │  ├── <main> page body       home::render / product::render             │
//! │  ├── render_cart()          overlay, only when the cart is visible     │
//! │  └── footer                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All catalog text is escaped with [`escape_html`] before it reaches
//! the output.

pub mod home;
pub mod product;

use axum::http::StatusCode;
use tracing::warn;

use storefront_content::ImageUrlBuilder;
use storefront_core::{CartItem, CartSnapshot, ImageAsset, Notification, NotificationLevel, Product};

use crate::config::StoreSettings;

/// Everything the shared page chrome needs.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub store: &'a StoreSettings,
    pub images: &'a ImageUrlBuilder,
    pub cart: &'a CartSnapshot,
    pub toasts: &'a [Notification],
    /// Path (with query) of the page being rendered; forms redirect here.
    pub path: &'a str,
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// CDN URL for an image, or `None` when there is no image or its
/// reference is malformed.
pub fn image_url(
    images: &ImageUrlBuilder,
    asset: Option<&ImageAsset>,
    width: Option<u32>,
    height: Option<u32>,
) -> Option<String> {
    let asset = asset?;
    match images.url(asset, width, height) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(asset = %asset.asset_ref, error = %e, "Skipping unrenderable image");
            None
        }
    }
}

fn image_tag(url: Option<String>, alt: &str, class: &str) -> String {
    match url {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" class="{}">"#,
            escape_html(&url),
            escape_html(alt),
            class
        ),
        None => format!(r#"<div class="{} image-placeholder"></div>"#, class),
    }
}

/// A hidden `return_to` field pointing back at the current page.
fn return_to_field(path: &str) -> String {
    format!(
        r#"<input type="hidden" name="return_to" value="{}">"#,
        escape_html(path)
    )
}

// =============================================================================
// Layout
// =============================================================================

/// Wraps a page body in the document shell, navbar, toasts and cart overlay.
pub fn layout(ctx: &PageContext<'_>, title: &str, body: &str) -> String {
    let cart = if ctx.cart.visible {
        render_cart(ctx)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
</head>
<body>
<div class="layout">
    {navbar}
    {toasts}
    <main class="main-container">
        {body}
    </main>
    {cart}
    <footer class="footer-container">
        <p>{year_line}</p>
    </footer>
</div>
</body>
</html>"#,
        title = escape_html(title),
        navbar = render_navbar(ctx),
        toasts = render_toasts(ctx.toasts),
        body = body,
        cart = cart,
        year_line = escape_html(&format!("{} All rights reserved", ctx.store.name)),
    )
}

/// Store name linking home, and the cart button with the total quantity.
pub fn render_navbar(ctx: &PageContext<'_>) -> String {
    format!(
        r#"<nav class="navbar-container">
        <p class="logo"><a href="/">{name}</a></p>
        <form method="post" action="/cart/visibility" class="cart-icon-form">
            <input type="hidden" name="visible" value="true">
            {return_to}
            <button type="submit" class="cart-icon" aria-label="Open cart">
                <span class="cart-item-qty">{quantity}</span>
            </button>
        </form>
    </nav>"#,
        name = escape_html(&ctx.store.name),
        return_to = return_to_field(ctx.path),
        quantity = ctx.cart.total_quantity,
    )
}

/// Pending notifications, oldest first.
pub fn render_toasts(toasts: &[Notification]) -> String {
    if toasts.is_empty() {
        return String::new();
    }

    let items: String = toasts
        .iter()
        .map(|toast| {
            let level = match toast.level {
                NotificationLevel::Success => "success",
                NotificationLevel::Info => "info",
                NotificationLevel::Error => "error",
            };
            format!(
                r#"<div class="toast toast--{}" role="status">{}</div>"#,
                level,
                escape_html(&toast.message)
            )
        })
        .collect();

    format!(r#"<div class="toasts">{}</div>"#, items)
}

// =============================================================================
// Cart Overlay
// =============================================================================

/// The cart overlay: heading with the item count, lines with quantity
/// controls, and the subtotal. An empty cart offers a way back to the shop.
pub fn render_cart(ctx: &PageContext<'_>) -> String {
    let cart = ctx.cart;
    let return_to = return_to_field(ctx.path);

    let back_button = hide_cart_button(&return_to, "cart-heading", "&lt; Your Cart");
    let continue_button = hide_cart_button(&return_to, "btn", "Continue Shopping");

    let content = if cart.items.is_empty() {
        format!(
            r#"<div class="empty-cart">
            <h3>Your shopping bag is empty</h3>
            {continue_button}
        </div>"#,
            continue_button = continue_button
        )
    } else {
        let lines: String = cart
            .items
            .iter()
            .map(|item| render_cart_line(ctx, item))
            .collect();
        format!(
            r#"<div class="product-container">{lines}</div>
        <div class="cart-bottom">
            <div class="total">
                <h3>Subtotal:</h3>
                <h3>{subtotal}</h3>
            </div>
        </div>"#,
            lines = lines,
            subtotal = cart.total_price,
        )
    };

    format!(
        r#"<aside class="cart-wrapper">
    <div class="cart-container">
        {back_button}
        <p class="cart-num-items">({count} items)</p>
        {content}
    </div>
</aside>"#,
        back_button = back_button,
        count = cart.total_quantity,
        content = content,
    )
}

fn hide_cart_button(return_to: &str, class: &str, label: &str) -> String {
    format!(
        r#"<form method="post" action="/cart/visibility">
            <input type="hidden" name="visible" value="false">
            {return_to}
            <button type="submit" class="{class}">{label}</button>
        </form>"#,
        return_to = return_to,
        class = class,
        label = label,
    )
}

fn render_cart_line(ctx: &PageContext<'_>, item: &CartItem) -> String {
    let return_to = return_to_field(ctx.path);
    let id = escape_html(&item.product_id);
    let adjust = |direction: &str, label: &str| {
        format!(
            r#"<form method="post" action="/cart/adjust">
                <input type="hidden" name="product_id" value="{id}">
                <input type="hidden" name="direction" value="{direction}">
                {return_to}
                <button type="submit" class="{direction}">{label}</button>
            </form>"#,
            id = id,
            direction = direction,
            return_to = return_to,
            label = label,
        )
    };

    format!(
        r#"<div class="product" data-product-id="{id}">
        {image}
        <div class="item-desc">
            <div class="flex top">
                <h5>{name}</h5>
                <h4>{price}</h4>
            </div>
            <div class="flex bottom">
                <p class="quantity-desc">
                    {minus}
                    <span class="num">{quantity}</span>
                    {plus}
                </p>
                <form method="post" action="/cart/remove">
                    <input type="hidden" name="product_id" value="{id}">
                    {return_to}
                    <button type="submit" class="remove-item">Remove</button>
                </form>
            </div>
        </div>
    </div>"#,
        id = id,
        image = image_tag(
            image_url(ctx.images, item.image.as_ref(), None, None),
            &item.name,
            "cart-product-image"
        ),
        name = escape_html(&item.name),
        price = item.unit_price,
        minus = adjust("dec", "&minus;"),
        quantity = item.quantity,
        plus = adjust("inc", "+"),
        return_to = return_to,
    )
}

// =============================================================================
// Shared Sections
// =============================================================================

/// A product card linking to the product page.
pub fn render_product_card(images: &ImageUrlBuilder, product: &Product) -> String {
    format!(
        r#"<div class="product-card">
        <a href="/product/{slug}">
            {image}
            <p class="product-name">{name}</p>
            <p class="product-price">{price}</p>
        </a>
    </div>"#,
        slug = escape_html(&product.slug),
        image = image_tag(
            image_url(images, product.primary_image(), Some(250), Some(250)),
            &product.name,
            "product-image"
        ),
        name = escape_html(&product.name),
        price = product.price,
    )
}

/// Standalone page for errors on browser-facing routes.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{code} {reason}</title>
</head>
<body>
<main class="error-page">
    <h1>{code} {reason}</h1>
    <p>{message}</p>
    <a href="/">Back to the store</a>
</main>
</body>
</html>"#,
        code = status.as_u16(),
        reason = escape_html(reason),
        message = escape_html(message),
    )
}
