//! Product detail renderer.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────┐
//! │  main image (?image=n)   │  name, ★★★★☆ (20)                     │
//! │  [thumb] [thumb] [thumb] │  Details: ...                        │
//! │                          │  $19.99                              │
//! │                          │  Quantity: [-] 1 [+]                 │
//! │                          │  [Add to cart] [Buy now]             │
//! ├──────────────────────────┴──────────────────────────────────────┤
//! │  You may also like: product cards                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::Product;

use super::{
    escape_html, image_tag, image_url, layout, render_product_card, return_to_field, PageContext,
};

/// Index of the main image: the requested one if it exists, otherwise 0.
pub fn gallery_index(product: &Product, requested: Option<usize>) -> usize {
    match requested {
        Some(index) if index < product.images.len() => index,
        _ => 0,
    }
}

/// Renders the full product page. `related` is the "You may also like"
/// strip.
pub fn render(
    ctx: &PageContext<'_>,
    product: &Product,
    image_index: usize,
    related: &[Product],
) -> String {
    let body = format!(
        r#"<div class="product-detail-container">
        {gallery}
        {description}
    </div>
    {related}"#,
        gallery = render_gallery(ctx, product, image_index),
        description = render_description(ctx, product),
        related = render_related(ctx, related),
    );

    layout(ctx, &product.name, &body)
}

fn render_gallery(ctx: &PageContext<'_>, product: &Product, image_index: usize) -> String {
    let main = image_tag(
        image_url(ctx.images, product.images.get(image_index), None, None),
        &product.name,
        "product-detail-image",
    );

    let base = format!("/product/{}", escape_html(&product.slug));
    let thumbnails: String = product
        .images
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let class = if i == image_index {
                "small-image selected-image"
            } else {
                "small-image"
            };
            format!(
                r#"<a href="{}?image={}">{}</a>"#,
                base,
                i,
                image_tag(image_url(ctx.images, Some(asset), None, None), "", class)
            )
        })
        .collect();

    format!(
        r#"<div>
            <div class="image-container">{main}</div>
            <div class="small-images-container">{thumbnails}</div>
        </div>"#,
        main = main,
        thumbnails = thumbnails,
    )
}

fn render_description(ctx: &PageContext<'_>, product: &Product) -> String {
    let return_to = return_to_field(ctx.path);
    let selector = |direction: &str, class: &str, label: &str| {
        format!(
            r#"<form method="post" action="/cart/selector">
                    <input type="hidden" name="direction" value="{direction}">
                    {return_to}
                    <button type="submit" class="{class}">{label}</button>
                </form>"#,
            direction = direction,
            return_to = return_to,
            class = class,
            label = label,
        )
    };

    format!(
        r#"<div class="product-detail-desc">
            <h1>{name}</h1>
            <div class="reviews">
                <div class="stars">&#9733;&#9733;&#9733;&#9733;&#9734;</div>
                <p>(20)</p>
            </div>
            <h4>Details:</h4>
            <p>{details}</p>
            <p class="price">{price}</p>
            <div class="quantity">
                <h3>Quantity:</h3>
                <p class="quantity-desc">
                    {minus}
                    <span class="num">{quantity}</span>
                    {plus}
                </p>
            </div>
            <div class="buttons">
                <form method="post" action="/cart/add">
                    <input type="hidden" name="slug" value="{slug}">
                    {return_to}
                    <button type="submit" class="add-to-cart">Add to cart</button>
                </form>
                <button type="button" class="buy-now">Buy now</button>
            </div>
        </div>"#,
        name = escape_html(&product.name),
        details = product
            .details
            .as_deref()
            .map(escape_html)
            .unwrap_or_default(),
        price = product.price,
        minus = selector("dec", "minus", "&minus;"),
        quantity = ctx.cart.selector_quantity,
        plus = selector("inc", "plus", "+"),
        slug = escape_html(&product.slug),
        return_to = return_to,
    )
}

fn render_related(ctx: &PageContext<'_>, related: &[Product]) -> String {
    let cards: String = related
        .iter()
        .map(|product| render_product_card(ctx.images, product))
        .collect();

    format!(
        r#"<div class="maylike-products-wrapper">
        <h2>You may also like</h2>
        <div class="marquee">
            <div class="maylike-products-container track">{cards}</div>
        </div>
    </div>"#,
        cards = cards,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{images, store};
    use storefront_core::{CartState, ImageAsset, Money};

    fn speaker() -> Product {
        Product::new("p1", "Speaker", "speaker", Money::from_cents(1999))
            .with_details("Loud & clear")
            .with_image(ImageAsset::new("image-front-800x600-png"))
            .with_image(ImageAsset::new("image-back-800x600-png"))
    }

    #[test]
    fn test_gallery_index_clamps_to_zero() {
        let product = speaker();
        assert_eq!(gallery_index(&product, None), 0);
        assert_eq!(gallery_index(&product, Some(1)), 1);
        assert_eq!(gallery_index(&product, Some(2)), 0);
        assert_eq!(gallery_index(&product, Some(usize::MAX)), 0);
    }

    #[test]
    fn test_product_page() {
        let store = store();
        let images = images();
        let mut cart = CartState::new();
        cart.set_selector_quantity(3);
        let snapshot = cart.snapshot();
        let ctx = PageContext {
            store: &store,
            images: &images,
            cart: &snapshot,
            toasts: &[],
            path: "/product/speaker?image=1",
        };
        let related = vec![Product::new("p2", "Earphones", "earphones", Money::from_cents(500))];

        let html = render(&ctx, &speaker(), 1, &related);

        assert!(html.contains("<h1>Speaker</h1>"));
        assert!(html.contains("Loud &amp; clear"));
        assert!(html.contains("$19.99"));
        assert!(html.contains(r#"<span class="num">3</span>"#));
        assert!(html.contains("(20)"));
        assert!(html.contains(r#"action="/cart/add""#));
        assert!(html.contains("Buy now"));
        assert!(html.contains("You may also like"));
        assert!(html.contains(r#"href="/product/earphones""#));
        assert!(html.contains("back-800x600.png"));
        assert!(html.contains(r#"value="/product/speaker?image=1""#));
    }
}
