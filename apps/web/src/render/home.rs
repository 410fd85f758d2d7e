//! Homepage renderer: hero banner, product grid, footer banner.
//!
//! The first banner in the catalog feeds both the hero and the footer
//! banner. With no banners both sections are left out.

use storefront_content::ImageUrlBuilder;
use storefront_core::{Banner, Product};

use super::{escape_html, image_tag, image_url, layout, render_product_card, PageContext};

/// Renders the full homepage.
pub fn render(ctx: &PageContext<'_>, products: &[Product], banners: &[Banner]) -> String {
    let featured = banners.first();

    let grid: String = products
        .iter()
        .map(|product| render_product_card(ctx.images, product))
        .collect();

    let body = format!(
        r#"{hero}
    <div class="products-heading">
        <h2>{heading}</h2>
        <p>{subheading}</p>
    </div>
    <div class="products-container">{grid}</div>
    {footer}"#,
        hero = featured
            .map(|banner| render_hero_banner(ctx.images, banner))
            .unwrap_or_default(),
        heading = escape_html(&ctx.store.products_heading),
        subheading = escape_html(&ctx.store.products_subheading),
        grid = grid,
        footer = featured
            .map(|banner| render_footer_banner(ctx.images, banner))
            .unwrap_or_default(),
    );

    layout(ctx, &ctx.store.name, &body)
}

fn text(field: &Option<String>) -> String {
    field.as_deref().map(escape_html).unwrap_or_default()
}

fn banner_link(banner: &Banner) -> String {
    match banner.product.as_deref() {
        Some(slug) => format!(
            r#"<a href="/product/{}"><button type="button">{}</button></a>"#,
            escape_html(slug),
            text(&banner.button_text)
        ),
        None => String::new(),
    }
}

/// The large banner at the top of the homepage.
pub fn render_hero_banner(images: &ImageUrlBuilder, banner: &Banner) -> String {
    format!(
        r#"<section class="hero-banner-container">
        <div>
            <p class="beats-solo">{small_text}</p>
            <h3>{mid_text}</h3>
            <h1>{large_text}</h1>
            {image}
            <div>
                {link}
                <div class="desc">
                    <h5>Description</h5>
                    <p>{desc}</p>
                </div>
            </div>
        </div>
    </section>"#,
        small_text = text(&banner.small_text),
        mid_text = text(&banner.mid_text),
        large_text = text(&banner.large_text1),
        image = image_tag(
            image_url(images, banner.image.as_ref(), None, None),
            banner.small_text.as_deref().unwrap_or_default(),
            "hero-banner-image"
        ),
        link = banner_link(banner),
        desc = text(&banner.desc),
    )
}

/// The sale banner at the bottom of the homepage.
pub fn render_footer_banner(images: &ImageUrlBuilder, banner: &Banner) -> String {
    format!(
        r#"<section class="footer-banner-container">
        <div class="banner-desc">
            <div class="left">
                <p>{discount}</p>
                <h3>{large_text1}</h3>
                <h3>{large_text2}</h3>
                <p>{sale_time}</p>
            </div>
            <div class="right">
                <p>{small_text}</p>
                <h3>{mid_text}</h3>
                <p>{desc}</p>
                {link}
            </div>
            {image}
        </div>
    </section>"#,
        discount = text(&banner.discount),
        large_text1 = text(&banner.large_text1),
        large_text2 = text(&banner.large_text2),
        sale_time = text(&banner.sale_time),
        small_text = text(&banner.small_text),
        mid_text = text(&banner.mid_text),
        desc = text(&banner.desc),
        link = banner_link(banner),
        image = image_tag(
            image_url(images, banner.image.as_ref(), None, None),
            "",
            "footer-banner-image"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{images, store};
    use storefront_core::{CartState, Money};

    fn banner() -> Banner {
        Banner {
            id: "b1".into(),
            button_text: Some("Shop Now".into()),
            product: Some("headphones".into()),
            small_text: Some("Beats Solo Air".into()),
            mid_text: Some("Summer Sale".into()),
            large_text1: Some("FINE".into()),
            large_text2: Some("SMILE".into()),
            discount: Some("20% OFF".into()),
            sale_time: Some("15 Nov to 7 Dec".into()),
            ..Banner::default()
        }
    }

    #[test]
    fn test_homepage_sections() {
        let store = store();
        let images = images();
        let snapshot = CartState::new().snapshot();
        let ctx = PageContext {
            store: &store,
            images: &images,
            cart: &snapshot,
            toasts: &[],
            path: "/",
        };
        let products = vec![
            Product::new("p1", "Speaker", "speaker", Money::from_cents(1999)),
            Product::new("p2", "Earphones", "earphones", Money::from_cents(500)),
        ];

        let html = render(&ctx, &products, &[banner()]);

        assert!(html.contains("hero-banner-container"));
        assert!(html.contains("footer-banner-container"));
        assert!(html.contains("Best Selling Products"));
        assert!(html.contains("Speakers of many variations"));
        assert!(html.contains(r#"href="/product/speaker""#));
        assert!(html.contains(r#"href="/product/earphones""#));
        assert!(html.contains(r#"href="/product/headphones""#));
        assert!(html.contains("20% OFF"));
    }

    #[test]
    fn test_homepage_without_banners() {
        let store = store();
        let images = images();
        let snapshot = CartState::new().snapshot();
        let ctx = PageContext {
            store: &store,
            images: &images,
            cart: &snapshot,
            toasts: &[],
            path: "/",
        };

        let html = render(&ctx, &[], &[]);

        assert!(!html.contains("hero-banner-container"));
        assert!(!html.contains("footer-banner-container"));
        assert!(html.contains("products-container"));
    }
}
