//! # Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Router Layout                                  │
//! │                                                                         │
//! │  session routes (resolve_session middleware, Extension<CartHandle>)     │
//! │  ├── pages    GET /, GET /product/{slug}                               │
//! │  ├── cart     POST /cart/{add,remove,adjust,selector,visibility}       │
//! │  ├── api      /api/cart/...                                            │
//! │  └── events   GET /api/cart/events (SSE)                               │
//! │                                                                         │
//! │  stateless routes (no cookie issued)                                   │
//! │  ├── api      GET /api/products, /api/products/{slug}, /api/slugs,     │
//! │  │            /api/banners                                             │
//! │  ├── health   GET /health                                              │
//! │  └── fallback 404 page                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cart;
pub mod events;
pub mod pages;
pub mod session;

use std::sync::Arc;

use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let session_routes = Router::new()
        .route("/", get(pages::home))
        .route("/product/{slug}", get(pages::product))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/adjust", post(cart::adjust))
        .route("/cart/selector", post(cart::selector))
        .route("/cart/visibility", post(cart::visibility))
        .route("/api/cart", get(api::get_cart))
        .route("/api/cart/items", post(api::add_item))
        .route(
            "/api/cart/items/{id}",
            axum::routing::delete(api::remove_item).patch(api::adjust_item),
        )
        .route("/api/cart/selector", put(api::set_selector))
        .route("/api/cart/selector/inc", post(api::increment_selector))
        .route("/api/cart/selector/dec", post(api::decrement_selector))
        .route("/api/cart/visibility", put(api::set_visibility))
        .route("/api/cart/events", get(events::cart_events))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::resolve_session,
        ));

    Router::new()
        .merge(session_routes)
        .route("/api/products", get(api::list_products))
        .route("/api/products/{slug}", get(api::get_product))
        .route("/api/slugs", get(api::list_slugs))
        .route("/api/banners", get(api::list_banners))
        .route("/health", get(health_handler))
        .fallback(pages::not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use storefront_content::{ImageUrlBuilder, StaticCatalog};
    use storefront_core::{Banner, ImageAsset, Money, Product};

    use crate::config::{SessionSettings, StoreSettings};

    fn test_state() -> Arc<AppState> {
        test_state_with_sessions(SessionSettings::default())
    }

    fn test_state_with_sessions(session: SessionSettings) -> Arc<AppState> {
        let catalog = StaticCatalog::new(
            vec![
                Product::new("p1", "Speaker", "speaker", Money::from_cents(1999))
                    .with_details("Loud")
                    .with_image(ImageAsset::new("image-front-800x600-png")),
                Product::new("p2", "Earphones", "earphones", Money::from_cents(500)),
            ],
            vec![Banner {
                id: "b1".into(),
                mid_text: Some("Summer Sale".into()),
                product: Some("speaker".into()),
                ..Banner::default()
            }],
        );
        Arc::new(AppState::new(
            Arc::new(catalog),
            ImageUrlBuilder::new("test1", "production"),
            StoreSettings::default(),
            session,
        ))
    }

    fn request(method: Method, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    fn json_request(method: Method, uri: &str, cookie: &str, body: Value) -> Request<Body> {
        request(method, uri, Some(cookie))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(uri: &str, cookie: &str, body: &str) -> Request<Body> {
        request(Method::POST, uri, Some(cookie))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    /// Opens a session and returns the `name=value` cookie pair.
    async fn open_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/cart", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(test_state());
        let response = app
            .oneshot(request(Method::GET, "/health", None).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_session_cookie_issued_once() {
        let app = router(test_state());

        let cookie = open_session(&app).await;
        assert!(cookie.starts_with("storefront_session="));

        let response = app
            .oneshot(request(Method::GET, "/api/cart", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_json_cart_flow_keeps_totals() {
        let state = test_state();
        let app = router(state.clone());
        let cookie = open_session(&app).await;

        // Selector at 3, then add without an explicit quantity.
        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, "/api/cart/selector", &cookie, json!({ "quantity": 3 })))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["selectorQuantity"], 3);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/items", &cookie, json!({ "slug": "speaker" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cart"]["totalQuantity"], 3);
        assert_eq!(body["cart"]["totalPrice"], 5997);
        assert_eq!(body["notification"]["message"], "3 Speaker added to the cart.");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/cart/items",
                &cookie,
                json!({ "slug": "earphones", "quantity": 2 }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["cart"]["totalPrice"], 6997);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                "/api/cart/items/p1",
                &cookie,
                json!({ "direction": "dec" }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["totalQuantity"], 4);
        assert_eq!(body["totalPrice"], 4998);

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, "/api/cart/items/p2", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["totalQuantity"], 2);
        assert_eq!(body["totalPrice"], 3998);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let app = router(test_state());
        let alice = open_session(&app).await;
        let bob = open_session(&app).await;

        app.clone()
            .oneshot(json_request(Method::POST, "/api/cart/items", &alice, json!({ "slug": "speaker" })))
            .await
            .unwrap();

        let response = app
            .oneshot(request(Method::GET, "/api/cart", Some(&bob)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["totalQuantity"], 0);
    }

    #[tokio::test]
    async fn test_json_errors() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, "/api/cart/items/nope", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/cart/items",
                &cookie,
                json!({ "slug": "speaker", "quantity": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/items", &cookie, json!({ "slug": "ghost" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(json_request(Method::PATCH, "/api/cart/items/p1", &cookie, json!({ "direction": "sideways" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_and_cart_stays_consistent() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/cart/items",
                &cookie,
                json!({ "slug": "speaker", "quantity": 100_000_000_000_000_000i64 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

        // A huge selector is stored but cannot be added.
        app.clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/cart/selector",
                &cookie,
                json!({ "quantity": 100_000_000_000_000_000i64 }),
            ))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(form_request("/cart/add", &cookie, "slug=speaker"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request(Method::GET, "/api/cart", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body["items"].as_array().unwrap().is_empty());
        assert_eq!(body["totalQuantity"], 0);
        assert_eq!(body["totalPrice"], 0);
    }

    #[tokio::test]
    async fn test_session_limit_evicts_oldest_cart() {
        let app = router(test_state_with_sessions(SessionSettings {
            max_sessions: 1,
            ..SessionSettings::default()
        }));
        let first = open_session(&app).await;
        let second = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/cart", Some(&second)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(SET_COOKIE).is_none());

        // The first cart was evicted, so its cookie is answered with a new one.
        let response = app
            .oneshot(request(Method::GET, "/api/cart", Some(&first)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let app = router(test_state());

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/products", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/products/earphones", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["id"], "p2");

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/products/ghost", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/slugs", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!(["speaker", "earphones"]));

        let response = app
            .oneshot(request(Method::GET, "/api/banners", None).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await[0]["midText"], "Summer Sale");
    }

    #[tokio::test]
    async fn test_pages_render() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("The Headphones Store"));
        assert!(html.contains("Summer Sale"));
        assert!(html.contains(r#"href="/product/earphones""#));

        let response = app
            .oneshot(request(Method::GET, "/product/speaker?image=7", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Speaker</h1>"));
        assert!(html.contains("front-800x600.png"));
    }

    #[tokio::test]
    async fn test_unknown_product_page_is_404() {
        let app = router(test_state());

        for uri in ["/product/ghost", "/product/Not%20A%20Slug", "/no/such/page"] {
            let response = app
                .clone()
                .oneshot(request(Method::GET, uri, None).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert!(body_text(response).await.contains("404 Not Found"));
        }
    }

    #[tokio::test]
    async fn test_form_flow_redirects_and_shows_toast() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(form_request("/cart/selector", &cookie, "direction=inc&return_to=%2Fproduct%2Fspeaker"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/product/speaker");

        let response = app
            .clone()
            .oneshot(form_request(
                "/cart/add",
                &cookie,
                "slug=speaker&return_to=https%3A%2F%2Fevil.example",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");

        app.clone()
            .oneshot(form_request("/cart/visibility", &cookie, "visible=true&return_to=%2F"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("2 Speaker added to the cart."));
        assert!(html.contains("cart-wrapper"));
        assert!(html.contains("$39.98"));

        // The toast is shown once.
        let response = app
            .oneshot(request(Method::GET, "/", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!body_text(response).await.contains("added to the cart."));
    }

    #[tokio::test]
    async fn test_form_remove_missing_item_is_404_page() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .oneshot(form_request("/cart/remove", &cookie, "product_id=ghost"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Product not in cart: ghost"));
    }

    #[tokio::test]
    async fn test_cart_events_stream_starts_with_snapshot() {
        let app = router(test_state());
        let cookie = open_session(&app).await;

        let response = app
            .oneshot(request(Method::GET, "/api/cart/events", Some(&cookie)).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");

        let mut body = response.into_body().into_data_stream();
        let first = tokio_stream::StreamExt::next(&mut body).await.unwrap().unwrap();
        let text = String::from_utf8(first.to_vec()).unwrap();
        assert!(text.contains("event: cart"));
        assert!(text.contains("\"totalQuantity\":0"));
    }
}
