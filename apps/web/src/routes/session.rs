//! Session cookie middleware.
//!
//! Resolves the session cookie to a `CartHandle` and puts it in the request
//! extensions, so cart handlers take `Extension<CartHandle>`. New sessions
//! get a `Set-Cookie` on the way out.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// Reads the session id from the `Cookie` headers. Malformed ids are
/// treated as absent.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a new session.
pub fn session_cookie(cookie_name: &str, id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, id)
}

pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.session.cookie_name;
    let id = session_id_from_headers(request.headers(), cookie_name);
    let session = state.sessions.resolve(id).await;

    request.extensions_mut().insert(session.cart.clone());
    let mut response = next.run(request).await;

    if session.created {
        match HeaderValue::from_str(&session_cookie(cookie_name, session.id)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
        }
    }

    response
}
