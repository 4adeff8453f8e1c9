//! Browser sessions. A session is just an opaque id in a cookie; the data
//! keyed by it (the shopping list) lives in the database.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;
use uuid::Uuid;

use crate::api::handlers::AppState;

/// The caller's session id, issuing a fresh cookie when none is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the session cookie, or issue a new one
pub fn session_from_cookies(cookies: &Cookies, cookie_name: &str) -> SessionId {
    if let Some(cookie) = cookies.get(cookie_name) {
        if Uuid::parse_str(cookie.value()).is_ok() {
            return SessionId(cookie.value().to_string());
        }
    }

    let id = Uuid::new_v4().to_string();
    debug!("Issuing new session {}", id);

    let cookie = Cookie::build((cookie_name.to_string(), id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookies.add(cookie);

    SessionId(id)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionId {
    type Rejection = (axum::http::StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        Ok(session_from_cookies(&cookies, &state.settings.session.cookie_name))
    }
}
