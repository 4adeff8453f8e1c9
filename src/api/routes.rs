use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;
use crate::web::handlers as web_handlers;

/// Rate-limit key: the peer IP, or localhost when the peer address is unknown
#[derive(Clone, Copy, Debug)]
struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<B>(
        &self,
        req: &axum::http::Request<B>,
    ) -> Result<Self::Key, tower_governor::GovernorError> {
        if let Some(addr) = req.extensions().get::<std::net::SocketAddr>() {
            return Ok(addr.ip());
        }
        if let Some(info) = req
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        {
            return Ok(info.0.ip());
        }

        Ok(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
    }
}

/// Create the router with all endpoints (API + Web UI)
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let mut api_routes = Router::new()
        // Ranking
        .route("/recommend", post(api_handlers::recommend))
        .route(
            "/ingredients/:name/recipes",
            get(api_handlers::ingredient_recipes),
        )
        .route(
            "/recipes/:name/missing",
            get(api_handlers::missing_ingredients),
        )
        // Pantry
        .route(
            "/pantry",
            get(api_handlers::list_pantry).post(api_handlers::add_pantry),
        )
        .route("/pantry/delete", post(api_handlers::delete_pantry))
        // Favorites
        .route("/favorites", post(api_handlers::add_favorite))
        .route("/favorites/remove", post(api_handlers::remove_favorite))
        .route("/favorites/check", post(api_handlers::check_favorite))
        // Shopping list
        .route(
            "/shopping-list",
            get(api_handlers::get_shopping_list).post(api_handlers::add_to_shopping_list),
        )
        .route(
            "/shopping-list/delete",
            post(api_handlers::delete_from_shopping_list),
        )
        .route(
            "/shopping-list/move-to-pantry",
            post(api_handlers::move_to_pantry),
        )
        // Stats
        .route("/stats", get(api_handlers::get_stats))
        .with_state(state.clone());

    // API_RATE_LIMIT requests per second per client, validated non-zero at startup
    let rate = settings.server.api_rate_limit.max(1);
    if let Some(governor_conf) = GovernorConfigBuilder::default()
        .key_extractor(FallbackIpKeyExtractor)
        .per_millisecond((1000 / rate).max(1))
        .burst_size(u32::try_from(rate).unwrap_or(u32::MAX).saturating_mul(2))
        .finish()
    {
        api_routes = api_routes.layer(GovernorLayer {
            config: Arc::new(governor_conf),
        });
    } else {
        tracing::warn!("Invalid rate limit configuration, API rate limiting disabled");
    }

    // Web UI routes
    let web_routes = Router::new()
        .route("/", get(web_handlers::index))
        .route("/recipes/:ingredient", get(web_handlers::ingredient_recipes_page))
        .route(
            "/missing-ingredients/:recipe",
            get(web_handlers::missing_ingredients_page),
        )
        .route("/shopping-list", get(web_handlers::shopping_list_page))
        .route("/ingredients", get(web_handlers::ingredients_page))
        .route("/my-ingredients", get(web_handlers::ingredients_page))
        .route("/favorite-recipes", get(web_handlers::favorites_page))
        .route("/about", get(web_handlers::about_page))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check))
        .with_state(state);

    // Static file serving
    let static_routes = Router::new().nest_service("/static", ServeDir::new("static"));

    Router::new()
        .merge(web_routes)
        .merge(health_routes)
        .merge(static_routes)
        .nest("/api", api_routes)
        .layer(CookieManagerLayer::new())
        .layer(
            // Request body size limit - prevent memory exhaustion from large payloads
            RequestBodyLimitLayer::new(settings.pagination.max_request_body_size),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; object-src 'none'; base-uri 'self'",
            ),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn create_test_state() -> AppState {
        AppState {
            pool: crate::db::test_pool().await,
            settings: crate::config::test_settings(),
        }
    }

    #[tokio::test]
    async fn test_health_routes_exist() {
        let state = create_test_state().await;
        let app = create_router(state.clone(), &state.settings);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_route() {
        let state = create_test_state().await;
        let app = create_router(state.clone(), &state.settings);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_shopping_list_issues_session_cookie() {
        let state = create_test_state().await;
        let app = create_router(state.clone(), &state.settings);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/shopping-list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("pantry_session="));
    }
}
