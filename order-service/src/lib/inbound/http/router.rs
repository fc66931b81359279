use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_current_user::get_current_user;
use super::handlers::login::login;
use super::handlers::signup::signup;
use super::middleware::require_authentication;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authentication,
        ));

    // Headers are left out of the span: Authorization carries bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
