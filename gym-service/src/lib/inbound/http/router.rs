use std::sync::Arc;
use std::time::Duration;

use auth::TokenCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::RefreshCookie;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::hard_delete_user;
use super::handlers::delete_user::soft_delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_deleted_users;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::logout_all::logout_all;
use super::handlers::refresh_session::refresh_session;
use super::handlers::restore_user::restore_user;
use super::handlers::roles;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use super::middleware::require_roles;
use super::middleware::RoleGate;
use crate::domain::role::models::MANAGEMENT_ROLES;
use crate::domain::role::ports::RoleServicePort;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub role_service: Arc<dyn RoleServicePort>,
    pub session_service: Arc<dyn SessionServicePort>,
    pub token_codec: Arc<TokenCodec>,
    pub refresh_cookie: RefreshCookie,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh_session))
        .route("/api/v1/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/api/v1/auth/logout-all", post(logout_all))
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/roles", get(roles::list_roles))
        .route("/api/v1/roles/:role_id", get(roles::get_role))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let gate = RoleGate::new(Arc::clone(&state.role_service), MANAGEMENT_ROLES);

    // Layers run bottom-up: authenticate first, then the role gate.
    let privileged_routes = Router::new()
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/deleted", get(list_deleted_users))
        .route(
            "/api/v1/users/:user_id",
            put(update_user).delete(soft_delete_user),
        )
        .route("/api/v1/users/:user_id/restore", post(restore_user))
        .route("/api/v1/users/:user_id/hard", delete(hard_delete_user))
        .route("/api/v1/roles", post(roles::create_role))
        .route(
            "/api/v1/roles/:role_id",
            put(roles::update_role).delete(roles::soft_delete_role),
        )
        .route("/api/v1/roles/:role_id/restore", post(roles::restore_role))
        .route("/api/v1/roles/:role_id/hard", delete(roles::hard_delete_role))
        .route_layer(middleware::from_fn_with_state(gate, require_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

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
        .merge(privileged_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
