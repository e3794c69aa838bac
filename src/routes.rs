// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{posts, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// JSON bodies above this size are rejected.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Baseline hardening headers sent on every response unless a handler set them.
const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
];

/// Assembles the main application router.
///
/// * Public routes: signup, login, published post reads.
/// * Protected routes: everything else, behind `auth_middleware`.
/// * Both groups live under `/api/v1`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/login", post(users::login_user))
        .route("/posts/published", get(posts::list_published_posts))
        .route("/posts/published/{id}", get(posts::get_published_post));

    // route_layer: only matched routes are authenticated, so unknown paths still 404
    let protected_routes = Router::new()
        .route(
            "/users",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/posts",
            post(posts::create_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/publish", put(posts::publish_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .nest("/api/v1", public_routes.merge(protected_routes))
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
