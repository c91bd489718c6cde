use axum::{extract::State, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::AppState;

/// Build the full application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Protected: bearer token required
        .merge(profile_routes(state.clone()))
        // Elevated: administrator role required
        .merge(admin_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn profile_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::profile;

    Router::new()
        .route(
            "/auth/profile",
            get(profile::profile_get)
                .put(profile::profile_put)
                .delete(profile::profile_delete),
        )
        // Claim-trust tier: verified token claims are attached as-is
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::elevated::users;

    Router::new()
        .route("/users", get(users::user_list))
        .route(
            "/users/:id",
            get(users::user_get)
                .put(users::user_put)
                .delete(users::user_delete),
        )
        // Layers run bottom-up: token verification, then store refresh so a
        // revoked role takes effect immediately, then the role gate.
        .layer(axum::middleware::from_fn(
            middleware::require_admin_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::refresh_identity_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Storefront Identity API",
            "version": version,
            "description": "Identity and authentication backend for a small storefront (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "profile": "/auth/profile (protected - own identity)",
                "users": "/users[/:id] (restricted - administrator role)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "credential store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
