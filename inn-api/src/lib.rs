use axum::{http::Method, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod accommodations;
pub mod admin;
pub mod auth;
pub mod customers;
pub mod error;
pub mod front_desk;
pub mod middleware;
pub mod minibar;
pub mod state;
pub mod views;

pub use state::{AppState, AuthConfig};

/// `?q=` filter accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let protected = Router::new()
        .merge(auth::routes())
        .merge(customers::routes())
        .merge(accommodations::routes())
        .merge(minibar::routes())
        .merge(front_desk::routes())
        .merge(views::routes())
        .merge(admin::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ));

    let backend = state.backend;
    Router::new()
        .route("/health", get(move || health(backend)))
        .merge(auth::public_routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(backend: &'static str) -> Json<Value> {
    Json(json!({ "status": "ok", "backend": backend }))
}
