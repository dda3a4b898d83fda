use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use inn_core::identity::SessionContext;
use inn_core::registry;
use inn_shared::{Customer, CustomerInput};

use crate::{error::AppError, state::AppState, SearchQuery};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", get(get_customer).put(update_customer))
        .route("/customers/{id}/toggle", post(toggle_customer))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(registry::list_customers(&state.data, query.q.as_deref()).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(registry::get_customer(&state.data, id).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = registry::create_customer(&state.data, &session, &input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(registry::update_customer(&state.data, &session, id, &input).await?))
}

async fn toggle_customer(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(registry::toggle_customer_status(&state.data, &session, id).await?))
}
