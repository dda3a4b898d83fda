use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use inn_core::identity::SessionContext;
use inn_core::registry::{self, AccommodationView};
use inn_shared::{Accommodation, AccommodationInput, AccommodationType, AccommodationTypeInput};

use crate::{error::AppError, state::AppState, SearchQuery};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accommodation-types", get(list_types).post(create_type))
        .route("/accommodation-types/{id}", get(get_type).put(update_type))
        .route("/accommodation-types/{id}/toggle", post(toggle_type))
        .route("/accommodations", get(list_accommodations).post(create_accommodation))
        .route("/accommodations/{id}", get(get_accommodation).put(update_accommodation))
        .route("/accommodations/{id}/toggle", post(toggle_accommodation))
}

// ============================================================================
// Accommodation types
// ============================================================================

async fn list_types(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AccommodationType>>, AppError> {
    Ok(Json(registry::list_accommodation_types(&state.data, query.q.as_deref()).await?))
}

async fn get_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccommodationType>, AppError> {
    Ok(Json(registry::get_accommodation_type(&state.data, id).await?))
}

async fn create_type(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(input): Json<AccommodationTypeInput>,
) -> Result<(StatusCode, Json<AccommodationType>), AppError> {
    let created = registry::create_accommodation_type(&state.data, &session, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_type(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<AccommodationTypeInput>,
) -> Result<Json<AccommodationType>, AppError> {
    Ok(Json(registry::update_accommodation_type(&state.data, &session, id, &input).await?))
}

async fn toggle_type(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccommodationType>, AppError> {
    Ok(Json(registry::toggle_accommodation_type_status(&state.data, &session, id).await?))
}

// ============================================================================
// Accommodations
// ============================================================================

async fn list_accommodations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AccommodationView>>, AppError> {
    Ok(Json(registry::list_accommodations(&state.data, query.q.as_deref()).await?))
}

async fn get_accommodation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Accommodation>, AppError> {
    Ok(Json(registry::get_accommodation(&state.data, id).await?))
}

async fn create_accommodation(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(input): Json<AccommodationInput>,
) -> Result<(StatusCode, Json<Accommodation>), AppError> {
    let created = registry::create_accommodation(&state.data, &session, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_accommodation(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<AccommodationInput>,
) -> Result<Json<Accommodation>, AppError> {
    Ok(Json(registry::update_accommodation(&state.data, &session, id, &input).await?))
}

async fn toggle_accommodation(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Accommodation>, AppError> {
    Ok(Json(registry::toggle_accommodation_status(&state.data, &session, id).await?))
}
