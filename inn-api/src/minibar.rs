use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use inn_core::identity::SessionContext;
use inn_core::registry;
use inn_shared::{MinibarItem, MinibarItemInput};

use crate::{error::AppError, state::AppState, SearchQuery};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/minibar/items", get(list_items).post(create_item))
        .route("/minibar/items/{id}", get(get_item).put(update_item))
        .route("/minibar/items/{id}/toggle", post(toggle_item))
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<MinibarItem>>, AppError> {
    Ok(Json(registry::list_minibar_items(&state.data, query.q.as_deref()).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MinibarItem>, AppError> {
    Ok(Json(registry::get_minibar_item(&state.data, id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(input): Json<MinibarItemInput>,
) -> Result<(StatusCode, Json<MinibarItem>), AppError> {
    let item = registry::create_minibar_item(&state.data, &session, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<MinibarItemInput>,
) -> Result<Json<MinibarItem>, AppError> {
    Ok(Json(registry::update_minibar_item(&state.data, &session, id, &input).await?))
}

async fn toggle_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<MinibarItem>, AppError> {
    Ok(Json(registry::toggle_minibar_item_status(&state.data, &session, id).await?))
}
