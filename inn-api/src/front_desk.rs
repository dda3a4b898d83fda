use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use inn_core::front_desk::{self, CheckInBoard, ParkingBoard};
use inn_core::identity::SessionContext;
use inn_shared::{CheckInInput, ConsumptionInput, MinibarConsumption, Stay};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stays", post(check_in))
        .route("/stays/board", get(board))
        .route("/stays/{id}", get(get_stay))
        .route("/stays/{id}/check-out", post(check_out))
        .route("/stays/{id}/cancel", post(cancel))
        .route("/stays/{id}/consumptions", get(list_consumptions).post(record_consumption))
        .route("/parking", get(parking))
}

async fn board(State(state): State<AppState>) -> Result<Json<CheckInBoard>, AppError> {
    Ok(Json(front_desk::check_in_board(&state.data).await?))
}

async fn get_stay(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Stay>, AppError> {
    Ok(Json(front_desk::get_stay(&state.data, id).await?))
}

async fn check_in(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(input): Json<CheckInInput>,
) -> Result<(StatusCode, Json<Stay>), AppError> {
    let stay = front_desk::check_in(&state.data, &session, &input).await?;
    Ok((StatusCode::CREATED, Json(stay)))
}

async fn check_out(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Stay>, AppError> {
    Ok(Json(front_desk::check_out(&state.data, &session, id).await?))
}

async fn cancel(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Stay>, AppError> {
    Ok(Json(front_desk::cancel_stay(&state.data, &session, id).await?))
}

async fn list_consumptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MinibarConsumption>>, AppError> {
    Ok(Json(front_desk::list_consumptions(&state.data, id).await?))
}

async fn record_consumption(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<ConsumptionInput>,
) -> Result<(StatusCode, Json<MinibarConsumption>), AppError> {
    let consumption = front_desk::record_consumption(&state.data, &session, id, &input).await?;
    Ok((StatusCode::CREATED, Json(consumption)))
}

async fn parking(State(state): State<AppState>) -> Result<Json<ParkingBoard>, AppError> {
    Ok(Json(front_desk::parking_board(&state.data).await?))
}
