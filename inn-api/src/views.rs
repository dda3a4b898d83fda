use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use inn_core::views::{self, Analytics, Dashboard, PeriodReport};

use crate::{error::AppError, state::AppState};

/// Both bounds are optional; missing ones fall back to the current month.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/reports", get(report))
        .route("/analytics", get(analytics))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(views::dashboard(&state.data, Utc::now().date_naive()).await?))
}

async fn report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<PeriodReport>, AppError> {
    let (month_start, month_end) = views::month_bounds(Utc::now().date_naive());
    let from = query.from.unwrap_or(month_start);
    let to = query.to.unwrap_or(month_end);
    Ok(Json(views::period_report(&state.data, from, to).await?))
}

async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>, AppError> {
    Ok(Json(views::analytics(&state.data).await?))
}
