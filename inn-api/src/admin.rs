use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Serialize;

use inn_core::audit::{self, AdminOverview};
use inn_core::identity::SessionContext;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub removed: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/overview", get(overview))
        .route("/admin/logs", delete(purge_logs))
}

async fn overview(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<AdminOverview>, AppError> {
    let overview = audit::admin_overview(&state.data, state.identity.as_ref(), &session, state.backend).await?;
    Ok(Json(overview))
}

async fn purge_logs(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<PurgeResponse>, AppError> {
    let removed = audit::purge_logs(&state.data, &session).await?;
    Ok(Json(PurgeResponse { removed }))
}
