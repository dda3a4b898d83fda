use axum::{extract::State, routing::get, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use inn_core::identity::SessionContext;
use inn_shared::Masked;

use crate::{error::AppError, middleware::issue_token, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub session: SessionContext,
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/session", get(current_session))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.identity.sign_in(&req.email, &req.password).await?;
    let session = SessionContext::establish(user, &state.auth.admin_email);
    let token = issue_token(&state.auth, &session)?;

    tracing::info!(email = %Masked(&session.email), role = ?session.role, "Signed in");
    Ok(Json(LoginResponse { token, session }))
}

async fn current_session(Extension(session): Extension<SessionContext>) -> Json<SessionContext> {
    Json(session)
}
