//! Authentication endpoint

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::user::{LoginRequest, LoginResponse},
};

/// Log in with email or username and password
#[utoipa::path(
    post,
    path = "/api/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated, token pair issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .auth
        .authenticate(&request.identifier, &request.password)
        .await?;

    Ok(Json(response))
}
