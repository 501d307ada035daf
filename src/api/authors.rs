//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::author::{AuthorResponse, CreateAuthor, UpdateAuthor},
};

use super::EntityPayload;

/// List all authors
#[utoipa::path(
    get,
    path = "/api/autores",
    tag = "autores",
    responses(
        (status = 200, description = "List of authors", body = [AuthorResponse])
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AuthorResponse>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/api/autores/{id}",
    tag = "autores",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorResponse>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Create a new author. Accepts JSON or multipart form data with an
/// optional `photo` attachment.
#[utoipa::path(
    post,
    path = "/api/autores",
    tag = "autores",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    payload: EntityPayload<CreateAuthor>,
) -> AppResult<(StatusCode, Json<AuthorResponse>)> {
    let created = state
        .services
        .catalog
        .create_author(payload.data, payload.files)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing author (PUT and PATCH both apply partial changes)
#[utoipa::path(
    put,
    path = "/api/autores/{id}",
    tag = "autores",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    payload: EntityPayload<UpdateAuthor>,
) -> AppResult<Json<AuthorResponse>> {
    let updated = state
        .services
        .catalog
        .update_author(id, payload.data, payload.files)
        .await?;

    Ok(Json(updated))
}

/// Delete an author and, by cascade, all of its books
#[utoipa::path(
    delete,
    path = "/api/autores/{id}",
    tag = "autores",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
