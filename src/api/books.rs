//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{BookResponse, CreateBook, UpdateBook},
};

use super::EntityPayload;

/// List all books with denormalized author names
#[utoipa::path(
    get,
    path = "/api/libros",
    tag = "libros",
    responses(
        (status = 200, description = "List of books", body = [BookResponse])
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book. Accepts JSON or multipart form data with optional
/// `cover` and `document` attachments.
#[utoipa::path(
    post,
    path = "/api/libros",
    tag = "libros",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    payload: EntityPayload<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let created = state
        .services
        .catalog
        .create_book(payload.data, payload.files)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book (PUT and PATCH both apply partial changes)
#[utoipa::path(
    put,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    payload: EntityPayload<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    let updated = state
        .services
        .catalog
        .update_book(id, payload.data, payload.files)
        .await?;

    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
