//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health};
use crate::error::ErrorResponse;
use crate::models::{
    author::{AuthorResponse, CreateAuthor, UpdateAuthor},
    book::{BookResponse, CreateBook, UpdateBook},
    user::{LoginRequest, LoginResponse, Role},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "0.1.0",
        description = "Library Catalog Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(schemas(
        health::HealthResponse,
        ErrorResponse,
        LoginRequest,
        LoginResponse,
        Role,
        CreateAuthor,
        UpdateAuthor,
        AuthorResponse,
        CreateBook,
        UpdateBook,
        BookResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "autores", description = "Author catalog"),
        (name = "libros", description = "Book catalog")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
