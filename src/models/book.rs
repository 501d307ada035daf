//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

fn default_copy_count() -> i32 {
    1
}

/// Book row joined with its author's name fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookWithAuthor {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub publisher: String,
    pub publication_year: i32,
    pub isbn: String,
    pub category: String,
    pub language: String,
    pub copy_count: i32,
    pub genre: String,
    pub page_count: i32,
    pub synopsis: Option<String>,
    pub series: Option<String>,
    pub cover_ref: Option<String>,
    pub document_ref: Option<String>,
    pub author_given_name: String,
    pub author_family_name: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub author_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub publisher: String,
    #[validate(range(min = 0))]
    pub publication_year: i32,
    #[validate(length(min = 1, max = 20))]
    pub isbn: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 50))]
    pub language: String,
    #[serde(default = "default_copy_count")]
    #[validate(range(min = 1))]
    pub copy_count: i32,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[validate(range(min = 0))]
    pub page_count: i32,
    pub synopsis: Option<String>,
    #[validate(length(max = 100))]
    pub series: Option<String>,
}

/// Update book request (partial; absent fields keep their value)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub publisher: Option<String>,
    #[validate(range(min = 0))]
    pub publication_year: Option<i32>,
    #[validate(length(min = 1, max = 20))]
    pub isbn: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub language: Option<String>,
    #[validate(range(min = 1))]
    pub copy_count: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,
    #[validate(range(min = 0))]
    pub page_count: Option<i32>,
    pub synopsis: Option<String>,
    #[validate(length(max = 100))]
    pub series: Option<String>,
}

/// Wire representation of a book with denormalized author names and
/// media references resolved to retrieval URLs.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_given_name: String,
    pub author_family_name: String,
    pub publisher: String,
    pub publication_year: i32,
    pub isbn: String,
    pub category: String,
    pub language: String,
    pub copy_count: i32,
    pub genre: String,
    pub page_count: i32,
    pub synopsis: Option<String>,
    pub series: Option<String>,
    pub cover_ref: Option<String>,
    pub document_ref: Option<String>,
    pub cover_url: Option<String>,
    pub document_url: Option<String>,
}

impl BookResponse {
    pub fn from_record(
        book: BookWithAuthor,
        cover_url: Option<String>,
        document_url: Option<String>,
    ) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author_id: book.author_id,
            author_given_name: book.author_given_name,
            author_family_name: book.author_family_name,
            publisher: book.publisher,
            publication_year: book.publication_year,
            isbn: book.isbn,
            category: book.category,
            language: book.language,
            copy_count: book.copy_count,
            genre: book.genre,
            page_count: book.page_count,
            synopsis: book.synopsis,
            series: book.series,
            cover_ref: book.cover_ref,
            document_ref: book.document_ref,
            cover_url,
            document_url,
        }
    }
}
