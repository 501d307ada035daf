//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub given_name: String,
    pub family_name: String,
    pub nationality: String,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
    /// Reference into the external media store
    pub photo_ref: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100))]
    pub given_name: String,
    #[validate(length(min = 1, max = 100))]
    pub family_name: String,
    #[validate(length(min = 1, max = 100))]
    pub nationality: String,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
}

/// Update author request (partial; absent fields keep their value)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100))]
    pub given_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub family_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
}

/// Wire representation of an author, with the photo reference resolved
/// to a retrieval URL (null when absent or unresolvable).
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i32,
    pub given_name: String,
    pub family_name: String,
    pub nationality: String,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub photo_ref: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthorResponse {
    pub fn from_author(author: Author, photo_url: Option<String>) -> Self {
        Self {
            id: author.id,
            given_name: author.given_name,
            family_name: author.family_name,
            nationality: author.nationality,
            birth_date: author.birth_date,
            biography: author.biography,
            photo_ref: author.photo_ref,
            photo_url,
        }
    }
}
