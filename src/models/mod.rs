//! Data models for the biblioteca catalog

pub mod author;
pub mod book;
pub mod media;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorResponse, CreateAuthor, UpdateAuthor};
pub use book::{BookResponse, BookWithAuthor, CreateBook, UpdateBook};
pub use media::{MediaKind, MediaRef, UploadedFile};
pub use user::{Claims, LoginRequest, LoginResponse, Role, TokenUse, User};
