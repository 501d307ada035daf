//! API handlers for the REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use axum_extra::extract::Multipart;
use serde::de::value::MapDeserializer;
use serde::de::{DeserializeOwned, Deserializer, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::{error::AppError, models::media::UploadedFile};

/// Request payload for entity create/update: a JSON body, or multipart
/// form data carrying binary attachments alongside the scalar fields.
pub struct EntityPayload<T> {
    pub data: T,
    pub files: Vec<UploadedFile>,
}

#[async_trait]
impl<S, T> FromRequest<S> for EntityPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(Self {
                data,
                files: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut fields: Vec<(String, String)> = Vec::new();
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if let Some(filename) = field.file_name() {
                let filename = filename.to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;
                files.push(UploadedFile {
                    field: name,
                    filename,
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {}", e)))?;
                fields.push((name, text));
            }
        }

        let data = from_form_fields(fields)?;
        Ok(Self { data, files })
    }
}

/// Deserialize a struct from multipart text fields. Every value arrives
/// as a string; numeric and boolean targets parse on demand, and the
/// empty string reads as absent for optional targets.
fn from_form_fields<T: DeserializeOwned>(fields: Vec<(String, String)>) -> Result<T, AppError> {
    T::deserialize(MapDeserializer::new(
        fields.into_iter().map(|(k, v)| (k, FormValue(v))),
    ))
    .map_err(|e: serde::de::value::Error| AppError::Validation(e.to_string()))
}

struct FormValue(String);

impl<'de> IntoDeserializer<'de, serde::de::value::Error> for FormValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! parse_into {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: Visitor<'de>,
        {
            let parsed: $ty = self.0.parse().map_err(|_| {
                serde::de::Error::custom(format!(
                    concat!("invalid ", stringify!($ty), ": {:?}"),
                    self.0
                ))
            })?;
            visitor.$visit(parsed)
        }
    };
}

impl<'de> Deserializer<'de> for FormValue {
    type Error = serde::de::value::Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.0)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    parse_into!(deserialize_bool, visit_bool, bool);
    parse_into!(deserialize_i8, visit_i8, i8);
    parse_into!(deserialize_i16, visit_i16, i16);
    parse_into!(deserialize_i32, visit_i32, i32);
    parse_into!(deserialize_i64, visit_i64, i64);
    parse_into!(deserialize_u8, visit_u8, u8);
    parse_into!(deserialize_u16, visit_u16, u16);
    parse_into!(deserialize_u32, visit_u32, u32);
    parse_into!(deserialize_u64, visit_u64, u64);
    parse_into!(deserialize_f32, visit_f32, f32);
    parse_into!(deserialize_f64, visit_f64, f64);

    forward_to_deserialize_any! {
        char str string bytes byte_buf unit unit_struct newtype_struct seq
        tuple tuple_struct map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        author::UpdateAuthor,
        book::{CreateBook, UpdateBook},
    };

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn form_fields_parse_numbers_and_keep_digit_strings() {
        let book: CreateBook = from_form_fields(pairs(&[
            ("title", "Rayuela"),
            ("author_id", "7"),
            ("publisher", "Sudamericana"),
            ("publication_year", "1963"),
            ("isbn", "9788437604572"),
            ("category", "Fiction"),
            ("language", "es"),
            ("genre", "Novel"),
            ("page_count", "736"),
        ]))
        .unwrap();

        assert_eq!(book.author_id, 7);
        assert_eq!(book.publication_year, 1963);
        // All digits, but still a string field
        assert_eq!(book.isbn, "9788437604572");
        // Absent from the form, filled by the serde default
        assert_eq!(book.copy_count, 1);
    }

    #[test]
    fn optional_fields_absent_or_empty_read_as_none() {
        let changes: UpdateAuthor = from_form_fields(pairs(&[
            ("family_name", "Cortázar"),
            ("birth_date", ""),
        ]))
        .unwrap();

        assert_eq!(changes.family_name.as_deref(), Some("Cortázar"));
        assert_eq!(changes.given_name, None);
        assert_eq!(changes.birth_date, None);
    }

    #[test]
    fn dates_parse_from_form_strings() {
        let changes: UpdateAuthor =
            from_form_fields(pairs(&[("birth_date", "1914-08-26")])).unwrap();
        let date = changes.birth_date.unwrap();
        assert_eq!(date.to_string(), "1914-08-26");
    }

    #[test]
    fn unparseable_numbers_are_validation_errors() {
        let result: Result<UpdateBook, _> = from_form_fields(pairs(&[("page_count", "many")]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
