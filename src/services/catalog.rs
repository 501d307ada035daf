//! Catalog management service for authors and books

use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorResponse, CreateAuthor, UpdateAuthor},
        book::{BookResponse, BookWithAuthor, CreateBook, UpdateBook},
        media::{MediaKind, MediaRef, UploadedFile},
    },
    repository::{AuthorsStore, BooksStore},
    services::media::MediaStore,
};

/// Multipart field names carrying binary attachments
const PHOTO_FIELD: &str = "photo";
const COVER_FIELD: &str = "cover";
const DOCUMENT_FIELD: &str = "document";

#[derive(Clone)]
pub struct CatalogService {
    authors: Arc<dyn AuthorsStore>,
    books: Arc<dyn BooksStore>,
    media: Arc<dyn MediaStore>,
}

impl CatalogService {
    pub fn new(
        authors: Arc<dyn AuthorsStore>,
        books: Arc<dyn BooksStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            authors,
            books,
            media,
        }
    }

    // --- Authors ---

    pub async fn list_authors(&self) -> AppResult<Vec<AuthorResponse>> {
        let authors = self.authors.list().await?;
        let mut responses = Vec::with_capacity(authors.len());
        for author in authors {
            responses.push(self.author_response(author).await);
        }
        Ok(responses)
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorResponse> {
        let author = self
            .authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;
        Ok(self.author_response(author).await)
    }

    pub async fn create_author(
        &self,
        author: CreateAuthor,
        mut files: Vec<UploadedFile>,
    ) -> AppResult<AuthorResponse> {
        author.validate()?;

        let photo_ref = self
            .store_attachment(&mut files, PHOTO_FIELD, MediaKind::Image)
            .await?;
        let created = self.authors.insert(&author, photo_ref.as_deref()).await?;

        tracing::info!("Created author {}", created.id);

        Ok(self.author_response(created).await)
    }

    pub async fn update_author(
        &self,
        id: i32,
        changes: UpdateAuthor,
        mut files: Vec<UploadedFile>,
    ) -> AppResult<AuthorResponse> {
        changes.validate()?;

        let photo_ref = self
            .store_attachment(&mut files, PHOTO_FIELD, MediaKind::Image)
            .await?;
        let updated = self
            .authors
            .update(id, &changes, photo_ref.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(self.author_response(updated).await)
    }

    /// Delete an author; all books referencing it are removed by the
    /// cascade.
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        if !self.authors.delete(id).await? {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    // --- Books ---

    pub async fn list_books(&self) -> AppResult<Vec<BookResponse>> {
        let books = self.books.list().await?;
        let mut responses = Vec::with_capacity(books.len());
        for book in books {
            responses.push(self.book_response(book).await);
        }
        Ok(responses)
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookResponse> {
        let book = self
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        Ok(self.book_response(book).await)
    }

    pub async fn create_book(
        &self,
        book: CreateBook,
        mut files: Vec<UploadedFile>,
    ) -> AppResult<BookResponse> {
        book.validate()?;

        if !self.authors.exists(book.author_id).await? {
            return Err(AppError::Validation(format!(
                "Author with id {} does not exist",
                book.author_id
            )));
        }
        if self.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Validation(format!(
                "A book with isbn {} already exists",
                book.isbn
            )));
        }

        let cover_ref = self
            .store_attachment(&mut files, COVER_FIELD, MediaKind::Image)
            .await?;
        let document_ref = self
            .store_attachment(&mut files, DOCUMENT_FIELD, MediaKind::Document)
            .await?;

        let created = self
            .books
            .insert(&book, cover_ref.as_deref(), document_ref.as_deref())
            .await?;

        tracing::info!("Created book {}", created.id);

        Ok(self.book_response(created).await)
    }

    pub async fn update_book(
        &self,
        id: i32,
        changes: UpdateBook,
        mut files: Vec<UploadedFile>,
    ) -> AppResult<BookResponse> {
        changes.validate()?;

        if let Some(author_id) = changes.author_id {
            if !self.authors.exists(author_id).await? {
                return Err(AppError::Validation(format!(
                    "Author with id {} does not exist",
                    author_id
                )));
            }
        }
        if let Some(ref isbn) = changes.isbn {
            if self.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Validation(format!(
                    "A book with isbn {} already exists",
                    isbn
                )));
            }
        }

        let cover_ref = self
            .store_attachment(&mut files, COVER_FIELD, MediaKind::Image)
            .await?;
        let document_ref = self
            .store_attachment(&mut files, DOCUMENT_FIELD, MediaKind::Document)
            .await?;

        let updated = self
            .books
            .update(id, &changes, cover_ref.as_deref(), document_ref.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(self.book_response(updated).await)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.books.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    // --- Helpers ---

    /// Store the attachment submitted under `field`, if any, and return
    /// the reference assigned by the media store.
    async fn store_attachment(
        &self,
        files: &mut Vec<UploadedFile>,
        field: &str,
        kind: MediaKind,
    ) -> AppResult<Option<String>> {
        let Some(pos) = files.iter().position(|f| f.field == field) else {
            return Ok(None);
        };
        let file = files.swap_remove(pos);
        let media = self.media.store(file.bytes, &file.filename, kind).await?;
        Ok(Some(media.public_id))
    }

    async fn author_response(&self, author: Author) -> AuthorResponse {
        let photo_url = match author.photo_ref.as_deref() {
            Some(r) => self.media.resolve(&MediaRef::image(r)).await,
            None => None,
        };
        AuthorResponse::from_author(author, photo_url)
    }

    async fn book_response(&self, book: BookWithAuthor) -> BookResponse {
        let cover_url = match book.cover_ref.as_deref() {
            Some(r) => self.media.resolve(&MediaRef::image(r)).await,
            None => None,
        };
        let document_url = match book.document_ref.as_deref() {
            Some(r) => self.media.resolve(&MediaRef::document(r)).await,
            None => None,
        };
        BookResponse::from_record(book, cover_url, document_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::media::MockMediaStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    /// Shared in-memory tables standing in for the relational store,
    /// including the author→book cascade.
    #[derive(Default)]
    struct MemDb {
        authors: Mutex<Vec<Author>>,
        books: Mutex<Vec<BookWithAuthor>>,
        next_author_id: AtomicI32,
        next_book_id: AtomicI32,
    }

    struct MemAuthors(Arc<MemDb>);

    #[async_trait]
    impl AuthorsStore for MemAuthors {
        async fn list(&self) -> AppResult<Vec<Author>> {
            Ok(self.0.authors.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> AppResult<Option<Author>> {
            Ok(self
                .0
                .authors
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn exists(&self, id: i32) -> AppResult<bool> {
            Ok(self.0.authors.lock().unwrap().iter().any(|a| a.id == id))
        }

        async fn insert(
            &self,
            author: &CreateAuthor,
            photo_ref: Option<&str>,
        ) -> AppResult<Author> {
            let id = self.0.next_author_id.fetch_add(1, Ordering::SeqCst) + 1;
            let created = Author {
                id,
                given_name: author.given_name.clone(),
                family_name: author.family_name.clone(),
                nationality: author.nationality.clone(),
                birth_date: author.birth_date,
                biography: author.biography.clone(),
                photo_ref: photo_ref.map(str::to_string),
            };
            self.0.authors.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            id: i32,
            changes: &UpdateAuthor,
            photo_ref: Option<&str>,
        ) -> AppResult<Option<Author>> {
            let mut authors = self.0.authors.lock().unwrap();
            let Some(author) = authors.iter_mut().find(|a| a.id == id) else {
                return Ok(None);
            };
            if let Some(ref v) = changes.given_name {
                author.given_name = v.clone();
            }
            if let Some(ref v) = changes.family_name {
                author.family_name = v.clone();
            }
            if let Some(ref v) = changes.nationality {
                author.nationality = v.clone();
            }
            if let Some(v) = changes.birth_date {
                author.birth_date = Some(v);
            }
            if let Some(ref v) = changes.biography {
                author.biography = Some(v.clone());
            }
            if let Some(r) = photo_ref {
                author.photo_ref = Some(r.to_string());
            }
            Ok(Some(author.clone()))
        }

        async fn delete(&self, id: i32) -> AppResult<bool> {
            let mut authors = self.0.authors.lock().unwrap();
            let before = authors.len();
            authors.retain(|a| a.id != id);
            let removed = authors.len() < before;
            if removed {
                // ON DELETE CASCADE
                self.0.books.lock().unwrap().retain(|b| b.author_id != id);
            }
            Ok(removed)
        }
    }

    struct MemBooks(Arc<MemDb>);

    impl MemBooks {
        fn author_names(&self, author_id: i32) -> (String, String) {
            let authors = self.0.authors.lock().unwrap();
            let author = authors
                .iter()
                .find(|a| a.id == author_id)
                .expect("book references a missing author");
            (author.given_name.clone(), author.family_name.clone())
        }
    }

    #[async_trait]
    impl BooksStore for MemBooks {
        async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
            Ok(self.0.books.lock().unwrap().clone())
        }

        async fn get(&self, id: i32) -> AppResult<Option<BookWithAuthor>> {
            Ok(self
                .0
                .books
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == id)
                .cloned())
        }

        async fn insert(
            &self,
            book: &CreateBook,
            cover_ref: Option<&str>,
            document_ref: Option<&str>,
        ) -> AppResult<BookWithAuthor> {
            let (author_given_name, author_family_name) = self.author_names(book.author_id);
            let id = self.0.next_book_id.fetch_add(1, Ordering::SeqCst) + 1;
            let created = BookWithAuthor {
                id,
                title: book.title.clone(),
                author_id: book.author_id,
                publisher: book.publisher.clone(),
                publication_year: book.publication_year,
                isbn: book.isbn.clone(),
                category: book.category.clone(),
                language: book.language.clone(),
                copy_count: book.copy_count,
                genre: book.genre.clone(),
                page_count: book.page_count,
                synopsis: book.synopsis.clone(),
                series: book.series.clone(),
                cover_ref: cover_ref.map(str::to_string),
                document_ref: document_ref.map(str::to_string),
                author_given_name,
                author_family_name,
            };
            self.0.books.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            id: i32,
            changes: &UpdateBook,
            cover_ref: Option<&str>,
            document_ref: Option<&str>,
        ) -> AppResult<Option<BookWithAuthor>> {
            let names = changes.author_id.map(|aid| self.author_names(aid));
            let mut books = self.0.books.lock().unwrap();
            let Some(book) = books.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            if let Some(ref v) = changes.title {
                book.title = v.clone();
            }
            if let Some(v) = changes.author_id {
                book.author_id = v;
                let (given, family) = names.unwrap();
                book.author_given_name = given;
                book.author_family_name = family;
            }
            if let Some(ref v) = changes.isbn {
                book.isbn = v.clone();
            }
            if let Some(ref v) = changes.publisher {
                book.publisher = v.clone();
            }
            if let Some(v) = changes.publication_year {
                book.publication_year = v;
            }
            if let Some(ref v) = changes.category {
                book.category = v.clone();
            }
            if let Some(ref v) = changes.language {
                book.language = v.clone();
            }
            if let Some(v) = changes.copy_count {
                book.copy_count = v;
            }
            if let Some(ref v) = changes.genre {
                book.genre = v.clone();
            }
            if let Some(v) = changes.page_count {
                book.page_count = v;
            }
            if let Some(ref v) = changes.synopsis {
                book.synopsis = Some(v.clone());
            }
            if let Some(ref v) = changes.series {
                book.series = Some(v.clone());
            }
            if let Some(r) = cover_ref {
                book.cover_ref = Some(r.to_string());
            }
            if let Some(r) = document_ref {
                book.document_ref = Some(r.to_string());
            }
            Ok(Some(book.clone()))
        }

        async fn delete(&self, id: i32) -> AppResult<bool> {
            let mut books = self.0.books.lock().unwrap();
            let before = books.len();
            books.retain(|b| b.id != id);
            Ok(books.len() < before)
        }

        async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
            Ok(self
                .0
                .books
                .lock()
                .unwrap()
                .iter()
                .any(|b| b.isbn == isbn && Some(b.id) != exclude_id))
        }
    }

    /// Media store double: uploads get a `stored/<filename>` reference,
    /// references resolve to a URL under media.example.
    fn stub_media() -> MockMediaStore {
        let mut media = MockMediaStore::new();
        media.expect_store().returning(|_, filename, kind| {
            Ok(MediaRef {
                kind,
                public_id: format!("stored/{}", filename),
            })
        });
        media
            .expect_resolve()
            .returning(|m| Some(format!("https://media.example/{}", m.public_id)));
        media
    }

    fn service_with_media(media: MockMediaStore) -> CatalogService {
        let db = Arc::new(MemDb::default());
        CatalogService::new(
            Arc::new(MemAuthors(db.clone())),
            Arc::new(MemBooks(db)),
            Arc::new(media),
        )
    }

    fn service() -> CatalogService {
        service_with_media(stub_media())
    }

    fn borges() -> CreateAuthor {
        CreateAuthor {
            given_name: "Jorge Luis".to_string(),
            family_name: "Borges".to_string(),
            nationality: "Argentina".to_string(),
            birth_date: "1899-08-24".parse().ok(),
            biography: None,
        }
    }

    fn ficciones(author_id: i32) -> CreateBook {
        CreateBook {
            title: "Ficciones".to_string(),
            author_id,
            publisher: "Sur".to_string(),
            publication_year: 1944,
            isbn: "978-8420633121".to_string(),
            category: "Fiction".to_string(),
            language: "es".to_string(),
            copy_count: 3,
            genre: "Short stories".to_string(),
            page_count: 203,
            synopsis: Some("Colección de cuentos".to_string()),
            series: None,
        }
    }

    #[tokio::test]
    async fn create_book_with_duplicate_isbn_is_rejected() {
        let service = service();
        let author = service.create_author(borges(), vec![]).await.unwrap();

        service
            .create_book(ficciones(author.id), vec![])
            .await
            .unwrap();
        let err = service
            .create_book(ficciones(author.id), vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_book_with_unknown_author_is_rejected() {
        let service = service();

        let err = service.create_book(ficciones(999), vec![]).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_an_author_cascades_to_its_books() {
        let service = service();
        let author = service.create_author(borges(), vec![]).await.unwrap();
        let other = service
            .create_author(
                CreateAuthor {
                    family_name: "Cortázar".to_string(),
                    given_name: "Julio".to_string(),
                    ..borges()
                },
                vec![],
            )
            .await
            .unwrap();

        service
            .create_book(ficciones(author.id), vec![])
            .await
            .unwrap();
        let mut second = ficciones(author.id);
        second.isbn = "978-8420674189".to_string();
        service.create_book(second, vec![]).await.unwrap();

        let mut kept = ficciones(other.id);
        kept.isbn = "978-8466331864".to_string();
        let kept = service.create_book(kept, vec![]).await.unwrap();

        assert_eq!(service.list_books().await.unwrap().len(), 3);

        service.delete_author(author.id).await.unwrap();

        let remaining = service.list_books().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[tokio::test]
    async fn entity_without_attachment_serializes_null_url() {
        let service = service();

        let author = service.create_author(borges(), vec![]).await.unwrap();
        assert_eq!(author.photo_ref, None);
        assert_eq!(author.photo_url, None);

        let book = service
            .create_book(ficciones(author.id), vec![])
            .await
            .unwrap();
        assert_eq!(book.cover_url, None);
        assert_eq!(book.document_url, None);
    }

    #[tokio::test]
    async fn attachments_are_stored_and_resolved_to_urls() {
        let service = service();
        let author = service
            .create_author(
                borges(),
                vec![UploadedFile {
                    field: "photo".to_string(),
                    filename: "borges.jpg".to_string(),
                    bytes: vec![0xff, 0xd8],
                }],
            )
            .await
            .unwrap();

        assert_eq!(author.photo_ref.as_deref(), Some("stored/borges.jpg"));
        assert_eq!(
            author.photo_url.as_deref(),
            Some("https://media.example/stored/borges.jpg")
        );

        let book = service
            .create_book(
                ficciones(author.id),
                vec![
                    UploadedFile {
                        field: "cover".to_string(),
                        filename: "cover.png".to_string(),
                        bytes: vec![0x89],
                    },
                    UploadedFile {
                        field: "document".to_string(),
                        filename: "ficciones.pdf".to_string(),
                        bytes: vec![0x25],
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(book.cover_ref.as_deref(), Some("stored/cover.png"));
        assert_eq!(
            book.document_url.as_deref(),
            Some("https://media.example/stored/ficciones.pdf")
        );
    }

    #[tokio::test]
    async fn unresolvable_reference_degrades_to_null_url() {
        let mut media = MockMediaStore::new();
        media.expect_store().returning(|_, filename, kind| {
            Ok(MediaRef {
                kind,
                public_id: format!("stored/{}", filename),
            })
        });
        // Store reachable at write time, unreachable at read time
        media.expect_resolve().returning(|_| None);

        let service = service_with_media(media);
        let author = service
            .create_author(
                borges(),
                vec![UploadedFile {
                    field: "photo".to_string(),
                    filename: "borges.jpg".to_string(),
                    bytes: vec![1, 2, 3],
                }],
            )
            .await
            .unwrap();

        assert_eq!(author.photo_ref.as_deref(), Some("stored/borges.jpg"));
        assert_eq!(author.photo_url, None);
    }

    #[tokio::test]
    async fn created_book_round_trips_unchanged() {
        let service = service();
        let author = service.create_author(borges(), vec![]).await.unwrap();
        let input = ficciones(author.id);
        let created = service.create_book(input, vec![]).await.unwrap();

        let fetched = service.get_book(created.id).await.unwrap();
        assert_eq!(fetched.title, "Ficciones");
        assert_eq!(fetched.publisher, "Sur");
        assert_eq!(fetched.publication_year, 1944);
        assert_eq!(fetched.isbn, "978-8420633121");
        assert_eq!(fetched.copy_count, 3);
        assert_eq!(fetched.page_count, 203);
        assert_eq!(fetched.synopsis.as_deref(), Some("Colección de cuentos"));
        assert_eq!(fetched.author_given_name, "Jorge Luis");
        assert_eq!(fetched.author_family_name, "Borges");
    }

    #[tokio::test]
    async fn updating_a_book_keeps_its_own_isbn_valid() {
        let service = service();
        let author = service.create_author(borges(), vec![]).await.unwrap();
        let created = service
            .create_book(ficciones(author.id), vec![])
            .await
            .unwrap();

        // Re-submitting the book's own isbn is not a uniqueness violation
        let updated = service
            .update_book(
                created.id,
                UpdateBook {
                    isbn: Some(created.isbn.clone()),
                    copy_count: Some(5),
                    ..UpdateBook::default()
                },
                vec![],
            )
            .await
            .unwrap();

        assert_eq!(updated.copy_count, 5);
        assert_eq!(updated.isbn, created.isbn);
    }

    #[tokio::test]
    async fn missing_entities_surface_not_found() {
        let service = service();

        assert!(matches!(
            service.get_author(42).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_book(42).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service
                .update_author(42, UpdateAuthor::default(), vec![])
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
