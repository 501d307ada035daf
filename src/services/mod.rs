//! Business logic services

pub mod auth;
pub mod catalog;
pub mod media;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository and media store
    pub fn new(
        repository: Repository,
        media: Arc<dyn media::MediaStore>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.users.clone(), auth_config),
            catalog: catalog::CatalogService::new(
                repository.authors.clone(),
                repository.books.clone(),
                media,
            ),
        }
    }
}
