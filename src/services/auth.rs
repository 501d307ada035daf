//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Claims, LoginResponse, TokenUse, User},
    repository::UsersStore,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Authenticate by email or username and mint a signed token pair.
    ///
    /// Unknown identifier, inactive account and wrong password are
    /// indistinguishable from the outside: all collapse into
    /// `InvalidCredentials`.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_active_by_identifier(identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, password) {
            return Err(AppError::InvalidCredentials);
        }

        let access = self.mint_token(&user, TokenUse::Access)?;
        let refresh = self.mint_token(&user, TokenUse::Refresh)?;

        tracing::info!("User {} authenticated", user.username);

        Ok(LoginResponse {
            username: user.username,
            email: user.email,
            role: user.role,
            access,
            refresh,
        })
    }

    fn verify_password(&self, user: &User, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&user.password_hash) {
            Ok(hash) => hash,
            Err(_) => {
                // A malformed stored hash must not read differently from a
                // wrong password at the API boundary.
                tracing::warn!("Stored password hash for user {} is malformed", user.id);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn mint_token(&self, user: &User, token_use: TokenUse) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = match token_use {
            TokenUse::Access => now + self.config.access_token_minutes as i64 * 60,
            TokenUse::Refresh => now + self.config.refresh_token_days as i64 * 86_400,
        };

        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            role: user.role,
            token_use,
            iat: now,
            exp,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Hash a plaintext password to its PHC string form. Account
    /// provisioning happens outside this service; this is the hash the
    /// credential store is expected to hold.
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
