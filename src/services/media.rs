//! Media store client.
//!
//! Talks to a Cloudinary-style HTTP API: signed multipart uploads under
//! `/v1_1/<cloud>/<image|raw>/upload`, resource lookups under the admin
//! resources endpoint. Upload failures are reported to the caller;
//! resolution failures are swallowed to `None` so reads degrade to a
//! missing URL instead of an error.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
    models::media::{MediaKind, MediaRef},
};

/// Storage contract of the external media store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a binary and return the reference the store assigned to it
    async fn store(&self, data: Vec<u8>, filename: &str, kind: MediaKind) -> AppResult<MediaRef>;

    /// Resolve a reference to its retrieval URL. Never fails: an
    /// unreachable store or an unknown reference yields `None`.
    async fn resolve(&self, media: &MediaRef) -> Option<String>;
}

pub struct HttpMediaStore {
    http: reqwest::Client,
    config: MediaConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
}

#[derive(Deserialize)]
struct ResourceResponse {
    secure_url: String,
}

impl HttpMediaStore {
    pub fn new(config: MediaConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build media store client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Upload signature: hex SHA-1 over the signed parameters followed by
    /// the API secret, as the store's upload API requires.
    fn sign_upload(&self, timestamp: i64) -> String {
        let mut hasher = Sha1::new();
        hasher.update(format!("timestamp={}{}", timestamp, self.config.api_secret));
        hex::encode(hasher.finalize())
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.base_url,
            self.config.cloud_name,
            kind.storage_path()
        )
    }

    fn resource_url(&self, media: &MediaRef) -> String {
        format!(
            "{}/v1_1/{}/resources/{}/upload/{}",
            self.config.base_url,
            self.config.cloud_name,
            media.kind.storage_path(),
            media.public_id
        )
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn store(&self, data: Vec<u8>, filename: &str, kind: MediaKind) -> AppResult<MediaRef> {
        let timestamp = Utc::now().timestamp();
        let signature = self.sign_upload(timestamp);

        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let response = self
            .http
            .post(self.upload_url(kind))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Media(format!(
                "Upload rejected with status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Media(format!("Invalid upload response: {}", e)))?;

        tracing::debug!("Stored media asset {} ({:?})", body.public_id, kind);

        Ok(MediaRef {
            kind,
            public_id: body.public_id,
        })
    }

    async fn resolve(&self, media: &MediaRef) -> Option<String> {
        let result = self
            .http
            .get(self.resource_url(media))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(
                    "Media store returned status {} for {}",
                    r.status(),
                    media.public_id
                );
                return None;
            }
            Err(e) => {
                tracing::warn!("Media store unreachable: {}", e);
                return None;
            }
        };

        match response.json::<ResourceResponse>().await {
            Ok(body) => Some(body.secure_url),
            Err(e) => {
                tracing::warn!("Invalid resource response for {}: {}", media.public_id, e);
                None
            }
        }
    }
}
