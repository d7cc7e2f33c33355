//! Client for the remote image host the relay endpoint forwards to.
//!
//! The host accepts multipart uploads under the `files` field at
//! `/api/upload` and answers with an array describing the stored files.
//! Deletion is `DELETE /api/upload/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use quill_core::domain::{DeleteOutcome, ImageFile, UploadedImage};
use quill_core::error::RelayError;
use quill_core::ports::UploadRelay;

/// Remote image host configuration.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    /// Host origin, e.g. `https://images.example.com`. Returned URLs are
    /// prefixed with it.
    pub base_url: String,
    /// Bearer token sent with every call, if the host requires one.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337".to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ImageHostConfig {
    /// Load configuration from environment variables. `None` when
    /// `IMAGE_HOST_URL` is unset.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("IMAGE_HOST_URL").ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: std::env::var("IMAGE_HOST_TOKEN").ok(),
            timeout: Duration::from_secs(
                std::env::var("IMAGE_HOST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct HostedFile {
    url: Option<String>,
    name: Option<String>,
    id: Option<serde_json::Value>,
    hash: Option<String>,
    ext: Option<String>,
}

/// Interpret the host's upload answer.
pub fn parse_upload_response(base_url: &str, body: &[u8]) -> Result<UploadedImage, RelayError> {
    let files: Vec<HostedFile> =
        serde_json::from_slice(body).map_err(|_| RelayError::InvalidResponse)?;
    let first = files.into_iter().next().ok_or(RelayError::InvalidResponse)?;

    let (Some(url), Some(_), Some(id)) = (first.url, first.name, first.id) else {
        return Err(RelayError::InvalidResponse);
    };
    let id = match id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => return Err(RelayError::InvalidResponse),
    };
    let name = format!(
        "{}{}",
        first.hash.unwrap_or_default(),
        first.ext.unwrap_or_default()
    );

    Ok(UploadedImage {
        url: format!("{base_url}{url}"),
        id,
        name: Some(name),
    })
}

/// HTTP client for the remote image host.
pub struct RemoteImageHost {
    client: Client,
    config: ImageHostConfig,
}

impl RemoteImageHost {
    pub fn new(config: ImageHostConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        tracing::info!(url = %config.base_url, "Image host client ready");
        Ok(Self { client, config })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl UploadRelay for RemoteImageHost {
    async fn upload_one(
        &self,
        file: &ImageFile,
        _locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError> {
        if file.is_empty() {
            return Err(RelayError::EmptyFile);
        }

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| RelayError::Upload(e.to_string()))?;
        let form = Form::new().part("files", part);

        let url = format!("{}/api/upload", self.config.base_url);
        let response = self
            .authorize(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, file = %file.name, "Image host rejected upload");
            return Err(RelayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;
        let hosted = parse_upload_response(&self.config.base_url, &body).inspect_err(|_| {
            tracing::error!(file = %file.name, "Invalid response format from image host");
        })?;

        tracing::info!(url = %hosted.url, image_id = %hosted.id, "Successfully uploaded image");
        Ok(hosted)
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, RelayError> {
        let url = format!("{}/api/upload/{}", self.config.base_url, id);
        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(image_id = %id, "Image already gone from host");
            return Ok(DeleteOutcome::ok());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RelayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(image_id = %id, "Image deleted from host");
        Ok(DeleteOutcome::ok())
    }
}
