//! Upload relay client that talks to the relay endpoint of the API server.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use quill_core::domain::{DeleteOutcome, ImageFile, UploadedImage};
use quill_core::error::RelayError;
use quill_core::ports::UploadRelay;
use quill_shared::dto::{
    DeleteImageQuery, DeleteImageResponse, UPLOAD_FILE_FIELD, UploadResponse,
};
use quill_shared::response::ErrorResponse;

const API_ERROR_PREFIX: &str = "API Error: ";

/// HTTP client for `POST /api/upload` and `DELETE /api/upload`.
pub struct HttpUploadRelay {
    client: Client,
    base_url: String,
}

impl HttpUploadRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn upload_url(&self, locale: Option<&str>) -> String {
        match locale {
            Some(locale) if !locale.is_empty() => {
                format!("{}/{}/api/upload", self.base_url, locale)
            }
            _ => format!("{}/api/upload", self.base_url),
        }
    }
}

/// Turn a failed relay answer back into the error the server reported.
fn relay_error(status: StatusCode, body: &[u8]) -> RelayError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .map(|problem| problem.message().to_string())
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());

    if status == StatusCode::BAD_REQUEST && message == RelayError::EmptyFile.to_string() {
        return RelayError::EmptyFile;
    }
    if message == RelayError::InvalidResponse.to_string() {
        return RelayError::InvalidResponse;
    }

    let message = message
        .strip_prefix(API_ERROR_PREFIX)
        .map(str::to_string)
        .unwrap_or(message);
    RelayError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl UploadRelay for HttpUploadRelay {
    async fn upload_one(
        &self,
        file: &ImageFile,
        locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError> {
        if file.is_empty() {
            return Err(RelayError::EmptyFile);
        }

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| RelayError::Upload(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FILE_FIELD, part);

        let response = self
            .client
            .post(self.upload_url(locale))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        if !status.is_success() {
            let err = relay_error(status, &body);
            tracing::warn!(status = %status, file = %file.name, error = %err, "Upload rejected");
            return Err(err);
        }

        let uploaded: UploadResponse =
            serde_json::from_slice(&body).map_err(|_| RelayError::InvalidResponse)?;
        Ok(UploadedImage {
            url: uploaded.url,
            id: uploaded.id,
            name: uploaded.name,
        })
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome, RelayError> {
        let query = DeleteImageQuery {
            id: Some(id.to_string()),
        };
        let response = self
            .client
            .delete(self.upload_url(None))
            .query(&query)
            .send()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::ok());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;
        if !status.is_success() {
            return Err(relay_error(status, &body));
        }

        let outcome: DeleteImageResponse =
            serde_json::from_slice(&body).map_err(|_| RelayError::InvalidResponse)?;
        Ok(match (outcome.success, outcome.error) {
            (true, _) => DeleteOutcome::ok(),
            (false, error) => DeleteOutcome::failed(error.unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_with_locale() {
        let relay = HttpUploadRelay::new("http://localhost:8080/");

        assert_eq!(relay.upload_url(None), "http://localhost:8080/api/upload");
        assert_eq!(relay.upload_url(Some("")), "http://localhost:8080/api/upload");
        assert_eq!(
            relay.upload_url(Some("fr")),
            "http://localhost:8080/fr/api/upload"
        );
    }

    #[test]
    fn test_problem_detail_becomes_relay_error() {
        let body = serde_json::to_vec(&ErrorResponse::bad_request("No file provided.")).unwrap();
        assert!(matches!(
            relay_error(StatusCode::BAD_REQUEST, &body),
            RelayError::EmptyFile
        ));

        let body = serde_json::to_vec(&ErrorResponse::bad_gateway(413, "API Error: too large"))
            .unwrap();
        match relay_error(StatusCode::PAYLOAD_TOO_LARGE, &body) {
            RelayError::Api { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_failure_is_kept() {
        match relay_error(StatusCode::BAD_GATEWAY, b"upstream down") {
            RelayError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
