use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use quill_core::domain::{DeleteOutcome, ImageFile, PostPatch, UploadedImage};
use quill_core::error::RelayError;
use quill_core::ports::{PostStore, UploadRelay};

use super::configure_routes;
use crate::state::AppState;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

/// Relay whose every call fails with the same error.
struct FailingRelay(fn() -> RelayError);

#[async_trait]
impl UploadRelay for FailingRelay {
    async fn upload_one(
        &self,
        _file: &ImageFile,
        _locale: Option<&str>,
    ) -> Result<UploadedImage, RelayError> {
        Err((self.0)())
    }

    async fn delete_one(&self, _id: &str) -> Result<DeleteOutcome, RelayError> {
        Err((self.0)())
    }
}

fn failing_state(err: fn() -> RelayError) -> AppState {
    AppState {
        relay: Arc::new(FailingRelay(err)),
        ..AppState::in_memory()
    }
}

const BOUNDARY: &str = "quill-upload-boundary";

/// A `multipart/form-data` request with a single file part.
fn multipart_upload(uri: &str, field: &str, file_name: &str, data: &[u8]) -> test::TestRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn png_upload(uri: &str, file_name: &str) -> test::TestRequest {
    multipart_upload(uri, "file", file_name, b"\x89PNG fake image")
}

#[actix_rt::test]
async fn test_health_reports_backends() {
    let app = app!(AppState::in_memory());

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request())
            .await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["relay"], "memory");
}

#[actix_rt::test]
async fn test_upload_returns_hosted_image() {
    let app = app!(AppState::in_memory());

    let res = test::call_service(&app, png_upload("/api/upload", "cat.png").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "cat.png");
    assert!(body["url"].as_str().unwrap().ends_with("/cat.png"));
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_upload_under_locale_prefix() {
    let app = app!(AppState::in_memory());

    let res = test::call_service(&app, png_upload("/fr/api/upload", "a.png").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = app!(AppState::in_memory());

    for req in [
        multipart_upload("/api/upload", "files", "a.png", b"\x89PNG"),
        multipart_upload("/api/upload", "file", "a.png", b""),
    ] {
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "No file provided.");
    }
}

#[actix_rt::test]
async fn test_upload_requires_multipart_body() {
    let app = app!(AppState::in_memory());

    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header((header::CONTENT_TYPE, "image/png"))
        .set_payload(&b"\x89PNG"[..])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_upload_keeps_host_status() {
    let app = app!(failing_state(|| RelayError::Api {
        status: 413,
        message: "too large".into(),
    }));

    let res = test::call_service(&app, png_upload("/api/upload", "big.png").to_request()).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "API Error: too large");
}

#[actix_rt::test]
async fn test_upload_with_malformed_host_answer() {
    let app = app!(failing_state(|| RelayError::InvalidResponse));

    let res = test::call_service(&app, png_upload("/api/upload", "a.png").to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "Invalid response format from external API.");
}

#[actix_rt::test]
async fn test_delete_image_requires_id() {
    let app = app!(AppState::in_memory());

    for uri in ["/api/upload", "/api/upload?id="] {
        let res = test::call_service(&app, test::TestRequest::delete().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "No image id provided.");
    }
}

#[actix_rt::test]
async fn test_delete_image_twice_succeeds() {
    let app = app!(AppState::in_memory());

    let uploaded: Value =
        test::call_and_read_body_json(&app, png_upload("/api/upload", "a.png").to_request())
            .await;
    let uri = format!("/api/upload?id={}", uploaded["id"].as_str().unwrap());

    for _ in 0..2 {
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::delete().uri(&uri).to_request())
                .await;
        assert_eq!(body["success"], true);
    }
}

#[actix_rt::test]
async fn test_delete_image_missing_on_host_succeeds() {
    let app = app!(failing_state(|| RelayError::NotFound));

    let req = test::TestRequest::delete().uri("/api/upload?id=42").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
}

#[actix_rt::test]
async fn test_list_posts_in_display_order() {
    let state = AppState::in_memory();
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let t3 = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

    state
        .posts
        .insert(PostPatch::draft("Draft", "<p>d</p>", "Ada", Some("ada@example.com"), t1))
        .await
        .unwrap();
    state
        .posts
        .insert(PostPatch::published("Newest", "<p>n</p>", "Bob", None, t2))
        .await
        .unwrap();
    state
        .posts
        .insert(PostPatch::published("Oldest", "<p>o</p>", "Ada", Some("ada@example.com"), t3))
        .await
        .unwrap();

    let app = app!(state);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Newest", "Oldest", "Draft"]);

    let req = test::TestRequest::get()
        .uri("/api/posts?owner=ada@example.com")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_get_and_delete_post() {
    let state = AppState::in_memory();
    let id = state
        .posts
        .insert(PostPatch::draft("", "<p>x</p>", "Ada", None, Utc::now()))
        .await
        .unwrap();
    let app = app!(state);
    let uri = format!("/api/posts/{id}");

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(body["data"]["title"], "Untitled Draft");

    for _ in 0..2 {
        let res = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
