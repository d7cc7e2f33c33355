//! Image upload relay handlers.

use actix_multipart::form::{MultipartForm, bytes::Bytes};
use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::{DeleteOutcome, ImageFile};
use quill_core::error::RelayError;
use quill_shared::dto::{DeleteImageQuery, DeleteImageResponse, UploadResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

pub const MISSING_IMAGE_ID_MESSAGE: &str = "No image id provided.";

const DEFAULT_FILE_NAME: &str = "upload";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// `multipart/form-data` body of an upload. The image travels in the
/// `file` field; other fields are ignored.
#[derive(MultipartForm)]
pub struct UploadForm {
    file: Option<Bytes>,
}

/// POST /api/upload
///
/// Also served under `/{locale}/api/upload`.
pub async fn upload_image(
    req: HttpRequest,
    request_id: RequestId,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> AppResult<HttpResponse> {
    let Some(upload) = form.file.filter(|f| !f.data.is_empty()) else {
        return Err(RelayError::EmptyFile.into());
    };

    let name = upload
        .file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    let content_type = upload
        .content_type
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    let locale = req.match_info().get("locale");

    tracing::debug!(
        request_id = %request_id.as_str(),
        file = %name,
        size = upload.data.len(),
        locale = ?locale,
        "Relaying image upload"
    );

    let file = ImageFile::new(name, content_type, upload.data.to_vec());
    let image = state.relay.upload_one(&file, locale).await?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        url: image.url,
        name: image.name,
        id: image.id,
    }))
}

/// DELETE /api/upload?id=<image id>
pub async fn delete_image(
    state: web::Data<AppState>,
    query: web::Query<DeleteImageQuery>,
) -> AppResult<HttpResponse> {
    let Some(id) = query.into_inner().id.filter(|id| !id.trim().is_empty()) else {
        return Err(AppError::BadRequest(MISSING_IMAGE_ID_MESSAGE.to_string()));
    };

    let outcome = match state.relay.delete_one(&id).await {
        Ok(outcome) => outcome,
        Err(RelayError::NotFound) => {
            tracing::debug!(image_id = %id, "Image already deleted");
            DeleteOutcome::ok()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok().json(DeleteImageResponse {
        success: outcome.success,
        error: outcome.error,
    }))
}
