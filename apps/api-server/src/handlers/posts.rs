//! Post listing handlers.

use actix_web::{HttpResponse, web};

use quill_core::PostListing;
use quill_core::domain::PostId;
use quill_core::listing::{AlwaysConfirm, DELETE_ERROR_MESSAGE, LOAD_ERROR_MESSAGE};
use quill_shared::dto::ListPostsQuery;
use quill_shared::response::ApiResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts[?owner=<email>]
///
/// Published posts first, newest first within each group.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let mut listing = PostListing::new(state.posts.clone());

    let loaded = match query.into_inner().owner {
        Some(owner) => listing.fetch_for_owner(&owner).await,
        None => listing.fetch_all().await,
    };
    if !loaded {
        let message = listing.error().unwrap_or(LOAD_ERROR_MESSAGE);
        return Err(AppError::Internal(message.to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing.sorted())))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());

    let post = state
        .posts
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
///
/// Deleting a post that is already gone succeeds.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    let mut listing = PostListing::new(state.posts.clone());

    if !listing.delete_post(&id, &AlwaysConfirm).await {
        let message = listing.error().unwrap_or(DELETE_ERROR_MESSAGE);
        return Err(AppError::Internal(message.to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Post deleted")))
}
