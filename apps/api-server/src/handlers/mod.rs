//! HTTP handlers and route configuration.

mod health;
mod posts;
mod upload;

#[cfg(test)]
mod tests;

use actix_web::{Resource, web};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(upload_resource())
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            ),
    )
    // Locale-prefixed pages post to their own prefix.
    .service(web::scope("/{locale}/api").service(upload_resource()));
}

fn upload_resource() -> Resource {
    web::resource("/upload")
        .route(web::post().to(upload::upload_image))
        .route(web::delete().to(upload::delete_image))
}
