// inkpost_server/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{blog_handlers, user_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Largest JSON body accepted, in bytes.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

// Malformed bodies and ids get the same `{ "message": ... }` shape as every other error.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  match err {
    JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
      AppError::PayloadTooLarge(format!("Request body too large: {}", err)).into()
    }
    other => AppError::BadRequest(format!("Invalid request body: {}", other)).into(),
  }
}

fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::BadRequest(format!("Invalid id: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler),
    )
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .service(
      web::scope("/api")
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/user")
            .route("", web::get().to(user_handlers::list_users_handler))
            .route("/signup", web::post().to(user_handlers::signup_handler))
            .route("/signin", web::post().to(user_handlers::signin_handler)),
        )
        .service(
          web::scope("/blog")
            .route("", web::get().to(blog_handlers::list_blogs_handler))
            .route("/add", web::post().to(blog_handlers::add_blog_handler))
            .route("/update/{id}", web::put().to(blog_handlers::update_blog_handler))
            .route("/user/{id}", web::get().to(blog_handlers::get_user_blogs_handler))
            .service(
              web::resource("/{id}")
                .route(web::get().to(blog_handlers::get_blog_handler))
                .route(web::delete().to(blog_handlers::delete_blog_handler)),
            ),
        ),
    );
}
