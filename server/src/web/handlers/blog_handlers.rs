// inkpost_server/src/web/handlers/blog_handlers.rs

use actix_web::{web, HttpResponse};
use inkpost::{BlogPatch, NewBlog};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::state::AppState;

#[instrument(name = "handler::list_blogs", skip(app_state))]
pub async fn list_blogs_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let blogs = app_state.relations.list_blogs_with_owners().await?;
  Ok(HttpResponse::Ok().json(json!({ "blogs": blogs })))
}

#[instrument(
    name = "handler::add_blog",
    skip(app_state, req_payload),
    fields(owner_id = %req_payload.user)
)]
pub async fn add_blog_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewBlog>,
) -> Result<HttpResponse> {
  let blog = app_state
    .relations
    .create_blog_with_owner(req_payload.into_inner())
    .await?;
  info!(blog_id = %blog.id, "Blog added.");
  Ok(HttpResponse::Ok().json(json!({ "blog": blog })))
}

#[instrument(name = "handler::update_blog", skip(app_state, blog_id, req_payload), fields(blog_id = %blog_id))]
pub async fn update_blog_handler(
  app_state: web::Data<AppState>,
  blog_id: web::Path<Uuid>,
  req_payload: web::Json<BlogPatch>,
) -> Result<HttpResponse> {
  let blog = app_state
    .relations
    .update_blog_fields(blog_id.into_inner(), req_payload.into_inner())
    .await
    .map_err(AppError::failed("Unable to update blog"))?;
  Ok(HttpResponse::Ok().json(json!({ "blog": blog })))
}

#[instrument(name = "handler::get_blog", skip(app_state, blog_id), fields(blog_id = %blog_id))]
pub async fn get_blog_handler(app_state: web::Data<AppState>, blog_id: web::Path<Uuid>) -> Result<HttpResponse> {
  let blog = app_state.relations.get_blog(blog_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "blog": blog })))
}

#[instrument(name = "handler::delete_blog", skip(app_state, blog_id), fields(blog_id = %blog_id))]
pub async fn delete_blog_handler(app_state: web::Data<AppState>, blog_id: web::Path<Uuid>) -> Result<HttpResponse> {
  app_state
    .relations
    .delete_blog_and_unlink(blog_id.into_inner())
    .await
    .map_err(AppError::failed("Unable to delete blog"))?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[instrument(name = "handler::user_blogs", skip(app_state, user_id), fields(user_id = %user_id))]
pub async fn get_user_blogs_handler(
  app_state: web::Data<AppState>,
  user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
  let user = app_state.relations.fetch_owner_with_blogs(user_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
