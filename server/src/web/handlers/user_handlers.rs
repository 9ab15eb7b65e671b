// inkpost_server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use inkpost::{Credentials, NewUser};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::Result;
use crate::state::AppState;

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse> {
  let users = app_state.accounts.list_users().await?;
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewUser>,
) -> Result<HttpResponse> {
  let user = app_state.accounts.sign_up(req_payload.into_inner()).await?;
  info!(user_id = %user.id, "Signup successful.");
  Ok(HttpResponse::Created().json(json!({ "user": user })))
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<Credentials>,
) -> Result<HttpResponse> {
  let user = app_state.accounts.sign_in(req_payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Login successful", "user": user })))
}
