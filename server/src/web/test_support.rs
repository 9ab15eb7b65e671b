// inkpost_server/src/web/test_support.rs

use std::sync::Arc;

use actix_web::{
  dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
  http::StatusCode,
  test, web, App,
};
use inkpost::{HashingParams, MemoryStore};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::web::configure_app_routes;

pub(crate) fn memory_state(store: MemoryStore) -> AppState {
  let mut config = AppConfig::from_lookup(|name| match name {
    "STORE_BACKEND" => Some("memory".to_string()),
    _ => None,
  })
  .expect("memory config");
  config.hashing = HashingParams::minimal();
  AppState::new(Arc::new(store), Arc::new(config)).expect("state")
}

pub(crate) fn test_app(
  state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  App::new().app_data(web::Data::new(state)).configure(configure_app_routes)
}

pub(crate) async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
  S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
  let response = test::call_service(app, req).await;
  let status = response.status();
  let body = test::read_body(response).await;
  let value = if body.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&body).expect("json body")
  };
  (status, value)
}

/// Signs up a user through the API and returns its id.
pub(crate) async fn signup<S>(app: &S, name: &str, email: &str) -> String
where
  S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
  let req = test::TestRequest::post()
    .uri("/api/user/signup")
    .set_json(json!({ "name": name, "email": email, "password": "abcdef" }))
    .to_request();
  let (status, body) = send(app, req).await;
  assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
  body["user"]["id"].as_str().expect("user id").to_string()
}

/// Creates a blog through the API and returns its id.
pub(crate) async fn add_blog<S>(app: &S, owner: &str, title: &str) -> String
where
  S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
  let req = test::TestRequest::post()
    .uri("/api/blog/add")
    .set_json(json!({ "title": title, "content": "c", "image": "i", "user": owner }))
    .to_request();
  let (status, body) = send(app, req).await;
  assert_eq!(status, StatusCode::OK, "add failed: {}", body);
  body["blog"]["id"].as_str().expect("blog id").to_string()
}
