// inkpost_server/src/web/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::configure_app_routes;

#[cfg(test)]
pub(crate) mod test_support;
