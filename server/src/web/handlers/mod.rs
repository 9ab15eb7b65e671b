// inkpost_server/src/web/handlers/mod.rs

pub mod blog_handlers;
pub mod user_handlers;
