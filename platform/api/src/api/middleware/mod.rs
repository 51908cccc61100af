pub mod auth;
pub mod maintenance;
pub mod request_span;
