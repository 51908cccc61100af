use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::http::RouteError;
use serde_json::{json, Value};

use super::error::{ApiError, Result};
use crate::global::ApiGlobal;
use crate::slug::slugify;

pub mod admin;
pub mod blog;
pub mod discord;
pub mod events;
pub mod gallery;
pub mod health;
pub mod settings;
pub mod users;
pub mod vtuber;

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/health", get(health::health))
		.route("/discord", get(discord::stats::<G>))
		.route("/admin", get(admin::overview))
		.nest("/vtubers", vtuber::routes::<G>())
		.nest("/blog", blog::routes::<G>())
		.nest("/events", events::routes::<G>())
		.nest("/gallery", gallery::routes::<G>())
		.nest("/users", users::routes::<G>())
		.nest("/settings", settings::routes::<G>())
}

#[track_caller]
fn not_found() -> RouteError<ApiError> {
	RouteError::new(StatusCode::NOT_FOUND, "not found")
}

#[track_caller]
fn bad_request(message: &str) -> RouteError<ApiError> {
	RouteError::new(StatusCode::BAD_REQUEST, message)
}

/// Slugs the given text, rejecting input that has nothing left to slug.
#[track_caller]
fn require_slug(text: &str) -> Result<String> {
	let slug = slugify(text);
	if slug.is_empty() {
		return Err(bad_request("slug must contain at least one letter or digit"));
	}

	Ok(slug)
}

#[track_caller]
fn require_text(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(bad_request(&format!("{field} is required")));
	}

	Ok(())
}

fn deleted(found: bool) -> Result<Json<Value>> {
	if !found {
		return Err(not_found());
	}

	Ok(Json(json!({ "success": true })))
}
