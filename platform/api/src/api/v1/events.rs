use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{bad_request, deleted, not_found, require_slug, require_text};
use crate::api::error::{JsonBody, PathParam, Result};
use crate::api::request_context::RequestContext;
use crate::database::{DatabaseError, Event, EventPatch, EventStatus, LocationType, NewEvent, RowKey};
use crate::global::ApiGlobal;
use crate::permission::{ContentAction, Permission};

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>).post(create::<G>))
		.route("/:key", get(find::<G>).put(update::<G>).delete(remove::<G>))
}

#[derive(Debug, serde::Deserialize)]
pub struct CreateEvent {
	title: String,
	start_date: DateTime<Utc>,
	end_date: DateTime<Utc>,
	#[serde(default)]
	slug: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	short_description: Option<String>,
	#[serde(default)]
	banner_image: Option<String>,
	#[serde(default)]
	location: Option<String>,
	#[serde(default)]
	location_type: LocationType,
	#[serde(default)]
	max_participants: Option<i32>,
	#[serde(default)]
	status: EventStatus,
	#[serde(default)]
	category: Option<String>,
}

const DATES_MESSAGE: &str = "end_date must not be before start_date";

#[track_caller]
fn check_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
	if end < start {
		return Err(bad_request(DATES_MESSAGE));
	}

	Ok(())
}

async fn list<G: ApiGlobal>(State(global): State<Arc<G>>) -> Result<Json<Vec<Event>>> {
	Ok(Json(global.store().list_events().await?))
}

async fn find<G: ApiGlobal>(State(global): State<Arc<G>>, PathParam(key): PathParam<String>) -> Result<Json<Event>> {
	let event = global.store().event(&RowKey::parse(&key)).await?.ok_or_else(not_found)?;

	Ok(Json(event))
}

async fn create<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	body: Result<JsonBody<CreateEvent>>,
) -> Result<(StatusCode, Json<Event>)> {
	let auth = ctx.require(Permission::Events(ContentAction::Create))?;
	let JsonBody(body) = body?;

	require_text(&body.title, "title")?;
	check_dates(body.start_date, body.end_date)?;
	let slug = require_slug(body.slug.as_deref().unwrap_or(&body.title))?;

	let event = global
		.store()
		.create_event(NewEvent {
			title: body.title,
			slug,
			description: body.description,
			short_description: body.short_description,
			banner_image: body.banner_image,
			start_date: body.start_date,
			end_date: body.end_date,
			location: body.location,
			location_type: body.location_type,
			max_participants: body.max_participants,
			status: body.status,
			category: body.category,
			organizer_id: auth.identity.subject.clone(),
		})
		.await?;

	tracing::info!(event_id = %event.id, slug = %event.slug, "event created");

	global.notifier().announce_event(&event);

	Ok((StatusCode::CREATED, Json(event)))
}

async fn update<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
	body: Result<JsonBody<EventPatch>>,
) -> Result<Json<Event>> {
	ctx.require(Permission::Events(ContentAction::Edit))?;
	let JsonBody(mut patch) = body?;

	if let Some(title) = &patch.title {
		require_text(title, "title")?;
	}

	if let Some(slug) = patch.slug.take() {
		patch.slug = Some(require_slug(&slug)?);
	}

	// Only one end of the range may be in the patch, so the row's check
	// constraint has the final say.
	let event = match global.store().update_event(&RowKey::parse(&key), patch).await {
		Err(DatabaseError::Invalid(_)) => return Err(bad_request(DATES_MESSAGE)),
		res => res?.ok_or_else(not_found)?,
	};

	Ok(Json(event))
}

async fn remove<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
) -> Result<Json<Value>> {
	ctx.require(Permission::Events(ContentAction::Delete))?;

	deleted(global.store().delete_event(&RowKey::parse(&key)).await?)
}
