use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::{deleted, not_found, require_slug, require_text};
use crate::api::error::{JsonBody, PathParam, QueryParams, Result};
use crate::api::request_context::RequestContext;
use crate::database::{NewVtuber, RowKey, Vtuber, VtuberPatch};
use crate::global::ApiGlobal;
use crate::permission::{ContentAction, Permission};

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>).post(create::<G>))
		.route("/:key", get(find::<G>).put(update::<G>).delete(remove::<G>))
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ListQuery {
	generation: Option<i32>,
}

#[derive(Debug, serde::Deserialize)]
pub struct CreateVtuber {
	name: String,
	generation: i32,
	#[serde(default)]
	slug: Option<String>,
	#[serde(default)]
	bio: Option<String>,
	#[serde(default)]
	avatar_url: Option<String>,
	#[serde(default)]
	agency: Option<String>,
	#[serde(default)]
	social_links: BTreeMap<String, String>,
}

async fn list<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Vec<Vtuber>>> {
	Ok(Json(global.store().list_vtubers(query.generation).await?))
}

async fn find<G: ApiGlobal>(State(global): State<Arc<G>>, PathParam(key): PathParam<String>) -> Result<Json<Vtuber>> {
	let vtuber = global.store().vtuber(&RowKey::parse(&key)).await?.ok_or_else(not_found)?;

	Ok(Json(vtuber))
}

async fn create<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	body: Result<JsonBody<CreateVtuber>>,
) -> Result<(StatusCode, Json<Vtuber>)> {
	let auth = ctx.require(Permission::Vtuber(ContentAction::Create))?;
	let JsonBody(body) = body?;

	require_text(&body.name, "name")?;
	let slug = require_slug(body.slug.as_deref().unwrap_or(&body.name))?;

	let vtuber = global
		.store()
		.create_vtuber(NewVtuber {
			name: body.name,
			slug,
			bio: body.bio,
			avatar_url: body.avatar_url,
			generation: body.generation,
			agency: body.agency,
			social_links: body.social_links,
			created_by: auth.identity.subject.clone(),
		})
		.await?;

	tracing::info!(vtuber_id = %vtuber.id, slug = %vtuber.slug, "vtuber created");

	Ok((StatusCode::CREATED, Json(vtuber)))
}

async fn update<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
	body: Result<JsonBody<VtuberPatch>>,
) -> Result<Json<Vtuber>> {
	ctx.require(Permission::Vtuber(ContentAction::Edit))?;
	let JsonBody(mut patch) = body?;

	if let Some(name) = &patch.name {
		require_text(name, "name")?;
	}

	if let Some(slug) = patch.slug.take() {
		patch.slug = Some(require_slug(&slug)?);
	}

	let vtuber = global
		.store()
		.update_vtuber(&RowKey::parse(&key), patch)
		.await?
		.ok_or_else(not_found)?;

	Ok(Json(vtuber))
}

async fn remove<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
) -> Result<Json<Value>> {
	ctx.require(Permission::Vtuber(ContentAction::Delete))?;

	deleted(global.store().delete_vtuber(&RowKey::parse(&key)).await?)
}
