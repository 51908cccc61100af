use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use super::{deleted, not_found, require_text};
use crate::api::error::{JsonBody, PathParam, QueryParams, Result};
use crate::api::request_context::RequestContext;
use crate::database::{GalleryItem, GalleryPatch, GalleryStatus, NewGalleryItem};
use crate::global::ApiGlobal;
use crate::permission::{GalleryAction, Permission};

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>).post(upload::<G>))
		.route("/:id", put(review::<G>).delete(remove::<G>))
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct ListQuery {
	status: GalleryStatus,
}

impl Default for ListQuery {
	fn default() -> Self {
		Self {
			status: GalleryStatus::Approved,
		}
	}
}

#[derive(Debug, serde::Deserialize)]
pub struct UploadItem {
	image_url: String,
	#[serde(default)]
	caption: Option<String>,
	#[serde(default)]
	category: Option<String>,
}

async fn list<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Vec<GalleryItem>>> {
	if query.status != GalleryStatus::Approved {
		ctx.require(Permission::Gallery(GalleryAction::Approve))?;
	}

	Ok(Json(global.store().list_gallery(query.status).await?))
}

async fn upload<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	body: Result<JsonBody<UploadItem>>,
) -> Result<(StatusCode, Json<GalleryItem>)> {
	let auth = ctx.require(Permission::Gallery(GalleryAction::Upload))?;
	let JsonBody(body) = body?;

	require_text(&body.image_url, "image_url")?;

	let item = global
		.store()
		.create_gallery_item(NewGalleryItem {
			image_url: body.image_url,
			caption: body.caption,
			category: body.category,
			uploaded_by: auth.identity.subject.clone(),
			uploader_name: auth.user.as_ref().map(|user| user.username.clone()),
		})
		.await?;

	tracing::info!(item_id = %item.id, "gallery item submitted for review");

	Ok((StatusCode::CREATED, Json(item)))
}

async fn review<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	id: Result<PathParam<Uuid>>,
	body: Result<JsonBody<GalleryPatch>>,
) -> Result<Json<GalleryItem>> {
	let auth = ctx.require(Permission::Gallery(GalleryAction::Approve))?;
	let PathParam(id) = id?;
	let JsonBody(patch) = body?;

	let item = global
		.store()
		.review_gallery_item(id, patch, &auth.identity.subject)
		.await?
		.ok_or_else(not_found)?;

	tracing::info!(item_id = %item.id, status = ?item.status, reviewer = %auth.identity.subject, "gallery item reviewed");

	Ok(Json(item))
}

async fn remove<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	id: Result<PathParam<Uuid>>,
) -> Result<Json<Value>> {
	ctx.require(Permission::Gallery(GalleryAction::Delete))?;
	let PathParam(id) = id?;

	deleted(global.store().delete_gallery_item(id).await?)
}
