use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::{deleted, not_found, require_slug, require_text};
use crate::api::error::{JsonBody, PathParam, QueryParams, Result};
use crate::api::request_context::RequestContext;
use crate::database::{BlogPost, BlogPostPatch, BlogStatus, NewBlogPost, RowKey};
use crate::global::ApiGlobal;
use crate::permission::{ContentAction, Permission};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>).post(create::<G>))
		.route("/:key", get(find::<G>).put(update::<G>).delete(remove::<G>))
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct ListQuery {
	status: BlogStatus,
	limit: i64,
}

impl Default for ListQuery {
	fn default() -> Self {
		Self {
			status: BlogStatus::Published,
			limit: DEFAULT_LIMIT,
		}
	}
}

#[derive(Debug, serde::Deserialize)]
pub struct CreateBlogPost {
	title: String,
	content: String,
	#[serde(default)]
	slug: Option<String>,
	#[serde(default)]
	excerpt: Option<String>,
	#[serde(default)]
	featured_image: Option<String>,
	#[serde(default)]
	status: BlogStatus,
	#[serde(default)]
	category: Option<String>,
	#[serde(default)]
	tags: Vec<String>,
}

async fn list<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Vec<BlogPost>>> {
	if query.status != BlogStatus::Published {
		ctx.require(Permission::Blog(ContentAction::Edit))?;
	}

	let posts = global
		.store()
		.list_blog_posts(query.status, query.limit.clamp(1, MAX_LIMIT))
		.await?;

	Ok(Json(posts))
}

/// Drafts read as missing to callers that cannot edit them.
async fn find<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
) -> Result<Json<BlogPost>> {
	let post = global
		.store()
		.blog_post(&RowKey::parse(&key))
		.await?
		.filter(|post| post.status == BlogStatus::Published || ctx.can(Permission::Blog(ContentAction::Edit)))
		.ok_or_else(not_found)?;

	Ok(Json(post))
}

async fn create<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	body: Result<JsonBody<CreateBlogPost>>,
) -> Result<(StatusCode, Json<BlogPost>)> {
	let auth = ctx.require(Permission::Blog(ContentAction::Create))?;
	let JsonBody(body) = body?;

	require_text(&body.title, "title")?;
	require_text(&body.content, "content")?;
	let slug = require_slug(body.slug.as_deref().unwrap_or(&body.title))?;

	let post = global
		.store()
		.create_blog_post(NewBlogPost {
			title: body.title,
			slug,
			content: body.content,
			excerpt: body.excerpt,
			featured_image: body.featured_image,
			author_id: auth.identity.subject.clone(),
			author_name: auth.user.as_ref().map(|user| user.username.clone()),
			status: body.status,
			category: body.category,
			tags: body.tags,
		})
		.await?;

	tracing::info!(post_id = %post.id, slug = %post.slug, status = ?post.status, "blog post created");

	Ok((StatusCode::CREATED, Json(post)))
}

async fn update<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
	body: Result<JsonBody<BlogPostPatch>>,
) -> Result<Json<BlogPost>> {
	ctx.require(Permission::Blog(ContentAction::Edit))?;
	let JsonBody(mut patch) = body?;

	if let Some(title) = &patch.title {
		require_text(title, "title")?;
	}

	if let Some(slug) = patch.slug.take() {
		patch.slug = Some(require_slug(&slug)?);
	}

	let post = global
		.store()
		.update_blog_post(&RowKey::parse(&key), patch)
		.await?
		.ok_or_else(not_found)?;

	Ok(Json(post))
}

async fn remove<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	PathParam(key): PathParam<String>,
) -> Result<Json<Value>> {
	ctx.require(Permission::Blog(ContentAction::Delete))?;

	deleted(global.store().delete_blog_post(&RowKey::parse(&key)).await?)
}
