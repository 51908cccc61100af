use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use uuid::Uuid;

use super::not_found;
use crate::api::auth::AuthError;
use crate::api::error::{JsonBody, PathParam, Result};
use crate::api::request_context::RequestContext;
use crate::database::User;
use crate::global::ApiGlobal;
use crate::permission::{Permission, Role, UsersAction};

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>))
		.route("/me", get(me))
		.route("/:id", put(set_role::<G>))
}

#[derive(Debug, serde::Deserialize)]
pub struct SetRole {
	role: Role,
}

/// The caller's own row. The auth middleware already created it if this is
/// the first request for the identity.
async fn me(ctx: RequestContext) -> Result<Json<User>> {
	let auth = ctx.require_login()?;
	let user = auth.user.clone().ok_or(AuthError::FetchUser)?;

	Ok(Json(user))
}

async fn list<G: ApiGlobal>(State(global): State<Arc<G>>, ctx: RequestContext) -> Result<Json<Vec<User>>> {
	ctx.require(Permission::Users(UsersAction::View))?;

	Ok(Json(global.store().list_users().await?))
}

async fn set_role<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	id: Result<PathParam<Uuid>>,
	body: Result<JsonBody<SetRole>>,
) -> Result<Json<User>> {
	let auth = ctx.require(Permission::Users(UsersAction::Manage))?;
	let PathParam(id) = id?;
	let JsonBody(body) = body?;

	let user = global.store().set_user_role(id, body.role).await?.ok_or_else(not_found)?;

	tracing::info!(user_id = %user.id, role = %user.role, by = %auth.identity.subject, "user role changed");

	Ok(Json(user))
}
