use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::require_text;
use crate::api::error::{JsonBody, Result};
use crate::api::middleware::maintenance::maintenance_active;
use crate::api::request_context::RequestContext;
use crate::database::Setting;
use crate::global::ApiGlobal;
use crate::permission::{AdminAction, Permission};

pub fn routes<G: ApiGlobal>() -> Router<Arc<G>> {
	Router::new()
		.route("/", get(list::<G>).post(upsert::<G>))
		.route("/maintenance", get(maintenance::<G>))
}

#[derive(Debug, serde::Deserialize)]
pub struct UpsertSetting {
	key: String,
	/// Stored as text. Non-string json values are stored in their json form,
	/// so `true` and `"true"` are the same setting value.
	value: Value,
}

async fn list<G: ApiGlobal>(State(global): State<Arc<G>>) -> Result<Json<Vec<Setting>>> {
	Ok(Json(global.store().list_settings().await?))
}

async fn maintenance<G: ApiGlobal>(State(global): State<Arc<G>>) -> Result<Json<Value>> {
	let active = maintenance_active(&global).await?;

	Ok(Json(json!({ "maintenance": active })))
}

async fn upsert<G: ApiGlobal>(
	State(global): State<Arc<G>>,
	ctx: RequestContext,
	body: Result<JsonBody<UpsertSetting>>,
) -> Result<Json<Setting>> {
	let auth = ctx.require(Permission::Admin(AdminAction::Settings))?;
	let JsonBody(body) = body?;

	require_text(&body.key, "key")?;

	let value = match body.value {
		Value::String(value) => value,
		value => value.to_string(),
	};

	let setting = global
		.store()
		.upsert_setting(body.key.trim(), &value, &auth.identity.subject)
		.await?;

	tracing::info!(key = %setting.key, value = %setting.value, by = %auth.identity.subject, "setting updated");

	Ok(Json(setting))
}
