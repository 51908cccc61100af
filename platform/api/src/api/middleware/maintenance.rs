use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use common::http::RouteError;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::config::MaintenanceConfig;
use crate::database::{DatabaseError, MAINTENANCE_MODE_KEY};
use crate::global::ApiGlobal;
use crate::permission::{is_at_least, Role};

/// Paths that stay reachable while maintenance is on, matched by prefix.
const BYPASS: &[&str] = &[
	"/v1/health",
	"/v1/discord",
	"/v1/settings/maintenance",
	"/v1/users/me",
	"/v1/admin",
];

pub async fn maintenance_active<G: ApiGlobal>(global: &Arc<G>) -> Result<bool, DatabaseError> {
	if global.config::<MaintenanceConfig>().enabled {
		return Ok(true);
	}

	Ok(global
		.store()
		.setting(MAINTENANCE_MODE_KEY)
		.await?
		.is_some_and(|setting| setting.is_true()))
}

pub async fn maintenance_middleware<G: ApiGlobal>(State(global): State<Arc<G>>, req: Request, next: Next) -> Response {
	let path = req.uri().path();
	if BYPASS.iter().any(|prefix| path.starts_with(prefix)) {
		return next.run(req).await;
	}

	let role = req.extensions().get::<RequestContext>().and_then(RequestContext::role);
	if is_at_least(role, Role::Admin) {
		return next.run(req).await;
	}

	match maintenance_active(&global).await {
		Ok(false) => next.run(req).await,
		Ok(true) => RouteError::<ApiError>::new(StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
		Err(err) => {
			// Fail open.
			tracing::warn!(error = %err, "failed to read maintenance setting");
			next.run(req).await
		}
	}
}
