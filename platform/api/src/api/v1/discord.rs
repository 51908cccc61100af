use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::discord::DiscordStats;
use crate::global::ApiGlobal;

/// Member counts from the stats cache. Only a failure with nothing cached
/// is reported as an error status.
pub async fn stats<G: ApiGlobal>(State(global): State<Arc<G>>) -> (StatusCode, Json<DiscordStats>) {
	let stats = global.stats_cache().get().await;

	let status = if stats.error {
		StatusCode::INTERNAL_SERVER_ERROR
	} else {
		StatusCode::OK
	};

	(status, Json(stats))
}
