use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::Router;
use common::http::RouteError;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use self::error::ApiError;
use crate::config::ApiConfig;
use crate::global::ApiGlobal;

pub mod auth;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod request_context;
pub mod v1;

fn cors<G: ApiGlobal>(global: &Arc<G>) -> CorsLayer {
	let config = global.config::<ApiConfig>();

	let origins = match config.cors_origins.as_slice() {
		[] => AllowOrigin::any(),
		origins => AllowOrigin::list(origins.iter().filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(origin) => Some(origin),
			Err(_) => {
				tracing::warn!(origin, "ignoring invalid cors origin");
				None
			}
		})),
	};

	CorsLayer::new()
		.allow_origin(origins)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
		.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
		.expose_headers([header::HeaderName::from_static(middleware::auth::TOKEN_CHECK_HEADER)])
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router {
	Router::new()
		.nest("/v1", v1::routes::<G>())
		.fallback(|| async { RouteError::<ApiError>::new(StatusCode::NOT_FOUND, "not found") })
		// The last layer added runs first. Maintenance reads the role that
		// auth sets, so it is added before auth.
		.layer(axum::middleware::from_fn_with_state(
			global.clone(),
			middleware::maintenance::maintenance_middleware::<G>,
		))
		.layer(axum::middleware::from_fn_with_state(
			global.clone(),
			middleware::auth::auth_middleware::<G>,
		))
		.layer(cors(global))
		.layer(axum::middleware::from_fn(middleware::request_span::request_span_middleware))
		.with_state(global.clone())
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();

	let listener = TcpListener::bind(config.bind_address)
		.await
		.with_context(|| format!("failed to bind {}", config.bind_address))?;

	tracing::info!("listening on {}", config.bind_address);

	let ctx = global.ctx().clone();
	let router = routes(&global);

	axum::serve(listener, router)
		.with_graceful_shutdown(async move { ctx.done().await })
		.await
		.context("api server failed")?;

	Ok(())
}
