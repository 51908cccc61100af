use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;

use super::TestApp;
use crate::api::middleware::auth::TOKEN_CHECK_HEADER;
use crate::config::{AppConfig, MaintenanceConfig};
use crate::database::{Store, MAINTENANCE_MODE_KEY};
use crate::permission::Role;
use crate::tests::global::token;

#[tokio::test]
async fn test_health_without_token() {
	let app = TestApp::new();

	let res = app.get("/v1/health", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body, json!({ "status": "ok" }));
	assert!(res.headers.get(TOKEN_CHECK_HEADER).is_none());
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
	let app = TestApp::new();

	let res = app.get("/v1/health", Some("not-a-jwt")).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body, json!({ "status": "ok" }));
	assert_eq!(
		res.headers.get(TOKEN_CHECK_HEADER).and_then(|v| v.to_str().ok()),
		Some("failed")
	);

	let res = app.get("/v1/users/me", Some("not-a-jwt")).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert_eq!(
		res.headers.get(TOKEN_CHECK_HEADER).and_then(|v| v.to_str().ok()),
		Some("failed")
	);

	// A valid token without the bearer scheme is rejected the same way.
	let good = token(&app.mock.global, "sora");
	let req = Request::builder()
		.uri("/v1/users/me")
		.header(header::AUTHORIZATION, good)
		.body(Body::empty())
		.unwrap();
	let res = app.raw(req).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert_eq!(
		res.headers.get(TOKEN_CHECK_HEADER).and_then(|v| v.to_str().ok()),
		Some("failed")
	);
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
	let app = TestApp::new();

	let mut config = AppConfig::default();
	config.identity.secret = "someone-else".to_string();
	let other = TestApp::with_config(config);
	let forged = token(&other.mock.global, "sora");

	let res = app.get("/v1/users/me", Some(&forged)).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert!(res.headers.get(TOKEN_CHECK_HEADER).is_some());
	assert_eq!(app.mock.store.user_count(), 0);
}

#[tokio::test]
async fn test_unreachable_store_denies() {
	let app = TestApp::new();
	let manager = app.login("kaze", Role::Manager);

	app.mock.store.broken.store(true, Ordering::SeqCst);

	// The token is fine but the role cannot be resolved, so nothing is allowed.
	let res = app
		.post("/v1/vtubers", Some(&manager), json!({ "name": "Hoshino Sora", "generation": 1 }))
		.await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
	assert!(res.headers.get(TOKEN_CHECK_HEADER).is_none());

	let res = app.get("/v1/users/me", Some(&manager)).await;
	assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_maintenance_from_setting() {
	let app = TestApp::new();
	let admin = app.login("mika", Role::Admin);
	let user = app.login("sora", Role::User);

	app.mock
		.store
		.upsert_setting(MAINTENANCE_MODE_KEY, "true", "mika")
		.await
		.unwrap();

	let res = app.get("/v1/vtubers", None).await;
	assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(res.body, json!({ "success": false, "message": "maintenance" }));

	let res = app.get("/v1/vtubers", Some(&user)).await;
	assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

	let res = app.get("/v1/vtubers", Some(&admin)).await;
	assert_eq!(res.status, StatusCode::OK);

	for path in ["/v1/health", "/v1/discord", "/v1/settings/maintenance", "/v1/users/me", "/v1/admin"] {
		let res = app.get(path, None).await;
		assert_ne!(res.status, StatusCode::SERVICE_UNAVAILABLE, "{path}");
	}

	let res = app.get("/v1/settings/maintenance", None).await;
	assert_eq!(res.body, json!({ "maintenance": true }));

	app.mock
		.store
		.upsert_setting(MAINTENANCE_MODE_KEY, "false", "mika")
		.await
		.unwrap();

	let res = app.get("/v1/vtubers", None).await;
	assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_maintenance_from_config() {
	let app = TestApp::with_config(AppConfig {
		maintenance: MaintenanceConfig { enabled: true },
		..Default::default()
	});

	let res = app.get("/v1/events", None).await;
	assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

	let res = app.get("/v1/settings/maintenance", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body, json!({ "maintenance": true }));
}

#[tokio::test]
async fn test_maintenance_check_fails_open() {
	let app = TestApp::new();
	app.mock.store.broken.store(true, Ordering::SeqCst);

	// The request gets past maintenance and fails on its own store access.
	let res = app.get("/v1/events", None).await;
	assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(res.body, json!({ "success": false, "message": "database error" }));
}

#[tokio::test]
async fn test_unknown_route() {
	let app = TestApp::new();

	let res = app.get("/v1/nope", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.body, json!({ "success": false, "message": "not found" }));
}

#[tokio::test]
async fn test_cors_preflight() {
	let app = TestApp::new();

	let req = Request::builder()
		.method("OPTIONS")
		.uri("/v1/vtubers")
		.header(header::ORIGIN, "https://soraku.id")
		.header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
		.body(Body::empty())
		.unwrap();

	let res = app.raw(req).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(
		res.headers
			.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.and_then(|v| v.to_str().ok()),
		Some("*")
	);
}
