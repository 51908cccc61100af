use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::http::RouteError;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::database::DatabaseError;
use crate::permission::Role;
use crate::tests::api::TestApp;

/// An app whose webhook points at `hook`, served on a local port.
async fn with_webhook(hook: Router) -> TestApp {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move { axum::serve(listener, hook).await.unwrap() });

	let mut config = AppConfig::default();
	config.discord.webhook_url = Some(format!("http://{addr}/hook"));
	TestApp::with_config(config)
}

fn summer_live() -> Value {
	json!({
		"title": "Summer Live",
		"description": "On stage",
		"start_date": "2024-08-01T12:00:00Z",
		"end_date": "2024-08-01T15:00:00Z",
	})
}

#[tokio::test]
async fn test_event_lifecycle() {
	let app = TestApp::new();
	let agensi = app.login("kaze", Role::Agensi);
	let user = app.login("sora", Role::User);

	let body = json!({
		"title": "Summer Live",
		"start_date": "2024-08-01T12:00:00Z",
		"end_date": "2024-08-01T15:00:00Z",
		"location_type": "hybrid",
	});

	let res = app.post("/v1/events", Some(&user), body.clone()).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app.post("/v1/events", Some(&agensi), body).await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.body["slug"], "summer-live");
	assert_eq!(res.body["status"], "upcoming");
	assert_eq!(res.body["location_type"], "hybrid");
	assert_eq!(res.body["organizer_id"], "kaze");

	let res = app
		.put("/v1/events/summer-live", Some(&agensi), json!({ "status": "ongoing", "location": "Jakarta" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["status"], "ongoing");
	assert_eq!(res.body["location"], "Jakarta");

	let res = app.delete("/v1/events/summer-live", Some(&agensi)).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_event_dates_are_checked() {
	let app = TestApp::new();
	let agensi = app.login("kaze", Role::Agensi);

	let res = app
		.post(
			"/v1/events",
			Some(&agensi),
			json!({
				"title": "Backwards",
				"start_date": "2024-08-02T00:00:00Z",
				"end_date": "2024-08-01T00:00:00Z",
			}),
		)
		.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = app
		.post(
			"/v1/events",
			Some(&agensi),
			json!({
				"title": "Instant",
				"start_date": "2024-08-01T00:00:00Z",
				"end_date": "2024-08-01T00:00:00Z",
			}),
		)
		.await;
	assert_eq!(res.status, StatusCode::CREATED);

	// Moving only the end before the stored start is rejected.
	let res = app
		.put("/v1/events/instant", Some(&agensi), json!({ "end_date": "2024-07-31T00:00:00Z" }))
		.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["message"], "end_date must not be before start_date");

	let res = app
		.put(
			"/v1/events/instant",
			Some(&agensi),
			json!({ "start_date": "2024-08-03T00:00:00Z", "end_date": "2024-08-02T00:00:00Z" }),
		)
		.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = app.get("/v1/events/instant", None).await;
	assert_eq!(res.body["end_date"], "2024-08-01T00:00:00Z");

	let res = app
		.put("/v1/events/missing", Some(&agensi), json!({ "end_date": "2024-07-31T00:00:00Z" }))
		.await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	let res = app.post("/v1/events", Some(&agensi), json!({ "title": "No dates" })).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_constraint_errors_are_client_errors() {
	let err: RouteError<ApiError> = DatabaseError::Invalid("events_check".to_string()).into();
	assert_eq!(err.status(), StatusCode::BAD_REQUEST);

	let err: RouteError<ApiError> = DatabaseError::Conflict("events_slug_key".to_string()).into();
	assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_events_ordered_by_start() {
	let app = TestApp::new();
	let manager = app.login("hana", Role::Manager);

	for (title, day) in [("Later", "10"), ("Sooner", "05")] {
		let res = app
			.post(
				"/v1/events",
				Some(&manager),
				json!({
					"title": title,
					"start_date": format!("2024-09-{day}T00:00:00Z"),
					"end_date": format!("2024-09-{day}T02:00:00Z"),
				}),
			)
			.await;
		assert_eq!(res.status, StatusCode::CREATED);
	}

	let res = app.get("/v1/events", None).await;
	let titles: Vec<_> = res.body.as_array().unwrap().iter().map(|e| e["title"].clone()).collect();
	assert_eq!(titles, vec![json!("Sooner"), json!("Later")]);

	let res = app.get("/v1/events/sooner", None).await;
	assert_eq!(res.status, StatusCode::OK);

	let res = app.delete("/v1/events/sooner", Some(&manager)).await;
	assert_eq!(res.body, json!({ "success": true }));
}

#[tokio::test]
async fn test_create_event_ignores_failing_webhook() {
	let hanging = Router::new().route("/hook", post(|| std::future::pending::<StatusCode>()));
	let failing = Router::new().route("/hook", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

	for hook in [hanging, failing] {
		let app = with_webhook(hook).await;
		let agensi = app.login("kaze", Role::Agensi);

		let res = tokio::time::timeout(Duration::from_secs(2), app.post("/v1/events", Some(&agensi), summer_live()))
			.await
			.expect("event creation waited on the webhook");
		assert_eq!(res.status, StatusCode::CREATED);
		assert_eq!(res.body["slug"], "summer-live");
	}
}

#[tokio::test]
async fn test_create_event_announces() {
	let (tx, mut rx) = mpsc::channel::<Value>(1);
	let hook = Router::new().route(
		"/hook",
		post(move |Json(body): Json<Value>| {
			let tx = tx.clone();
			async move {
				tx.send(body).await.unwrap();
				StatusCode::NO_CONTENT
			}
		}),
	);

	let app = with_webhook(hook).await;
	let agensi = app.login("kaze", Role::Agensi);

	let res = app.post("/v1/events", Some(&agensi), summer_live()).await;
	assert_eq!(res.status, StatusCode::CREATED);

	let body = tokio::time::timeout(Duration::from_secs(5), rx.recv())
		.await
		.expect("webhook was not called")
		.unwrap();
	assert_eq!(body["username"], "Soraku");
	assert_eq!(body["embeds"][0]["title"], "Summer Live");
	assert_eq!(body["embeds"][0]["description"], "On stage");
	assert_eq!(body["embeds"][0]["color"], 0x4FA3D1);

	// Updates are not announced.
	let res = app
		.put("/v1/events/summer-live", Some(&agensi), json!({ "status": "ongoing" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert!(tokio::time::timeout(Duration::from_millis(200), rx.recv()).await.is_err());
}
