use axum::http::StatusCode;
use serde_json::json;

use crate::permission::Role;
use crate::tests::api::TestApp;

#[tokio::test]
async fn test_upsert_settings() {
	let app = TestApp::new();
	let admin = app.login("mika", Role::Admin);
	let manager = app.login("hana", Role::Manager);

	let res = app.post("/v1/settings", None, json!({ "key": "motd", "value": "hi" })).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = app
		.post("/v1/settings", Some(&admin), json!({ "key": "motd", "value": "hi" }))
		.await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app
		.post("/v1/settings", Some(&manager), json!({ "key": "motd", "value": "hi" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["value"], "hi");
	assert_eq!(res.body["updated_by"], "hana");

	let res = app
		.post("/v1/settings", Some(&manager), json!({ "key": "motd", "value": "bye" }))
		.await;
	assert_eq!(res.body["value"], "bye");

	let res = app.get("/v1/settings", None).await;
	assert_eq!(res.body.as_array().unwrap().len(), 1);
	assert_eq!(res.body[0]["key"], "motd");

	let res = app
		.post("/v1/settings", Some(&manager), json!({ "key": " ", "value": "x" }))
		.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_maintenance() {
	let app = TestApp::new();
	let manager = app.login("hana", Role::Manager);

	let res = app.get("/v1/settings/maintenance", None).await;
	assert_eq!(res.body, json!({ "maintenance": false }));

	let res = app
		.post("/v1/settings", Some(&manager), json!({ "key": "maintenance_mode", "value": true }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["value"], "true");

	let res = app.get("/v1/settings/maintenance", None).await;
	assert_eq!(res.body, json!({ "maintenance": true }));

	let res = app.get("/v1/blog", None).await;
	assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

	// Still reachable for the manager, who can turn it back off.
	let res = app
		.post("/v1/settings", Some(&manager), json!({ "key": "maintenance_mode", "value": "false" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);

	let res = app.get("/v1/blog", None).await;
	assert_eq!(res.status, StatusCode::OK);
}
