use axum::http::StatusCode;
use serde_json::json;

use crate::permission::Role;
use crate::tests::api::TestApp;

#[tokio::test]
async fn test_upload_and_review() {
	let app = TestApp::new();
	let user = app.login("sora", Role::User);
	let admin = app.login("mika", Role::Admin);
	let manager = app.login("hana", Role::Manager);

	let res = app
		.post("/v1/gallery", None, json!({ "image_url": "https://cdn.soraku.id/a.png" }))
		.await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = app
		.post(
			"/v1/gallery",
			Some(&user),
			json!({ "image_url": "https://cdn.soraku.id/a.png", "caption": "fanart", "status": "approved" }),
		)
		.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.body["status"], "pending");
	assert_eq!(res.body["uploaded_by"], "sora");
	let id = res.body["id"].as_str().unwrap().to_string();

	let res = app.get("/v1/gallery", None).await;
	assert_eq!(res.body, json!([]));

	let res = app.get("/v1/gallery?status=pending", Some(&user)).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app.get("/v1/gallery?status=pending", Some(&admin)).await;
	assert_eq!(res.body.as_array().unwrap().len(), 1);

	let res = app
		.put(&format!("/v1/gallery/{id}"), Some(&user), json!({ "status": "approved" }))
		.await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app
		.put(&format!("/v1/gallery/{id}"), Some(&admin), json!({ "status": "approved", "image_url": "x" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["status"], "approved");
	assert_eq!(res.body["reviewed_by"], "mika");
	assert_eq!(res.body["image_url"], "https://cdn.soraku.id/a.png");
	assert!(res.body["reviewed_at"].is_string());

	let res = app.get("/v1/gallery", None).await;
	assert_eq!(res.body.as_array().unwrap().len(), 1);

	let res = app.delete(&format!("/v1/gallery/{id}"), Some(&admin)).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app.delete(&format!("/v1/gallery/{id}"), Some(&manager)).await;
	assert_eq!(res.body, json!({ "success": true }));

	let res = app.delete(&format!("/v1/gallery/{id}"), Some(&manager)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_id() {
	let app = TestApp::new();
	let admin = app.login("mika", Role::Admin);

	let res = app.put("/v1/gallery/not-a-uuid", None, json!({})).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = app.put("/v1/gallery/not-a-uuid", Some(&admin), json!({})).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = app
		.put("/v1/gallery/00000000-0000-0000-0000-000000000000", Some(&admin), json!({}))
		.await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}
