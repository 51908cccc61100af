use axum::http::StatusCode;
use serde_json::json;

use crate::permission::Role;
use crate::tests::api::TestApp;

#[tokio::test]
async fn test_drafts_are_hidden() {
	let app = TestApp::new();
	let admin = app.login("mika", Role::Admin);
	let agensi = app.login("kaze", Role::Agensi);

	let res = app
		.post("/v1/blog", Some(&admin), json!({ "title": "Festival Recap", "content": "# Hello" }))
		.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.body["status"], "draft");
	assert_eq!(res.body["slug"], "festival-recap");
	assert_eq!(res.body["author_id"], "mika");
	assert_eq!(res.body["author_name"], "mika");

	let res = app.get("/v1/blog", None).await;
	assert_eq!(res.body, json!([]));

	let res = app.get("/v1/blog/festival-recap", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	let res = app.get("/v1/blog/festival-recap", Some(&agensi)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	let res = app.get("/v1/blog/festival-recap", Some(&admin)).await;
	assert_eq!(res.status, StatusCode::OK);

	let res = app.get("/v1/blog?status=draft", None).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = app.get("/v1/blog?status=draft", Some(&agensi)).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = app.get("/v1/blog?status=draft", Some(&admin)).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body.as_array().unwrap().len(), 1);

	let res = app
		.put("/v1/blog/festival-recap", Some(&admin), json!({ "status": "published" }))
		.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["status"], "published");
	assert_eq!(res.body["content"], "# Hello");

	let res = app.get("/v1/blog/festival-recap", None).await;
	assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_agensi_cannot_create_posts() {
	let app = TestApp::new();
	let agensi = app.login("kaze", Role::Agensi);

	let res = app
		.post("/v1/blog", Some(&agensi), json!({ "title": "Hi", "content": "x" }))
		.await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_order_and_limit() {
	let app = TestApp::new();
	let manager = app.login("hana", Role::Manager);

	for title in ["First", "Second", "Third"] {
		let res = app
			.post(
				"/v1/blog",
				Some(&manager),
				json!({ "title": title, "content": "body", "status": "published" }),
			)
			.await;
		assert_eq!(res.status, StatusCode::CREATED);
	}

	let res = app.get("/v1/blog", None).await;
	let titles: Vec<_> = res.body.as_array().unwrap().iter().map(|p| p["title"].clone()).collect();
	assert_eq!(titles, vec![json!("Third"), json!("Second"), json!("First")]);

	let res = app.get("/v1/blog?limit=2", None).await;
	assert_eq!(res.body.as_array().unwrap().len(), 2);

	// Clamped to at least one row.
	let res = app.get("/v1/blog?limit=0", None).await;
	assert_eq!(res.body.as_array().unwrap().len(), 1);

	let res = app.delete("/v1/blog/second", Some(&manager)).await;
	assert_eq!(res.body, json!({ "success": true }));

	let res = app.get("/v1/blog?limit=500", None).await;
	assert_eq!(res.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_content_type() {
	let app = TestApp::new();
	let manager = app.login("hana", Role::Manager);

	let req = axum::http::Request::builder()
		.method("POST")
		.uri("/v1/blog")
		.header(axum::http::header::AUTHORIZATION, format!("Bearer {manager}"))
		.body(axum::body::Body::from(r#"{"title":"a","content":"b"}"#))
		.unwrap();

	let res = app.raw(req).await;
	assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
	assert_eq!(res.body["success"], false);
}
