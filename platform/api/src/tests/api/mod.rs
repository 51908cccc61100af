use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::api;
use crate::config::AppConfig;
use crate::permission::Role;
use crate::tests::global::{mock_global_state, token, MockGlobal};

mod middleware;
mod server;
mod v1;

pub struct TestApp {
	pub mock: MockGlobal,
	router: Router,
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

impl TestApp {
	pub fn new() -> Self {
		Self::with_config(AppConfig::default())
	}

	pub fn with_config(config: AppConfig) -> Self {
		let mock = mock_global_state(config);
		let router = api::routes(&mock.global);

		Self { mock, router }
	}

	/// A token for a caller that already has a user row with the given role.
	pub fn login(&self, subject: &str, role: Role) -> String {
		self.mock.store.insert_user(subject, role);
		token(&self.mock.global, subject)
	}

	pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
		let mut req = Request::builder().method(method).uri(uri);

		if let Some(token) = token {
			req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
		}

		let req = match body {
			Some(body) => req
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string())),
			None => req.body(Body::empty()),
		}
		.unwrap();

		self.raw(req).await
	}

	pub async fn raw(&self, req: Request<Body>) -> TestResponse {
		let res = self.router.clone().oneshot(req).await.unwrap();

		let status = res.status();
		let headers = res.headers().clone();
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		let body = if bytes.is_empty() {
			Value::Null
		} else {
			serde_json::from_slice(&bytes).unwrap()
		};

		TestResponse { status, headers, body }
	}

	pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
		self.send(Method::GET, uri, token, None).await
	}

	pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
		self.send(Method::POST, uri, token, Some(body)).await
	}

	pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
		self.send(Method::PUT, uri, token, Some(body)).await
	}

	pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
		self.send(Method::DELETE, uri, token, None).await
	}
}
