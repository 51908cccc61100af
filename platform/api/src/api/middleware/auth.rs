use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::auth::AuthData;
use crate::api::jwt::{Identity, JwtState};
use crate::api::request_context::RequestContext;
use crate::global::ApiGlobal;

pub const TOKEN_CHECK_HEADER: &str = "x-auth-token-check-status";

/// Resolves the bearer token into a [`RequestContext`].
///
/// This never fails the request. A missing token leaves the caller
/// anonymous, an invalid one does too but the response is marked with
/// `X-Auth-Token-Check-Status: failed` so clients can drop the token.
pub async fn auth_middleware<G: ApiGlobal>(State(global): State<Arc<G>>, mut req: Request, next: Next) -> Response {
	let token = req
		.headers()
		.get(header::AUTHORIZATION)
		.map(|value| value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")).map(str::to_string));

	let (context, failed) = match token {
		None => (RequestContext::default(), false),
		Some(None) => (RequestContext::default(), true),
		Some(Some(token)) => match Identity::verify(&global, token.trim()) {
			Some(identity) => (RequestContext::new(Some(AuthData::resolve(&global, identity).await)), false),
			None => (RequestContext::default(), true),
		},
	};

	req.extensions_mut().insert(context);

	let mut res = next.run(req).await;

	if failed {
		tracing::debug!("rejected identity token");
		res.headers_mut()
			.insert(TOKEN_CHECK_HEADER, HeaderValue::from_static("failed"));
	}

	res
}
