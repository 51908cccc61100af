use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

/// Runs the rest of the stack inside a span carrying the request line, so
/// handler errors are logged with it.
pub async fn request_span_middleware(req: Request, next: Next) -> Response {
	let span = tracing::info_span!(
		"request",
		method = %req.method(),
		path = %req.uri().path(),
		status = tracing::field::Empty,
	);

	let res = next.run(req).instrument(span.clone()).await;

	span.record("status", res.status().as_u16());
	span.in_scope(|| tracing::debug!("request finished"));

	res
}
