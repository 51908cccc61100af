use std::fmt::{Debug, Display};
use std::panic::Location;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A handler failure that already knows how it should look on the wire.
///
/// The status and message are what the client sees; the typed `source` is
/// only ever logged. The span and caller location are captured where the
/// error is created so the log line points at the handler, not at the
/// framework.
pub struct RouteError<E> {
	source: Option<E>,
	location: &'static Location<'static>,
	span: tracing::Span,
	status: StatusCode,
	message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShouldLog {
	Yes,
	Debug,
	No,
}

impl<E> RouteError<E> {
	#[track_caller]
	pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			source: None,
			location: Location::caller(),
			span: tracing::Span::current(),
			status,
			message: message.into(),
		}
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn source(&self) -> Option<&E> {
		self.source.as_ref()
	}

	pub fn span(&self) -> &tracing::Span {
		&self.span
	}

	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}

	pub fn should_log(&self) -> ShouldLog {
		match self.status.is_server_error() {
			true => ShouldLog::Yes,
			false => match self.source.is_some() {
				true => ShouldLog::Debug,
				false => ShouldLog::No,
			},
		}
	}

	pub fn with_source(mut self, source: Option<E>) -> Self {
		self.source = source;
		self
	}
}

impl<E, S: AsRef<str>> From<(StatusCode, S)> for RouteError<E> {
	#[track_caller]
	fn from((status, message): (StatusCode, S)) -> Self {
		Self::new(status, message.as_ref())
	}
}

impl<E, S: AsRef<str>, T> From<(StatusCode, S, T)> for RouteError<E>
where
	T: Into<E>,
{
	#[track_caller]
	fn from((status, message, source): (StatusCode, S, T)) -> Self {
		Self::new(status, message.as_ref()).with_source(Some(source.into()))
	}
}

impl<E> From<&'_ str> for RouteError<E> {
	#[track_caller]
	fn from(message: &'_ str) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
	}
}

impl<E: From<JsonRejection>> From<JsonRejection> for RouteError<E> {
	#[track_caller]
	fn from(value: JsonRejection) -> Self {
		let status = match &value {
			JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
			_ => StatusCode::BAD_REQUEST,
		};

		Self::new(status, value.body_text()).with_source(Some(value.into()))
	}
}

impl<E: From<QueryRejection>> From<QueryRejection> for RouteError<E> {
	#[track_caller]
	fn from(value: QueryRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, value.body_text()).with_source(Some(value.into()))
	}
}

impl<E: From<PathRejection>> From<PathRejection> for RouteError<E> {
	#[track_caller]
	fn from(value: PathRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, value.body_text()).with_source(Some(value.into()))
	}
}

impl<E: Debug> Debug for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteError")
			.field("status", &self.status)
			.field("message", &self.message)
			.field("source", &self.source)
			.finish()
	}
}

impl<E: Display> Display for RouteError<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(err) => write!(f, "{}: {} ({})", self.status, self.message, err),
			None => write!(f, "{}: {}", self.status, self.message),
		}
	}
}

impl<E: std::error::Error + 'static> std::error::Error for RouteError<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.source {
			Some(err) => Some(err),
			None => None,
		}
	}
}

impl<E: Debug> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response {
		let location = self.location.to_string();

		self.span.in_scope(|| match self.should_log() {
			ShouldLog::Yes => {
				tracing::error!(status = %self.status, location, error = ?self.source, "{}", self.message)
			}
			ShouldLog::Debug => {
				tracing::debug!(status = %self.status, location, error = ?self.source, "{}", self.message)
			}
			ShouldLog::No => (),
		});

		(self.status, Json(json!({ "success": false, "message": self.message }))).into_response()
	}
}
