use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use common::http::RouteError;

use super::auth::AuthError;
use crate::database::DatabaseError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("database: {0}")]
	Database(#[from] DatabaseError),
	#[error("auth: {0}")]
	Auth(#[from] AuthError),
	#[error("invalid json body: {0}")]
	Json(#[from] JsonRejection),
	#[error("invalid query: {0}")]
	Query(#[from] QueryRejection),
	#[error("invalid path: {0}")]
	Path(#[from] PathRejection),
}

impl From<DatabaseError> for RouteError<ApiError> {
	#[track_caller]
	fn from(value: DatabaseError) -> Self {
		let (status, message) = match &value {
			DatabaseError::Conflict(_) => (StatusCode::CONFLICT, "a row with the same slug or key already exists"),
			DatabaseError::Invalid(_) => (StatusCode::BAD_REQUEST, "the change breaks a constraint on the row"),
			DatabaseError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database error"),
		};

		RouteError::from((status, message, value))
	}
}

/// `axum::Json` with our error body on rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RouteError<ApiError>))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(RouteError<ApiError>))]
pub struct QueryParams<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RouteError<ApiError>))]
pub struct PathParam<T>(pub T);
