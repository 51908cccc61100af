use std::sync::Arc;

use axum::http::StatusCode;
use common::http::RouteError;

use super::error::ApiError;
use super::jwt::Identity;
use crate::database::{DatabaseError, NewUser, User};
use crate::global::ApiGlobal;
use crate::permission::{Permission, Role};

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
	#[error("not logged in")]
	NotLoggedIn,
	#[error("missing permission {0}")]
	Forbidden(Permission),
	#[error("failed to resolve user")]
	FetchUser,
}

impl From<AuthError> for RouteError<ApiError> {
	#[track_caller]
	fn from(value: AuthError) -> Self {
		let (status, message) = match &value {
			AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "not logged in"),
			AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
			AuthError::FetchUser => (StatusCode::INTERNAL_SERVER_ERROR, "failed to resolve user"),
		};

		RouteError::new(status, message).with_source(Some(ApiError::Auth(value)))
	}
}

/// An authenticated caller and, if it could be loaded, their user row.
#[derive(Debug, Clone)]
pub struct AuthData {
	pub identity: Identity,
	/// `None` when the row could not be loaded or created. The caller is
	/// then treated as having no role.
	pub user: Option<User>,
}

impl AuthData {
	pub fn role(&self) -> Option<Role> {
		self.user.as_ref().map(|u| u.role)
	}

	pub async fn resolve<G: ApiGlobal>(global: &Arc<G>, identity: Identity) -> Self {
		let user = match Self::find_or_create_user(global, &identity).await {
			Ok(user) => Some(user),
			Err(err) => {
				tracing::warn!(subject = %identity.subject, error = %err, "failed to resolve user, denying by default");
				None
			}
		};

		Self { identity, user }
	}

	async fn find_or_create_user<G: ApiGlobal>(global: &Arc<G>, identity: &Identity) -> Result<User, DatabaseError> {
		if let Some(user) = global.store().user_by_external_id(&identity.subject).await? {
			return Ok(user);
		}

		let user = global
			.store()
			.create_user(NewUser::from_identity(
				&identity.subject,
				identity.username.as_deref(),
				identity.email.as_deref(),
			))
			.await?;

		tracing::info!(user_id = %user.id, username = %user.username, "created user on first request");

		Ok(user)
	}
}
