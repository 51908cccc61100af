use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::{AuthData, AuthError};
use crate::permission::{has_permission, Permission, Role};

/// Per-request caller state, set by the auth middleware.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
	auth: Option<AuthData>,
}

impl RequestContext {
	pub fn new(auth: Option<AuthData>) -> Self {
		Self { auth }
	}

	pub fn role(&self) -> Option<Role> {
		self.auth.as_ref().and_then(AuthData::role)
	}

	pub fn can(&self, permission: Permission) -> bool {
		has_permission(self.role(), permission.allowed_roles())
	}

	pub fn require_login(&self) -> Result<&AuthData, AuthError> {
		self.auth.as_ref().ok_or(AuthError::NotLoggedIn)
	}

	/// 401 without a caller, 403 if the caller's role is not allowed.
	pub fn require(&self, permission: Permission) -> Result<&AuthData, AuthError> {
		let auth = self.require_login()?;

		if !self.can(permission) {
			tracing::debug!(subject = %auth.identity.subject, role = ?self.role(), %permission, "permission denied");
			return Err(AuthError::Forbidden(permission));
		}

		Ok(auth)
	}
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
		Ok(parts.extensions.get::<RequestContext>().cloned().unwrap_or_default())
	}
}
