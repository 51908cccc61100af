use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::permission::Role;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct User {
	/// The unique identifier for the user.
	pub id: Uuid,
	/// The caller id issued by the identity provider.
	pub external_id: String,
	/// The username of the user.
	pub username: String,
	/// The email of the user, may be empty.
	pub email: String,
	pub avatar_url: Option<String>,
	/// Only ever changed through the role update action.
	pub role: Role,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
	pub external_id: String,
	pub username: String,
	pub email: String,
	pub role: Role,
}

impl NewUser {
	/// A first-seen caller, always created as a plain user.
	///
	/// The username falls back to the local part of the email and then to
	/// the external id.
	pub fn from_identity(external_id: &str, username: Option<&str>, email: Option<&str>) -> Self {
		let email = email.unwrap_or_default().to_string();

		let username = username
			.filter(|u| !u.is_empty())
			.map(str::to_string)
			.or_else(|| {
				email
					.split('@')
					.next()
					.filter(|local| !local.is_empty())
					.map(str::to_string)
			})
			.unwrap_or_else(|| external_id.to_string());

		Self {
			external_id: external_id.to_string(),
			username,
			email,
			role: Role::User,
		}
	}
}
