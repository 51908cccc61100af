use std::fmt;
use std::str::FromStr;

use bitmask_enum::bitmask;

/// The privilege class of a user.
///
/// The numeric level orders roles for threshold checks only. Whether a role
/// may perform a named action is decided by the allow-list in
/// [`super::Permission::allowed_roles`], which is not monotonic in the level.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	Manager,
	Agensi,
	Admin,
	#[default]
	User,
}

impl Role {
	pub const ALL: [Role; 4] = [Role::Manager, Role::Agensi, Role::Admin, Role::User];

	pub const fn level(self) -> u8 {
		match self {
			Role::Manager => 4,
			Role::Agensi => 3,
			Role::Admin => 2,
			Role::User => 1,
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Manager => "MANAGER",
			Role::Agensi => "AGENSI",
			Role::Admin => "ADMIN",
			Role::User => "USER",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Role::ALL
			.into_iter()
			.find(|r| r.as_str() == s)
			.ok_or_else(|| UnknownRole(s.to_string()))
	}
}

/// A set of roles, used as the allow-list of a single action.
#[bitmask(u8)]
pub enum RoleSet {
	Manager,
	Agensi,
	Admin,
	User,
}

impl From<Role> for RoleSet {
	fn from(role: Role) -> Self {
		match role {
			Role::Manager => RoleSet::Manager,
			Role::Agensi => RoleSet::Agensi,
			Role::Admin => RoleSet::Admin,
			Role::User => RoleSet::User,
		}
	}
}

impl FromIterator<Role> for RoleSet {
	fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
		iter.into_iter().fold(RoleSet::none(), |acc, role| acc | RoleSet::from(role))
	}
}

impl RoleSet {
	pub fn has(&self, role: Role) -> bool {
		self.contains(RoleSet::from(role))
	}

	/// Members in descending level order.
	pub fn roles(self) -> impl Iterator<Item = Role> {
		Role::ALL.into_iter().filter(move |r| self.has(*r))
	}
}

impl serde::Serialize for RoleSet {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.roles())
	}
}
