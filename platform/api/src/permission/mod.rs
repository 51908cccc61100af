use std::fmt;
use std::str::FromStr;

mod role;

pub use role::{Role, RoleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentAction {
	Create,
	Edit,
	Delete,
	View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryAction {
	Upload,
	Approve,
	Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsersAction {
	Manage,
	View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
	Access,
	Full,
	Settings,
}

/// A (resource, action) pair from the permission table.
///
/// Every resource carries its own action type, so a pair that has no table
/// entry cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
	Vtuber(ContentAction),
	Blog(ContentAction),
	Events(ContentAction),
	Gallery(GalleryAction),
	Users(UsersAction),
	Admin(AdminAction),
}

impl Permission {
	pub const ALL: [Permission; 20] = [
		Permission::Vtuber(ContentAction::Create),
		Permission::Vtuber(ContentAction::Edit),
		Permission::Vtuber(ContentAction::Delete),
		Permission::Vtuber(ContentAction::View),
		Permission::Blog(ContentAction::Create),
		Permission::Blog(ContentAction::Edit),
		Permission::Blog(ContentAction::Delete),
		Permission::Blog(ContentAction::View),
		Permission::Events(ContentAction::Create),
		Permission::Events(ContentAction::Edit),
		Permission::Events(ContentAction::Delete),
		Permission::Events(ContentAction::View),
		Permission::Gallery(GalleryAction::Upload),
		Permission::Gallery(GalleryAction::Approve),
		Permission::Gallery(GalleryAction::Delete),
		Permission::Users(UsersAction::Manage),
		Permission::Users(UsersAction::View),
		Permission::Admin(AdminAction::Access),
		Permission::Admin(AdminAction::Full),
		Permission::Admin(AdminAction::Settings),
	];

	/// The allow-list for this action.
	pub const fn allowed_roles(self) -> RoleSet {
		const EVERYONE: RoleSet = RoleSet::Manager
			.or(RoleSet::Agensi)
			.or(RoleSet::Admin)
			.or(RoleSet::User);

		match self {
			Permission::Vtuber(ContentAction::Create) | Permission::Vtuber(ContentAction::Edit) => {
				RoleSet::Manager.or(RoleSet::Agensi)
			}
			Permission::Vtuber(ContentAction::Delete) => RoleSet::Manager,
			Permission::Vtuber(ContentAction::View) => EVERYONE,

			Permission::Blog(ContentAction::Create) | Permission::Blog(ContentAction::Edit) => {
				RoleSet::Manager.or(RoleSet::Admin)
			}
			Permission::Blog(ContentAction::Delete) => RoleSet::Manager,
			Permission::Blog(ContentAction::View) => EVERYONE,

			Permission::Events(ContentAction::Create) | Permission::Events(ContentAction::Edit) => {
				RoleSet::Manager.or(RoleSet::Agensi)
			}
			Permission::Events(ContentAction::Delete) => RoleSet::Manager,
			Permission::Events(ContentAction::View) => EVERYONE,

			Permission::Gallery(GalleryAction::Upload) => EVERYONE,
			Permission::Gallery(GalleryAction::Approve) => RoleSet::Manager.or(RoleSet::Admin),
			Permission::Gallery(GalleryAction::Delete) => RoleSet::Manager,

			Permission::Users(UsersAction::Manage) => RoleSet::Manager,
			Permission::Users(UsersAction::View) => RoleSet::Manager.or(RoleSet::Admin),

			Permission::Admin(AdminAction::Access) => RoleSet::Manager.or(RoleSet::Agensi).or(RoleSet::Admin),
			Permission::Admin(AdminAction::Full) => RoleSet::Manager,
			Permission::Admin(AdminAction::Settings) => RoleSet::Manager,
		}
	}

	pub const fn resource(self) -> &'static str {
		match self {
			Permission::Vtuber(_) => "vtuber",
			Permission::Blog(_) => "blog",
			Permission::Events(_) => "events",
			Permission::Gallery(_) => "gallery",
			Permission::Users(_) => "users",
			Permission::Admin(_) => "admin",
		}
	}

	pub const fn action(self) -> &'static str {
		match self {
			Permission::Vtuber(a) | Permission::Blog(a) | Permission::Events(a) => match a {
				ContentAction::Create => "create",
				ContentAction::Edit => "edit",
				ContentAction::Delete => "delete",
				ContentAction::View => "view",
			},
			Permission::Gallery(a) => match a {
				GalleryAction::Upload => "upload",
				GalleryAction::Approve => "approve",
				GalleryAction::Delete => "delete",
			},
			Permission::Users(a) => match a {
				UsersAction::Manage => "manage",
				UsersAction::View => "view",
			},
			Permission::Admin(a) => match a {
				AdminAction::Access => "access",
				AdminAction::Full => "full",
				AdminAction::Settings => "settings",
			},
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.resource(), self.action())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
	type Err = UnknownPermission;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Permission::ALL
			.into_iter()
			.find(|p| p.to_string() == s)
			.ok_or_else(|| UnknownPermission(s.to_string()))
	}
}

impl serde::Serialize for Permission {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// True iff `role` is present and a member of `allowed`. An absent role is
/// always denied, including against an empty set.
pub fn has_permission(role: Option<Role>, allowed: RoleSet) -> bool {
	match role {
		Some(role) => allowed.has(role),
		None => false,
	}
}

/// True iff `role` is present and its level is at least that of `minimum`.
pub fn is_at_least(role: Option<Role>, minimum: Role) -> bool {
	match role {
		Some(role) => role.level() >= minimum.level(),
		None => false,
	}
}

impl Role {
	pub fn can(self, permission: Permission) -> bool {
		has_permission(Some(self), permission.allowed_roles())
	}
}
