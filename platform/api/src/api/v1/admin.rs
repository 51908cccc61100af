use axum::Json;

use crate::api::error::Result;
use crate::api::request_context::RequestContext;
use crate::permission::{AdminAction, ContentAction, GalleryAction, Permission, Role, RoleSet, UsersAction};

/// Dashboard sections and the permission each one needs.
const SECTIONS: [(&str, Permission); 6] = [
	("blog", Permission::Blog(ContentAction::Edit)),
	("events", Permission::Events(ContentAction::Edit)),
	("vtuber", Permission::Vtuber(ContentAction::Edit)),
	("gallery", Permission::Gallery(GalleryAction::Approve)),
	("users", Permission::Users(UsersAction::Manage)),
	("settings", Permission::Admin(AdminAction::Settings)),
];

#[derive(Debug, serde::Serialize)]
pub struct AdminOverview {
	pub role: Option<Role>,
	pub sections: Vec<&'static str>,
	pub permissions: Vec<PermissionEntry>,
}

#[derive(Debug, serde::Serialize)]
pub struct PermissionEntry {
	pub permission: Permission,
	pub roles: RoleSet,
	pub granted: bool,
}

pub async fn overview(ctx: RequestContext) -> Result<Json<AdminOverview>> {
	ctx.require(Permission::Admin(AdminAction::Access))?;

	let sections = SECTIONS
		.iter()
		.filter(|(_, permission)| ctx.can(*permission))
		.map(|(name, _)| *name)
		.collect();

	let permissions = Permission::ALL
		.iter()
		.map(|&permission| PermissionEntry {
			permission,
			roles: permission.allowed_roles(),
			granted: ctx.can(permission),
		})
		.collect();

	Ok(Json(AdminOverview {
		role: ctx.role(),
		sections,
		permissions,
	}))
}
