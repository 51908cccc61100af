use uuid::Uuid;

mod blog_post;
mod event;
mod gallery;
mod postgres;
mod setting;
mod user;
mod vtuber;

pub use blog_post::*;
pub use event::*;
pub use gallery::*;
pub use postgres::PgStore;
pub use setting::*;
pub use user::*;
pub use vtuber::*;

use crate::permission::Role;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	#[error("sqlx: {0}")]
	Sqlx(sqlx::Error),
	#[error("conflict on {0}")]
	Conflict(String),
	#[error("check failed on {0}")]
	Invalid(String),
}

impl From<sqlx::Error> for DatabaseError {
	fn from(err: sqlx::Error) -> Self {
		match err.as_database_error() {
			Some(db) if db.is_unique_violation() => {
				Self::Conflict(db.constraint().unwrap_or("unique constraint").to_string())
			}
			Some(db) if db.is_check_violation() => Self::Invalid(db.constraint().unwrap_or("check constraint").to_string()),
			_ => Self::Sqlx(err),
		}
	}
}

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

/// How a single content row is addressed in a path: by uuid or by slug.
///
/// A value that parses as a uuid still matches a row whose slug is that same
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
	pub id: Option<Uuid>,
	pub slug: String,
}

impl RowKey {
	pub fn parse(value: &str) -> Self {
		Self {
			id: value.parse().ok(),
			slug: value.to_string(),
		}
	}
}

/// The row store every handler goes through.
#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
	async fn user_by_external_id(&self, external_id: &str) -> Result<Option<User>>;
	/// Inserts the user, or returns the existing row if the external id is
	/// already known.
	async fn create_user(&self, user: NewUser) -> Result<User>;
	async fn list_users(&self) -> Result<Vec<User>>;
	async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>>;

	async fn list_vtubers(&self, generation: Option<i32>) -> Result<Vec<Vtuber>>;
	async fn vtuber(&self, key: &RowKey) -> Result<Option<Vtuber>>;
	async fn create_vtuber(&self, vtuber: NewVtuber) -> Result<Vtuber>;
	async fn update_vtuber(&self, key: &RowKey, patch: VtuberPatch) -> Result<Option<Vtuber>>;
	async fn delete_vtuber(&self, key: &RowKey) -> Result<bool>;

	async fn list_blog_posts(&self, status: BlogStatus, limit: i64) -> Result<Vec<BlogPost>>;
	async fn blog_post(&self, key: &RowKey) -> Result<Option<BlogPost>>;
	async fn create_blog_post(&self, post: NewBlogPost) -> Result<BlogPost>;
	async fn update_blog_post(&self, key: &RowKey, patch: BlogPostPatch) -> Result<Option<BlogPost>>;
	async fn delete_blog_post(&self, key: &RowKey) -> Result<bool>;

	async fn list_events(&self) -> Result<Vec<Event>>;
	async fn event(&self, key: &RowKey) -> Result<Option<Event>>;
	async fn create_event(&self, event: NewEvent) -> Result<Event>;
	async fn update_event(&self, key: &RowKey, patch: EventPatch) -> Result<Option<Event>>;
	async fn delete_event(&self, key: &RowKey) -> Result<bool>;

	async fn list_gallery(&self, status: GalleryStatus) -> Result<Vec<GalleryItem>>;
	async fn create_gallery_item(&self, item: NewGalleryItem) -> Result<GalleryItem>;
	async fn review_gallery_item(&self, id: Uuid, patch: GalleryPatch, reviewer: &str) -> Result<Option<GalleryItem>>;
	async fn delete_gallery_item(&self, id: Uuid) -> Result<bool>;

	async fn list_settings(&self) -> Result<Vec<Setting>>;
	async fn setting(&self, key: &str) -> Result<Option<Setting>>;
	async fn upsert_setting(&self, key: &str, value: &str, updated_by: &str) -> Result<Setting>;
}
