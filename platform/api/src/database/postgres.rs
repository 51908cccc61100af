use std::sync::Arc;

use sqlx::types::Json;
use uuid::Uuid;

use super::*;

/// Selects the single row a [`RowKey`] addresses. An id match wins over a
/// slug match.
macro_rules! by_key {
	($table:literal) => {
		concat!(
			"SELECT * FROM ",
			$table,
			" WHERE id = $1 OR slug = $2 ORDER BY (id IS NOT DISTINCT FROM $1) DESC LIMIT 1"
		)
	};
}

pub struct PgStore {
	db: Arc<sqlx::PgPool>,
}

impl PgStore {
	pub fn new(db: Arc<sqlx::PgPool>) -> Self {
		Self { db }
	}

	async fn delete_by_key(&self, query: &'static str, key: &RowKey) -> Result<bool> {
		let result = sqlx::query(query)
			.bind(key.id)
			.bind(&key.slug)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

#[async_trait::async_trait]
impl Store for PgStore {
	async fn user_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
		Ok(sqlx::query_as("SELECT * FROM users WHERE external_id = $1")
			.bind(external_id)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	async fn create_user(&self, user: NewUser) -> Result<User> {
		// The no-op update makes RETURNING yield the existing row when two
		// first requests race.
		Ok(sqlx::query_as(
			"INSERT INTO users (external_id, username, email, role) VALUES ($1, $2, $3, $4) ON CONFLICT (external_id) DO UPDATE SET external_id = EXCLUDED.external_id RETURNING *",
		)
		.bind(&user.external_id)
		.bind(&user.username)
		.bind(&user.email)
		.bind(user.role)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	async fn list_users(&self) -> Result<Vec<User>> {
		Ok(sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
			.fetch_all(self.db.as_ref())
			.await?)
	}

	async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
		Ok(
			sqlx::query_as("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
				.bind(id)
				.bind(role)
				.fetch_optional(self.db.as_ref())
				.await?,
		)
	}

	async fn list_vtubers(&self, generation: Option<i32>) -> Result<Vec<Vtuber>> {
		Ok(
			sqlx::query_as("SELECT * FROM vtubers WHERE ($1::INT4 IS NULL OR generation = $1) ORDER BY name ASC")
				.bind(generation)
				.fetch_all(self.db.as_ref())
				.await?,
		)
	}

	async fn vtuber(&self, key: &RowKey) -> Result<Option<Vtuber>> {
		Ok(sqlx::query_as(by_key!("vtubers"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	async fn create_vtuber(&self, vtuber: NewVtuber) -> Result<Vtuber> {
		Ok(sqlx::query_as(
			"INSERT INTO vtubers (name, slug, bio, avatar_url, generation, agency, social_links, created_by) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
		)
		.bind(&vtuber.name)
		.bind(&vtuber.slug)
		.bind(&vtuber.bio)
		.bind(&vtuber.avatar_url)
		.bind(vtuber.generation)
		.bind(&vtuber.agency)
		.bind(Json(&vtuber.social_links))
		.bind(&vtuber.created_by)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	async fn update_vtuber(&self, key: &RowKey, patch: VtuberPatch) -> Result<Option<Vtuber>> {
		let mut tx = self.db.begin().await?;

		let row: Option<Vtuber> = sqlx::query_as(concat!(by_key!("vtubers"), " FOR UPDATE"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(&mut *tx)
			.await?;

		let Some(mut row) = row else {
			return Ok(None);
		};

		patch.apply(&mut row);

		let row = sqlx::query_as(
			"UPDATE vtubers SET name = $2, slug = $3, bio = $4, avatar_url = $5, banner_url = $6, generation = $7, agency = $8, status = $9, social_links = $10, updated_at = $11 WHERE id = $1 RETURNING *",
		)
		.bind(row.id)
		.bind(&row.name)
		.bind(&row.slug)
		.bind(&row.bio)
		.bind(&row.avatar_url)
		.bind(&row.banner_url)
		.bind(row.generation)
		.bind(&row.agency)
		.bind(&row.status)
		.bind(&row.social_links)
		.bind(row.updated_at)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(Some(row))
	}

	async fn delete_vtuber(&self, key: &RowKey) -> Result<bool> {
		self.delete_by_key(
			"DELETE FROM vtubers WHERE id = (SELECT id FROM vtubers WHERE id = $1 OR slug = $2 ORDER BY (id IS NOT DISTINCT FROM $1) DESC LIMIT 1)",
			key,
		)
		.await
	}

	async fn list_blog_posts(&self, status: BlogStatus, limit: i64) -> Result<Vec<BlogPost>> {
		Ok(
			sqlx::query_as("SELECT * FROM blog_posts WHERE status = $1 ORDER BY created_at DESC LIMIT $2")
				.bind(status)
				.bind(limit)
				.fetch_all(self.db.as_ref())
				.await?,
		)
	}

	async fn blog_post(&self, key: &RowKey) -> Result<Option<BlogPost>> {
		Ok(sqlx::query_as(by_key!("blog_posts"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	async fn create_blog_post(&self, post: NewBlogPost) -> Result<BlogPost> {
		Ok(sqlx::query_as(
			"INSERT INTO blog_posts (title, slug, content, excerpt, featured_image, author_id, author_name, status, category, tags) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
		)
		.bind(&post.title)
		.bind(&post.slug)
		.bind(&post.content)
		.bind(&post.excerpt)
		.bind(&post.featured_image)
		.bind(&post.author_id)
		.bind(&post.author_name)
		.bind(post.status)
		.bind(&post.category)
		.bind(&post.tags)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	async fn update_blog_post(&self, key: &RowKey, patch: BlogPostPatch) -> Result<Option<BlogPost>> {
		let mut tx = self.db.begin().await?;

		let row: Option<BlogPost> = sqlx::query_as(concat!(by_key!("blog_posts"), " FOR UPDATE"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(&mut *tx)
			.await?;

		let Some(mut row) = row else {
			return Ok(None);
		};

		patch.apply(&mut row);

		let row = sqlx::query_as(
			"UPDATE blog_posts SET title = $2, slug = $3, content = $4, excerpt = $5, featured_image = $6, author_name = $7, status = $8, category = $9, tags = $10, featured = $11, updated_at = $12 WHERE id = $1 RETURNING *",
		)
		.bind(row.id)
		.bind(&row.title)
		.bind(&row.slug)
		.bind(&row.content)
		.bind(&row.excerpt)
		.bind(&row.featured_image)
		.bind(&row.author_name)
		.bind(row.status)
		.bind(&row.category)
		.bind(&row.tags)
		.bind(row.featured)
		.bind(row.updated_at)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(Some(row))
	}

	async fn delete_blog_post(&self, key: &RowKey) -> Result<bool> {
		self.delete_by_key(
			"DELETE FROM blog_posts WHERE id = (SELECT id FROM blog_posts WHERE id = $1 OR slug = $2 ORDER BY (id IS NOT DISTINCT FROM $1) DESC LIMIT 1)",
			key,
		)
		.await
	}

	async fn list_events(&self) -> Result<Vec<Event>> {
		Ok(sqlx::query_as("SELECT * FROM events ORDER BY start_date ASC")
			.fetch_all(self.db.as_ref())
			.await?)
	}

	async fn event(&self, key: &RowKey) -> Result<Option<Event>> {
		Ok(sqlx::query_as(by_key!("events"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	async fn create_event(&self, event: NewEvent) -> Result<Event> {
		Ok(sqlx::query_as(
			"INSERT INTO events (title, slug, description, short_description, banner_image, start_date, end_date, location, location_type, max_participants, status, category, organizer_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
		)
		.bind(&event.title)
		.bind(&event.slug)
		.bind(&event.description)
		.bind(&event.short_description)
		.bind(&event.banner_image)
		.bind(event.start_date)
		.bind(event.end_date)
		.bind(&event.location)
		.bind(event.location_type)
		.bind(event.max_participants)
		.bind(event.status)
		.bind(&event.category)
		.bind(&event.organizer_id)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	async fn update_event(&self, key: &RowKey, patch: EventPatch) -> Result<Option<Event>> {
		let mut tx = self.db.begin().await?;

		let row: Option<Event> = sqlx::query_as(concat!(by_key!("events"), " FOR UPDATE"))
			.bind(key.id)
			.bind(&key.slug)
			.fetch_optional(&mut *tx)
			.await?;

		let Some(mut row) = row else {
			return Ok(None);
		};

		patch.apply(&mut row);

		let row = sqlx::query_as(
			"UPDATE events SET title = $2, slug = $3, description = $4, short_description = $5, banner_image = $6, start_date = $7, end_date = $8, location = $9, location_type = $10, max_participants = $11, status = $12, category = $13, updated_at = $14 WHERE id = $1 RETURNING *",
		)
		.bind(row.id)
		.bind(&row.title)
		.bind(&row.slug)
		.bind(&row.description)
		.bind(&row.short_description)
		.bind(&row.banner_image)
		.bind(row.start_date)
		.bind(row.end_date)
		.bind(&row.location)
		.bind(row.location_type)
		.bind(row.max_participants)
		.bind(row.status)
		.bind(&row.category)
		.bind(row.updated_at)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(Some(row))
	}

	async fn delete_event(&self, key: &RowKey) -> Result<bool> {
		self.delete_by_key(
			"DELETE FROM events WHERE id = (SELECT id FROM events WHERE id = $1 OR slug = $2 ORDER BY (id IS NOT DISTINCT FROM $1) DESC LIMIT 1)",
			key,
		)
		.await
	}

	async fn list_gallery(&self, status: GalleryStatus) -> Result<Vec<GalleryItem>> {
		Ok(
			sqlx::query_as("SELECT * FROM gallery WHERE status = $1 ORDER BY created_at DESC")
				.bind(status)
				.fetch_all(self.db.as_ref())
				.await?,
		)
	}

	async fn create_gallery_item(&self, item: NewGalleryItem) -> Result<GalleryItem> {
		Ok(sqlx::query_as(
			"INSERT INTO gallery (image_url, caption, category, uploaded_by, uploader_name, status) VALUES ($1, $2, $3, $4, $5, 'pending') RETURNING *",
		)
		.bind(&item.image_url)
		.bind(&item.caption)
		.bind(&item.category)
		.bind(&item.uploaded_by)
		.bind(&item.uploader_name)
		.fetch_one(self.db.as_ref())
		.await?)
	}

	async fn review_gallery_item(&self, id: Uuid, patch: GalleryPatch, reviewer: &str) -> Result<Option<GalleryItem>> {
		let mut tx = self.db.begin().await?;

		let row: Option<GalleryItem> = sqlx::query_as("SELECT * FROM gallery WHERE id = $1 FOR UPDATE")
			.bind(id)
			.fetch_optional(&mut *tx)
			.await?;

		let Some(mut row) = row else {
			return Ok(None);
		};

		patch.apply(&mut row, reviewer);

		let row = sqlx::query_as(
			"UPDATE gallery SET status = $2, caption = $3, category = $4, reviewed_by = $5, reviewed_at = $6 WHERE id = $1 RETURNING *",
		)
		.bind(row.id)
		.bind(row.status)
		.bind(&row.caption)
		.bind(&row.category)
		.bind(&row.reviewed_by)
		.bind(row.reviewed_at)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(Some(row))
	}

	async fn delete_gallery_item(&self, id: Uuid) -> Result<bool> {
		let result = sqlx::query("DELETE FROM gallery WHERE id = $1")
			.bind(id)
			.execute(self.db.as_ref())
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn list_settings(&self) -> Result<Vec<Setting>> {
		Ok(sqlx::query_as("SELECT * FROM settings ORDER BY key ASC")
			.fetch_all(self.db.as_ref())
			.await?)
	}

	async fn setting(&self, key: &str) -> Result<Option<Setting>> {
		Ok(sqlx::query_as("SELECT * FROM settings WHERE key = $1")
			.bind(key)
			.fetch_optional(self.db.as_ref())
			.await?)
	}

	async fn upsert_setting(&self, key: &str, value: &str, updated_by: &str) -> Result<Setting> {
		Ok(sqlx::query_as(
			"INSERT INTO settings (key, value, updated_by, updated_at) VALUES ($1, $2, $3, NOW()) ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_by = EXCLUDED.updated_by, updated_at = EXCLUDED.updated_at RETURNING *",
		)
		.bind(key)
		.bind(value)
		.bind(updated_by)
		.fetch_one(self.db.as_ref())
		.await?)
	}
}
