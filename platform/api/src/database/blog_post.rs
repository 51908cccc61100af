use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "blog_status", rename_all = "lowercase")]
pub enum BlogStatus {
	#[default]
	Draft,
	Published,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct BlogPost {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	/// Markdown body.
	pub content: String,
	pub excerpt: Option<String>,
	pub featured_image: Option<String>,
	/// External id of the author.
	pub author_id: String,
	pub author_name: Option<String>,
	pub status: BlogStatus,
	pub category: Option<String>,
	pub tags: Vec<String>,
	pub featured: bool,
	pub view_count: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBlogPost {
	pub title: String,
	pub slug: String,
	pub content: String,
	pub excerpt: Option<String>,
	pub featured_image: Option<String>,
	pub author_id: String,
	pub author_name: Option<String>,
	pub status: BlogStatus,
	pub category: Option<String>,
	pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct BlogPostPatch {
	pub title: Option<String>,
	pub slug: Option<String>,
	pub content: Option<String>,
	pub excerpt: Option<String>,
	pub featured_image: Option<String>,
	pub author_name: Option<String>,
	pub status: Option<BlogStatus>,
	pub category: Option<String>,
	pub tags: Option<Vec<String>>,
	pub featured: Option<bool>,
}

impl BlogPostPatch {
	pub fn apply(self, row: &mut BlogPost) {
		if let Some(title) = self.title {
			row.title = title;
		}
		if let Some(slug) = self.slug {
			row.slug = slug;
		}
		if let Some(content) = self.content {
			row.content = content;
		}
		if let Some(status) = self.status {
			row.status = status;
		}
		if let Some(tags) = self.tags {
			row.tags = tags;
		}
		if let Some(featured) = self.featured {
			row.featured = featured;
		}

		row.excerpt = self.excerpt.or(row.excerpt.take());
		row.featured_image = self.featured_image.or(row.featured_image.take());
		row.author_name = self.author_name.or(row.author_name.take());
		row.category = self.category.or(row.category.take());

		row.updated_at = Utc::now();
	}
}
