use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gallery_status", rename_all = "lowercase")]
pub enum GalleryStatus {
	#[default]
	Pending,
	Approved,
	Rejected,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct GalleryItem {
	pub id: Uuid,
	pub image_url: String,
	pub caption: Option<String>,
	pub category: Option<String>,
	/// External id of the uploader.
	pub uploaded_by: String,
	pub uploader_name: Option<String>,
	pub status: GalleryStatus,
	pub reviewed_by: Option<String>,
	pub reviewed_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGalleryItem {
	pub image_url: String,
	pub caption: Option<String>,
	pub category: Option<String>,
	pub uploaded_by: String,
	pub uploader_name: Option<String>,
}

/// A moderation decision. Every review stamps the reviewer, even if no field
/// changes.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct GalleryPatch {
	pub status: Option<GalleryStatus>,
	pub caption: Option<String>,
	pub category: Option<String>,
}

impl GalleryPatch {
	pub fn apply(self, row: &mut GalleryItem, reviewer: &str) {
		if let Some(status) = self.status {
			row.status = status;
		}

		row.caption = self.caption.or(row.caption.take());
		row.category = self.category.or(row.category.take());
		row.reviewed_by = Some(reviewer.to_string());
		row.reviewed_at = Some(Utc::now());
	}
}
