use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The setting that toggles maintenance mode at runtime.
pub const MAINTENANCE_MODE_KEY: &str = "maintenance_mode";

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct Setting {
	pub id: Uuid,
	pub key: String,
	pub value: String,
	pub updated_by: Option<String>,
	pub updated_at: DateTime<Utc>,
}

impl Setting {
	pub fn is_true(&self) -> bool {
		self.value == "true"
	}
}
