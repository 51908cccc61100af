use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
	#[default]
	Upcoming,
	Ongoing,
	Ended,
	Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "location_type", rename_all = "lowercase")]
pub enum LocationType {
	#[default]
	Online,
	Offline,
	Hybrid,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct Event {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	pub description: Option<String>,
	pub short_description: Option<String>,
	pub banner_image: Option<String>,
	pub start_date: DateTime<Utc>,
	pub end_date: DateTime<Utc>,
	pub location: Option<String>,
	pub location_type: LocationType,
	pub max_participants: Option<i32>,
	pub status: EventStatus,
	pub category: Option<String>,
	/// External id of the organizer.
	pub organizer_id: String,
	pub discord_event_id: Option<String>,
	pub rsvp_count: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
	pub title: String,
	pub slug: String,
	pub description: Option<String>,
	pub short_description: Option<String>,
	pub banner_image: Option<String>,
	pub start_date: DateTime<Utc>,
	pub end_date: DateTime<Utc>,
	pub location: Option<String>,
	pub location_type: LocationType,
	pub max_participants: Option<i32>,
	pub status: EventStatus,
	pub category: Option<String>,
	pub organizer_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct EventPatch {
	pub title: Option<String>,
	pub slug: Option<String>,
	pub description: Option<String>,
	pub short_description: Option<String>,
	pub banner_image: Option<String>,
	pub start_date: Option<DateTime<Utc>>,
	pub end_date: Option<DateTime<Utc>>,
	pub location: Option<String>,
	pub location_type: Option<LocationType>,
	pub max_participants: Option<i32>,
	pub status: Option<EventStatus>,
	pub category: Option<String>,
}

impl EventPatch {
	pub fn apply(self, row: &mut Event) {
		if let Some(title) = self.title {
			row.title = title;
		}
		if let Some(slug) = self.slug {
			row.slug = slug;
		}
		if let Some(start_date) = self.start_date {
			row.start_date = start_date;
		}
		if let Some(end_date) = self.end_date {
			row.end_date = end_date;
		}
		if let Some(location_type) = self.location_type {
			row.location_type = location_type;
		}
		if let Some(status) = self.status {
			row.status = status;
		}

		row.description = self.description.or(row.description.take());
		row.short_description = self.short_description.or(row.short_description.take());
		row.banner_image = self.banner_image.or(row.banner_image.take());
		row.location = self.location.or(row.location.take());
		row.max_participants = self.max_participants.or(row.max_participants);
		row.category = self.category.or(row.category.take());

		row.updated_at = Utc::now();
	}
}
