use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct Vtuber {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub bio: Option<String>,
	pub avatar_url: Option<String>,
	pub banner_url: Option<String>,
	pub generation: i32,
	pub agency: Option<String>,
	pub status: Option<String>,
	/// Platform name to profile url.
	pub social_links: Json<BTreeMap<String, String>>,
	/// External id of the creator.
	pub created_by: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVtuber {
	pub name: String,
	pub slug: String,
	pub bio: Option<String>,
	pub avatar_url: Option<String>,
	pub generation: i32,
	pub agency: Option<String>,
	pub social_links: BTreeMap<String, String>,
	pub created_by: String,
}

/// The fields an editor may change. Anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct VtuberPatch {
	pub name: Option<String>,
	pub slug: Option<String>,
	pub bio: Option<String>,
	pub avatar_url: Option<String>,
	pub banner_url: Option<String>,
	pub agency: Option<String>,
	pub status: Option<String>,
	pub generation: Option<i32>,
	pub social_links: Option<BTreeMap<String, String>>,
}

impl VtuberPatch {
	pub fn apply(self, row: &mut Vtuber) {
		macro_rules! set {
			($($field:ident),*) => {
				$(if let Some(value) = self.$field {
					row.$field = value;
				})*
			};
		}
		macro_rules! set_opt {
			($($field:ident),*) => {
				$(if let Some(value) = self.$field {
					row.$field = Some(value);
				})*
			};
		}

		set!(name, slug, generation);
		set_opt!(bio, avatar_url, banner_url, agency, status);

		if let Some(links) = self.social_links {
			row.social_links = Json(links);
		}

		row.updated_at = Utc::now();
	}
}
