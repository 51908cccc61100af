use std::net::SocketAddr;

use anyhow::Result;
use common::config::{DatabaseConfig, LoggingConfig};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the Soraku community site
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	/// The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,

	/// Identity token Config
	pub identity: IdentityConfig,

	/// Discord Config
	pub discord: DiscordConfig,

	/// Maintenance Config
	pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,

	/// Origins allowed to make cross-origin requests, empty allows any
	pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 4000)),
			cors_origins: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
	/// HMAC secret the identity tokens are signed with
	pub secret: String,

	/// Expected `iss` claim
	pub issuer: String,

	/// Expected `aud` claim, not checked when unset
	pub audience: Option<String>,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			secret: "soraku".to_string(),
			issuer: "soraku".to_string(),
			audience: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
	/// Base url of the Discord REST api
	pub api_url: String,

	/// The guild whose member counts are shown
	pub guild_id: String,

	/// Bot token used for the guild lookup
	pub bot_token: String,

	/// Seconds a fetched stats value is served without asking Discord again
	pub freshness_window: u64,

	/// Seconds before an outbound Discord request is abandoned
	pub request_timeout: u64,

	/// Webhook that new events are announced on, disabled when unset
	pub webhook_url: Option<String>,

	/// Name the webhook posts as
	pub webhook_username: String,
}

impl Default for DiscordConfig {
	fn default() -> Self {
		Self {
			api_url: "https://discord.com/api/v10".to_string(),
			guild_id: String::new(),
			bot_token: String::new(),
			freshness_window: 60,
			request_timeout: 10,
			webhook_url: None,
			webhook_username: "Soraku".to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
	/// Force maintenance mode regardless of the stored setting
	pub enabled: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config.yaml".to_string()),
			name: "soraku-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig::default(),
			identity: IdentityConfig::default(),
			discord: DiscordConfig::default(),
			maintenance: MaintenanceConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		let (mut config, config_file) =
			common::config::parse::<Self>(!cfg!(test), "SORAKU", Self::default().config_file.as_deref())?;

		config.config_file = config_file;

		Ok(config)
	}
}
