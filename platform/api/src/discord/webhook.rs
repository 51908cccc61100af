use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::DiscordConfig;
use crate::database::Event;

/// The Soraku primary brand colour.
pub const EMBED_COLOR: u32 = 0x4FA3D1;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
	#[error("reqwest: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("webhook responded with {0}")]
	Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WebhookMessage {
	pub username: String,
	pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Embed {
	pub title: String,
	pub description: String,
	pub color: u32,
	pub timestamp: DateTime<Utc>,
	pub fields: Vec<EmbedField>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<EmbedImage>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EmbedField {
	pub name: String,
	pub value: String,
	pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EmbedImage {
	pub url: String,
}

fn format_date(date: DateTime<Utc>) -> String {
	date.format("%d %b %Y %H:%M UTC").to_string()
}

impl WebhookMessage {
	pub fn new_event(username: &str, event: &Event) -> Self {
		Self {
			username: username.to_string(),
			embeds: vec![Embed {
				title: event.title.clone(),
				description: event
					.description
					.clone()
					.or_else(|| event.short_description.clone())
					.unwrap_or_default(),
				color: EMBED_COLOR,
				timestamp: event.created_at,
				fields: vec![
					EmbedField {
						name: "Start".to_string(),
						value: format_date(event.start_date),
						inline: true,
					},
					EmbedField {
						name: "End".to_string(),
						value: format_date(event.end_date),
						inline: true,
					},
				],
				image: event.banner_image.clone().map(|url| EmbedImage { url }),
			}],
		}
	}
}

/// Announces new events on a Discord channel webhook. Best effort only.
pub struct WebhookNotifier {
	client: reqwest::Client,
	url: Option<String>,
	username: String,
}

impl WebhookNotifier {
	pub fn new(config: &DiscordConfig) -> Result<Self, WebhookError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.request_timeout))
			.build()?;

		Ok(Self {
			client,
			url: config.webhook_url.clone().filter(|url| !url.is_empty()),
			username: config.webhook_username.clone(),
		})
	}

	pub fn enabled(&self) -> bool {
		self.url.is_some()
	}

	pub async fn send(&self, message: &WebhookMessage) -> Result<(), WebhookError> {
		let Some(url) = &self.url else {
			return Ok(());
		};

		let res = self.client.post(url.as_str()).json(message).send().await?;

		if !res.status().is_success() {
			return Err(WebhookError::Status(res.status()));
		}

		Ok(())
	}

	/// Sends the announcement in the background. The caller never waits on
	/// it and never sees its failure.
	pub fn announce_event(self: &Arc<Self>, event: &Event) {
		if !self.enabled() {
			return;
		}

		let message = WebhookMessage::new_event(&self.username, event);
		let this = self.clone();
		let event_id = event.id;

		tokio::spawn(async move {
			match this.send(&message).await {
				Ok(()) => tracing::debug!(%event_id, "announced event"),
				Err(err) => tracing::warn!(%event_id, error = %err, "failed to announce event"),
			}
		});
	}
}
