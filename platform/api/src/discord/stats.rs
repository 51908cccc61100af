use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use reqwest::header;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::DiscordConfig;

/// What the stats endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DiscordStats {
	pub members: u64,
	pub online: u64,
	pub cached: bool,
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildCounts {
	pub members: u64,
	pub online: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
	#[error("reqwest: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("discord responded with {0}")]
	Status(reqwest::StatusCode),
	#[error("guild response is missing approximate counts")]
	MissingCounts,
}

#[async_trait::async_trait]
pub trait StatsUpstream: Send + Sync + 'static {
	async fn fetch(&self) -> Result<GuildCounts, StatsError>;
}

/// Reads the approximate counts of a single guild from the Discord REST api.
pub struct DiscordGuildApi {
	client: reqwest::Client,
	url: String,
	bot_token: String,
}

#[derive(serde::Deserialize)]
struct GuildWithCounts {
	approximate_member_count: Option<u64>,
	approximate_presence_count: Option<u64>,
}

impl DiscordGuildApi {
	pub fn new(config: &DiscordConfig) -> Result<Self, StatsError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.request_timeout))
			.build()?;

		Ok(Self {
			client,
			url: format!("{}/guilds/{}", config.api_url.trim_end_matches('/'), config.guild_id),
			bot_token: config.bot_token.clone(),
		})
	}
}

#[async_trait::async_trait]
impl StatsUpstream for DiscordGuildApi {
	async fn fetch(&self) -> Result<GuildCounts, StatsError> {
		let res = self
			.client
			.get(self.url.as_str())
			.query(&[("with_counts", "true")])
			.header(header::AUTHORIZATION, format!("Bot {}", self.bot_token))
			.send()
			.await?;

		if !res.status().is_success() {
			return Err(StatsError::Status(res.status()));
		}

		let guild = res.json::<GuildWithCounts>().await?;

		Ok(GuildCounts {
			members: guild.approximate_member_count.ok_or(StatsError::MissingCounts)?,
			online: guild.approximate_presence_count.ok_or(StatsError::MissingCounts)?,
		})
	}
}

struct CacheEntry {
	counts: GuildCounts,
	fetched_at: Instant,
}

/// A single-slot read-through cache in front of a [`StatsUpstream`].
///
/// Readers never block on each other while the slot is fresh. Once it
/// expires, refreshes are serialized so an expired window costs one upstream
/// call no matter how many requests arrive together. A failed refresh leaves
/// the previous value in place and keeps serving it.
pub struct StatsCache {
	upstream: Arc<dyn StatsUpstream>,
	freshness: Duration,
	slot: ArcSwapOption<CacheEntry>,
	refresh: Mutex<()>,
}

impl StatsCache {
	pub fn new(upstream: Arc<dyn StatsUpstream>, freshness: Duration) -> Self {
		Self {
			upstream,
			freshness,
			slot: ArcSwapOption::empty(),
			refresh: Mutex::new(()),
		}
	}

	fn fresh(&self) -> Option<GuildCounts> {
		self.slot
			.load_full()
			.filter(|entry| entry.fetched_at.elapsed() < self.freshness)
			.map(|entry| entry.counts)
	}

	pub async fn get(&self) -> DiscordStats {
		if let Some(counts) = self.fresh() {
			return DiscordStats::cached(counts);
		}

		let _guard = self.refresh.lock().await;

		// Whoever held the guard before us may have refreshed already.
		if let Some(counts) = self.fresh() {
			return DiscordStats::cached(counts);
		}

		match self.upstream.fetch().await {
			Ok(counts) => {
				self.slot.store(Some(Arc::new(CacheEntry {
					counts,
					fetched_at: Instant::now(),
				})));

				DiscordStats {
					members: counts.members,
					online: counts.online,
					cached: false,
					error: false,
				}
			}
			Err(err) => {
				tracing::warn!(error = %err, "failed to fetch discord stats");

				match self.slot.load_full() {
					Some(entry) => DiscordStats::cached(entry.counts),
					None => DiscordStats::unavailable(),
				}
			}
		}
	}
}

impl DiscordStats {
	fn cached(counts: GuildCounts) -> Self {
		Self {
			members: counts.members,
			online: counts.online,
			cached: true,
			error: false,
		}
	}

	fn unavailable() -> Self {
		Self {
			members: 0,
			online: 0,
			cached: false,
			error: true,
		}
	}
}
