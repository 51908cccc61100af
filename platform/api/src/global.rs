use std::sync::Arc;
use std::time::Duration;

use common::context::Context;

use crate::config::{ApiConfig, AppConfig, IdentityConfig, MaintenanceConfig};
use crate::database::Store;
use crate::discord::{StatsCache, StatsUpstream, WebhookNotifier};

pub trait ApiState {
	fn store(&self) -> &dyn Store;
	fn stats_cache(&self) -> &StatsCache;
	fn notifier(&self) -> &Arc<WebhookNotifier>;
}

pub trait ApiGlobal:
	common::global::GlobalCtx
	+ common::global::GlobalConfigProvider<ApiConfig>
	+ common::global::GlobalConfigProvider<IdentityConfig>
	+ common::global::GlobalConfigProvider<MaintenanceConfig>
	+ common::global::GlobalConfig
	+ ApiState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> ApiGlobal for T where
	T: common::global::GlobalCtx
		+ common::global::GlobalConfigProvider<ApiConfig>
		+ common::global::GlobalConfigProvider<IdentityConfig>
		+ common::global::GlobalConfigProvider<MaintenanceConfig>
		+ common::global::GlobalConfig
		+ ApiState
		+ Send
		+ Sync
		+ 'static
{
}

pub struct GlobalState {
	config: AppConfig,
	ctx: Context,
	store: Arc<dyn Store>,
	stats_cache: StatsCache,
	notifier: Arc<WebhookNotifier>,
}

impl GlobalState {
	pub fn new(
		config: AppConfig,
		ctx: Context,
		store: Arc<dyn Store>,
		stats_upstream: Arc<dyn StatsUpstream>,
	) -> anyhow::Result<Self> {
		let stats_cache = StatsCache::new(stats_upstream, Duration::from_secs(config.discord.freshness_window));
		let notifier = Arc::new(WebhookNotifier::new(&config.discord)?);

		Ok(Self {
			config,
			ctx,
			store,
			stats_cache,
			notifier,
		})
	}
}

impl common::global::GlobalCtx for GlobalState {
	fn ctx(&self) -> &Context {
		&self.ctx
	}
}

impl common::global::GlobalConfig for GlobalState {}

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
	fn provide_config(&self) -> &ApiConfig {
		&self.config.api
	}
}

impl common::global::GlobalConfigProvider<IdentityConfig> for GlobalState {
	fn provide_config(&self) -> &IdentityConfig {
		&self.config.identity
	}
}

impl common::global::GlobalConfigProvider<MaintenanceConfig> for GlobalState {
	fn provide_config(&self) -> &MaintenanceConfig {
		&self.config.maintenance
	}
}

impl ApiState for GlobalState {
	fn store(&self) -> &dyn Store {
		self.store.as_ref()
	}

	fn stats_cache(&self) -> &StatsCache {
		&self.stats_cache
	}

	fn notifier(&self) -> &Arc<WebhookNotifier> {
		&self.notifier
	}
}
