use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use common::context::Context;
use common::{logging, signal};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use tokio::signal::unix::SignalKind;
use tokio::{select, time};

mod api;
mod config;
mod database;
mod discord;
mod global;
mod permission;
mod slug;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
	let config = config::AppConfig::parse()?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	let db = Arc::new(
		sqlx::PgPool::connect_with(
			PgConnectOptions::from_str(&config.database.uri)?
				.disable_statement_logging()
				.to_owned(),
		)
		.await
		.context("failed to connect to database")?,
	);

	if config.database.migrate {
		sqlx::migrate!("./migrations")
			.run(&*db)
			.await
			.context("failed to run migrations")?;

		tracing::info!("database migrations applied");
	}

	let (ctx, handler) = Context::new();

	let store = Arc::new(database::PgStore::new(db));
	let stats_upstream = Arc::new(discord::DiscordGuildApi::new(&config.discord)?);

	let global = Arc::new(global::GlobalState::new(config, ctx, store, stats_upstream)?);

	let api_future = tokio::spawn(api::run(global.clone()));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = signal::SignalHandler::new()
		.with_signal(SignalKind::interrupt())?
		.with_signal(SignalKind::terminate())?;

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	// We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
