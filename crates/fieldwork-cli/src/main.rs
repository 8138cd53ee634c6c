// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator CLI for service contract scheduling.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use fieldwork_server_config::{LogFormat, LoggingConfig, ServerConfig};
use fieldwork_server_servicing::{ContractLocks, ServicingService, SqliteServicingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod version;

use commands::Command;

/// fieldwork-servicing - recurring service contract scheduler.
#[derive(Parser, Debug)]
#[command(
	name = "fieldwork-servicing",
	about = "Recurring service contract scheduler",
	version
)]
struct Args {
	/// Config file to use instead of /etc/fieldwork/servicing.toml
	#[arg(long, global = true, env = "FIELDWORK_CONFIG")]
	config: Option<PathBuf>,

	/// Override the configured database URL
	#[arg(long, global = true)]
	database_url: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let mut config: ServerConfig = match &args.config {
		Some(path) => fieldwork_server_config::load_config_with_file(path)?,
		None => fieldwork_server_config::load_config()?,
	};
	if let Some(url) = args.database_url {
		config.database.url = url;
	}

	init_tracing(&config.logging);

	tracing::debug!(database = %config.database.url, "opening database");
	let pool = fieldwork_server_db::create_pool(&config.database.url).await?;
	fieldwork_server_db::ensure_schema(&pool).await?;

	if let Command::Migrate = args.command {
		tracing::info!(database = %config.database.url, "schema is up to date");
		print_json(&serde_json::json!({ "migrated": true }))?;
		return Ok(());
	}

	let repository = Arc::new(SqliteServicingRepository::new(pool.clone()));
	let mut service = ServicingService::new(repository);
	if config.servicing.serialize_regeneration {
		service = service.with_contract_locks(ContractLocks::new());
	}

	let result = commands::run(args.command, &service, &config.servicing).await;
	pool.close().await;

	print_json(&result?)
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(logging: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

	let (json, text) = match logging.format {
		LogFormat::Json => (
			Some(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			),
			None,
		),
		LogFormat::Text => (
			None,
			Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
		),
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(json)
		.with(text)
		.init();
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
