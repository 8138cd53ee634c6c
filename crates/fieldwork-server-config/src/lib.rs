// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the fieldwork servicing scheduler.
//!
//! Layered from built-in defaults, a TOML file and `FIELDWORK_*`
//! environment variables, in increasing precedence.
//!
//! ```ignore
//! use fieldwork_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("preview horizon: {} months", config.servicing.preview_horizon_months);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;
use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub servicing: ServicingConfig,
}

/// Load configuration with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`FIELDWORK_*`)
/// 2. Config file (`/etc/fieldwork/servicing.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path in place of the system one.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Resolve a merged layer, applying defaults and validation.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize()?;
	let servicing = layer.servicing.unwrap_or_default().finalize()?;

	info!(
		database = %database.url,
		log_level = %logging.level,
		log_format = %logging.format,
		preview_horizon_months = servicing.preview_horizon_months,
		serialize_regeneration = servicing.serialize_regeneration,
		"configuration loaded"
	);

	Ok(ServerConfig {
		database,
		logging,
		servicing,
	})
}
