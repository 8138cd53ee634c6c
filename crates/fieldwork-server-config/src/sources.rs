// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer, ServicingConfigLayer};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/fieldwork/servicing.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: FIELDWORK_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		load_from_vars(|name| std::env::var(name).ok())
	}
}

/// Build a layer from any variable lookup. Empty values count as unset.
pub(crate) fn load_from_vars(
	lookup: impl Fn(&str) -> Option<String>,
) -> Result<ServerConfigLayer, ConfigError> {
	let vars = Vars(lookup);
	Ok(ServerConfigLayer {
		database: Some(DatabaseConfigLayer {
			url: vars.string("FIELDWORK_DATABASE_URL"),
		}),
		logging: Some(LoggingConfigLayer {
			level: vars.string("FIELDWORK_LOG_LEVEL"),
			format: vars.string("FIELDWORK_LOG_FORMAT"),
		}),
		servicing: Some(ServicingConfigLayer {
			preview_horizon_months: vars.u32("FIELDWORK_SERVICING_PREVIEW_HORIZON_MONTHS")?,
			serialize_regeneration: vars.bool("FIELDWORK_SERVICING_SERIALIZE_REGENERATION"),
			default_assign_to_supplier: vars.bool("FIELDWORK_SERVICING_DEFAULT_ASSIGN_TO_SUPPLIER"),
		}),
	})
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
	fn string(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self
			.string(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn u32(&self, name: &str) -> Result<Option<u32>, ConfigError> {
		match self.string(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u32 value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn from_map(pairs: &[(&str, &str)]) -> Result<ServerConfigLayer, ConfigError> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		load_from_vars(|name| map.get(name).cloned())
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.database.is_none());
		assert!(layer.servicing.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/servicing.toml").load().unwrap();
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[database]
url = "sqlite:/tmp/servicing.db"

[logging]
format = "json"

[servicing]
preview_horizon_months = 24
default_assign_to_supplier = true
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite:/tmp/servicing.db")
		);
		assert_eq!(layer.logging.unwrap().format.as_deref(), Some("json"));
		let servicing = layer.servicing.unwrap();
		assert_eq!(servicing.preview_horizon_months, Some(24));
		assert_eq!(servicing.default_assign_to_supplier, Some(true));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[servicing\npreview_horizon_months = 3").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_vars_map_to_sections() {
		let layer = from_map(&[
			("FIELDWORK_DATABASE_URL", "sqlite::memory:"),
			("FIELDWORK_LOG_LEVEL", "debug"),
			("FIELDWORK_SERVICING_PREVIEW_HORIZON_MONTHS", "18"),
			("FIELDWORK_SERVICING_SERIALIZE_REGENERATION", "1"),
			("FIELDWORK_SERVICING_DEFAULT_ASSIGN_TO_SUPPLIER", "TRUE"),
		])
		.unwrap();

		assert_eq!(layer.database.unwrap().url.as_deref(), Some("sqlite::memory:"));
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
		let servicing = layer.servicing.unwrap();
		assert_eq!(servicing.preview_horizon_months, Some(18));
		assert_eq!(servicing.serialize_regeneration, Some(true));
		assert_eq!(servicing.default_assign_to_supplier, Some(true));
	}

	#[test]
	fn test_empty_env_values_are_unset() {
		let layer = from_map(&[("FIELDWORK_DATABASE_URL", "")]).unwrap();
		assert!(layer.database.unwrap().url.is_none());
	}

	#[test]
	fn test_invalid_env_number_names_the_variable() {
		let err = from_map(&[("FIELDWORK_SERVICING_PREVIEW_HORIZON_MONTHS", "soon")]).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, .. } => {
				assert_eq!(key, "FIELDWORK_SERVICING_PREVIEW_HORIZON_MONTHS")
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
