// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by each source.

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer, ServicingConfigLayer};

/// One source's view of the configuration. Unset sections stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub servicing: Option<ServicingConfigLayer>,
}

impl ServerConfigLayer {
	/// Overlay `other` on top of `self`; set values in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.servicing, other.servicing, ServicingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(overlay)) => merge(existing, overlay),
		(None, Some(overlay)) => *base = Some(overlay),
		(_, None) => {}
	}
}
