// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Servicing scheduler configuration section.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_PREVIEW_HORIZON_MONTHS: u32 = 120;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServicingConfigLayer {
	pub preview_horizon_months: Option<u32>,
	pub serialize_regeneration: Option<bool>,
	pub default_assign_to_supplier: Option<bool>,
}

impl ServicingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.preview_horizon_months.is_some() {
			self.preview_horizon_months = other.preview_horizon_months;
		}
		if other.serialize_regeneration.is_some() {
			self.serialize_regeneration = other.serialize_regeneration;
		}
		if other.default_assign_to_supplier.is_some() {
			self.default_assign_to_supplier = other.default_assign_to_supplier;
		}
	}

	pub fn finalize(self) -> Result<ServicingConfig, ConfigError> {
		let defaults = ServicingConfig::default();
		let preview_horizon_months = self
			.preview_horizon_months
			.unwrap_or(defaults.preview_horizon_months);
		if !(1..=MAX_PREVIEW_HORIZON_MONTHS).contains(&preview_horizon_months) {
			return Err(ConfigError::Validation(format!(
				"servicing.preview_horizon_months must be between 1 and {MAX_PREVIEW_HORIZON_MONTHS}, got {preview_horizon_months}"
			)));
		}

		Ok(ServicingConfig {
			preview_horizon_months,
			serialize_regeneration: self
				.serialize_regeneration
				.unwrap_or(defaults.serialize_regeneration),
			default_assign_to_supplier: self
				.default_assign_to_supplier
				.unwrap_or(defaults.default_assign_to_supplier),
		})
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicingConfig {
	/// Months past today covered by `preview`.
	pub preview_horizon_months: u32,
	/// Attach a per-contract lock registry to regeneration.
	pub serialize_regeneration: bool,
	/// Assign regenerated jobs to the primary supplier unless overridden.
	pub default_assign_to_supplier: bool,
}

impl Default for ServicingConfig {
	fn default() -> Self {
		Self {
			preview_horizon_months: 12,
			serialize_regeneration: false,
			default_assign_to_supplier: false,
		}
	}
}
