// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visit frequency for service contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which caller is asking for dates.
///
/// The two paths disagree on the interval for [`Frequency::Custom`]: full
/// generation at contract creation uses 12 months, the suggested-dates preview
/// uses 3. Both are kept as they are until the intended value is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulePath {
	/// Initial expansion of a contract's whole window.
	ContractCreation,
	/// Read-only "suggested dates" preview.
	SuggestedDates,
}

/// How often a contract is serviced.
///
/// Stored as its canonical name (`"Monthly"`, `"BiAnnual"`, ...). Values that
/// match no known frequency are kept verbatim in [`Frequency::Unrecognized`]
/// and scheduled monthly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
	Monthly,
	Quarterly,
	BiAnnual,
	Annual,
	Custom,
	Unrecognized(String),
}

impl Frequency {
	/// Months between consecutive visits.
	pub fn interval_months(&self, path: SchedulePath) -> u32 {
		match (self, path) {
			(Self::Monthly, _) => 1,
			(Self::Quarterly, _) => 3,
			(Self::BiAnnual, _) => 6,
			(Self::Annual, _) => 12,
			(Self::Custom, SchedulePath::ContractCreation) => 12,
			(Self::Custom, SchedulePath::SuggestedDates) => 3,
			(Self::Unrecognized(raw), _) => {
				tracing::warn!(frequency = %raw, "unrecognized frequency, falling back to monthly");
				1
			}
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Monthly => "Monthly",
			Self::Quarterly => "Quarterly",
			Self::BiAnnual => "BiAnnual",
			Self::Annual => "Annual",
			Self::Custom => "Custom",
			Self::Unrecognized(raw) => raw,
		}
	}

	pub fn is_recognized(&self) -> bool {
		!matches!(self, Self::Unrecognized(_))
	}
}

impl From<&str> for Frequency {
	fn from(s: &str) -> Self {
		match s {
			"Monthly" => Self::Monthly,
			"Quarterly" => Self::Quarterly,
			"BiAnnual" => Self::BiAnnual,
			"Annual" => Self::Annual,
			"Custom" => Self::Custom,
			other => Self::Unrecognized(other.to_string()),
		}
	}
}

impl From<String> for Frequency {
	fn from(s: String) -> Self {
		Self::from(s.as_str())
	}
}

impl From<Frequency> for String {
	fn from(frequency: Frequency) -> Self {
		match frequency {
			Frequency::Unrecognized(raw) => raw,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for Frequency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
