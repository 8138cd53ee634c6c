// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Strongly typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub Uuid);

		impl $name {
			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(Self(Uuid::parse_str(s)?))
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}
	};
}

define_id_type!(ContractId, "Unique identifier for a service contract.");
define_id_type!(JobId, "Unique identifier for a scheduled service job.");
define_id_type!(CustomerId, "Unique identifier for a customer.");
define_id_type!(ProjectId, "Unique identifier for a project.");
define_id_type!(UserId, "Unique identifier for a staff user.");
define_id_type!(SupplierId, "Unique identifier for a supplier.");

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn test_contract_id_parses_its_display(uuid_bytes in any::<[u8; 16]>()) {
			let id = ContractId(Uuid::from_bytes(uuid_bytes));
			let parsed: ContractId = id.to_string().parse().unwrap();
			prop_assert_eq!(id, parsed);
		}
	}

	#[test]
	fn test_ids_serialize_as_bare_uuid() {
		let id = JobId::generate();
		let json = serde_json::to_string(&id).unwrap();
		assert_eq!(json, format!("\"{}\"", id.into_inner()));
	}

	#[test]
	fn test_rejects_non_uuid() {
		assert!("not-a-uuid".parse::<SupplierId>().is_err());
	}
}
