// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Service contract types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServicingError};
use crate::frequency::{Frequency, SchedulePath};
use crate::ids::{ContractId, CustomerId, ProjectId, SupplierId, UserId};
use crate::schedule::{expand_schedule_dates, Horizon};

/// A recurring service agreement with a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContract {
	pub id: ContractId,
	pub customer_id: CustomerId,
	pub project_id: Option<ProjectId>,
	pub title: String,

	/// Inclusive service window
	pub start_date: NaiveDate,
	pub end_date: NaiveDate,
	pub frequency: Frequency,

	/// Default assignee for generated jobs
	pub created_by_id: UserId,
	/// Ordered; the first entry is the primary supplier
	pub linked_suppliers: Vec<SupplierId>,

	pub created_at: DateTime<Utc>,
}

impl ServiceContract {
	pub fn validate(&self) -> Result<()> {
		validate_window(self.start_date, self.end_date)?;
		if self.title.trim().is_empty() {
			return Err(ServicingError::MissingField("title"));
		}
		Ok(())
	}

	/// Visit dates for the contract's whole window.
	pub fn initial_schedule(&self) -> Vec<NaiveDate> {
		expand_schedule_dates(
			self.start_date,
			self.end_date,
			&self.frequency,
			SchedulePath::ContractCreation,
			None,
		)
	}

	/// Preview of visit dates up to `months` past `today`.
	pub fn suggested_dates(&self, today: NaiveDate, months: u32) -> Vec<NaiveDate> {
		expand_schedule_dates(
			self.start_date,
			self.end_date,
			&self.frequency,
			SchedulePath::SuggestedDates,
			Some(Horizon::new(today, months)),
		)
	}
}

/// Input for creating a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewServiceContract {
	pub customer_id: CustomerId,
	pub project_id: Option<ProjectId>,
	pub title: String,
	pub start_date: NaiveDate,
	pub end_date: NaiveDate,
	pub frequency: Frequency,
	pub created_by_id: UserId,
	#[serde(default)]
	pub linked_suppliers: Vec<SupplierId>,
}

impl NewServiceContract {
	pub fn into_contract(self, now: DateTime<Utc>) -> Result<ServiceContract> {
		let contract = ServiceContract {
			id: ContractId::generate(),
			customer_id: self.customer_id,
			project_id: self.project_id,
			title: self.title.trim().to_string(),
			start_date: self.start_date,
			end_date: self.end_date,
			frequency: self.frequency,
			created_by_id: self.created_by_id,
			linked_suppliers: self.linked_suppliers,
			created_at: now,
		};
		contract.validate()?;
		Ok(contract)
	}
}

fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<()> {
	if end <= start {
		return Err(ServicingError::InvalidWindow { start, end });
	}
	Ok(())
}
