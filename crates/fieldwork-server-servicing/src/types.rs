// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use fieldwork_servicing_core::{AssignmentPolicy, ServiceJob};

/// A job joined with display names for its contract, customer, project and
/// assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
	#[serde(flatten)]
	pub job: ServiceJob,
	pub contract_title: String,
	pub customer_name: Option<String>,
	pub project_name: Option<String>,
	pub assignee_name: Option<String>,
}

/// Request to replace a contract's schedule with explicit dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateRequest {
	/// `YYYY-MM-DD` or RFC 3339 strings
	pub explicit_dates: Vec<String>,
	/// Delete the contract's `Scheduled` jobs first
	#[serde(default)]
	pub clear_existing: bool,
	/// Assign to the contract's first linked supplier instead of its creator
	#[serde(default)]
	pub assign_to_supplier: bool,
}

impl RegenerateRequest {
	pub fn assignment_policy(&self) -> AssignmentPolicy {
		AssignmentPolicy::from_assign_to_supplier(self.assign_to_supplier)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerateOutcome {
	pub created: usize,
	pub deleted: u64,
	pub jobs: Vec<JobSummary>,
}
