// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Service job types and the job status state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::contract::ServiceContract;
use crate::error::{Result, ServicingError};
use crate::ids::{ContractId, CustomerId, JobId, ProjectId, SupplierId, UserId};

/// One scheduled service visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceJob {
	pub id: JobId,
	pub contract_id: ContractId,

	// Denormalized from the contract at creation time
	pub customer_id: CustomerId,
	pub project_id: Option<ProjectId>,

	pub scheduled_date: NaiveDate,
	pub status: JobStatus,
	pub assignee: Option<Assignee>,
	pub completed_at: Option<DateTime<Utc>>,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ServiceJob {
	/// A fresh `Scheduled` job for `contract` on `date`.
	pub fn scheduled(
		contract: &ServiceContract,
		date: NaiveDate,
		assignee: Option<Assignee>,
		now: DateTime<Utc>,
	) -> Self {
		Self {
			id: JobId::generate(),
			contract_id: contract.id,
			customer_id: contract.customer_id,
			project_id: contract.project_id,
			scheduled_date: date,
			status: JobStatus::Scheduled,
			assignee,
			completed_at: None,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn is_overdue(&self, today: NaiveDate) -> bool {
		is_overdue(self.scheduled_date, self.status, today)
	}

	/// Apply a status event.
	///
	/// `Complete` stamps `completed_at`. `Reschedule` does not move the date;
	/// use [`ServiceJob::reschedule`] for that.
	pub fn apply(&mut self, event: JobEvent, now: DateTime<Utc>) -> Result<()> {
		let next = self
			.status
			.apply(event)
			.ok_or(ServicingError::InvalidTransition {
				from: self.status,
				event,
			})?;

		if event == JobEvent::Complete {
			self.completed_at = Some(now);
		}
		self.status = next;
		self.updated_at = now;
		Ok(())
	}

	/// Move the job to `date`. An in-progress job drops back to `Scheduled`.
	pub fn reschedule(&mut self, date: NaiveDate, now: DateTime<Utc>) -> Result<()> {
		self.apply(JobEvent::Reschedule, now)?;
		self.scheduled_date = date;
		Ok(())
	}
}

/// Overdue iff the visit date has passed and the job is not closed.
///
/// This is the only definition of overdue; every listing and report goes
/// through it.
pub fn is_overdue(scheduled_date: NaiveDate, status: JobStatus, today: NaiveDate) -> bool {
	scheduled_date < today && !status.is_closed()
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
	/// Initial state
	Scheduled,
	/// Work has begun
	InProgress,
	/// Work finished
	Completed,
	/// Customer sign-off on a completed job
	Endorsed,
}

impl JobStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			JobStatus::Scheduled => "scheduled",
			JobStatus::InProgress => "in_progress",
			JobStatus::Completed => "completed",
			JobStatus::Endorsed => "endorsed",
		}
	}

	/// Completed and endorsed jobs are history and never regenerated.
	pub fn is_closed(&self) -> bool {
		matches!(self, JobStatus::Completed | JobStatus::Endorsed)
	}

	/// The status after `event`, or `None` if the event is not allowed here.
	///
	/// There are no events leading back out of `Completed` or `Endorsed`.
	pub fn apply(self, event: JobEvent) -> Option<JobStatus> {
		match (self, event) {
			(JobStatus::Scheduled, JobEvent::Start) => Some(JobStatus::InProgress),
			(JobStatus::InProgress, JobEvent::Complete) => Some(JobStatus::Completed),
			(JobStatus::Completed, JobEvent::Endorse) => Some(JobStatus::Endorsed),
			(JobStatus::Scheduled | JobStatus::InProgress, JobEvent::Reschedule) => {
				Some(JobStatus::Scheduled)
			}
			_ => None,
		}
	}
}

impl fmt::Display for JobStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for JobStatus {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"scheduled" => Ok(JobStatus::Scheduled),
			"in_progress" => Ok(JobStatus::InProgress),
			"completed" => Ok(JobStatus::Completed),
			"endorsed" => Ok(JobStatus::Endorsed),
			_ => Err(format!("unknown job status: {s}")),
		}
	}
}

/// Forward events on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobEvent {
	Start,
	Complete,
	Endorse,
	Reschedule,
}

impl fmt::Display for JobEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			JobEvent::Start => write!(f, "start"),
			JobEvent::Complete => write!(f, "complete"),
			JobEvent::Endorse => write!(f, "endorse"),
			JobEvent::Reschedule => write!(f, "reschedule"),
		}
	}
}

/// Who carries out a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Assignee {
	Staff(UserId),
	Supplier(SupplierId),
}

impl Assignee {
	pub fn assigned_to_type(&self) -> AssignedToType {
		match self {
			Assignee::Staff(_) => AssignedToType::Staff,
			Assignee::Supplier(_) => AssignedToType::Supplier,
		}
	}

	pub fn user_id(&self) -> Option<UserId> {
		match self {
			Assignee::Staff(id) => Some(*id),
			Assignee::Supplier(_) => None,
		}
	}

	pub fn supplier_id(&self) -> Option<SupplierId> {
		match self {
			Assignee::Supplier(id) => Some(*id),
			Assignee::Staff(_) => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedToType {
	Staff,
	Supplier,
}

impl AssignedToType {
	pub fn as_str(&self) -> &'static str {
		match self {
			AssignedToType::Staff => "staff",
			AssignedToType::Supplier => "supplier",
		}
	}
}

impl fmt::Display for AssignedToType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AssignedToType {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"staff" => Ok(AssignedToType::Staff),
			"supplier" => Ok(AssignedToType::Supplier),
			_ => Err(format!("unknown assignee type: {s}")),
		}
	}
}

/// How generated jobs are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPolicy {
	/// The staff member who created the contract
	#[default]
	ContractOwner,
	/// The first supplier linked to the contract
	PrimarySupplier,
}

impl AssignmentPolicy {
	pub fn from_assign_to_supplier(assign_to_supplier: bool) -> Self {
		if assign_to_supplier {
			AssignmentPolicy::PrimarySupplier
		} else {
			AssignmentPolicy::ContractOwner
		}
	}

	/// `None` when the policy asks for a supplier and none is linked.
	pub fn resolve(&self, contract: &ServiceContract) -> Option<Assignee> {
		match self {
			AssignmentPolicy::ContractOwner => Some(Assignee::Staff(contract.created_by_id)),
			AssignmentPolicy::PrimarySupplier => contract
				.linked_suppliers
				.first()
				.copied()
				.map(Assignee::Supplier),
		}
	}
}

/// One `Scheduled` job per date, in the order given.
pub fn build_jobs(
	contract: &ServiceContract,
	dates: &[NaiveDate],
	policy: AssignmentPolicy,
	now: DateTime<Utc>,
) -> Vec<ServiceJob> {
	let assignee = policy.resolve(contract);
	dates
		.iter()
		.map(|date| ServiceJob::scheduled(contract, *date, assignee, now))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::frequency::Frequency;
	use proptest::prelude::*;

	fn date(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	fn contract(suppliers: Vec<SupplierId>) -> ServiceContract {
		ServiceContract {
			id: ContractId::generate(),
			customer_id: CustomerId::generate(),
			project_id: Some(ProjectId::generate()),
			title: "Fire pump servicing".to_string(),
			start_date: date(2025, 1, 1),
			end_date: date(2025, 12, 31),
			frequency: Frequency::Quarterly,
			created_by_id: UserId::generate(),
			linked_suppliers: suppliers,
			created_at: Utc::now(),
		}
	}

	fn any_status() -> impl Strategy<Value = JobStatus> {
		prop_oneof![
			Just(JobStatus::Scheduled),
			Just(JobStatus::InProgress),
			Just(JobStatus::Completed),
			Just(JobStatus::Endorsed),
		]
	}

	#[test]
	fn test_forward_path_through_all_states() {
		let c = contract(vec![]);
		let mut job = ServiceJob::scheduled(&c, date(2025, 1, 1), None, Utc::now());
		let now = Utc::now();

		job.apply(JobEvent::Start, now).unwrap();
		assert_eq!(job.status, JobStatus::InProgress);
		assert!(job.completed_at.is_none());

		job.apply(JobEvent::Complete, now).unwrap();
		assert_eq!(job.status, JobStatus::Completed);
		assert_eq!(job.completed_at, Some(now));

		job.apply(JobEvent::Endorse, now).unwrap();
		assert_eq!(job.status, JobStatus::Endorsed);
	}

	#[test]
	fn test_skipping_states_is_rejected() {
		let c = contract(vec![]);
		let mut job = ServiceJob::scheduled(&c, date(2025, 1, 1), None, Utc::now());
		let err = job.apply(JobEvent::Complete, Utc::now()).unwrap_err();
		assert_eq!(
			err,
			ServicingError::InvalidTransition {
				from: JobStatus::Scheduled,
				event: JobEvent::Complete,
			}
		);
		assert_eq!(err.to_string(), "cannot complete a job that is scheduled");
		assert_eq!(job.status, JobStatus::Scheduled);
	}

	#[test]
	fn test_reschedule_resets_in_progress() {
		let c = contract(vec![]);
		let mut job = ServiceJob::scheduled(&c, date(2025, 1, 1), None, Utc::now());
		job.apply(JobEvent::Start, Utc::now()).unwrap();

		job.reschedule(date(2025, 2, 1), Utc::now()).unwrap();
		assert_eq!(job.status, JobStatus::Scheduled);
		assert_eq!(job.scheduled_date, date(2025, 2, 1));
	}

	#[test]
	fn test_closed_jobs_cannot_be_rescheduled() {
		let c = contract(vec![]);
		let mut job = ServiceJob::scheduled(&c, date(2025, 1, 1), None, Utc::now());
		job.apply(JobEvent::Start, Utc::now()).unwrap();
		job.apply(JobEvent::Complete, Utc::now()).unwrap();

		assert!(job.reschedule(date(2025, 2, 1), Utc::now()).is_err());
		assert_eq!(job.scheduled_date, date(2025, 1, 1));
	}

	#[test]
	fn test_overdue_boundary_is_exclusive() {
		let today = date(2025, 6, 1);
		assert!(!is_overdue(today, JobStatus::Scheduled, today));
		assert!(is_overdue(date(2025, 5, 31), JobStatus::Scheduled, today));
		assert!(is_overdue(date(2025, 5, 31), JobStatus::InProgress, today));
		assert!(!is_overdue(date(2025, 5, 31), JobStatus::Completed, today));
		assert!(!is_overdue(date(2025, 5, 31), JobStatus::Endorsed, today));
	}

	#[test]
	fn test_owner_policy_assigns_creator() {
		let c = contract(vec![SupplierId::generate()]);
		assert_eq!(
			AssignmentPolicy::ContractOwner.resolve(&c),
			Some(Assignee::Staff(c.created_by_id))
		);
	}

	#[test]
	fn test_supplier_policy_takes_first_linked() {
		let first = SupplierId::generate();
		let c = contract(vec![first, SupplierId::generate()]);
		let assignee = AssignmentPolicy::PrimarySupplier.resolve(&c).unwrap();
		assert_eq!(assignee, Assignee::Supplier(first));
		assert_eq!(assignee.assigned_to_type(), AssignedToType::Supplier);
		assert_eq!(assignee.supplier_id(), Some(first));
		assert_eq!(assignee.user_id(), None);
	}

	#[test]
	fn test_supplier_policy_without_suppliers_leaves_unassigned() {
		let c = contract(vec![]);
		assert_eq!(AssignmentPolicy::PrimarySupplier.resolve(&c), None);
	}

	#[test]
	fn test_build_jobs_denormalizes_contract() {
		let c = contract(vec![]);
		let dates = [date(2025, 1, 1), date(2025, 4, 1)];
		let jobs = build_jobs(&c, &dates, AssignmentPolicy::ContractOwner, Utc::now());

		assert_eq!(jobs.len(), 2);
		for (job, d) in jobs.iter().zip(dates) {
			assert_eq!(job.scheduled_date, d);
			assert_eq!(job.status, JobStatus::Scheduled);
			assert_eq!(job.contract_id, c.id);
			assert_eq!(job.customer_id, c.customer_id);
			assert_eq!(job.project_id, c.project_id);
			assert_eq!(job.assignee, Some(Assignee::Staff(c.created_by_id)));
		}
		assert_ne!(jobs[0].id, jobs[1].id);
	}

	#[test]
	fn test_assignee_serializes_tagged() {
		let id = UserId::generate();
		let json = serde_json::to_value(Assignee::Staff(id)).unwrap();
		assert_eq!(json["type"], "staff");
		assert_eq!(json["id"], id.to_string());
	}

	proptest! {
		#[test]
		fn test_status_string_roundtrip(status in any_status()) {
			let parsed: JobStatus = status.to_string().parse().unwrap();
			prop_assert_eq!(status, parsed);
		}

		#[test]
		fn test_closed_states_have_no_way_back(
			status in prop_oneof![Just(JobStatus::Completed), Just(JobStatus::Endorsed)],
			event in prop_oneof![
				Just(JobEvent::Start),
				Just(JobEvent::Complete),
				Just(JobEvent::Reschedule),
			],
		) {
			prop_assert_eq!(status.apply(event), None);
		}

		#[test]
		fn test_overdue_iff_past_and_open(
			offset in -400i64..400,
			status in any_status(),
		) {
			let today = date(2025, 6, 15);
			let scheduled = today + chrono::Duration::days(offset);
			let expected = offset < 0
				&& !matches!(status, JobStatus::Completed | JobStatus::Endorsed);
			prop_assert_eq!(is_overdue(scheduled, status, today), expected);
		}
	}
}
