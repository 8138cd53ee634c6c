// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scheduling operations over a [`ServicingRepository`].

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use fieldwork_servicing_core::{
	build_jobs, parse_schedule_dates, AssignmentPolicy, ContractId, JobEvent, JobId, JobStatus,
	NewServiceContract, ScheduleStats, ServiceContract, ServiceJob, ServicingError,
};

use crate::error::{Result, ServicingServerError};
use crate::locks::ContractLocks;
use crate::repository::ServicingRepository;
use crate::types::{JobSummary, RegenerateOutcome, RegenerateRequest};

pub struct ServicingService<R> {
	repository: Arc<R>,
	locks: Option<ContractLocks>,
}

impl<R: ServicingRepository> ServicingService<R> {
	pub fn new(repository: Arc<R>) -> Self {
		Self {
			repository,
			locks: None,
		}
	}

	/// Serialize regenerations per contract through `locks`.
	pub fn with_contract_locks(mut self, locks: ContractLocks) -> Self {
		self.locks = Some(locks);
		self
	}

	pub fn repository(&self) -> &Arc<R> {
		&self.repository
	}

	async fn require_contract(&self, id: ContractId) -> Result<ServiceContract> {
		self
			.repository
			.get_contract(id)
			.await?
			.ok_or(ServicingServerError::ContractNotFound(id))
	}

	async fn require_job(&self, id: JobId) -> Result<ServiceJob> {
		self
			.repository
			.get_job(id)
			.await?
			.ok_or(ServicingServerError::JobNotFound(id))
	}

	/// Create a contract together with its initial schedule.
	///
	/// The contract row and every generated job are written in one
	/// transaction.
	#[instrument(skip(self, input), fields(customer_id = %input.customer_id, frequency = %input.frequency))]
	pub async fn create_contract(
		&self,
		input: NewServiceContract,
		policy: AssignmentPolicy,
	) -> Result<(ServiceContract, Vec<ServiceJob>)> {
		let now = Utc::now();
		let contract = input.into_contract(now)?;
		let jobs = build_jobs(&contract, &contract.initial_schedule(), policy, now);

		self.repository.create_contract(&contract, &jobs).await?;

		info!(
			contract_id = %contract.id,
			jobs = jobs.len(),
			start = %contract.start_date,
			end = %contract.end_date,
			"service contract created with initial schedule"
		);
		Ok((contract, jobs))
	}

	/// Expand and persist the full schedule of an existing contract.
	///
	/// Not idempotent: calling it twice schedules every visit twice.
	#[instrument(skip(self), fields(contract_id = %contract_id))]
	pub async fn generate_initial_schedule(
		&self,
		contract_id: ContractId,
		policy: AssignmentPolicy,
	) -> Result<Vec<ServiceJob>> {
		let contract = self.require_contract(contract_id).await?;
		let dates = contract.initial_schedule();
		self.materialize_jobs(&contract, &dates, policy).await
	}

	/// Suggested visit dates up to `months_horizon` past `today`. Writes
	/// nothing.
	#[instrument(skip(self), fields(contract_id = %contract_id))]
	pub async fn preview_suggested_dates(
		&self,
		contract_id: ContractId,
		months_horizon: u32,
		today: NaiveDate,
	) -> Result<Vec<NaiveDate>> {
		let contract = self.require_contract(contract_id).await?;
		Ok(contract.suggested_dates(today, months_horizon))
	}

	/// One `Scheduled` job per date, bulk-inserted atomically.
	///
	/// Duplicate dates are the caller's concern; clear existing jobs first if
	/// needed.
	#[instrument(skip(self, contract, dates), fields(contract_id = %contract.id, dates = dates.len()))]
	pub async fn materialize_jobs(
		&self,
		contract: &ServiceContract,
		dates: &[NaiveDate],
		policy: AssignmentPolicy,
	) -> Result<Vec<ServiceJob>> {
		let jobs = build_jobs(contract, dates, policy, Utc::now());
		self.repository.bulk_insert_jobs(&jobs).await?;
		info!(created = jobs.len(), "service jobs materialized");
		Ok(jobs)
	}

	/// Replace a contract's pending visits with `request.explicit_dates`.
	///
	/// Every date is validated before anything is written. With
	/// `clear_existing`, only `Scheduled` jobs are deleted; started, completed
	/// and endorsed jobs are kept.
	///
	/// The delete and the insert commit separately. If the insert fails after
	/// a delete, the contract is left without its pending visits and the
	/// persistence error is returned as is.
	#[instrument(skip(self, request), fields(contract_id = %contract_id, dates = request.explicit_dates.len(), clear_existing = request.clear_existing))]
	pub async fn regenerate_schedule(
		&self,
		contract_id: ContractId,
		request: &RegenerateRequest,
	) -> Result<RegenerateOutcome> {
		let contract = self.require_contract(contract_id).await?;

		if request.explicit_dates.is_empty() {
			return Err(ServicingError::MissingField("explicit_dates").into());
		}
		let dates = parse_schedule_dates(&request.explicit_dates)?;

		let _guard = match &self.locks {
			Some(locks) => Some(locks.lock(contract_id).await),
			None => None,
		};

		let deleted = if request.clear_existing {
			self
				.repository
				.delete_jobs_by_status(contract_id, JobStatus::Scheduled)
				.await?
		} else {
			0
		};

		let jobs = self
			.materialize_jobs(&contract, &dates, request.assignment_policy())
			.await?;

		let created_ids: HashSet<JobId> = jobs.iter().map(|j| j.id).collect();
		let summaries = self
			.repository
			.list_job_summaries(contract_id)
			.await?
			.into_iter()
			.filter(|s| created_ids.contains(&s.job.id))
			.collect();

		info!(
			created = jobs.len(),
			deleted,
			"service schedule regenerated"
		);
		Ok(RegenerateOutcome {
			created: jobs.len(),
			deleted,
			jobs: summaries,
		})
	}

	async fn apply_event(&self, job_id: JobId, event: JobEvent) -> Result<ServiceJob> {
		let mut job = self.require_job(job_id).await?;
		job.apply(event, Utc::now())?;
		self.repository.update_job(&job).await?;
		info!(job_id = %job.id, status = %job.status, "service job status changed");
		Ok(job)
	}

	#[instrument(skip(self), fields(job_id = %job_id))]
	pub async fn start_job(&self, job_id: JobId) -> Result<ServiceJob> {
		self.apply_event(job_id, JobEvent::Start).await
	}

	#[instrument(skip(self), fields(job_id = %job_id))]
	pub async fn complete_job(&self, job_id: JobId) -> Result<ServiceJob> {
		self.apply_event(job_id, JobEvent::Complete).await
	}

	#[instrument(skip(self), fields(job_id = %job_id))]
	pub async fn endorse_job(&self, job_id: JobId) -> Result<ServiceJob> {
		self.apply_event(job_id, JobEvent::Endorse).await
	}

	/// Move a job to `date`. An in-progress job goes back to `Scheduled`.
	#[instrument(skip(self), fields(job_id = %job_id, date = %date))]
	pub async fn reschedule_job(&self, job_id: JobId, date: NaiveDate) -> Result<ServiceJob> {
		let mut job = self.require_job(job_id).await?;
		job.reschedule(date, Utc::now())?;
		self.repository.update_job(&job).await?;
		info!(job_id = %job.id, "service job rescheduled");
		Ok(job)
	}

	#[instrument(skip(self), fields(contract_id = %contract_id))]
	pub async fn list_jobs(&self, contract_id: ContractId) -> Result<Vec<JobSummary>> {
		self.require_contract(contract_id).await?;
		self.repository.list_job_summaries(contract_id).await
	}

	/// All overdue jobs across contracts as of `today`.
	#[instrument(skip(self), fields(today = %today))]
	pub async fn overdue_jobs(&self, today: NaiveDate) -> Result<Vec<JobSummary>> {
		let candidates = self
			.repository
			.list_job_summaries_scheduled_before(today)
			.await?;
		Ok(candidates
			.into_iter()
			.filter(|s| s.job.is_overdue(today))
			.collect())
	}

	#[instrument(skip(self), fields(contract_id = %contract_id))]
	pub async fn schedule_stats(
		&self,
		contract_id: ContractId,
		today: NaiveDate,
	) -> Result<ScheduleStats> {
		self.require_contract(contract_id).await?;
		let jobs = self.repository.list_jobs(contract_id).await?;
		Ok(ScheduleStats::from_jobs(&jobs, today))
	}
}
