// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand definitions and handlers.
//!
//! Every handler returns a JSON value that `main` prints to stdout.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tracing::instrument;

use fieldwork_server_config::ServicingConfig;
use fieldwork_server_servicing::{RegenerateRequest, ServicingRepository, ServicingService};
use fieldwork_servicing_core::{
	local_today, AssignmentPolicy, ContractId, CustomerId, Frequency, JobId, NewServiceContract,
	ProjectId, SupplierId, UserId,
};

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Create or upgrade the database schema
	Migrate,
	/// Create a service contract and its initial schedule
	CreateContract(CreateContractArgs),
	/// Show suggested visit dates without writing anything
	Preview(PreviewArgs),
	/// Replace pending visits with explicit dates
	Regenerate(RegenerateArgs),
	/// Mark a job as started
	Start(JobArgs),
	/// Mark a job as completed
	Complete(JobArgs),
	/// Endorse a completed job
	Endorse(JobArgs),
	/// Move a job to a new date
	Reschedule(RescheduleArgs),
	/// List a contract's jobs
	Jobs(ContractArgs),
	/// List overdue jobs across all contracts
	Overdue(TodayArgs),
	/// Status counts for a contract's schedule
	Stats(StatsArgs),
	/// Show version and build information
	Version,
}

#[derive(Debug, Clone, Args)]
pub struct CreateContractArgs {
	#[arg(long)]
	pub customer: CustomerId,

	/// Display name recorded for the customer
	#[arg(long)]
	pub customer_name: Option<String>,

	#[arg(long)]
	pub project: Option<ProjectId>,

	#[arg(long)]
	pub project_name: Option<String>,

	#[arg(long)]
	pub title: String,

	/// First visit date (YYYY-MM-DD)
	#[arg(long)]
	pub start: NaiveDate,

	/// Last possible visit date (YYYY-MM-DD)
	#[arg(long)]
	pub end: NaiveDate,

	/// Monthly, Quarterly, BiAnnual, Annual or Custom
	#[arg(long, default_value = "Monthly")]
	pub frequency: String,

	/// Staff member creating the contract; default assignee
	#[arg(long)]
	pub created_by: UserId,

	#[arg(long)]
	pub created_by_name: Option<String>,

	/// Linked supplier, repeatable; the first is primary
	#[arg(long = "supplier")]
	pub suppliers: Vec<SupplierId>,

	#[command(flatten)]
	pub assignment: AssignmentArgs,
}

#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
	pub contract: ContractId,

	/// Months past today to include (defaults to configuration)
	#[arg(long)]
	pub months: Option<u32>,

	#[command(flatten)]
	pub today: TodayArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RegenerateArgs {
	pub contract: ContractId,

	/// Visit date (YYYY-MM-DD or RFC 3339), repeatable
	#[arg(long = "date", required = true)]
	pub dates: Vec<String>,

	/// Delete the contract's scheduled jobs first
	#[arg(long)]
	pub clear_existing: bool,

	#[command(flatten)]
	pub assignment: AssignmentArgs,
}

/// Who new jobs go to. Without either flag the configured default applies.
#[derive(Debug, Clone, Default, Args)]
pub struct AssignmentArgs {
	/// Assign new jobs to the contract's primary supplier
	#[arg(long, conflicts_with = "assign_to_staff")]
	pub assign_to_supplier: bool,

	/// Assign new jobs to the contract's creator
	#[arg(long)]
	pub assign_to_staff: bool,
}

impl AssignmentArgs {
	/// `Some(true)` for supplier, `Some(false)` for staff, `None` if unset.
	pub fn requested(&self) -> Option<bool> {
		if self.assign_to_supplier {
			Some(true)
		} else if self.assign_to_staff {
			Some(false)
		} else {
			None
		}
	}

	fn resolve(&self, settings: &ServicingConfig) -> bool {
		self
			.requested()
			.unwrap_or(settings.default_assign_to_supplier)
	}
}

#[derive(Debug, Clone, Args)]
pub struct JobArgs {
	pub job: JobId,
}

#[derive(Debug, Clone, Args)]
pub struct RescheduleArgs {
	pub job: JobId,

	#[arg(long)]
	pub date: NaiveDate,
}

#[derive(Debug, Clone, Args)]
pub struct ContractArgs {
	pub contract: ContractId,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TodayArgs {
	/// Evaluate as of this date instead of the local date
	#[arg(long)]
	pub today: Option<NaiveDate>,
}

impl TodayArgs {
	fn resolve(&self) -> NaiveDate {
		self.today.unwrap_or_else(local_today)
	}
}

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
	pub contract: ContractId,

	#[command(flatten)]
	pub today: TodayArgs,
}

/// Dispatch a data command. `Migrate` and `Version` are handled by `main`.
#[instrument(skip_all)]
pub async fn run<R: ServicingRepository>(
	command: Command,
	service: &ServicingService<R>,
	settings: &ServicingConfig,
) -> anyhow::Result<Value> {
	let value = match command {
		Command::Migrate | Command::Version => {
			anyhow::bail!("command is not a servicing operation")
		}
		Command::CreateContract(args) => create_contract(args, service, settings).await?,
		Command::Preview(args) => {
			let months = args.months.unwrap_or(settings.preview_horizon_months);
			let dates = service
				.preview_suggested_dates(args.contract, months, args.today.resolve())
				.await?;
			json!({ "contract_id": args.contract, "months": months, "dates": dates })
		}
		Command::Regenerate(args) => {
			let request = RegenerateRequest {
				explicit_dates: args.dates,
				clear_existing: args.clear_existing,
				assign_to_supplier: args.assignment.resolve(settings),
			};
			let outcome = service.regenerate_schedule(args.contract, &request).await?;
			serde_json::to_value(outcome)?
		}
		Command::Start(args) => serde_json::to_value(service.start_job(args.job).await?)?,
		Command::Complete(args) => serde_json::to_value(service.complete_job(args.job).await?)?,
		Command::Endorse(args) => serde_json::to_value(service.endorse_job(args.job).await?)?,
		Command::Reschedule(args) => {
			serde_json::to_value(service.reschedule_job(args.job, args.date).await?)?
		}
		Command::Jobs(args) => serde_json::to_value(service.list_jobs(args.contract).await?)?,
		Command::Overdue(args) => serde_json::to_value(service.overdue_jobs(args.resolve()).await?)?,
		Command::Stats(args) => {
			let stats = service
				.schedule_stats(args.contract, args.today.resolve())
				.await?;
			let completion = stats.completion_percentage();
			let mut value = serde_json::to_value(stats)?;
			value["completion_percentage"] = json!(completion);
			value
		}
	};
	Ok(value)
}

async fn create_contract<R: ServicingRepository>(
	args: CreateContractArgs,
	service: &ServicingService<R>,
	settings: &ServicingConfig,
) -> anyhow::Result<Value> {
	let repository = service.repository();
	if let Some(name) = &args.customer_name {
		repository.upsert_customer(args.customer, name).await?;
	}
	if let (Some(project), Some(name)) = (args.project, &args.project_name) {
		repository.upsert_project(project, name).await?;
	}
	if let Some(name) = &args.created_by_name {
		repository.upsert_user(args.created_by, name).await?;
	}

	let policy =
		AssignmentPolicy::from_assign_to_supplier(args.assignment.resolve(settings));
	let input = NewServiceContract {
		customer_id: args.customer,
		project_id: args.project,
		title: args.title,
		start_date: args.start,
		end_date: args.end,
		frequency: Frequency::from(args.frequency),
		created_by_id: args.created_by,
		linked_suppliers: args.suppliers,
	};

	let (contract, jobs) = service.create_contract(input, policy).await?;
	Ok(json!({ "contract": contract, "jobs": jobs }))
}
