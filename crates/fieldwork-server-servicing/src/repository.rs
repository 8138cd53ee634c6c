// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository layer for service contracts and jobs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;
use tracing::instrument;

use fieldwork_servicing_core::{
	AssignedToType, Assignee, ContractId, CustomerId, Frequency, JobId, JobStatus, ProjectId,
	ServiceContract, ServiceJob, SupplierId, UserId,
};

use crate::error::{Result, ServicingServerError};
use crate::types::JobSummary;

/// Persistence collaborator for the scheduler.
///
/// `create_contract` and `bulk_insert_jobs` are atomic. Each call is its own
/// unit of work; nothing spans calls.
#[async_trait]
pub trait ServicingRepository: Send + Sync {
	// Contract reader
	async fn get_contract(&self, id: ContractId) -> Result<Option<ServiceContract>>;
	async fn create_contract(&self, contract: &ServiceContract, jobs: &[ServiceJob]) -> Result<()>;

	// Job writer
	async fn bulk_insert_jobs(&self, jobs: &[ServiceJob]) -> Result<()>;
	async fn delete_jobs_by_status(&self, contract_id: ContractId, status: JobStatus)
		-> Result<u64>;

	// Job reads and updates
	async fn get_job(&self, id: JobId) -> Result<Option<ServiceJob>>;
	async fn update_job(&self, job: &ServiceJob) -> Result<()>;
	async fn list_jobs(&self, contract_id: ContractId) -> Result<Vec<ServiceJob>>;
	async fn list_job_summaries(&self, contract_id: ContractId) -> Result<Vec<JobSummary>>;
	/// Every job dated before `date`, whatever its status.
	async fn list_job_summaries_scheduled_before(&self, date: NaiveDate)
		-> Result<Vec<JobSummary>>;

	// Reference data used for display joins
	async fn upsert_customer(&self, id: CustomerId, name: &str) -> Result<()>;
	async fn upsert_project(&self, id: ProjectId, name: &str) -> Result<()>;
	async fn upsert_user(&self, id: UserId, display_name: &str) -> Result<()>;
	async fn upsert_supplier(&self, id: SupplierId, name: &str) -> Result<()>;
}

/// SQLite implementation of the servicing repository.
#[derive(Clone)]
pub struct SqliteServicingRepository {
	pool: SqlitePool,
}

impl SqliteServicingRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

const JOB_COLUMNS: &str = r#"
	j.id, j.contract_id, j.customer_id, j.project_id,
	j.scheduled_date, j.status,
	j.assigned_to_type, j.assigned_user_id, j.assigned_supplier_id,
	j.completed_at, j.created_at, j.updated_at
"#;

const SUMMARY_JOINS: &str = r#"
	c.title AS contract_title,
	cu.name AS customer_name,
	p.name AS project_name,
	COALESCE(u.display_name, s.name) AS assignee_name
FROM service_jobs j
JOIN service_contracts c ON c.id = j.contract_id
LEFT JOIN customers cu ON cu.id = j.customer_id
LEFT JOIN projects p ON p.id = j.project_id
LEFT JOIN users u ON u.id = j.assigned_user_id
LEFT JOIN suppliers s ON s.id = j.assigned_supplier_id
"#;

async fn insert_job(conn: &mut SqliteConnection, job: &ServiceJob) -> Result<()> {
	sqlx::query(
		r#"
		INSERT INTO service_jobs (
			id, contract_id, customer_id, project_id,
			scheduled_date, status,
			assigned_to_type, assigned_user_id, assigned_supplier_id,
			completed_at, created_at, updated_at
		)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(job.id.to_string())
	.bind(job.contract_id.to_string())
	.bind(job.customer_id.to_string())
	.bind(job.project_id.map(|id| id.to_string()))
	.bind(job.scheduled_date.to_string())
	.bind(job.status.as_str())
	.bind(job.assignee.map(|a| a.assigned_to_type().as_str()))
	.bind(job.assignee.and_then(|a| a.user_id()).map(|id| id.to_string()))
	.bind(
		job
			.assignee
			.and_then(|a| a.supplier_id())
			.map(|id| id.to_string()),
	)
	.bind(job.completed_at.map(|dt| dt.to_rfc3339()))
	.bind(job.created_at.to_rfc3339())
	.bind(job.updated_at.to_rfc3339())
	.execute(conn)
	.await?;

	Ok(())
}

#[async_trait]
impl ServicingRepository for SqliteServicingRepository {
	#[instrument(skip(self), fields(contract_id = %id))]
	async fn get_contract(&self, id: ContractId) -> Result<Option<ServiceContract>> {
		let row = sqlx::query_as::<_, ContractRow>(
			r#"
			SELECT id, customer_id, project_id, title,
				   start_date, end_date, frequency,
				   created_by_id, created_at
			FROM service_contracts
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let supplier_rows: Vec<(String,)> = sqlx::query_as(
			r#"
			SELECT supplier_id
			FROM service_contract_suppliers
			WHERE contract_id = ?
			ORDER BY position ASC
			"#,
		)
		.bind(id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let linked_suppliers = supplier_rows
			.into_iter()
			.map(|(s,)| parse_id::<SupplierId>("supplier_id", &s))
			.collect::<Result<Vec<_>>>()?;

		row.into_contract(linked_suppliers).map(Some)
	}

	#[instrument(skip(self, contract, jobs), fields(contract_id = %contract.id, job_count = jobs.len()))]
	async fn create_contract(&self, contract: &ServiceContract, jobs: &[ServiceJob]) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO service_contracts (
				id, customer_id, project_id, title,
				start_date, end_date, frequency,
				created_by_id, created_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(contract.id.to_string())
		.bind(contract.customer_id.to_string())
		.bind(contract.project_id.map(|id| id.to_string()))
		.bind(&contract.title)
		.bind(contract.start_date.to_string())
		.bind(contract.end_date.to_string())
		.bind(contract.frequency.as_str())
		.bind(contract.created_by_id.to_string())
		.bind(contract.created_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		for (position, supplier_id) in contract.linked_suppliers.iter().enumerate() {
			sqlx::query(
				r#"
				INSERT INTO service_contract_suppliers (contract_id, supplier_id, position)
				VALUES (?, ?, ?)
				"#,
			)
			.bind(contract.id.to_string())
			.bind(supplier_id.to_string())
			.bind(position as i64)
			.execute(&mut *tx)
			.await?;
		}

		for job in jobs {
			insert_job(&mut *tx, job).await?;
		}

		tx.commit().await?;
		Ok(())
	}

	#[instrument(skip(self, jobs), fields(job_count = jobs.len()))]
	async fn bulk_insert_jobs(&self, jobs: &[ServiceJob]) -> Result<()> {
		let mut tx = self.pool.begin().await?;
		for job in jobs {
			insert_job(&mut *tx, job).await?;
		}
		tx.commit().await?;
		Ok(())
	}

	#[instrument(skip(self), fields(contract_id = %contract_id, status = %status))]
	async fn delete_jobs_by_status(
		&self,
		contract_id: ContractId,
		status: JobStatus,
	) -> Result<u64> {
		let result = sqlx::query("DELETE FROM service_jobs WHERE contract_id = ? AND status = ?")
			.bind(contract_id.to_string())
			.bind(status.as_str())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	#[instrument(skip(self), fields(job_id = %id))]
	async fn get_job(&self, id: JobId) -> Result<Option<ServiceJob>> {
		let row = sqlx::query_as::<_, JobRow>(&format!(
			"SELECT {JOB_COLUMNS} FROM service_jobs j WHERE j.id = ?"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(TryInto::try_into).transpose()
	}

	#[instrument(skip(self, job), fields(job_id = %job.id, status = %job.status))]
	async fn update_job(&self, job: &ServiceJob) -> Result<()> {
		let result = sqlx::query(
			r#"
			UPDATE service_jobs
			SET scheduled_date = ?, status = ?,
				assigned_to_type = ?, assigned_user_id = ?, assigned_supplier_id = ?,
				completed_at = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(job.scheduled_date.to_string())
		.bind(job.status.as_str())
		.bind(job.assignee.map(|a| a.assigned_to_type().as_str()))
		.bind(job.assignee.and_then(|a| a.user_id()).map(|id| id.to_string()))
		.bind(
			job
				.assignee
				.and_then(|a| a.supplier_id())
				.map(|id| id.to_string()),
		)
		.bind(job.completed_at.map(|dt| dt.to_rfc3339()))
		.bind(job.updated_at.to_rfc3339())
		.bind(job.id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(ServicingServerError::JobNotFound(job.id));
		}
		Ok(())
	}

	#[instrument(skip(self), fields(contract_id = %contract_id))]
	async fn list_jobs(&self, contract_id: ContractId) -> Result<Vec<ServiceJob>> {
		let rows = sqlx::query_as::<_, JobRow>(&format!(
			r#"
			SELECT {JOB_COLUMNS}
			FROM service_jobs j
			WHERE j.contract_id = ?
			ORDER BY j.scheduled_date ASC, j.created_at ASC
			"#
		))
		.bind(contract_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self), fields(contract_id = %contract_id))]
	async fn list_job_summaries(&self, contract_id: ContractId) -> Result<Vec<JobSummary>> {
		let rows = sqlx::query_as::<_, JobSummaryRow>(&format!(
			r#"
			SELECT {JOB_COLUMNS}, {SUMMARY_JOINS}
			WHERE j.contract_id = ?
			ORDER BY j.scheduled_date ASC, j.created_at ASC
			"#
		))
		.bind(contract_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self), fields(before = %date))]
	async fn list_job_summaries_scheduled_before(
		&self,
		date: NaiveDate,
	) -> Result<Vec<JobSummary>> {
		let rows = sqlx::query_as::<_, JobSummaryRow>(&format!(
			r#"
			SELECT {JOB_COLUMNS}, {SUMMARY_JOINS}
			WHERE j.scheduled_date < ?
			ORDER BY j.scheduled_date ASC, c.title ASC
			"#
		))
		.bind(date.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	#[instrument(skip(self, name), fields(customer_id = %id))]
	async fn upsert_customer(&self, id: CustomerId, name: &str) -> Result<()> {
		upsert_named(&self.pool, "customers", "name", &id.to_string(), name).await
	}

	#[instrument(skip(self, name), fields(project_id = %id))]
	async fn upsert_project(&self, id: ProjectId, name: &str) -> Result<()> {
		upsert_named(&self.pool, "projects", "name", &id.to_string(), name).await
	}

	#[instrument(skip(self, display_name), fields(user_id = %id))]
	async fn upsert_user(&self, id: UserId, display_name: &str) -> Result<()> {
		upsert_named(
			&self.pool,
			"users",
			"display_name",
			&id.to_string(),
			display_name,
		)
		.await
	}

	#[instrument(skip(self, name), fields(supplier_id = %id))]
	async fn upsert_supplier(&self, id: SupplierId, name: &str) -> Result<()> {
		upsert_named(&self.pool, "suppliers", "name", &id.to_string(), name).await
	}
}

// Table and column names are compile-time constants from the callers above.
async fn upsert_named(
	pool: &SqlitePool,
	table: &'static str,
	column: &'static str,
	id: &str,
	value: &str,
) -> Result<()> {
	sqlx::query(&format!(
		"INSERT INTO {table} (id, {column}) VALUES (?, ?)
		 ON CONFLICT(id) DO UPDATE SET {column} = excluded.{column}"
	))
	.bind(id)
	.bind(value)
	.execute(pool)
	.await?;
	Ok(())
}

fn parse_id<T: FromStr>(column: &str, value: &str) -> Result<T> {
	value
		.parse()
		.map_err(|_| ServicingServerError::Internal(format!("Invalid {column}: {value}")))
}

fn parse_date(column: &str, value: &str) -> Result<NaiveDate> {
	NaiveDate::parse_from_str(value, "%Y-%m-%d")
		.map_err(|_| ServicingServerError::Internal(format!("Invalid {column}: {value}")))
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|_| ServicingServerError::Internal(format!("Invalid {column}: {value}")))
}

// Database row types for sqlx

#[derive(sqlx::FromRow)]
struct ContractRow {
	id: String,
	customer_id: String,
	project_id: Option<String>,
	title: String,
	start_date: String,
	end_date: String,
	frequency: String,
	created_by_id: String,
	created_at: String,
}

impl ContractRow {
	fn into_contract(self, linked_suppliers: Vec<SupplierId>) -> Result<ServiceContract> {
		Ok(ServiceContract {
			id: parse_id("contract id", &self.id)?,
			customer_id: parse_id("customer_id", &self.customer_id)?,
			project_id: self
				.project_id
				.as_deref()
				.map(|s| parse_id("project_id", s))
				.transpose()?,
			title: self.title,
			start_date: parse_date("start_date", &self.start_date)?,
			end_date: parse_date("end_date", &self.end_date)?,
			frequency: Frequency::from(self.frequency),
			created_by_id: parse_id("created_by_id", &self.created_by_id)?,
			linked_suppliers,
			created_at: parse_timestamp("created_at", &self.created_at)?,
		})
	}
}

#[derive(sqlx::FromRow)]
struct JobRow {
	id: String,
	contract_id: String,
	customer_id: String,
	project_id: Option<String>,
	scheduled_date: String,
	status: String,
	assigned_to_type: Option<String>,
	assigned_user_id: Option<String>,
	assigned_supplier_id: Option<String>,
	completed_at: Option<String>,
	created_at: String,
	updated_at: String,
}

impl JobRow {
	fn assignee(&self) -> Result<Option<Assignee>> {
		let Some(kind) = self.assigned_to_type.as_deref() else {
			return Ok(None);
		};
		let kind: AssignedToType = kind
			.parse()
			.map_err(|_| ServicingServerError::Internal(format!("Invalid assigned_to_type: {kind}")))?;

		match (
			kind,
			self.assigned_user_id.as_deref(),
			self.assigned_supplier_id.as_deref(),
		) {
			(AssignedToType::Staff, Some(user), None) => {
				Ok(Some(Assignee::Staff(parse_id("assigned_user_id", user)?)))
			}
			(AssignedToType::Supplier, None, Some(supplier)) => Ok(Some(Assignee::Supplier(
				parse_id("assigned_supplier_id", supplier)?,
			))),
			_ => Err(ServicingServerError::Internal(format!(
				"Inconsistent assignee for job {}",
				self.id
			))),
		}
	}
}

impl TryFrom<JobRow> for ServiceJob {
	type Error = ServicingServerError;

	fn try_from(row: JobRow) -> Result<Self> {
		let assignee = row.assignee()?;

		Ok(ServiceJob {
			id: parse_id("job id", &row.id)?,
			contract_id: parse_id("contract_id", &row.contract_id)?,
			customer_id: parse_id("customer_id", &row.customer_id)?,
			project_id: row
				.project_id
				.as_deref()
				.map(|s| parse_id("project_id", s))
				.transpose()?,
			scheduled_date: parse_date("scheduled_date", &row.scheduled_date)?,
			status: row
				.status
				.parse()
				.map_err(|_| ServicingServerError::Internal(format!("Invalid status: {}", row.status)))?,
			assignee,
			completed_at: row
				.completed_at
				.as_deref()
				.map(|s| parse_timestamp("completed_at", s))
				.transpose()?,
			created_at: parse_timestamp("created_at", &row.created_at)?,
			updated_at: parse_timestamp("updated_at", &row.updated_at)?,
		})
	}
}

#[derive(sqlx::FromRow)]
struct JobSummaryRow {
	#[sqlx(flatten)]
	job: JobRow,
	contract_title: String,
	customer_name: Option<String>,
	project_name: Option<String>,
	assignee_name: Option<String>,
}

impl TryFrom<JobSummaryRow> for JobSummary {
	type Error = ServicingServerError;

	fn try_from(row: JobSummaryRow) -> Result<Self> {
		Ok(JobSummary {
			job: row.job.try_into()?,
			contract_title: row.contract_title,
			customer_name: row.customer_name,
			project_name: row.project_name,
			assignee_name: row.assignee_name,
		})
	}
}
