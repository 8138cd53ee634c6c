// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Table definitions for service contracts and jobs.
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as RFC 3339 text.
//! Customers, projects, users and suppliers are reference data owned by other
//! parts of the application; they are joined for display only and carry no
//! foreign-key constraints from the servicing tables.

use sqlx::SqlitePool;

use crate::error::Result;

const STATEMENTS: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS customers (
		id TEXT PRIMARY KEY NOT NULL,
		name TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS projects (
		id TEXT PRIMARY KEY NOT NULL,
		name TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY NOT NULL,
		display_name TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS suppliers (
		id TEXT PRIMARY KEY NOT NULL,
		name TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS service_contracts (
		id TEXT PRIMARY KEY NOT NULL,
		customer_id TEXT NOT NULL,
		project_id TEXT,
		title TEXT NOT NULL,
		start_date TEXT NOT NULL,
		end_date TEXT NOT NULL,
		frequency TEXT NOT NULL,
		created_by_id TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS service_contract_suppliers (
		contract_id TEXT NOT NULL REFERENCES service_contracts(id) ON DELETE CASCADE,
		supplier_id TEXT NOT NULL,
		position INTEGER NOT NULL,
		PRIMARY KEY (contract_id, supplier_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS service_jobs (
		id TEXT PRIMARY KEY NOT NULL,
		contract_id TEXT NOT NULL REFERENCES service_contracts(id) ON DELETE CASCADE,
		customer_id TEXT NOT NULL,
		project_id TEXT,
		scheduled_date TEXT NOT NULL,
		status TEXT NOT NULL
			CHECK (status IN ('scheduled', 'in_progress', 'completed', 'endorsed')),
		assigned_to_type TEXT CHECK (assigned_to_type IN ('staff', 'supplier')),
		assigned_user_id TEXT,
		assigned_supplier_id TEXT,
		completed_at TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		CHECK (
			(assigned_to_type IS NULL AND assigned_user_id IS NULL AND assigned_supplier_id IS NULL)
			OR (assigned_to_type = 'staff' AND assigned_user_id IS NOT NULL AND assigned_supplier_id IS NULL)
			OR (assigned_to_type = 'supplier' AND assigned_supplier_id IS NOT NULL AND assigned_user_id IS NULL)
		)
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_service_jobs_contract_status ON service_jobs(contract_id, status)",
	"CREATE INDEX IF NOT EXISTS idx_service_jobs_scheduled_date ON service_jobs(scheduled_date)",
];

/// Create the servicing tables if they do not exist.
#[tracing::instrument(skip(pool))]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
	for statement in STATEMENTS {
		sqlx::query(*statement).execute(pool).await?;
	}
	tracing::debug!(statements = STATEMENTS.len(), "servicing schema ensured");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn test_schema_is_idempotent() {
		let pool = create_test_pool().await;
		ensure_schema(&pool).await.unwrap();
		ensure_schema(&pool).await.unwrap();

		let (count,): (i64,) = sqlx::query_as(
			"SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'service_%'",
		)
		.fetch_one(&pool)
		.await
		.unwrap();
		assert_eq!(count, 3);
	}

	#[tokio::test]
	async fn test_rejects_inconsistent_assignee() {
		let pool = create_test_pool().await;
		ensure_schema(&pool).await.unwrap();

		sqlx::query(
			"INSERT INTO service_contracts (id, customer_id, title, start_date, end_date, frequency, created_by_id, created_at)
			 VALUES ('c1', 'cust', 'Pumps', '2025-01-01', '2025-12-31', 'Monthly', 'u1', '2025-01-01T00:00:00Z')",
		)
		.execute(&pool)
		.await
		.unwrap();

		let result = sqlx::query(
			"INSERT INTO service_jobs (id, contract_id, customer_id, scheduled_date, status, assigned_to_type, assigned_supplier_id, created_at, updated_at)
			 VALUES ('j1', 'c1', 'cust', '2025-01-01', 'scheduled', 'staff', 's1', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
		)
		.execute(&pool)
		.await;
		assert!(result.is_err());
	}
}
