// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::schema::ensure_schema;

/// A single-connection in-memory pool, so every query sees the same database.
pub async fn create_test_pool() -> SqlitePool {
	SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.unwrap()
}

pub async fn create_servicing_test_pool() -> SqlitePool {
	let pool = create_test_pool().await;
	ensure_schema(&pool).await.unwrap();
	pool
}
