// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for servicing server operations.

use fieldwork_servicing_core::{ContractId, JobId, ServicingError};
use thiserror::Error;

/// Result type for servicing server operations.
pub type Result<T> = std::result::Result<T, ServicingServerError>;

/// Errors that can occur in servicing server operations.
#[derive(Debug, Error)]
pub enum ServicingServerError {
	#[error("contract not found: {0}")]
	ContractNotFound(ContractId),

	#[error("job not found: {0}")]
	JobNotFound(JobId),

	#[error("validation error: {0}")]
	Validation(#[from] ServicingError),

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("internal error: {0}")]
	Internal(String),
}

/// Coarse classification callers map to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Validation,
	NotFound,
	Persistence,
	Internal,
}

impl ServicingServerError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Validation(_) => ErrorKind::Validation,
			Self::ContractNotFound(_) | Self::JobNotFound(_) => ErrorKind::NotFound,
			Self::Database(_) => ErrorKind::Persistence,
			Self::Internal(_) => ErrorKind::Internal,
		}
	}
}
