// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for service scheduling.

use chrono::NaiveDate;
use thiserror::Error;

use crate::job::{JobEvent, JobStatus};

/// Result type for servicing operations.
pub type Result<T> = std::result::Result<T, ServicingError>;

/// Validation failures raised by the scheduling core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServicingError {
	#[error("invalid date: {0}")]
	InvalidDate(String),

	#[error("invalid contract window: end date {end} must be after start date {start}")]
	InvalidWindow { start: NaiveDate, end: NaiveDate },

	#[error("missing required field: {0}")]
	MissingField(&'static str),

	#[error("cannot {event} a job that is {from}")]
	InvalidTransition { from: JobStatus, event: JobEvent },
}
