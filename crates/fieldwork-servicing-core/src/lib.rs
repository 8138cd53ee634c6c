// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for service contract scheduling.
//!
//! A service contract covers an inclusive window of calendar dates and a
//! visit frequency. This crate expands that window into visit dates, turns the
//! dates into [`ServiceJob`]s and defines the job status state machine. It
//! performs no I/O; persistence lives in `fieldwork-server-servicing`.

pub mod contract;
pub mod error;
pub mod frequency;
pub mod ids;
pub mod job;
pub mod schedule;
pub mod stats;

pub use contract::{NewServiceContract, ServiceContract};
pub use error::{Result, ServicingError};
pub use frequency::{Frequency, SchedulePath};
pub use ids::{ContractId, CustomerId, JobId, ProjectId, SupplierId, UserId};
pub use job::{
	build_jobs, is_overdue, AssignedToType, Assignee, AssignmentPolicy, JobEvent, JobStatus,
	ServiceJob,
};
pub use schedule::{
	expand_schedule_dates, local_today, parse_schedule_date, parse_schedule_dates, Horizon,
	MAX_SCHEDULED_DATES,
};
pub use stats::ScheduleStats;
