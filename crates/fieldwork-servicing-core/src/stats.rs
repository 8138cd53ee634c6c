// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schedule statistics for a contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::job::{JobStatus, ServiceJob};

/// Job counts for one contract as of `as_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
	pub as_of: NaiveDate,

	pub total: u64,
	pub scheduled: u64,
	pub in_progress: u64,
	pub completed: u64,
	pub endorsed: u64,
	pub overdue: u64,

	/// Earliest open visit on or after `as_of`
	pub next_due: Option<NaiveDate>,
}

impl ScheduleStats {
	pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a ServiceJob>, today: NaiveDate) -> Self {
		let mut stats = ScheduleStats {
			as_of: today,
			total: 0,
			scheduled: 0,
			in_progress: 0,
			completed: 0,
			endorsed: 0,
			overdue: 0,
			next_due: None,
		};

		for job in jobs {
			stats.total += 1;
			match job.status {
				JobStatus::Scheduled => stats.scheduled += 1,
				JobStatus::InProgress => stats.in_progress += 1,
				JobStatus::Completed => stats.completed += 1,
				JobStatus::Endorsed => stats.endorsed += 1,
			}
			if job.is_overdue(today) {
				stats.overdue += 1;
			}
			if !job.status.is_closed() && job.scheduled_date >= today {
				stats.next_due = Some(match stats.next_due {
					Some(current) => current.min(job.scheduled_date),
					None => job.scheduled_date,
				});
			}
		}

		stats
	}

	/// Share of jobs that reached `Completed` or `Endorsed`, 0-100.
	pub fn completion_percentage(&self) -> f64 {
		if self.total == 0 {
			return 0.0;
		}
		(self.completed + self.endorsed) as f64 / self.total as f64 * 100.0
	}
}
