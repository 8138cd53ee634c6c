// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expansion of a contract window into visit dates.
//!
//! All arithmetic is on naive local calendar dates. Months are added with
//! [`NaiveDate::checked_add_months`], which clamps to the last day of the
//! target month: 31 Jan + 3 months is 30 Apr. Each date is derived from the
//! previously emitted one, so a clamped day carries forward.

use chrono::{DateTime, Local, Months, NaiveDate};

use crate::error::{Result, ServicingError};
use crate::frequency::{Frequency, SchedulePath};

/// Upper bound on dates produced by one expansion, whatever the window. A
/// defensive cap, not a business rule.
pub const MAX_SCHEDULED_DATES: usize = 50;

/// Caps expansion at `today + months` for previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
	pub today: NaiveDate,
	pub months: u32,
}

impl Horizon {
	pub fn new(today: NaiveDate, months: u32) -> Self {
		Self { today, months }
	}

	/// Last date the horizon admits, `None` if it lies past the calendar's end.
	pub fn limit(&self) -> Option<NaiveDate> {
		self.today.checked_add_months(Months::new(self.months))
	}
}

/// Expand `[start, end]` into visit dates.
///
/// The first date is `start`; each following date is the previous one plus
/// the frequency's interval. Expansion stops once the next date passes `end`
/// (or the horizon limit, whichever is earlier) or [`MAX_SCHEDULED_DATES`]
/// dates have been produced. Returns an empty list when `start` is already
/// past the effective end.
pub fn expand_schedule_dates(
	start: NaiveDate,
	end: NaiveDate,
	frequency: &Frequency,
	path: SchedulePath,
	horizon: Option<Horizon>,
) -> Vec<NaiveDate> {
	let interval = Months::new(frequency.interval_months(path));
	let limit = match horizon.and_then(|h| h.limit()) {
		Some(horizon_end) => end.min(horizon_end),
		None => end,
	};

	let mut dates = Vec::new();
	let mut current = start;
	while current <= limit && dates.len() < MAX_SCHEDULED_DATES {
		dates.push(current);
		match current.checked_add_months(interval) {
			Some(next) => current = next,
			None => break,
		}
	}
	dates
}

/// Today's date on the local calendar.
///
/// The one clock read for "today" in overdue checks and previews. Dates are
/// naive local dates, never normalized to UTC.
pub fn local_today() -> NaiveDate {
	Local::now().date_naive()
}

/// Parse a single caller-supplied date.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in which case the calendar
/// date in the timestamp's own offset is used.
pub fn parse_schedule_date(value: &str) -> Result<NaiveDate> {
	let trimmed = value.trim();
	if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
		return Ok(date);
	}
	DateTime::parse_from_rfc3339(trimmed)
		.map(|dt| dt.date_naive())
		.map_err(|_| ServicingError::InvalidDate(value.to_string()))
}

/// Parse a batch of dates, failing on the first malformed value.
pub fn parse_schedule_dates<S: AsRef<str>>(values: &[S]) -> Result<Vec<NaiveDate>> {
	values
		.iter()
		.map(|v| parse_schedule_date(v.as_ref()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn date(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	fn full(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Vec<NaiveDate> {
		expand_schedule_dates(start, end, &frequency, SchedulePath::ContractCreation, None)
	}

	#[test]
	fn test_monthly_over_a_year_gives_twelve_visits() {
		let dates = full(date(2025, 1, 15), date(2025, 12, 15), Frequency::Monthly);
		assert_eq!(dates.len(), 12);
		assert_eq!(dates.first(), Some(&date(2025, 1, 15)));
		assert_eq!(dates.last(), Some(&date(2025, 12, 15)));
		for (i, d) in dates.iter().enumerate() {
			assert_eq!(*d, date(2025, i as u32 + 1, 15));
		}
	}

	#[test]
	fn test_quarterly_from_month_end_clamps_to_april_30() {
		let dates = full(date(2025, 1, 31), date(2025, 6, 30), Frequency::Quarterly);
		assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 4, 30)]);
	}

	#[test]
	fn test_clamped_day_carries_forward() {
		let dates = full(date(2025, 1, 31), date(2025, 5, 31), Frequency::Monthly);
		assert_eq!(
			dates,
			vec![
				date(2025, 1, 31),
				date(2025, 2, 28),
				date(2025, 3, 28),
				date(2025, 4, 28),
				date(2025, 5, 28),
			]
		);
	}

	#[test]
	fn test_single_day_window_gives_one_visit() {
		let day = date(2025, 3, 1);
		assert_eq!(full(day, day, Frequency::Annual), vec![day]);
	}

	#[test]
	fn test_start_after_end_gives_nothing() {
		assert!(full(date(2025, 3, 2), date(2025, 3, 1), Frequency::Monthly).is_empty());
	}

	#[test]
	fn test_bogus_frequency_expands_monthly() {
		let dates = full(
			date(2025, 1, 1),
			date(2025, 4, 1),
			Frequency::from("BogusValue"),
		);
		assert_eq!(
			dates,
			vec![
				date(2025, 1, 1),
				date(2025, 2, 1),
				date(2025, 3, 1),
				date(2025, 4, 1)
			]
		);
	}

	#[test]
	fn test_custom_differs_between_paths() {
		let start = date(2025, 1, 1);
		let end = date(2025, 12, 31);
		let creation = full(start, end, Frequency::Custom);
		let preview = expand_schedule_dates(
			start,
			end,
			&Frequency::Custom,
			SchedulePath::SuggestedDates,
			None,
		);
		assert_eq!(creation, vec![start]);
		assert_eq!(
			preview,
			vec![
				date(2025, 1, 1),
				date(2025, 4, 1),
				date(2025, 7, 1),
				date(2025, 10, 1)
			]
		);
	}

	#[test]
	fn test_horizon_caps_preview() {
		let horizon = Horizon::new(date(2025, 2, 10), 3);
		let dates = expand_schedule_dates(
			date(2025, 1, 1),
			date(2026, 12, 31),
			&Frequency::Monthly,
			SchedulePath::SuggestedDates,
			Some(horizon),
		);
		assert_eq!(dates.last(), Some(&date(2025, 5, 1)));
		assert_eq!(dates.len(), 5);
	}

	#[test]
	fn test_contract_end_wins_over_longer_horizon() {
		let horizon = Horizon::new(date(2025, 1, 1), 60);
		let dates = expand_schedule_dates(
			date(2025, 1, 1),
			date(2025, 3, 1),
			&Frequency::Monthly,
			SchedulePath::SuggestedDates,
			Some(horizon),
		);
		assert_eq!(dates.len(), 3);
	}

	#[test]
	fn test_multi_decade_monthly_window_is_capped() {
		let dates = full(date(2000, 1, 1), date(2099, 12, 31), Frequency::Monthly);
		assert_eq!(dates.len(), MAX_SCHEDULED_DATES);
		assert_eq!(dates.last(), Some(&date(2004, 2, 1)));
	}

	#[test]
	fn test_expansion_near_calendar_end_terminates() {
		let dates = full(NaiveDate::MAX, NaiveDate::MAX, Frequency::Annual);
		assert_eq!(dates, vec![NaiveDate::MAX]);
	}

	#[test]
	fn test_parses_plain_and_rfc3339_dates() {
		assert_eq!(parse_schedule_date("2025-03-01").unwrap(), date(2025, 3, 1));
		assert_eq!(
			parse_schedule_date("2025-03-01T23:30:00+10:00").unwrap(),
			date(2025, 3, 1)
		);
		assert_eq!(parse_schedule_date(" 2025-03-01 ").unwrap(), date(2025, 3, 1));
	}

	#[test]
	fn test_batch_parse_names_first_bad_value() {
		let values = ["2025-01-01", "2025-02-30", "garbage"];
		let err = parse_schedule_dates(&values).unwrap_err();
		assert_eq!(err, ServicingError::InvalidDate("2025-02-30".to_string()));
		assert!(err.to_string().contains("2025-02-30"));
	}

	fn any_frequency() -> impl Strategy<Value = Frequency> {
		prop_oneof![
			Just(Frequency::Monthly),
			Just(Frequency::Quarterly),
			Just(Frequency::BiAnnual),
			Just(Frequency::Annual),
			Just(Frequency::Custom),
			"[a-z]{3,8}".prop_map(|s| Frequency::from(s.as_str())),
		]
	}

	fn any_date() -> impl Strategy<Value = NaiveDate> {
		(1990i32..2060, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
			NaiveDate::from_ymd_opt(y, m, d)
				.or_else(|| NaiveDate::from_ymd_opt(y, m, 28))
				.unwrap()
		})
	}

	proptest! {
		#[test]
		fn test_expansion_steps_by_interval_within_window(
			start in any_date(),
			span_days in 0i64..20_000,
			frequency in any_frequency(),
		) {
			let end = start + chrono::Duration::days(span_days);
			let dates = full(start, end, frequency.clone());
			let step = Months::new(frequency.interval_months(SchedulePath::ContractCreation));

			prop_assert!(!dates.is_empty());
			prop_assert!(dates.len() <= MAX_SCHEDULED_DATES);
			prop_assert_eq!(dates[0], start);
			for pair in dates.windows(2) {
				prop_assert!(pair[0] < pair[1]);
				prop_assert_eq!(pair[0].checked_add_months(step), Some(pair[1]));
			}
			prop_assert!(dates.iter().all(|d| *d >= start && *d <= end));
		}

		#[test]
		fn test_expansion_is_deterministic(
			start in any_date(),
			span_days in 0i64..5_000,
			frequency in any_frequency(),
			horizon_months in proptest::option::of(0u32..36),
		) {
			let end = start + chrono::Duration::days(span_days);
			let horizon = horizon_months.map(|m| Horizon::new(start, m));
			let a = expand_schedule_dates(start, end, &frequency, SchedulePath::SuggestedDates, horizon);
			let b = expand_schedule_dates(start, end, &frequency, SchedulePath::SuggestedDates, horizon);
			prop_assert_eq!(a, b);
		}

		#[test]
		fn test_stops_only_when_cap_reached_or_next_passes_end(
			start in any_date(),
			span_days in 0i64..20_000,
			frequency in any_frequency(),
		) {
			let end = start + chrono::Duration::days(span_days);
			let dates = full(start, end, frequency.clone());
			let step = Months::new(frequency.interval_months(SchedulePath::ContractCreation));
			let last = *dates.last().unwrap();
			if dates.len() < MAX_SCHEDULED_DATES {
				prop_assert!(last.checked_add_months(step).map_or(true, |next| next > end));
			}
		}
	}
}
