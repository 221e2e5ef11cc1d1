//! # Participation Statistics
//!
//! Rolls a collection of session records up into the dashboard numbers:
//! the participant total for the trailing 7 days and a zero-filled daily
//! series over the same window.
//!
//! The window is the 7 calendar days ending at `as_of` inclusive, i.e.
//! `as_of - 6` through `as_of`. Records dated outside the window, including
//! after `as_of`, are excluded. Attribution is date-only; a record lands on
//! exactly one day.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::session::SessionRecord;

/// Number of days in the dashboard window.
const WINDOW_DAYS: u64 = 7;

/// One day of the trailing-week series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayStat {
    pub date: NaiveDate,
    /// Combined participant count for sessions on this exact date; zero when
    /// no session fell on it.
    pub participants: i64,
    /// Abbreviated weekday name ("Mon", "Tue", ...).
    pub day: String,
}

/// Aggregated dashboard statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipationStats {
    /// Participant total across all sessions in the trailing 7-day window.
    pub recent_participants: i64,
    /// Exactly 7 entries, ascending by date, ending at the as-of date.
    pub daily_stats: Vec<DayStat>,
}

/// Roll `records` up into the trailing-week statistics ending at `as_of`.
///
/// Deterministic: output depends only on the record set and `as_of`, not on
/// input ordering or the time of call.
pub fn aggregate(records: &[SessionRecord], as_of: NaiveDate) -> ParticipationStats {
    let window_start = as_of
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut per_day = [0i64; WINDOW_DAYS as usize];
    let mut recent_participants = 0i64;

    for record in records {
        let date = record.fields.session_date;
        if date < window_start || date > as_of {
            continue;
        }
        let offset = (date - window_start).num_days() as usize;
        per_day[offset] += record.total_participants();
        recent_participants += record.total_participants();
    }

    let daily_stats = per_day
        .iter()
        .enumerate()
        .map(|(offset, &participants)| {
            let date = window_start
                .checked_add_days(Days::new(offset as u64))
                .unwrap_or(as_of);
            DayStat {
                date,
                participants,
                day: date.format("%a").to_string(),
            }
        })
        .collect();

    ParticipationStats {
        recent_participants,
        daily_stats,
    }
}
