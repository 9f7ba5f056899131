use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

#[derive(Error, Debug, PartialEq)]
pub enum ChoreError {
    #[error("Invalid due date: {0}")]
    InvalidDueDate(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoreVariant {
    Destructive,
    Warning,
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoreStatus {
    Overdue,
    Today,
    Tomorrow,
    InDays(i64),
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoreStatus::Overdue => write!(f, "Overdue"),
            ChoreStatus::Today => write!(f, "Today"),
            ChoreStatus::Tomorrow => write!(f, "Tomorrow"),
            ChoreStatus::InDays(days) => write!(f, "{} days", days),
        }
    }
}

impl Serialize for ChoreStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Accepts a plain `YYYY-MM-DD` date (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_due_date(due_date: &str) -> Result<DateTime<Utc>, ChoreError> {
    if let Ok(date) = NaiveDate::parse_from_str(due_date, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(due_date)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| ChoreError::InvalidDueDate(due_date.to_string()))
}

// Whole days until `due_date`, rounded up, so anything later today is `0`.
pub fn days_until(due_date: &str, now: DateTime<Utc>) -> Result<i64, ChoreError> {
    let due = parse_due_date(due_date)?;
    let millis = (due - now).num_milliseconds();
    Ok(ceil_div(millis, MILLIS_PER_DAY))
}

pub fn chore_variant(due_date: &str, now: DateTime<Utc>) -> Result<ChoreVariant, ChoreError> {
    let days = days_until(due_date, now)?;
    Ok(if days < 0 {
        ChoreVariant::Destructive
    } else if days <= 1 {
        ChoreVariant::Warning
    } else {
        ChoreVariant::Outline
    })
}

pub fn chore_status(due_date: &str, now: DateTime<Utc>) -> Result<ChoreStatus, ChoreError> {
    let days = days_until(due_date, now)?;
    Ok(match days {
        d if d < 0 => ChoreStatus::Overdue,
        0 => ChoreStatus::Today,
        1 => ChoreStatus::Tomorrow,
        d => ChoreStatus::InDays(d),
    })
}

fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a.div_euclid(b);
    if a.rem_euclid(b) == 0 {
        q
    } else {
        q + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn due_today_is_today() {
        assert_eq!(chore_status("2024-05-10", now()).unwrap(), ChoreStatus::Today);
        assert_eq!(chore_variant("2024-05-10", now()).unwrap(), ChoreVariant::Warning);
    }

    #[test]
    fn due_tomorrow_is_tomorrow() {
        assert_eq!(chore_status("2024-05-11", now()).unwrap(), ChoreStatus::Tomorrow);
        assert_eq!(chore_variant("2024-05-11", now()).unwrap(), ChoreVariant::Warning);
    }

    #[test]
    fn past_dates_are_overdue() {
        assert_eq!(chore_status("2024-05-09", now()).unwrap(), ChoreStatus::Overdue);
        assert_eq!(chore_status("2023-12-31", now()).unwrap(), ChoreStatus::Overdue);
        assert_eq!(chore_variant("2024-05-01", now()).unwrap(), ChoreVariant::Destructive);
    }

    #[test]
    fn later_dates_count_days() {
        let status = chore_status("2024-05-14", now()).unwrap();
        assert_eq!(status, ChoreStatus::InDays(4));
        assert_eq!(status.to_string(), "4 days");
        assert_eq!(chore_variant("2024-05-14", now()).unwrap(), ChoreVariant::Outline);
    }

    #[test]
    fn accepts_timestamps() {
        assert_eq!(
            chore_status("2024-05-10T18:00:00Z", now()).unwrap(),
            ChoreStatus::Tomorrow
        );
        assert_eq!(
            chore_status("2024-05-10T09:30:00+00:00", now()).unwrap(),
            ChoreStatus::Today
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            chore_status("next tuesday", now()),
            Err(ChoreError::InvalidDueDate("next tuesday".to_string()))
        );
    }

    #[test]
    fn serializes_labels() {
        assert_eq!(serde_json::to_string(&ChoreStatus::Today).unwrap(), "\"Today\"");
        assert_eq!(
            serde_json::to_string(&ChoreVariant::Destructive).unwrap(),
            "\"destructive\""
        );
    }
}
