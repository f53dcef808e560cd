//! Mentorship model and its lifecycle rules
//!
//! A mentorship starts `pending` and is decided once by its mentor, either
//! `accepted` or `rejected`. Repeating a decision is a no-op; reversing one
//! is refused.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentorshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MentorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorshipStatus::Pending => "pending",
            MentorshipStatus::Accepted => "accepted",
            MentorshipStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentorshipStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MentorshipStatus::Pending),
            "accepted" => Ok(MentorshipStatus::Accepted),
            "rejected" => Ok(MentorshipStatus::Rejected),
            other => Err(anyhow::anyhow!("Unknown mentorship status: {}", other)),
        }
    }
}

/// Lifecycle rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Mentorship is already {0}")]
    AlreadyDecided(MentorshipStatus),

    #[error("Mentorship end date not set.")]
    EndDateNotSet,

    #[error("Extended end date is out of range")]
    OutOfRange,
}

/// Mentorship entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentorship {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub course_id: Uuid,
    pub status: MentorshipStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mentorship {
    /// Check a status change and return the status to persist
    ///
    /// Returns `Ok(None)` when the mentorship is already in `target`.
    pub fn transition_to(
        &self,
        target: MentorshipStatus,
    ) -> Result<Option<MentorshipStatus>, LifecycleError> {
        if self.status == target {
            return Ok(None);
        }

        match self.status {
            MentorshipStatus::Pending => Ok(Some(target)),
            decided => Err(LifecycleError::AlreadyDecided(decided)),
        }
    }

    /// End date moved by `days`, which may be negative
    pub fn extended_end_date(&self, days: i64) -> Result<NaiveDate, LifecycleError> {
        let end_date = self.end_date.ok_or(LifecycleError::EndDateNotSet)?;
        let delta = TimeDelta::try_days(days).ok_or(LifecycleError::OutOfRange)?;

        end_date
            .checked_add_signed(delta)
            .ok_or(LifecycleError::OutOfRange)
    }
}

/// Application for a mentorship, submitted by the mentee
#[derive(Debug, Clone, Deserialize)]
pub struct NewMentorship {
    pub mentor_id: Uuid,
    pub mentee_id: Uuid,
    pub course_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Mentorship update payload
///
/// Clients may only move dates; `status` changes go through accept/reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMentorship {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl UpdateMentorship {
    pub fn end_date(end_date: NaiveDate) -> Self {
        Self {
            end_date: Some(end_date),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, mentorship: &mut Mentorship) {
        if let Some(start_date) = self.start_date {
            mentorship.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            mentorship.end_date = Some(end_date);
        }
        mentorship.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExtendDeadlineQuery {
    pub extend_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentorship(status: MentorshipStatus, end_date: Option<NaiveDate>) -> Mentorship {
        Mentorship {
            id: Uuid::new_v4(),
            mentor_id: Uuid::new_v4(),
            mentee_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            status,
            start_date: NaiveDate::from_ymd_opt(2023, 12, 1),
            end_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_can_be_decided() {
        let m = mentorship(MentorshipStatus::Pending, None);
        assert_eq!(
            m.transition_to(MentorshipStatus::Accepted),
            Ok(Some(MentorshipStatus::Accepted))
        );
        assert_eq!(
            m.transition_to(MentorshipStatus::Rejected),
            Ok(Some(MentorshipStatus::Rejected))
        );
    }

    #[test]
    fn test_repeated_decision_is_a_noop() {
        let m = mentorship(MentorshipStatus::Accepted, None);
        assert_eq!(m.transition_to(MentorshipStatus::Accepted), Ok(None));
    }

    #[test]
    fn test_decision_cannot_be_reversed() {
        let m = mentorship(MentorshipStatus::Rejected, None);
        assert_eq!(
            m.transition_to(MentorshipStatus::Accepted),
            Err(LifecycleError::AlreadyDecided(MentorshipStatus::Rejected))
        );
        assert_eq!(
            m.transition_to(MentorshipStatus::Pending),
            Err(LifecycleError::AlreadyDecided(MentorshipStatus::Rejected))
        );
    }

    #[test]
    fn test_extend_deadline() {
        let m = mentorship(MentorshipStatus::Accepted, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(m.extended_end_date(10), Ok(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()));
        assert_eq!(
            m.extended_end_date(-1),
            Ok(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        );
    }

    #[test]
    fn test_extend_deadline_without_end_date() {
        let m = mentorship(MentorshipStatus::Pending, None);
        assert_eq!(m.extended_end_date(10), Err(LifecycleError::EndDateNotSet));
    }

    #[test]
    fn test_extend_deadline_overflow() {
        let m = mentorship(MentorshipStatus::Pending, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(m.extended_end_date(i64::MAX), Err(LifecycleError::OutOfRange));
        assert_eq!(
            m.extended_end_date(1_000_000_000),
            Err(LifecycleError::OutOfRange)
        );
    }

    #[test]
    fn test_status_cannot_be_set_by_clients() {
        let update: UpdateMentorship =
            serde_json::from_str(r#"{"status": "accepted", "end_date": "2024-02-01"}"#).unwrap();
        let mut m = mentorship(MentorshipStatus::Pending, None);
        update.apply_to(&mut m);
        assert_eq!(m.status, MentorshipStatus::Pending);
        assert_eq!(m.end_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }
}
