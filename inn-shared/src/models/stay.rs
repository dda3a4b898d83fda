use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stay status in the front-desk lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StayStatus {
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl StayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StayStatus::CheckedIn => "checked_in",
            StayStatus::CheckedOut => "checked_out",
            StayStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for StayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked_in" => Ok(StayStatus::CheckedIn),
            "checked_out" => Ok(StayStatus::CheckedOut),
            "cancelled" => Ok(StayStatus::Cancelled),
            other => Err(format!("unknown stay status: {}", other)),
        }
    }
}

/// A customer's occupancy of one accommodation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stay {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub accommodation_id: Uuid,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    /// Nightly rate copied from the accommodation at check-in.
    pub nightly_rate_cents: i64,
    pub status: StayStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the store needs to open a stay.
#[derive(Debug, Clone)]
pub struct NewStay {
    pub customer_id: Uuid,
    pub accommodation_id: Uuid,
    pub nightly_rate_cents: i64,
    pub notes: Option<String>,
    pub check_in_at: DateTime<Utc>,
}

impl NewStay {
    pub fn into_stay(self) -> Stay {
        Stay {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            accommodation_id: self.accommodation_id,
            check_in_at: self.check_in_at,
            check_out_at: None,
            nightly_rate_cents: self.nightly_rate_cents,
            status: StayStatus::CheckedIn,
            notes: self.notes,
            created_at: self.check_in_at,
            updated_at: self.check_in_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInInput {
    pub customer_id: Uuid,
    pub accommodation_id: Uuid,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_column_text() {
        for status in [StayStatus::CheckedIn, StayStatus::CheckedOut, StayStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<StayStatus>().unwrap(), status);
        }
        assert!("checkin".parse::<StayStatus>().is_err());
    }

    #[test]
    fn new_stay_opens_checked_in() {
        let now = Utc::now();
        let stay = NewStay {
            customer_id: Uuid::new_v4(),
            accommodation_id: Uuid::new_v4(),
            nightly_rate_cents: 40_000,
            notes: None,
            check_in_at: now,
        }
        .into_stay();

        assert_eq!(stay.status, StayStatus::CheckedIn);
        assert!(stay.check_out_at.is_none());
        assert_eq!(stay.created_at, now);
    }
}
