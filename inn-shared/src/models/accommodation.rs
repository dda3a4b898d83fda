use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contains_ci;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccommodationType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AccommodationType {
    pub fn new(input: &AccommodationTypeInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: normalize_description(&input.description),
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: &AccommodationTypeInput) {
        self.name = input.name.trim().to_string();
        self.description = normalize_description(&input.description);
    }

    pub fn matches_search(&self, term: &str) -> bool {
        contains_ci(&self.name, term)
    }
}

fn normalize_description(description: &Option<String>) -> Option<String> {
    description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccommodationTypeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A rentable unit (room, suite, chalet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Accommodation {
    pub id: Uuid,
    pub name: String,
    /// Unit number shown on the door, unique among accommodations.
    pub number: String,
    pub nightly_rate_cents: i64,
    pub max_occupancy: i32,
    pub type_id: Uuid,
    pub has_minibar: bool,
    pub has_parking: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Accommodation {
    pub fn new(input: &AccommodationInput, type_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            number: input.number.trim().to_string(),
            nightly_rate_cents: input.nightly_rate_cents,
            max_occupancy: input.max_occupancy,
            type_id,
            has_minibar: input.has_minibar,
            has_parking: input.has_parking,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: &AccommodationInput, type_id: Uuid) {
        self.name = input.name.trim().to_string();
        self.number = input.number.trim().to_string();
        self.nightly_rate_cents = input.nightly_rate_cents;
        self.max_occupancy = input.max_occupancy;
        self.type_id = type_id;
        self.has_minibar = input.has_minibar;
        self.has_parking = input.has_parking;
        self.updated_at = Utc::now();
    }

    /// Matches by name or unit number.
    pub fn matches_search(&self, term: &str) -> bool {
        contains_ci(&self.name, term) || self.number.contains(term)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccommodationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub nightly_rate_cents: i64,
    #[serde(default)]
    pub max_occupancy: i32,
    #[serde(default)]
    pub type_id: Option<Uuid>,
    #[serde(default)]
    pub has_minibar: bool,
    #[serde(default)]
    pub has_parking: bool,
}
